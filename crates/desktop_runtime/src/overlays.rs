//! Single-flight visibility for the shell's transient overlays.
//!
//! At most one overlay is visible at a time. Overlays with an exit transition stay
//! display-participating in [`OverlayPhase::Closing`] until the host reports the transition end.

use crate::model::{PointerPosition, Viewport, WindowId, WindowRecord, TASKBAR_HEIGHT};

/// Margin kept between a context menu and the screen edges.
const CONTEXT_MENU_MARGIN: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayKind {
    StartMenu,
    TrayFlyout,
    WidgetsPanel,
    ContextMenu,
    TaskView,
}

impl OverlayKind {
    pub const ALL: [Self; 5] = [
        Self::StartMenu,
        Self::TrayFlyout,
        Self::WidgetsPanel,
        Self::ContextMenu,
        Self::TaskView,
    ];

    fn index(self) -> usize {
        match self {
            Self::StartMenu => 0,
            Self::TrayFlyout => 1,
            Self::WidgetsPanel => 2,
            Self::ContextMenu => 3,
            Self::TaskView => 4,
        }
    }

    /// Whether hiding waits for a transition-end signal before leaving the layout.
    pub fn has_exit_transition(self) -> bool {
        self == Self::TaskView
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayPhase {
    #[default]
    Hidden,
    Visible,
    Closing,
}

/// Where a pointer-down landed, as far as overlays are concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClickTarget {
    /// Overlay whose surface contains the target.
    pub inside: Option<OverlayKind>,
    /// Overlay whose trigger button contains the target.
    pub trigger: Option<OverlayKind>,
}

impl ClickTarget {
    fn belongs_to(self, kind: OverlayKind) -> bool {
        self.inside == Some(kind) || self.trigger == Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayState {
    phases: [OverlayPhase; 5],
    pub context_menu_at: Option<PointerPosition>,
}

impl OverlayState {
    pub fn phase(&self, kind: OverlayKind) -> OverlayPhase {
        self.phases[kind.index()]
    }

    pub fn is_open(&self, kind: OverlayKind) -> bool {
        self.phase(kind) == OverlayPhase::Visible
    }

    /// Visible or still animating out.
    pub fn is_displayed(&self, kind: OverlayKind) -> bool {
        self.phase(kind) != OverlayPhase::Hidden
    }

    pub fn open_overlay(&self) -> Option<OverlayKind> {
        OverlayKind::ALL.into_iter().find(|kind| self.is_open(*kind))
    }

    /// Shows `kind` after hiding every other overlay.
    pub fn open(&mut self, kind: OverlayKind) {
        self.close_all_except(Some(kind));
        self.phases[kind.index()] = OverlayPhase::Visible;
    }

    /// Hides `kind`. Returns `true` when it was visible.
    pub fn close(&mut self, kind: OverlayKind) -> bool {
        if !self.is_open(kind) {
            return false;
        }
        self.phases[kind.index()] = if kind.has_exit_transition() {
            OverlayPhase::Closing
        } else {
            OverlayPhase::Hidden
        };
        if kind == OverlayKind::ContextMenu {
            self.context_menu_at = None;
        }
        true
    }

    /// Trigger-button semantics: open when hidden or closing, close when visible.
    ///
    /// Returns whether `kind` is visible afterwards.
    pub fn toggle(&mut self, kind: OverlayKind) -> bool {
        if self.is_open(kind) {
            self.close(kind);
            false
        } else {
            self.open(kind);
            true
        }
    }

    pub fn close_all(&mut self) {
        self.close_all_except(None);
    }

    pub fn close_all_except(&mut self, keep: Option<OverlayKind>) {
        for kind in OverlayKind::ALL {
            if Some(kind) != keep {
                self.close(kind);
            }
        }
    }

    /// Completes a pending exit transition. Ignored unless `kind` is closing, so a late signal
    /// for an overlay that was reopened meanwhile changes nothing.
    pub fn transition_finished(&mut self, kind: OverlayKind) {
        if self.phase(kind) == OverlayPhase::Closing {
            self.phases[kind.index()] = OverlayPhase::Hidden;
        }
    }

    /// Closes every visible overlay the click landed outside of (surface and trigger).
    ///
    /// Returns `true` when anything closed.
    pub fn outside_click(&mut self, target: ClickTarget) -> bool {
        let mut changed = false;
        for kind in OverlayKind::ALL {
            if self.is_open(kind) && !target.belongs_to(kind) {
                changed |= self.close(kind);
            }
        }
        changed
    }

    /// Opens the context menu at `pointer`, kept fully on screen above the taskbar.
    pub fn open_context_menu(
        &mut self,
        pointer: PointerPosition,
        menu_width: i32,
        menu_height: i32,
        screen: Viewport,
    ) {
        self.open(OverlayKind::ContextMenu);
        self.context_menu_at = Some(context_menu_position(
            pointer,
            menu_width,
            menu_height,
            screen,
        ));
    }
}

/// Places a menu of the given size at `pointer` (screen coordinates), flipped back inside the
/// screen and above the taskbar.
pub fn context_menu_position(
    pointer: PointerPosition,
    menu_width: i32,
    menu_height: i32,
    screen: Viewport,
) -> PointerPosition {
    let usable_height = screen.height - TASKBAR_HEIGHT;
    let mut x = pointer.x;
    let mut y = pointer.y;
    if x + menu_width > screen.width {
        x = screen.width - menu_width - CONTEXT_MENU_MARGIN;
    }
    if y + menu_height > usable_height {
        y = usable_height - menu_height - CONTEXT_MENU_MARGIN;
    }
    PointerPosition {
        x: x.max(CONTEXT_MENU_MARGIN),
        y: y.max(CONTEXT_MENU_MARGIN),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskViewEntry {
    pub window_id: WindowId,
    pub title: String,
    pub icon: String,
}

/// Task view cards: every live, non-minimized window, topmost first.
pub fn task_view_entries(windows: &[WindowRecord]) -> Vec<TaskViewEntry> {
    let mut visible: Vec<&WindowRecord> = windows
        .iter()
        .filter(|w| !w.closing && !w.is_minimized())
        .collect();
    visible.sort_by(|a, b| b.z_index.cmp(&a.z_index));
    visible
        .into_iter()
        .map(|w| TaskViewEntry {
            window_id: w.id.clone(),
            title: w.title.clone(),
            icon: w.icon.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn opening_one_overlay_hides_the_others() {
        let mut overlays = OverlayState::default();
        overlays.open(OverlayKind::StartMenu);
        overlays.open(OverlayKind::WidgetsPanel);

        assert_eq!(overlays.open_overlay(), Some(OverlayKind::WidgetsPanel));
        assert_eq!(overlays.phase(OverlayKind::StartMenu), OverlayPhase::Hidden);
    }

    #[test]
    fn toggle_flips_visibility() {
        let mut overlays = OverlayState::default();
        assert!(overlays.toggle(OverlayKind::TrayFlyout));
        assert!(!overlays.toggle(OverlayKind::TrayFlyout));
        assert!(!overlays.is_displayed(OverlayKind::TrayFlyout));
    }

    #[test]
    fn task_view_lingers_until_transition_finishes() {
        let mut overlays = OverlayState::default();
        overlays.open(OverlayKind::TaskView);
        overlays.open(OverlayKind::StartMenu);

        assert_eq!(overlays.phase(OverlayKind::TaskView), OverlayPhase::Closing);
        assert!(overlays.is_displayed(OverlayKind::TaskView));

        overlays.transition_finished(OverlayKind::TaskView);
        assert_eq!(overlays.phase(OverlayKind::TaskView), OverlayPhase::Hidden);
    }

    #[test]
    fn stale_transition_end_does_not_hide_reopened_overlay() {
        let mut overlays = OverlayState::default();
        overlays.open(OverlayKind::TaskView);
        overlays.close(OverlayKind::TaskView);
        overlays.open(OverlayKind::TaskView);

        overlays.transition_finished(OverlayKind::TaskView);
        assert!(overlays.is_open(OverlayKind::TaskView));
    }

    #[test]
    fn outside_click_spares_surface_and_trigger() {
        let mut overlays = OverlayState::default();
        overlays.open(OverlayKind::StartMenu);

        assert!(!overlays.outside_click(ClickTarget {
            inside: Some(OverlayKind::StartMenu),
            trigger: None,
        }));
        assert!(!overlays.outside_click(ClickTarget {
            inside: None,
            trigger: Some(OverlayKind::StartMenu),
        }));
        assert!(overlays.is_open(OverlayKind::StartMenu));

        assert!(overlays.outside_click(ClickTarget::default()));
        assert!(!overlays.is_displayed(OverlayKind::StartMenu));
    }

    #[test]
    fn context_menu_is_pulled_back_on_screen() {
        let screen = Viewport {
            width: 1024,
            height: 768,
        };
        assert_eq!(
            context_menu_position(PointerPosition { x: 1000, y: 700 }, 200, 300, screen),
            PointerPosition { x: 819, y: 415 }
        );
        assert_eq!(
            context_menu_position(PointerPosition { x: 2, y: 1 }, 200, 300, screen),
            PointerPosition { x: 5, y: 5 }
        );

        let mut overlays = OverlayState::default();
        overlays.open_context_menu(PointerPosition { x: 40, y: 60 }, 200, 300, screen);
        assert_eq!(
            overlays.context_menu_at,
            Some(PointerPosition { x: 40, y: 60 })
        );
        overlays.close(OverlayKind::ContextMenu);
        assert_eq!(overlays.context_menu_at, None);
    }

    #[test]
    fn task_view_lists_visible_windows_topmost_first() {
        use desktop_app_contract::AppKind;

        use crate::{
            apps::AppRegistry,
            model::{DesktopState, OpenWindowRequest},
            window_manager,
        };

        let apps = AppRegistry::builtin();
        let mut state = DesktopState::default();
        let mut open = |id: &str| {
            let mut request =
                OpenWindowRequest::new(id.to_uppercase(), AppKind::Generic, 400, 300);
            request.id = Some(WindowId::from(id));
            request.icon = format!("{id}.png");
            window_manager::open_window(&mut state, &apps, request)
        };
        let a = open("a");
        let b = open("b");
        let c = open("c");
        let d = open("d");
        window_manager::bring_to_front(&mut state, &a);
        window_manager::minimize_window(&mut state, &b);
        window_manager::begin_close(&mut state, &d);

        assert_eq!(
            task_view_entries(&state.windows),
            vec![
                TaskViewEntry {
                    window_id: a,
                    title: "A".to_string(),
                    icon: "a.png".to_string(),
                },
                TaskViewEntry {
                    window_id: c,
                    title: "C".to_string(),
                    icon: "c.png".to_string(),
                },
            ]
        );
        assert_eq!(task_view_entries(&[]), Vec::new());
    }
}
