//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

mod appearance;

use leptos::logging;
use serde_json::Value;
use thiserror::Error;

pub use appearance::wallpaper_css_from_url;

use crate::{
    apps::AppRegistry,
    desktop_icons::{self, NewItemKind},
    interaction::{self, InteractionState},
    model::{DesktopState, OpenWindowRequest, PointerPosition, Viewport, WindowId},
    overlays::{ClickTarget, OverlayKind},
    persistence::{self, SessionSnapshot},
    taskbar::{self, TaskbarClick},
    window_manager,
};

/// Delay before a closing window is removed when no exit-animation signal arrives.
pub const CLOSE_FALLBACK_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Signal that completed a window's exit animation.
pub enum CloseTrigger {
    /// The host observed the end of the exit transition.
    ExitAnimationEnded,
    /// The scheduled fallback timer fired first.
    FallbackTimeout,
}

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Open a window from an explicit request.
    OpenWindow(OpenWindowRequest),
    /// Open (or surface) a catalog app by id, as the start menu does.
    LaunchApp {
        /// Catalog id, e.g. `notepad`.
        app_id: String,
    },
    /// Open the window behind a desktop icon (double-click).
    LaunchDesktopIcon {
        /// Icon to launch.
        icon_id: String,
    },
    /// Focus (and raise) a window, e.g. on pointer-down inside it.
    FocusWindow {
        /// Window to focus.
        window_id: WindowId,
    },
    /// Minimize a window.
    MinimizeWindow {
        /// Window to minimize.
        window_id: WindowId,
    },
    /// Maximize a window to the container and focus it.
    MaximizeWindow {
        /// Window to maximize.
        window_id: WindowId,
    },
    /// Restore a minimized, maximized, or snapped window.
    RestoreWindow {
        /// Window to restore.
        window_id: WindowId,
    },
    /// Maximize control click or title-bar double-click.
    ToggleMaximize {
        /// Window whose control was used.
        window_id: WindowId,
    },
    /// Start closing a window. The record stays until [`DesktopAction::FinalizeClose`].
    CloseWindow {
        /// Window to close.
        window_id: WindowId,
    },
    /// Remove a closing window once its exit animation is over.
    FinalizeClose {
        /// Window being removed.
        window_id: WindowId,
        /// Which signal arrived.
        trigger: CloseTrigger,
    },
    /// Taskbar button click (restore, minimize, or focus).
    ToggleTaskbarWindow {
        /// Window associated with the taskbar button.
        window_id: WindowId,
    },
    /// Pointer-down on a title bar.
    BeginMove {
        /// Window being dragged.
        window_id: WindowId,
        /// Pointer position in container coordinates.
        pointer: PointerPosition,
    },
    /// Pointer-down on a window's resize band.
    BeginResize {
        /// Window being resized.
        window_id: WindowId,
        /// Pointer position in container coordinates.
        pointer: PointerPosition,
    },
    /// Drag start on a desktop icon.
    BeginIconDrag {
        /// Icon being dragged.
        icon_id: String,
        /// Pointer position in desktop coordinates.
        pointer: PointerPosition,
    },
    /// Pointer movement while a session may be active.
    PointerMove {
        /// Current pointer position.
        pointer: PointerPosition,
    },
    /// Pointer release; ends any active session.
    PointerUp {
        /// Release position.
        pointer: PointerPosition,
    },
    /// Trigger-button click for an overlay.
    ToggleOverlay {
        /// Overlay whose trigger was clicked.
        kind: OverlayKind,
    },
    /// Hide one overlay.
    CloseOverlay {
        /// Overlay to hide.
        kind: OverlayKind,
    },
    /// Hide every overlay.
    CloseAllOverlays,
    /// The host observed the end of an overlay's exit transition.
    OverlayTransitionEnded {
        /// Overlay that finished animating out.
        kind: OverlayKind,
    },
    /// Document click; closes overlays the click landed outside of.
    OutsideClick {
        /// Where the click landed.
        target: ClickTarget,
    },
    /// Desktop right-click.
    OpenContextMenu {
        /// Click position in screen coordinates.
        pointer: PointerPosition,
        /// Rendered menu width.
        menu_width: i32,
        /// Rendered menu height.
        menu_height: i32,
        /// Full screen size, taskbar included.
        screen: Viewport,
    },
    /// Task view card click.
    SelectTaskViewEntry {
        /// Window represented by the card.
        window_id: WindowId,
    },
    /// Context menu "New" command.
    CreateDesktopItem {
        /// Item to create.
        kind: NewItemKind,
        /// Where the context menu was opened.
        pointer: PointerPosition,
    },
    /// Desktop icon click.
    SelectIcon {
        /// Clicked icon.
        icon_id: String,
        /// Ctrl or shift was held.
        extend: bool,
    },
    /// Click on empty desktop.
    ClearIconSelection,
    /// Apply a user-entered wallpaper image URL.
    SetWallpaperUrl {
        /// Raw URL as typed.
        url: String,
    },
    /// Apply a wallpaper preset given as a CSS background value.
    SetWallpaper {
        /// CSS value, e.g. `url("wallpaper.jpg")`. Empty restores the default.
        css: String,
    },
    /// Apply an accent color. Empty restores the default.
    SetAccentColor {
        /// CSS color.
        color: String,
    },
    /// Replace the app-specific state payload for a window.
    SetAppState {
        /// Window whose app state should be replaced.
        window_id: WindowId,
        /// New app state payload.
        app_state: Value,
    },
    /// The window container was resized.
    SetViewport {
        /// New container size.
        viewport: Viewport,
    },
    /// Rebuild the session from storage, or from defaults when nothing usable was stored.
    HydrateSession {
        /// Decoded snapshot, if any.
        snapshot: Option<SessionSnapshot>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Write the current session snapshot.
    PersistSession,
    /// Move focus into the newly focused window's primary input.
    FocusWindowInput(WindowId),
    /// Arm the fallback timer that finalizes a close if no exit-animation signal arrives.
    ScheduleCloseCleanup {
        /// Window being closed.
        window_id: WindowId,
        /// Timer delay.
        delay_ms: u32,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for actions that cannot be applied. State is unchanged when one is returned.
pub enum ReducerError {
    /// The wallpaper URL lacks an `http`, `/`, or `data:` prefix or contains characters that
    /// cannot appear unescaped inside a CSS `url("...")`.
    #[error("invalid wallpaper url `{0}`")]
    InvalidWallpaperUrl(String),
    /// No content generator is registered for the requested app.
    #[error("app `{0}` is not available")]
    AppUnavailable(String),
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// This function is the only place desktop state changes. Actions that target unknown or closing
/// windows, or that would not change anything, succeed with no effects.
///
/// # Errors
///
/// Returns [`ReducerError::InvalidWallpaperUrl`] for rejected wallpaper input and
/// [`ReducerError::AppUnavailable`] when an app or icon has no registered content generator.
pub fn reduce_desktop(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    apps: &AppRegistry,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    if appearance::reduce_appearance_action(state, &action, &mut effects)? {
        return Ok(effects);
    }

    match action {
        DesktopAction::OpenWindow(request) => {
            open_and_focus(state, apps, request, &mut effects);
        }
        DesktopAction::LaunchApp { app_id } => {
            let request = apps
                .launch_request(&app_id)
                .ok_or(ReducerError::AppUnavailable(app_id))?;
            state.overlays.close_all();
            open_and_focus(state, apps, request, &mut effects);
        }
        DesktopAction::LaunchDesktopIcon { icon_id } => {
            let Some(icon) = state.icon(&icon_id).cloned() else {
                return Ok(effects);
            };
            let request = apps
                .launch_request_for_icon(&icon)
                .ok_or(ReducerError::AppUnavailable(icon_id))?;
            desktop_icons::clear_selection(state);
            open_and_focus(state, apps, request, &mut effects);
        }
        DesktopAction::FocusWindow { window_id } => {
            let already_on_top = state.is_active(&window_id)
                && state
                    .live_window(&window_id)
                    .is_some_and(|w| w.z_index == state.highest_z_index);
            if !already_on_top && window_manager::bring_to_front(state, &window_id) {
                effects.push(RuntimeEffect::PersistSession);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::MinimizeWindow { window_id } => {
            if window_manager::minimize_window(state, &window_id) {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::MaximizeWindow { window_id } => {
            if window_manager::maximize_window(state, &window_id) {
                window_manager::bring_to_front(state, &window_id);
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::RestoreWindow { window_id } => {
            if window_manager::restore_window(state, &window_id) {
                effects.push(RuntimeEffect::PersistSession);
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
        }
        DesktopAction::ToggleMaximize { window_id } => {
            if window_manager::toggle_maximize(state, &window_id) {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::CloseWindow { window_id } => {
            if interaction.window_id() == Some(&window_id) {
                *interaction = InteractionState::Idle;
            }
            if window_manager::begin_close(state, &window_id) {
                effects.push(RuntimeEffect::ScheduleCloseCleanup {
                    window_id,
                    delay_ms: CLOSE_FALLBACK_MS,
                });
            }
        }
        DesktopAction::FinalizeClose { window_id, trigger } => {
            let was_active = state.is_active(&window_id);
            if window_manager::finish_close(state, &window_id) {
                if trigger == CloseTrigger::FallbackTimeout {
                    logging::warn!("window `{window_id}` closed by fallback timer");
                }
                effects.push(RuntimeEffect::PersistSession);
                if was_active {
                    if let Some(next) = state.active_window.clone() {
                        effects.push(RuntimeEffect::FocusWindowInput(next));
                    }
                }
            }
        }
        DesktopAction::ToggleTaskbarWindow { window_id } => {
            match taskbar::click_intent(state, &window_id) {
                Some(TaskbarClick::Restore) => {
                    window_manager::restore_window(state, &window_id);
                    effects.push(RuntimeEffect::PersistSession);
                    effects.push(RuntimeEffect::FocusWindowInput(window_id));
                }
                Some(TaskbarClick::Minimize) => {
                    window_manager::minimize_window(state, &window_id);
                    effects.push(RuntimeEffect::PersistSession);
                }
                Some(TaskbarClick::Focus) => {
                    window_manager::bring_to_front(state, &window_id);
                    effects.push(RuntimeEffect::FocusWindowInput(window_id));
                }
                None => {}
            }
        }
        DesktopAction::BeginMove { window_id, pointer } => {
            interaction::begin_window_drag(state, interaction, &window_id, pointer);
        }
        DesktopAction::BeginResize { window_id, pointer } => {
            interaction::begin_window_resize(state, interaction, &window_id, pointer);
        }
        DesktopAction::BeginIconDrag { icon_id, pointer } => {
            interaction::begin_icon_drag(state, interaction, &icon_id, pointer);
        }
        DesktopAction::PointerMove { pointer } => {
            interaction::pointer_moved(state, interaction, pointer);
        }
        DesktopAction::PointerUp { pointer } => {
            if interaction::pointer_released(state, interaction, pointer).changed_layout() {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::ToggleOverlay { kind } => {
            state.overlays.toggle(kind);
        }
        DesktopAction::CloseOverlay { kind } => {
            state.overlays.close(kind);
        }
        DesktopAction::CloseAllOverlays => state.overlays.close_all(),
        DesktopAction::OverlayTransitionEnded { kind } => {
            state.overlays.transition_finished(kind);
        }
        DesktopAction::OutsideClick { target } => {
            state.overlays.outside_click(target);
        }
        DesktopAction::OpenContextMenu {
            pointer,
            menu_width,
            menu_height,
            screen,
        } => {
            state
                .overlays
                .open_context_menu(pointer, menu_width, menu_height, screen);
        }
        DesktopAction::SelectTaskViewEntry { window_id } => {
            if window_manager::bring_to_front(state, &window_id) {
                effects.push(RuntimeEffect::FocusWindowInput(window_id));
            }
            state.overlays.close(OverlayKind::TaskView);
        }
        DesktopAction::CreateDesktopItem { kind, pointer } => {
            desktop_icons::create_desktop_item(state, kind, pointer);
            state.overlays.close(OverlayKind::ContextMenu);
            effects.push(RuntimeEffect::PersistSession);
        }
        DesktopAction::SelectIcon { icon_id, extend } => {
            state.overlays.close(OverlayKind::ContextMenu);
            desktop_icons::select_icon(state, &icon_id, extend);
        }
        DesktopAction::ClearIconSelection => {
            desktop_icons::clear_selection(state);
        }
        DesktopAction::SetAppState {
            window_id,
            app_state,
        } => {
            if window_manager::set_app_state(state, &window_id, app_state) {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::SetViewport { viewport } => {
            if window_manager::apply_viewport(state, viewport) {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::HydrateSession { snapshot } => {
            *state = DesktopState {
                viewport: state.viewport,
                ..DesktopState::default()
            };
            *interaction = InteractionState::Idle;
            let laid_out = match snapshot {
                Some(snapshot) => {
                    persistence::restore_session(state, apps, snapshot).ran_auto_layout
                }
                None => {
                    persistence::apply_defaults(state);
                    true
                }
            };
            if laid_out {
                effects.push(RuntimeEffect::PersistSession);
            }
        }
        DesktopAction::SetWallpaperUrl { .. }
        | DesktopAction::SetWallpaper { .. }
        | DesktopAction::SetAccentColor { .. } => {}
    }

    Ok(effects)
}

fn open_and_focus(
    state: &mut DesktopState,
    apps: &AppRegistry,
    request: OpenWindowRequest,
    effects: &mut Vec<RuntimeEffect>,
) {
    let window_id = window_manager::open_window(state, apps, request);
    effects.push(RuntimeEffect::PersistSession);
    effects.push(RuntimeEffect::FocusWindowInput(window_id));
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::{AppKind, ContentGenerator};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        apps,
        model::{WindowState, DEFAULT_WALLPAPER},
        overlays::OverlayPhase,
    };

    struct Harness {
        state: DesktopState,
        interaction: InteractionState,
        apps: AppRegistry,
    }

    impl Harness {
        fn new() -> Self {
            let mut harness = Self {
                state: DesktopState {
                    viewport: Viewport {
                        width: 1000,
                        height: 700,
                    },
                    ..DesktopState::default()
                },
                interaction: InteractionState::default(),
                apps: AppRegistry::builtin(),
            };
            harness
                .dispatch(DesktopAction::HydrateSession { snapshot: None })
                .expect("hydrate defaults");
            harness
        }

        fn dispatch(&mut self, action: DesktopAction) -> Result<Vec<RuntimeEffect>, ReducerError> {
            reduce_desktop(&mut self.state, &mut self.interaction, &self.apps, action)
        }

        fn launch(&mut self, app_id: &str) -> WindowId {
            self.dispatch(DesktopAction::LaunchApp {
                app_id: app_id.to_string(),
            })
            .expect("launch");
            WindowId::new(app_id)
        }
    }

    fn at(x: i32, y: i32) -> PointerPosition {
        PointerPosition { x, y }
    }

    #[test]
    fn launching_opens_focuses_and_persists() {
        let mut harness = Harness::new();
        harness
            .dispatch(DesktopAction::ToggleOverlay {
                kind: OverlayKind::StartMenu,
            })
            .expect("open start menu");

        let effects = harness
            .dispatch(DesktopAction::LaunchApp {
                app_id: "calculator".to_string(),
            })
            .expect("launch");
        let id = WindowId::new("calculator");

        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistSession,
                RuntimeEffect::FocusWindowInput(id.clone())
            ]
        );
        assert!(harness.state.is_active(&id));
        assert!(!harness.state.overlays.is_open(OverlayKind::StartMenu));
    }

    #[test]
    fn launching_unregistered_app_is_an_error() {
        let mut harness = Harness::new();
        harness.apps = AppRegistry::builtin().without_generator(ContentGenerator::Calculator);

        let err = harness
            .dispatch(DesktopAction::LaunchApp {
                app_id: "calculator".to_string(),
            })
            .expect_err("unavailable");
        assert_eq!(err, ReducerError::AppUnavailable("calculator".to_string()));
        assert!(harness.state.windows.is_empty());
    }

    #[test]
    fn taskbar_toggle_minimizes_if_focused_and_restores_if_minimized() {
        let mut harness = Harness::new();
        let win = harness.launch("notepad");

        harness
            .dispatch(DesktopAction::ToggleTaskbarWindow {
                window_id: win.clone(),
            })
            .expect("minimize");
        let record = harness.state.window(&win).expect("window");
        assert!(record.is_minimized());
        assert!(!harness.state.is_active(&win));

        let effects = harness
            .dispatch(DesktopAction::ToggleTaskbarWindow {
                window_id: win.clone(),
            })
            .expect("restore");
        assert!(!harness.state.window(&win).expect("window").is_minimized());
        assert!(harness.state.is_active(&win));
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(win)));
    }

    #[test]
    fn focusing_topmost_active_window_is_a_noop() {
        let mut harness = Harness::new();
        let first = harness.launch("notepad");
        let second = harness.launch("calculator");
        let before = harness.state.clone();

        let effects = harness
            .dispatch(DesktopAction::FocusWindow { window_id: second })
            .expect("focus");
        assert!(effects.is_empty());
        assert_eq!(harness.state, before);

        let effects = harness
            .dispatch(DesktopAction::FocusWindow {
                window_id: first.clone(),
            })
            .expect("focus other");
        assert!(effects.contains(&RuntimeEffect::FocusWindowInput(first.clone())));
        assert!(harness.state.is_active(&first));
    }

    #[test]
    fn close_schedules_fallback_and_finalizes_once() {
        let mut harness = Harness::new();
        let notepad = harness.launch("notepad");
        let calculator = harness.launch("calculator");

        let effects = harness
            .dispatch(DesktopAction::CloseWindow {
                window_id: calculator.clone(),
            })
            .expect("close");
        assert_eq!(
            effects,
            vec![RuntimeEffect::ScheduleCloseCleanup {
                window_id: calculator.clone(),
                delay_ms: CLOSE_FALLBACK_MS,
            }]
        );
        assert!(harness.state.window(&calculator).is_some());

        let effects = harness
            .dispatch(DesktopAction::FinalizeClose {
                window_id: calculator.clone(),
                trigger: CloseTrigger::ExitAnimationEnded,
            })
            .expect("finalize");
        assert_eq!(
            effects,
            vec![
                RuntimeEffect::PersistSession,
                RuntimeEffect::FocusWindowInput(notepad.clone())
            ]
        );

        let late = harness
            .dispatch(DesktopAction::FinalizeClose {
                window_id: calculator.clone(),
                trigger: CloseTrigger::FallbackTimeout,
            })
            .expect("late fallback");
        assert!(late.is_empty());
        assert!(harness.state.window(&calculator).is_none());
        assert!(harness.state.is_active(&notepad));
    }

    #[test]
    fn closing_unknown_window_is_a_silent_noop() {
        let mut harness = Harness::new();
        harness.launch("notepad");
        let before = harness.state.clone();

        let effects = harness
            .dispatch(DesktopAction::CloseWindow {
                window_id: WindowId::new("ghost"),
            })
            .expect("noop");
        assert!(effects.is_empty());
        assert_eq!(harness.state, before);
    }

    #[test]
    fn minimizing_top_window_focuses_next_highest_with_higher_z() {
        let mut harness = Harness::new();
        let b = harness.launch("notepad");
        let a = harness.launch("calculator");
        let a_z = harness.state.window(&a).expect("a").z_index;

        harness
            .dispatch(DesktopAction::MinimizeWindow {
                window_id: a.clone(),
            })
            .expect("minimize");
        assert!(harness.state.is_active(&b));
        assert!(harness.state.window(&b).expect("b").z_index > a_z);
    }

    #[test]
    fn drag_to_left_edge_snaps_and_persists() {
        let mut harness = Harness::new();
        let win = harness.launch("notepad");
        let start = harness.state.window(&win).expect("window").bounds;
        let grab = at(start.left + 100, start.top + 10);

        harness
            .dispatch(DesktopAction::BeginMove {
                window_id: win.clone(),
                pointer: grab,
            })
            .expect("begin");
        harness
            .dispatch(DesktopAction::PointerMove { pointer: at(3, 200) })
            .expect("move");
        let effects = harness
            .dispatch(DesktopAction::PointerUp { pointer: at(3, 200) })
            .expect("release");

        assert_eq!(effects, vec![RuntimeEffect::PersistSession]);
        let window = harness.state.window(&win).expect("window");
        assert_eq!(window.state, WindowState::SnappedLeft);
        assert!(!window.is_resizable());
        assert!(harness.interaction.is_idle());
    }

    #[test]
    fn stray_pointer_up_does_not_persist() {
        let mut harness = Harness::new();
        let effects = harness
            .dispatch(DesktopAction::PointerUp { pointer: at(1, 1) })
            .expect("release");
        assert!(effects.is_empty());
    }

    #[test]
    fn closing_dragged_window_ends_the_session() {
        let mut harness = Harness::new();
        let win = harness.launch("notepad");
        let bounds = harness.state.window(&win).expect("window").bounds;
        harness
            .dispatch(DesktopAction::BeginMove {
                window_id: win.clone(),
                pointer: at(bounds.left + 50, bounds.top + 10),
            })
            .expect("begin");
        harness
            .dispatch(DesktopAction::CloseWindow { window_id: win })
            .expect("close");
        assert!(harness.interaction.is_idle());
    }

    #[test]
    fn invalid_wallpaper_url_is_rejected_without_change() {
        let mut harness = Harness::new();
        let err = harness
            .dispatch(DesktopAction::SetWallpaperUrl {
                url: "ftp://example.com/a.png".to_string(),
            })
            .expect_err("rejected");
        assert!(matches!(err, ReducerError::InvalidWallpaperUrl(_)));
        assert_eq!(harness.state.theme.wallpaper, DEFAULT_WALLPAPER);

        let effects = harness
            .dispatch(DesktopAction::SetWallpaperUrl {
                url: "  https://example.com/a.png ".to_string(),
            })
            .expect("accepted");
        assert_eq!(effects, vec![RuntimeEffect::PersistSession]);
        assert_eq!(
            harness.state.theme.wallpaper,
            "url(\"https://example.com/a.png\")"
        );
    }

    #[test]
    fn empty_theme_values_fall_back_to_defaults() {
        let mut harness = Harness::new();
        harness
            .dispatch(DesktopAction::SetAccentColor {
                color: "#e81123".to_string(),
            })
            .expect("accent");
        assert_eq!(harness.state.theme.accent_color, "#e81123");
        harness
            .dispatch(DesktopAction::SetAccentColor {
                color: String::new(),
            })
            .expect("reset");
        assert_eq!(
            harness.state.theme.accent_color,
            crate::model::DEFAULT_ACCENT_COLOR
        );
        assert_eq!(
            wallpaper_css_from_url("/img/bg.png").expect("relative"),
            "url(\"/img/bg.png\")"
        );
        assert!(wallpaper_css_from_url("data:image/png;base64,AAAA").is_ok());
        assert!(wallpaper_css_from_url("").is_err());
    }

    #[test]
    fn wallpaper_url_that_would_escape_css_is_rejected() {
        let mut harness = Harness::new();
        for url in [
            "https://x/a.png\"),url(https://evil/b.png",
            "/bg.png\\\"",
            "http://x/a b.png",
            "/img/it's.png",
        ] {
            let err = harness
                .dispatch(DesktopAction::SetWallpaperUrl {
                    url: url.to_string(),
                })
                .expect_err("rejected");
            assert_eq!(err, ReducerError::InvalidWallpaperUrl(url.to_string()));
        }
        assert_eq!(harness.state.theme.wallpaper, DEFAULT_WALLPAPER);
        assert_eq!(
            wallpaper_css_from_url("https://cdn.example.com/bg-1.jpg?w=1920&h=1080")
                .expect("plain url"),
            "url(\"https://cdn.example.com/bg-1.jpg?w=1920&h=1080\")"
        );
    }

    #[test]
    fn new_item_closes_context_menu_and_selects_item() {
        let mut harness = Harness::new();
        harness
            .dispatch(DesktopAction::OpenContextMenu {
                pointer: at(300, 300),
                menu_width: 200,
                menu_height: 250,
                screen: Viewport {
                    width: 1000,
                    height: 748,
                },
            })
            .expect("menu");
        assert!(harness.state.overlays.is_open(OverlayKind::ContextMenu));

        let effects = harness
            .dispatch(DesktopAction::CreateDesktopItem {
                kind: NewItemKind::NewTextDocument,
                pointer: at(300, 300),
            })
            .expect("create");
        assert_eq!(effects, vec![RuntimeEffect::PersistSession]);
        assert!(!harness.state.overlays.is_displayed(OverlayKind::ContextMenu));
        assert_eq!(harness.state.selected_icons, vec!["dt-item-1000".to_string()]);

        harness
            .dispatch(DesktopAction::LaunchDesktopIcon {
                icon_id: "dt-item-1000".to_string(),
            })
            .expect("launch item");
        let window = harness
            .state
            .window(&WindowId::new("dt-item-1000"))
            .expect("text document window");
        assert_eq!(window.app_kind, AppKind::Notepad);
        assert!(harness.state.selected_icons.is_empty());
    }

    #[test]
    fn task_view_selection_focuses_window_and_waits_for_transition() {
        let mut harness = Harness::new();
        let notepad = harness.launch("notepad");
        harness.launch("calculator");
        harness
            .dispatch(DesktopAction::ToggleOverlay {
                kind: OverlayKind::TaskView,
            })
            .expect("open task view");

        harness
            .dispatch(DesktopAction::SelectTaskViewEntry {
                window_id: notepad.clone(),
            })
            .expect("select");
        assert!(harness.state.is_active(&notepad));
        assert_eq!(
            harness.state.overlays.phase(OverlayKind::TaskView),
            OverlayPhase::Closing
        );

        harness
            .dispatch(DesktopAction::OverlayTransitionEnded {
                kind: OverlayKind::TaskView,
            })
            .expect("transition end");
        assert_eq!(
            harness.state.overlays.phase(OverlayKind::TaskView),
            OverlayPhase::Hidden
        );
    }

    #[test]
    fn hydrate_without_snapshot_lays_out_builtin_icons() {
        let harness = Harness::new();
        assert_eq!(harness.state.icons.len(), apps::builtin_desktop_icons().len());
        assert!(harness.state.icon_layout_done);
        assert!(harness.state.icons.iter().all(|icon| icon.position.is_some()));
        assert_eq!(harness.state.viewport.width, 1000);
    }

    #[test]
    fn hydrate_round_trips_through_snapshot() {
        let mut harness = Harness::new();
        let notepad = harness.launch("notepad");
        harness.launch("calculator");
        harness
            .dispatch(DesktopAction::MaximizeWindow {
                window_id: notepad.clone(),
            })
            .expect("maximize");
        let snapshot = persistence::snapshot_session(&harness.state, &harness.apps);
        let before = harness.state.clone();

        let effects = harness
            .dispatch(DesktopAction::HydrateSession {
                snapshot: Some(snapshot),
            })
            .expect("hydrate");
        assert!(effects.is_empty());
        assert_eq!(harness.state.active_window, before.active_window);
        for window in &before.windows {
            let restored = harness.state.window(&window.id).expect("restored");
            assert_eq!(restored.state, window.state);
            assert_eq!(restored.bounds, window.bounds);
        }
    }
}
