//! Modal pointer sessions: window drag, window resize, and desktop icon drag.
//!
//! Only one session can be active at a time. A new session is refused until the current one ends,
//! and pointer release always ends it.

use crate::{
    desktop_icons,
    geometry::{self, ResizeEdge, SnapZone},
    model::{DesktopState, PointerPosition, Viewport, WindowBounds, WindowId, WindowState},
    window_manager,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub window_id: WindowId,
    /// Pointer position relative to the window's top-left corner.
    pub grab_offset: PointerPosition,
    pub snap_preview: Option<SnapZone>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub window_id: WindowId,
    pub edge: ResizeEdge,
    pub pointer_start: PointerPosition,
    pub bounds_start: WindowBounds,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDragSession {
    pub icon_id: String,
    pub grab_offset: PointerPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging(DragSession),
    Resizing(ResizeSession),
    DraggingIcon(IconDragSession),
}

impl InteractionState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Window targeted by the current drag or resize.
    pub fn window_id(&self) -> Option<&WindowId> {
        match self {
            Self::Dragging(session) => Some(&session.window_id),
            Self::Resizing(session) => Some(&session.window_id),
            Self::Idle | Self::DraggingIcon(_) => None,
        }
    }

    /// Bounds of the snap hint to render while dragging over a snap zone.
    pub fn snap_preview_bounds(&self, viewport: Viewport) -> Option<WindowBounds> {
        match self {
            Self::Dragging(DragSession {
                snap_preview: Some(zone),
                ..
            }) => Some(geometry::snap_bounds(*zone, viewport)),
            _ => None,
        }
    }
}

/// Result of ending a session at pointer release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    NoSession,
    Moved(WindowId),
    Snapped(WindowId, SnapZone),
    Resized(WindowId),
    IconDropped(String),
}

impl SessionOutcome {
    /// Whether the release changed persisted layout.
    pub fn changed_layout(&self) -> bool {
        !matches!(self, Self::NoSession)
    }
}

fn offset_from(pointer: PointerPosition, bounds: WindowBounds) -> PointerPosition {
    PointerPosition {
        x: pointer.x.saturating_sub(bounds.left),
        y: pointer.y.saturating_sub(bounds.top),
    }
}

/// Starts dragging a window by its title bar and brings it to front.
///
/// Refused while another session is active and for minimized or maximized windows.
pub fn begin_window_drag(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
    pointer: PointerPosition,
) -> bool {
    if !interaction.is_idle() {
        return false;
    }
    let Some(window) = state.live_window(window_id) else {
        return false;
    };
    if matches!(
        window.state,
        WindowState::Minimized | WindowState::Maximized
    ) {
        return false;
    }
    let grab_offset = offset_from(pointer, window.bounds);
    window_manager::bring_to_front(state, window_id);
    *interaction = InteractionState::Dragging(DragSession {
        window_id: window_id.clone(),
        grab_offset,
        snap_preview: None,
    });
    true
}

/// Starts resizing when `pointer` sits on the window's resize band.
///
/// Returns the grabbed edge, or `None` when no session started.
pub fn begin_window_resize(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    window_id: &WindowId,
    pointer: PointerPosition,
) -> Option<ResizeEdge> {
    if !interaction.is_idle() {
        return None;
    }
    let window = state.live_window(window_id)?;
    let bounds_start = window.bounds;
    let edge = geometry::resize_edge_at(bounds_start, window.state, pointer)?;
    window_manager::bring_to_front(state, window_id);
    *interaction = InteractionState::Resizing(ResizeSession {
        window_id: window_id.clone(),
        edge,
        pointer_start: pointer,
        bounds_start,
    });
    Some(edge)
}

/// Cursor to show for `pointer` over a window: the active resize edge while resizing, otherwise
/// the edge under the pointer. `None` means the default cursor.
pub fn resize_cursor(
    state: &DesktopState,
    interaction: &InteractionState,
    window_id: &WindowId,
    pointer: PointerPosition,
) -> Option<&'static str> {
    if let InteractionState::Resizing(session) = interaction {
        return Some(session.edge.cursor());
    }
    let window = state.live_window(window_id)?;
    geometry::resize_edge_at(window.bounds, window.state, pointer).map(ResizeEdge::cursor)
}

/// Starts dragging a desktop icon.
pub fn begin_icon_drag(
    state: &DesktopState,
    interaction: &mut InteractionState,
    icon_id: &str,
    pointer: PointerPosition,
) -> bool {
    if !interaction.is_idle() {
        return false;
    }
    let Some(icon) = state.icon(icon_id) else {
        return false;
    };
    let origin = icon.position.unwrap_or_default();
    *interaction = InteractionState::DraggingIcon(IconDragSession {
        icon_id: icon_id.to_string(),
        grab_offset: PointerPosition {
            x: pointer.x - origin.left,
            y: pointer.y - origin.top,
        },
    });
    true
}

/// Advances the active session. Returns `true` when window geometry changed.
///
/// A session whose window disappeared ends here.
pub fn pointer_moved(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) -> bool {
    let changed = match interaction {
        InteractionState::Dragging(session) => drag_to(state, session, pointer),
        InteractionState::Resizing(session) => resize_to(state, session, pointer),
        InteractionState::Idle | InteractionState::DraggingIcon(_) => return false,
    };
    if changed.is_none() {
        *interaction = InteractionState::Idle;
    }
    changed.unwrap_or(false)
}

fn drag_to(
    state: &mut DesktopState,
    session: &mut DragSession,
    pointer: PointerPosition,
) -> Option<bool> {
    let window = state.live_window(&session.window_id)?;
    if window.state.is_snapped() {
        window_manager::restore_window(state, &session.window_id);
        let restored = state.live_window(&session.window_id)?;
        session.grab_offset = offset_from(pointer, restored.bounds);
    }

    let viewport = state.viewport;
    session.snap_preview = geometry::detect_snap_zone(pointer, viewport);
    let window = state.live_window_mut(&session.window_id)?;
    if window.state != WindowState::Normal {
        return Some(false);
    }
    let (left, top) =
        geometry::drag_origin(pointer, session.grab_offset, window.bounds.width, viewport);
    let moved = window.bounds.with_origin(left, top);
    let changed = moved != window.bounds;
    window.bounds = moved;
    Some(changed)
}

fn resize_to(
    state: &mut DesktopState,
    session: &ResizeSession,
    pointer: PointerPosition,
) -> Option<bool> {
    let viewport = state.viewport;
    let window = state.live_window_mut(&session.window_id)?;
    if !window.is_resizable() {
        return None;
    }
    let resized = geometry::resize_bounds(
        session.bounds_start,
        session.edge,
        pointer.x - session.pointer_start.x,
        pointer.y - session.pointer_start.y,
        viewport,
    );
    let changed = resized != window.bounds;
    window.bounds = resized;
    Some(changed)
}

/// Ends the active session, committing a previewed snap or an icon drop.
pub fn pointer_released(
    state: &mut DesktopState,
    interaction: &mut InteractionState,
    pointer: PointerPosition,
) -> SessionOutcome {
    match std::mem::take(interaction) {
        InteractionState::Idle => SessionOutcome::NoSession,
        InteractionState::Dragging(session) => {
            let committed = session
                .snap_preview
                .and_then(|zone| geometry::commit_snap_zone(zone, pointer, state.viewport));
            match committed {
                Some(zone) if window_manager::snap_window(state, &session.window_id, zone) => {
                    SessionOutcome::Snapped(session.window_id, zone)
                }
                _ => SessionOutcome::Moved(session.window_id),
            }
        }
        InteractionState::Resizing(session) => SessionOutcome::Resized(session.window_id),
        InteractionState::DraggingIcon(session) => {
            if desktop_icons::drop_icon(state, &session.icon_id, pointer, session.grab_offset) {
                SessionOutcome::IconDropped(session.icon_id)
            } else {
                SessionOutcome::NoSession
            }
        }
    }
}
