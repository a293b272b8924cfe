//! Window registry operations and the per-window lifecycle state machine.
//!
//! Every transition is a no-op (returning `false`) when the window is unknown, already closing,
//! or already in the requested state. Focus is a single `active_window` slot plus a monotonic
//! z-index counter that is never renormalized.

use serde_json::Value;

use crate::{
    apps::AppRegistry,
    geometry::{self, SnapZone},
    model::{
        DesktopState, OpenWindowRequest, Viewport, WindowBounds, WindowId, WindowRecord,
        WindowState,
    },
    taskbar,
};

/// Opens a window, or surfaces the existing one when `request.id` is already live.
///
/// Minimized duplicates are restored; visible ones are brought to front. New windows get a
/// taskbar button, focus, and a fresh z-index.
pub fn open_window(
    state: &mut DesktopState,
    apps: &AppRegistry,
    request: OpenWindowRequest,
) -> WindowId {
    if let Some(id) = request.id.as_ref() {
        if let Some(existing) = state.live_window(id) {
            let id = existing.id.clone();
            if existing.is_minimized() {
                restore_window(state, &id);
            } else {
                bring_to_front(state, &id);
            }
            return id;
        }
        // A window still animating out under the same id is finalized now; its pending cleanup
        // becomes a no-op because the replacement is not closing.
        finish_close(state, id);
    }

    let id = match request.id {
        Some(id) => id,
        None => {
            let id = WindowId::sequence(state.next_window_id);
            state.next_window_id = state.next_window_id.saturating_add(1);
            id
        }
    };

    let width = request.width.max(geometry::MIN_WINDOW_WIDTH);
    let height = request.height.max(geometry::MIN_WINDOW_HEIGHT);
    let (cascade_left, cascade_top) =
        geometry::cascade_origin(state.windows.len(), width, height, state.viewport);
    let bounds = geometry::clamp_creation_bounds(
        WindowBounds {
            left: request.left.unwrap_or(cascade_left),
            top: request.top.unwrap_or(cascade_top),
            width,
            height,
        },
        state.viewport,
    );

    let app_state = match (
        request.saved_content.as_deref(),
        apps.stateful_hook(request.app_kind),
    ) {
        (Some(saved), Some(hook)) => hook.inject(saved),
        _ => Value::Null,
    };

    state.windows.push(WindowRecord {
        id: id.clone(),
        title: request.title,
        icon: request.icon,
        app_kind: request.app_kind,
        content_generator: request.content_generator,
        content: request.content,
        app_state,
        state: WindowState::Normal,
        bounds,
        original_bounds: None,
        z_index: 0,
        taskbar_button: None,
        closing: false,
    });
    taskbar::ensure_button(state, &id);
    bring_to_front(state, &id);
    id
}

/// Gives the window focus and the next z-index. Minimized windows are restored instead.
pub fn bring_to_front(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.live_window(window_id) else {
        return false;
    };
    if window.is_minimized() {
        return restore_window(state, window_id);
    }

    state.highest_z_index = state.highest_z_index.saturating_add(1);
    let z_index = state.highest_z_index;
    if let Some(window) = state.window_mut(window_id) {
        window.z_index = z_index;
    }
    state.active_window = Some(window_id.clone());
    taskbar::activate_button(state, window_id);
    true
}

/// Minimizes the window, handing focus to the topmost remaining visible window if it had it.
pub fn minimize_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    if window.is_minimized() {
        return false;
    }
    window.state = WindowState::Minimized;
    taskbar::deactivate_button(state, window_id);

    if state.is_active(window_id) {
        state.active_window = None;
        if let Some(next) = state.topmost_visible_window(Some(window_id)) {
            bring_to_front(state, &next);
        }
    }
    true
}

/// Maximizes a normal or snapped window to the full container without changing focus.
///
/// A snapped window keeps the normal bounds captured before it snapped.
pub fn maximize_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let viewport = state.viewport;
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    if matches!(window.state, WindowState::Maximized | WindowState::Minimized) {
        return false;
    }
    if window.state == WindowState::Normal || window.original_bounds.is_none() {
        window.original_bounds = Some(window.bounds);
    }
    window.state = WindowState::Maximized;
    window.bounds = viewport.full_bounds();
    true
}

/// Snaps the window into `zone` without changing focus. The top zone maximizes.
pub fn snap_window(state: &mut DesktopState, window_id: &WindowId, zone: SnapZone) -> bool {
    if zone == SnapZone::Top {
        return maximize_window(state, window_id);
    }
    let viewport = state.viewport;
    let target = zone.target_state();
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    if window.is_minimized() || window.state == target {
        return false;
    }
    if window.state == WindowState::Normal || window.original_bounds.is_none() {
        window.original_bounds = Some(window.bounds);
    }
    window.state = target;
    window.bounds = geometry::snap_bounds(zone, viewport);
    true
}

/// Returns the window to `normal` and brings it to front.
///
/// Minimized windows keep their last geometry, so a window minimized while maximized comes back
/// normal but container-sized. Maximized and snapped windows return to their captured original
/// bounds, or to [`geometry::default_restore_bounds`] when none were captured.
pub fn restore_window(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let viewport = state.viewport;
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    match window.state {
        WindowState::Normal => {}
        WindowState::Minimized => window.state = WindowState::Normal,
        WindowState::Maximized | WindowState::SnappedLeft | WindowState::SnappedRight => {
            window.bounds = window
                .original_bounds
                .take()
                .unwrap_or_else(|| geometry::default_restore_bounds(viewport));
            window.state = WindowState::Normal;
        }
    }
    bring_to_front(state, window_id)
}

/// Title-bar double-click and maximize-control behavior.
pub fn toggle_maximize(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(current) = state.live_window(window_id).map(|w| w.state) else {
        return false;
    };
    match current {
        WindowState::Maximized => restore_window(state, window_id),
        WindowState::Minimized => false,
        _ => {
            maximize_window(state, window_id);
            bring_to_front(state, window_id)
        }
    }
}

/// Starts the exit animation. The record stays registered until [`finish_close`].
pub fn begin_close(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    window.closing = true;
    true
}

/// Removes a closing window and its taskbar button. Runs at most once per close: any call for a
/// window that is not closing returns `false`.
pub fn finish_close(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let Some(index) = state
        .windows
        .iter()
        .position(|w| &w.id == window_id && w.closing)
    else {
        return false;
    };
    state.windows.remove(index);
    taskbar::remove_button(state, window_id);

    if state.is_active(window_id) {
        state.active_window = None;
        if let Some(next) = state.topmost_visible_window(None) {
            bring_to_front(state, &next);
        }
    }
    true
}

/// Focuses the topmost visible window, or clears focus when every window is minimized.
pub fn focus_topmost(state: &mut DesktopState) {
    match state.topmost_visible_window(None) {
        Some(top) => {
            bring_to_front(state, &top);
        }
        None => {
            state.active_window = None;
            taskbar::deactivate_all(state);
        }
    }
}

/// Replaces a window's live app payload.
pub fn set_app_state(state: &mut DesktopState, window_id: &WindowId, app_state: Value) -> bool {
    let Some(window) = state.live_window_mut(window_id) else {
        return false;
    };
    if window.app_state == app_state {
        return false;
    }
    window.app_state = app_state;
    true
}

/// Records new container bounds and refits maximized and snapped windows to them.
pub fn apply_viewport(state: &mut DesktopState, viewport: Viewport) -> bool {
    if state.viewport == viewport {
        return false;
    }
    state.viewport = viewport;
    for window in &mut state.windows {
        if let Some(zone) = SnapZone::from_state(window.state) {
            window.bounds = geometry::snap_bounds(zone, viewport);
        }
    }
    true
}
