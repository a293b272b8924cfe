//! Taskbar presence: one button per live window, at most one of them active.

use chrono::NaiveDateTime;

use crate::model::{DesktopState, TaskbarButton, TaskbarButtonRef, WindowId};

/// Creates the window's taskbar button when it has none and returns its reference.
///
/// Returns `None` when the window does not exist.
pub fn ensure_button(state: &mut DesktopState, window_id: &WindowId) -> Option<TaskbarButtonRef> {
    if let Some(button_ref) = state
        .taskbar_button(window_id)
        .map(|b| b.button_ref.clone())
    {
        state.window_mut(window_id)?.taskbar_button = Some(button_ref.clone());
        return Some(button_ref);
    }

    let window = state.window(window_id)?;
    let button_ref = TaskbarButtonRef::for_window(window_id);
    let button = TaskbarButton {
        window_id: window_id.clone(),
        button_ref: button_ref.clone(),
        title: window.title.clone(),
        icon: window.icon.clone(),
        active: false,
    };
    state.taskbar.push(button);
    state.window_mut(window_id)?.taskbar_button = Some(button_ref.clone());
    Some(button_ref)
}

/// Marks the window's button active and every other button inactive.
pub fn activate_button(state: &mut DesktopState, window_id: &WindowId) {
    for button in &mut state.taskbar {
        button.active = &button.window_id == window_id;
    }
}

pub fn deactivate_button(state: &mut DesktopState, window_id: &WindowId) {
    if let Some(button) = state
        .taskbar
        .iter_mut()
        .find(|b| &b.window_id == window_id)
    {
        button.active = false;
    }
}

pub fn deactivate_all(state: &mut DesktopState) {
    for button in &mut state.taskbar {
        button.active = false;
    }
}

/// Deletes the window's button and clears the window's back-reference.
///
/// The button is looked up by window id, so this also works after the window record is gone.
/// Returns `false` when there was nothing to remove.
pub fn remove_button(state: &mut DesktopState, window_id: &WindowId) -> bool {
    let before = state.taskbar.len();
    state.taskbar.retain(|b| &b.window_id != window_id);
    if let Some(window) = state.window_mut(window_id) {
        window.taskbar_button = None;
    }
    state.taskbar.len() != before
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskbarClick {
    Restore,
    Minimize,
    Focus,
}

/// What clicking the window's taskbar button should do.
pub fn click_intent(state: &DesktopState, window_id: &WindowId) -> Option<TaskbarClick> {
    let window = state.live_window(window_id)?;
    Some(if window.is_minimized() {
        TaskbarClick::Restore
    } else if state.is_active(window_id) {
        TaskbarClick::Minimize
    } else {
        TaskbarClick::Focus
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockReading {
    pub time: String,
    pub date: String,
}

/// Formats the system-tray clock: `3:07 PM` over `10/19/2026`.
pub fn clock_reading(now: NaiveDateTime) -> ClockReading {
    ClockReading {
        time: now.format("%-I:%M %p").to_string(),
        date: now.format("%-m/%-d/%Y").to_string(),
    }
}
