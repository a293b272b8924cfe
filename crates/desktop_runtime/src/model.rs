use desktop_app_contract::{AppKind, ContentGenerator};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::overlays::OverlayState;

pub const DEFAULT_WALLPAPER: &str = "url(\"wallpaper.jpg\")";
pub const DEFAULT_ACCENT_COLOR: &str = "#0078d4";
/// Floor of the z-index counter; the first focused window gets `INITIAL_Z_INDEX + 1`.
pub const INITIAL_Z_INDEX: u64 = 10;
pub const FIRST_DESKTOP_ITEM_ID: u64 = 1000;
pub const TASKBAR_HEIGHT: i32 = 48;
pub const DEFAULT_VIEWPORT_WIDTH: i32 = 1280;
pub const DEFAULT_VIEWPORT_HEIGHT: i32 = 800 - TASKBAR_HEIGHT;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WindowId(pub String);

impl WindowId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn sequence(n: u64) -> Self {
        Self(format!("window-{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WindowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WindowId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WindowState {
    #[default]
    Normal,
    Minimized,
    Maximized,
    SnappedLeft,
    SnappedRight,
}

impl WindowState {
    pub fn is_snapped(self) -> bool {
        matches!(self, Self::SnappedLeft | Self::SnappedRight)
    }

    /// Maximized and snapped windows keep `original_bounds` to return to.
    pub fn holds_original_bounds(self) -> bool {
        self == Self::Maximized || self.is_snapped()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowBounds {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl WindowBounds {
    pub fn with_origin(self, left: i32, top: i32) -> Self {
        Self { left, top, ..self }
    }

    pub fn clamped_min(self, min_width: i32, min_height: i32) -> Self {
        Self {
            width: self.width.max(min_width),
            height: self.height.max(min_height),
            ..self
        }
    }
}

/// Window container bounds; the container origin is always `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: i32,
    pub height: i32,
}

impl Viewport {
    pub fn full_bounds(self) -> WindowBounds {
        WindowBounds {
            left: 0,
            top: 0,
            width: self.width,
            height: self.height,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaximizeControl {
    Maximize,
    Restore,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskbarButtonRef(pub String);

impl TaskbarButtonRef {
    pub fn for_window(window_id: &WindowId) -> Self {
        Self(format!("taskbar-btn-{window_id}"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WindowRecord {
    pub id: WindowId,
    pub title: String,
    pub icon: String,
    pub app_kind: AppKind,
    pub content_generator: Option<ContentGenerator>,
    pub content: String,
    pub app_state: Value,
    pub state: WindowState,
    pub bounds: WindowBounds,
    pub original_bounds: Option<WindowBounds>,
    pub z_index: u64,
    pub taskbar_button: Option<TaskbarButtonRef>,
    pub closing: bool,
}

impl WindowRecord {
    pub fn is_resizable(&self) -> bool {
        self.state == WindowState::Normal
    }

    pub fn is_minimized(&self) -> bool {
        self.state == WindowState::Minimized
    }

    pub fn maximize_control(&self) -> MaximizeControl {
        if self.state == WindowState::Maximized {
            MaximizeControl::Restore
        } else {
            MaximizeControl::Maximize
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskbarButton {
    pub window_id: WindowId,
    pub button_ref: TaskbarButtonRef,
    pub title: String,
    pub icon: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopTheme {
    pub wallpaper: String,
    pub accent_color: String,
}

impl Default for DesktopTheme {
    fn default() -> Self {
        Self {
            wallpaper: DEFAULT_WALLPAPER.to_string(),
            accent_color: DEFAULT_ACCENT_COLOR.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IconPosition {
    pub left: i32,
    pub top: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesktopIcon {
    pub id: String,
    pub title: String,
    pub label: String,
    pub icon: String,
    pub dynamic: bool,
    pub position: Option<IconPosition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OpenWindowRequest {
    pub id: Option<WindowId>,
    pub title: String,
    pub icon: String,
    pub app_kind: AppKind,
    pub content_generator: Option<ContentGenerator>,
    pub content: String,
    pub width: i32,
    pub height: i32,
    pub left: Option<i32>,
    pub top: Option<i32>,
    pub saved_content: Option<String>,
}

impl OpenWindowRequest {
    pub fn new(title: impl Into<String>, app_kind: AppKind, width: i32, height: i32) -> Self {
        Self {
            id: None,
            title: title.into(),
            icon: String::new(),
            app_kind,
            content_generator: None,
            content: String::new(),
            width,
            height,
            left: None,
            top: None,
            saved_content: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DesktopState {
    pub windows: Vec<WindowRecord>,
    pub active_window: Option<WindowId>,
    pub taskbar: Vec<TaskbarButton>,
    pub icons: Vec<DesktopIcon>,
    pub selected_icons: Vec<String>,
    pub icon_layout_done: bool,
    pub next_window_id: u64,
    pub next_desktop_item_id: u64,
    pub highest_z_index: u64,
    pub theme: DesktopTheme,
    pub viewport: Viewport,
    pub overlays: OverlayState,
}

impl Default for DesktopState {
    fn default() -> Self {
        Self {
            windows: Vec::new(),
            active_window: None,
            taskbar: Vec::new(),
            icons: Vec::new(),
            selected_icons: Vec::new(),
            icon_layout_done: false,
            next_window_id: 1,
            next_desktop_item_id: FIRST_DESKTOP_ITEM_ID,
            highest_z_index: INITIAL_Z_INDEX,
            theme: DesktopTheme::default(),
            viewport: Viewport::default(),
            overlays: OverlayState::default(),
        }
    }
}

impl DesktopState {
    pub fn window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.windows.iter().find(|w| &w.id == window_id)
    }

    pub fn window_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.windows.iter_mut().find(|w| &w.id == window_id)
    }

    /// Returns the window unless it is absent or already playing its exit animation.
    pub fn live_window(&self, window_id: &WindowId) -> Option<&WindowRecord> {
        self.window(window_id).filter(|w| !w.closing)
    }

    pub fn live_window_mut(&mut self, window_id: &WindowId) -> Option<&mut WindowRecord> {
        self.window_mut(window_id).filter(|w| !w.closing)
    }

    pub fn is_active(&self, window_id: &WindowId) -> bool {
        self.active_window.as_ref() == Some(window_id)
    }

    pub fn taskbar_button(&self, window_id: &WindowId) -> Option<&TaskbarButton> {
        self.taskbar.iter().find(|b| &b.window_id == window_id)
    }

    pub fn icon(&self, icon_id: &str) -> Option<&DesktopIcon> {
        self.icons.iter().find(|icon| icon.id == icon_id)
    }

    /// Highest-z live, non-minimized window other than `excluding`.
    pub fn topmost_visible_window(&self, excluding: Option<&WindowId>) -> Option<WindowId> {
        self.windows
            .iter()
            .filter(|w| !w.closing && !w.is_minimized() && Some(&w.id) != excluding)
            .max_by_key(|w| w.z_index)
            .map(|w| w.id.clone())
    }
}
