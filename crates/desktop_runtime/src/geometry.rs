//! Pure window geometry: drag clamping, edge resizing, snap zones, and placement.
//!
//! Every function here is side-effect free and works in window-container coordinates, where
//! `(0, 0)` is the container's top-left corner.

use crate::model::{PointerPosition, Viewport, WindowBounds, WindowState};

/// Minimum managed window width.
pub const MIN_WINDOW_WIDTH: i32 = 250;
/// Minimum managed window height.
pub const MIN_WINDOW_HEIGHT: i32 = 150;
/// Pointer distance (px) from a container edge that arms a snap preview.
pub const SNAP_MARGIN: i32 = 10;
/// Pointer distance (px) from a container edge within which a release commits the snap.
pub const SNAP_RELEASE_THRESHOLD: i32 = 50;
/// Width (px) of the pointer-sensitive resize band around a window.
pub const RESIZE_BORDER: i32 = 8;
/// Height of a window title bar; dragging never pushes it below the container.
pub const TITLE_BAR_HEIGHT: i32 = 32;
/// Horizontal pixels of a dragged window that stay inside the container on the left.
const DRAG_MIN_VISIBLE: i32 = 80;
/// Gap kept between a dragged window's left edge and the container's right edge.
const DRAG_RIGHT_GUTTER: i32 = 40;
/// Resize may push the left edge this far past `-min_width`.
const RESIZE_EDGE_ALLOWANCE: i32 = 50;
const CASCADE_STEP: i32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapZone {
    Top,
    Left,
    Right,
}

impl SnapZone {
    pub fn target_state(self) -> WindowState {
        match self {
            Self::Top => WindowState::Maximized,
            Self::Left => WindowState::SnappedLeft,
            Self::Right => WindowState::SnappedRight,
        }
    }

    pub fn from_state(state: WindowState) -> Option<Self> {
        match state {
            WindowState::Maximized => Some(Self::Top),
            WindowState::SnappedLeft => Some(Self::Left),
            WindowState::SnappedRight => Some(Self::Right),
            WindowState::Normal | WindowState::Minimized => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeEdge {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeEdge {
    fn moves_left(self) -> bool {
        matches!(self, Self::West | Self::NorthWest | Self::SouthWest)
    }

    fn moves_right(self) -> bool {
        matches!(self, Self::East | Self::NorthEast | Self::SouthEast)
    }

    fn moves_top(self) -> bool {
        matches!(self, Self::North | Self::NorthEast | Self::NorthWest)
    }

    fn moves_bottom(self) -> bool {
        matches!(self, Self::South | Self::SouthEast | Self::SouthWest)
    }

    /// CSS cursor token for hover feedback.
    pub fn cursor(self) -> &'static str {
        match self {
            Self::North => "n-resize",
            Self::South => "s-resize",
            Self::East => "e-resize",
            Self::West => "w-resize",
            Self::NorthEast => "ne-resize",
            Self::NorthWest => "nw-resize",
            Self::SouthEast => "se-resize",
            Self::SouthWest => "sw-resize",
        }
    }
}

/// Returns the snap zone armed by the pointer during a drag. Top wins over the side edges.
pub fn detect_snap_zone(pointer: PointerPosition, viewport: Viewport) -> Option<SnapZone> {
    if pointer.y < SNAP_MARGIN {
        Some(SnapZone::Top)
    } else if pointer.x < SNAP_MARGIN {
        Some(SnapZone::Left)
    } else if pointer.x > viewport.width - SNAP_MARGIN {
        Some(SnapZone::Right)
    } else {
        None
    }
}

/// Confirms a previewed zone at pointer release; the pointer must still be near that edge.
pub fn commit_snap_zone(
    previewed: SnapZone,
    pointer: PointerPosition,
    viewport: Viewport,
) -> Option<SnapZone> {
    let still_near = match previewed {
        SnapZone::Top => pointer.y < SNAP_RELEASE_THRESHOLD,
        SnapZone::Left => pointer.x < SNAP_RELEASE_THRESHOLD,
        SnapZone::Right => pointer.x > viewport.width - SNAP_RELEASE_THRESHOLD,
    };
    still_near.then_some(previewed)
}

/// Bounds a window occupies in `zone`.
pub fn snap_bounds(zone: SnapZone, viewport: Viewport) -> WindowBounds {
    let half = viewport.width / 2;
    match zone {
        SnapZone::Top => viewport.full_bounds(),
        SnapZone::Left => WindowBounds {
            left: 0,
            top: 0,
            width: half,
            height: viewport.height,
        },
        SnapZone::Right => WindowBounds {
            left: half,
            top: 0,
            width: viewport.width - half,
            height: viewport.height,
        },
    }
}

/// Window origin for a pointer at `pointer` grabbing the window at `grab_offset`.
///
/// The window may hang off the left edge but keeps [`DRAG_MIN_VISIBLE`] pixels inside, never
/// rises above the container, and never drops its title bar below it.
pub fn drag_origin(
    pointer: PointerPosition,
    grab_offset: PointerPosition,
    width: i32,
    viewport: Viewport,
) -> (i32, i32) {
    let min_x = -width + DRAG_MIN_VISIBLE;
    let max_x = (viewport.width - DRAG_RIGHT_GUTTER).max(min_x);
    let max_y = (viewport.height - TITLE_BAR_HEIGHT).max(0);
    let x = (pointer.x - grab_offset.x).clamp(min_x, max_x);
    let y = (pointer.y - grab_offset.y).clamp(0, max_y);
    (x, y)
}

/// Applies a pointer delta to `start` for the grabbed edge, honoring the size floor and the
/// container boundary.
pub fn resize_bounds(
    start: WindowBounds,
    edge: ResizeEdge,
    dx: i32,
    dy: i32,
    viewport: Viewport,
) -> WindowBounds {
    let mut width = start.width;
    let mut height = start.height;
    let mut left = start.left;
    let mut top = start.top;

    if edge.moves_right() {
        width = (start.width + dx).max(MIN_WINDOW_WIDTH);
    }
    if edge.moves_left() {
        width = (start.width - dx).max(MIN_WINDOW_WIDTH);
        left = if width == MIN_WINDOW_WIDTH {
            start.left + start.width - MIN_WINDOW_WIDTH
        } else {
            start.left + dx
        };
    }
    if edge.moves_bottom() {
        height = (start.height + dy).max(MIN_WINDOW_HEIGHT);
    }
    if edge.moves_top() {
        height = (start.height - dy).max(MIN_WINDOW_HEIGHT);
        top = if height == MIN_WINDOW_HEIGHT {
            start.top + start.height - MIN_WINDOW_HEIGHT
        } else {
            start.top + dy
        };
    }

    let min_left = -MIN_WINDOW_WIDTH + RESIZE_EDGE_ALLOWANCE;
    if left < min_left {
        width -= min_left - left;
        left = min_left;
    }
    if top < 0 {
        height += top;
        top = 0;
    }
    let max_right = viewport.width + MIN_WINDOW_WIDTH - RESIZE_EDGE_ALLOWANCE;
    if left + width > max_right {
        width = max_right - left;
    }
    if top + height > viewport.height {
        height = viewport.height - top;
    }

    WindowBounds {
        left,
        top,
        width: width.max(MIN_WINDOW_WIDTH),
        height: height.max(MIN_WINDOW_HEIGHT),
    }
}

/// Returns the resize edge under `pointer`, or `None` for windows that cannot be resized.
pub fn resize_edge_at(
    bounds: WindowBounds,
    state: WindowState,
    pointer: PointerPosition,
) -> Option<ResizeEdge> {
    if state != WindowState::Normal {
        return None;
    }
    let x = pointer.x - bounds.left;
    let y = pointer.y - bounds.top;
    let on_left = x < RESIZE_BORDER;
    let on_right = x > bounds.width - RESIZE_BORDER;
    let on_top = y < RESIZE_BORDER;
    let on_bottom = y > bounds.height - RESIZE_BORDER;

    match (on_top, on_bottom, on_left, on_right) {
        (true, _, true, _) => Some(ResizeEdge::NorthWest),
        (true, _, _, true) => Some(ResizeEdge::NorthEast),
        (_, true, true, _) => Some(ResizeEdge::SouthWest),
        (_, true, _, true) => Some(ResizeEdge::SouthEast),
        (true, _, _, _) => Some(ResizeEdge::North),
        (_, true, _, _) => Some(ResizeEdge::South),
        (_, _, true, _) => Some(ResizeEdge::West),
        (_, _, _, true) => Some(ResizeEdge::East),
        _ => None,
    }
}

/// Staggered origin for the `open_count`-th window so new windows do not stack exactly.
pub fn cascade_origin(open_count: usize, width: i32, height: i32, viewport: Viewport) -> (i32, i32) {
    let step = i32::try_from(open_count)
        .unwrap_or(i32::MAX)
        .saturating_mul(CASCADE_STEP);
    let span_x = (viewport.width - width - 60).max(100);
    let span_y = (viewport.height - height - 60).max(100);
    (step % span_x + 70, step % span_y + 40)
}

/// Applies the size floor, then keeps the window's origin inside the container.
pub fn clamp_creation_bounds(bounds: WindowBounds, viewport: Viewport) -> WindowBounds {
    let bounds = bounds.clamped_min(MIN_WINDOW_WIDTH, MIN_WINDOW_HEIGHT);
    let left = bounds.left.min(viewport.width - bounds.width).max(0);
    let top = bounds.top.min(viewport.height - bounds.height).max(0);
    bounds.with_origin(left, top)
}

/// Fallback normal bounds when a maximized or snapped window has no captured original:
/// 70% x 60% of the container, inset 15% from the top-left.
pub fn default_restore_bounds(viewport: Viewport) -> WindowBounds {
    WindowBounds {
        left: viewport.width * 15 / 100,
        top: viewport.height * 15 / 100,
        width: viewport.width * 70 / 100,
        height: viewport.height * 60 / 100,
    }
}
