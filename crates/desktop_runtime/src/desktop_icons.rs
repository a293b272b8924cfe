//! Desktop icon placement, selection, and "new item" creation.

use crate::{
    apps,
    model::{DesktopIcon, DesktopState, IconPosition, PointerPosition},
};

/// Grid that dropped and newly created icons snap to.
pub const ICON_GRID: i32 = 15;
const LAYOUT_PADDING: i32 = 15;
const ICON_WIDTH: i32 = 90;
const ICON_HEIGHT: i32 = 95;
/// A new item lands slightly up and left of the context-menu click.
const NEW_ITEM_OFFSET: PointerPosition = PointerPosition { x: 10, y: 20 };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewItemKind {
    NewFolder,
    NewTextDocument,
}

impl NewItemKind {
    pub fn base_label(self) -> &'static str {
        match self {
            Self::NewFolder => "New Folder",
            Self::NewTextDocument => "New Text Document",
        }
    }
}

/// Rounds to the nearest grid line, halves rounding up.
pub fn snap_to_grid(value: i32) -> i32 {
    (value + ICON_GRID / 2).div_euclid(ICON_GRID) * ICON_GRID
}

/// Places every icon that has no position yet, filling columns top to bottom.
///
/// Runs at most once per session. Returns `true` when it ran.
pub fn auto_layout(state: &mut DesktopState) -> bool {
    if state.icon_layout_done {
        return false;
    }
    let per_column = ((state.viewport.height - LAYOUT_PADDING * 2) / ICON_HEIGHT).max(1);
    let mut column = 0;
    let mut row = 0;
    for icon in state.icons.iter_mut().filter(|icon| icon.position.is_none()) {
        icon.position = Some(IconPosition {
            left: LAYOUT_PADDING + column * (ICON_WIDTH + LAYOUT_PADDING),
            top: LAYOUT_PADDING + row * ICON_HEIGHT,
        });
        row += 1;
        if row >= per_column {
            row = 0;
            column += 1;
        }
    }
    state.icon_layout_done = true;
    true
}

/// Moves an icon to where it was dropped: kept on the desktop, then snapped to the grid.
pub fn drop_icon(
    state: &mut DesktopState,
    icon_id: &str,
    pointer: PointerPosition,
    grab_offset: PointerPosition,
) -> bool {
    let viewport = state.viewport;
    let Some(icon) = state.icons.iter_mut().find(|icon| icon.id == icon_id) else {
        return false;
    };
    let left = (pointer.x - grab_offset.x)
        .min(viewport.width - ICON_WIDTH)
        .max(0);
    let top = (pointer.y - grab_offset.y)
        .min(viewport.height - ICON_HEIGHT)
        .max(0);
    icon.position = Some(IconPosition {
        left: snap_to_grid(left),
        top: snap_to_grid(top),
    });
    true
}

/// First free label among `base`, `base (1)`, `base (2)`, ...
fn unique_label(icons: &[DesktopIcon], base: &str) -> String {
    let taken = |label: &str| icons.iter().any(|icon| icon.label == label);
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base} ({n})"))
        .find(|label| !taken(label))
        .unwrap_or_else(|| base.to_string())
}

/// Creates a dynamic desktop item near `pointer`, selects it alone, and returns its id.
pub fn create_desktop_item(
    state: &mut DesktopState,
    kind: NewItemKind,
    pointer: PointerPosition,
) -> String {
    let id = format!("dt-item-{}", state.next_desktop_item_id);
    state.next_desktop_item_id = state.next_desktop_item_id.saturating_add(1);

    let label = unique_label(&state.icons, kind.base_label());
    state.icons.push(DesktopIcon {
        id: id.clone(),
        title: label.clone(),
        icon: apps::dynamic_item_icon(&label).to_string(),
        label,
        dynamic: true,
        position: Some(IconPosition {
            left: snap_to_grid(pointer.x - NEW_ITEM_OFFSET.x).max(0),
            top: snap_to_grid(pointer.y - NEW_ITEM_OFFSET.y).max(0),
        }),
    });
    state.selected_icons = vec![id.clone()];
    id
}

/// Selects an icon. Without `extend` the previous selection is replaced.
pub fn select_icon(state: &mut DesktopState, icon_id: &str, extend: bool) -> bool {
    if state.icon(icon_id).is_none() {
        return false;
    }
    if !extend {
        state.selected_icons.clear();
    }
    if !state.selected_icons.iter().any(|id| id == icon_id) {
        state.selected_icons.push(icon_id.to_string());
    }
    true
}

pub fn clear_selection(state: &mut DesktopState) -> bool {
    let had_selection = !state.selected_icons.is_empty();
    state.selected_icons.clear();
    had_selection
}
