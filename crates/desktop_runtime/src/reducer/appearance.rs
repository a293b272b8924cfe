//! Reducer helpers for wallpaper and accent color changes.

use crate::{
    model::{DesktopState, DEFAULT_ACCENT_COLOR, DEFAULT_WALLPAPER},
    reducer::{DesktopAction, ReducerError, RuntimeEffect},
};

const WALLPAPER_URL_PREFIXES: [&str; 3] = ["http", "/", "data:"];

/// Wraps a user-entered image URL as a CSS background value.
///
/// # Errors
///
/// Returns [`ReducerError::InvalidWallpaperUrl`] unless the trimmed URL starts with `http`, `/`,
/// or `data:`, or when it contains quotes, parentheses, backslashes, or whitespace that would
/// escape the generated `url("...")` value.
pub fn wallpaper_css_from_url(url: &str) -> Result<String, ReducerError> {
    let url = url.trim();
    if url.is_empty()
        || !WALLPAPER_URL_PREFIXES
            .iter()
            .any(|prefix| url.starts_with(prefix))
        || url.chars().any(breaks_css_url)
    {
        return Err(ReducerError::InvalidWallpaperUrl(url.to_string()));
    }
    Ok(format!("url(\"{url}\")"))
}

fn breaks_css_url(c: char) -> bool {
    matches!(c, '"' | '\'' | '(' | ')' | '\\') || c.is_whitespace() || c.is_control()
}

fn or_default(value: &str, fallback: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Handles theme actions. Returns `Ok(false)` for actions owned elsewhere.
pub(super) fn reduce_appearance_action(
    state: &mut DesktopState,
    action: &DesktopAction,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<bool, ReducerError> {
    match action {
        DesktopAction::SetWallpaperUrl { url } => {
            state.theme.wallpaper = wallpaper_css_from_url(url)?;
        }
        DesktopAction::SetWallpaper { css } => {
            state.theme.wallpaper = or_default(css, DEFAULT_WALLPAPER);
        }
        DesktopAction::SetAccentColor { color } => {
            state.theme.accent_color = or_default(color, DEFAULT_ACCENT_COLOR);
        }
        _ => return Ok(false),
    }
    effects.push(RuntimeEffect::PersistSession);
    Ok(true)
}
