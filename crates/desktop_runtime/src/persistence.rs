//! Session persistence: one JSON blob holding windows, desktop icons, counters, and theme.
//!
//! Decoding is tolerant. Every field is optional, lengths may be plain numbers or
//! CSS strings (`"600px"`, `"50%"`), and a single malformed window or icon record is skipped with
//! a warning instead of failing the whole load.

use std::collections::BTreeMap;

use desktop_app_contract::AppKind;
use leptos::logging;
use platform_host::{save_blob_with, StateStore};
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::{
    apps::{self, AppRegistry},
    desktop_icons,
    geometry::SnapZone,
    model::{
        DesktopIcon, DesktopState, IconPosition, OpenWindowRequest, WindowBounds, WindowId,
        WindowState, DEFAULT_ACCENT_COLOR, DEFAULT_WALLPAPER, FIRST_DESKTOP_ITEM_ID,
        INITIAL_Z_INDEX,
    },
    window_manager,
};

/// Storage key of the session blob.
pub const SESSION_KEY: &str = "webdesk.session.v2";
const FALLBACK_WIDTH: i32 = 600;
const FALLBACK_HEIGHT: i32 = 400;
/// Resolved lengths are clamped to this many pixels either way.
const LENGTH_LIMIT_PX: f64 = 1_000_000.0;
/// Saved counters, sequence numbers, and z values above this are ignored.
const MAX_SAVED_COUNTER: u64 = u32::MAX as u64;

/// A persisted length: pixels, or a percentage of the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CssLength {
    Px(f64),
    Percent(f64),
}

impl CssLength {
    pub fn px(value: i32) -> Self {
        Self::Px(f64::from(value))
    }

    /// Parses `12`, `12px` or `12.5%`. Anything else is rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(percent) = raw.strip_suffix('%') {
            return percent.trim().parse().ok().map(Self::Percent);
        }
        let number = raw.strip_suffix("px").unwrap_or(raw);
        number.trim().parse().ok().map(Self::Px)
    }

    /// Pixels, with percentages taken of `basis`.
    pub fn resolve(self, basis: i32) -> i32 {
        let pixels = match self {
            Self::Px(px) => px,
            Self::Percent(percent) => f64::from(basis) * percent / 100.0,
        };
        pixels.round().clamp(-LENGTH_LIMIT_PX, LENGTH_LIMIT_PX) as i32
    }
}

impl Serialize for CssLength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Px(px) if px.fract() == 0.0 => serializer.serialize_i64(*px as i64),
            Self::Px(px) => serializer.serialize_f64(*px),
            Self::Percent(percent) => serializer.serialize_str(&format!("{percent}%")),
        }
    }
}

/// Accepts numbers and CSS length strings; empty, null, or unparseable values become `None`.
fn lenient_length<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<CssLength>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64().map(CssLength::Px),
        Value::String(raw) => CssLength::parse(&raw),
        _ => None,
    })
}

/// Decodes an id-keyed record map, dropping records that do not decode.
fn lenient_records<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<serde_json::Map<String, Value>>::deserialize(deserializer)?;
    Ok(raw
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(record) => Some((key, record)),
            Err(err) => {
                logging::warn!("skipping malformed session record `{key}`: {err}");
                None
            }
        })
        .collect())
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundsSnapshot {
    #[serde(default, deserialize_with = "lenient_length")]
    pub left: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub top: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub width: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub height: Option<CssLength>,
}

impl BoundsSnapshot {
    fn from_bounds(bounds: WindowBounds) -> Self {
        Self {
            left: Some(CssLength::px(bounds.left)),
            top: Some(CssLength::px(bounds.top)),
            width: Some(CssLength::px(bounds.width)),
            height: Some(CssLength::px(bounds.height)),
        }
    }

    /// Complete bounds, or `None` when any side is missing.
    fn resolve(&self, viewport_width: i32, viewport_height: i32) -> Option<WindowBounds> {
        Some(WindowBounds {
            left: self.left?.resolve(viewport_width),
            top: self.top?.resolve(viewport_height),
            width: self.width?.resolve(viewport_width),
            height: self.height?.resolve(viewport_height),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowSnapshot {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub content_generator: Option<String>,
    #[serde(default)]
    pub state: WindowState,
    #[serde(default)]
    pub z_index: Option<u64>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub left: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub top: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub width: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub height: Option<CssLength>,
    #[serde(default)]
    pub original_bounds: Option<BoundsSnapshot>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub app_type: Option<AppKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IconSnapshot {
    #[serde(default, deserialize_with = "lenient_length")]
    pub left: Option<CssLength>,
    #[serde(default, deserialize_with = "lenient_length")]
    pub top: Option<CssLength>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub icon_url: Option<String>,
    #[serde(default)]
    pub dynamic: bool,
    #[serde(default)]
    pub span_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    #[serde(default, deserialize_with = "lenient_records")]
    pub windows: BTreeMap<String, WindowSnapshot>,
    #[serde(default, deserialize_with = "lenient_records")]
    pub desktop_icons: BTreeMap<String, IconSnapshot>,
    #[serde(default)]
    pub next_window_id: Option<u64>,
    #[serde(default)]
    pub next_desktop_item_id: Option<u64>,
    #[serde(default)]
    pub highest_z_index: Option<u64>,
    #[serde(default)]
    pub wallpaper: Option<String>,
    #[serde(default)]
    pub accent_color: Option<String>,
}

/// Outcome of reading the session blob.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionLoad {
    Missing,
    Loaded(SessionSnapshot),
    /// The blob could not be decoded and was removed.
    Corrupted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestoreReport {
    pub restored_windows: Vec<WindowId>,
    /// Saved window ids dropped because their content could not be rebuilt.
    pub skipped_windows: Vec<String>,
    pub ran_auto_layout: bool,
}

/// Captures everything a reload needs. Windows that are closing are left out.
pub fn snapshot_session(state: &DesktopState, apps: &AppRegistry) -> SessionSnapshot {
    let windows = state
        .windows
        .iter()
        .filter(|window| !window.closing)
        .map(|window| {
            let content = apps
                .stateful_hook(window.app_kind)
                .map(|hook| hook.extract(&window.app_state).unwrap_or_default());
            let snapshot = WindowSnapshot {
                id: window.id.to_string(),
                title: window.title.clone(),
                icon: window.icon.clone(),
                content_generator: window
                    .content_generator
                    .map(|generator| generator.key().to_string()),
                state: window.state,
                z_index: Some(window.z_index),
                left: Some(CssLength::px(window.bounds.left)),
                top: Some(CssLength::px(window.bounds.top)),
                width: Some(CssLength::px(window.bounds.width)),
                height: Some(CssLength::px(window.bounds.height)),
                original_bounds: window.original_bounds.map(BoundsSnapshot::from_bounds),
                content,
                app_type: Some(window.app_kind),
            };
            (window.id.to_string(), snapshot)
        })
        .collect();

    let desktop_icons = state
        .icons
        .iter()
        .map(|icon| {
            let snapshot = IconSnapshot {
                left: icon.position.map(|p| CssLength::px(p.left)),
                top: icon.position.map(|p| CssLength::px(p.top)),
                title: icon.title.clone(),
                icon_url: Some(icon.icon.clone()),
                dynamic: icon.dynamic,
                span_text: Some(icon.label.clone()),
            };
            (icon.id.clone(), snapshot)
        })
        .collect();

    SessionSnapshot {
        windows,
        desktop_icons,
        next_window_id: Some(state.next_window_id),
        next_desktop_item_id: Some(state.next_desktop_item_id),
        highest_z_index: Some(state.highest_z_index),
        wallpaper: Some(state.theme.wallpaper.clone()),
        accent_color: Some(state.theme.accent_color.clone()),
    }
}

/// Writes the snapshot as the single session blob.
///
/// # Errors
///
/// Returns the store's error when serialization or the write fails.
pub async fn persist_session<S: StateStore + ?Sized>(
    store: &S,
    snapshot: &SessionSnapshot,
) -> Result<(), String> {
    save_blob_with(store, SESSION_KEY, snapshot).await
}

/// Reads the session blob. A blob that is not a decodable JSON object is removed.
///
/// # Errors
///
/// Returns the store's error when reading fails. Decode failures are not errors.
pub async fn load_session<S: StateStore + ?Sized>(store: &S) -> Result<SessionLoad, String> {
    let Some(raw) = store.load_blob(SESSION_KEY).await? else {
        return Ok(SessionLoad::Missing);
    };
    let decoded = serde_json::from_str::<Value>(&raw)
        .map_err(|e| e.to_string())
        .and_then(|value| {
            if value.is_object() {
                serde_json::from_value::<SessionSnapshot>(value).map_err(|e| e.to_string())
            } else {
                Err("session blob is not a JSON object".to_string())
            }
        });
    match decoded {
        Ok(snapshot) => Ok(SessionLoad::Loaded(snapshot)),
        Err(reason) => {
            logging::warn!("discarding corrupted session blob: {reason}");
            if let Err(err) = store.remove_blob(SESSION_KEY).await {
                logging::warn!("failed to remove corrupted session blob: {err}");
            }
            Ok(SessionLoad::Corrupted(reason))
        }
    }
}

/// Fresh-session setup: built-in icons, default theme, and one auto-layout pass.
pub fn apply_defaults(state: &mut DesktopState) {
    if state.icons.is_empty() {
        state.icons = apps::builtin_desktop_icons();
    }
    state.theme = Default::default();
    desktop_icons::auto_layout(state);
}

fn positive_or(value: Option<u64>, fallback: u64) -> u64 {
    value
        .filter(|n| (1..=MAX_SAVED_COUNTER).contains(n))
        .unwrap_or(fallback)
}

fn saved_z_index(window: &WindowSnapshot) -> u64 {
    window
        .z_index
        .filter(|z| *z <= MAX_SAVED_COUNTER)
        .unwrap_or(0)
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .filter(|raw| !raw.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Trailing number of a `{prefix}{n}` id.
fn sequence_number(id: &str, prefix: &str) -> Option<u64> {
    id.strip_prefix(prefix)?
        .parse()
        .ok()
        .filter(|n| *n <= MAX_SAVED_COUNTER)
}

/// Rebuilds a session from a snapshot on top of `state`.
///
/// Windows are reopened in ascending saved z-order through the regular transitions, then their
/// saved original bounds and stacking are reapplied. Saved geometry passes through the same size
/// floor and container clamp as a new window. Windows whose content cannot be rebuilt are skipped
/// with a warning.
pub fn restore_session(
    state: &mut DesktopState,
    apps: &AppRegistry,
    snapshot: SessionSnapshot,
) -> RestoreReport {
    let mut report = RestoreReport::default();

    state.next_window_id = positive_or(snapshot.next_window_id, 1);
    state.next_desktop_item_id = positive_or(snapshot.next_desktop_item_id, FIRST_DESKTOP_ITEM_ID);
    state.highest_z_index = positive_or(snapshot.highest_z_index, INITIAL_Z_INDEX);
    state.theme.wallpaper = non_empty_or(snapshot.wallpaper, DEFAULT_WALLPAPER);
    state.theme.accent_color = non_empty_or(snapshot.accent_color, DEFAULT_ACCENT_COLOR);

    report.ran_auto_layout = restore_icons(state, snapshot.desktop_icons);

    let mut saved: Vec<(String, WindowSnapshot)> = snapshot.windows.into_iter().collect();
    saved.sort_by_key(|(_, window)| saved_z_index(window));

    let mut stacking = Vec::new();
    for (key, window) in saved {
        let saved_z = saved_z_index(&window);
        match restore_window(state, apps, key, window) {
            Ok(id) => {
                stacking.push((id.clone(), saved_z));
                report.restored_windows.push(id);
            }
            Err(skipped) => report.skipped_windows.push(skipped),
        }
    }

    // Saved z values are reapplied in ascending order, bumped where needed to stay unique.
    let mut last_z = 0;
    for (id, saved_z) in &stacking {
        let z_index = (*saved_z).max(last_z + 1);
        last_z = z_index;
        if let Some(window) = state.window_mut(id) {
            window.z_index = z_index;
        }
    }
    state.highest_z_index = state.highest_z_index.max(last_z);

    let max_window_sequence = state
        .windows
        .iter()
        .filter_map(|w| sequence_number(w.id.as_str(), "window-"))
        .max();
    if let Some(n) = max_window_sequence {
        state.next_window_id = state.next_window_id.max(n + 1);
    }

    window_manager::focus_topmost(state);
    report
}

/// Applies saved icon records. Returns whether auto-layout ran.
fn restore_icons(state: &mut DesktopState, saved: BTreeMap<String, IconSnapshot>) -> bool {
    if state.icons.is_empty() {
        state.icons = apps::builtin_desktop_icons();
    }
    let viewport = state.viewport;
    let mut any_positioned = false;

    for (id, record) in saved {
        let position = match (record.left, record.top) {
            (Some(left), Some(top)) => Some(IconPosition {
                left: left.resolve(viewport.width),
                top: top.resolve(viewport.height),
            }),
            _ => None,
        };

        if let Some(icon) = state.icons.iter_mut().find(|icon| icon.id == id) {
            if position.is_some() {
                icon.position = position;
                any_positioned = true;
            }
            continue;
        }
        if !record.dynamic {
            continue;
        }

        let label = record
            .span_text
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| record.title.clone());
        if let Some(n) = sequence_number(&id, "dt-item-") {
            state.next_desktop_item_id = state.next_desktop_item_id.max(n + 1);
        }
        any_positioned |= position.is_some();
        state.icons.push(DesktopIcon {
            icon: record
                .icon_url
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| apps::dynamic_item_icon(&label).to_string()),
            id,
            title: record.title,
            label,
            dynamic: true,
            position,
        });
    }

    if any_positioned {
        state.icon_layout_done = true;
        false
    } else {
        desktop_icons::auto_layout(state)
    }
}

/// Reopens one saved window. Returns the saved key when the window has to be skipped.
fn restore_window(
    state: &mut DesktopState,
    apps: &AppRegistry,
    key: String,
    saved: WindowSnapshot,
) -> Result<WindowId, String> {
    let app_kind = saved.app_type.unwrap_or(AppKind::Generic);
    let generator_key = saved
        .content_generator
        .as_deref()
        .filter(|raw| !raw.is_empty());

    let (generator, content) = match generator_key.map(|raw| (raw, apps.resolve_key(raw))) {
        Some((_, Some(generator))) => match apps.render(generator) {
            Some(content) => (Some(generator), content),
            None => return Err(key),
        },
        _ if app_kind.restores_without_generator() => (None, apps.placeholder(&saved.title)),
        Some((raw, None)) => {
            logging::warn!("content generator `{raw}` not found for window `{key}`; skipping");
            return Err(key);
        }
        None => {
            logging::warn!("window `{key}` has no content generator; skipping");
            return Err(key);
        }
    };

    let viewport = state.viewport;
    let id = if saved.id.is_empty() { key } else { saved.id };
    let mut request = OpenWindowRequest::new(
        saved.title,
        app_kind,
        saved
            .width
            .map_or(FALLBACK_WIDTH, |w| w.resolve(viewport.width)),
        saved
            .height
            .map_or(FALLBACK_HEIGHT, |h| h.resolve(viewport.height)),
    );
    request.id = Some(WindowId::new(id));
    request.icon = saved.icon;
    request.content_generator = generator;
    request.content = content;
    request.left = saved.left.map(|l| l.resolve(viewport.width));
    request.top = saved.top.map(|t| t.resolve(viewport.height));
    request.saved_content = saved
        .content
        .filter(|_| apps.stateful_hook(app_kind).is_some());
    let id = window_manager::open_window(state, apps, request);

    match saved.state {
        WindowState::Normal => {}
        WindowState::Minimized => {
            window_manager::minimize_window(state, &id);
        }
        WindowState::Maximized => {
            window_manager::maximize_window(state, &id);
        }
        WindowState::SnappedLeft => {
            window_manager::snap_window(state, &id, SnapZone::Left);
        }
        WindowState::SnappedRight => {
            window_manager::snap_window(state, &id, SnapZone::Right);
        }
    }

    if let Some(window) = state.live_window_mut(&id) {
        if window.state.holds_original_bounds() {
            window.original_bounds = saved
                .original_bounds
                .as_ref()
                .and_then(|bounds| bounds.resolve(viewport.width, viewport.height));
        }
    }
    Ok(id)
}

#[cfg(test)]
mod tests {
    use desktop_app_contract::ContentGenerator;
    use futures::executor::block_on;
    use platform_host::MemoryStateStore;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        interaction::{self, InteractionState},
        model::{PointerPosition, Viewport},
    };

    const VIEWPORT: Viewport = Viewport {
        width: 1000,
        height: 700,
    };

    fn fresh_state() -> DesktopState {
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        apply_defaults(&mut state);
        state
    }

    fn launch(state: &mut DesktopState, apps: &AppRegistry, app_id: &str) -> WindowId {
        let request = apps.launch_request(app_id).expect("registered app");
        window_manager::open_window(state, apps, request)
    }

    #[test]
    fn css_lengths_accept_numbers_px_and_percent() {
        assert_eq!(CssLength::parse("600px"), Some(CssLength::Px(600.0)));
        assert_eq!(CssLength::parse(" 42 "), Some(CssLength::Px(42.0)));
        assert_eq!(CssLength::parse("50%"), Some(CssLength::Percent(50.0)));
        assert_eq!(CssLength::parse(""), None);
        assert_eq!(CssLength::parse("auto"), None);
        assert_eq!(CssLength::Percent(50.0).resolve(1000), 500);
        assert_eq!(CssLength::Px(12.6).resolve(1000), 13);
    }

    #[test]
    fn lengths_serialize_as_integers_or_percent_strings() {
        assert_eq!(
            serde_json::to_value(CssLength::px(600)).expect("encode"),
            json!(600)
        );
        assert_eq!(
            serde_json::to_value(CssLength::Percent(50.0)).expect("encode"),
            json!("50%")
        );
    }

    #[test]
    fn round_trip_reproduces_layout_and_stacking() {
        let apps = AppRegistry::builtin();
        let mut state = fresh_state();
        let notepad = launch(&mut state, &apps, "notepad");
        let calculator = launch(&mut state, &apps, "calculator");
        let settings = launch(&mut state, &apps, "settings");
        window_manager::set_app_state(&mut state, &notepad, json!({ "text": "draft" }));
        window_manager::snap_window(&mut state, &calculator, SnapZone::Left);
        window_manager::minimize_window(&mut state, &settings);
        window_manager::bring_to_front(&mut state, &notepad);

        let store = MemoryStateStore::default();
        block_on(persist_session(&store, &snapshot_session(&state, &apps))).expect("persist");
        let loaded = match block_on(load_session(&store)).expect("load") {
            SessionLoad::Loaded(snapshot) => snapshot,
            other => panic!("expected a loaded session, got {other:?}"),
        };

        let mut restored = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        let report = restore_session(&mut restored, &apps, loaded);
        assert!(report.skipped_windows.is_empty());
        assert_eq!(report.restored_windows.len(), 3);

        for id in [&notepad, &calculator, &settings] {
            let before = state.window(id).expect("saved window");
            let after = restored.window(id).expect("restored window");
            assert_eq!(after.state, before.state);
            assert_eq!(after.bounds, before.bounds);
            assert_eq!(after.original_bounds, before.original_bounds);
            assert_eq!(after.content_generator, before.content_generator);
        }
        assert_eq!(
            restored.window(&notepad).expect("notepad").app_state,
            json!({ "text": "draft" })
        );
        assert!(
            restored.window(&notepad).expect("notepad").z_index
                > restored.window(&calculator).expect("calculator").z_index
        );
        assert_eq!(restored.active_window, Some(notepad));
        assert_eq!(restored.taskbar.len(), 3);
        assert_eq!(restored.icons, state.icons);
        assert!(!report.ran_auto_layout);
    }

    #[test]
    fn unregistered_generator_is_skipped_without_failing() {
        let apps = AppRegistry::builtin();
        let mut state = fresh_state();
        launch(&mut state, &apps, "notepad");
        launch(&mut state, &apps, "settings");
        let snapshot = snapshot_session(&state, &apps);

        let reduced = AppRegistry::builtin().without_generator(ContentGenerator::Settings);
        let mut restored = fresh_state();
        let report = restore_session(&mut restored, &reduced, snapshot);

        assert_eq!(report.skipped_windows, vec!["settings".to_string()]);
        assert_eq!(report.restored_windows, vec![WindowId::new("notepad")]);
        assert!(restored.window(&WindowId::new("settings")).is_none());
        assert_eq!(restored.active_window, Some(WindowId::new("notepad")));
    }

    #[test]
    fn corrupted_blob_is_removed_and_reported() {
        let store = MemoryStateStore::with_blob(SESSION_KEY, "{not json");
        assert!(matches!(
            block_on(load_session(&store)).expect("load"),
            SessionLoad::Corrupted(_)
        ));
        assert_eq!(store.peek(SESSION_KEY), None);

        let array = MemoryStateStore::with_blob(SESSION_KEY, "[1, 2]");
        assert!(matches!(
            block_on(load_session(&array)).expect("load"),
            SessionLoad::Corrupted(_)
        ));
        assert_eq!(
            block_on(load_session(&MemoryStateStore::default())).expect("load"),
            SessionLoad::Missing
        );
    }

    #[test]
    fn legacy_blob_with_css_strings_restores() {
        let raw = json!({
            "windows": {
                "notepad": {
                    "id": "notepad",
                    "title": "Notepad",
                    "icon": "notepad.png",
                    "contentGenerator": "createNotepadContent",
                    "state": "normal",
                    "zIndex": 14,
                    "left": "120px",
                    "top": "80px",
                    "width": "50%",
                    "height": "",
                    "originalBounds": null,
                    "content": "hello",
                    "appType": "notepad"
                },
                "broken": "not a window",
                "window-7": {
                    "title": "Budget",
                    "state": "maximized",
                    "zIndex": 12,
                    "originalBounds": { "left": 10, "top": 20, "width": 300, "height": 200 },
                    "appType": "generic-dynamic"
                }
            },
            "desktopIcons": {
                "notepad-icon": { "left": "30px", "top": "45px", "title": "Notepad" },
                "dt-item-1004": {
                    "left": "300px",
                    "top": "300px",
                    "title": "New Folder",
                    "dynamic": true,
                    "spanText": "New Folder"
                }
            },
            "nextWindowId": 3,
            "highestZIndex": 14,
            "wallpaper": "",
            "accentColor": "#ff8800"
        });
        let store = MemoryStateStore::with_blob(SESSION_KEY, raw.to_string());
        let SessionLoad::Loaded(snapshot) = block_on(load_session(&store)).expect("load") else {
            panic!("expected a loaded session");
        };
        assert_eq!(snapshot.windows.len(), 2);

        let apps = AppRegistry::builtin();
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        let report = restore_session(&mut state, &apps, snapshot);
        assert_eq!(
            report.restored_windows,
            vec![WindowId::new("window-7"), WindowId::new("notepad")]
        );

        let notepad = state.window(&WindowId::new("notepad")).expect("notepad");
        assert_eq!(
            notepad.bounds,
            WindowBounds {
                left: 120,
                top: 80,
                width: 500,
                height: 400
            }
        );
        assert_eq!(notepad.app_state, json!({ "text": "hello" }));

        let budget = state.window(&WindowId::new("window-7")).expect("budget");
        assert_eq!(budget.state, WindowState::Maximized);
        assert_eq!(budget.content_generator, None);
        assert!(budget.content.contains("Budget"));
        assert_eq!(
            budget.original_bounds,
            Some(WindowBounds {
                left: 10,
                top: 20,
                width: 300,
                height: 200
            })
        );

        assert_eq!(state.next_window_id, 8);
        assert_eq!(state.next_desktop_item_id, 1005);
        assert_eq!(state.theme.wallpaper, DEFAULT_WALLPAPER);
        assert_eq!(state.theme.accent_color, "#ff8800");
        assert_eq!(
            state.icon("notepad-icon").expect("icon").position,
            Some(IconPosition { left: 30, top: 45 })
        );
        let folder = state.icon("dt-item-1004").expect("dynamic icon");
        assert!(folder.dynamic);
        assert_eq!(folder.icon, apps::dynamic_item_icon("New Folder"));
        assert!(!report.ran_auto_layout);
        assert_eq!(state.active_window, Some(WindowId::new("notepad")));
    }

    #[test]
    fn icons_without_saved_positions_get_auto_layout() {
        let snapshot = SessionSnapshot {
            desktop_icons: BTreeMap::from([(
                "notepad-icon".to_string(),
                IconSnapshot {
                    left: None,
                    top: Some(CssLength::px(40)),
                    title: "Notepad".to_string(),
                    icon_url: None,
                    dynamic: false,
                    span_text: None,
                },
            )]),
            ..SessionSnapshot::default()
        };
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        let report = restore_session(&mut state, &AppRegistry::builtin(), snapshot);

        assert!(report.ran_auto_layout);
        assert!(state.icons.iter().all(|icon| icon.position.is_some()));
        assert_eq!(state.theme.accent_color, DEFAULT_ACCENT_COLOR);
        assert_eq!(state.next_window_id, 1);
        assert_eq!(state.highest_z_index, INITIAL_Z_INDEX);
        assert_eq!(state.active_window, None);
    }

    #[test]
    fn restored_z_values_stay_unique_and_below_counter() {
        let raw = json!({
            "windows": {
                "a": { "id": "a", "title": "A", "zIndex": 20, "appType": "generic" },
                "b": { "id": "b", "title": "B", "zIndex": 20, "appType": "generic" },
                "c": { "id": "c", "title": "C", "zIndex": 5, "appType": "generic", "state": "minimized" }
            },
            "highestZIndex": 3
        });
        let snapshot: SessionSnapshot = serde_json::from_value(raw).expect("decode");
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        restore_session(&mut state, &AppRegistry::builtin(), snapshot);

        let mut zs: Vec<u64> = state.windows.iter().map(|w| w.z_index).collect();
        zs.sort_unstable();
        zs.dedup();
        assert_eq!(zs.len(), 3);
        assert!(state.windows.iter().all(|w| w.z_index <= state.highest_z_index));
        assert_eq!(state.active_window, Some(WindowId::new("b")));
        assert!(state.window(&WindowId::new("c")).expect("c").is_minimized());
    }

    #[test]
    fn restored_geometry_obeys_minimum_size_and_container() {
        let raw = json!({
            "windows": {
                "tiny": {
                    "id": "tiny", "title": "Tiny", "zIndex": 1, "appType": "generic",
                    "left": 5000, "top": "4000px", "width": 40, "height": 0
                },
                "lost": {
                    "id": "lost", "title": "Lost", "zIndex": 2, "appType": "generic",
                    "left": "-1e400px", "top": "-1e400px", "width": "1e400px", "height": 300
                }
            }
        });
        let snapshot: SessionSnapshot = serde_json::from_value(raw).expect("decode");
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        restore_session(&mut state, &AppRegistry::builtin(), snapshot);

        assert_eq!(
            state.window(&WindowId::new("tiny")).expect("tiny").bounds,
            WindowBounds {
                left: 750,
                top: 550,
                width: 250,
                height: 150
            }
        );

        let lost = WindowId::new("lost");
        let bounds = state.window(&lost).expect("lost").bounds;
        assert_eq!((bounds.left, bounds.top), (0, 0));
        assert!(bounds.width <= LENGTH_LIMIT_PX as i32);

        let mut interaction = InteractionState::default();
        assert!(interaction::begin_window_drag(
            &mut state,
            &mut interaction,
            &lost,
            PointerPosition { x: 40, y: 10 },
        ));
        assert!(interaction::pointer_moved(
            &mut state,
            &mut interaction,
            PointerPosition { x: 140, y: 110 },
        ));
        assert_eq!(state.window(&lost).expect("lost").bounds.top, 100);
    }

    #[test]
    fn oversized_saved_counters_are_ignored() {
        let raw = json!({
            "windows": {
                "window-18446744073709551615": {
                    "title": "Runaway", "zIndex": 18446744073709551615u64, "appType": "generic"
                },
                "calm": { "id": "calm", "title": "Calm", "zIndex": 40, "appType": "generic" }
            },
            "desktopIcons": {
                "dt-item-18446744073709551615": { "title": "Huge", "dynamic": true }
            },
            "nextWindowId": 18446744073709551615u64,
            "nextDesktopItemId": 18446744073709551615u64,
            "highestZIndex": 18446744073709551615u64
        });
        let snapshot: SessionSnapshot = serde_json::from_value(raw).expect("decode");
        let apps = AppRegistry::builtin();
        let mut state = DesktopState {
            viewport: VIEWPORT,
            ..DesktopState::default()
        };
        let report = restore_session(&mut state, &apps, snapshot);
        assert_eq!(report.restored_windows.len(), 2);
        assert_eq!(state.next_window_id, 1);
        assert_eq!(state.next_desktop_item_id, FIRST_DESKTOP_ITEM_ID);
        assert!(state.highest_z_index <= MAX_SAVED_COUNTER);

        let runaway = WindowId::new("window-18446744073709551615");
        let before = state.highest_z_index;
        assert!(window_manager::bring_to_front(&mut state, &runaway));
        assert_eq!(state.window(&runaway).expect("runaway").z_index, before + 1);

        let opened = launch(&mut state, &apps, "calculator");
        assert!(
            state.window(&opened).expect("calculator").z_index
                > state.window(&runaway).expect("runaway").z_index
        );
        let item = desktop_icons::create_desktop_item(
            &mut state,
            desktop_icons::NewItemKind::NewFolder,
            PointerPosition { x: 200, y: 200 },
        );
        assert_eq!(item, format!("dt-item-{FIRST_DESKTOP_ITEM_ID}"));
    }

    #[test]
    fn closing_windows_are_not_persisted() {
        let apps = AppRegistry::builtin();
        let mut state = fresh_state();
        let notepad = launch(&mut state, &apps, "notepad");
        launch(&mut state, &apps, "calculator");
        window_manager::begin_close(&mut state, &notepad);

        let snapshot = snapshot_session(&state, &apps);
        assert_eq!(
            snapshot.windows.keys().cloned().collect::<Vec<_>>(),
            vec!["calculator".to_string()]
        );
        assert_eq!(snapshot.windows["calculator"].content, None);
    }
}
