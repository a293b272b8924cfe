//! Shared contract types between the desktop window manager runtime and the simulated apps.
//!
//! The window manager never owns app semantics. It needs three things from an app: a kind tag
//! ([`AppKind`]), a re-resolvable content factory key ([`ContentGenerator`]), and for stateful
//! apps a way to read and re-inject the one piece of content that survives a reload
//! ([`StatefulContent`]).

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Application kind tag carried by every window.
pub enum AppKind {
    /// "This PC" explorer.
    MyComputer,
    /// Recycle bin listing.
    RecycleBin,
    /// Plain-text editor.
    Notepad,
    /// Calculator.
    Calculator,
    /// Shell settings (wallpaper, accent color).
    Settings,
    /// Explorer view opened from a dynamic desktop folder.
    Folder,
    /// Anything without dedicated semantics. Unknown persisted tags decode to this.
    #[serde(other)]
    Generic,
}

impl AppKind {
    /// Whether a persisted window of this kind may be rebuilt with placeholder content when its
    /// generator key is absent.
    pub const fn restores_without_generator(self) -> bool {
        matches!(self, Self::Folder | Self::Generic)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Closed set of content factories the runtime can re-resolve after a reload.
///
/// Only [`ContentGenerator::key`] is ever persisted.
pub enum ContentGenerator {
    /// Drive and folder overview.
    MyComputer,
    /// Empty recycle bin listing.
    RecycleBin,
    /// Text editor surface.
    Notepad,
    /// Calculator keypad.
    Calculator,
    /// Wallpaper and accent color form.
    Settings,
}

impl ContentGenerator {
    /// Every generator, in registry order.
    pub const ALL: [Self; 5] = [
        Self::MyComputer,
        Self::RecycleBin,
        Self::Notepad,
        Self::Calculator,
        Self::Settings,
    ];

    /// Returns the persisted key.
    pub const fn key(self) -> &'static str {
        match self {
            Self::MyComputer => "createMyComputerContent",
            Self::RecycleBin => "createRecycleBinContent",
            Self::Notepad => "createNotepadContent",
            Self::Calculator => "createCalculatorContent",
            Self::Settings => "createSettingsContent",
        }
    }

    /// Parses a persisted key. Unknown keys yield `None`.
    pub fn from_key(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|generator| generator.key() == raw)
    }
}

impl std::fmt::Display for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Zero-argument factory producing a window's content markup.
pub type ContentFactory = fn() -> String;

/// Get/set hook for apps whose content must survive a reload.
///
/// `app_state` is the window's live app payload owned by the runtime.
pub trait StatefulContent {
    /// Extracts the serializable content, or `None` when there is nothing worth keeping.
    fn extract(&self, app_state: &Value) -> Option<String>;

    /// Rebuilds a live payload from previously extracted content.
    fn inject(&self, saved: &str) -> Value;
}

/// DOM id apps put on the field that should receive keyboard focus when their window is focused.
pub fn window_primary_input_dom_id(window_id: &str) -> String {
    format!("{window_id}-primary-input")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generator_keys_parse_back() {
        for generator in ContentGenerator::ALL {
            assert_eq!(ContentGenerator::from_key(generator.key()), Some(generator));
        }
        assert_eq!(ContentGenerator::from_key("createPaintContent"), None);
    }

    #[test]
    fn unknown_app_kind_decodes_as_generic() {
        let kind: AppKind = serde_json::from_str("\"generic-dynamic\"").expect("decode");
        assert_eq!(kind, AppKind::Generic);
        let kind: AppKind = serde_json::from_str("\"my-computer\"").expect("decode");
        assert_eq!(kind, AppKind::MyComputer);
        assert_eq!(
            serde_json::to_string(&AppKind::RecycleBin).expect("encode"),
            "\"recycle-bin\""
        );
    }

    #[test]
    fn only_folder_and_generic_restore_without_generator() {
        assert!(AppKind::Folder.restores_without_generator());
        assert!(AppKind::Generic.restores_without_generator());
        assert!(!AppKind::Notepad.restores_without_generator());
    }

    #[test]
    fn primary_input_id_is_scoped_to_window() {
        assert_eq!(window_primary_input_dom_id("notepad"), "notepad-primary-input");
    }
}
