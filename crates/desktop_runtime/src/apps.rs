//! Built-in app catalog and the content capability table used to (re)build window content.

mod content;

use std::collections::BTreeMap;

use desktop_app_contract::{AppKind, ContentFactory, ContentGenerator, StatefulContent};
use leptos::logging;
use serde_json::{json, Value};

use crate::model::{DesktopIcon, OpenWindowRequest, WindowId};

const FOLDER_ICON: &str = "https://img.icons8.com/fluency/48/folder-win11.png";
const TEXT_DOCUMENT_ICON: &str = "https://img.icons8.com/color/48/txt.png";
const GENERIC_WIDTH: i32 = 600;
const GENERIC_HEIGHT: i32 = 400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppDescriptor {
    /// Window id for the singleton window and prefix of the desktop icon id.
    pub app_id: &'static str,
    pub title: &'static str,
    pub icon: &'static str,
    pub app_kind: AppKind,
    pub generator: ContentGenerator,
    pub width: i32,
    pub height: i32,
    pub show_on_desktop: bool,
}

impl AppDescriptor {
    pub fn desktop_icon_id(&self) -> String {
        format!("{}-icon", self.app_id)
    }
}

const BUILTIN_APPS: [AppDescriptor; 5] = [
    AppDescriptor {
        app_id: "my-computer",
        title: "This PC",
        icon: "https://img.icons8.com/fluency/48/monitor--v1.png",
        app_kind: AppKind::MyComputer,
        generator: ContentGenerator::MyComputer,
        width: 850,
        height: 550,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: "recycle-bin",
        title: "Recycle Bin",
        icon: "https://img.icons8.com/fluency/48/trash.png",
        app_kind: AppKind::RecycleBin,
        generator: ContentGenerator::RecycleBin,
        width: 500,
        height: 350,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: "notepad",
        title: "Notepad",
        icon: "https://img.icons8.com/fluency/48/notepad.png",
        app_kind: AppKind::Notepad,
        generator: ContentGenerator::Notepad,
        width: 600,
        height: 450,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: "calculator",
        title: "Calculator",
        icon: "https://img.icons8.com/fluency/48/calculator.png",
        app_kind: AppKind::Calculator,
        generator: ContentGenerator::Calculator,
        width: 350,
        height: 450,
        show_on_desktop: true,
    },
    AppDescriptor {
        app_id: "settings",
        title: "Settings",
        icon: "https://img.icons8.com/fluency/48/settings.png",
        app_kind: AppKind::Settings,
        generator: ContentGenerator::Settings,
        width: 750,
        height: 550,
        show_on_desktop: true,
    },
];

pub fn builtin_apps() -> &'static [AppDescriptor] {
    &BUILTIN_APPS
}

pub fn app_descriptor(app_id: &str) -> Option<&'static AppDescriptor> {
    builtin_apps().iter().find(|entry| entry.app_id == app_id)
}

/// Desktop icons present before any user action, without positions.
pub fn builtin_desktop_icons() -> Vec<DesktopIcon> {
    builtin_apps()
        .iter()
        .filter(|entry| entry.show_on_desktop)
        .map(|entry| DesktopIcon {
            id: entry.desktop_icon_id(),
            title: entry.title.to_string(),
            label: entry.title.to_string(),
            icon: entry.icon.to_string(),
            dynamic: false,
            position: None,
        })
        .collect()
}

/// Icon for a dynamic desktop item, inferred from its label the same way launching does.
pub fn dynamic_item_icon(label: &str) -> &'static str {
    if label.to_lowercase().contains("text document") {
        TEXT_DOCUMENT_ICON
    } else {
        FOLDER_ICON
    }
}

/// Notepad keeps its text as `{"text": ...}` in the window's app state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotepadContent;

impl StatefulContent for NotepadContent {
    fn extract(&self, app_state: &Value) -> Option<String> {
        app_state
            .get("text")
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn inject(&self, saved: &str) -> Value {
        json!({ "text": saved })
    }
}

static NOTEPAD_CONTENT: NotepadContent = NotepadContent;

/// Capability table mapping content generator keys to factories and app kinds to their
/// persistence hooks.
#[derive(Clone)]
pub struct AppRegistry {
    factories: BTreeMap<ContentGenerator, ContentFactory>,
    stateful: Vec<(AppKind, &'static dyn StatefulContent)>,
}

impl Default for AppRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl std::fmt::Debug for AppRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppRegistry")
            .field("generators", &self.factories.keys().collect::<Vec<_>>())
            .field(
                "stateful",
                &self.stateful.iter().map(|(kind, _)| kind).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AppRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
            stateful: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        Self::empty()
            .with_generator(ContentGenerator::MyComputer, content::my_computer)
            .with_generator(ContentGenerator::RecycleBin, content::recycle_bin)
            .with_generator(ContentGenerator::Notepad, content::notepad)
            .with_generator(ContentGenerator::Calculator, content::calculator)
            .with_generator(ContentGenerator::Settings, content::settings)
            .with_stateful(AppKind::Notepad, &NOTEPAD_CONTENT)
    }

    pub fn with_generator(mut self, generator: ContentGenerator, factory: ContentFactory) -> Self {
        self.factories.insert(generator, factory);
        self
    }

    pub fn without_generator(mut self, generator: ContentGenerator) -> Self {
        self.factories.remove(&generator);
        self
    }

    pub fn with_stateful(mut self, kind: AppKind, hook: &'static dyn StatefulContent) -> Self {
        self.stateful.retain(|(existing, _)| *existing != kind);
        self.stateful.push((kind, hook));
        self
    }

    pub fn is_registered(&self, generator: ContentGenerator) -> bool {
        self.factories.contains_key(&generator)
    }

    /// Resolves a persisted key to a generator this registry can render.
    pub fn resolve_key(&self, key: &str) -> Option<ContentGenerator> {
        ContentGenerator::from_key(key).filter(|generator| self.is_registered(*generator))
    }

    pub fn render(&self, generator: ContentGenerator) -> Option<String> {
        self.factories.get(&generator).map(|factory| factory())
    }

    pub fn placeholder(&self, title: &str) -> String {
        content::placeholder(title)
    }

    pub fn stateful_hook(&self, kind: AppKind) -> Option<&'static dyn StatefulContent> {
        self.stateful
            .iter()
            .find(|(existing, _)| *existing == kind)
            .map(|(_, hook)| *hook)
    }

    /// Builds the open request for a catalog app, or `None` when its generator is not registered.
    pub fn launch_request(&self, app_id: &str) -> Option<OpenWindowRequest> {
        let descriptor = app_descriptor(app_id)?;
        let content = self.render(descriptor.generator)?;
        let mut request = OpenWindowRequest::new(
            descriptor.title,
            descriptor.app_kind,
            descriptor.width,
            descriptor.height,
        );
        request.id = Some(WindowId::new(descriptor.app_id));
        request.icon = descriptor.icon.to_string();
        request.content_generator = Some(descriptor.generator);
        request.content = content;
        Some(request)
    }

    /// Builds the open request for a desktop icon.
    ///
    /// Dynamic folders open as an explorer view and dynamic text documents as notepad. Anything
    /// else gets placeholder content that cannot be rebuilt after a reload. Returns `None` only
    /// when the resolved generator is not registered.
    pub fn launch_request_for_icon(&self, icon: &DesktopIcon) -> Option<OpenWindowRequest> {
        let window_id = WindowId::new(icon.id.strip_suffix("-icon").unwrap_or(&icon.id));
        if !icon.dynamic {
            if let Some(descriptor) = app_descriptor(window_id.as_str()) {
                let mut request = self.launch_request(descriptor.app_id)?;
                request.title = icon.title.clone();
                return Some(request);
            }
            logging::warn!("no app registered for desktop icon `{}`", icon.id);
        }

        let label = icon.title.to_lowercase();
        let (kind, generator, width, height) = if !icon.dynamic {
            (AppKind::Generic, None, GENERIC_WIDTH, GENERIC_HEIGHT)
        } else if label.contains("folder") {
            (AppKind::Folder, Some(ContentGenerator::MyComputer), 700, 500)
        } else if label.contains("text document") {
            (AppKind::Notepad, Some(ContentGenerator::Notepad), 600, 450)
        } else {
            (AppKind::Generic, None, GENERIC_WIDTH, GENERIC_HEIGHT)
        };

        let content = match generator {
            Some(generator) => self.render(generator)?,
            None => self.placeholder(&icon.title),
        };
        let mut request = OpenWindowRequest::new(icon.title.clone(), kind, width, height);
        request.id = Some(window_id);
        request.icon = icon.icon.clone();
        request.content_generator = generator;
        request.content = content;
        Some(request)
    }
}
