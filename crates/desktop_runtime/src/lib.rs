//! Window-manager core for a browser desktop shell.
//!
//! State lives in [`DesktopState`] and changes only through [`reduce_desktop`]. The Leptos
//! [`DesktopProvider`] owns the reducer container and executes the emitted [`RuntimeEffect`]s.

pub mod apps;
pub mod desktop_icons;
mod effect_executor;
pub mod geometry;
pub mod host;
pub mod interaction;
pub mod model;
pub mod overlays;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod taskbar;
pub mod window_manager;

pub use apps::AppRegistry;
pub use host::DesktopHostContext;
pub use interaction::InteractionState;
pub use model::*;
pub use persistence::{
    load_session, persist_session, snapshot_session, SessionLoad, SessionSnapshot,
};
pub use reducer::{reduce_desktop, CloseTrigger, DesktopAction, ReducerError, RuntimeEffect};
pub use runtime_context::{use_desktop_runtime, DesktopProvider, DesktopRuntimeContext};
