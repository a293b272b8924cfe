//! Host-side runtime helpers for executing reducer effects and querying browser environment state.
//!
//! The reducer only emits [`RuntimeEffect`] intents. This module turns them into storage writes,
//! timers, and DOM focus changes behind a typed boundary that tests can swap out.

mod boot;
mod host_ui;

use std::rc::Rc;

use leptos::{logging, set_timeout, spawn_local, Callable, Callback, SignalGetUntracked};
use platform_host::StateStore;
use platform_host_web::{host_strategy_name, state_store};

use crate::{
    apps::AppRegistry,
    model::{Viewport, WindowId},
    persistence,
    reducer::{CloseTrigger, DesktopAction, RuntimeEffect},
    runtime_context::DesktopRuntimeContext,
};

#[derive(Clone)]
/// Host service bundle for desktop runtime side effects.
pub struct DesktopHostContext {
    store: Rc<dyn StateStore>,
    apps: AppRegistry,
    host_strategy_name: &'static str,
}

impl Default for DesktopHostContext {
    fn default() -> Self {
        Self::new(state_store(), AppRegistry::builtin())
    }
}

impl std::fmt::Debug for DesktopHostContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DesktopHostContext")
            .field("apps", &self.apps)
            .field("host_strategy_name", &self.host_strategy_name)
            .finish_non_exhaustive()
    }
}

impl DesktopHostContext {
    /// Creates a host context around an explicit store and app registry.
    pub fn new(store: Rc<dyn StateStore>, apps: AppRegistry) -> Self {
        Self {
            store,
            apps,
            host_strategy_name: host_strategy_name(),
        }
    }

    /// Returns the configured session blob store.
    pub fn state_store(&self) -> Rc<dyn StateStore> {
        self.store.clone()
    }

    /// Returns the content capability table used for launching and restoring windows.
    pub fn apps(&self) -> &AppRegistry {
        &self.apps
    }

    /// Returns the stable name of the selected host strategy.
    pub fn host_strategy_name(&self) -> &'static str {
        self.host_strategy_name
    }

    /// Installs the boot hydration side effect for the desktop provider.
    ///
    /// The stored session is read once and handed to the reducer as
    /// [`DesktopAction::HydrateSession`]. A missing, corrupted, or unreadable blob hydrates
    /// defaults instead.
    pub fn install_boot_hydration(&self, dispatch: Callback<DesktopAction>) {
        boot::install_boot_hydration(self.clone(), dispatch);
    }

    /// Measures the window container (browser viewport minus the taskbar).
    pub fn desktop_viewport(&self) -> Viewport {
        host_ui::desktop_viewport()
    }

    /// Executes a single [`RuntimeEffect`] emitted by the reducer.
    pub fn run_runtime_effect(&self, runtime: DesktopRuntimeContext, effect: RuntimeEffect) {
        match effect {
            RuntimeEffect::PersistSession => self.persist_session(runtime),
            RuntimeEffect::FocusWindowInput(window_id) => self.focus_window_input(window_id),
            RuntimeEffect::ScheduleCloseCleanup {
                window_id,
                delay_ms,
            } => schedule_close_cleanup(runtime.dispatch, window_id, delay_ms),
        }
    }

    /// Moves keyboard focus into the window's primary input after the next paint.
    ///
    /// Apps opt in by rendering an element with
    /// [`desktop_app_contract::window_primary_input_dom_id`] on their primary text field.
    pub fn focus_window_input(&self, window_id: WindowId) {
        host_ui::focus_window_input(window_id);
    }

    fn persist_session(&self, runtime: DesktopRuntimeContext) {
        let snapshot = persistence::snapshot_session(&runtime.state.get_untracked(), &self.apps);
        let store = self.store.clone();
        spawn_local(async move {
            if let Err(err) = persistence::persist_session(store.as_ref(), &snapshot).await {
                logging::warn!("persist session failed: {err}");
            }
        });
    }
}

fn schedule_close_cleanup(dispatch: Callback<DesktopAction>, window_id: WindowId, delay_ms: u32) {
    set_timeout(
        move || {
            dispatch.call(DesktopAction::FinalizeClose {
                window_id,
                trigger: CloseTrigger::FallbackTimeout,
            });
        },
        std::time::Duration::from_millis(u64::from(delay_ms)),
    );
}
