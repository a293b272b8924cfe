//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, the runtime effect queue, host bootstrap
//! wiring, and the taskbar clock tick. Rendering stays with the embedding shell.
#![allow(clippy::clone_on_copy)]

use std::time::Duration;

use leptos::*;
use platform_host::local_wall_clock;

use crate::{
    effect_executor,
    host::DesktopHostContext,
    interaction::InteractionState,
    model::DesktopState,
    reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
    taskbar::{clock_reading, ClockReading},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects and environment queries.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Reactive pointer drag/resize session signal.
    pub interaction: RwSignal<InteractionState>,
    /// Queue of runtime effects emitted by the reducer and processed by the host.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Taskbar clock, refreshed every second.
    pub clock: RwSignal<Option<ClockReading>>,
    /// Most recent rejected action, kept until dismissed or replaced by the next rejection.
    pub notice: RwSignal<Option<ReducerError>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Clears the rejection notice once the shell has shown it.
    pub fn dismiss_notice(&self) {
        if self.notice.with_untracked(Option::is_some) {
            self.notice.set(None);
        }
    }
}

#[derive(Clone, Copy)]
struct ReducerSignals {
    state: RwSignal<DesktopState>,
    interaction: RwSignal<InteractionState>,
    effects: RwSignal<Vec<RuntimeEffect>>,
    notice: RwSignal<Option<ReducerError>>,
}

impl ReducerSignals {
    /// Runs one action through the reducer. Signals are only written when their value changed,
    /// and new effects are appended behind anything still queued.
    fn apply(self, host: &DesktopHostContext, action: DesktopAction) {
        let mut desktop = self.state.get_untracked();
        let mut session = self.interaction.get_untracked();
        let previous_desktop = desktop.clone();
        let previous_session = session.clone();

        match reduce_desktop(&mut desktop, &mut session, host.apps(), action) {
            Ok(new_effects) => {
                if desktop != previous_desktop {
                    self.state.set(desktop);
                }
                if session != previous_session {
                    self.interaction.set(session);
                }
                if !new_effects.is_empty() {
                    self.effects.update(|queue| queue.extend(new_effects));
                }
            }
            Err(err) => {
                logging::warn!("desktop reducer error: {err}");
                self.notice.set(Some(err));
            }
        }
    }
}

fn read_clock() -> Option<ClockReading> {
    local_wall_clock().map(clock_reading)
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    runtime
        .host
        .get_value()
        .install_boot_hydration(runtime.dispatch);
    effect_executor::install(runtime);

    let resize_listener = window_event_listener(ev::resize, move |_| {
        let viewport = runtime.host.get_value().desktop_viewport();
        runtime.dispatch_action(DesktopAction::SetViewport { viewport });
    });
    on_cleanup(move || resize_listener.remove());

    match set_interval_with_handle(
        move || runtime.clock.set(read_clock()),
        Duration::from_secs(1),
    ) {
        Ok(interval) => on_cleanup(move || interval.clear()),
        Err(err) => logging::warn!("clock tick unavailable: {err:?}"),
    }
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots persisted state.
pub fn DesktopProvider(
    /// Host bundle override; the browser host is used when omitted.
    #[prop(optional)]
    host: Option<DesktopHostContext>,
    children: Children,
) -> impl IntoView {
    let host = store_value(host.unwrap_or_default());
    let state = create_rw_signal(DesktopState {
        viewport: host.get_value().desktop_viewport(),
        ..DesktopState::default()
    });
    let interaction = create_rw_signal(InteractionState::default());
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());
    let clock = create_rw_signal(read_clock());

    let notice = create_rw_signal(None::<ReducerError>);

    let signals = ReducerSignals {
        state,
        interaction,
        effects,
        notice,
    };
    let dispatch = Callback::new(move |action: DesktopAction| {
        host.with_value(|host| signals.apply(host, action));
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        interaction,
        effects,
        clock,
        notice,
        dispatch,
    };

    provide_context(runtime.clone());

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
