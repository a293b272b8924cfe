use leptos::{create_effect, logging, spawn_local, Callable, Callback};

use crate::{
    host::DesktopHostContext,
    persistence::{self, SessionLoad},
    reducer::DesktopAction,
};

pub(super) fn install_boot_hydration(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        let dispatch = dispatch;
        let store = host.state_store();
        spawn_local(async move {
            let snapshot = match persistence::load_session(store.as_ref()).await {
                Ok(SessionLoad::Loaded(snapshot)) => Some(snapshot),
                Ok(SessionLoad::Missing) => None,
                Ok(SessionLoad::Corrupted(_)) => {
                    logging::warn!("stored session was unreadable; starting fresh");
                    None
                }
                Err(err) => {
                    logging::warn!("session load failed: {err}");
                    None
                }
            };
            dispatch.call(DesktopAction::HydrateSession { snapshot });
        });
    });
}
