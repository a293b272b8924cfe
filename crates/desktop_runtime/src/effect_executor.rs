//! Drains reducer-emitted [`RuntimeEffect`] intents into the host.

use leptos::*;

use crate::{reducer::RuntimeEffect, runtime_context::DesktopRuntimeContext};

/// Takes every queued effect in emission order and leaves the queue empty.
///
/// The emptiness check is a tracked read, so calling this inside an effect subscribes to the queue.
fn drain(queue: RwSignal<Vec<RuntimeEffect>>) -> Vec<RuntimeEffect> {
    if queue.with(Vec::is_empty) {
        return Vec::new();
    }
    let mut drained = Vec::new();
    queue.update(|pending| drained = std::mem::take(pending));
    drained
}

/// Runs queued effects through the host whenever the reducer appends to the queue.
///
/// The queue is emptied before the batch runs, so effects that dispatch again land in a new batch.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        let batch = drain(runtime.effects);
        if batch.is_empty() {
            return;
        }
        let host = runtime.host.get_value();
        for effect in batch {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
