use std::rc::Rc;

use platform_host::{NoopStateStore, StateStore};

use crate::WebStateStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Compile-time selected host strategy for `platform_host_web` adapters.
pub enum HostStrategy {
    /// Browser-backed adapters from `platform_host_web`.
    Browser,
    /// Placeholder adapters that keep nothing between reloads.
    DesktopStub,
}

/// Returns the compile-time selected host strategy for the active build.
pub const fn selected_host_strategy() -> HostStrategy {
    #[cfg(feature = "desktop-host-stub")]
    {
        HostStrategy::DesktopStub
    }

    #[cfg(not(feature = "desktop-host-stub"))]
    {
        HostStrategy::Browser
    }
}

/// Returns the selected host strategy as a stable string token.
pub fn host_strategy_name() -> &'static str {
    match selected_host_strategy() {
        HostStrategy::Browser => "browser",
        HostStrategy::DesktopStub => "desktop-stub",
    }
}

/// Builds the blob store for the selected host strategy.
pub fn state_store() -> Rc<dyn StateStore> {
    match selected_host_strategy() {
        HostStrategy::Browser => Rc::new(WebStateStore),
        HostStrategy::DesktopStub => Rc::new(NoopStateStore),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_name_matches_selection() {
        let expected = if cfg!(feature = "desktop-host-stub") {
            "desktop-stub"
        } else {
            "browser"
        };
        assert_eq!(host_strategy_name(), expected);
    }
}
