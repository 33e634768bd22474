use std::sync::Arc;

use quiz_core::Clock;
use store::Store;

/// What the composition root (e.g. `crates/app`) hands to the UI.
pub trait UiApp: Send + Sync {
    fn store(&self) -> Store;
    fn clock(&self) -> Clock;
}

#[derive(Clone)]
pub struct AppContext {
    store: Store,
    clock: Clock,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            store: app.store(),
            clock: app.clock(),
        }
    }

    #[must_use]
    pub fn store(&self) -> Store {
        self.store.clone()
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
