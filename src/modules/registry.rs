//! Module registration.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::navigation::Navigator;

/// A feature that contributes routes and interceptors.
pub trait RoutableModule: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    fn setup(&self, navigator: &Navigator) {
        let _ = navigator;
    }

    fn register_routes(&self, navigator: &Navigator) {
        let _ = navigator;
    }

    fn register_interceptors(&self, navigator: &Navigator) {
        let _ = navigator;
    }
}

/// Ordered list of modules, loaded at most once.
#[derive(Default)]
pub struct ModuleRegistry {
    modules: Vec<Box<dyn RoutableModule>>,
    loaded: AtomicBool,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_module<M: RoutableModule + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Run every module's hooks against `navigator`, in list order.
    /// Returns false if the registry was already loaded.
    pub fn load(&self, navigator: &Navigator) -> bool {
        if self.loaded.swap(true, Ordering::SeqCst) {
            return false;
        }

        for module in &self.modules {
            module.setup(navigator);
            module.register_routes(navigator);
            module.register_interceptors(navigator);
            tracing::info!(module = module.name(), "Module loaded");
        }
        true
    }
}
