//! # Container
//!
//! A registry of lazily built services. Each entry is looked up with a typed
//! [`ServiceKey`], so a lookup can only return what was registered under it.
//!
//! Transient entries are rebuilt on every lookup; singleton entries are built
//! once and shared. Builders receive the container so they can resolve their
//! own dependencies. There is no cycle detection: a builder that asks for its
//! own key, directly or transitively, never returns.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use once_cell::sync::OnceCell;

type Instance = Arc<dyn Any + Send + Sync>;
type Builder = Box<dyn Fn(&Container) -> Instance + Send + Sync>;

/// Names a service and the type it resolves to.
pub struct ServiceKey<T: ?Sized> {
    name: &'static str,
    _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> ServiceKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self { name, _marker: PhantomData }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: ?Sized> Clone for ServiceKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: ?Sized> Copy for ServiceKey<T> {}

impl<T: ?Sized> fmt::Debug for ServiceKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceKey").field(&self.name).finish()
    }
}

struct Registration {
    singleton: bool,
    builder: Builder,
    instance: OnceCell<Instance>,
}

#[derive(Default)]
pub struct Container {
    services: HashMap<&'static str, Registration>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory that runs on every lookup.
    pub fn add_service<T, F>(&mut self, key: ServiceKey<T>, builder: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        self.register(key, false, builder);
    }

    /// Registers a factory whose first result is cached for the process.
    pub fn add_singleton<T, F>(&mut self, key: ServiceKey<T>, builder: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        self.register(key, true, builder);
    }

    fn register<T, F>(&mut self, key: ServiceKey<T>, singleton: bool, builder: F)
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Container) -> Arc<T> + Send + Sync + 'static,
    {
        let builder: Builder = Box::new(move |ctn| Arc::new(builder(ctn)) as Instance);
        let previous = self.services.insert(
            key.name,
            Registration { singleton, builder, instance: OnceCell::new() },
        );

        if previous.is_some() {
            tracing::warn!(service = key.name, "service registration replaced");
        }
    }

    /// Resolves a service.
    ///
    /// # Panics
    ///
    /// When nothing is registered under `key`. Wiring mistakes surface at
    /// startup rather than as request errors.
    pub fn get<T>(&self, key: ServiceKey<T>) -> Arc<T>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let Some(registration) = self.services.get(key.name) else {
            panic!("service '{}' is not registered", key.name);
        };

        let instance = if registration.singleton {
            registration.instance.get_or_init(|| (registration.builder)(self)).clone()
        } else {
            (registration.builder)(self)
        };

        match instance.downcast_ref::<Arc<T>>() {
            Some(service) => Arc::clone(service),
            None => panic!("service '{}' is registered with another type", key.name),
        }
    }

    pub fn contains<T: ?Sized>(&self, key: ServiceKey<T>) -> bool {
        self.services.contains_key(key.name)
    }
}
