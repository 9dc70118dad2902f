use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::store::PropertyStore;
use super::{AroundPropertyHook, AroundTryHook, PropagationMode};
use crate::discovery::TestInstance;

/// A hook registered on a container
#[derive(Clone)]
pub struct HookRegistration {
    propagation: PropagationMode,
    around_property: Option<Arc<dyn AroundPropertyHook>>,
    around_try: Option<Arc<dyn AroundTryHook>>,
}

impl HookRegistration {
    /// Register a hook taking part in both property and try phases
    pub fn of<H>(hook: Arc<H>) -> Self
    where
        H: AroundPropertyHook + AroundTryHook + 'static,
    {
        Self {
            propagation: hook.propagate_to(),
            around_property: Some(hook.clone()),
            around_try: Some(hook),
        }
    }

    /// Register a hook taking part in the property phase only
    pub fn around_property(hook: Arc<dyn AroundPropertyHook>) -> Self {
        Self {
            propagation: hook.propagate_to(),
            around_property: Some(hook),
            around_try: None,
        }
    }

    /// Register a hook taking part in the try phase only
    pub fn around_try(hook: Arc<dyn AroundTryHook>) -> Self {
        Self {
            propagation: hook.propagate_to(),
            around_property: None,
            around_try: Some(hook),
        }
    }

    pub fn propagation(&self) -> PropagationMode {
        self.propagation
    }
}

/// Hooks that apply to the properties of one container, outermost first
#[derive(Clone, Default)]
pub struct ApplicableHooks {
    pub around_property: Vec<Arc<dyn AroundPropertyHook>>,
    pub around_try: Vec<Arc<dyn AroundTryHook>>,
}

/// A container of properties, possibly nested in another container.
///
/// Annotations are arbitrary `'static` values looked up by type; hooks are
/// registered per container and reach nested containers according to their
/// [`PropagationMode`].
#[derive(Clone, Default)]
pub struct ContainerDescriptor {
    name: String,
    parent: Option<Arc<ContainerDescriptor>>,
    annotations: Vec<Arc<dyn Any + Send + Sync>>,
    hooks: Vec<HookRegistration>,
}

impl ContainerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Nest this container inside `parent`
    pub fn nested_in(mut self, parent: Arc<ContainerDescriptor>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Attach an annotation value
    pub fn annotated_with<A: Any + Send + Sync>(mut self, annotation: A) -> Self {
        self.annotations.push(Arc::new(annotation));
        self
    }

    /// Register a lifecycle hook
    pub fn with_hook(mut self, registration: HookRegistration) -> Self {
        self.hooks.push(registration);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<&Arc<ContainerDescriptor>> {
        self.parent.as_ref()
    }

    /// Annotations of type `A` on this container and its enclosing
    /// containers, innermost first
    pub fn find_annotations<A: Any>(&self) -> Vec<&A> {
        let mut found = Vec::new();
        let mut current = Some(self);
        while let Some(container) = current {
            found.extend(
                container
                    .annotations
                    .iter()
                    .filter_map(|annotation| (**annotation).downcast_ref::<A>()),
            );
            current = container.parent.as_deref();
        }
        found
    }

    /// Hooks applying to properties declared directly in this container
    pub fn applicable_hooks(&self) -> ApplicableHooks {
        let mut chain = Vec::new();
        let mut current = Some(self);
        let mut distance = 0;
        while let Some(container) = current {
            chain.push((distance, container));
            current = container.parent.as_deref();
            distance += 1;
        }

        let mut hooks = ApplicableHooks::default();
        for (distance, container) in chain.into_iter().rev() {
            for registration in &container.hooks {
                if !registration.propagation.reaches(distance) {
                    continue;
                }
                if let Some(hook) = &registration.around_property {
                    hooks.around_property.push(hook.clone());
                }
                if let Some(hook) = &registration.around_try {
                    hooks.around_try.push(hook.clone());
                }
            }
        }
        hooks
    }
}

impl fmt::Debug for ContainerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerDescriptor")
            .field("name", &self.name)
            .field("parent", &self.parent.as_ref().map(|parent| parent.name()))
            .field("annotations", &self.annotations.len())
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

/// A property to run: its name, its container and the participating test
/// instances, outermost first
#[derive(Clone)]
pub struct PropertyDescriptor {
    name: String,
    container: Arc<ContainerDescriptor>,
    instances: Vec<Arc<dyn TestInstance>>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>, container: Arc<ContainerDescriptor>) -> Self {
        Self {
            name: name.into(),
            container,
            instances: Vec::new(),
        }
    }

    pub fn with_instance(mut self, instance: Arc<dyn TestInstance>) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn container(&self) -> &Arc<ContainerDescriptor> {
        &self.container
    }

    pub fn instances(&self) -> &[Arc<dyn TestInstance>] {
        &self.instances
    }
}

/// Context handed to property hooks
pub struct PropertyLifecycleContext {
    property_name: String,
    container: Arc<ContainerDescriptor>,
    instances: Vec<Arc<dyn TestInstance>>,
    store: PropertyStore,
}

impl PropertyLifecycleContext {
    pub fn new(property: &PropertyDescriptor) -> Self {
        Self {
            property_name: property.name.clone(),
            container: property.container.clone(),
            instances: property.instances.clone(),
            store: PropertyStore::new(),
        }
    }

    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    pub fn container(&self) -> &ContainerDescriptor {
        &self.container
    }

    pub fn test_instances(&self) -> &[Arc<dyn TestInstance>] {
        &self.instances
    }

    /// Annotations of type `A` visible from the property's container
    pub fn find_annotations_in_container<A: Any>(&self) -> Vec<&A> {
        self.container.find_annotations::<A>()
    }

    pub fn store(&self) -> &PropertyStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PropertyStore {
        &mut self.store
    }
}

impl fmt::Debug for PropertyLifecycleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyLifecycleContext")
            .field("property_name", &self.property_name)
            .field("container", &self.container.name())
            .field("instances", &self.instances.len())
            .field("store", &self.store)
            .finish()
    }
}

/// Context handed to try hooks for one generated trial
#[derive(Debug)]
pub struct TryLifecycleContext<'p> {
    property_name: &'p str,
    try_index: usize,
    parameters: String,
    store: &'p PropertyStore,
}

impl<'p> TryLifecycleContext<'p> {
    pub fn new(
        property_name: &'p str,
        try_index: usize,
        parameters: String,
        store: &'p PropertyStore,
    ) -> Self {
        Self {
            property_name,
            try_index,
            parameters,
            store,
        }
    }

    pub fn property_name(&self) -> &str {
        self.property_name
    }

    /// Zero-based index of the trial, shrinking trials included
    pub fn try_index(&self) -> usize {
        self.try_index
    }

    /// Debug rendering of the generated parameters
    pub fn parameters(&self) -> &str {
        &self.parameters
    }

    /// Store of the enclosing property
    pub fn store(&self) -> &'p PropertyStore {
        self.store
    }
}
