//! Builder pattern implementations for test setup
//!
//! Provides fluent builders for:
//! - Product construction with sensible defaults
//! - Container hierarchies with settings and hooks

use mockprop_core::{
    ContainerDescriptor, HookRegistration, MockLifecycleHooks, MockingSettings, Strictness,
};
use std::sync::Arc;

use crate::services::Product;

/// Builder for constructing Product instances in tests
pub struct ProductBuilder {
    product: Product,
}

impl Default for ProductBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductBuilder {
    /// Create new builder with default values
    pub fn new() -> Self {
        Self {
            product: Product::new(1, "Product 1"),
        }
    }

    /// Set the id, renaming the product to match
    pub fn with_id(mut self, id: i32) -> Self {
        self.product.id = id;
        self.product.name = format!("Product {id}");
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.product.name = name.into();
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}

/// Builder for container descriptors
pub struct ContainerBuilder {
    name: String,
    parent: Option<Arc<ContainerDescriptor>>,
    strictness: Option<Strictness>,
    hooks: Vec<HookRegistration>,
}

impl ContainerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            strictness: None,
            hooks: Vec::new(),
        }
    }

    /// Nest the container in `parent`
    pub fn nested_in(mut self, parent: Arc<ContainerDescriptor>) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Declare mocking settings on the container
    pub fn with_strictness(mut self, strictness: Strictness) -> Self {
        self.strictness = Some(strictness);
        self
    }

    /// Register mock lifecycle hooks on the container
    pub fn with_mock_hooks(self, hooks: Arc<MockLifecycleHooks>) -> Self {
        self.with_hook(HookRegistration::of(hooks))
    }

    pub fn with_hook(mut self, registration: HookRegistration) -> Self {
        self.hooks.push(registration);
        self
    }

    pub fn build(self) -> Arc<ContainerDescriptor> {
        let mut container = ContainerDescriptor::new(self.name);
        if let Some(parent) = self.parent {
            container = container.nested_in(parent);
        }
        if let Some(strictness) = self.strictness {
            container = container.annotated_with(MockingSettings::new(strictness));
        }
        for registration in self.hooks {
            container = container.with_hook(registration);
        }
        Arc::new(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_builder_defaults() {
        let product = ProductBuilder::new().build();
        assert_eq!(product, Product::new(1, "Product 1"));
    }

    #[test]
    fn test_product_builder_with_id_renames() {
        let product = ProductBuilder::new().with_id(-4).build();
        assert_eq!(product.name, "Product -4");

        let product = ProductBuilder::new().with_id(9).with_name("Desk").build();
        assert_eq!(product, Product::new(9, "Desk"));
    }

    #[test]
    fn test_container_builder_nesting() {
        let outer = ContainerBuilder::new("Outer")
            .with_strictness(Strictness::Warn)
            .with_mock_hooks(Arc::new(MockLifecycleHooks::new()))
            .build();
        let inner = ContainerBuilder::new("Inner").nested_in(outer).build();

        assert_eq!(inner.parent().map(|parent| parent.name()), Some("Outer"));
        assert_eq!(inner.find_annotations::<MockingSettings>().len(), 1);
        assert_eq!(inner.applicable_hooks().around_property.len(), 1);
    }
}
