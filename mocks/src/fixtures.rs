//! Standard test instances and containers
//!
//! Provides ready-made test instances mirroring common mock setups:
//! - A programmatic mock injected into its subject
//! - Annotated mock slots filled by the session
//! - A spy wrapping a real service
//! - Nested containers inheriting the lifecycle hooks

use mockprop_core::{
    ContainerDescriptor, Fields, HookRegistration, MockLifecycleHooks, MockSlot, MockingSettings,
    PropertyDescriptor, Strictness, TestInstance,
};
use std::sync::Arc;

use crate::doubles::{MockCountingService, MockProductRepository, SpyLoggingService};
use crate::services::{AddingService, ProductService};

/// Test instance holding a programmatic mock and the service it is injected into
pub struct AddingServiceTest {
    pub counting_service: Arc<MockCountingService>,
    pub adding_service: AddingService,
}

impl Default for AddingServiceTest {
    fn default() -> Self {
        Self::new()
    }
}

impl AddingServiceTest {
    pub fn new() -> Self {
        let counting_service = Arc::new(MockCountingService::new());
        Self {
            adding_service: AddingService::new(counting_service.clone()),
            counting_service,
        }
    }
}

impl TestInstance for AddingServiceTest {
    fn instance_name(&self) -> &'static str {
        "AddingServiceTest"
    }

    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields
            .value("counting_service", &self.counting_service)
            .inject_mocks("adding_service");
    }
}

/// Group nested in [`AddingServiceTest`]; it owns no mocks of its own
pub struct PropertyTestsGroup {
    pub outer: Arc<AddingServiceTest>,
}

impl PropertyTestsGroup {
    pub fn new(outer: Arc<AddingServiceTest>) -> Self {
        Self { outer }
    }
}

impl TestInstance for PropertyTestsGroup {
    fn instance_name(&self) -> &'static str {
        "AddingServiceTest.PropertyTests"
    }

    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields.plain("outer");
    }
}

/// Test instance with an annotated repository slot and a programmatic spy
pub struct ProductServiceTest {
    pub product_repository: MockSlot<MockProductRepository>,
    pub logging_service: Arc<SpyLoggingService>,
}

impl Default for ProductServiceTest {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductServiceTest {
    pub fn new() -> Self {
        Self {
            product_repository: MockSlot::new(),
            logging_service: Arc::new(SpyLoggingService::default()),
        }
    }

    pub fn with_logging_service(logging_service: Arc<SpyLoggingService>) -> Self {
        Self {
            product_repository: MockSlot::new(),
            logging_service,
        }
    }

    /// Subject wired with the current mocks.
    ///
    /// # Panics
    ///
    /// Panics if no session has filled the repository slot yet.
    pub fn product_service(&self) -> ProductService {
        ProductService::new(
            self.product_repository.mock(),
            self.logging_service.clone(),
        )
    }
}

impl TestInstance for ProductServiceTest {
    fn instance_name(&self) -> &'static str {
        "ProductServiceTest"
    }

    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields
            .mock("product_repository", &self.product_repository)
            .value("logging_service", &self.logging_service)
            .captor("logging_message_captor")
            .inject_mocks("product_service");
    }
}

/// Test instance mixing every kind of field
pub struct MixedMocksTest {
    pub counting_service: MockSlot<MockCountingService>,
    pub product_repository: Arc<MockProductRepository>,
    pub logging_service: MockSlot<SpyLoggingService>,
    pub timeout_ms: u64,
}

impl Default for MixedMocksTest {
    fn default() -> Self {
        Self {
            counting_service: MockSlot::new(),
            product_repository: Arc::new(MockProductRepository::new()),
            logging_service: MockSlot::new(),
            timeout_ms: 250,
        }
    }
}

impl TestInstance for MixedMocksTest {
    fn instance_name(&self) -> &'static str {
        "MixedMocksTest"
    }

    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields
            .mock("counting_service", &self.counting_service)
            .plain("timeout_ms")
            .value("product_repository", &self.product_repository)
            .spy("logging_service", &self.logging_service);
    }
}

/// Top-level container with `hooks` registered on it
pub fn create_hooked_container(
    name: &str,
    hooks: Arc<MockLifecycleHooks>,
) -> Arc<ContainerDescriptor> {
    Arc::new(ContainerDescriptor::new(name).with_hook(HookRegistration::of(hooks)))
}

/// Top-level container with `hooks` and a strictness setting
pub fn create_strict_container(
    name: &str,
    strictness: Strictness,
    hooks: Arc<MockLifecycleHooks>,
) -> Arc<ContainerDescriptor> {
    Arc::new(
        ContainerDescriptor::new(name)
            .annotated_with(MockingSettings::new(strictness))
            .with_hook(HookRegistration::of(hooks)),
    )
}

/// Container nested in `parent` without hooks of its own
pub fn create_nested_container(
    name: &str,
    parent: Arc<ContainerDescriptor>,
) -> Arc<ContainerDescriptor> {
    Arc::new(ContainerDescriptor::new(name).nested_in(parent))
}

/// Property of the `PropertyTests` group nested in [`AddingServiceTest`]
pub fn create_adding_property(
    name: &str,
    test: Arc<AddingServiceTest>,
    hooks: Arc<MockLifecycleHooks>,
) -> PropertyDescriptor {
    let outer = create_hooked_container("AddingServiceTest", hooks);
    let group = create_nested_container("PropertyTests", outer);
    PropertyDescriptor::new(name, group)
        .with_instance(test.clone())
        .with_instance(Arc::new(PropertyTestsGroup::new(test)))
}

/// Property declared directly on [`ProductServiceTest`]
pub fn create_product_property(
    name: &str,
    test: Arc<ProductServiceTest>,
    hooks: Arc<MockLifecycleHooks>,
) -> PropertyDescriptor {
    PropertyDescriptor::new(name, create_hooked_container("ProductServiceTest", hooks))
        .with_instance(test)
}
