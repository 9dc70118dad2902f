//! End-to-end tests of the mock lifecycle hooks driving the property runner

use mockprop_core::{
    AroundPropertyHook, AroundTryHook, ContainerDescriptor, Fields, HookRegistration,
    LifecycleError, LifecycleHook, Mock, MockLifecycleHooks, MockMethod, MockSlot, MockingLogger,
    MockingSettings, PropertyDescriptor, PropertyExecutionResult, PropertyExecutor,
    PropertyLifecycleContext, PropertyRunner, PropertyStatus, Result, Strictness, TestInstance,
    TryExecutionResult, TryExecutor, TryLifecycleContext,
};
use parking_lot::Mutex;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use std::sync::Arc;

struct Inventory {
    name: &'static str,
    stock: MockMethod<String, u32>,
}

impl Inventory {
    fn named(name: &'static str) -> Self {
        Self {
            name,
            stock: MockMethod::new(format!("{name}::stock")),
        }
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::named("annotated")
    }
}

impl Mock for Inventory {
    fn mock_name(&self) -> &str {
        self.name
    }

    fn reset(&self) {
        self.stock.reset();
    }

    fn invocation_count(&self) -> usize {
        self.stock.times_invoked()
    }

    fn unused_stubbings(&self) -> Vec<String> {
        self.stock.unused_stubbings()
    }
}

struct WarehouseTest {
    primary: MockSlot<Inventory>,
    backup: Arc<Inventory>,
}

impl Default for WarehouseTest {
    fn default() -> Self {
        Self {
            primary: MockSlot::new(),
            backup: Arc::new(Inventory::named("programmatic")),
        }
    }
}

impl TestInstance for WarehouseTest {
    fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
        fields
            .mock("primary", &self.primary)
            .plain("capacity")
            .value("backup", &self.backup);
    }
}

#[derive(Default)]
struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl MockingLogger for RecordingLogger {
    fn log(&self, what: &str) {
        self.lines.lock().push(what.to_string());
    }
}

/// Stubs the annotated mock once, after the session has filled it
struct SeedStubbing {
    test: Arc<WarehouseTest>,
}

impl LifecycleHook for SeedStubbing {}

impl AroundPropertyHook for SeedStubbing {
    fn around_property(
        &self,
        context: &mut PropertyLifecycleContext,
        executor: &mut dyn PropertyExecutor,
    ) -> Result<PropertyExecutionResult> {
        self.test
            .primary
            .mock()
            .stock
            .when("never-asked".to_string())
            .then_return(1);
        executor.execute(context)
    }
}

/// Panics after the trial body ran on the first try
struct ExplodingTryHook;

impl LifecycleHook for ExplodingTryHook {}

impl AroundTryHook for ExplodingTryHook {
    fn around_try(
        &self,
        context: &TryLifecycleContext<'_>,
        executor: &mut dyn TryExecutor,
    ) -> Result<TryExecutionResult> {
        let result = executor.execute(context);
        if context.try_index() == 0 {
            panic!("audit hook failed");
        }
        result
    }
}

fn runner(cases: u32) -> PropertyRunner {
    PropertyRunner::with_proptest_config(ProptestConfig {
        cases,
        failure_persistence: None,
        ..ProptestConfig::default()
    })
}

fn seeded_property(
    strictness: Option<Strictness>,
    logger: Arc<RecordingLogger>,
) -> PropertyDescriptor {
    let test = Arc::new(WarehouseTest::default());
    let mut outer = ContainerDescriptor::new("WarehouseTest").with_hook(HookRegistration::of(
        Arc::new(MockLifecycleHooks::with_logger(logger)),
    ));
    if let Some(strictness) = strictness {
        outer = outer.annotated_with(MockingSettings::new(strictness));
    }
    let inner = ContainerDescriptor::new("Seeded")
        .nested_in(Arc::new(outer))
        .with_hook(HookRegistration::around_property(Arc::new(SeedStubbing {
            test: test.clone(),
        })));
    PropertyDescriptor::new("seeded", Arc::new(inner)).with_instance(test)
}

#[test]
fn test_every_mock_is_reset_after_each_trial() {
    let hooks = Arc::new(MockLifecycleHooks::new());
    let first = Arc::new(WarehouseTest::default());
    let second = Arc::new(WarehouseTest::default());
    let container = Arc::new(
        ContainerDescriptor::new("Warehouses").with_hook(HookRegistration::of(hooks.clone())),
    );
    let property = PropertyDescriptor::new("stock_is_stubbed", container)
        .with_instance(first.clone())
        .with_instance(second.clone());

    let result = runner(64)
        .run(&property, ("[a-z]{1,8}", 0u32..500), |(item, amount)| {
            for test in [&first, &second] {
                let primary = test.primary.mock();
                primary.stock.when(item.clone()).then_return(amount);
                prop_assert_eq!(primary.stock.invoke(item.clone()), Some(amount));
                prop_assert_eq!(test.backup.stock.invoke(item.clone()), None);
                prop_assert_eq!(primary.invocation_count(), 1);
                prop_assert_eq!(test.backup.invocation_count(), 1);
            }
            Ok(())
        })
        .unwrap();

    assert!(result.is_successful());
    assert_eq!(hooks.stats().mocks_reset, 4 * 64);
    for test in [&first, &second] {
        assert_eq!(test.primary.mock().invocation_count(), 0);
        assert_eq!(test.primary.mock().stock.stub_count(), 0);
        assert_eq!(test.backup.invocation_count(), 0);
    }
}

#[test]
fn test_session_closed_once_when_trials_fail() {
    let hooks = Arc::new(MockLifecycleHooks::new());
    let test = Arc::new(WarehouseTest::default());
    let container = Arc::new(
        ContainerDescriptor::new("Warehouse").with_hook(HookRegistration::of(hooks.clone())),
    );
    let property = PropertyDescriptor::new("fails", container).with_instance(test.clone());

    let result = runner(100)
        .run(&property, 0u32..100, |amount| {
            test.backup.stock.when("item".to_string()).then_return(amount);
            prop_assert_eq!(test.backup.stock.invoke("item".to_string()), Some(amount));
            prop_assert!(amount < 10);
            Ok(())
        })
        .unwrap();

    assert_eq!(result.status, PropertyStatus::Failed);
    assert_eq!(result.falsified_sample.as_deref(), Some("10"));
    let stats = hooks.stats();
    assert_eq!(stats.properties, 1);
    assert_eq!(stats.sessions_opened, 1);
    assert_eq!(stats.sessions_closed, 1);
    assert_eq!(test.backup.invocation_count(), 0);
}

#[test]
fn test_default_strictness_rejects_unused_stubbing() {
    let logger = Arc::new(RecordingLogger::default());
    let property = seeded_property(None, logger.clone());

    let error = runner(0)
        .run(&property, Just(()), |()| Ok(()))
        .unwrap_err();

    assert!(error.is_unnecessary_stubbing());
    assert!(error.to_string().contains("annotated::stock"));
    assert!(logger.lines.lock().is_empty());
}

#[test]
fn test_warn_strictness_logs_unused_stubbing() {
    let logger = Arc::new(RecordingLogger::default());
    let property = seeded_property(Some(Strictness::Warn), logger.clone());

    let result = runner(0)
        .run(&property, Just(()), |()| Ok(()))
        .unwrap();

    assert!(result.is_successful());
    let lines = logger.lines.lock().clone();
    assert_eq!(
        lines,
        vec!["[seeded] Unused stubbing detected: annotated::stock(\"never-asked\")".to_string()]
    );
}

#[test]
fn test_lenient_strictness_ignores_unused_stubbing() {
    let logger = Arc::new(RecordingLogger::default());
    let property = seeded_property(Some(Strictness::Lenient), logger.clone());

    let result = runner(0)
        .run(&property, Just(()), |()| Ok(()))
        .unwrap();

    assert!(result.is_successful());
    assert!(logger.lines.lock().is_empty());
}

#[test]
fn test_unused_stubbing_is_cleared_by_first_trial() {
    let logger = Arc::new(RecordingLogger::default());
    let property = seeded_property(None, logger);

    let result = runner(3)
        .run(&property, Just(()), |()| Ok(()))
        .unwrap();

    assert_eq!(result, PropertyExecutionResult::successful(3));
}

#[test]
fn test_panicking_inner_try_hook_still_resets_mocks() {
    let hooks = Arc::new(MockLifecycleHooks::new());
    let test = Arc::new(WarehouseTest::default());
    let outer =
        ContainerDescriptor::new("Warehouse").with_hook(HookRegistration::of(hooks.clone()));
    let inner = ContainerDescriptor::new("Audited")
        .nested_in(Arc::new(outer))
        .with_hook(HookRegistration::around_try(Arc::new(ExplodingTryHook)));
    let property =
        PropertyDescriptor::new("audited", Arc::new(inner)).with_instance(test.clone());

    let error = runner(10)
        .run(&property, Just(()), |()| {
            test.primary.mock().stock.when("item".to_string()).then_return(3);
            test.primary.mock().stock.invoke("item".to_string());
            test.backup.stock.invoke("item".to_string());
            Ok(())
        })
        .unwrap_err();

    assert_eq!(error, LifecycleError::HookPanicked("audit hook failed".to_string()));
    assert_eq!(test.primary.mock().invocation_count(), 0);
    assert_eq!(test.primary.mock().stock.stub_count(), 0);
    assert_eq!(test.backup.invocation_count(), 0);
    let stats = hooks.stats();
    assert_eq!(stats.tries, 1);
    assert_eq!(stats.mocks_reset, 2);
    assert_eq!(stats.sessions_closed, 1);
}
