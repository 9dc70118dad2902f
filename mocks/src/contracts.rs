//! Contract test helpers for validating trait implementations
//!
//! Provides standardized checks that any [`Mock`] or [`TestInstance`]
//! implementation should pass before it is handed to the lifecycle hooks.

use mockprop_core::{discover, discover_all, init_annotated_mocks, Mock, TestInstance};
use std::sync::Arc;

use crate::assertions::assert_mock_reset;

/// Test any Mock implementation.
///
/// `exercise` must invoke at least one method of the mock and leave at least
/// one stubbing unused.
pub fn test_mock_contract<M: Mock>(mock: &M, exercise: impl Fn(&M)) {
    test_naming_contract(mock);
    test_reset_contract(mock, &exercise);
    test_reset_idempotence_contract(mock, &exercise);
}

/// Mocks must have a non-empty diagnostic name
pub fn test_naming_contract<M: Mock>(mock: &M) {
    assert!(
        !mock.mock_name().is_empty(),
        "Mock name should not be empty"
    );
}

/// Reset must clear invocations and stubbings
pub fn test_reset_contract<M: Mock>(mock: &M, exercise: &impl Fn(&M)) {
    mock.reset();
    exercise(mock);

    assert!(
        mock.invocation_count() > 0,
        "Exercising '{}' should record invocations",
        mock.mock_name()
    );
    assert!(
        !mock.unused_stubbings().is_empty(),
        "Exercising '{}' should leave an unused stubbing",
        mock.mock_name()
    );

    mock.reset();
    assert_mock_reset(mock);
}

/// Resetting twice must behave like resetting once
pub fn test_reset_idempotence_contract<M: Mock>(mock: &M, exercise: &impl Fn(&M)) {
    exercise(mock);
    mock.reset();
    mock.reset();
    assert_mock_reset(mock);
}

/// Test any TestInstance implementation.
///
/// `expected_mocks` is the number of mocks the instance holds once its
/// annotated slots are filled.
pub fn test_discovery_contract<T: TestInstance + 'static>(instance: Arc<T>, expected_mocks: usize) {
    init_annotated_mocks(instance.as_ref());

    let first = discover(instance.as_ref()).expect("Discovery should succeed");
    assert_eq!(
        first.len(),
        expected_mocks,
        "{} should expose {expected_mocks} mocks",
        instance.instance_name()
    );

    let second = discover(instance.as_ref()).expect("Repeated discovery should succeed");
    let first_names: Vec<_> = first.iter().map(|mock| mock.mock_name().to_string()).collect();
    let second_names: Vec<_> = second.iter().map(|mock| mock.mock_name().to_string()).collect();
    assert_eq!(
        first_names, second_names,
        "Discovery order should be stable"
    );

    assert_eq!(
        init_annotated_mocks(instance.as_ref()),
        0,
        "Filled slots should not be re-created"
    );

    let instance: Arc<dyn TestInstance> = instance;
    let instances = vec![instance.clone(), instance];
    let set = discover_all(&instances).expect("Discovery over instances should succeed");
    assert_eq!(
        set.len(),
        expected_mocks * 2,
        "Mocks of every instance should be collected"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doubles::{MockCountingService, MockProductRepository, SpyLoggingService};
    use crate::fixtures::{AddingServiceTest, MixedMocksTest, ProductServiceTest};
    use crate::services::{CountingService, LoggingService, Product, ProductRepository};

    #[test]
    fn test_counting_service_mock_contract() {
        test_mock_contract(&MockCountingService::new(), |mock| {
            mock.string_length.when("never".to_string()).then_return(5);
            mock.string_length("other");
        });
    }

    #[test]
    fn test_product_repository_mock_contract() {
        test_mock_contract(&MockProductRepository::new(), |mock| {
            mock.get_by_id.when(1).then_return(Product::new(1, "Product 1"));
            mock.get_by_id(2);
        });
    }

    #[test]
    fn test_logging_spy_contract() {
        test_mock_contract(&SpyLoggingService::default(), |spy| {
            spy.log.when("silenced".to_string()).then_return(());
            spy.log("passed through");
        });
    }

    #[test]
    fn test_fixture_discovery_contracts() {
        test_discovery_contract(Arc::new(AddingServiceTest::new()), 1);
        test_discovery_contract(Arc::new(ProductServiceTest::new()), 2);
        test_discovery_contract(Arc::new(MixedMocksTest::default()), 3);
    }
}
