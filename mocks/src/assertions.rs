//! Custom assertion helpers for mocks
//!
//! Provides specialized assertions for:
//! - Reset state of single mocks and mock sets
//! - Invocation counts with clear error messages

use mockprop_core::{Mock, MockMethod, MockSet};
use std::fmt::Debug;

/// Assert a mock has neither recorded calls nor pending stubbings
pub fn assert_mock_reset(mock: &dyn Mock) {
    assert_eq!(
        mock.invocation_count(),
        0,
        "Mock '{}' still has recorded invocations",
        mock.mock_name()
    );
    assert!(
        mock.unused_stubbings().is_empty(),
        "Mock '{}' still has stubbings: {:?}",
        mock.mock_name(),
        mock.unused_stubbings()
    );
}

/// Assert every mock of the set is reset
pub fn assert_all_reset(mocks: &MockSet) {
    for mock in mocks.iter() {
        assert_mock_reset(mock.as_ref());
    }
}

/// Assert a mock method was called exactly `expected` times
pub fn assert_invoked_times<A, R>(method: &MockMethod<A, R>, expected: usize)
where
    A: PartialEq + Clone + Debug,
    R: Clone,
{
    assert_eq!(
        method.times_invoked(),
        expected,
        "{} was invoked {} times, expected {expected}; calls: {:?}",
        method.name(),
        method.times_invoked(),
        method.invocations()
    );
}

/// Assert a mock method was called exactly `expected` times with `args`
pub fn assert_invoked_with<A, R>(method: &MockMethod<A, R>, args: &A, expected: usize)
where
    A: PartialEq + Clone + Debug,
    R: Clone,
{
    assert_eq!(
        method.times_invoked_with(args),
        expected,
        "{}({args:?}) was invoked {} times, expected {expected}",
        method.name(),
        method.times_invoked_with(args)
    );
}

/// Assert a mock method was never called
pub fn assert_never_invoked<A, R>(method: &MockMethod<A, R>)
where
    A: PartialEq + Clone + Debug,
    R: Clone,
{
    assert_invoked_times(method, 0);
}
