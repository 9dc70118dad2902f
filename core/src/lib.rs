//! Mock lifecycle management for property-based tests
//!
//! This crate lets `proptest` properties use mocks safely: every mock a test
//! instance holds is discovered when a property starts, a mocking session
//! brackets the whole property, and every mock is reset after each generated
//! trial so stubbings and recorded calls never leak from one trial into the
//! next.
//!
//! # Architecture
//!
//! - [`mocking`] - The `Mock` capability, stub recorder, mock slots and sessions
//! - [`discovery`] - Explicit field registration and mock discovery
//! - [`lifecycle`] - Hook contract, contexts, property store and the runner
//! - [`hooks`] - [`MockLifecycleHooks`], the hooks tying the pieces together
//! - [`config`] - Runner configuration
//! - [`telemetry`] - Tracing setup and the mocking logger adapter
//! - [`error`] - Error types and result handling
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use mockprop_core::{
//!     ContainerDescriptor, Fields, HookRegistration, Mock, MockLifecycleHooks, MockMethod,
//!     PropertyDescriptor, PropertyRunner, RunnerConfig, TestInstance,
//! };
//! use proptest::prelude::*;
//!
//! struct Clock {
//!     now: MockMethod<(), u64>,
//! }
//!
//! impl Mock for Clock {
//!     fn mock_name(&self) -> &str { "clock" }
//!     fn reset(&self) { self.now.reset() }
//!     fn invocation_count(&self) -> usize { self.now.times_invoked() }
//! }
//!
//! struct ClockTest {
//!     clock: Arc<Clock>,
//! }
//!
//! impl TestInstance for ClockTest {
//!     fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
//!         fields.value("clock", &self.clock);
//!     }
//! }
//!
//! let clock = Arc::new(Clock { now: MockMethod::new("Clock::now") });
//! let test = Arc::new(ClockTest { clock });
//! let container = Arc::new(
//!     ContainerDescriptor::new("ClockTest")
//!         .with_hook(HookRegistration::of(Arc::new(MockLifecycleHooks::new()))),
//! );
//! let property =
//!     PropertyDescriptor::new("reads_clock_once", container).with_instance(test.clone());
//!
//! let mut config = RunnerConfig::default();
//! config.property.tries = 20;
//! let result = PropertyRunner::new(&config)
//!     .run(&property, any::<u64>(), |now| {
//!         test.clock.now.when(()).then_return(now);
//!         prop_assert_eq!(test.clock.now.invoke(()), Some(now));
//!         prop_assert_eq!(test.clock.invocation_count(), 1);
//!         Ok(())
//!     })
//!     .unwrap();
//! assert!(result.is_successful());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod mocking;
pub mod telemetry;

// Re-export commonly used types at the crate root for convenience
pub use config::{LogFormat, LoggingConfig, PropertyConfig, RunnerConfig};
pub use discovery::{
    discover, discover_all, init_annotated_mocks, Field, FieldAccessor, Fields, Marker,
    TestInstance, MOCKING_MARKERS,
};
pub use error::{LifecycleError, Result};
pub use hooks::{HookStatsSnapshot, MockLifecycleHooks, MOCKS_STORE_KEY};
pub use lifecycle::{
    AroundPropertyHook, AroundTryHook, ContainerDescriptor, HookRegistration, LifecycleHook,
    PropagationMode, PropertyDescriptor, PropertyExecutionResult, PropertyExecutor,
    PropertyLifecycleContext, PropertyRunner, PropertyStatus, PropertyStore, TryExecutionResult,
    TryExecutor, TryLifecycleContext,
};
pub use mocking::{
    Mock, MockMethod, MockRef, MockSet, MockSlot, MockingLogger, MockingSession, MockingSettings,
    Strictness,
};
pub use telemetry::{init_telemetry, TracingMockingLogger};

/// Current version of the core crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Current crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[allow(clippy::const_is_empty)]
    fn test_crate_constants() {
        assert!(!VERSION.is_empty());
        assert_eq!(CRATE_NAME, "mockprop-core");
    }

    #[test]
    fn test_re_exports() {
        let strictness = Strictness::default();
        assert_eq!(format!("{strictness}"), "strict_stubs");

        let error = LifecycleError::store_not_found(MOCKS_STORE_KEY);
        assert!(error.is_integration_violation());
    }
}
