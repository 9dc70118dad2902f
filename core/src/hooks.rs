//! Lifecycle hooks managing mocks around properties and trials
//!
//! Register [`MockLifecycleHooks`] on a container to:
//! - open a mocking session around every property of the container and of
//!   all nested containers, filling annotated mock slots
//! - reset every discovered mock after each trial, whether the mock lives in
//!   an annotated slot or was created programmatically
//!
//! ```rust
//! use std::sync::Arc;
//! use mockprop_core::hooks::MockLifecycleHooks;
//! use mockprop_core::lifecycle::{ContainerDescriptor, HookRegistration};
//! use mockprop_core::mocking::{MockingSettings, Strictness};
//!
//! let container = ContainerDescriptor::new("OrderServiceTest")
//!     .annotated_with(MockingSettings::new(Strictness::Warn))
//!     .with_hook(HookRegistration::of(Arc::new(MockLifecycleHooks::new())));
//! assert_eq!(container.applicable_hooks().around_try.len(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info_span, warn};

use crate::discovery;
use crate::error::Result;
use crate::lifecycle::{
    AroundPropertyHook, AroundTryHook, LifecycleHook, PropagationMode, PropertyExecutionResult,
    PropertyExecutor, PropertyLifecycleContext, TryExecutionResult, TryExecutor,
    TryLifecycleContext,
};
use crate::mocking::{MockSet, MockingLogger, MockingSession, MockingSettings, Strictness};
use crate::telemetry::TracingMockingLogger;

/// Store key of the [`MockSet`] published for a property
pub const MOCKS_STORE_KEY: &str = "mockprop.mocks";

/// Counters describing what the hooks did so far
#[derive(Debug, Default)]
struct HookStats {
    properties: AtomicUsize,
    sessions_opened: AtomicUsize,
    sessions_closed: AtomicUsize,
    tries: AtomicUsize,
    mocks_reset: AtomicUsize,
}

/// Point-in-time copy of the hook counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HookStatsSnapshot {
    pub properties: usize,
    pub sessions_opened: usize,
    pub sessions_closed: usize,
    pub tries: usize,
    pub mocks_reset: usize,
}

/// Manages mocks for the properties of the container it is registered on
pub struct MockLifecycleHooks {
    logger: Arc<dyn MockingLogger>,
    stats: HookStats,
}

impl Default for MockLifecycleHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl MockLifecycleHooks {
    /// Hooks logging mocking diagnostics through `tracing`
    pub fn new() -> Self {
        Self::with_logger(Arc::new(TracingMockingLogger))
    }

    /// Hooks logging mocking diagnostics to `logger`
    pub fn with_logger(logger: Arc<dyn MockingLogger>) -> Self {
        Self {
            logger,
            stats: HookStats::default(),
        }
    }

    /// Strictness declared by the first settings annotation visible from the
    /// property's container
    pub fn strictness_for(context: &PropertyLifecycleContext) -> Option<Strictness> {
        context
            .find_annotations_in_container::<MockingSettings>()
            .first()
            .map(|settings| settings.strictness)
    }

    pub fn stats(&self) -> HookStatsSnapshot {
        HookStatsSnapshot {
            properties: self.stats.properties.load(Ordering::Relaxed),
            sessions_opened: self.stats.sessions_opened.load(Ordering::Relaxed),
            sessions_closed: self.stats.sessions_closed.load(Ordering::Relaxed),
            tries: self.stats.tries.load(Ordering::Relaxed),
            mocks_reset: self.stats.mocks_reset.load(Ordering::Relaxed),
        }
    }

    fn publish_mocks(&self, context: &mut PropertyLifecycleContext) -> Result<()> {
        let mocks = discovery::discover_all(context.test_instances())?;
        debug!(mocks = mocks.len(), names = ?mocks.names(), "Publishing mocks for property");
        context.store_mut().create(MOCKS_STORE_KEY, mocks)
    }
}

impl LifecycleHook for MockLifecycleHooks {
    fn propagate_to(&self) -> PropagationMode {
        PropagationMode::AllDescendants
    }
}

impl AroundPropertyHook for MockLifecycleHooks {
    fn around_property(
        &self,
        context: &mut PropertyLifecycleContext,
        executor: &mut dyn PropertyExecutor,
    ) -> Result<PropertyExecutionResult> {
        let span = info_span!("mock_property", property = context.property_name());
        let _enter = span.enter();
        self.stats.properties.fetch_add(1, Ordering::Relaxed);

        let session = MockingSession::builder()
            .name(context.property_name())
            .init_mocks(context.test_instances())
            .strictness(Self::strictness_for(context))
            .logger(Arc::clone(&self.logger))
            .start_mocking()?;
        let session = OpenSession::new(session, &self.stats);

        let outcome = self
            .publish_mocks(context)
            .and_then(|()| executor.execute(context));

        let failure = match &outcome {
            Ok(result) => result.failure().map(str::to_owned),
            Err(error) => Some(error.to_string()),
        };
        let closed = session.finish(failure.as_deref());

        let result = outcome?;
        closed?;
        Ok(result)
    }
}

impl AroundTryHook for MockLifecycleHooks {
    fn around_try(
        &self,
        context: &TryLifecycleContext<'_>,
        executor: &mut dyn TryExecutor,
    ) -> Result<TryExecutionResult> {
        self.stats.tries.fetch_add(1, Ordering::Relaxed);
        let mocks = context.store().get::<MockSet>(MOCKS_STORE_KEY);

        let result = {
            let _reset = mocks
                .as_ref()
                .ok()
                .map(|mocks| ResetOnExit::new(mocks, &self.stats, context));
            executor.execute(context)
        };

        mocks?;
        result
    }
}

/// Resets a mock set when dropped, so a trial unwinding through the hook
/// still leaves its mocks clean
struct ResetOnExit<'a> {
    mocks: &'a MockSet,
    stats: &'a HookStats,
    context: &'a TryLifecycleContext<'a>,
}

impl<'a> ResetOnExit<'a> {
    fn new(mocks: &'a MockSet, stats: &'a HookStats, context: &'a TryLifecycleContext<'a>) -> Self {
        Self {
            mocks,
            stats,
            context,
        }
    }
}

impl Drop for ResetOnExit<'_> {
    fn drop(&mut self) {
        self.mocks.reset_all();
        self.stats
            .mocks_reset
            .fetch_add(self.mocks.len(), Ordering::Relaxed);
        debug!(
            property = self.context.property_name(),
            try_index = self.context.try_index(),
            mocks = self.mocks.len(),
            unwinding = std::thread::panicking(),
            "Reset mocks after try"
        );
    }
}

/// Session that is finished exactly once, on return or while unwinding
struct OpenSession<'h> {
    session: Option<MockingSession>,
    stats: &'h HookStats,
}

impl<'h> OpenSession<'h> {
    fn new(session: MockingSession, stats: &'h HookStats) -> Self {
        stats.sessions_opened.fetch_add(1, Ordering::Relaxed);
        Self {
            session: Some(session),
            stats,
        }
    }

    fn finish(mut self, failure: Option<&str>) -> Result<()> {
        match self.session.take() {
            Some(mut session) => {
                self.stats.sessions_closed.fetch_add(1, Ordering::Relaxed);
                session.finish(failure)
            }
            None => Ok(()),
        }
    }
}

impl Drop for OpenSession<'_> {
    fn drop(&mut self) {
        if let Some(mut session) = self.session.take() {
            self.stats.sessions_closed.fetch_add(1, Ordering::Relaxed);
            if let Err(error) = session.finish(Some("property execution did not complete")) {
                warn!(session = session.name(), %error, "Failed to finish mocking session");
            }
        }
    }
}
