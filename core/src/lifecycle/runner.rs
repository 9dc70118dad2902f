//! Property runner driving `proptest` through the lifecycle hooks

use proptest::strategy::Strategy;
use proptest::test_runner::{
    Config as ProptestConfig, TestCaseError, TestCaseResult, TestError, TestRunner,
};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info_span};

use super::{
    AroundPropertyHook, AroundTryHook, PropertyDescriptor, PropertyExecutionResult,
    PropertyExecutor, PropertyLifecycleContext, TryExecutionResult, TryExecutor,
    TryLifecycleContext,
};
use crate::config::RunnerConfig;
use crate::error::{LifecycleError, Result};

/// Runs properties with the hooks registered on their containers.
///
/// Every generated case, shrinking cases included, is one trial and passes
/// through the try hooks.
#[derive(Debug, Clone)]
pub struct PropertyRunner {
    config: ProptestConfig,
}

impl Default for PropertyRunner {
    fn default() -> Self {
        Self::new(&RunnerConfig::default())
    }
}

impl PropertyRunner {
    pub fn new(config: &RunnerConfig) -> Self {
        Self {
            config: config.proptest_config(),
        }
    }

    /// Use a prepared proptest configuration as is
    pub fn with_proptest_config(config: ProptestConfig) -> Self {
        Self { config }
    }

    /// Run `body` against values generated by `strategy`.
    ///
    /// A falsified property is a successful run returning a
    /// [`PropertyStatus::Failed`](super::PropertyStatus::Failed) result; `Err`
    /// is reserved for lifecycle errors raised by hooks.
    pub fn run<S, F>(
        &self,
        property: &PropertyDescriptor,
        strategy: S,
        body: F,
    ) -> Result<PropertyExecutionResult>
    where
        S: Strategy,
        F: Fn(S::Value) -> TestCaseResult,
    {
        let span = info_span!(
            "property",
            property = property.name(),
            container = property.container().name()
        );
        let _enter = span.enter();

        let hooks = property.container().applicable_hooks();
        let mut context = PropertyLifecycleContext::new(property);
        let mut trials = TrialsExecutor {
            config: &self.config,
            strategy: &strategy,
            body: &body,
            try_hooks: &hooks.around_try,
        };
        let mut chain = PropertyHookChain {
            hooks: &hooks.around_property,
            inner: &mut trials,
        };

        let result = chain.execute(&mut context)?;
        debug!(status = ?result.status, tries = result.tries, "Property finished");
        Ok(result)
    }
}

struct PropertyHookChain<'h, 'e, 'd> {
    hooks: &'h [Arc<dyn AroundPropertyHook>],
    inner: &'e mut (dyn PropertyExecutor + 'd),
}

impl PropertyExecutor for PropertyHookChain<'_, '_, '_> {
    fn execute(
        &mut self,
        context: &mut PropertyLifecycleContext,
    ) -> Result<PropertyExecutionResult> {
        match self.hooks.split_first() {
            Some((hook, rest)) => {
                let mut next = PropertyHookChain {
                    hooks: rest,
                    inner: &mut *self.inner,
                };
                hook.around_property(context, &mut next)
            }
            None => self.inner.execute(context),
        }
    }
}

struct TryHookChain<'h, 'e, 'd> {
    hooks: &'h [Arc<dyn AroundTryHook>],
    inner: &'e mut (dyn TryExecutor + 'd),
}

impl TryExecutor for TryHookChain<'_, '_, '_> {
    fn execute(&mut self, context: &TryLifecycleContext<'_>) -> Result<TryExecutionResult> {
        match self.hooks.split_first() {
            Some((hook, rest)) => {
                let mut next = TryHookChain {
                    hooks: rest,
                    inner: &mut *self.inner,
                };
                hook.around_try(context, &mut next)
            }
            None => self.inner.execute(context),
        }
    }
}

struct TrialsExecutor<'a, S, F> {
    config: &'a ProptestConfig,
    strategy: &'a S,
    body: &'a F,
    try_hooks: &'a [Arc<dyn AroundTryHook>],
}

impl<S, F> PropertyExecutor for TrialsExecutor<'_, S, F>
where
    S: Strategy,
    F: Fn(S::Value) -> TestCaseResult,
{
    fn execute(
        &mut self,
        context: &mut PropertyLifecycleContext,
    ) -> Result<PropertyExecutionResult> {
        let context = &*context;
        let body = self.body;
        let try_hooks = self.try_hooks;
        let tries = Cell::new(0usize);
        let fatal: RefCell<Option<LifecycleError>> = RefCell::new(None);

        let mut runner = TestRunner::new(self.config.clone());
        let outcome = runner.run(self.strategy, |value| {
            if let Some(error) = fatal.borrow().as_ref() {
                return Err(TestCaseError::fail(error.to_string()));
            }

            let index = tries.get();
            tries.set(index + 1);

            let parameters = format!("{value:?}");
            let try_context = TryLifecycleContext::new(
                context.property_name(),
                index,
                parameters,
                context.store(),
            );
            let mut trial = BodyExecutor {
                body,
                value: Some(value),
            };
            let mut chain = TryHookChain {
                hooks: try_hooks,
                inner: &mut trial,
            };

            // Body panics are caught by `BodyExecutor`; anything escaping
            // here was raised by a try hook
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| chain.execute(&try_context)))
                .unwrap_or_else(|payload| {
                    Err(LifecycleError::HookPanicked(panic_message(&*payload)))
                });

            match outcome {
                Ok(TryExecutionResult::Satisfied) => Ok(()),
                Ok(TryExecutionResult::Falsified(reason)) => Err(TestCaseError::fail(reason)),
                Ok(TryExecutionResult::Invalid(reason)) => Err(TestCaseError::reject(reason)),
                Err(error) => {
                    let message = error.to_string();
                    *fatal.borrow_mut() = Some(error);
                    Err(TestCaseError::fail(message))
                }
            }
        });

        if let Some(error) = fatal.into_inner() {
            return Err(error);
        }

        let tries = tries.get();
        Ok(match outcome {
            Ok(()) => PropertyExecutionResult::successful(tries),
            Err(TestError::Fail(reason, value)) => {
                PropertyExecutionResult::failed(tries, reason.message(), Some(format!("{value:?}")))
            }
            Err(TestError::Abort(reason)) => {
                PropertyExecutionResult::aborted(tries, reason.message())
            }
        })
    }
}

struct BodyExecutor<'b, V, F> {
    body: &'b F,
    value: Option<V>,
}

impl<V, F> TryExecutor for BodyExecutor<'_, V, F>
where
    F: Fn(V) -> TestCaseResult,
{
    fn execute(&mut self, _context: &TryLifecycleContext<'_>) -> Result<TryExecutionResult> {
        let Some(value) = self.value.take() else {
            return Ok(TryExecutionResult::Invalid(
                "trial parameters were already consumed".to_string(),
            ));
        };

        let body = self.body;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| body(value)));
        Ok(match outcome {
            Ok(Ok(())) => TryExecutionResult::Satisfied,
            Ok(Err(TestCaseError::Fail(reason))) => {
                TryExecutionResult::Falsified(reason.message().to_string())
            }
            Ok(Err(TestCaseError::Reject(reason))) => {
                TryExecutionResult::Invalid(reason.message().to_string())
            }
            Err(payload) => TryExecutionResult::Falsified(panic_message(&*payload)),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "trial panicked".to_string()
    }
}
