//! Host lifecycle contract
//!
//! Hooks wrap two phases of a property run: the whole property and every
//! generated trial ("try"). Each hook receives a context and a continuation
//! ([`PropertyExecutor`] or [`TryExecutor`]) and decides what to do before
//! and after invoking it. State a property hook publishes in the
//! [`PropertyStore`] is threaded explicitly into every trial through
//! [`TryLifecycleContext::store`].

pub mod context;
pub mod runner;
pub mod store;

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use context::{
    ApplicableHooks, ContainerDescriptor, HookRegistration, PropertyDescriptor,
    PropertyLifecycleContext, TryLifecycleContext,
};
pub use runner::PropertyRunner;
pub use store::PropertyStore;

/// Which nested containers a hook registered on a container reaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PropagationMode {
    /// Same as `NoDescendants`
    #[default]
    NotSet,
    /// Only properties of the registering container
    NoDescendants,
    /// Also properties of directly nested containers
    DirectDescendants,
    /// Properties of all nested containers
    AllDescendants,
}

impl PropagationMode {
    /// Check if a hook registered `distance` containers up applies
    pub fn reaches(self, distance: usize) -> bool {
        match self {
            PropagationMode::NotSet | PropagationMode::NoDescendants => distance == 0,
            PropagationMode::DirectDescendants => distance <= 1,
            PropagationMode::AllDescendants => true,
        }
    }
}

/// Base trait of all lifecycle hooks
pub trait LifecycleHook: Send + Sync {
    fn propagate_to(&self) -> PropagationMode {
        PropagationMode::NotSet
    }
}

/// Hook wrapped around a whole property execution
pub trait AroundPropertyHook: LifecycleHook {
    fn around_property(
        &self,
        context: &mut PropertyLifecycleContext,
        executor: &mut dyn PropertyExecutor,
    ) -> Result<PropertyExecutionResult>;
}

/// Hook wrapped around every trial of a property
pub trait AroundTryHook: LifecycleHook {
    fn around_try(
        &self,
        context: &TryLifecycleContext<'_>,
        executor: &mut dyn TryExecutor,
    ) -> Result<TryExecutionResult>;
}

/// Continuation running all trials of a property
pub trait PropertyExecutor {
    fn execute(
        &mut self,
        context: &mut PropertyLifecycleContext,
    ) -> Result<PropertyExecutionResult>;
}

/// Continuation running one trial with its generated parameters
pub trait TryExecutor {
    fn execute(&mut self, context: &TryLifecycleContext<'_>) -> Result<TryExecutionResult>;
}

/// Outcome of a single trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TryExecutionResult {
    Satisfied,
    /// The property does not hold for the generated parameters
    Falsified(String),
    /// The generated parameters were rejected
    Invalid(String),
}

impl TryExecutionResult {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, TryExecutionResult::Satisfied)
    }
}

/// Overall status of a property execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyStatus {
    Successful,
    /// A trial falsified the property
    Failed,
    /// The run gave up, e.g. after too many rejected trials
    Aborted,
}

/// Outcome of a property execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyExecutionResult {
    pub status: PropertyStatus,
    /// Trials executed, shrinking trials included
    pub tries: usize,
    pub failure: Option<String>,
    /// Debug rendering of the minimal falsifying parameters
    pub falsified_sample: Option<String>,
}

impl PropertyExecutionResult {
    pub fn successful(tries: usize) -> Self {
        Self {
            status: PropertyStatus::Successful,
            tries,
            failure: None,
            falsified_sample: None,
        }
    }

    pub fn failed(tries: usize, failure: impl Into<String>, sample: Option<String>) -> Self {
        Self {
            status: PropertyStatus::Failed,
            tries,
            failure: Some(failure.into()),
            falsified_sample: sample,
        }
    }

    pub fn aborted(tries: usize, reason: impl Into<String>) -> Self {
        Self {
            status: PropertyStatus::Aborted,
            tries,
            failure: Some(reason.into()),
            falsified_sample: None,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status == PropertyStatus::Successful
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}
