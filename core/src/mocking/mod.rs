//! Mocking seam consumed by the lifecycle hooks
//!
//! Provides:
//! - The [`Mock`] capability trait implemented by every test double
//! - [`MockSet`] collections and bulk [`reset`]
//! - A per-method stub and call recorder ([`MockMethod`])
//! - Annotated mock fields ([`MockSlot`])
//! - Mocking sessions with strictness and a pluggable logger

pub mod method;
pub mod session;
pub mod slot;

use std::fmt;
use std::sync::Arc;

pub use method::{MockMethod, OngoingStubbing};
pub use session::{
    MockingLogger, MockingSession, MockingSessionBuilder, MockingSettings, Strictness,
};
pub use slot::MockSlot;

/// Capability implemented by mock and spy instances.
///
/// Implementations must be thread-safe: a mock set is shared between the
/// property hook that publishes it and every trial that resets it.
pub trait Mock: Send + Sync {
    /// Name used in diagnostics
    fn mock_name(&self) -> &str;

    /// Clear stubbed behavior and recorded invocations
    fn reset(&self);

    /// Number of invocations recorded since the last reset
    fn invocation_count(&self) -> usize;

    /// Stubbings that were configured but never used
    fn unused_stubbings(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Shared reference to a mock
pub type MockRef = Arc<dyn Mock>;

/// Reset every mock in the slice
pub fn reset(mocks: &[MockRef]) {
    for mock in mocks {
        mock.reset();
    }
}

/// Ordered collection of mocks discovered for one property execution.
///
/// The same mock may appear more than once when several fields refer to it.
#[derive(Clone, Default)]
pub struct MockSet {
    mocks: Vec<MockRef>,
}

impl MockSet {
    /// Create an empty mock set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a mock
    pub fn push(&mut self, mock: MockRef) {
        self.mocks.push(mock);
    }

    /// Number of entries, duplicates included
    pub fn len(&self) -> usize {
        self.mocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mocks.is_empty()
    }

    /// Iterate over mocks in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &MockRef> {
        self.mocks.iter()
    }

    /// Reset every mock in the set
    pub fn reset_all(&self) {
        reset(&self.mocks);
    }

    /// Sum of recorded invocations across all entries
    pub fn total_invocations(&self) -> usize {
        self.mocks.iter().map(|mock| mock.invocation_count()).sum()
    }

    /// Diagnostic names in discovery order
    pub fn names(&self) -> Vec<String> {
        self.mocks
            .iter()
            .map(|mock| mock.mock_name().to_string())
            .collect()
    }

    /// Unused stubbings across all entries
    pub fn unused_stubbings(&self) -> Vec<String> {
        self.mocks
            .iter()
            .flat_map(|mock| mock.unused_stubbings())
            .collect()
    }
}

impl Extend<MockRef> for MockSet {
    fn extend<I: IntoIterator<Item = MockRef>>(&mut self, iter: I) {
        self.mocks.extend(iter);
    }
}

impl FromIterator<MockRef> for MockSet {
    fn from_iter<I: IntoIterator<Item = MockRef>>(iter: I) -> Self {
        Self {
            mocks: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for MockSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
