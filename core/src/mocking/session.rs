//! Mocking sessions bracketing one property execution

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

use super::MockSet;
use crate::discovery::{self, TestInstance};
use crate::error::{LifecycleError, Result};
use crate::telemetry::TracingMockingLogger;

/// How unused stubbings are treated when a session finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Unused stubbings are ignored
    Lenient,
    /// Unused stubbings are reported through the session logger
    Warn,
    /// Unused stubbings fail the session
    #[default]
    StrictStubs,
}

impl fmt::Display for Strictness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strictness::Lenient => write!(f, "lenient"),
            Strictness::Warn => write!(f, "warn"),
            Strictness::StrictStubs => write!(f, "strict_stubs"),
        }
    }
}

/// Settings annotation for a property container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MockingSettings {
    pub strictness: Strictness,
}

impl MockingSettings {
    pub fn new(strictness: Strictness) -> Self {
        Self { strictness }
    }
}

/// Sink for diagnostics produced by the mocking seam
pub trait MockingLogger: Send + Sync {
    fn log(&self, what: &str);
}

/// Builder for [`MockingSession`]
#[derive(Default)]
pub struct MockingSessionBuilder {
    name: Option<String>,
    instances: Vec<Arc<dyn TestInstance>>,
    strictness: Option<Strictness>,
    logger: Option<Arc<dyn MockingLogger>>,
}

impl MockingSessionBuilder {
    /// Name used in diagnostics, usually the property name
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Test instances whose annotated mock slots the session fills
    pub fn init_mocks(mut self, instances: &[Arc<dyn TestInstance>]) -> Self {
        self.instances.extend(instances.iter().cloned());
        self
    }

    /// Strictness for the session; `None` keeps the default
    pub fn strictness(mut self, strictness: Option<Strictness>) -> Self {
        self.strictness = strictness;
        self
    }

    pub fn logger(mut self, logger: Arc<dyn MockingLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Fill annotated slots and open the session
    pub fn start_mocking(self) -> Result<MockingSession> {
        let name = self.name.unwrap_or_else(|| "unnamed".to_string());
        let strictness = self.strictness.unwrap_or_default();
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(TracingMockingLogger));

        let mut mocks = MockSet::new();
        let mut created = 0;
        for instance in &self.instances {
            created += discovery::init_annotated_mocks(instance.as_ref());
            mocks.extend(discovery::discover(instance.as_ref())?);
        }

        debug!(
            session = %name,
            %strictness,
            created,
            tracked = mocks.len(),
            "Mocking session started"
        );

        Ok(MockingSession {
            name,
            strictness,
            logger,
            mocks,
            finished: false,
        })
    }
}

/// Open mocking session.
///
/// A session tracks the mocks of its test instances and validates their
/// stubbings when it finishes. It must be finished exactly once.
pub struct MockingSession {
    name: String,
    strictness: Strictness,
    logger: Arc<dyn MockingLogger>,
    mocks: MockSet,
    finished: bool,
}

impl MockingSession {
    pub fn builder() -> MockingSessionBuilder {
        MockingSessionBuilder::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn strictness(&self) -> Strictness {
        self.strictness
    }

    /// Change the strictness for the rest of the session
    pub fn set_strictness(&mut self, strictness: Strictness) {
        self.strictness = strictness;
    }

    /// Mocks tracked by the session
    pub fn mocks(&self) -> &MockSet {
        &self.mocks
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Finish the session.
    ///
    /// With `failure` set, stubbing validation is skipped so that the
    /// reported problem stays the original failure. Otherwise unused
    /// stubbings are handled according to the session strictness.
    pub fn finish(&mut self, failure: Option<&str>) -> Result<()> {
        if self.finished {
            return Err(LifecycleError::SessionFinished(self.name.clone()));
        }
        self.finished = true;

        if let Some(failure) = failure {
            debug!(session = %self.name, failure, "Mocking session finished after failure");
            return Ok(());
        }

        let unused = self.mocks.unused_stubbings();
        debug!(session = %self.name, unused = unused.len(), "Mocking session finished");
        if unused.is_empty() {
            return Ok(());
        }

        match self.strictness {
            Strictness::Lenient => Ok(()),
            Strictness::Warn => {
                for stubbing in &unused {
                    self.logger.log(&format!(
                        "[{}] Unused stubbing detected: {stubbing}",
                        self.name
                    ));
                }
                Ok(())
            }
            Strictness::StrictStubs => Err(LifecycleError::UnnecessaryStubbing(unused)),
        }
    }
}

impl fmt::Debug for MockingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockingSession")
            .field("name", &self.name)
            .field("strictness", &self.strictness)
            .field("mocks", &self.mocks)
            .field("finished", &self.finished)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::Fields;
    use crate::mocking::{Mock, MockMethod, MockSlot};
    use parking_lot::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl MockingLogger for RecordingLogger {
        fn log(&self, what: &str) {
            self.lines.lock().push(what.to_string());
        }
    }

    struct Repository {
        find: MockMethod<u32, String>,
    }

    impl Default for Repository {
        fn default() -> Self {
            Self {
                find: MockMethod::new("Repository::find"),
            }
        }
    }

    impl Mock for Repository {
        fn mock_name(&self) -> &str {
            "repository"
        }

        fn reset(&self) {
            self.find.reset();
        }

        fn invocation_count(&self) -> usize {
            self.find.times_invoked()
        }

        fn unused_stubbings(&self) -> Vec<String> {
            self.find.unused_stubbings()
        }
    }

    #[derive(Default)]
    struct RepositoryTest {
        repository: MockSlot<Repository>,
    }

    impl TestInstance for RepositoryTest {
        fn declare_fields<'a>(&'a self, fields: &mut Fields<'a>) {
            fields.mock("repository", &self.repository);
        }
    }

    fn open(
        instance: &Arc<RepositoryTest>,
        strictness: Option<Strictness>,
        logger: Arc<RecordingLogger>,
    ) -> MockingSession {
        let instances: Vec<Arc<dyn TestInstance>> = vec![instance.clone()];
        MockingSession::builder()
            .name("findsRepository")
            .init_mocks(&instances)
            .strictness(strictness)
            .logger(logger)
            .start_mocking()
            .expect("session should start")
    }

    #[test]
    fn test_start_initializes_annotated_slots() {
        let instance = Arc::new(RepositoryTest::default());
        let session = open(&instance, None, Arc::default());

        assert!(instance.repository.is_initialized());
        assert_eq!(session.mocks().len(), 1);
        assert_eq!(session.strictness(), Strictness::StrictStubs);
    }

    #[test]
    fn test_explicit_strictness_is_kept() {
        let instance = Arc::new(RepositoryTest::default());
        let session = open(&instance, Some(Strictness::Lenient), Arc::default());
        assert_eq!(session.strictness(), Strictness::Lenient);
    }

    #[test]
    fn test_finish_twice_fails() {
        let instance = Arc::new(RepositoryTest::default());
        let mut session = open(&instance, None, Arc::default());

        session.finish(None).expect("first finish should succeed");
        assert!(session.is_finished());
        assert_eq!(
            session.finish(None),
            Err(LifecycleError::SessionFinished("findsRepository".to_string()))
        );
    }

    #[test]
    fn test_strict_stubs_reject_unused_stubbing() {
        let instance = Arc::new(RepositoryTest::default());
        let mut session = open(&instance, Some(Strictness::StrictStubs), Arc::default());
        instance.repository.mock().find.when(1).then_return("one".to_string());

        let result = session.finish(None);
        assert_eq!(
            result,
            Err(LifecycleError::UnnecessaryStubbing(vec![
                "Repository::find(1)".to_string()
            ]))
        );
    }

    #[test]
    fn test_warn_logs_unused_stubbing() {
        let instance = Arc::new(RepositoryTest::default());
        let logger = Arc::new(RecordingLogger::default());
        let mut session = open(&instance, Some(Strictness::Warn), logger.clone());
        instance.repository.mock().find.when(2).then_return("two".to_string());

        session.finish(None).expect("warn should not fail");
        assert_eq!(
            *logger.lines.lock(),
            vec!["[findsRepository] Unused stubbing detected: Repository::find(2)".to_string()]
        );
    }

    #[test]
    fn test_failure_skips_validation() {
        let instance = Arc::new(RepositoryTest::default());
        let mut session = open(&instance, Some(Strictness::StrictStubs), Arc::default());
        instance.repository.mock().find.when(3).then_return("three".to_string());

        assert!(session.finish(Some("assertion failed")).is_ok());
    }
}
