//! Test doubles for the services
//!
//! Every double implements [`Mock`] so the lifecycle hooks can discover and
//! reset it. Methods are exposed as public [`MockMethod`] fields for stubbing
//! and verification:
//!
//! ```rust
//! use mocks::{CountingService, MockCountingService};
//!
//! let counting = MockCountingService::new();
//! counting.string_length.when("abc".to_string()).then_return(3);
//! assert_eq!(counting.string_length("abc"), 3);
//! assert_eq!(counting.string_length.times_invoked(), 1);
//! ```

use mockprop_core::{Mock, MockMethod, MockingLogger};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::services::{
    ConsoleLoggingService, CountingService, LoggingService, Product, ProductRepository,
};

/// Mock of [`CountingService`]; unstubbed calls return 0
pub struct MockCountingService {
    pub string_length: MockMethod<String, i32>,
}

impl Default for MockCountingService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockCountingService {
    pub fn new() -> Self {
        Self {
            string_length: MockMethod::new("CountingService::string_length"),
        }
    }
}

impl CountingService for MockCountingService {
    fn string_length(&self, value: &str) -> i32 {
        self.string_length
            .invoke(value.to_string())
            .unwrap_or_default()
    }
}

impl Mock for MockCountingService {
    fn mock_name(&self) -> &str {
        "countingService"
    }

    fn reset(&self) {
        self.string_length.reset();
    }

    fn invocation_count(&self) -> usize {
        self.string_length.times_invoked()
    }

    fn unused_stubbings(&self) -> Vec<String> {
        self.string_length.unused_stubbings()
    }
}

/// Mock of [`ProductRepository`]; unstubbed lookups find nothing
pub struct MockProductRepository {
    pub get_by_id: MockMethod<i32, Product>,
}

impl Default for MockProductRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProductRepository {
    pub fn new() -> Self {
        Self {
            get_by_id: MockMethod::new("ProductRepository::get_by_id"),
        }
    }
}

impl ProductRepository for MockProductRepository {
    fn get_by_id(&self, id: i32) -> Option<Product> {
        self.get_by_id.invoke(id)
    }
}

impl Mock for MockProductRepository {
    fn mock_name(&self) -> &str {
        "productRepository"
    }

    fn reset(&self) {
        self.get_by_id.reset();
    }

    fn invocation_count(&self) -> usize {
        self.get_by_id.times_invoked()
    }

    fn unused_stubbings(&self) -> Vec<String> {
        self.get_by_id.unused_stubbings()
    }
}

/// Spy around a real [`LoggingService`]: calls are recorded and delegated
/// unless stubbed
pub struct SpyLoggingService {
    delegate: Arc<dyn LoggingService>,
    pub log: MockMethod<String, ()>,
}

impl Default for SpyLoggingService {
    fn default() -> Self {
        Self::spy(Arc::new(ConsoleLoggingService))
    }
}

impl SpyLoggingService {
    pub fn spy(delegate: Arc<dyn LoggingService>) -> Self {
        Self {
            delegate,
            log: MockMethod::new("LoggingService::log"),
        }
    }
}

impl LoggingService for SpyLoggingService {
    fn log(&self, message: &str) {
        self.log
            .invoke_or_else(message.to_string(), |message| self.delegate.log(message));
    }
}

impl Mock for SpyLoggingService {
    fn mock_name(&self) -> &str {
        "loggingService"
    }

    fn reset(&self) {
        self.log.reset();
    }

    fn invocation_count(&self) -> usize {
        self.log.times_invoked()
    }

    fn unused_stubbings(&self) -> Vec<String> {
        self.log.unused_stubbings()
    }
}

/// Real logging service remembering every message, used as a spy delegate
#[derive(Debug, Default)]
pub struct MemoryLoggingService {
    messages: Mutex<Vec<String>>,
}

impl MemoryLoggingService {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl LoggingService for MemoryLoggingService {
    fn log(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// Mocking logger capturing diagnostics for assertions
#[derive(Debug, Default)]
pub struct RecordingLogger {
    lines: Mutex<Vec<String>>,
}

impl RecordingLogger {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl MockingLogger for RecordingLogger {
    fn log(&self, what: &str) {
        self.lines.lock().push(what.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unstubbed_counting_returns_zero() {
        let counting = MockCountingService::new();
        assert_eq!(counting.string_length("abc"), 0);
        assert_eq!(counting.invocation_count(), 1);
    }

    #[test]
    fn test_spy_delegates_unless_stubbed() {
        let memory = Arc::new(MemoryLoggingService::default());
        let spy = SpyLoggingService::spy(memory.clone());

        spy.log("first");
        spy.log.when("second".to_string()).then_return(());
        spy.log("second");

        assert_eq!(memory.messages(), vec!["first".to_string()]);
        assert_eq!(spy.invocation_count(), 2);
    }

    #[test]
    fn test_repository_returns_stubbed_product() {
        let repository = MockProductRepository::new();
        repository.get_by_id.when(3).then_return(Product::new(3, "Chair"));

        assert_eq!(repository.get_by_id(3), Some(Product::new(3, "Chair")));
        assert_eq!(repository.get_by_id(4), None);
        assert!(repository.unused_stubbings().is_empty());
    }
}
