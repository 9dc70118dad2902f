use thiserror::Error;

/// Result type alias for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;

/// Errors raised while managing mocks around a property.
///
/// Property failures are not errors: a falsified property is reported through
/// [`PropertyExecutionResult`](crate::lifecycle::PropertyExecutionResult).
/// These variants describe problems with the integration itself, such as an
/// unreadable field or a try hook that runs without its property hook.
///
/// # Examples
///
/// ```rust
/// use mockprop_core::error::LifecycleError;
///
/// let missing = LifecycleError::store_not_found("mockprop.mocks");
/// assert!(missing.is_integration_violation());
///
/// let denied = LifecycleError::access_denied("OrderTest", "repository", "locked");
/// assert!(denied.is_access_denied());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    /// A field of a test instance could not be read
    #[error("Cannot read field '{field}' of {instance}: {reason}")]
    AccessDenied {
        instance: String,
        field: String,
        reason: String,
    },

    /// No value was published under the key in the current property scope
    #[error("No value stored under '{0}' in the current property scope")]
    StoreNotFound(String),

    /// A value was already published under the key
    #[error("Property store already holds a value under '{0}'")]
    DuplicateStoreEntry(String),

    /// The stored value has a different type than requested
    #[error("Value stored under '{key}' is not a {expected}")]
    StoreTypeMismatch { key: String, expected: &'static str },

    /// Stubbings configured during the session were never used
    #[error("Unnecessary stubbings detected: {0:?}")]
    UnnecessaryStubbing(Vec<String>),

    /// A lifecycle hook panicked while running a trial
    #[error("Lifecycle hook panicked: {0}")]
    HookPanicked(String),

    /// The mocking session was already finished
    #[error("Mocking session '{0}' was already finished")]
    SessionFinished(String),
}

impl LifecycleError {
    /// Create an access denied error for a field of a test instance
    pub fn access_denied(
        instance: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::AccessDenied {
            instance: instance.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a store lookup error for a missing key
    pub fn store_not_found(key: &str) -> Self {
        Self::StoreNotFound(key.to_string())
    }

    /// Check if this error comes from an unreadable field
    pub fn is_access_denied(&self) -> bool {
        matches!(self, LifecycleError::AccessDenied { .. })
    }

    /// Check if this error means the hooks were wired incorrectly.
    ///
    /// A try hook looking up state its property hook never published is a
    /// contract violation of the host integration, not a test failure.
    pub fn is_integration_violation(&self) -> bool {
        matches!(
            self,
            LifecycleError::StoreNotFound(_)
                | LifecycleError::DuplicateStoreEntry(_)
                | LifecycleError::StoreTypeMismatch { .. }
                | LifecycleError::SessionFinished(_)
                | LifecycleError::HookPanicked(_)
        )
    }

    /// Check if this error reports unused stubbings
    pub fn is_unnecessary_stubbing(&self) -> bool {
        matches!(self, LifecycleError::UnnecessaryStubbing(_))
    }
}
