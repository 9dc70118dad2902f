//! Test doubles and test utilities for mock lifecycle management
//!
//! This crate provides testing infrastructure including:
//! - Sample services and their mock and spy implementations
//! - Test instances and container hierarchies using the lifecycle hooks
//! - Random test data generators and property-based testing strategies
//! - Custom assertion helpers
//! - Contract test helpers

pub mod assertions;
pub mod builders;
pub mod contracts;
pub mod doubles;
pub mod fixtures;
pub mod generators;
pub mod services;

pub use assertions::*;
pub use builders::*;
pub use contracts::*;
pub use doubles::*;
pub use fixtures::*;
pub use generators::*;
pub use services::*;
