//! Disposable backing services for integration tests.
//!
//! Containers are started through testcontainers and require a reachable
//! Docker daemon.

pub mod error;
pub mod redis;

pub use error::{Result, TestInfraError};
