//! Test utilities for integration testing.
//!
//! This module provides:
//! - Test data factories for creating valid test fixtures
//! - In-memory repository implementations for mocking persistence
//! - Helper builders for constructing `AppState` with test dependencies

mod app_state_builder;
mod factories;
mod processor_mocks;
mod store_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use processor_mocks::*;
pub use store_mocks::*;
