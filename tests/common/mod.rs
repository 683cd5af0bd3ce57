//! Common test utilities for user-digest integration tests


#[allow(unused_imports)]
pub use fixtures::*;
