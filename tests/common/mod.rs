//! Common test utilities and helpers
//!
//! Shared between the integration test binaries; not every binary uses every
//! helper.
#![allow(dead_code)]

pub mod mock_services;
pub mod test_fixtures;
