//! Shared error and result types
pub mod error;
pub mod result;
