//! Foundational data structures, error types, and comment syntax definitions.

pub mod comment;
pub mod error;
pub mod models;
