// ABOUTME: Pure data types with no cross-crate dependencies
// ABOUTME: Foundation layer for the token extractor, comparator and orchestrator

pub mod mismatch;
pub mod token;

// Re-export commonly used types
pub use mismatch::{Category, Mismatch, MismatchKind, ValidationResult};
pub use token::{TokenName, TokenRecord, TokenTree};
