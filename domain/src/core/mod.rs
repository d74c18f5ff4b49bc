//! Core domain concepts shared across all subdomains.
//!
//! - [`query::Query`]: a validated user query
//! - [`params::GenerationParams`]: pass-through generation knobs
//! - [`error::DomainError`]: domain-level errors

pub mod error;
pub mod params;
pub mod query;
