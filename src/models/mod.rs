//! Data models for the preschool directory
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates
//! - Preschool: Preschool records plus the card and detail projections
//! - Municipality: Municipality records for the municipality selector
//! - Filters: Structured filter criteria and selector vocabularies

pub mod filters;
pub mod location;
pub mod municipality;
pub mod preschool;

// Re-export all public types for convenient access
pub use filters::{FilterKey, FilterOptions, RatingOption, SearchFilters};
pub use location::Coordinates;
pub use municipality::Municipality;
pub use preschool::{Preschool, PreschoolCard, PreschoolDetail};
