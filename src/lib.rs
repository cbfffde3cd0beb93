//! `Förskola` - searchable map directory of Swedish preschools
//!
//! This library provides the built-in preschool dataset, the search and
//! filter engine, the map view model and the page state that ties them
//! together, plus the HTTP surface serving them to a browser.

pub mod api;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod map;
pub mod models;
pub mod page;
pub mod search;
pub mod web;

// Re-export core types for public API
pub use crate::config::DirectoryConfig;
pub use dataset::Dataset;
pub use error::DirectoryError;
pub use map::{BoundingBox, MapView, Marker, RatingTier, Viewport, ViewportChange};
pub use models::{Coordinates, Municipality, Preschool, PreschoolCard, PreschoolDetail, SearchFilters};
pub use page::{DirectoryPage, ViewMode};
pub use search::filter_preschools;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DirectoryError>;
