//! Map view model: rating-coloured markers and viewport fitting
//!
//! The browser-side map library only draws what this module decides. Whenever
//! the filtered subset changes the viewport is recomputed: one record centres
//! the map on it, several records fit their bounding box, and an empty subset
//! leaves the previous view in place.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MapConfig;
use crate::models::{Coordinates, Preschool};

/// Marker icon edge length in pixels
pub const MARKER_ICON_SIZE: u32 = 20;
/// Marker anchor offset in pixels (icon centre)
pub const MARKER_ICON_ANCHOR: u32 = 10;

const HIGH_RATING: f64 = 4.5;
const MEDIUM_RATING: f64 = 4.0;

/// Three-tier rating classification driving marker colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingTier {
    High,
    Medium,
    Low,
}

impl RatingTier {
    #[must_use]
    pub fn from_rating(rating: f64) -> Self {
        if rating >= HIGH_RATING {
            RatingTier::High
        } else if rating >= MEDIUM_RATING {
            RatingTier::Medium
        } else {
            RatingTier::Low
        }
    }

    /// Marker fill colour
    #[must_use]
    pub fn color(self) -> &'static str {
        match self {
            RatingTier::High => "#22c55e",
            RatingTier::Medium => "#3b82f6",
            RatingTier::Low => "#f59e0b",
        }
    }
}

/// One map marker per preschool of the filtered subset
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    /// Preschool id, forwarded to the selection on activation
    pub id: String,
    pub name: String,
    pub position: Coordinates,
    pub tier: RatingTier,
    pub color: String,
    pub label: String,
    pub icon_size: u32,
    pub icon_anchor: u32,
}

impl From<&Preschool> for Marker {
    fn from(preschool: &Preschool) -> Self {
        let tier = RatingTier::from_rating(preschool.rating);
        Self {
            id: preschool.id.clone(),
            name: preschool.name.clone(),
            position: preschool.coordinates,
            tier,
            color: tier.color().to_string(),
            label: preschool.rating_label(),
            icon_size: MARKER_ICON_SIZE,
            icon_anchor: MARKER_ICON_ANCHOR,
        }
    }
}

/// Markers for a subset, in subset order
#[must_use]
pub fn markers(preschools: &[&Preschool]) -> Vec<Marker> {
    preschools.iter().map(|p| Marker::from(*p)).collect()
}

/// Axis-aligned box in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Smallest box containing every coordinate, `None` when there are none
    #[must_use]
    pub fn containing<I>(coordinates: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinates>,
    {
        coordinates.into_iter().fold(None, |bounds, point| {
            Some(match bounds {
                None => BoundingBox {
                    south: point.latitude,
                    west: point.longitude,
                    north: point.latitude,
                    east: point.longitude,
                },
                Some(b) => BoundingBox {
                    south: b.south.min(point.latitude),
                    west: b.west.min(point.longitude),
                    north: b.north.max(point.latitude),
                    east: b.east.max(point.longitude),
                },
            })
        })
    }

    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }
}

/// The visible map region
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Viewport {
    /// Centre and zoom level
    Center { center: Coordinates, zoom: u8 },
    /// Box fitted into the map with pixel padding on each axis
    Bounds { bounds: BoundingBox, padding: [u32; 2] },
}

/// Instruction for the map after the subset changed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ViewportChange {
    SetView { center: Coordinates, zoom: u8 },
    FitBounds { bounds: BoundingBox, padding: [u32; 2] },
    Unchanged,
}

/// Viewport state of the map panel
#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    viewport: Viewport,
    single_result_zoom: u8,
    fit_padding: u32,
    /// Ids of the subset the viewport was last fitted to
    synced_ids: Option<Vec<String>>,
}

impl MapView {
    /// Map at the configured default centre and zoom
    #[must_use]
    pub fn new(config: &MapConfig) -> Self {
        Self {
            viewport: Viewport::Center {
                center: config.default_center(),
                zoom: config.default_zoom,
            },
            single_result_zoom: config.single_result_zoom,
            fit_padding: config.fit_padding_px,
            synced_ids: None,
        }
    }

    /// Map whose client already shows the subset with these ids
    #[must_use]
    pub fn resume(config: &MapConfig, synced_ids: Vec<String>) -> Self {
        Self {
            synced_ids: Some(synced_ids),
            ..Self::new(config)
        }
    }

    /// Ids of the subset the viewport was last fitted to
    #[must_use]
    pub fn synced_ids(&self) -> Option<&[String]> {
        self.synced_ids.as_deref()
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fit the viewport to a new subset.
    ///
    /// Returns `Unchanged` when the subset is empty or identical to the one
    /// last synced.
    pub fn sync(&mut self, subset: &[&Preschool]) -> ViewportChange {
        let ids: Vec<String> = subset.iter().map(|p| p.id.clone()).collect();
        if self.synced_ids.as_ref() == Some(&ids) {
            return ViewportChange::Unchanged;
        }
        self.synced_ids = Some(ids);

        let change = match subset {
            [] => ViewportChange::Unchanged,
            [only] => ViewportChange::SetView {
                center: only.coordinates,
                zoom: self.single_result_zoom,
            },
            many => match BoundingBox::containing(many.iter().map(|p| p.coordinates)) {
                Some(bounds) => ViewportChange::FitBounds {
                    bounds,
                    padding: [self.fit_padding, self.fit_padding],
                },
                None => ViewportChange::Unchanged,
            },
        };

        match change {
            ViewportChange::SetView { center, zoom } => {
                self.viewport = Viewport::Center { center, zoom };
            }
            ViewportChange::FitBounds { bounds, padding } => {
                self.viewport = Viewport::Bounds { bounds, padding };
            }
            ViewportChange::Unchanged => {}
        }
        debug!(results = subset.len(), ?change, "Map viewport synced");
        change
    }
}

/// Tile layer handed to the browser map
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileLayer {
    pub url: String,
    pub attribution: String,
}

impl From<&MapConfig> for TileLayer {
    fn from(config: &MapConfig) -> Self {
        Self {
            url: config.tile_url.clone(),
            attribution: config.tile_attribution.clone(),
        }
    }
}
