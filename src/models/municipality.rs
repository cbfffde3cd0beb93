//! Municipality records used by the municipality selector

use serde::{Deserialize, Serialize};

use super::Coordinates;

/// A Swedish municipality (kommun)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Municipality {
    pub id: String,
    pub name: String,
    pub region: String,
    pub coordinates: Coordinates,
}
