//! Observation and forecast stations.

use crate::registry::{Keyed, Registry};

/// A point location identified by name.
///
/// Equality is by name only; coordinates and tag do not take part.
#[derive(Debug, Clone)]
pub struct Station {
    name: String,
    x: f64,
    y: f64,
    tag: u32,
}

impl Station {
    /// Creates a station at `(x, y)` with tag 0.
    pub fn new(name: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            name: name.into(),
            x,
            y,
            tag: 0,
        }
    }

    /// Sets the grouping tag. Neighbour search never crosses tags when tag
    /// filtering is on.
    pub fn with_tag(mut self, tag: u32) -> Self {
        self.tag = tag;
        self
    }

    /// Station name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Grouping tag.
    pub fn tag(&self) -> u32 {
        self.tag
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Station {}

impl Keyed for Station {
    type Key = String;
    const COLLECTION: &'static str = "stations";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Ordered station collection keyed by name.
pub type Stations = Registry<Station>;

impl Registry<Station> {
    /// `(x, y)` pairs in station order.
    pub fn coordinates(&self) -> Vec<(f64, f64)> {
        self.iter().map(|s| (s.x, s.y)).collect()
    }

    /// Tags in station order.
    pub fn tags(&self) -> Vec<u32> {
        self.iter().map(Station::tag).collect()
    }
}
