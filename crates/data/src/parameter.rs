//! Forecast parameters (predictors) and their collection.

use crate::registry::{Keyed, Registry};

/// A forecast variable with its similarity weight.
///
/// Circular parameters (e.g. wind direction in degrees) are compared by the
/// shortest arc on a 360° circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    circular: bool,
    weight: f64,
}

impl Parameter {
    /// Creates a linear parameter with weight 1.0.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            circular: false,
            weight: 1.0,
        }
    }

    /// Marks the parameter as circular.
    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    /// Sets the similarity weight. A zero weight excludes the parameter
    /// from the metric.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Parameter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether values live on a 0–360 circle.
    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Similarity weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }
}

impl Keyed for Parameter {
    type Key = String;
    const COLLECTION: &'static str = "parameters";

    fn key(&self) -> String {
        self.name.clone()
    }
}

/// Ordered parameter collection keyed by name.
pub type Parameters = Registry<Parameter>;

impl Registry<Parameter> {
    /// Weights in parameter order.
    pub fn weights(&self) -> Vec<f64> {
        self.iter().map(Parameter::weight).collect()
    }

    /// Circular flags in parameter order.
    pub fn circulars(&self) -> Vec<bool> {
        self.iter().map(Parameter::is_circular).collect()
    }
}
