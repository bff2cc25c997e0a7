//! Request generations for "last request wins".
//!
//! Every request the coordinator hands out is stamped with the generation
//! current at issue time. Issuing a new request of the same family bumps the
//! generation, so an older response can be recognised and dropped when it
//! finally arrives.

use crate::config::constants::COORDINATE_EPSILON;
use crate::data::poi::Coordinate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Default)]
pub struct GenerationCounter {
    current: u64,
}

impl GenerationCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, invalidating every earlier one.
    pub fn advance(&mut self) -> Generation {
        self.current += 1;
        Generation(self.current)
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        generation.0 == self.current
    }
}

/// What a POI search was issued for.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchKey {
    pub anchor: Coordinate,
    pub category: String,
}

impl SearchKey {
    pub fn new(anchor: Coordinate, category: &str) -> Self {
        Self { anchor, category: category.to_string() }
    }

    pub fn matches(&self, anchor: Coordinate, category: &str) -> bool {
        (self.anchor.latitude - anchor.latitude).abs() < COORDINATE_EPSILON
            && (self.anchor.longitude - anchor.longitude).abs() < COORDINATE_EPSILON
            && self.category == category
    }
}
