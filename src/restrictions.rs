//! Human-readable notices for role-restricted series.
//!
//! Some viewers are only authorized to see part of a metric's data. Each
//! restricted series gets a footnote marker appended to its legend name, and
//! the chart footer carries one consolidated warning line per distinct
//! restriction. Identical restriction parameter sets share one marker.

use crate::models::RoleRestriction;

/// Per-build registry of role restrictions encountered while encoding.
#[derive(Debug, Default)]
pub struct RoleRestrictionNotices {
    entries: Vec<Vec<String>>,
}

impl RoleRestrictionNotices {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a series' restrictions and return the footnote marker to
    /// append to its name (e.g. `" *1"`). Empty parameters produce no marker.
    pub fn register(&mut self, restrictions: &[RoleRestriction]) -> String {
        let mut dimensions: Vec<String> = restrictions
            .iter()
            .flat_map(|r| r.dimensions.iter().cloned())
            .collect();
        dimensions.sort();
        dimensions.dedup();
        if dimensions.is_empty() {
            return String::new();
        }

        let number = match self.entries.iter().position(|e| *e == dimensions) {
            Some(i) => i + 1,
            None => {
                self.entries.push(dimensions);
                self.entries.len()
            }
        };
        format!(" *{number}")
    }

    /// Consolidated warning lines for the chart footer, one per distinct
    /// restriction, in registration order.
    pub fn strings(&self) -> Vec<String> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, dimensions)| {
                format!(
                    "*{}: Showing only data for the {} you have access to.",
                    i + 1,
                    dimensions.join(", ")
                )
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
