//! Resolution of user overrides against computed chart defaults.
//!
//! Axis overrides resolve through a two-tier key lookup: the current format
//! keys overrides by axis index (`original0`, `original1`, ...); saved
//! configurations that predate the versioned format keyed them by the axis
//! label text instead. Index-keyed entries take precedence, and both formats
//! stay supported indefinitely because persisted reports never migrate.

use crate::models::{AxisOverride, AxisOverrides, DataSeriesDescriptor, LegendOverrides};

impl AxisOverrides {
    /// Look up the override for an axis: index key first, then the original
    /// (pre-override) label text. Returns `None` when neither form matches.
    pub fn resolve(&self, axis_index: usize, original_label: &str) -> Option<&AxisOverride> {
        self.0
            .get(&format!("original{axis_index}"))
            .or_else(|| self.0.get(original_label))
    }
}

impl LegendOverrides {
    /// Final displayed label for a series: the override title when one is
    /// saved under the fully formatted name, otherwise the name unchanged.
    pub fn display_name(&self, formatted_name: &str) -> String {
        self.0
            .get(formatted_name)
            .and_then(|o| o.title.as_deref())
            .unwrap_or(formatted_name)
            .to_string()
    }
}

/// Whether a series is visible, from the descriptor's visibility map keyed
/// by the fully formatted name. Absent entries default to visible.
pub fn series_visible(descriptor: &DataSeriesDescriptor, formatted_name: &str) -> bool {
    descriptor
        .visibility
        .get(formatted_name)
        .copied()
        .unwrap_or(true)
}
