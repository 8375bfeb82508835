//! Summary statistics of a temperature field

/// Minimum, maximum and mean of a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    /// Lowest node value
    pub min: f32,
    /// Highest node value
    pub max: f32,
    /// Arithmetic mean over all nodes
    pub mean: f32,
}

impl FieldStats {
    /// Compute statistics of `values`. Returns `None` for an empty slice.
    pub fn of(values: &[f32]) -> Option<Self> {
        let (&first, rest) = values.split_first()?;
        let mut min = first;
        let mut max = first;
        let mut sum = f64::from(first);
        for &v in rest {
            min = min.min(v);
            max = max.max(v);
            sum += f64::from(v);
        }
        Some(Self {
            min,
            max,
            mean: (sum / values.len() as f64) as f32,
        })
    }
}
