/// Descriptive statistics of one generation's fitness values.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitnessSummary {
    pub min: u64,
    pub max: u64,
    pub mean: f64,
    pub std_dev: f64,
}

impl FitnessSummary {
    #[must_use]
    pub fn from_values(values: &[u64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        #[expect(clippy::cast_precision_loss)]
        let len = values.len() as f64;
        #[expect(clippy::cast_precision_loss)]
        let mean = values.iter().map(|&v| v as f64).sum::<f64>() / len;
        #[expect(clippy::cast_precision_loss)]
        let variance = values
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / len;
        Self {
            min: values.iter().copied().min().unwrap_or_default(),
            max: values.iter().copied().max().unwrap_or_default(),
            mean,
            std_dev: variance.sqrt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_values() {
        let summary = FitnessSummary::from_values(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(summary.min, 2);
        assert_eq!(summary.max, 9);
        assert!((summary.mean - 5.0).abs() < 1e-12);
        assert!((summary.std_dev - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_summary_of_empty_slice() {
        assert_eq!(FitnessSummary::from_values(&[]), FitnessSummary::default());
    }
}
