//! Fixed-bin histograms over a bounded domain

/// Histogram with equally sized bins spanning `[0, upper)`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<u64>,
    upper: f64,
}

impl Histogram {
    /// Create an empty histogram with `bin_count` bins over `[0, upper)`
    pub fn new(bin_count: usize, upper: f64) -> Self {
        Self {
            bins: vec![0; bin_count.max(1)],
            upper,
        }
    }

    /// Record a value; values at or past `upper` land in the last bin
    pub fn add(&mut self, value: f64) {
        let bin_count = self.bins.len();
        let scaled = (value / self.upper * bin_count as f64).floor();
        let index = if scaled.is_finite() && scaled > 0.0 {
            (scaled as usize).min(bin_count - 1)
        } else {
            0
        };
        if let Some(bin) = self.bins.get_mut(index) {
            *bin += 1;
        }
    }

    /// Raw bin counts
    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Total number of recorded values
    pub fn total(&self) -> u64 {
        self.bins.iter().sum()
    }

    /// Width of a single bin in domain units
    pub fn bin_width(&self) -> f64 {
        self.upper / self.bins.len() as f64
    }

    /// Count of values whose bin lies entirely inside `[start, end)`
    pub fn mass_between(&self, start: f64, end: f64) -> u64 {
        let width = self.bin_width();
        self.bins
            .iter()
            .enumerate()
            .filter(|(index, _)| {
                let bin_start = *index as f64 * width;
                bin_start >= start - f64::EPSILON && bin_start + width <= end + f64::EPSILON
            })
            .map(|(_, &count)| count)
            .sum()
    }
}
