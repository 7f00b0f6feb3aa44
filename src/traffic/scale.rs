use crate::model::EnrichedStation;
use crate::traffic::filter::TimeFilter;

/// Radius range used when every trip is shown.
pub const UNFILTERED_RANGE: (f64, f64) = (0.0, 25.0);

/// Radius range used under a time filter; counts are smaller, so circles get
/// a floor and a larger ceiling.
pub const FILTERED_RANGE: (f64, f64) = (3.0, 50.0);

/// Square-root scale from total traffic to circle radius, so circle area is
/// proportional to traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl RadiusScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Scale for the current station set under `filter`: domain
    /// `[0, max total_traffic]`, range chosen by whether a time is selected.
    pub fn for_stations(stations: &[EnrichedStation], filter: TimeFilter) -> Self {
        let max = stations.iter().map(|s| s.total_traffic).max().unwrap_or(0);
        let range = if filter.is_active() {
            FILTERED_RANGE
        } else {
            UNFILTERED_RANGE
        };
        Self::new((0.0, max as f64), range)
    }

    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Maps `value` to a radius. A zero-width domain maps everything to the
    /// middle of the range.
    pub fn radius(&self, value: f64) -> f64 {
        let (d0, d1) = (self.domain.0.sqrt(), self.domain.1.sqrt());
        let (r0, r1) = self.range;
        let span = d1 - d0;

        let t = if span == 0.0 || span.is_nan() {
            0.5
        } else {
            (value.max(0.0).sqrt() - d0) / span
        };

        r0 + t * (r1 - r0)
    }
}
