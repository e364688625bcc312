//! Counters collected during one `calculate` pass.

use core::fmt;

/// What a layout pass did, and how much of it came from cache.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Full layouts computed (positions written).
    pub layouts: u32,
    /// Measure-only passes computed.
    pub measures: u32,
    /// Full layouts answered from cache.
    pub cached_layouts: u32,
    /// Measure-only passes answered from cache.
    pub cached_measures: u32,
    /// Calls into leaf measure callbacks.
    pub measure_callbacks: u32,
    /// Longest measurement list seen on any node.
    pub max_measure_cache: usize,
}

impl LayoutStats {
    pub(crate) fn record(&mut self, perform_layout: bool, cached: bool) {
        match (perform_layout, cached) {
            (true, true) => self.cached_layouts += 1,
            (true, false) => self.layouts += 1,
            (false, true) => self.cached_measures += 1,
            (false, false) => self.measures += 1,
        }
    }
}

impl fmt::Display for LayoutStats {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "layouts={} measures={} cached_layouts={} cached_measures={} measure_callbacks={} max_measure_cache={}",
            self.layouts,
            self.measures,
            self.cached_layouts,
            self.cached_measures,
            self.measure_callbacks,
            self.max_measure_cache
        )
    }
}
