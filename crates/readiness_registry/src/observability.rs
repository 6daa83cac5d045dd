pub const COMPONENTS_TOTAL: &str = "readiness_components_total";
pub const COMPONENTS_READY: &str = "readiness_components_ready";
pub const COMPONENTS_NOT_READY: &str = "readiness_components_not_ready";

/// Component counts taken from one registry snapshot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegistrySummary {
    pub total: usize,
    pub ready: usize,
    pub not_ready: usize,
}

impl RegistrySummary {
    /// True when at least one component is registered and all of them are ready.
    pub fn all_ready(&self) -> bool {
        self.total > 0 && self.not_ready == 0
    }

    /// Export the counts as gauges on whatever `metrics` recorder is installed.
    pub fn publish(&self) {
        metrics::gauge!(COMPONENTS_TOTAL).set(self.total as f64);
        metrics::gauge!(COMPONENTS_READY).set(self.ready as f64);
        metrics::gauge!(COMPONENTS_NOT_READY).set(self.not_ready as f64);
    }
}
