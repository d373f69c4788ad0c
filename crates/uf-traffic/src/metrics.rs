//! Published per-edge and per-feature metrics.

/// Lower and upper delay-factor clamp.
const DELAY_MIN: f64 = 1.0;
const DELAY_MAX: f64 = 3.0;

/// Congestion state of one directed edge after assignment.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeMetric {
    /// Number of assignment trips using this edge.
    pub volume: u32,
    /// Congested travel time in seconds (`+∞` when closed).
    pub time_s: f64,
    /// `time / t0` clamped to [1, 3].
    pub delay: f64,
    pub closed: bool,
}

/// Aggregate congestion state of one input feature: volume summed, delay
/// maxed, closed OR-ed over its edges.  Connector edges never contribute.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureMetric {
    pub volume: u32,
    pub delay: f64,
    pub closed: bool,
}

impl Default for FeatureMetric {
    fn default() -> Self {
        Self { volume: 0, delay: DELAY_MIN, closed: false }
    }
}

/// Delay factor `t / t0` clamped to [1, 3].
///
/// A non-finite `t` (closed edge) clamps to 3.  `t0` is asserted positive at
/// edge construction; the conservative branch below only exists for the
/// non-finite case and maps it to 3 as well.
pub fn delay_factor(time_s: f64, t0_secs: f64) -> f64 {
    if !(t0_secs > 0.0) || !t0_secs.is_finite() {
        return DELAY_MAX;
    }
    if !time_s.is_finite() {
        return DELAY_MAX;
    }
    (time_s / t0_secs).clamp(DELAY_MIN, DELAY_MAX)
}
