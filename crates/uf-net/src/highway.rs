//! Highway classification and the speed/capacity table.
//!
//! The table drives both free-flow speed and hourly capacity, so the
//! assignment's BPR delay and the particle speeds stay consistent with each
//! other.  Unrecognized, empty, or missing tags map to [`HighwayClass::Road`].

use std::fmt;

/// Road class derived from a feature's `highway` tag.
///
/// `Connector` is never parsed from input: it marks the synthetic edges the
/// graph builder inserts to stitch disconnected components together.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HighwayClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    Residential,
    Service,
    Road,
    Connector,
}

impl HighwayClass {
    /// Parse a `highway` tag value.  Anything unknown falls back to `Road`.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "motorway" => Self::Motorway,
            "trunk" => Self::Trunk,
            "primary" => Self::Primary,
            "secondary" => Self::Secondary,
            "tertiary" => Self::Tertiary,
            "residential" => Self::Residential,
            "service" => Self::Service,
            _ => Self::Road,
        }
    }

    /// Free-flow speed in km/h.
    pub fn speed_kmh(self) -> f64 {
        match self {
            Self::Motorway => 70.0,
            Self::Trunk => 60.0,
            Self::Primary => 50.0,
            Self::Secondary => 45.0,
            Self::Tertiary => 40.0,
            Self::Residential => 30.0,
            Self::Service => 20.0,
            Self::Road | Self::Connector => 35.0,
        }
    }

    /// Free-flow speed in m/s.
    #[inline]
    pub fn speed_mps(self) -> f64 {
        self.speed_kmh() / 3.6
    }

    /// Hourly capacity in vehicles per hour.
    pub fn capacity_vph(self) -> f64 {
        match self {
            Self::Motorway => 2200.0,
            Self::Trunk => 1800.0,
            Self::Primary => 1500.0,
            Self::Secondary => 1200.0,
            Self::Tertiary => 900.0,
            Self::Residential => 500.0,
            Self::Service => 300.0,
            Self::Road | Self::Connector => 700.0,
        }
    }
}

impl fmt::Display for HighwayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Motorway => "motorway",
            Self::Trunk => "trunk",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::Residential => "residential",
            Self::Service => "service",
            Self::Road => "road",
            Self::Connector => "connector",
        };
        f.write_str(s)
    }
}
