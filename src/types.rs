//! Condition codes, channels and other small shared types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Experimental condition under which sway was recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Eyes closed, normal surface.
    #[serde(rename = "ECN")]
    EyesClosedNormal,
    /// Eyes closed, reduced sensory input.
    #[serde(rename = "ECR")]
    EyesClosedReduced,
    /// Virtual reality, no audio.
    #[serde(rename = "VRN")]
    VrNormal,
    /// Virtual reality with music.
    #[serde(rename = "VRM")]
    VrMusic,
}

impl Condition {
    /// All conditions in narrative order.
    pub const ALL: [Condition; 4] = [
        Condition::EyesClosedNormal,
        Condition::EyesClosedReduced,
        Condition::VrNormal,
        Condition::VrMusic,
    ];

    /// Short code used in file names and configuration.
    pub fn code(self) -> &'static str {
        match self {
            Condition::EyesClosedNormal => "ECN",
            Condition::EyesClosedReduced => "ECR",
            Condition::VrNormal => "VRN",
            Condition::VrMusic => "VRM",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Condition::EyesClosedNormal => "eyes closed (normal)",
            Condition::EyesClosedReduced => "eyes closed (reduced)",
            Condition::VrNormal => "VR (normal)",
            Condition::VrMusic => "VR (music)",
        }
    }

    /// Condition shown at a 1-based narrative step, if any.
    pub fn from_step(step: usize) -> Option<Self> {
        step.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a condition or channel name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownName(pub String);

impl fmt::Display for UnknownName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown name `{}`", self.0)
    }
}

impl std::error::Error for UnknownName {}

impl FromStr for Condition {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownName(s.to_string()))
    }
}

/// A single measured quantity of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Medio-lateral centre of pressure.
    CopX,
    /// Antero-posterior centre of pressure.
    CopY,
    /// Moment about the x axis.
    Mx,
    /// Moment about the y axis.
    My,
}

impl Channel {
    /// Column name in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Channel::CopX => "CoPx",
            Channel::CopY => "CoPy",
            Channel::Mx => "Mx",
            Channel::My => "My",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for Channel {
    type Err = UnknownName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copx" | "x" => Ok(Channel::CopX),
            "copy" | "y" => Ok(Channel::CopY),
            "mx" => Ok(Channel::Mx),
            "my" => Ok(Channel::My),
            _ => Err(UnknownName(s.to_string())),
        }
    }
}

/// Pair of channels plotted together on a line chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Metric {
    /// CoPx and CoPy.
    #[default]
    Cop,
    /// Mx and My.
    Moment,
}

impl Metric {
    /// The two channels making up this metric.
    pub fn channels(self) -> [Channel; 2] {
        match self {
            Metric::Cop => [Channel::CopX, Channel::CopY],
            Metric::Moment => [Channel::Mx, Channel::My],
        }
    }
}

/// Positive participant identifier as it appears in `subject_id`.
pub type ParticipantId = u32;
