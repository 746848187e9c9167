use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Regular,
    Periodic,
}

/// Classification of a value against its reference range.
/// Serialized as "Low" / "Normal" / "High".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Low,
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    Green,
    Yellow,
    Red,
    Unknown,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Normal => "Normal",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

impl ScoreTier {
    /// Human label shown next to the score.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Green => "Excellent",
            Self::Yellow => "Average",
            Self::Red => "Needs Attention",
            Self::Unknown => "No Data",
        }
    }
}
