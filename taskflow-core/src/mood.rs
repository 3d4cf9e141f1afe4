use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ParseEnumError;

/// How the user says they feel right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Energetic,
    Focused,
    Tired,
    Creative,
    Distracted,
}

impl Mood {
    pub const ALL: [Mood; 5] = [
        Mood::Energetic,
        Mood::Focused,
        Mood::Tired,
        Mood::Creative,
        Mood::Distracted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Energetic => "energetic",
            Mood::Focused => "focused",
            Mood::Tired => "tired",
            Mood::Creative => "creative",
            Mood::Distracted => "distracted",
        }
    }

    /// Capitalized name for headings.
    pub fn label(&self) -> &'static str {
        match self {
            Mood::Energetic => "Energetic",
            Mood::Focused => "Focused",
            Mood::Tired => "Tired",
            Mood::Creative => "Creative",
            Mood::Distracted => "Distracted",
        }
    }
}

impl std::fmt::Display for Mood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mood {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Mood::ALL
            .into_iter()
            .find(|m| m.as_str() == wanted)
            .ok_or_else(|| {
                ParseEnumError::new(
                    "mood",
                    s,
                    "energetic, focused, tired, creative, distracted",
                )
            })
    }
}
