use std::fmt;

use serde::{Deserialize, Serialize};

/// Trainer gender, packed next to the encounter music in the trainer table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    #[default]
    Male,
    Female,
}

impl Gender {
    /// Marker OR-ed into `.encounterMusic_gender` for female trainers.
    pub const FEMALE_MARKER: &'static str = "F_TRAINER_FEMALE";

    pub fn from_marker(token: &str) -> Self {
        if token == Self::FEMALE_MARKER {
            Self::Female
        } else {
            Self::Male
        }
    }

    pub fn marker(&self) -> Option<&'static str> {
        match *self {
            Self::Male => None,
            Self::Female => Some(Self::FEMALE_MARKER),
        }
    }

    pub fn is_female(&self) -> bool {
        *self == Self::Female
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
