use crate::workflows::intake::normalizer::fold_text;
use serde::{Deserialize, Serialize};

/// Academic tier of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Doctorate,
    Master,
    Specialization,
}

const LEVEL_KEYWORDS: &[(Level, &[&str])] = &[
    (Level::Doctorate, &["doctor", "phd"]),
    (Level::Master, &["maestr", "master", "magister"]),
    (Level::Specialization, &["espec", "speciali"]),
];

impl Level {
    pub const fn ordered() -> [Self; 3] {
        [Self::Doctorate, Self::Master, Self::Specialization]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Doctorate => "Doctorate",
            Self::Master => "Master",
            Self::Specialization => "Specialization",
        }
    }

    /// Returns the first level whose keywords occur in the folded label.
    pub fn recognize(raw: &str) -> Option<Self> {
        let folded = fold_text(raw);
        LEVEL_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| folded.contains(keyword)))
            .map(|(level, _)| *level)
    }

    /// Unrecognised labels are priced and mixed as Master programs.
    pub fn classify(raw: &str) -> Self {
        Self::recognize(raw).unwrap_or(Self::Master)
    }
}

/// Delivery mode of a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[default]
    InPerson,
    Hybrid,
    Virtual,
    MedicalSurgical,
}

// First match wins, so "semipresencial" lands on in-person through "pres".
const MODALITY_KEYWORDS: &[(Modality, &[&str])] = &[
    (Modality::InPerson, &["pres", "in person", "in-person"]),
    (Modality::Hybrid, &["hib", "hyb"]),
    (Modality::Virtual, &["virt", "online"]),
    (Modality::MedicalSurgical, &["medico", "medical", "quirurg"]),
];

impl Modality {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::InPerson,
            Self::Hybrid,
            Self::Virtual,
            Self::MedicalSurgical,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InPerson => "In person",
            Self::Hybrid => "Hybrid",
            Self::Virtual => "Virtual",
            Self::MedicalSurgical => "Medical-surgical",
        }
    }

    pub fn recognize(raw: &str) -> Option<Self> {
        let folded = fold_text(raw);
        MODALITY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| folded.contains(keyword)))
            .map(|(modality, _)| *modality)
    }

    pub fn classify(raw: &str, fallback: Self) -> Self {
        Self::recognize(raw).unwrap_or(fallback)
    }
}

/// Per-level parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerLevel<T> {
    pub doctorate: T,
    pub master: T,
    pub specialization: T,
}

impl<T: Copy> PerLevel<T> {
    pub fn get(&self, level: Level) -> T {
        match level {
            Level::Doctorate => self.doctorate,
            Level::Master => self.master,
            Level::Specialization => self.specialization,
        }
    }
}

/// Per-modality parameter table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerModality<T> {
    pub in_person: T,
    pub hybrid: T,
    #[serde(rename = "virtual")]
    pub virtual_: T,
    pub medical_surgical: T,
}

impl<T: Copy> PerModality<T> {
    pub fn get(&self, modality: Modality) -> T {
        match modality {
            Modality::InPerson => self.in_person,
            Modality::Hybrid => self.hybrid,
            Modality::Virtual => self.virtual_,
            Modality::MedicalSurgical => self.medical_surgical,
        }
    }
}
