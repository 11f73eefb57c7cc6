use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Factur-X / ZUGFeRD conformance level, ordered from least to most data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileLevel {
    /// Minimal machine-readable data.
    Minimum,
    /// Basic without lines.
    BasicWl,
    /// Basic with lines.
    Basic,
    /// Full EN 16931.
    En16931,
    /// Beyond EN 16931.
    Extended,
}

/// Every accepted specification identifier (BT-24) and the level it maps to.
///
/// Several producers wrote `basic` and `extended` with differing URN
/// separators, so each of those levels has three spellings.
pub const PROFILE_URNS: &[(&str, ProfileLevel)] = &[
    ("urn:factur-x.eu:1p0:minimum", ProfileLevel::Minimum),
    ("urn:factur-x.eu:1p0:basicwl", ProfileLevel::BasicWl),
    ("urn:factur-x.eu:1p0:basic", ProfileLevel::Basic),
    (
        "urn:cen.eu:en16931:2017:compliant:factur-x.eu:1p0:basic",
        ProfileLevel::Basic,
    ),
    (
        "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:basic",
        ProfileLevel::Basic,
    ),
    ("urn:cen.eu:en16931:2017", ProfileLevel::En16931),
    ("urn:factur-x.eu:1p0:extended", ProfileLevel::Extended),
    (
        "urn:cen.eu:en16931:2017:compliant:factur-x.eu:1p0:extended",
        ProfileLevel::Extended,
    ),
    (
        "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended",
        ProfileLevel::Extended,
    ),
];

impl ProfileLevel {
    /// Lowercase level name (`minimum`, `basicwl`, `basic`, `en16931`, `extended`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimum => "minimum",
            Self::BasicWl => "basicwl",
            Self::Basic => "basic",
            Self::En16931 => "en16931",
            Self::Extended => "extended",
        }
    }

    /// Whether documents of this level carry invoice lines.
    pub fn has_lines(&self) -> bool {
        !matches!(self, Self::Minimum | Self::BasicWl)
    }
}

impl std::fmt::Display for ProfileLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a specification identifier URN.
///
/// Matching is exact; an unknown URN fails with
/// [`ExtractionError::InvalidCode`] for `specificationProfile`.
pub fn classify(profile_id: &str) -> Result<ProfileLevel, ExtractionError> {
    PROFILE_URNS
        .iter()
        .find(|(urn, _)| *urn == profile_id)
        .map(|(_, level)| *level)
        .ok_or_else(|| ExtractionError::invalid_code("specificationProfile", profile_id))
}
