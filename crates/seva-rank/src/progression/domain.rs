use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for the member whose progress is tracked.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One rung of the rank ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub name: String,
    pub points_required: u64,
    #[serde(default)]
    pub presentation: TierPresentation,
}

impl RankTier {
    pub fn new(name: impl Into<String>, points_required: u64) -> Self {
        Self {
            name: name.into(),
            points_required,
            presentation: TierPresentation::default(),
        }
    }

    pub fn with_presentation(mut self, presentation: TierPresentation) -> Self {
        self.presentation = presentation;
        self
    }
}

/// Badge metadata shown alongside a tier. Never consulted when ranking.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierPresentation {
    pub icon: String,
    pub color: String,
    pub lore: String,
    pub perks: Vec<String>,
    pub unlocks: Vec<String>,
}
