use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::domain::RankTier;
use super::ladders::{classic_tiers, swarajya_tiers};
use crate::config::LadderPreset;

/// Fixed, ordered sequence of tiers, validated once at construction.
///
/// Index 0 is the baseline tier with a threshold of 0 and every later tier
/// requires strictly more points than the one before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Ladder {
    tiers: Vec<RankTier>,
}

impl Ladder {
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, LadderError> {
        let baseline = tiers.first().ok_or(LadderError::Empty)?;
        if baseline.points_required != 0 {
            return Err(LadderError::BaselineNotZero {
                tier: baseline.name.clone(),
                points_required: baseline.points_required,
            });
        }

        for (index, pair) in tiers.windows(2).enumerate() {
            if pair[1].points_required <= pair[0].points_required {
                return Err(LadderError::NotAscending {
                    index: index + 1,
                    tier: pair[1].name.clone(),
                    points_required: pair[1].points_required,
                    previous: pair[0].points_required,
                });
            }
        }

        let mut seen = HashSet::new();
        for tier in &tiers {
            if !seen.insert(tier.name.as_str()) {
                return Err(LadderError::DuplicateName(tier.name.clone()));
            }
        }

        Ok(Self { tiers })
    }

    /// The ten-tier Sevak → Chhava ladder used by default.
    pub fn swarajya() -> Self {
        Self {
            tiers: swarajya_tiers(),
        }
    }

    /// The five-tier Sevak → Senapati ladder.
    pub fn classic() -> Self {
        Self {
            tiers: classic_tiers(),
        }
    }

    pub fn preset(preset: LadderPreset) -> Self {
        match preset {
            LadderPreset::Swarajya => Self::swarajya(),
            LadderPreset::Classic => Self::classic(),
        }
    }

    /// Parses a JSON array of tiers and validates it.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LadderError> {
        let tiers: Vec<RankTier> = serde_json::from_reader(reader)?;
        Self::new(tiers)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LadderError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LadderError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn baseline(&self) -> &RankTier {
        &self.tiers[0]
    }

    pub fn top(&self) -> &RankTier {
        &self.tiers[self.tiers.len() - 1]
    }

    pub fn get(&self, index: usize) -> Option<&RankTier> {
        self.tiers.get(index)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.tiers.iter().position(|tier| tier.name == name)
    }

    pub fn next_after(&self, index: usize) -> Option<&RankTier> {
        self.tiers.get(index + 1)
    }

    /// Ladder index of the highest tier whose threshold is at or below `points`.
    ///
    /// Scans from the top, so among equal thresholds the highest index wins.
    pub fn index_for_points(&self, points: u64) -> usize {
        self.tiers
            .iter()
            .rposition(|tier| tier.points_required <= points)
            .unwrap_or(0)
    }

    pub fn tier_for_points(&self, points: u64) -> &RankTier {
        &self.tiers[self.index_for_points(points)]
    }

    /// Distance from `points` to the next tier, for progress bars.
    pub fn progress(&self, points: u64) -> RankProgress {
        let index = self.index_for_points(points);
        let current = &self.tiers[index];

        match self.next_after(index) {
            Some(next) => {
                let span = next.points_required - current.points_required;
                let earned = points - current.points_required;
                let percent = ((earned as f64 / span as f64) * 100.0).min(100.0) as f32;
                RankProgress {
                    current: current.name.clone(),
                    next: Some(next.name.clone()),
                    points,
                    current_threshold: current.points_required,
                    next_threshold: Some(next.points_required),
                    points_to_next: next.points_required - points,
                    percent,
                }
            }
            None => RankProgress {
                current: current.name.clone(),
                next: None,
                points,
                current_threshold: current.points_required,
                next_threshold: None,
                points_to_next: 0,
                percent: 100.0,
            },
        }
    }
}

/// Position of a point total between its tier and the next one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankProgress {
    pub current: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    pub points: u64,
    pub current_threshold: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_threshold: Option<u64>,
    pub points_to_next: u64,
    pub percent: f32,
}

impl RankProgress {
    pub fn at_top(&self) -> bool {
        self.next.is_none()
    }

    /// Three quarters of the way to the next tier but not there yet.
    pub fn almost_there(&self) -> bool {
        (75.0..100.0).contains(&self.percent)
    }
}

/// A ladder that violates its ordering invariants. Fatal at load time.
#[derive(Debug, thiserror::Error)]
pub enum LadderError {
    #[error("invalid ladder: no tiers configured")]
    Empty,
    #[error("invalid ladder: baseline tier {tier} requires {points_required} points, expected 0")]
    BaselineNotZero { tier: String, points_required: u64 },
    #[error(
        "invalid ladder: tier {tier} at index {index} requires {points_required} points, \
         not above the previous threshold {previous}"
    )]
    NotAscending {
        index: usize,
        tier: String,
        points_required: u64,
        previous: u64,
    },
    #[error("invalid ladder: tier name {0} appears more than once")]
    DuplicateName(String),
    #[error("unable to read ladder file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid ladder: malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
