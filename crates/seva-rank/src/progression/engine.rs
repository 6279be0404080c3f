use chrono::{DateTime, Utc};

use super::domain::RankTier;
use super::ladder::{Ladder, LadderError};
use super::state::{ProgressState, RankHistoryEntry, TierTransition};
use crate::config::RankingConfig;

/// Points awarded per person helped.
pub const POINTS_PER_PERSON: u32 = 5;

/// Stateless rules turning people helped into points and points into tiers.
#[derive(Debug, Clone)]
pub struct RankEngine {
    ladder: Ladder,
    points_per_unit: u32,
}

/// Result of [`RankEngine::apply_impact`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImpactOutcome {
    pub state: ProgressState,
    pub earned: u64,
    pub transition: Option<TierTransition>,
}

impl RankEngine {
    pub fn new(ladder: Ladder, points_per_unit: u32) -> Result<Self, ProgressionError> {
        if points_per_unit == 0 {
            return Err(ProgressionError::InvalidMultiplier);
        }
        Ok(Self {
            ladder,
            points_per_unit,
        })
    }

    /// Swarajya ladder at [`POINTS_PER_PERSON`].
    pub fn standard() -> Self {
        Self {
            ladder: Ladder::swarajya(),
            points_per_unit: POINTS_PER_PERSON,
        }
    }

    pub fn from_config(config: &RankingConfig) -> Result<Self, ProgressionError> {
        let ladder = match &config.ladder_path {
            Some(path) => Ladder::from_path(path)?,
            None => Ladder::preset(config.ladder),
        };
        Self::new(ladder, config.points_per_person)
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn points_per_unit(&self) -> u32 {
        self.points_per_unit
    }

    pub fn points_for_impact(&self, units: i64) -> Result<u64, ProgressionError> {
        let units = u64::try_from(units).map_err(|_| ProgressionError::InvalidInput { units })?;
        units
            .checked_mul(u64::from(self.points_per_unit))
            .ok_or(ProgressionError::PointsOverflow)
    }

    pub fn tier_for_points(&self, points: u64) -> &RankTier {
        self.ladder.tier_for_points(points)
    }

    pub fn initial_state(&self, now: DateTime<Utc>) -> ProgressState {
        let baseline = self.ladder.baseline();
        ProgressState {
            points: 0,
            current_tier: baseline.name.clone(),
            history: vec![RankHistoryEntry {
                tier: baseline.name.clone(),
                achieved_at: now,
                points_at_achievement: 0,
            }],
        }
    }

    /// Adds the points for `units` people helped and advances the tier.
    ///
    /// A jump across several thresholds appends one history entry per tier
    /// entered; intermediate entries record their own threshold and the last
    /// one records the new total. `state` is left untouched.
    pub fn apply_impact(
        &self,
        state: &ProgressState,
        units: i64,
        now: DateTime<Utc>,
    ) -> Result<ImpactOutcome, ProgressionError> {
        let earned = self.points_for_impact(units)?;
        let points = state
            .points
            .checked_add(earned)
            .ok_or(ProgressionError::PointsOverflow)?;

        let from_index = self.current_index(state)?;
        let to_index = self.ladder.index_for_points(points);

        let mut next = state.clone();
        next.points = points;

        if to_index == from_index {
            return Ok(ImpactOutcome {
                state: next,
                earned,
                transition: None,
            });
        }

        let entered = &self.ladder.tiers()[from_index + 1..=to_index];
        for (offset, tier) in entered.iter().enumerate() {
            let points_at_achievement = if offset + 1 == entered.len() {
                points
            } else {
                tier.points_required
            };
            next.history.push(RankHistoryEntry {
                tier: tier.name.clone(),
                achieved_at: now,
                points_at_achievement,
            });
        }

        let to = self.ladder.tiers()[to_index].name.clone();
        next.current_tier = to.clone();

        let transition = TierTransition {
            from: state.current_tier.clone(),
            to,
            skipped: entered[..entered.len() - 1]
                .iter()
                .map(|tier| tier.name.clone())
                .collect(),
        };

        Ok(ImpactOutcome {
            state: next,
            earned,
            transition: Some(transition),
        })
    }

    fn current_index(&self, state: &ProgressState) -> Result<usize, ProgressionError> {
        let index = self
            .ladder
            .position(&state.current_tier)
            .ok_or_else(|| ProgressionError::UnknownTier(state.current_tier.clone()))?;

        if self.ladder.index_for_points(state.points) != index {
            return Err(ProgressionError::InconsistentState {
                tier: state.current_tier.clone(),
                points: state.points,
            });
        }

        Ok(index)
    }
}

/// Failures raised while computing progress.
#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("people helped must be zero or more, got {units}")]
    InvalidInput { units: i64 },
    #[error("points per person must be greater than zero")]
    InvalidMultiplier,
    #[error("point total would overflow")]
    PointsOverflow,
    #[error("tier {0} is not part of the configured ladder")]
    UnknownTier(String),
    #[error("stored tier {tier} does not match {points} points")]
    InconsistentState { tier: String, points: u64 },
    #[error(transparent)]
    InvalidLadder(#[from] LadderError),
}
