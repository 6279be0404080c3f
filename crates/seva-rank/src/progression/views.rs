use serde::Serialize;

use super::domain::UserId;
use super::ladder::{Ladder, RankProgress};
use super::repository::ProgressRecord;
use super::state::RankHistoryEntry;

#[derive(Debug, Clone, Serialize)]
pub struct ProgressView {
    pub user_id: UserId,
    pub points: u64,
    pub rank: String,
    pub progress: RankProgress,
    pub history: Vec<RankHistoryEntry>,
}

impl ProgressView {
    pub fn from_record(record: &ProgressRecord, ladder: &Ladder) -> Self {
        Self {
            user_id: record.user_id.clone(),
            points: record.state.points(),
            rank: record.state.current_tier().to_string(),
            progress: ladder.progress(record.state.points()),
            history: record.state.history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TierView {
    pub level: usize,
    pub name: String,
    pub points_required: u64,
    /// Last point total still inside this tier; absent for the top tier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_points: Option<u64>,
    pub icon: String,
    pub color: String,
    pub lore: String,
    pub perks: Vec<String>,
    pub unlocks: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LadderView {
    pub points_per_person: u32,
    pub tiers: Vec<TierView>,
}

impl LadderView {
    pub fn new(ladder: &Ladder, points_per_person: u32) -> Self {
        let tiers = ladder
            .tiers()
            .iter()
            .enumerate()
            .map(|(index, tier)| TierView {
                level: index + 1,
                name: tier.name.clone(),
                points_required: tier.points_required,
                max_points: ladder
                    .next_after(index)
                    .map(|next| next.points_required - 1),
                icon: tier.presentation.icon.clone(),
                color: tier.presentation.color.clone(),
                lore: tier.presentation.lore.clone(),
                perks: tier.presentation.perks.clone(),
                unlocks: tier.presentation.unlocks.clone(),
            })
            .collect();

        Self {
            points_per_person,
            tiers,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeaderboardEntry {
    pub position: usize,
    pub user_id: UserId,
    pub points: u64,
    pub rank: String,
}
