//! Dan certification progress.

use serde::{Deserialize, Serialize};

use crate::game::DanRank;

/// Best pass statistics for one (rank, discipline) course
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankAchievement {
    pub percent: u32,
    pub stages_cleared: u32,
}

impl RankAchievement {
    /// Fold one attempt in; both fields only ever go up
    pub fn absorb(self, percent: u32, stages_cleared: u32) -> Self {
        Self {
            percent: self.percent.max(percent),
            stages_cleared: self.stages_cleared.max(stages_cleared),
        }
    }
}

/// Certified rank after clearing `cleared`; never lower than `current`
pub fn advance_certified(current: Option<DanRank>, cleared: DanRank) -> DanRank {
    current.map_or(cleared, |rank| rank.max(cleared))
}
