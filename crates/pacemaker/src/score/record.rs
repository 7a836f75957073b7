use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game::{Chart, ClearStatus, Ghost};

/// One chart of one song
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChartKey {
    pub song_id: u32,
    pub chart: Chart,
}

impl ChartKey {
    pub fn new(song_id: u32, chart: Chart) -> Self {
        Self { song_id, chart }
    }
}

/// Best-score record for one (user, song, chart)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub key: ChartKey,
    /// Best EX score ever achieved
    pub points: u32,
    pub data: ScoreData,
}

/// Attributes stored alongside the best EX score
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreData {
    /// Best clear status, tracked independently of points
    pub clear_status: ClearStatus,
    /// Lowest tracked miss count, `None` if never measured
    pub miss_count: Option<u32>,
    /// Judge counts of the play that earned `points`
    pub pgreat: u32,
    pub great: u32,
    /// Replay trace of the play that earned `points`
    pub ghost: Option<Ghost>,
    /// Machine where the record was last updated
    pub shop: Option<u32>,
}

/// Verbatim log entry for one submitted play
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptEntry {
    pub key: ChartKey,
    /// The attempt's own EX score, before merging with the best record
    pub points: u32,
    pub clear_status: ClearStatus,
    pub miss_count: Option<u32>,
    pub ghost: Option<Ghost>,
    pub shop: Option<u32>,
    pub played_at: DateTime<Utc>,
    /// Raised the best score and reduced the miss count in one play
    pub qualifies: bool,
}
