use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Judge counts reported with an attempt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Judge {
    pub pgreat: u32,
    pub great: u32,
    /// `None` when the title could not measure misses for this play
    pub miss_count: Option<u32>,
}

impl Judge {
    pub fn new(pgreat: u32, great: u32, miss_count: Option<u32>) -> Self {
        Self {
            pgreat,
            great,
            miss_count,
        }
    }

    /// Build from raw protocol values, where a miss count of -1 means untracked.
    ///
    /// Counts whose EX score does not fit a `u32` are rejected.
    pub fn from_raw(pgreat: u32, great: u32, miss_count: i32) -> Result<Self> {
        let judge = Self::new(pgreat, great, miss_count_from_raw(miss_count)?);
        judge.ex_score()?;
        Ok(judge)
    }

    /// Calculate EX score (pgreat * 2 + great)
    pub fn ex_score(&self) -> Result<u32> {
        ex_score(self.pgreat, self.great).ok_or(Error::InvalidJudge {
            pgreat: self.pgreat,
            great: self.great,
        })
    }
}

/// `None` on overflow
pub fn ex_score(pgreat: u32, great: u32) -> Option<u32> {
    pgreat.checked_mul(2)?.checked_add(great)
}

/// -1 is the untracked sentinel; any other negative value is rejected
pub fn miss_count_from_raw(raw: i32) -> Result<Option<u32>> {
    match raw {
        -1 => Ok(None),
        n if n >= 0 => Ok(Some(n as u32)),
        n => Err(Error::InvalidMissCount(n)),
    }
}

pub fn miss_count_to_raw(miss_count: Option<u32>) -> i32 {
    miss_count.map_or(-1, |n| n as i32)
}
