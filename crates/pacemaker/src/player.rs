//! Player identity, profile and cabinet types consumed from the store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{DanRank, Discipline};

/// Internal user identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user#{}", self.0)
    }
}

/// Numeric player id shown on the cabinet (the "IIDX ID")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ExtId(pub u32);

impl fmt::Display for ExtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:04}", self.0 / 10000, self.0 % 10000)
    }
}

/// The subset of a player profile this crate reads and writes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    /// Prefecture id shown next to the name
    pub pid: u32,
    pub ext_id: Option<ExtId>,
    /// Certified single-play rank
    pub sgrade: Option<DanRank>,
    /// Certified double-play rank
    pub dgrade: Option<DanRank>,
    /// Machine id of the player's declared home arcade
    pub shop_location: Option<u32>,
}

impl Profile {
    pub fn new(name: impl Into<String>, pid: u32) -> Self {
        Self {
            name: name.into(),
            pid,
            ..Default::default()
        }
    }

    pub fn certified_rank(&self, discipline: Discipline) -> Option<DanRank> {
        match discipline {
            Discipline::Single => self.sgrade,
            Discipline::Double => self.dgrade,
        }
    }

    pub fn set_certified_rank(&mut self, discipline: Discipline, rank: Option<DanRank>) {
        match discipline {
            Discipline::Single => self.sgrade = rank,
            Discipline::Double => self.dgrade = rank,
        }
    }
}

/// A registered cabinet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    pub id: u32,
    pub name: String,
    /// Parent arcade grouping, if the cabinet belongs to one
    pub arcade: Option<u32>,
}
