//! Per-title translation between wire codes and internal enumerations.
//!
//! Each supported title ships one [`TitleTable`] as plain data. Tables are
//! checked for exhaustiveness with [`TitleTable::validate`] before use.

mod bistrover;

use std::fmt::Debug;

use strum::IntoEnumIterator;

use crate::error::{Error, Result};
use crate::game::{Chart, ClearStatus, DanRank, Discipline, GhostKind};

pub use bistrover::BISTROVER;

/// Wire code a title uses for "no dan rank"
pub const NO_RANK: i32 = -1;

/// Code tables for one title revision
#[derive(Debug)]
pub struct TitleTable {
    pub name: &'static str,
    /// Checkpoints per ghost trace
    pub ghost_length: usize,
    /// Stages in a dan course; clearing all of them certifies the rank
    pub dan_stages: u32,
    pub clear_status: &'static [(i32, ClearStatus)],
    pub disciplines: &'static [(i32, Discipline)],
    pub sp_dan: &'static [(i32, DanRank)],
    pub dp_dan: &'static [(i32, DanRank)],
    pub charts: &'static [(i32, Chart)],
    pub ghost_kinds: &'static [(i32, GhostKind)],
}

/// Every shipped title table
pub const TITLES: &[&TitleTable] = &[&BISTROVER];

/// Look up a shipped title by name (case-insensitive)
pub fn by_name(name: &str) -> Result<&'static TitleTable> {
    TITLES
        .iter()
        .copied()
        .find(|t| t.name.eq_ignore_ascii_case(name))
        .ok_or_else(|| Error::UnknownTitle(name.to_string()))
}

impl TitleTable {
    /// Check that every internal value has exactly one wire code and no
    /// wire code is reused
    pub fn validate(&self) -> Result<()> {
        check_total(self.name, "clear status", self.clear_status)?;
        check_total(self.name, "discipline", self.disciplines)?;
        check_total(self.name, "single dan rank", self.sp_dan)?;
        check_total(self.name, "double dan rank", self.dp_dan)?;
        check_total(self.name, "chart", self.charts)?;
        check_total(self.name, "ghost type", self.ghost_kinds)?;
        if self.ghost_length == 0 {
            return Err(Error::IncompleteTitleTable {
                title: self.name,
                what: "ghost length is zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn clear_status_from_game(&self, code: i32) -> Result<ClearStatus> {
        to_internal(self.clear_status, code).ok_or(Error::InvalidClearStatus(code))
    }

    pub fn clear_status_to_game(&self, status: ClearStatus) -> Option<i32> {
        to_game(self.clear_status, status)
    }

    pub fn discipline_from_game(&self, code: i32) -> Result<Discipline> {
        to_internal(self.disciplines, code).ok_or(Error::InvalidDiscipline(code))
    }

    pub fn chart_from_game(&self, code: i32) -> Result<Chart> {
        to_internal(self.charts, code).ok_or(Error::InvalidChart(code))
    }

    pub fn chart_to_game(&self, chart: Chart) -> Option<i32> {
        to_game(self.charts, chart)
    }

    /// Unknown ghost type codes mean "no ghost requested"
    pub fn ghost_kind_from_game(&self, code: i32) -> Option<GhostKind> {
        to_internal(self.ghost_kinds, code)
    }

    /// `NO_RANK` maps to `None`
    pub fn rank_from_game(&self, code: i32, discipline: Discipline) -> Result<Option<DanRank>> {
        if code == NO_RANK {
            return Ok(None);
        }
        to_internal(self.dan_table(discipline), code)
            .map(Some)
            .ok_or(Error::InvalidDanRank(code))
    }

    pub fn rank_to_game(&self, rank: Option<DanRank>, discipline: Discipline) -> i32 {
        rank.and_then(|r| to_game(self.dan_table(discipline), r))
            .unwrap_or(NO_RANK)
    }

    fn dan_table(&self, discipline: Discipline) -> &'static [(i32, DanRank)] {
        match discipline {
            Discipline::Single => self.sp_dan,
            Discipline::Double => self.dp_dan,
        }
    }
}

fn to_internal<T: Copy>(pairs: &[(i32, T)], code: i32) -> Option<T> {
    pairs.iter().find(|(c, _)| *c == code).map(|(_, v)| *v)
}

fn to_game<T: PartialEq>(pairs: &[(i32, T)], value: T) -> Option<i32> {
    pairs.iter().find(|(_, v)| *v == value).map(|(c, _)| *c)
}

fn check_total<T>(title: &'static str, what: &str, pairs: &[(i32, T)]) -> Result<()>
where
    T: IntoEnumIterator + PartialEq + Debug,
{
    for value in T::iter() {
        let count = pairs.iter().filter(|(_, v)| *v == value).count();
        if count != 1 {
            return Err(Error::IncompleteTitleTable {
                title,
                what: format!("{what} {value:?} mapped {count} times"),
            });
        }
    }
    for (i, (code, _)) in pairs.iter().enumerate() {
        if pairs[..i].iter().any(|(c, _)| c == code) {
            return Err(Error::IncompleteTitleTable {
                title,
                what: format!("{what} code {code} reused"),
            });
        }
    }
    Ok(())
}
