use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, FromRepr, IntoStaticStr};

use crate::error::Error;

/// Clear status as stored, shared by every supported title.
///
/// Discriminants are the stored codes, so `Ord` follows the stored order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Default,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum ClearStatus {
    #[default]
    #[strum(serialize = "NO PLAY")]
    NoPlay = 50,
    #[strum(serialize = "FAILED")]
    Failed = 100,
    #[strum(serialize = "ASSIST")]
    AssistClear = 200,
    #[strum(serialize = "EASY")]
    EasyClear = 300,
    #[strum(serialize = "CLEAR")]
    Clear = 400,
    #[strum(serialize = "HARD")]
    HardClear = 500,
    #[strum(serialize = "EX HARD")]
    ExHardClear = 600,
    #[strum(serialize = "FC")]
    FullCombo = 700,
}

impl ClearStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for ClearStatus {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(Error::InvalidClearStatus(value))
    }
}

/// Play style a chart or dan course belongs to
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum Discipline {
    #[strum(serialize = "SP")]
    Single = 1,
    #[strum(serialize = "DP")]
    Double = 2,
}

impl Discipline {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// The five charts of this play style, easiest first
    pub fn charts(self) -> [Chart; 5] {
        match self {
            Self::Single => [Chart::SpB, Chart::SpN, Chart::SpH, Chart::SpA, Chart::SpL],
            Self::Double => [Chart::DpB, Chart::DpN, Chart::DpH, Chart::DpA, Chart::DpL],
        }
    }
}

impl TryFrom<i32> for Discipline {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(Error::InvalidDiscipline(value))
    }
}

/// Chart identifier: five single-play and five double-play difficulties
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum Chart {
    #[strum(serialize = "SPB")]
    SpB = 0,
    #[strum(serialize = "SPN")]
    SpN = 1,
    #[strum(serialize = "SPH")]
    SpH = 2,
    #[strum(serialize = "SPA")]
    SpA = 3,
    #[strum(serialize = "SPL")]
    SpL = 4,
    #[strum(serialize = "DPB")]
    DpB = 5,
    #[strum(serialize = "DPN")]
    DpN = 6,
    #[strum(serialize = "DPH")]
    DpH = 7,
    #[strum(serialize = "DPA")]
    DpA = 8,
    #[strum(serialize = "DPL")]
    DpL = 9,
}

impl Chart {
    pub fn discipline(self) -> Discipline {
        if (self as i32) < 5 {
            Discipline::Single
        } else {
            Discipline::Double
        }
    }

    pub fn is_double(self) -> bool {
        self.discipline() == Discipline::Double
    }

    /// Column of this chart within its play style (0 = beginner .. 4 = leggendaria)
    pub fn slot(self) -> usize {
        (self as usize) % 5
    }
}

impl TryFrom<i32> for Chart {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(Error::InvalidChart(value))
    }
}

/// Dan certification ladder, lowest first
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum DanRank {
    #[strum(serialize = "7th kyu")]
    Kyu7 = 100,
    #[strum(serialize = "6th kyu")]
    Kyu6 = 200,
    #[strum(serialize = "5th kyu")]
    Kyu5 = 300,
    #[strum(serialize = "4th kyu")]
    Kyu4 = 400,
    #[strum(serialize = "3rd kyu")]
    Kyu3 = 500,
    #[strum(serialize = "2nd kyu")]
    Kyu2 = 600,
    #[strum(serialize = "1st kyu")]
    Kyu1 = 700,
    #[strum(serialize = "1st dan")]
    Dan1 = 800,
    #[strum(serialize = "2nd dan")]
    Dan2 = 900,
    #[strum(serialize = "3rd dan")]
    Dan3 = 1000,
    #[strum(serialize = "4th dan")]
    Dan4 = 1100,
    #[strum(serialize = "5th dan")]
    Dan5 = 1200,
    #[strum(serialize = "6th dan")]
    Dan6 = 1300,
    #[strum(serialize = "7th dan")]
    Dan7 = 1400,
    #[strum(serialize = "8th dan")]
    Dan8 = 1500,
    #[strum(serialize = "9th dan")]
    Dan9 = 1600,
    #[strum(serialize = "10th dan")]
    Dan10 = 1700,
    #[strum(serialize = "Chuden")]
    Chuden = 1800,
    #[strum(serialize = "Kaiden")]
    Kaiden = 1900,
}

impl DanRank {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for DanRank {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(Error::InvalidDanRank(value))
    }
}

/// Ghost selection strategy codes, independent of any title's wire codes
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    FromRepr,
    EnumIter,
    IntoStaticStr,
    Display,
)]
#[repr(i32)]
pub enum GhostKind {
    Rival = 100,
    GlobalTop = 200,
    GlobalAverage = 300,
    LocalTop = 400,
    LocalAverage = 500,
    DanTop = 600,
    DanAverage = 700,
    RivalTop = 800,
    RivalAverage = 900,
}

impl TryFrom<i32> for GhostKind {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::from_repr(value).ok_or(Error::InvalidGhostType(value))
    }
}
