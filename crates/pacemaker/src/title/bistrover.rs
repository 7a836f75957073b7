use super::TitleTable;
use crate::game::{Chart, ClearStatus, DanRank, Discipline, GhostKind};

const DAN_LADDER: [(i32, DanRank); 19] = [
    (0, DanRank::Kyu7),
    (1, DanRank::Kyu6),
    (2, DanRank::Kyu5),
    (3, DanRank::Kyu4),
    (4, DanRank::Kyu3),
    (5, DanRank::Kyu2),
    (6, DanRank::Kyu1),
    (7, DanRank::Dan1),
    (8, DanRank::Dan2),
    (9, DanRank::Dan3),
    (10, DanRank::Dan4),
    (11, DanRank::Dan5),
    (12, DanRank::Dan6),
    (13, DanRank::Dan7),
    (14, DanRank::Dan8),
    (15, DanRank::Dan9),
    (16, DanRank::Dan10),
    (17, DanRank::Chuden),
    (18, DanRank::Kaiden),
];

/// beatmania IIDX 28 BISTROVER
pub const BISTROVER: TitleTable = TitleTable {
    name: "bistrover",
    ghost_length: 64,
    dan_stages: 4,
    clear_status: &[
        (0, ClearStatus::NoPlay),
        (1, ClearStatus::Failed),
        (2, ClearStatus::AssistClear),
        (3, ClearStatus::EasyClear),
        (4, ClearStatus::Clear),
        (5, ClearStatus::HardClear),
        (6, ClearStatus::ExHardClear),
        (7, ClearStatus::FullCombo),
    ],
    disciplines: &[(0, Discipline::Single), (1, Discipline::Double)],
    sp_dan: &DAN_LADDER,
    dp_dan: &DAN_LADDER,
    // There are no DP beginner charts in game, but code 5 is reserved for them
    charts: &[
        (0, Chart::SpB),
        (1, Chart::SpN),
        (2, Chart::SpH),
        (3, Chart::SpA),
        (4, Chart::SpL),
        (5, Chart::DpB),
        (6, Chart::DpN),
        (7, Chart::DpH),
        (8, Chart::DpA),
        (9, Chart::DpL),
    ],
    ghost_kinds: &[
        (1, GhostKind::Rival),
        (2, GhostKind::GlobalTop),
        (3, GhostKind::GlobalAverage),
        (4, GhostKind::LocalTop),
        (5, GhostKind::LocalAverage),
        (6, GhostKind::DanTop),
        (7, GhostKind::DanAverage),
        (8, GhostKind::RivalTop),
        (9, GhostKind::RivalAverage),
    ],
};
