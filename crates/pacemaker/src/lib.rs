//! # pacemaker
//!
//! Score reconciliation and ghost selection for a rhythm game service.
//!
//! This crate provides:
//! - Best-score merging with an append-only attempt history
//! - Dan certification and course progress tracking
//! - Per-song score tables for own and rival leaderboards
//! - Ghost selection over nine strategies, including population averages
//! - Per-title translation between wire codes and internal enumerations
//!
//! Persistence goes through the [`Store`] trait; [`MemoryStore`] is a
//! complete in-memory implementation.

pub mod config;
pub mod dan;
pub mod error;
pub mod game;
pub mod ghost;
pub mod player;
pub mod score;
pub mod service;
pub mod store;
pub mod title;

pub use config::{OMNIMIX_VERSION_BUMP, ServiceConfig, ServiceConfigBuilder};
pub use dan::{RankAchievement, advance_certified};
pub use error::{Error, Result};
pub use game::{Chart, ClearStatus, DanRank, Discipline, Ghost, GhostKind, Judge, ex_score};
pub use ghost::{
    GhostAverage, GhostResult, GhostSelector, GhostStrategy, average_ghosts, reference_pace,
};
pub use player::{ExtId, Machine, Profile, UserId};
pub use score::{
    Attempt, AttemptEntry, BestUpdate, ChartKey, MergeOutcome, OWN_ROW_TAG, ScoreData,
    ScoreRecord, ScoreRow, merge_attempt, project_beginner, project_scores,
};
pub use service::ScoreService;
pub use store::{MemoryStore, Scope, Store};
pub use title::{BISTROVER, TitleTable};
