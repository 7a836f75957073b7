use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid clear status value {0}")]
    InvalidClearStatus(i32),

    #[error("Invalid dan rank {0}")]
    InvalidDanRank(i32),

    #[error("Invalid dan rank type value {0}")]
    InvalidDiscipline(i32),

    #[error("Invalid chart {0}")]
    InvalidChart(i32),

    #[error("Invalid ghost type {0}")]
    InvalidGhostType(i32),

    #[error("Invalid miss count {0}")]
    InvalidMissCount(i32),

    #[error("Judge counts overflow the EX score: {pgreat} pgreat, {great} great")]
    InvalidJudge { pgreat: u32, great: u32 },

    #[error("Invalid ghost parameter: {0:?}")]
    InvalidGhostParameter(String),

    #[error("Expected a ghost for user score save")]
    GhostRequired,

    #[error("Expected no ghost for anonymous score save")]
    GhostForbidden,

    #[error("Title table {title} is incomplete: {what}")]
    IncompleteTitleTable { title: &'static str, what: String },

    #[error("Storage unavailable: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown title: {0}")]
    UnknownTitle(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if this error rejects the request itself rather than
    /// reporting an infrastructure fault
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            Error::InvalidClearStatus(_)
                | Error::InvalidDanRank(_)
                | Error::InvalidDiscipline(_)
                | Error::InvalidChart(_)
                | Error::InvalidGhostType(_)
                | Error::InvalidMissCount(_)
                | Error::InvalidJudge { .. }
                | Error::InvalidGhostParameter(_)
                | Error::GhostRequired
                | Error::GhostForbidden
        )
    }

    /// Check if this error is a "file not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}
