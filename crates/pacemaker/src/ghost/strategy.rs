use crate::error::{Error, Result};
use crate::game::GhostKind;
use crate::player::ExtId;

/// Ghost selection strategy with its parameter already parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GhostStrategy {
    /// One named rival's own best
    Rival(ExtId),
    GlobalTop,
    GlobalAverage,
    LocalTop,
    LocalAverage,
    DanTop,
    DanAverage,
    RivalTop(Vec<ExtId>),
    RivalAverage(Vec<ExtId>),
}

impl GhostStrategy {
    /// Build a strategy from its kind and the raw request parameter
    pub fn parse(kind: GhostKind, parameter: &str) -> Result<Self> {
        Ok(match kind {
            GhostKind::Rival => Self::Rival(parse_ext_id(parameter)?),
            GhostKind::GlobalTop => Self::GlobalTop,
            GhostKind::GlobalAverage => Self::GlobalAverage,
            GhostKind::LocalTop => Self::LocalTop,
            GhostKind::LocalAverage => Self::LocalAverage,
            GhostKind::DanTop => Self::DanTop,
            GhostKind::DanAverage => Self::DanAverage,
            GhostKind::RivalTop => Self::RivalTop(parse_rival_list(parameter)?),
            GhostKind::RivalAverage => Self::RivalAverage(parse_rival_list(parameter)?),
        })
    }

    pub fn kind(&self) -> GhostKind {
        match self {
            Self::Rival(_) => GhostKind::Rival,
            Self::GlobalTop => GhostKind::GlobalTop,
            Self::GlobalAverage => GhostKind::GlobalAverage,
            Self::LocalTop => GhostKind::LocalTop,
            Self::LocalAverage => GhostKind::LocalAverage,
            Self::DanTop => GhostKind::DanTop,
            Self::DanAverage => GhostKind::DanAverage,
            Self::RivalTop(_) => GhostKind::RivalTop,
            Self::RivalAverage(_) => GhostKind::RivalAverage,
        }
    }
}

fn parse_ext_id(raw: &str) -> Result<ExtId> {
    raw.trim()
        .parse::<u32>()
        .map(ExtId)
        .map_err(|_| Error::InvalidGhostParameter(raw.to_string()))
}

/// Parse a rival list of the form `[12345678],[23456789]`
pub fn parse_rival_list(raw: &str) -> Result<Vec<ExtId>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }

    raw.split(',')
        .map(|entry| {
            let entry = entry.trim();
            let inner = entry
                .strip_prefix('[')
                .and_then(|e| e.strip_suffix(']'))
                .ok_or_else(|| Error::InvalidGhostParameter(raw.to_string()))?;
            inner
                .parse::<u32>()
                .map(ExtId)
                .map_err(|_| Error::InvalidGhostParameter(raw.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_parse_rival_list() {
        assert_eq!(
            parse_rival_list("[12345678],[23456789]").unwrap(),
            vec![ExtId(12345678), ExtId(23456789)]
        );
        assert_eq!(parse_rival_list("[5]").unwrap(), vec![ExtId(5)]);
        assert!(parse_rival_list("").unwrap().is_empty());
        assert!(matches!(
            parse_rival_list("12345678"),
            Err(Error::InvalidGhostParameter(_))
        ));
        assert!(parse_rival_list("[1],[x]").is_err());
    }

    #[test]
    fn test_parse_single_rival() {
        assert_eq!(
            GhostStrategy::parse(GhostKind::Rival, "12345678").unwrap(),
            GhostStrategy::Rival(ExtId(12345678))
        );
        assert!(
            GhostStrategy::parse(GhostKind::Rival, "")
                .unwrap_err()
                .is_invalid_input()
        );
    }

    #[test]
    fn test_kind_round_trips() {
        for kind in GhostKind::iter() {
            let strategy =
                GhostStrategy::parse(kind, "[1]").or_else(|_| GhostStrategy::parse(kind, "1"));
            assert_eq!(strategy.unwrap().kind(), kind);
        }
    }
}
