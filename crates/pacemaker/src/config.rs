//! Service configuration.
//!
//! ```toml
//! game = "iidx"
//! version = 28
//! omnimix = false
//! title = "bistrover"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::store::Scope;
use crate::title::{self, TitleTable};

/// Offset added to the version for omnimix score data
pub const OMNIMIX_VERSION_BUMP: u32 = 10000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Game series key used for all store lookups
    pub game: String,
    pub version: u32,
    /// Omnimix cabinets keep their scores apart from the stock version
    pub omnimix: bool,
    /// Name of the title translation table
    pub title: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            game: "iidx".to_string(),
            version: 28,
            omnimix: false,
            title: "bistrover".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Create a new configuration builder
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    /// Load from a TOML file; missing keys take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config: Self = toml::from_str(&content)?;
        debug!(
            "Loaded config from {}: {} v{} ({})",
            path.as_ref().display(),
            config.game,
            config.version,
            config.title
        );
        Ok(config)
    }

    /// Version under which score data is keyed
    pub fn music_version(&self) -> u32 {
        if self.omnimix {
            OMNIMIX_VERSION_BUMP + self.version
        } else {
            self.version
        }
    }

    /// Scope for best scores and attempt history
    pub fn score_scope(&self) -> Scope {
        Scope::new(&self.game, self.music_version())
    }

    /// Scope for profiles, achievements and external ids
    pub fn profile_scope(&self) -> Scope {
        Scope::new(&self.game, self.version)
    }

    /// Resolve and validate the configured title table
    pub fn title_table(&self) -> Result<&'static TitleTable> {
        let table = title::by_name(&self.title)?;
        table.validate()?;
        Ok(table)
    }
}

/// Builder for ServiceConfig
#[derive(Debug, Clone, Default)]
pub struct ServiceConfigBuilder {
    game: Option<String>,
    version: Option<u32>,
    omnimix: Option<bool>,
    title: Option<String>,
}

impl ServiceConfigBuilder {
    pub fn game<S: Into<String>>(mut self, game: S) -> Self {
        self.game = Some(game.into());
        self
    }

    pub fn version(mut self, version: u32) -> Self {
        self.version = Some(version);
        self
    }

    pub fn omnimix(mut self, enabled: bool) -> Self {
        self.omnimix = Some(enabled);
        self
    }

    pub fn title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn build(self) -> ServiceConfig {
        let default = ServiceConfig::default();
        ServiceConfig {
            game: self.game.unwrap_or(default.game),
            version: self.version.unwrap_or(default.version),
            omnimix: self.omnimix.unwrap_or(default.omnimix),
            title: self.title.unwrap_or(default.title),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builder_defaults() {
        let config = ServiceConfig::builder().version(27).build();
        assert_eq!(config.game, "iidx");
        assert_eq!(config.version, 27);
        assert!(!config.omnimix);
        assert_eq!(config.title, "bistrover");
    }

    #[test]
    fn test_omnimix_scopes() {
        let config = ServiceConfig::builder().omnimix(true).build();
        assert_eq!(config.score_scope(), Scope::new("iidx", 10028));
        assert_eq!(config.profile_scope(), Scope::new("iidx", 28));

        let config = ServiceConfig::default();
        assert_eq!(config.score_scope(), config.profile_scope());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version = 29\nomnimix = true").unwrap();

        let config = ServiceConfig::load(file.path()).unwrap();
        assert_eq!(config.version, 29);
        assert!(config.omnimix);
        assert_eq!(config.game, "iidx");
        assert_eq!(config.music_version(), 10029);
    }

    #[test]
    fn test_load_invalid_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "version = \"twenty\"").unwrap();
        assert!(matches!(
            ServiceConfig::load(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_title_table() {
        assert_eq!(ServiceConfig::default().title_table().unwrap().ghost_length, 64);
        let config = ServiceConfig::builder().title("unknown").build();
        assert!(matches!(config.title_table(), Err(Error::UnknownTitle(_))));
    }
}
