use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tinyword_core::StyleTable;

const MAX_TAB_WIDTH: usize = 16;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("couldn't read config file {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("invalid config file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("tab width must be between 1 and 16, got {0}")]
    TabWidth(usize),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Settings read from `config.json`. Every field may be left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub line_numbers: bool,
    pub tab_width: usize,
    pub log_level: log::LevelFilter,

    /// Overrides for the style table. Read once at startup.
    pub styles: StyleTable,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            line_numbers: true,
            tab_width: 4,
            log_level: log::LevelFilter::Info,
            styles: StyleTable::default(),
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the default location if no path
    /// is given.
    ///
    /// A missing file at the default location just means the defaults are
    /// used; an explicitly given path has to exist.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_owned(), true),
            None => match default_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };

        let source = match std::fs::read_to_string(&path) {
            Ok(source) => source,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                return Ok(Self::default())
            }
            Err(source) => return Err(ConfigError::Io { path, source }),
        };

        match serde_json::from_str::<Self>(&source) {
            Ok(config) => config.validated(),
            Err(source) => Err(ConfigError::Json { path, source }),
        }
    }

    fn validated(self) -> ConfigResult<Self> {
        if !(1..=MAX_TAB_WIDTH).contains(&self.tab_width) {
            return Err(ConfigError::TabWidth(self.tab_width));
        }

        Ok(self)
    }
}

pub fn default_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "tinyword").map(|dirs| dirs.config_dir().join("config.json"))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use tinyword_core::{Color, Font, StyleEntry, StyleTag};

    use super::{Config, ConfigError};

    fn parse(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn empty_object_is_default() {
        assert_eq!(parse("{}"), Config::default());
    }

    #[test]
    fn fields_override_defaults() {
        let config = parse(
            r#"{
                "line_numbers": false,
                "log_level": "DEBUG",
                "styles": { "code": { "color": "green", "font": "monospace", "size": 14 } }
            }"#,
        );

        assert!(!config.line_numbers);
        assert_eq!(config.tab_width, 4);
        assert_eq!(config.log_level, log::LevelFilter::Debug);
        assert_eq!(
            config.styles.get(StyleTag::Code),
            &StyleEntry::new(Color::Green, Font::Monospace, 14)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_json::from_str::<Config>(r#"{ "wrap": false }"#).is_err());
    }

    #[test]
    fn bad_tab_width() {
        let config = parse(r#"{ "tab_width": 0 }"#);
        assert!(matches!(config.validated(), Err(ConfigError::TabWidth(0))));
    }

    #[test]
    fn explicit_path_must_exist() {
        let missing = Path::new("/definitely/not/a/tinyword/config.json");
        assert!(matches!(
            Config::load(Some(missing)),
            Err(ConfigError::Io { .. })
        ));
    }
}
