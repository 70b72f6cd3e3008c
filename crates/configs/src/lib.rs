use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use anyhow::anyhow;

pub const DEFAULT_DATA_FILE: &str = "alunos.json";
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

pub const ENV_CONFIG_PATH: &str = "CONFIG_PATH";
pub const ENV_DATA_FILE: &str = "ROSTER_DATA_FILE";
pub const ENV_LOG_FORMAT: &str = "ROSTER_LOG_FORMAT";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct StoreConfig {
    #[serde(default = "default_data_file")]
    pub data_file: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { data_file: default_data_file() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(anyhow!("logging.format must be \"compact\" or \"json\", got {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct UiConfig {
    #[serde(default = "default_clear_screen")]
    pub clear_screen: bool,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { clear_screen: default_clear_screen() }
    }
}

fn default_data_file() -> String { DEFAULT_DATA_FILE.to_string() }
fn default_clear_screen() -> bool { true }

impl AppConfig {
    /// Load from `$CONFIG_PATH` (default `config.toml`) and the process environment.
    ///
    /// Never fails. Each problem comes back in the list and only the setting it
    /// touched keeps its default.
    pub fn load() -> (Self, Vec<anyhow::Error>) {
        let path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_with(&path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an explicit file path and variable lookup.
    pub fn load_with<F>(path: &str, lookup: F) -> (Self, Vec<anyhow::Error>)
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut problems = Vec::new();
        let mut cfg = match std::fs::read_to_string(path) {
            Ok(content) => Self::from_sections(&content, &mut problems),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                problems.push(anyhow!("cannot read {path}: {e}"));
                Self::default()
            }
        };
        cfg.apply_env_overrides(&lookup, &mut problems);
        cfg.store.normalize();
        (cfg, problems)
    }

    /// Deserialize each top-level section on its own so one bad value
    /// does not discard the others.
    pub fn from_sections(content: &str, problems: &mut Vec<anyhow::Error>) -> Self {
        let table: toml::Table = match content.parse() {
            Ok(t) => t,
            Err(e) => {
                problems.push(anyhow!("invalid config syntax: {e}"));
                return Self::default();
            }
        };
        Self {
            store: section(&table, "store", problems),
            logging: section(&table, "logging", problems),
            ui: section(&table, "ui", problems),
        }
    }

    /// `ROSTER_DATA_FILE` and `ROSTER_LOG_FORMAT` take precedence over the file.
    /// A rejected value is reported and leaves only its own setting untouched.
    pub fn apply_env_overrides<F>(&mut self, lookup: &F, problems: &mut Vec<anyhow::Error>)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_DATA_FILE) {
            self.store.data_file = path;
        }
        if let Some(format) = lookup(ENV_LOG_FORMAT) {
            match format.parse() {
                Ok(f) => self.logging.format = f,
                Err(e) => problems.push(e.context(format!("{ENV_LOG_FORMAT} ignored"))),
            }
        }
    }
}

fn section<T>(table: &toml::Table, key: &str, problems: &mut Vec<anyhow::Error>) -> T
where
    T: DeserializeOwned + Default,
{
    match table.get(key) {
        None => T::default(),
        Some(value) => T::deserialize(value.clone()).unwrap_or_else(|e| {
            problems.push(anyhow!("[{key}] ignored: {e}"));
            T::default()
        }),
    }
}

impl StoreConfig {
    fn normalize(&mut self) {
        let trimmed = self.data_file.trim();
        if trimmed.is_empty() {
            self.data_file = default_data_file();
        } else if trimmed.len() != self.data_file.len() {
            self.data_file = trimmed.to_string();
        }
    }
}
