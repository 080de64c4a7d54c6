use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;
use crate::error::PipelineError;

pub const DEFAULT_URL: &str =
    "https://en.wikipedia.org/wiki/List_of_United_States_Christmas_television_episodes";
const DEFAULT_USER_AGENT: &str = "christmas-episodes/0.1 (batch script)";
const URL_ENV: &str = "CHRISTMAS_EPISODES_URL";

const DEFAULT_SPECIALS_KEYWORDS: &[&str] = &[
    "christmas special",
    "holiday special",
    "special presentation",
    "tv special",
    "television special",
    "tv movie",
    "television film",
    "tv film",
];

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    source_url: Option<String>,
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    max_attempts: Option<u32>,
    backoff_ms: Option<u64>,
    year_min: Option<u16>,
    year_max: Option<u16>,
    specials_keywords: Option<Vec<String>>,
    out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub source_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub backoff: Duration,
    pub year_min: u16,
    pub year_max: u16,
    pub specials_keywords: Vec<String>,
    pub out_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            backoff: Duration::from_millis(2000),
            year_min: 1940,
            year_max: 2030,
            specials_keywords: DEFAULT_SPECIALS_KEYWORDS
                .iter()
                .map(|k| k.to_string())
                .collect(),
            out_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// CLI flag > environment > config file > default.
    pub fn load(cli: &Cli) -> Result<Self, PipelineError> {
        let file = match &cli.config {
            Some(path) => read_config_file(path)?,
            None => {
                let path = get_config_path();
                if path.exists() {
                    read_config_file(&path)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        let mut config = Config::default().merge(file);

        if let Ok(url) = env::var(URL_ENV) {
            if !url.trim().is_empty() {
                config.source_url = url;
            }
        }
        if let Some(url) = &cli.url {
            config.source_url = url.clone();
        }
        if let Some(out_dir) = &cli.out_dir {
            config.out_dir = out_dir.clone();
        }

        config.validate()?;
        Ok(config)
    }

    fn merge(mut self, file: ConfigFile) -> Self {
        if let Some(v) = file.source_url {
            self.source_url = v;
        }
        if let Some(v) = file.user_agent {
            self.user_agent = v;
        }
        if let Some(v) = file.timeout_secs {
            self.timeout = Duration::from_secs(v);
        }
        if let Some(v) = file.max_attempts {
            self.max_attempts = v;
        }
        if let Some(v) = file.backoff_ms {
            self.backoff = Duration::from_millis(v);
        }
        if let Some(v) = file.year_min {
            self.year_min = v;
        }
        if let Some(v) = file.year_max {
            self.year_max = v;
        }
        if let Some(v) = file.specials_keywords {
            self.specials_keywords = v;
        }
        if let Some(v) = file.out_dir {
            self.out_dir = v;
        }
        self
    }

    fn validate(&self) -> Result<(), PipelineError> {
        if self.year_min > self.year_max {
            return Err(PipelineError::Config {
                msg: format!(
                    "year_min ({}) is greater than year_max ({})",
                    self.year_min, self.year_max
                ),
            });
        }
        if self.max_attempts == 0 {
            return Err(PipelineError::Config {
                msg: "max_attempts must be at least 1".to_string(),
            });
        }
        if self.source_url.trim().is_empty() {
            return Err(PipelineError::Config {
                msg: "source_url is empty".to_string(),
            });
        }
        Ok(())
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile, PipelineError> {
    let content = fs::read_to_string(path).map_err(|e| PipelineError::Config {
        msg: format!("cannot read {}: {e}", path.display()),
    })?;
    toml::from_str(&content).map_err(|e| PipelineError::Config {
        msg: format!("cannot parse {}: {e}", path.display()),
    })
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("christmas-episodes"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
