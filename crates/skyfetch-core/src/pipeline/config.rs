use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{
    CADC_DATALINK_URL, CADC_TAP_URL, DEFAULT_COLLECTION, DEFAULT_RELEASE_AFTER, DEFAULT_TARGET,
    DEFAULT_USER_AGENT,
};
use crate::error::{Result, SkyfetchError};
use crate::render::Stretch;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default)]
    pub query: QueryConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub render: RenderConfig,
    /// Abort on the first decode or render error instead of skipping the file.
    /// Download failures are always skipped.
    #[serde(default)]
    pub strict: bool,
    /// Process at most this many URLs.
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PipelineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SkyfetchError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.query.target.trim().is_empty() {
            return Err(SkyfetchError::Config("query.target must not be empty".into()));
        }
        if let Stretch::Percentile { low, high } = self.render.stretch {
            if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) || low >= high {
                return Err(SkyfetchError::Config(format!(
                    "percentile stretch needs 0 <= low < high <= 1, got {low}..{high}"
                )));
            }
        }
        if self.render.mode == RenderMode::Png && self.render.output_dir.as_os_str().is_empty() {
            return Err(SkyfetchError::Config(
                "render.output_dir is required in Png mode".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Target name searched in the catalog (case-insensitive substring).
    pub target: String,
    /// Exact collection a record must belong to.
    pub collection: String,
    /// Records must be released strictly after this ISO-8601 timestamp.
    pub release_after: String,
    pub tap_url: String,
    pub datalink_url: String,
    /// Also download previews and other auxiliary products.
    pub include_auxiliaries: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            target: DEFAULT_TARGET.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
            release_after: DEFAULT_RELEASE_AFTER.to_string(),
            tap_url: CADC_TAP_URL.to_string(),
            datalink_url: CADC_DATALINK_URL.to_string(),
            include_auxiliaries: false,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    /// One blocking viewer window per image.
    #[default]
    Window,
    /// Write PNG files and continue without blocking.
    Png,
}

impl std::fmt::Display for RenderMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Window => write!(f, "Window"),
            Self::Png => write!(f, "PNG"),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mode: RenderMode,
    /// Destination of PNG output.
    pub output_dir: PathBuf,
    pub stretch: Stretch,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mode: RenderMode::Window,
            output_dir: PathBuf::from("renders"),
            stretch: Stretch::MinMax,
        }
    }
}
