use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use skyfetch_core::pipeline::config::{PipelineConfig, RenderConfig, RenderMode};
use skyfetch_core::render::{PngRenderer, Renderer, Stretch};
use skyfetch_gui::WindowRenderer;

/// Catalog selection flags shared by every archive command.
///
/// Values given on the command line override the config file, which in
/// turn overrides the built-in defaults.
#[derive(Args)]
pub struct ArchiveArgs {
    /// Pipeline config file (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Target name to search for (case-insensitive substring)
    #[arg(long)]
    pub target: Option<String>,

    /// Collection a record must belong to
    #[arg(long)]
    pub collection: Option<String>,

    /// Keep records released strictly after this ISO-8601 timestamp
    #[arg(long)]
    pub release_after: Option<String>,

    /// Also include previews and other auxiliary products
    #[arg(long)]
    pub include_auxiliaries: bool,

    /// Per-request timeout in seconds (default: wait indefinitely)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Process at most this many files
    #[arg(long)]
    pub limit: Option<usize>,
}

impl ArchiveArgs {
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let mut config = match self.config {
            Some(ref path) => PipelineConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        if let Some(ref target) = self.target {
            config.query.target = target.clone();
        }
        if let Some(ref collection) = self.collection {
            config.query.collection = collection.clone();
        }
        if let Some(ref release_after) = self.release_after {
            config.query.release_after = release_after.clone();
        }
        if self.include_auxiliaries {
            config.query.include_auxiliaries = true;
        }
        if self.timeout.is_some() {
            config.fetch.timeout_secs = self.timeout;
        }
        if self.limit.is_some() {
            config.limit = self.limit;
        }
        Ok(config)
    }
}

/// Rendering flags shared by `run` and `show`.
#[derive(Args)]
pub struct RenderArgs {
    /// Write PNG files instead of opening a viewer window per image
    #[arg(long)]
    pub headless: bool,

    /// Directory for PNG output (implies --headless)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Stretch between the 0.5% and 99.5% percentiles instead of min/max
    #[arg(long)]
    pub percentile: bool,
}

impl RenderArgs {
    pub fn apply(&self, render: &mut RenderConfig) {
        if self.headless || self.output_dir.is_some() {
            render.mode = RenderMode::Png;
        }
        if let Some(ref dir) = self.output_dir {
            render.output_dir = dir.clone();
        }
        if self.percentile {
            render.stretch = Stretch::percentile_default();
        }
    }
}

pub fn make_renderer(render: &RenderConfig) -> Box<dyn Renderer> {
    match render.mode {
        RenderMode::Window => Box::new(WindowRenderer::new(render.stretch.clone())),
        RenderMode::Png => Box::new(PngRenderer::new(
            render.output_dir.clone(),
            render.stretch.clone(),
        )),
    }
}
