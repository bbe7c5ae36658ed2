use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;

use crate::http::connection::DEFAULT_READ_BUFFER_SIZE;

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:4221";

/// Command line arguments.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "http-server")]
#[command(about = "Minimal HTTP/1.1 server with echo and file routes", long_about = None)]
pub struct Args {
    /// Directory served under /files/
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Address to listen on, overrides LISTEN and the config file
    #[arg(short, long)]
    pub listen: Option<String>,

    /// YAML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen_addr: String,
    /// Root for the file routes; without it they always answer 404.
    pub directory: Option<PathBuf>,
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.to_string(),
            directory: None,
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
        }
    }
}

impl Config {
    /// Defaults plus the `LISTEN` environment variable.
    pub fn load() -> Self {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    pub fn from_yaml(source: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(source).context("invalid YAML configuration")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml(&source)
    }

    /// Builds the effective configuration: file (or defaults), then
    /// environment, then command line.
    pub fn resolve(args: &Args) -> anyhow::Result<Self> {
        let cfg = match &args.config {
            Some(path) => Self::from_file(path)?.with_env(|key| std::env::var(key).ok()),
            None => Self::load(),
        };

        Ok(cfg.with_args(args))
    }

    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(listen_addr) = lookup("LISTEN") {
            self.listen_addr = listen_addr;
        }
        self
    }

    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(listen_addr) = &args.listen {
            self.listen_addr = listen_addr.clone();
        }
        if let Some(directory) = &args.directory {
            self.directory = Some(directory.clone());
        }
        self
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.read_buffer_size == 0 {
            anyhow::bail!("read_buffer_size must be greater than zero");
        }
        Ok(())
    }
}
