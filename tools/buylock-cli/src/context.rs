//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use buylock_commerce::provider::{ExchangeRateProvider, HttpRateSource, RateLoad};
use buylock_commerce::Storefront;
use buylock_store::{FileBackend, Store};

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["buylock.toml", ".buylock.toml", "buylock.json"];

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(
        config_path: Option<&Path>,
        data_dir: Option<PathBuf>,
        output: Output,
    ) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = match config_path {
            Some(path) => (CliConfig::load(path)?, Some(path.to_path_buf())),
            None => match Self::find_config(&cwd) {
                Some(path) => (CliConfig::load(&path)?, Some(path)),
                None => (CliConfig::default(), None),
            },
        };

        let mut config = config.with_env_overrides();
        if let Some(dir) = data_dir {
            config.storage.data_dir = dir;
        }

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<PathBuf> {
        start.ancestors().find_map(|dir| {
            CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|path| path.is_file())
        })
    }

    /// Resolved storage directory.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storage.data_dir)
    }

    /// Open the durable store.
    pub fn store(&self) -> Result<Store> {
        let dir = self.data_dir();
        let backend = FileBackend::open(&dir)
            .with_context(|| format!("Failed to open data directory: {}", dir.display()))?;
        Ok(Store::new(backend))
    }

    /// Build the exchange-rate provider from config.
    pub fn rate_provider(&self, store: &Store) -> Result<ExchangeRateProvider> {
        let source = HttpRateSource::new(&self.config.rates.endpoint, self.config.rates.timeout())
            .context("Failed to create exchange rate client")?;
        Ok(ExchangeRateProvider::new(store.clone(), Arc::new(source))
            .with_ttl(self.config.rates.ttl()))
    }

    /// Start a storefront session, showing a spinner while rates load.
    pub async fn storefront(&self) -> Result<(Storefront, RateLoad)> {
        let store = self.store()?;
        let provider = self.rate_provider(&store)?;

        let spinner = self.output.spinner("Loading exchange rates...");
        let started = Storefront::start(store, &provider).await;
        spinner.finish_and_clear();

        Ok(started)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.cwd.join(path)
        }
    }
}
