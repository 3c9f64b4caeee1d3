use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::{config::Config, core::summary::PairingPolicy, prelude::*};

#[derive(Parser)]
pub struct ConfigArgs {
    /// TOML configuration file. The built-in defaults are used when omitted.
    #[clap(long = "config", env = "CONFIG_PATH")]
    path: Option<PathBuf>,

    /// First report date, overrides the configuration.
    #[clap(long, env = "START_DATE")]
    start_date: Option<NaiveDate>,

    /// Last report date (inclusive), overrides the configuration.
    #[clap(long, env = "END_DATE")]
    end_date: Option<NaiveDate>,

    /// Handling of the intervals present in only one of the reports.
    #[clap(long, env = "PAIRING")]
    pairing: Option<PairingPolicy>,
}

impl ConfigArgs {
    pub fn load(&self) -> Result<Config> {
        let mut config = match &self.path {
            Some(path) => Config::read(path)?,
            None => Config::default(),
        };
        if let Some(start_date) = self.start_date {
            config.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            config.end_date = end_date;
        }
        if let Some(pairing) = self.pairing {
            config.pairing = pairing;
        }
        config.validate()?;
        info!(
            start_date = %config.start_date,
            end_date = %config.end_date,
            n_resources = config.resource_catalog.len(),
            pairing = ?config.pairing,
            "loaded the configuration",
        );
        Ok(config)
    }
}

#[derive(Parser)]
pub struct OutputArgs {
    /// Directory for the CSV files.
    #[clap(long, env = "OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,
}

impl OutputArgs {
    pub fn create_dir(&self) -> Result<&std::path::Path> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("failed to create `{}`", self.output_dir.display()))?;
        Ok(&self.output_dir)
    }
}
