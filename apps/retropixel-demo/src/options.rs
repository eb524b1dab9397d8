use std::{path::PathBuf, time::Duration};

use anyhow::{anyhow, bail, Context};
use retropixel_core::EngineConfig;

pub const CONFIG_ENV: &str = "RETROPIXEL_CONFIG";

/// Command line: `retropixel-demo [--headless <seconds>] [--resizable] [config.toml]`.
#[derive(Debug, Default, PartialEq)]
pub struct Options {
    pub config: Option<PathBuf>,
    pub headless: Option<Duration>,
    /// Let the window be resized; ignored when headless.
    pub resizable: bool,
}

impl Options {
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut opts = Self::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--headless" => {
                    let secs = args
                        .next()
                        .ok_or_else(|| anyhow!("--headless needs a duration in seconds"))?;
                    let secs: f64 = secs
                        .parse()
                        .with_context(|| format!("bad --headless duration '{secs}'"))?;
                    if !secs.is_finite() || secs < 0.0 {
                        bail!("--headless duration must be a non-negative number of seconds");
                    }
                    opts.headless = Some(Duration::from_secs_f64(secs));
                }
                "--resizable" => opts.resizable = true,
                flag if flag.starts_with("--") => bail!("unknown option '{flag}'"),
                path => {
                    if opts.config.is_some() {
                        bail!("more than one config path given");
                    }
                    opts.config = Some(PathBuf::from(path));
                }
            }
        }

        Ok(opts)
    }

    /// The CLI path wins over `RETROPIXEL_CONFIG`.
    pub fn config_path(&self, env: Option<String>) -> Option<PathBuf> {
        self.config
            .clone()
            .or_else(|| env.filter(|v| !v.is_empty()).map(PathBuf::from))
    }
}

pub fn default_config() -> EngineConfig {
    EngineConfig::new(64, 32, 8, "RetroPixelEngine: Simple Example")
}

pub fn load_config(path: Option<PathBuf>) -> anyhow::Result<EngineConfig> {
    match path {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            EngineConfig::load_toml(&path).with_context(|| format!("config {}", path.display()))
        }
        None => Ok(default_config()),
    }
}
