#![forbid(unsafe_op_in_unsafe_fn)]

use env_logger::Builder;
use log::LevelFilter;
use retropixel_core::{EngineError, EngineResult};

use std::{
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        OnceLock,
    },
    time::{Duration, Instant},
};

static INSTALLED: AtomicBool = AtomicBool::new(false);
static BOOT: OnceLock<Instant> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
    /// Prefix each line with the time since the logger was installed.
    pub uptime: bool,
}

impl ConsoleLoggerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let flag = |name: &str, default: bool| get(name).map(|v| v != "0").unwrap_or(default);

        let level = get("RETROPIXEL_LOG")
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);

        Self {
            level,
            colors: flag("RETROPIXEL_LOG_COLORS", true),
            include_module: flag("RETROPIXEL_LOG_MODULE", true),
            uptime: flag("RETROPIXEL_LOG_UPTIME", true),
        }
    }
}

impl Default for ConsoleLoggerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Installs the process-wide console logger once.
pub struct ConsoleLogger {
    config: ConsoleLoggerConfig,
    initialized: bool,
}

impl ConsoleLogger {
    #[inline]
    pub fn new(config: ConsoleLoggerConfig) -> Self {
        Self {
            config,
            initialized: false,
        }
    }

    /// Install the logger. A second call, from here or another `ConsoleLogger`, is a no-op.
    pub fn init(&mut self) -> EngineResult<()> {
        if self.initialized || INSTALLED.swap(true, Ordering::AcqRel) {
            self.initialized = true;
            return Ok(());
        }

        BOOT.get_or_init(Instant::now);

        let result = self.builder().try_init();
        if let Err(e) = result {
            INSTALLED.store(false, Ordering::Release);
            return Err(EngineError::Other(format!("logger init failed: {e}")));
        }

        self.initialized = true;
        Ok(())
    }

    fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        builder.filter_level(self.config.level);

        let config = self.config.clone();
        builder.format(move |buf, record| {
            let level_style = if config.colors {
                buf.default_level_style(record.level())
            } else {
                env_logger::fmt::style::Style::new()
            };

            if config.uptime {
                let boot = BOOT.get_or_init(Instant::now);
                write!(buf, "[{}] ", fmt_uptime(boot.elapsed()))?;
            }

            if config.include_module {
                writeln!(
                    buf,
                    "[{level_style}{:<5}{level_style:#}] {:<25} {}",
                    record.level(),
                    record.target(),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "[{level_style}{:<5}{level_style:#}] {}",
                    record.level(),
                    record.args()
                )
            }
        });

        builder
    }
}

/// Install the console logger configured from `RETROPIXEL_LOG*` variables.
pub fn init_console_logger() -> EngineResult<()> {
    ConsoleLogger::new(ConsoleLoggerConfig::from_env()).init()
}

/// `+mm:ss.mmm`, or `+hh:mm:ss.mmm` past the first hour.
fn fmt_uptime(d: Duration) -> String {
    let total_ms = d.as_millis() as u64;

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    if h > 0 {
        format!("+{:02}:{:02}:{:02}.{:03}", h, m, s, ms)
    } else {
        format!("+{:02}:{:02}.{:03}", m, s, ms)
    }
}
