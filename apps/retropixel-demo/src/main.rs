#![forbid(unsafe_op_in_unsafe_fn)]

mod face;
mod options;

use retropixel_core::{Engine, EngineConfig, HeadlessPlatform, Platform};
use retropixel_modules_logging::init_console_logger;
use retropixel_platform_winit::{WinitPlatform, WinitPlatformConfig};

use face::SimpleExample;
use options::{load_config, Options, CONFIG_ENV};

fn run_game<P: Platform>(config: EngineConfig, platform: &mut P) -> anyhow::Result<i32> {
    let mut engine = Engine::new(config, platform, SimpleExample)?;
    Ok(engine.run()?)
}

fn main() -> anyhow::Result<()> {
    init_console_logger()?;

    let opts = Options::parse(std::env::args().skip(1))?;
    let config = load_config(opts.config_path(std::env::var(CONFIG_ENV).ok()))?;

    let status = match opts.headless {
        Some(duration) => {
            let mut platform = HeadlessPlatform::new();
            platform.quit_after(duration);
            run_game(config, &mut platform)?
        }
        None => {
            let mut platform = WinitPlatform::with_config(WinitPlatformConfig {
                resizable: opts.resizable,
                ..WinitPlatformConfig::default()
            })?;
            run_game(config, &mut platform)?
        }
    };

    log::warn!("RetroPixelEngine exited with: {status}");
    std::process::exit(status);
}
