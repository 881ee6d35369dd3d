//! Hardware entry point: drives a panel on `/dev/i2c-N`.
//!
//! ```sh
//! oled_panel [config.json]
//! ```
//!
//! Without an argument the built-in defaults are used (128x64 panel at 0x3C
//! and an SHT31 at 0x44, both on bus 1). `RUST_LOG` controls verbosity.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use log::info;

use oled_panel::hal::{I2cBus, Sht31};
use oled_panel::scheduler::{event_channel, spawn_timers, Scheduler};
use oled_panel::screens::rotation;
use oled_panel::services::{spawn_server, WebServerConfig};
use oled_panel::traits::TemperatureSource;
use oled_panel::{Config, FrameMirror, Panel, ScreenManager};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("loading config {}", path.to_string_lossy()))?,
        None => Config::default(),
    };
    let (width, height) = (config.panel.width, config.panel.height);

    let sensor: Option<Box<dyn TemperatureSource>> = if config.sensor.enabled {
        let bus = I2cBus::open(config.sensor.bus, config.sensor.address)
            .context("opening sensor bus")?;
        Some(Box::new(Sht31::new(bus)))
    } else {
        info!("sensor disabled, status screen left out");
        None
    };
    let manager = ScreenManager::new(rotation(&config.screens, sensor)?)?;

    let bus = I2cBus::open(config.panel.bus, config.panel.address).context("opening panel bus")?;
    let mut panel = Panel::new(bus, width, height, config.panel.vcc);
    panel
        .initialize()
        .map_err(|e| anyhow!("panel initialization failed: {}", e))?;
    if let Some(contrast) = config.panel.contrast {
        panel
            .set_contrast(contrast)
            .map_err(|e| anyhow!("setting contrast failed: {}", e))?;
    }
    info!("panel ready, {} screens in rotation", manager.len());

    let mirror = Arc::new(FrameMirror::new(width, height));
    let runtime = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let _guard = runtime.enter();

    let (events, intake) = event_channel();
    spawn_timers(events, &config.scheduler);

    // the panel keeps running without its mirror page
    if config.web.enabled {
        spawn_server(Arc::clone(&mirror), WebServerConfig::from_config(&config.web));
    }

    // bus I/O and frame pacing block, so the loop stays off the runtime
    Scheduler::new(
        manager,
        panel,
        mirror,
        intake,
        config.scheduler.frame_interval(),
    )
    .run()
}
