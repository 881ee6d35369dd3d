//! Runs the whole engine without hardware.
//!
//! The panel is a discarding mock bus and the status screen reads a
//! simulated sensor. Watch the result at http://localhost:8088.
//!
//! ```sh
//! RUST_LOG=debug desktop_demo [config.json]
//! ```

use std::sync::Arc;

use anyhow::{anyhow, Context};
use log::{error, info};

use oled_panel::hal::{MockBus, SimulatedSensor};
use oled_panel::scheduler::{event_channel, spawn_timers, Scheduler};
use oled_panel::screens::rotation;
use oled_panel::services::{bind_server, serve, WebServerConfig};
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

    let sensor: Box<dyn TemperatureSource> = Box::new(SimulatedSensor::default());
    let manager = ScreenManager::new(rotation(&config.screens, Some(sensor))?)?;

    let mut panel = Panel::new(MockBus::new().discarding(), width, height, config.panel.vcc);
    panel
        .initialize()
        .map_err(|e| anyhow!("panel initialization failed: {}", e))?;

    let mirror = Arc::new(FrameMirror::new(width, height));
    let web_config = WebServerConfig::from_config(&config.web);
    let runtime = tokio::runtime::Runtime::new().context("creating tokio runtime")?;

    // the page is the only output, so a port that cannot be bound is fatal
    let listener = runtime
        .block_on(bind_server(&web_config))
        .with_context(|| format!("binding web server on {}", web_config.addr))?;
    info!("monitoring page at http://localhost:{}", config.web.port);

    let _guard = runtime.enter();
    let (events, intake) = event_channel();
    spawn_timers(events, &config.scheduler);

    let server_mirror = Arc::clone(&mirror);
    runtime.spawn(async move {
        if let Err(e) = serve(listener, server_mirror, &web_config).await {
            error!("web server stopped: {}", e);
        }
    });

    Scheduler::new(
        manager,
        panel,
        mirror,
        intake,
        config.scheduler.frame_interval(),
    )
    .run()
}
