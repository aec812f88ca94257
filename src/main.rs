//! Bomber Demo
//!
//! Runs two devices in one process, linked by a radio pair, and feeds
//! each a scripted round. Set `RUST_LOG=debug` to see every frame.

use std::time::Duration;

use anyhow::{Context, Result};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use bomber::{
    runtime::{AppConfig, EventSender, RadioKind, SharedState},
    AppMode, BomberApp, BomberEvent, InputEvent, InputKey, Level, LoopbackRadio, Radio, UdpRadio,
    VERSION,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Bomber Core v{}", VERSION);

    let config = AppConfig::from_env().context("reading configuration")?;
    let level = Level::level_one().context("loading built-in level")?;
    info!(
        "Tick {:?}, bomb power {}, radio {:?}",
        config.tick_interval, config.bomb_power, config.radio
    );

    match config.radio {
        RadioKind::Loopback => {
            let (a, b) = LoopbackRadio::pair();
            demo_match(&config, &level, a, b).await
        }
        RadioKind::Udp => {
            let a = UdpRadio::bind(config.udp_local, config.udp_peer).await?;
            let b = UdpRadio::bind(config.udp_peer, config.udp_local).await?;
            demo_match(&config, &level, a, b).await
        }
    }
}

/// One scripted step: wait, then push.
type Step = (Duration, BomberEvent);

fn short(key: InputKey) -> BomberEvent {
    InputEvent::short(key).into()
}

fn long(key: InputKey) -> BomberEvent {
    InputEvent::long(key).into()
}

/// Play one round on two devices and compare what they ended up with.
async fn demo_match<R: Radio + 'static>(
    config: &AppConfig,
    level: &Level,
    fox_radio: R,
    wolf_radio: R,
) -> Result<()> {
    info!("=== Starting Demo Match ===");

    let fox_config = AppConfig {
        player_two: false,
        ..config.clone()
    };
    let wolf_config = AppConfig {
        player_two: true,
        ..config.clone()
    };

    let mut fox = BomberApp::new(&fox_config, level, fox_radio);
    let mut wolf = BomberApp::new(&wolf_config, level, wolf_radio);

    let fuse = config.tick_interval * (fox.rules().timings.reset + 10);
    let beat = Duration::from_millis(150);

    // Fox: walk right, drop a bomb, step back and wait it out.
    let fox_script = vec![
        (beat, short(InputKey::Ok)),
        (beat, short(InputKey::Right)),
        (beat, short(InputKey::Ok)),
        (beat, short(InputKey::Left)),
        (beat, short(InputKey::Down)),
        (fuse, short(InputKey::Back)),
        (beat, long(InputKey::Back)),
    ];
    // Wolf: step up, drop a bomb, step aside.
    let wolf_script = vec![
        (beat, short(InputKey::Ok)),
        (beat, short(InputKey::Up)),
        (beat, short(InputKey::Ok)),
        (beat, short(InputKey::Left)),
        (fuse + beat * 2, long(InputKey::Back)),
    ];

    let fox_frames = spawn_frame_logger("fox", &fox);
    let wolf_frames = spawn_frame_logger("wolf", &wolf);
    let fox_input = spawn_script(fox.sender(), fox_script);
    let wolf_input = spawn_script(wolf.sender(), wolf_script);

    fox.spawn_timer();
    wolf.spawn_timer();

    let fox_state = fox.state();
    let wolf_state = wolf.state();

    let fox_run = tokio::spawn(async move {
        let mode = fox.run().await;
        (mode, fox.sync_stats())
    });
    let wolf_run = tokio::spawn(async move {
        let mode = wolf.run().await;
        (mode, wolf.sync_stats())
    });

    let (fox_mode, fox_stats) = fox_run.await?;
    let (wolf_mode, wolf_stats) = wolf_run.await?;
    fox_input.await?;
    wolf_input.await?;
    fox_frames.abort();
    wolf_frames.abort();

    // Print final results
    info!("=== Match Results ===");
    info!("Fox ended in {} ({:?})", fox_mode, fox_stats);
    info!("Wolf ended in {} ({:?})", wolf_mode, wolf_stats);

    let fox_state = fox_state.lock().await;
    let wolf_state = wolf_state.lock().await;
    info!("Fox state hash:  {}", hex::encode(fox_state.compute_hash()));
    info!("Wolf state hash: {}", hex::encode(wolf_state.compute_hash()));

    let fox_world = fox_state.world_hash();
    let wolf_world = wolf_state.world_hash();
    info!("Fox world hash:  {}", hex::encode(fox_world));
    info!("Wolf world hash: {}", hex::encode(wolf_world));
    info!("Final board (fox view):\n{}", fox_state.ascii_frame());
    match fox_state.to_json() {
        Ok(json) => debug!("Fox snapshot: {}", json),
        Err(e) => warn!("Fox snapshot failed: {}", e),
    }

    if fox_world == wolf_world {
        info!("SYNC VERIFIED: both devices agree on terrain and positions");
    } else {
        warn!("SYNC DIVERGED: devices disagree");
        info!("Wolf view:\n{}", wolf_state.ascii_frame());
    }

    if fox_mode == AppMode::Error || wolf_mode == AppMode::Error {
        anyhow::bail!("a device ended in the error state");
    }
    Ok(())
}

/// Push each step after its delay.
fn spawn_script(sender: EventSender, script: Vec<Step>) -> JoinHandle<()> {
    tokio::spawn(async move {
        for (delay, event) in script {
            tokio::time::sleep(delay).await;
            if sender.push(event).await.is_err() {
                debug!("Device stopped before script finished");
                return;
            }
        }
    })
}

/// Log an ASCII frame whenever the device asks for a redraw.
fn spawn_frame_logger<R: Radio>(name: &'static str, app: &BomberApp<R>) -> JoinHandle<()> {
    let mut redraw = app.subscribe_redraw();
    let state: SharedState = app.state();
    tokio::spawn(async move {
        while redraw.changed().await.is_ok() {
            let frame = state.lock().await.ascii_frame();
            debug!("[{}] redraw\n{}", name, frame);
        }
    })
}
