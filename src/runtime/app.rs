//! Bomber Application
//!
//! Configuration and the foreground event loop. One loop per device: poll
//! the peer radio, wait (bounded) for the next queued event, dispatch it
//! under the state lock, then hand outbound actions to the radio with the
//! lock released.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tracing::{debug, error, info, trace};

use crate::core::level::Level;
use crate::game::bomb::{BlastPolicy, BombTimings, DEFAULT_TICK_INTERVAL};
use crate::game::dispatch::{handle_event, GameRules};
use crate::game::input::BomberEvent;
use crate::game::mode::AppMode;
use crate::game::state::GameState;
use crate::network::radio::Radio;
use crate::network::sync::{PeerSync, SyncStats};
use crate::runtime::queue::{event_queue, EventQueue, EventSender, QueueError};
use crate::runtime::redraw::RedrawSignal;
use crate::runtime::timer::TickTimer;

/// Game state shared by the loop and anything observing it.
pub type SharedState = Arc<Mutex<GameState>>;

// =============================================================================
// CONFIG
// =============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable could not be parsed.
    #[error("invalid {var}={value:?}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// What was wrong
        reason: String,
    },
}

/// Which radio the demo uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RadioKind {
    /// In-process channel pair
    #[default]
    Loopback,
    /// UDP datagrams on localhost
    Udp,
}

impl FromStr for RadioKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "loopback" => Ok(RadioKind::Loopback),
            "udp" => Ok(RadioKind::Udp),
            other => Err(format!("unknown radio {other:?}, expected loopback or udp")),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tick timer period.
    pub tick_interval: Duration,
    /// Longest the loop waits for an event before polling the radio again.
    pub loop_timeout: Duration,
    /// Blast radius for both players.
    pub bomb_power: u8,
    /// Walls stop blasts instead of being cleared.
    pub walls_stop_blast: bool,
    /// Local device starts as the wolf.
    pub player_two: bool,
    /// Demo transport.
    pub radio: RadioKind,
    /// UDP address of the first device.
    pub udp_local: SocketAddr,
    /// UDP address of the second device.
    pub udp_peer: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            loop_timeout: Duration::from_millis(100),
            bomb_power: 1,
            walls_stop_blast: false,
            player_two: false,
            radio: RadioKind::Loopback,
            udp_local: SocketAddr::from(([127, 0, 0, 1], 47001)),
            udp_peer: SocketAddr::from(([127, 0, 0, 1], 47002)),
        }
    }
}

impl AppConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Create config from any variable source; unset variables keep their
    /// defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(interval) = parse_millis(&lookup, "BOMBER_TICK_MS")? {
            config.tick_interval = interval;
        }
        if let Some(timeout) = parse_millis(&lookup, "BOMBER_LOOP_TIMEOUT_MS")? {
            config.loop_timeout = timeout;
        }
        if let Some(power) = parse_var(&lookup, "BOMBER_BOMB_POWER")? {
            config.bomb_power = power;
        }
        if let Some(flag) = parse_flag(&lookup, "BOMBER_WALLS_STOP_BLAST")? {
            config.walls_stop_blast = flag;
        }
        if let Some(flag) = parse_flag(&lookup, "BOMBER_PLAYER_TWO")? {
            config.player_two = flag;
        }
        if let Some(radio) = parse_var(&lookup, "BOMBER_RADIO")? {
            config.radio = radio;
        }
        if let Some(addr) = parse_var(&lookup, "BOMBER_UDP_LOCAL")? {
            config.udp_local = addr;
        }
        if let Some(addr) = parse_var(&lookup, "BOMBER_UDP_PEER")? {
            config.udp_peer = addr;
        }

        Ok(config)
    }

    /// Game rules implied by this config.
    pub fn rules(&self) -> GameRules {
        GameRules {
            timings: BombTimings::from_tick_interval(self.tick_interval),
            blast: if self.walls_stop_blast {
                BlastPolicy::StopAtWalls
            } else {
                BlastPolicy::PierceWalls
            },
            bomb_power: self.bomb_power,
        }
    }
}

fn invalid(var: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: ToString,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| invalid(var, &raw, e)),
    }
}

/// A non-zero millisecond count.
fn parse_millis<F>(lookup: &F, var: &'static str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match parse_var::<u64, _>(lookup, var)? {
        None => Ok(None),
        Some(0) => {
            let raw = lookup(var).unwrap_or_default();
            Err(invalid(var, &raw, "must be at least 1"))
        }
        Some(ms) => Ok(Some(Duration::from_millis(ms))),
    }
}

fn parse_flag<F>(lookup: &F, var: &'static str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(Some(true)),
            "0" | "false" | "no" => Ok(Some(false)),
            _ => Err(invalid(var, &raw, "expected true or false")),
        },
    }
}

// =============================================================================
// APP
// =============================================================================

/// One device: state, queue, tick timer, radio and redraw signal.
pub struct BomberApp<R: Radio> {
    state: SharedState,
    queue: EventQueue,
    sender: EventSender,
    rules: GameRules,
    sync: PeerSync<R>,
    redraw: RedrawSignal,
    timer: Option<TickTimer>,
    tick_interval: Duration,
    loop_timeout: Duration,
    running: bool,
}

impl<R: Radio> BomberApp<R> {
    /// Set up a device. Mode is `Ready` on return.
    pub fn new(config: &AppConfig, level: &Level, radio: R) -> Self {
        let rules = config.rules();
        let mut state = GameState::new(level, rules.bomb_power);
        state.is_player_two = config.player_two;
        state.set_mode(AppMode::Ready);
        state.take_events();

        let (sender, queue) = event_queue();

        Self {
            state: Arc::new(Mutex::new(state)),
            queue,
            sender,
            rules,
            sync: PeerSync::new(radio),
            redraw: RedrawSignal::new(),
            timer: None,
            tick_interval: config.tick_interval,
            loop_timeout: config.loop_timeout,
            running: false,
        }
    }

    /// Start the tick timer.
    pub fn spawn_timer(&mut self) {
        self.timer = Some(TickTimer::spawn(self.sender.clone(), self.tick_interval));
    }

    /// Handle for pushing input events.
    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Shared game state.
    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// Redraw signal.
    pub fn redraw(&self) -> RedrawSignal {
        self.redraw.clone()
    }

    /// Listen for redraw requests.
    pub fn subscribe_redraw(&self) -> watch::Receiver<u64> {
        self.redraw.subscribe()
    }

    /// Game rules in effect.
    pub fn rules(&self) -> &GameRules {
        &self.rules
    }

    /// Peer sync counters.
    pub fn sync_stats(&self) -> SyncStats {
        self.sync.stats()
    }

    /// Is the main loop running?
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop accepting events. The loop treats the closed queue as fatal
    /// once the remaining events are drained.
    pub fn close_queue(&mut self) {
        self.queue.close();
    }

    /// Run until Quit or Error. Returns the terminal mode.
    pub async fn run(&mut self) -> AppMode {
        {
            let mut state = self.state.lock().await;
            if state.mode == AppMode::Ready {
                state.set_mode(AppMode::Menu);
            }
            state.take_events();
        }
        self.redraw.request();
        self.running = true;
        info!("Main loop started");

        let mut mode = AppMode::Menu;
        while self.running {
            let synced = {
                let mut state = self.state.lock().await;
                self.sync.poll(&mut state)
            };
            if synced {
                self.redraw.request();
            }

            let next = self.queue.next(self.loop_timeout).await;
            if self.on_dequeue(next).await {
                self.redraw.request();
            }

            mode = self.state.lock().await.mode;
            if mode.is_terminal() {
                self.running = false;
            }
        }

        if let Some(timer) = self.timer.take() {
            timer.stop();
        }
        let stats = self.sync.stats();
        info!(
            "Main loop exited in {} (sent {}, applied {}, dropped {})",
            mode, stats.sent, stats.applied, stats.dropped
        );
        mode
    }

    /// Handle one dequeue result. Returns true if a redraw is needed.
    async fn on_dequeue(&mut self, next: Result<BomberEvent, QueueError>) -> bool {
        match next {
            Ok(event) => {
                let (changed, events) = {
                    let mut state = self.state.lock().await;
                    let changed = handle_event(&mut state, event, &self.rules);
                    (changed, state.take_events())
                };
                if !events.is_empty() {
                    debug!("{} game events after {:?}", events.len(), event);
                    self.sync.broadcast(&events);
                }
                changed
            }
            Err(QueueError::Timeout) => {
                trace!("No event within {:?}", self.loop_timeout);
                false
            }
            Err(e) => {
                error!("Event queue failure: {}", e);
                self.state.lock().await.set_mode(AppMode::Error);
                false
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
