//! `ScrawlServer` builder and server loop.
//!
//! This is the entry point for running a Scrawl game server. It ties
//! together all the layers: transport → protocol → room directory.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use scrawl_game::WordBank;
use scrawl_protocol::{JsonCodec, MAX_FRAME_LEN};
use scrawl_room::{RoomConfig, RoomDirectory};
use scrawl_transport::{Transport, WebSocketTransport};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::ScrawlError;
use crate::handler::handle_connection;

/// Shared server state passed to each connection handler task.
pub(crate) struct ServerState {
    pub(crate) rooms: Mutex<RoomDirectory>,
    pub(crate) codec: JsonCodec,
}

/// Everything a server needs before it binds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub room: RoomConfig,
    /// How often idle and abandoned rooms are swept.
    pub sweep_interval: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            room: RoomConfig::default(),
            sweep_interval: Duration::from_secs(60),
        }
    }
}

/// Builder for configuring and starting a Scrawl server.
///
/// # Example
///
/// ```rust,no_run
/// use scrawl::prelude::*;
///
/// # async fn start() -> Result<(), ScrawlError> {
/// let server = ScrawlServer::builder()
///     .bind("0.0.0.0:8080")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct ScrawlServerBuilder {
    config: ServerConfig,
    words: Option<WordBank>,
}

impl ScrawlServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: ServerConfig::default(),
            words: None,
        }
    }

    /// Starts from a complete config.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.config.bind_addr = addr.to_string();
        self
    }

    pub fn room_config(mut self, config: RoomConfig) -> Self {
        self.config.room = config;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.config.sweep_interval = interval;
        self
    }

    /// Replaces the built-in dictionary.
    pub fn words(mut self, words: WordBank) -> Self {
        self.words = Some(words);
        self
    }

    /// Binds the listener. Uses `JsonCodec` over `WebSocketTransport`.
    pub async fn build(self) -> Result<ScrawlServer, ScrawlError> {
        let transport = WebSocketTransport::bind(&self.config.bind_addr)
            .await?
            .with_max_frame_len(MAX_FRAME_LEN);
        let words = Arc::new(self.words.unwrap_or_else(WordBank::builtin));

        tracing::info!(
            addr = %self.config.bind_addr,
            words = words.len(),
            "server bound"
        );
        let state = Arc::new(ServerState {
            rooms: Mutex::new(RoomDirectory::new(self.config.room, words)),
            codec: JsonCodec,
        });

        Ok(ScrawlServer {
            transport,
            state,
            sweep_interval: self.config.sweep_interval,
        })
    }
}

impl Default for ScrawlServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Scrawl game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ScrawlServer {
    transport: WebSocketTransport,
    state: Arc<ServerState>,
    sweep_interval: Duration,
}

impl ScrawlServer {
    /// Creates a new builder.
    pub fn builder() -> ScrawlServerBuilder {
        ScrawlServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop and the room sweeper.
    ///
    /// Spawns a handler task for each accepted connection. Runs until the
    /// process is terminated.
    pub async fn run(mut self) -> Result<(), ScrawlError> {
        tracing::info!("Scrawl server running");
        tokio::spawn(sweep_rooms(Arc::clone(&self.state), self.sweep_interval));

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Periodically purges expired seats and removes empty or idle rooms.
async fn sweep_rooms(state: Arc<ServerState>, period: Duration) {
    let mut interval = tokio::time::interval(period.max(Duration::from_millis(10)));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    loop {
        interval.tick().await;
        let mut rooms = state.rooms.lock().await;
        let removed = rooms.sweep().await;
        if removed > 0 {
            tracing::info!(removed, remaining = rooms.room_count(), "rooms swept");
        }
    }
}
