//! Rooms for Scrawl.
//!
//! Each room runs as an isolated Tokio task (actor model) owning its
//! players, turn state, chat and drawing history, countdown and timers.
//!
//! # Key types
//!
//! - [`RoomDirectory`]: creates and destroys rooms, maps connections to seats
//! - [`RoomHandle`]: send commands to a running room actor
//! - [`RoomAction`]: what a seated player can do
//! - [`RoomConfig`]: server-wide limits, delays and defaults

mod canvas;
mod config;
mod directory;
mod error;
mod guessing;
mod lifecycle;
mod room;
mod scheduler;
mod state;

pub use config::RoomConfig;
pub use directory::{Membership, RoomDirectory};
pub use error::{ErrorKind, RoomError};
pub use room::{LeaveOutcome, Rejoin, RoomAction, RoomHandle, RoomInfo, SweepReport};
pub use state::EventSender;
