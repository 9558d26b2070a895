//! Timekeeping for Scrawl rooms.
//!
//! Two primitives, both meant to sit inside a room actor's
//! `tokio::select!` loop next to the command receiver:
//!
//! - [`Countdown`]: the one-second heartbeat that drives `time_left`.
//!   At most one per room; starting it again replaces the schedule.
//! - [`Timers`]: keyed one-shot deadlines (next turn, settle pause,
//!   reconnect grace). Each carries a generation so the room can tell a
//!   timer armed for an earlier turn from a live one.
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         cmd = rx.recv() => { /* handle command */ }
//!         tick = countdown.wait_for_tick() => { /* time_left -= 1 */ }
//!         fired = timers.next_fired() => { /* check fired.generation */ }
//!     }
//! }
//! ```
//!
//! Both futures pend forever when there is nothing to wait for, so the
//! other `select!` branches keep running. Both are cancel-safe: no state
//! changes until the sleep completes.

mod countdown;
mod timers;

pub use countdown::{Countdown, CountdownConfig, TickInfo, TickPolicy};
pub use timers::{Fired, Timers};
