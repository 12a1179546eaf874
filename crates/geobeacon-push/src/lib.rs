//! Push-notification listener
//!
//! Maintains the persistent channel to the backend and reacts to ping
//! messages addressed to this device. The connection lifecycle is an
//! explicit state machine (connecting, connected, errored, closed,
//! stopped) with a fixed minimum delay between connection attempts.

pub mod listener;
pub mod transport;

pub use listener::{ChannelState, PushListener};
pub use transport::{PushChannel, PushConnector, WsChannel, WsConnector};
