//! Notification listener state machine
//!
//! Connects to the push endpoint, blocks on inbound messages, and plays
//! the alert when a ping addressed to this device arrives. Any error or
//! closure leads back to a reconnect attempt after the minimum delay,
//! indefinitely, until shutdown is requested.

use crate::{PushChannel, PushConnector};
use geobeacon_alert::AlertPlayer;
use geobeacon_common::{ping_message, DeviceSerial};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Connection states of the push listener
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// A connection attempt is in progress
    Connecting,
    /// A channel is live and the listener is blocked on receive
    Connected,
    /// The last channel ended with a transport error
    Errored,
    /// The last channel was closed by the peer
    Closed,
    /// Shutdown observed; the listener has exited
    Stopped,
}

/// Why a connected channel ended
enum ChannelEnd {
    Closed,
    Errored,
    Shutdown,
}

/// Drives the persistent push channel
///
/// Reconnection is unconditional and indefinite while shutdown is not
/// requested, with a fixed minimum delay between attempts: no backoff
/// growth and no attempt cap. That is a deliberate policy for a
/// low-frequency beacon, not a default inherited from a library.
pub struct PushListener<C, P> {
    connector: C,
    player: P,
    expected_ping: String,
    reconnect_delay: Duration,
    state_tx: watch::Sender<ChannelState>,
}

impl<C: PushConnector, P: AlertPlayer> PushListener<C, P> {
    pub fn new(connector: C, player: P, serial: &DeviceSerial, reconnect_delay: Duration) -> Self {
        let (state_tx, _) = watch::channel(ChannelState::Connecting);
        Self {
            connector,
            player,
            expected_ping: ping_message(serial),
            reconnect_delay,
            state_tx,
        }
    }

    /// Observe the listener's connection state
    pub fn state(&self) -> watch::Receiver<ChannelState> {
        self.state_tx.subscribe()
    }

    fn set_state(&self, state: ChannelState) {
        debug!(?state, "push listener state");
        self.state_tx.send_replace(state);
    }

    /// Connect, receive, and reconnect until `cancel` is set
    ///
    /// Both the connect attempt and the reconnect delay select against the
    /// cancellation token, so shutdown is observed immediately rather than
    /// after the current wait.
    pub async fn run(&self, cancel: CancellationToken) {
        info!(
            reconnect_delay_secs = self.reconnect_delay.as_secs(),
            "push listener started"
        );

        loop {
            if cancel.is_cancelled() {
                break;
            }

            self.set_state(ChannelState::Connecting);
            let connected = tokio::select! {
                _ = cancel.cancelled() => break,
                result = self.connector.connect() => result,
            };

            match connected {
                Ok(mut channel) => {
                    self.set_state(ChannelState::Connected);
                    info!("push channel connected");
                    match self.pump(&mut channel, &cancel).await {
                        ChannelEnd::Shutdown => {
                            channel.close().await;
                            break;
                        }
                        ChannelEnd::Closed => {
                            info!("push channel closed by peer, reconnecting");
                            self.set_state(ChannelState::Closed);
                        }
                        ChannelEnd::Errored => self.set_state(ChannelState::Errored),
                    }
                }
                Err(e) => {
                    warn!("push channel connect failed: {}", e);
                    self.set_state(ChannelState::Errored);
                }
            }

            // Minimum delay between attempts, so an unreachable backend is
            // not hammered in a tight loop
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.reconnect_delay) => {}
            }
        }

        self.set_state(ChannelState::Stopped);
        info!("push listener stopped");
    }

    /// Receive loop for one connected channel
    ///
    /// A matching ping plays the alert inline: no further messages are
    /// processed until playback finishes, so alerts never overlap. If the
    /// listener is ever made to process messages concurrently, the alert
    /// path needs an explicit lock to preserve that.
    async fn pump<Ch: PushChannel>(
        &self,
        channel: &mut Ch,
        cancel: &CancellationToken,
    ) -> ChannelEnd {
        loop {
            let message = tokio::select! {
                _ = cancel.cancelled() => return ChannelEnd::Shutdown,
                message = channel.recv() => message,
            };

            match message {
                Ok(Some(text)) if text == self.expected_ping => {
                    info!("ping received, playing alert");
                    if let Err(e) = self.player.alert().await {
                        warn!("alert playback failed: {}", e);
                    }
                }
                Ok(Some(text)) => debug!(message = %text, "ignoring unrecognized push message"),
                Ok(None) => return ChannelEnd::Closed,
                Err(e) => {
                    warn!("push channel error: {}", e);
                    return ChannelEnd::Errored;
                }
            }
        }
    }
}
