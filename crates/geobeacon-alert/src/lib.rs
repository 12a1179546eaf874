//! Audible alert playback
//!
//! Plays a fixed audio clip for a fixed duration when a ping addressed to
//! this device arrives over the push channel.

use async_trait::async_trait;
use geobeacon_common::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Plays the audible alert for the fixed configured duration
///
/// Callers await `alert` inline: the push listener that triggers alerts
/// processes no further messages until the call returns, so triggers are
/// serialized and alerts never overlap. Implementations must leave the
/// audio device stopped when they return, even if playback errored.
#[async_trait]
pub trait AlertPlayer: Send + Sync {
    async fn alert(&self) -> Result<()>;
}

/// Plays an audio clip through the default output device
pub struct ClipPlayer {
    clip_path: PathBuf,
    duration: Duration,
}

impl ClipPlayer {
    pub fn new(clip_path: PathBuf, duration: Duration) -> Self {
        Self {
            clip_path,
            duration,
        }
    }
}

#[async_trait]
impl AlertPlayer for ClipPlayer {
    async fn alert(&self) -> Result<()> {
        let path = self.clip_path.clone();
        let duration = self.duration;
        debug!(
            clip = %path.display(),
            duration_secs = duration.as_secs(),
            "starting alert playback"
        );

        // rodio playback is blocking; keep it off the async runtime
        tokio::task::spawn_blocking(move || play_clip(&path, duration))
            .await
            .map_err(|e| Error::Audio(format!("playback task panicked: {}", e)))?
    }
}

/// Scoped playback: acquire the output device, play the clip for
/// `duration`, then stop the sink unconditionally
///
/// The output stream lives only for the duration of this call, so the
/// device cannot be left in a playing state.
fn play_clip(path: &Path, duration: Duration) -> Result<()> {
    let (_stream, handle) = rodio::OutputStream::try_default()
        .map_err(|e| Error::Audio(format!("no audio output device: {}", e)))?;
    let sink = rodio::Sink::try_new(&handle).map_err(|e| Error::Audio(e.to_string()))?;

    let file = BufReader::new(File::open(path)?);
    let source = rodio::Decoder::new(file)
        .map_err(|e| Error::Audio(format!("failed to decode clip: {}", e)))?;

    sink.append(source);
    sink.play();
    std::thread::sleep(duration);

    // The clip may outlast the alert window; stop regardless
    sink.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_clip_is_an_error_not_a_panic() {
        let player = ClipPlayer::new(
            PathBuf::from("/nonexistent/clip.mp3"),
            Duration::from_millis(1),
        );
        // Fails on the device or on the file, depending on host; either way
        // it must surface as an Err
        assert!(player.alert().await.is_err());
    }
}
