//! Completion bell synthesized with rodio.
//!
//! The tone is generated from sine waves, so no sound files are needed.

use std::time::Duration;

use rodio::source::SineWave;
use rodio::{OutputStream, Sink, Source};
use tracing::{debug, warn};

use super::error::NotificationError;

/// Frequency steps (Hz, ms) approximating an 800 Hz → 600 Hz sweep.
const BELL_SEGMENTS: [(f32, u64); 4] = [(800.0, 25), (733.0, 25), (667.0, 25), (600.0, 25)];

/// Output gain of the bell.
const BELL_VOLUME: f32 = 0.3;

/// Plays the completion tone.
pub trait BellPlayer: Send + Sync {
    /// Starts the tone without blocking the caller.
    fn play_tone(&self) -> Result<(), NotificationError>;
}

/// Bell that opens the default audio output for each ring.
///
/// Playback runs on a detached thread that owns the output stream until the
/// tone has finished.
#[derive(Debug, Default, Clone, Copy)]
pub struct RodioBell;

impl RodioBell {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Total length of the tone.
    #[must_use]
    pub fn tone_duration() -> Duration {
        BELL_SEGMENTS
            .iter()
            .map(|(_, ms)| Duration::from_millis(*ms))
            .sum()
    }

    fn play_blocking() -> Result<(), NotificationError> {
        let (_stream, handle) = OutputStream::try_default()
            .map_err(|e| NotificationError::AudioDeviceUnavailable(e.to_string()))?;
        let sink =
            Sink::try_new(&handle).map_err(|e| NotificationError::PlaybackFailed(e.to_string()))?;

        for (frequency, millis) in BELL_SEGMENTS {
            sink.append(
                SineWave::new(frequency)
                    .take_duration(Duration::from_millis(millis))
                    .amplify(BELL_VOLUME),
            );
        }

        sink.sleep_until_end();
        debug!("Bell finished");
        Ok(())
    }
}

impl BellPlayer for RodioBell {
    fn play_tone(&self) -> Result<(), NotificationError> {
        std::thread::Builder::new()
            .name("bell".to_string())
            .spawn(|| {
                if let Err(e) = Self::play_blocking() {
                    warn!("ベルを再生できませんでした: {}", e);
                }
            })
            .map(|_| ())
            .map_err(|e| NotificationError::PlaybackFailed(e.to_string()))
    }
}
