//! Notification tones.
//!
//! Three short synthesized sounds accompany conversation activity: a high
//! blip when the user sends, a lower one when a bot message arrives while the
//! panel is open, and a two-note chime when one arrives while it is closed.
//! Tones are described by [`ToneSpec`] and played through a
//! [`ToneEmitter`]; [`SoundPlayer`] gates playback on the user preference and
//! swallows device errors.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::WidgetResult;
use crate::traits::ToneEmitter;

/// Errors raised by a tone emitter
#[derive(Debug, Error)]
pub enum SoundError {
    /// No output device could be opened.
    #[error("failed to open audio output: {0}")]
    DeviceUnavailable(String),

    /// The device accepted the stream but playback failed.
    #[error("audio playback failed: {0}")]
    Playback(String),
}

/// The sounds the widget knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundKind {
    Send,
    Receive,
    Notification,
}

impl SoundKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundKind::Send => "send",
            SoundKind::Receive => "receive",
            SoundKind::Notification => "notification",
        }
    }

    /// Tone sequence for this sound
    pub fn tone(&self) -> ToneSpec {
        match self {
            SoundKind::Send => ToneSpec::single(800.0, Duration::from_millis(100)),
            SoundKind::Receive => ToneSpec::single(600.0, Duration::from_millis(150)),
            SoundKind::Notification => ToneSpec {
                frequencies_hz: vec![600.0, 800.0],
                duration: Duration::from_millis(100),
                stagger: Duration::from_millis(100),
                gain: DEFAULT_GAIN,
            },
        }
    }
}

impl std::str::FromStr for SoundKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "send" => Ok(SoundKind::Send),
            "receive" => Ok(SoundKind::Receive),
            "notification" => Ok(SoundKind::Notification),
            other => Err(format!(
                "unknown sound '{other}' (expected send, receive or notification)"
            )),
        }
    }
}

/// Default amplitude; sine tones at full scale are unpleasant
const DEFAULT_GAIN: f32 = 0.1;

/// A sequence of sine tones of equal length, each starting `stagger` after
/// the previous one
#[derive(Debug, Clone, PartialEq)]
pub struct ToneSpec {
    pub frequencies_hz: Vec<f32>,
    pub duration: Duration,
    pub stagger: Duration,
    pub gain: f32,
}

impl ToneSpec {
    pub fn single(frequency_hz: f32, duration: Duration) -> Self {
        Self {
            frequencies_hz: vec![frequency_hz],
            duration,
            stagger: Duration::ZERO,
            gain: DEFAULT_GAIN,
        }
    }

    /// Offset of each note from the start of the sequence
    pub fn schedule(&self) -> impl Iterator<Item = (Duration, f32)> + '_ {
        self.frequencies_hz
            .iter()
            .enumerate()
            .map(|(i, &freq)| (self.stagger * i as u32, freq))
    }

    /// Time from the first note starting to the last note ending
    pub fn total_duration(&self) -> Duration {
        match self.frequencies_hz.len() {
            0 => Duration::ZERO,
            n => self.stagger * (n as u32 - 1) + self.duration,
        }
    }
}

/// Emitter that plays nothing (headless hosts, tests, audio disabled)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentToneEmitter;

impl ToneEmitter for SilentToneEmitter {
    fn emit(&mut self, _tone: &ToneSpec) -> Result<(), SoundError> {
        Ok(())
    }
}

#[cfg(feature = "audio")]
pub use rodio_emitter::RodioToneEmitter;

#[cfg(feature = "audio")]
mod rodio_emitter {
    use rodio::{OutputStream, OutputStreamBuilder, Sink, Source};

    use super::{SoundError, ToneSpec};
    use crate::traits::ToneEmitter;

    /// Plays tones on the default output device
    pub struct RodioToneEmitter {
        /// Kept alive for as long as the emitter exists
        stream: Option<OutputStream>,
        sink: Option<Sink>,
    }

    impl Drop for RodioToneEmitter {
        fn drop(&mut self) {
            // Stop the sink before forgetting the stream it mixes into
            if let Some(sink) = self.sink.take() {
                sink.stop();
            }

            // Suppress the 'Dropping OutputStream' message
            if let Some(stream) = self.stream.take() {
                std::mem::forget(stream);
            }
        }
    }

    impl RodioToneEmitter {
        pub fn new() -> Result<Self, SoundError> {
            let stream = OutputStreamBuilder::open_default_stream()
                .map_err(|e| SoundError::DeviceUnavailable(e.to_string()))?;
            let sink = Sink::connect_new(stream.mixer());
            Ok(Self {
                stream: Some(stream),
                sink: Some(sink),
            })
        }

        /// Emitter with no device; every emit reports `DeviceUnavailable`
        pub fn disabled() -> Self {
            Self {
                stream: None,
                sink: None,
            }
        }
    }

    impl Default for RodioToneEmitter {
        fn default() -> Self {
            Self::new().unwrap_or_else(|e| {
                log::warn!("[sound] Failed to initialize audio output: {}", e);
                Self::disabled()
            })
        }
    }

    impl ToneEmitter for RodioToneEmitter {
        fn emit(&mut self, tone: &ToneSpec) -> Result<(), SoundError> {
            let sink = self
                .sink
                .as_ref()
                .ok_or_else(|| SoundError::DeviceUnavailable("audio disabled".to_string()))?;

            // Notes are laid end to end in the sink; the silence between
            // them reproduces the stagger
            let gap = tone.stagger.saturating_sub(tone.duration);
            for (i, &freq) in tone.frequencies_hz.iter().enumerate() {
                if i > 0 && !gap.is_zero() {
                    sink.append(
                        rodio::source::SineWave::new(freq)
                            .take_duration(gap)
                            .amplify(0.0),
                    );
                }
                let source = rodio::source::SineWave::new(freq)
                    .take_duration(tone.duration)
                    .amplify(tone.gain);
                sink.append(source);
            }
            Ok(())
        }
    }
}

/// Open the platform emitter, falling back to silence when there is no
/// device or the `audio` feature is off
pub fn default_emitter() -> Box<dyn ToneEmitter> {
    #[cfg(feature = "audio")]
    {
        match RodioToneEmitter::new() {
            Ok(emitter) => return Box::new(emitter),
            Err(e) => log::warn!("[sound] {}; sounds disabled", e),
        }
    }
    Box::new(SilentToneEmitter)
}

/// Preference-gated tone playback
pub struct SoundPlayer {
    enabled: bool,
    emitter: Box<dyn ToneEmitter>,
}

impl SoundPlayer {
    pub fn new(emitter: Box<dyn ToneEmitter>, enabled: bool) -> Self {
        Self { enabled, emitter }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Play `kind` if sound is enabled, reporting emitter failures.
    /// `Ok(false)` means sound is off.
    pub fn try_play(&mut self, kind: SoundKind) -> WidgetResult<bool> {
        if !self.enabled {
            return Ok(false);
        }
        self.emitter.emit(&kind.tone())?;
        log::trace!("[sound] Played {}", kind.as_str());
        Ok(true)
    }

    /// Like [`try_play`](Self::try_play) with failures logged and dropped;
    /// returns whether a tone was handed to the emitter.
    pub fn play(&mut self, kind: SoundKind) -> bool {
        self.try_play(kind).unwrap_or_else(|e| {
            log::warn!("[sound] Could not play {}: {}", kind.as_str(), e);
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingEmitter;

    impl ToneEmitter for FailingEmitter {
        fn emit(&mut self, _tone: &ToneSpec) -> Result<(), SoundError> {
            Err(SoundError::Playback("device vanished".into()))
        }
    }

    #[test]
    fn test_tone_table() {
        let send = SoundKind::Send.tone();
        assert_eq!(send.frequencies_hz, vec![800.0]);
        assert_eq!(send.duration, Duration::from_millis(100));

        let receive = SoundKind::Receive.tone();
        assert_eq!(receive.frequencies_hz, vec![600.0]);
        assert_eq!(receive.total_duration(), Duration::from_millis(150));

        let chime = SoundKind::Notification.tone();
        let notes: Vec<_> = chime.schedule().collect();
        assert_eq!(
            notes,
            vec![
                (Duration::ZERO, 600.0),
                (Duration::from_millis(100), 800.0)
            ]
        );
        assert_eq!(chime.total_duration(), Duration::from_millis(200));
    }

    #[test]
    fn test_kind_parse() {
        assert_eq!("receive".parse::<SoundKind>(), Ok(SoundKind::Receive));
        assert!("bell".parse::<SoundKind>().is_err());
    }

    #[test]
    fn test_disabled_player_is_silent() {
        let mut player = SoundPlayer::new(Box::new(SilentToneEmitter), false);
        assert!(!player.play(SoundKind::Send));
        player.set_enabled(true);
        assert!(player.play(SoundKind::Send));
    }

    #[test]
    fn test_emitter_failure_is_swallowed() {
        let mut player = SoundPlayer::new(Box::new(FailingEmitter), true);
        assert!(!player.play(SoundKind::Notification));
        // Next call still tries
        assert!(player.is_enabled());
        assert!(matches!(
            player.try_play(SoundKind::Send),
            Err(crate::WidgetError::AudioUnavailable(SoundError::Playback(_)))
        ));
    }

    #[cfg(feature = "audio")]
    #[test]
    fn test_rodio_default_does_not_panic() {
        let _emitter = RodioToneEmitter::default();
        let mut disabled = RodioToneEmitter::disabled();
        assert!(disabled.emit(&SoundKind::Send.tone()).is_err());
    }
}
