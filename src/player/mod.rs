mod audio;
mod clock;

pub use clock::PlaybackClock;

use crate::ffmpeg;
use anyhow::{anyhow, Context as _, Result};
use audio::AudioPlayer;
use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Playback state reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// A decoded RGBA frame ready for texture upload.
#[derive(Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub pts_ms: f64,
}

/// Change notifications produced by the engine, drained by the UI once per
/// frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerEvent {
    PositionChanged(u64),
    DurationChanged(u64),
    StateChanged(PlaybackState),
}

/// Media playback engine backed by the FFmpeg CLI.
///
/// Frame decoding and audio extraction run on background threads; all state
/// the UI reads is behind mutexes or arrives through the event channel.
pub struct MediaPlayer {
    path: PathBuf,
    duration_ms: u64,
    width: u32,
    height: u32,
    pub framerate: f64,
    state: Arc<Mutex<PlaybackState>>,
    clock: Arc<Mutex<PlaybackClock>>,
    current_frame: Arc<Mutex<Option<VideoFrame>>>,
    frame_cache: Arc<Mutex<Vec<(f64, VideoFrame)>>>,
    audio: Option<AudioPlayer>,
    events_tx: Sender<PlayerEvent>,
    events_rx: Receiver<PlayerEvent>,
}

impl MediaPlayer {
    /// Open a media file. Probes it, announces the duration, and decodes
    /// the first frame.
    pub fn new(path: &Path) -> Result<Self> {
        let info = ffmpeg::probe_file(path)
            .with_context(|| format!("failed to probe {}", path.display()))?;
        let duration_ms = (info.duration * 1000.0).round() as u64;

        let audio = match AudioPlayer::new(path) {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!(error = %e, "audio unavailable, continuing without sound");
                None
            }
        };

        let (events_tx, events_rx) = unbounded();

        let player = Self {
            path: path.to_path_buf(),
            duration_ms,
            width: info.width,
            height: info.height,
            framerate: info.framerate.unwrap_or(24.0),
            state: Arc::new(Mutex::new(PlaybackState::Stopped)),
            clock: Arc::new(Mutex::new(PlaybackClock::new())),
            current_frame: Arc::new(Mutex::new(None)),
            frame_cache: Arc::new(Mutex::new(Vec::new())),
            audio,
            events_tx,
            events_rx,
        };

        player.request_frame(0.0);
        player.send(PlayerEvent::DurationChanged(duration_ms));
        player.send(PlayerEvent::PositionChanged(0));
        Ok(player)
    }

    fn send(&self, event: PlayerEvent) {
        let _ = self.events_tx.send(event);
    }

    /// Drain pending change notifications.
    pub fn poll_events(&self) -> Vec<PlayerEvent> {
        self.events_rx.try_iter().collect()
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn position_ms(&self) -> u64 {
        self.clock.lock().time_ms().max(0.0) as u64
    }

    pub fn state(&self) -> PlaybackState {
        *self.state.lock()
    }

    pub fn current_frame(&self) -> Option<VideoFrame> {
        self.current_frame.lock().clone()
    }

    pub fn play(&self) {
        *self.state.lock() = PlaybackState::Playing;
        self.clock.lock().resume();
        if let Some(ref audio) = self.audio {
            audio.play();
        }
        self.send(PlayerEvent::StateChanged(PlaybackState::Playing));
        self.spawn_playback_loop();
    }

    pub fn pause(&self) {
        *self.state.lock() = PlaybackState::Paused;
        self.clock.lock().pause();
        if let Some(ref audio) = self.audio {
            audio.pause();
        }
        self.send(PlayerEvent::StateChanged(PlaybackState::Paused));
        self.send(PlayerEvent::PositionChanged(self.position_ms()));
    }

    pub fn stop(&self) {
        *self.state.lock() = PlaybackState::Stopped;
        self.clock.lock().reset();
        if let Some(ref audio) = self.audio {
            audio.stop();
        }
        self.request_frame(0.0);
        self.send(PlayerEvent::StateChanged(PlaybackState::Stopped));
        self.send(PlayerEvent::PositionChanged(0));
    }

    /// Seek to a millisecond offset. Targets outside the media are clamped
    /// here — the cut tracker hands us unclamped values on purpose.
    pub fn seek_ms(&self, target_ms: f64) {
        let clamped = target_ms.clamp(0.0, self.duration_ms as f64);
        self.clock.lock().set_time_ms(clamped);
        if let Some(ref audio) = self.audio {
            audio.seek_ms(clamped);
            if *self.state.lock() == PlaybackState::Playing {
                audio.play();
            }
        }
        self.request_frame(clamped);
        self.send(PlayerEvent::PositionChanged(clamped as u64));
    }

    /// Speed multiplier, 1.0 = normal. The clock and the audio resampler
    /// both follow it.
    pub fn set_playback_rate(&self, rate: f64) {
        let rate = rate.clamp(0.0, 2.0);
        self.clock.lock().set_rate(rate);
        if let Some(ref audio) = self.audio {
            if rate > 0.0 {
                audio.set_rate(rate as f32);
            } else {
                audio.pause();
            }
        }
    }

    /// Volume in the 0..=100 range used by the toolbar slider.
    pub fn set_volume(&self, percent: u8) {
        if let Some(ref audio) = self.audio {
            audio.set_volume_percent(percent);
        }
    }

    fn spawn_playback_loop(&self) {
        let state = self.state.clone();
        let clock = self.clock.clone();
        let current_frame = self.current_frame.clone();
        let frame_cache = self.frame_cache.clone();
        let events_tx = self.events_tx.clone();
        let path = self.path.clone();
        let duration_ms = self.duration_ms;
        let (width, height) = (self.width, self.height);

        std::thread::spawn(move || {
            let mut last_decoded_ms = f64::MIN;

            loop {
                if *state.lock() != PlaybackState::Playing {
                    break;
                }

                let now_ms = clock.lock().time_ms();

                if now_ms >= duration_ms as f64 {
                    *state.lock() = PlaybackState::Stopped;
                    clock.lock().reset();
                    let _ = events_tx.send(PlayerEvent::StateChanged(PlaybackState::Stopped));
                    let _ = events_tx.send(PlayerEvent::PositionChanged(0));
                    break;
                }

                let _ = events_tx.send(PlayerEvent::PositionChanged(now_ms as u64));

                // Refresh the preview at ~10 fps
                if (now_ms - last_decoded_ms).abs() >= 100.0 {
                    last_decoded_ms = now_ms;

                    let cached = {
                        let cache = frame_cache.lock();
                        cache
                            .iter()
                            .find(|(t, _)| (t - now_ms).abs() < 100.0)
                            .map(|(_, frame)| frame.clone())
                    };

                    match cached {
                        Some(frame) => *current_frame.lock() = Some(frame),
                        None => match decode_frame(&path, now_ms, width, height) {
                            Ok(frame) => {
                                cache_frame(&frame_cache, now_ms, frame.clone(), 30);
                                *current_frame.lock() = Some(frame);
                            }
                            Err(e) => debug!(error = %e, "frame decode failed"),
                        },
                    }
                }

                std::thread::sleep(Duration::from_millis(50));
            }
        });
    }

    /// Decode the frame at `ms` in the background and warm the cache with a
    /// few frames after it.
    fn request_frame(&self, ms: f64) {
        {
            let cache = self.frame_cache.lock();
            if let Some((_, frame)) = cache.iter().find(|(t, _)| (t - ms).abs() < 50.0) {
                *self.current_frame.lock() = Some(frame.clone());
                self.prefetch_from(ms);
                return;
            }
        }

        let path = self.path.clone();
        let current_frame = self.current_frame.clone();
        let frame_cache = self.frame_cache.clone();
        let (width, height) = (self.width, self.height);

        std::thread::spawn(move || match decode_frame(&path, ms, width, height) {
            Ok(frame) => {
                cache_frame(&frame_cache, ms, frame.clone(), 60);
                *current_frame.lock() = Some(frame);
            }
            Err(e) => debug!(error = %e, "frame decode failed"),
        });

        self.prefetch_from(ms);
    }

    fn prefetch_from(&self, ms: f64) {
        let path = self.path.clone();
        let frame_cache = self.frame_cache.clone();
        let (width, height) = (self.width, self.height);
        let duration_ms = self.duration_ms as f64;

        std::thread::spawn(move || {
            // Next five frames at 200 ms intervals
            for i in 1..=5 {
                let t = ms + i as f64 * 200.0;
                if t > duration_ms {
                    break;
                }

                let already_cached = {
                    let cache = frame_cache.lock();
                    cache.iter().any(|(c, _)| (c - t).abs() < 50.0)
                };
                if already_cached {
                    continue;
                }

                if let Ok(frame) = decode_frame(&path, t, width, height) {
                    cache_frame(&frame_cache, t, frame, 60);
                }
            }
        });
    }
}

fn cache_frame(cache: &Arc<Mutex<Vec<(f64, VideoFrame)>>>, ms: f64, frame: VideoFrame, cap: usize) {
    let mut cache = cache.lock();
    cache.push((ms, frame));
    if cache.len() > cap {
        cache.remove(0);
    }
}

/// Decode a single frame as raw RGBA piped out of the ffmpeg CLI. Scaled
/// down to preview resolution; the UI stretches the texture as needed.
fn decode_frame(path: &Path, ms: f64, source_width: u32, source_height: u32) -> Result<VideoFrame> {
    let width = source_width.min(854);
    let height = source_height.min(480);

    let output = std::process::Command::new("ffmpeg")
        .args([
            // Seek before the input — much faster than decoding up to it
            "-ss", &format!("{:.3}", ms / 1000.0),
            "-i",
        ])
        .arg(path)
        .args([
            "-vframes", "1",
            "-vf", &format!("scale={}:{}", width, height),
            "-f", "rawvideo",
            "-pix_fmt", "rgba",
            "-",
        ])
        .output()
        .context("failed to run ffmpeg")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!(
            "ffmpeg failed: {}",
            stderr.lines().last().unwrap_or("unknown error")
        ));
    }

    let expected = (width * height * 4) as usize;
    if output.stdout.len() != expected {
        return Err(anyhow!(
            "unexpected frame size: got {} bytes, expected {}",
            output.stdout.len(),
            expected
        ));
    }

    Ok(VideoFrame {
        data: output.stdout,
        width,
        height,
        pts_ms: ms,
    })
}
