use anyhow::{anyhow, Context as _, Result};
use parking_lot::Mutex;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Audio side of the playback engine. The track is extracted to a temp WAV
/// in the background; playback is a no-op until extraction lands.
pub struct AudioPlayer {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Arc<Sink>,
    wav_path: Arc<Mutex<Option<PathBuf>>>,
    volume: Arc<Mutex<f32>>,
}

impl AudioPlayer {
    /// Create the sink and kick off extraction. The caller is not blocked.
    pub fn new(video_path: &Path) -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().context("no audio output device")?;
        let sink = Sink::try_new(&handle).context("failed to create audio sink")?;

        let wav_path: Arc<Mutex<Option<PathBuf>>> = Arc::new(Mutex::new(None));

        let path = video_path.to_path_buf();
        let slot = wav_path.clone();
        std::thread::spawn(move || match extract_audio_to_temp(&path) {
            Ok(temp) => {
                // Only keep it if extraction actually produced samples
                let nonempty = temp.exists()
                    && std::fs::metadata(&temp).map(|m| m.len() > 0).unwrap_or(false);
                if nonempty {
                    *slot.lock() = Some(temp);
                }
            }
            Err(e) => debug!(error = %e, "audio extraction failed"),
        });

        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink: Arc::new(sink),
            wav_path,
            volume: Arc::new(Mutex::new(1.0)),
        })
    }

    /// Load the extracted WAV into the sink (no-op if not ready yet).
    fn load(&self) -> Result<()> {
        let guard = self.wav_path.lock();
        if let Some(ref path) = *guard {
            let file = File::open(path).context("failed to open extracted audio")?;
            let source =
                Decoder::new(BufReader::new(file)).context("failed to decode audio")?;
            self.sink.append(source);
            self.sink.set_volume(*self.volume.lock());
            self.sink.pause();
        }
        Ok(())
    }

    pub fn play(&self) {
        if self.sink.empty() {
            let _ = self.load();
        }
        self.sink.play();
    }

    pub fn pause(&self) {
        self.sink.pause();
    }

    pub fn stop(&self) {
        self.sink.stop();
        self.sink.clear();
    }

    /// Volume from the 0..=100 toolbar slider.
    pub fn set_volume_percent(&self, percent: u8) {
        let volume = percent.min(100) as f32 / 100.0;
        *self.volume.lock() = volume;
        self.sink.set_volume(volume);
    }

    /// Playback-rate multiplier, forwarded to the sink's resampler.
    pub fn set_rate(&self, rate: f32) {
        self.sink.set_speed(rate);
    }

    /// Restart the decoder at a millisecond offset.
    pub fn seek_ms(&self, ms: f64) {
        self.sink.stop();
        self.sink.clear();

        let guard = self.wav_path.lock();
        if let Some(ref path) = *guard {
            if let Ok(file) = File::open(path) {
                if let Ok(source) = Decoder::new(BufReader::new(file)) {
                    let skipped = source.skip_duration(Duration::from_secs_f64(ms / 1000.0));
                    self.sink.append(skipped);
                    self.sink.set_volume(*self.volume.lock());
                }
            }
        }
    }
}

impl Drop for AudioPlayer {
    fn drop(&mut self) {
        if let Some(ref path) = *self.wav_path.lock() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Extract the audio track to a temp WAV using FFmpeg.
fn extract_audio_to_temp(video_path: &Path) -> Result<PathBuf> {
    let stem = video_path.file_stem().unwrap_or_default().to_string_lossy();
    let temp_path = std::env::temp_dir().join(format!("video_splitter_audio_{}.wav", stem));

    let _ = std::fs::remove_file(&temp_path);

    let mut cmd = std::process::Command::new("ffmpeg");
    cmd.args(["-y", "-i"])
        .arg(video_path)
        .args(["-vn", "-acodec", "pcm_s16le", "-ar", "44100", "-ac", "2"])
        .arg(&temp_path)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null());

    #[cfg(windows)]
    {
        use std::os::windows::process::CommandExt;
        const CREATE_NO_WINDOW: u32 = 0x08000000;
        cmd.creation_flags(CREATE_NO_WINDOW);
    }

    let output = cmd.output().context("failed to run ffmpeg")?;
    if !output.status.success() {
        return Err(anyhow!("ffmpeg audio extraction failed"));
    }

    Ok(temp_path)
}
