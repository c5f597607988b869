use anyhow::{anyhow, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Command;

/// Media metadata the player needs, as reported by ffprobe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaInfo {
    /// Container duration in seconds.
    pub duration: f64,
    pub width: u32,
    pub height: u32,
    pub framerate: Option<f64>,
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
    pub format_name: String,
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: Option<ProbeFormat>,
    streams: Option<Vec<ProbeStream>>,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    duration: Option<String>,
    format_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
}

/// Probe a media file with `ffprobe -print_format json`.
pub fn probe_file(path: &Path) -> Result<MediaInfo> {
    let output = Command::new("ffprobe")
        .args([
            "-v", "quiet",
            "-print_format", "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .output()
        .context("failed to run ffprobe")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(anyhow!("ffprobe failed: {}", stderr));
    }

    let probe: ProbeOutput =
        serde_json::from_slice(&output.stdout).context("failed to parse ffprobe output")?;

    let mut info = MediaInfo::default();

    if let Some(format) = probe.format {
        info.duration = format.duration.and_then(|d| d.parse().ok()).unwrap_or(0.0);
        info.format_name = format.format_name.unwrap_or_default();
    }

    for stream in probe.streams.unwrap_or_default() {
        match stream.codec_type.as_deref() {
            Some("video") => {
                info.video_codec = stream.codec_name;
                info.width = stream.width.unwrap_or(0);
                info.height = stream.height.unwrap_or(0);
                info.framerate = stream.r_frame_rate.as_deref().and_then(parse_framerate);
            }
            Some("audio") => {
                info.audio_codec = stream.codec_name;
            }
            _ => {}
        }
    }

    Ok(info)
}

/// ffprobe reports frame rates as rationals like `24000/1001`.
fn parse_framerate(fps: &str) -> Option<f64> {
    match fps.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.parse().ok()?;
            let den: f64 = den.parse().ok()?;
            (den > 0.0).then(|| num / den)
        }
        None => fps.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framerate_parses_rationals() {
        assert_eq!(parse_framerate("24/1"), Some(24.0));
        let ntsc = parse_framerate("30000/1001").unwrap();
        assert!((ntsc - 29.97).abs() < 0.01);
    }

    #[test]
    fn framerate_rejects_zero_denominator() {
        assert_eq!(parse_framerate("30/0"), None);
    }
}
