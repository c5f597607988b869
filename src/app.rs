use crate::cuts::{self, CutTracker, StepDirection, TransportIntent, DEFAULT_STEP_FPS};
use crate::ffmpeg;
use crate::input::{self, Command};
use crate::player::{MediaPlayer, PlaybackState, PlayerEvent};
use crate::playlist::{MediaItem, Playlist};
use crate::ui::CutEntry;
use crate::utils::format_milliseconds;
use eframe::egui;
use tracing::{info, warn};

pub struct SplitterApp {
    pub playlist: Playlist,
    pub player: Option<MediaPlayer>,
    pub tracker: CutTracker,
    pub cut_entries: Vec<CutEntry>,

    // Readouts under the time slider, refreshed from player events
    pub position_label: String,
    pub duration_label: String,
    pub slider_ms: u64,

    // Toolbar state
    pub volume: u8,
    pub speed_percent: u32,

    pub status_message: String,

    // Preview
    pub preview_texture: Option<egui::TextureHandle>,
    last_frame_pts_ms: f64,
}

impl SplitterApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self {
            playlist: Playlist::new(),
            player: None,
            tracker: CutTracker::new(),
            cut_entries: Vec::new(),
            position_label: String::new(),
            duration_label: String::new(),
            slider_ms: 0,
            volume: 100,
            speed_percent: 100,
            status_message: String::from("Ready"),
            preview_texture: None,
            last_frame_pts_ms: -1.0,
        }
    }

    /// Prompt for a video, append it to the playlist, switch to it, and
    /// start playback.
    pub fn open(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Video", &["mp4", "mkv", "avi", "mov", "webm", "ts", "flv"])
            .add_filter("All Files", &["*"])
            .pick_file()
        else {
            return;
        };

        match ffmpeg::probe_file(&path) {
            Ok(info) => {
                self.playlist.add_media(MediaItem { path, info });
                self.playlist.next();
                self.load_current();
                self.play();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "probe failed");
                self.status_message = format!("Failed to open {}: {}", path.display(), e);
            }
        }
    }

    /// Create a player for the playlist's current item. The cut list always
    /// belongs to one video, so it is reset here.
    pub fn load_current(&mut self) {
        let Some(item) = self.playlist.current_item() else {
            return;
        };
        let (path, filename) = (item.path.clone(), item.filename());

        // End the old player's playback loop before replacing it
        if let Some(ref player) = self.player {
            player.stop();
        }

        match MediaPlayer::new(&path) {
            Ok(player) => {
                player.set_volume(self.volume);
                player.set_playback_rate(self.speed_percent as f64 / 100.0);
                self.tracker.clear_cuts();
                self.cut_entries.clear();
                self.preview_texture = None;
                self.last_frame_pts_ms = -1.0;
                self.player = Some(player);
                info!(file = %filename, "media loaded");
                self.status_message = format!("Loaded: {}", filename);
            }
            Err(e) => {
                self.player = None;
                self.status_message = format!("Failed to load player: {}", e);
            }
        }
    }

    // ---- Transport ----

    pub fn play(&mut self) {
        if let Some(ref player) = self.player {
            player.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(ref player) = self.player {
            player.pause();
        }
    }

    pub fn stop(&mut self) {
        if let Some(ref player) = self.player {
            player.stop();
        }
    }

    /// Previous within the first five seconds switches tracks; later than
    /// that it restarts the current one.
    pub fn previous_clicked(&mut self) {
        let position_ms = self.player.as_ref().map(|p| p.position_ms()).unwrap_or(0);
        match cuts::previous_or_restart(position_ms) {
            TransportIntent::Previous => {
                if self.playlist.previous() {
                    self.load_current();
                    self.play();
                }
            }
            TransportIntent::Restart => {
                if let Some(ref player) = self.player {
                    player.seek_ms(0.0);
                }
            }
        }
    }

    pub fn next_clicked(&mut self) {
        if self.playlist.next() {
            self.load_current();
            self.play();
        }
    }

    pub fn transport(&self) -> TransportFlags {
        transport_flags(
            self.playlist.media_count(),
            self.player
                .as_ref()
                .map(|p| p.state())
                .unwrap_or(PlaybackState::Stopped),
            self.player.as_ref().map(|p| p.position_ms()).unwrap_or(0),
        )
    }

    pub fn set_volume(&mut self, volume: u8) {
        self.volume = volume;
        if let Some(ref player) = self.player {
            player.set_volume(volume);
        }
    }

    pub fn set_speed_percent(&mut self, percent: u32) {
        self.speed_percent = percent.min(200);
        if let Some(ref player) = self.player {
            player.set_playback_rate(self.speed_percent as f64 / 100.0);
        }
    }

    // ---- Cuts ----

    /// Record a cut at the playhead and add its row to the list.
    pub fn split(&mut self) {
        let timestamp_ms = self.tracker.add_cut();
        self.cut_entries.push(CutEntry::new(timestamp_ms));
        self.status_message = format!("Cut recorded at {}", format_milliseconds(timestamp_ms));
    }

    /// Re-record the cut behind row `index` at the playhead.
    pub fn update_cut(&mut self, index: usize) {
        let Some(entry) = self.cut_entries.get_mut(index) else {
            return;
        };
        match self.tracker.update_cut(entry.timestamp_ms) {
            Ok(new_ms) => {
                entry.timestamp_ms = new_ms;
                self.status_message =
                    format!("Cut moved to {}", format_milliseconds(new_ms));
            }
            Err(e) => {
                warn!(error = %e, "update cut failed");
                self.status_message = e.to_string();
            }
        }
    }

    // ---- Seeking ----

    /// Slider- and key-driven positioning is ignored while playback runs.
    fn seek_when_paused(&mut self, target_ms: f64) {
        let Some(ref player) = self.player else {
            return;
        };
        if player.state() != PlaybackState::Playing {
            player.seek_ms(target_ms);
        }
    }

    pub fn set_position_from_slider(&mut self, ms: u64) {
        self.seek_when_paused(ms as f64);
    }

    fn step_frame(&mut self, direction: StepDirection) {
        let target_ms = self.tracker.step_frame(direction, DEFAULT_STEP_FPS);
        self.seek_when_paused(target_ms);
    }

    // ---- Event dispatch ----

    /// Apply one user command from the dispatch table.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::StepBackward => self.step_frame(StepDirection::Backward),
            Command::StepForward => self.step_frame(StepDirection::Forward),
            Command::RecordCut => self.split(),
            Command::OpenFile => self.open(),
            Command::Quit => std::process::exit(0),
        }
    }

    /// Apply one playback-engine event to the tracker and derived UI state.
    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::PositionChanged(ms) => {
                self.position_label = self.tracker.report_position(ms);
                self.slider_ms = ms;
            }
            PlayerEvent::DurationChanged(ms) => {
                self.tracker.report_duration(ms);
                self.duration_label = format_milliseconds(ms);
                self.slider_ms = self.slider_ms.min(ms);
            }
            PlayerEvent::StateChanged(state) => {
                tracing::debug!(?state, "player state changed");
            }
        }
    }

    /// Drain player events and refresh the preview texture. Only re-uploads
    /// when the frame actually changed (PTS check).
    pub fn update_player(&mut self, ctx: &egui::Context) {
        let events = self
            .player
            .as_ref()
            .map(|p| p.poll_events())
            .unwrap_or_default();
        for event in events {
            self.handle_player_event(event);
        }

        if let Some(ref player) = self.player {
            if let Some(frame) = player.current_frame() {
                if (frame.pts_ms - self.last_frame_pts_ms).abs() > 0.5 {
                    self.last_frame_pts_ms = frame.pts_ms;
                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [frame.width as usize, frame.height as usize],
                        &frame.data,
                    );
                    self.preview_texture = Some(ctx.load_texture(
                        "video_frame",
                        color_image,
                        egui::TextureOptions::LINEAR,
                    ));
                }
            }

            if player.state() == PlaybackState::Playing {
                ctx.request_repaint_after(std::time::Duration::from_millis(30));
            }
        }
    }
}

impl eframe::App for SplitterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Keyboard input through the dispatch table
        for command in input::pressed_commands(ctx) {
            self.apply(command);
        }

        // Player events + preview
        self.update_player(ctx);

        // Render UI
        crate::ui::render_main_window(self, ctx);
    }
}

/// Per-frame enablement of the transport actions, mirroring the player
/// state and playlist size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportFlags {
    pub play: bool,
    pub pause: bool,
    pub stop: bool,
    pub previous: bool,
    pub next: bool,
}

pub fn transport_flags(
    media_count: usize,
    state: PlaybackState,
    position_ms: u64,
) -> TransportFlags {
    TransportFlags {
        play: media_count > 0 && state != PlaybackState::Playing,
        pause: state == PlaybackState::Playing,
        stop: state != PlaybackState::Stopped,
        previous: position_ms > 0,
        next: media_count > 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_disabled_with_empty_playlist() {
        let flags = transport_flags(0, PlaybackState::Stopped, 0);
        assert!(!flags.play);
        assert!(!flags.pause);
        assert!(!flags.stop);
        assert!(!flags.previous);
        assert!(!flags.next);
    }

    #[test]
    fn play_and_pause_mirror_player_state() {
        let playing = transport_flags(1, PlaybackState::Playing, 1_000);
        assert!(!playing.play);
        assert!(playing.pause);
        assert!(playing.stop);

        let paused = transport_flags(1, PlaybackState::Paused, 1_000);
        assert!(paused.play);
        assert!(!paused.pause);
        assert!(paused.stop);
    }

    #[test]
    fn next_needs_a_second_video() {
        assert!(!transport_flags(1, PlaybackState::Stopped, 0).next);
        assert!(transport_flags(2, PlaybackState::Stopped, 0).next);
    }

    #[test]
    fn previous_needs_progress() {
        assert!(!transport_flags(2, PlaybackState::Playing, 0).previous);
        assert!(transport_flags(2, PlaybackState::Playing, 1).previous);
    }
}
