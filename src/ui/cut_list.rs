use crate::utils::format_milliseconds;
use eframe::egui;

/// One recorded cut, as listed under the time slider: the tracked timestamp
/// plus the output-name prefix/suffix the user can type in.
#[derive(Debug, Clone, Default)]
pub struct CutEntry {
    pub timestamp_ms: u64,
    pub prefix: String,
    pub suffix: String,
}

impl CutEntry {
    pub fn new(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            ..Default::default()
        }
    }
}

/// Render the cut rows: a progress bar spanning the video's duration filled
/// up to the cut, then the prefix/suffix inputs and the update button.
///
/// Returns the index of the entry whose "Update Cut" button was clicked this
/// frame, if any.
pub fn render_cut_list(
    ui: &mut egui::Ui,
    entries: &mut [CutEntry],
    duration_ms: u64,
) -> Option<usize> {
    let mut update_clicked = None;

    for (i, entry) in entries.iter_mut().enumerate() {
        let fraction = if duration_ms > 0 {
            entry.timestamp_ms as f32 / duration_ms as f32
        } else {
            0.0
        };

        ui.add(egui::ProgressBar::new(fraction).text(format_milliseconds(entry.timestamp_ms)));

        ui.horizontal(|ui| {
            ui.label("Prefix:");
            ui.add(egui::TextEdit::singleline(&mut entry.prefix).desired_width(120.0));
            ui.label("Suffix:");
            ui.add(egui::TextEdit::singleline(&mut entry.suffix).desired_width(120.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .button("Update Cut")
                    .on_hover_text("Re-record this cut at the playhead")
                    .clicked()
                {
                    update_clicked = Some(i);
                }
            });
        });

        ui.add_space(4.0);
    }

    update_clicked
}
