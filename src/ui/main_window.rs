use crate::app::SplitterApp;
use eframe::egui;

pub fn render_main_window(app: &mut SplitterApp, ctx: &egui::Context) {
    // Top menu bar
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        render_menu_bar(app, ui);
    });

    // Toolbar: transport + volume + split + speed
    egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
        render_toolbar(app, ui);
    });

    // Status bar at bottom
    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
        render_status_bar(app, ui);
    });

    // Central: preview, time slider, cut list
    egui::CentralPanel::default().show(ctx, |ui| {
        render_preview_area(app, ui);

        ui.separator();

        render_time_slider(app, ui);

        ui.separator();

        render_cuts_panel(app, ui);
    });
}

fn render_menu_bar(app: &mut SplitterApp, ui: &mut egui::Ui) {
    egui::menu::bar(ui, |ui| {
        ui.menu_button("File", |ui| {
            if ui.button("Open Video... (Ctrl+O)").clicked() {
                app.open();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Exit (Ctrl+Q)").clicked() {
                std::process::exit(0);
            }
        });

        ui.menu_button("Play", |ui| {
            let flags = app.transport();
            if ui.add_enabled(flags.play, egui::Button::new("Play")).clicked() {
                app.play();
                ui.close_menu();
            }
            if ui.add_enabled(flags.pause, egui::Button::new("Pause")).clicked() {
                app.pause();
                ui.close_menu();
            }
            if ui.add_enabled(flags.stop, egui::Button::new("Stop")).clicked() {
                app.stop();
                ui.close_menu();
            }
            ui.separator();
            if ui
                .add_enabled(flags.previous, egui::Button::new("Previous"))
                .clicked()
            {
                app.previous_clicked();
                ui.close_menu();
            }
            if ui.add_enabled(flags.next, egui::Button::new("Next")).clicked() {
                app.next_clicked();
                ui.close_menu();
            }
        });
    });
}

fn render_toolbar(app: &mut SplitterApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        let flags = app.transport();

        if ui
            .add_enabled(flags.play, egui::Button::new(">"))
            .on_hover_text("Play")
            .clicked()
        {
            app.play();
        }
        if ui
            .add_enabled(flags.pause, egui::Button::new("||"))
            .on_hover_text("Pause")
            .clicked()
        {
            app.pause();
        }
        if ui
            .add_enabled(flags.stop, egui::Button::new("[]"))
            .on_hover_text("Stop")
            .clicked()
        {
            app.stop();
        }
        if ui
            .add_enabled(flags.previous, egui::Button::new("|<"))
            .on_hover_text("Previous (restart past 5s)")
            .clicked()
        {
            app.previous_clicked();
        }
        if ui
            .add_enabled(flags.next, egui::Button::new(">|"))
            .on_hover_text("Next")
            .clicked()
        {
            app.next_clicked();
        }

        ui.separator();

        ui.label("Vol:");
        let mut volume = app.volume;
        if ui
            .add(egui::Slider::new(&mut volume, 0..=100).show_value(false))
            .on_hover_text("Volume")
            .changed()
        {
            app.set_volume(volume);
        }

        ui.separator();

        if ui
            .button("Split")
            .on_hover_text("Record a cut at the playhead (S)")
            .clicked()
        {
            app.split();
        }

        ui.separator();

        let mut speed = app.speed_percent;
        if ui
            .add(egui::Slider::new(&mut speed, 0..=200).show_value(false))
            .on_hover_text("Speed")
            .changed()
        {
            app.set_speed_percent(speed);
        }
        ui.label(format!("{:.2}x", app.speed_percent as f64 / 100.0));
    });
}

fn render_status_bar(app: &SplitterApp, ui: &mut egui::Ui) {
    ui.horizontal(|ui| {
        ui.label(&app.status_message);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(format!("{} cut(s)", app.tracker.cuts().len()));
            ui.separator();
            ui.label(format!("{} video(s)", app.playlist.media_count()));
        });
    });
}

fn render_preview_area(app: &mut SplitterApp, ui: &mut egui::Ui) {
    let available_size = ui.available_size();
    let preview_height = (available_size.y * 0.55).clamp(150.0, 420.0);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_height(preview_height);
        ui.set_max_height(preview_height);

        if let Some(ref texture) = app.preview_texture {
            let texture_size = texture.size_vec2();
            let aspect_ratio = texture_size.x / texture_size.y;

            let available = ui.available_size();
            let display_size = if available.x / available.y > aspect_ratio {
                egui::vec2(available.y * aspect_ratio, available.y)
            } else {
                egui::vec2(available.x, available.x / aspect_ratio)
            };

            ui.centered_and_justified(|ui| {
                ui.image((texture.id(), display_size));
            });
        } else if let Some(item) = app.playlist.current_item() {
            ui.centered_and_justified(|ui| {
                ui.label(format!("{}\n\nPress Play to start", item.filename()));
            });
        } else {
            ui.centered_and_justified(|ui| {
                ui.label("No video loaded\nFile > Open Video... (Ctrl+O)");
            });
        }
    });
}

fn render_time_slider(app: &mut SplitterApp, ui: &mut egui::Ui) {
    let duration_ms = app.tracker.duration_ms();

    ui.horizontal(|ui| {
        ui.style_mut().spacing.slider_width = ui.available_width() - 20.0;

        let mut position = app.slider_ms;
        let response = ui.add(
            egui::Slider::new(&mut position, 0..=duration_ms.max(1))
                .show_value(false)
                .trailing_fill(true),
        );

        if response.changed() {
            app.slider_ms = position;
            app.set_position_from_slider(position);
        }

        if response.dragged() || response.changed() {
            ui.ctx().request_repaint();
        }
    });

    // Current position on the left, total duration on the right
    ui.horizontal(|ui| {
        ui.label(&app.position_label);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.label(&app.duration_label);
        });
    });
}

fn render_cuts_panel(app: &mut SplitterApp, ui: &mut egui::Ui) {
    let duration_ms = app.tracker.duration_ms();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            if app.cut_entries.is_empty() {
                ui.label("No cuts yet. Press S or the Split button during playback.");
                return;
            }

            if let Some(index) =
                crate::ui::render_cut_list(ui, &mut app.cut_entries, duration_ms)
            {
                app.update_cut(index);
            }
        });
}
