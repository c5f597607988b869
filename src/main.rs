#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod cuts;
mod ffmpeg;
mod input;
mod player;
mod playlist;
mod ui;
mod utils;

use app::SplitterApp;
use eframe::egui;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([800.0, 600.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Video Splitter"),
        ..Default::default()
    };

    eframe::run_native(
        "Video Splitter",
        options,
        Box::new(|cc| Ok(Box::new(SplitterApp::new(cc)))),
    )
}
