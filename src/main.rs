#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")] // hide console window on Windows in release

use std::path::PathBuf;

use clap::Parser;
use eframe::NativeOptions;
use eframe::egui::ViewportBuilder;

use speedy_chart::config::PERSISTENCE;
use speedy_chart::ui::ui_text::UI_TEXT;
use speedy_chart::{Cli, build_sources, run_app};

fn main() -> eframe::Result {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Bar sources (no network yet; the first fetch starts with the app)
    let sources = match build_sources(&args) {
        Ok(sources) => sources,
        Err(e) => {
            log::error!("Cannot start: {:#}", e);
            std::process::exit(2);
        }
    };

    // D. Run Native App
    let title = format!("{} - {}", UI_TEXT.app_title, args.symbol.to_uppercase());
    let options = NativeOptions {
        persistence_path: Some(PathBuf::from(PERSISTENCE.app_state_path)),
        viewport: ViewportBuilder::default()
            .with_title(title.clone())
            .with_inner_size([1100.0, 640.0])
            .with_min_inner_size([480.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(run_app(cc, args, sources))),
    )
}
