//! Application entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (writing the defaults on first run).
//! 3. Create the [`tokio`] runtime that runs relay calls.
//! 4. Build the message relay and its worker.
//! 5. Load the profile store into the application context.
//! 6. Build the speech backends (Whisper model + OS speech command).
//! 7. Run [`eframe::run_native`]; blocks until the window is closed.

use std::sync::Arc;

use eframe::egui;
use english_tutor::{
    app::TutorApp,
    config::{AppConfig, AppPaths},
    profile::{AppContext, ProfileStore},
    relay::{MessageRelay, RelayWorker},
    speech::{CommandSynthesizer, MicrophoneRecognizer, SpeechAdapter},
    ui,
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (w, h) = config.ui.window_size;
    let (min_w, min_h) = config.ui.min_window_size;
    let vp = egui::ViewportBuilder::default()
        .with_title("English AI Practice")
        .with_inner_size([w, h])
        .with_min_inner_size([min_w, min_h]);

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("English tutor starting up");

    // 2. Configuration
    let paths = AppPaths::new();
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    if !paths.settings_file.exists() {
        if let Err(e) = config.save() {
            log::warn!("Could not write default config: {e}");
        }
    }

    // 3. Tokio runtime for HTTP
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("Failed to create tokio runtime: {e}");
            return Err(eframe::Error::AppCreation(Box::new(e)));
        }
    };

    // 4. Relay
    let relay = RelayWorker::new(
        Arc::new(MessageRelay::from_config(&config.relay)),
        rt.handle().clone(),
    );

    // 5. Profile
    let ctx = AppContext::load(ProfileStore::open(&paths.store_file));

    // 6. Speech
    let speech = SpeechAdapter::new(
        Box::new(MicrophoneRecognizer::from_config(&config.speech, &paths)),
        Box::new(CommandSynthesizer::detect(config.speech.tts_command.as_deref())),
    );

    // 7. UI
    let options = native_options(&config);
    eframe::run_native(
        "English AI Practice",
        options,
        Box::new(move |cc| {
            ui::apply_theme(&cc.egui_ctx);
            Ok(Box::new(TutorApp::new(ctx, speech, relay)))
        }),
    )
}
