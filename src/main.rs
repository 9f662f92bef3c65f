//! Shayari Studio desktop entry point.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (default on first run), then let the
//!    environment supply the API key.
//! 3. Create the [`tokio`] runtime that runs generation calls.
//! 4. Build the [`PromptOrchestrator`].
//! 5. Build the speech engines. Voice input is optional and only exists when
//!    the Whisper model file is present.
//! 6. Load favorites and assemble the [`SessionController`].
//! 7. Run [`eframe::run_native`], which blocks until the window is closed.

use std::sync::Arc;

use eframe::egui;
use shayari_studio::{
    app::ShayariApp,
    config::{AppConfig, AppPaths},
    generate::{Generator, PromptOrchestrator},
    session::{FavoritesList, FileStore, SessionController, SessionInput},
    speech::{speech_channel, CommandSynthesizer, Recognizer, Synthesizer, WhisperRecognizer},
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let (width, height) = config.ui.window_size;
    let viewport = egui::ViewportBuilder::default()
        .with_title("Shayari Studio")
        .with_inner_size([width, height])
        .with_min_inner_size([420.0, 480.0]);

    eframe::NativeOptions {
        viewport,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Shayari Studio starting up");

    // 2. Configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });
    config.apply_env();
    if config.gemini.credential().is_none() {
        log::warn!("No API key configured; generation will fail until one is set");
    }
    let paths = AppPaths::new();

    // 3. Tokio runtime (generation calls only)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Model service
    let generator: Arc<dyn Generator> = Arc::new(PromptOrchestrator::from_config(&config.gemini));

    // 5. Speech engines
    let (speech_tx, speech_rx) = speech_channel();

    let recognizer: Option<Box<dyn Recognizer>> =
        match WhisperRecognizer::load(&paths.models_dir, &config.speech, speech_tx.clone()) {
            Ok(recognizer) => {
                log::info!("Voice input ready ({})", config.speech.whisper_model);
                Some(Box::new(recognizer))
            }
            Err(e) => {
                log::warn!("Voice input unavailable: {e}");
                None
            }
        };

    let synthesizer: Option<Box<dyn Synthesizer>> = Some(Box::new(CommandSynthesizer::new(
        config.speech.tts_program.clone(),
        speech_tx,
    )));

    // 6. Session
    let favorites = FavoritesList::load(Box::new(FileStore::new(&paths.store_dir)));
    let session = SessionController::new(generator, rt.handle().clone(), favorites, speech_rx)
        .with_input(SessionInput::from(&config.session))
        .with_recognizer(recognizer)
        .with_synthesizer(synthesizer);

    let export_dir = config.ui.export_dir.clone().unwrap_or(paths.export_dir);

    // 7. Run the window (blocks until closed). `rt` stays alive until then.
    let app = ShayariApp::new(session, export_dir);
    let result = eframe::run_native(
        "Shayari Studio",
        native_options(&config),
        Box::new(move |_cc| Ok(Box::new(app))),
    );
    drop(rt);
    result
}
