//! Shayari Studio window: egui/eframe front-end over [`SessionController`].
//!
//! # Layout
//!
//! ```text
//! ┌ Theme [picker ▾] [free text............] [🎤]
//! │ Language [▾]   Lines [▾]   Length [▾]
//! │ Include: [multi-line custom input.........]
//! │ [ Generate ]  (spinner + Cancel while pending)
//! ├ result text / error label
//! │ [Save] [Copy] [Speak] [Stop] [Download]
//! └ Favorites: entry ... [✕]
//! ```
//!
//! The app owns no session state of its own; it forwards user actions to the
//! controller and calls [`SessionController::poll`] every frame to pick up
//! generation outcomes and speech callbacks.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::generate::{Length, LANGUAGES, LINE_COUNTS, THEMES};
use crate::session::{SessionController, SpeechState};

/// How long a status line (saved, copied, notices) stays visible.
const STATUS_TTL: Duration = Duration::from_secs(4);

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 90, 70);
const MUTED_COLOR: egui::Color32 = egui::Color32::from_rgb(140, 140, 140);
const ACCENT_COLOR: egui::Color32 = egui::Color32::from_rgb(200, 120, 60);

pub struct ShayariApp {
    session: SessionController,
    export_dir: PathBuf,
    status: Option<(String, Instant)>,
}

impl ShayariApp {
    pub fn new(session: SessionController, export_dir: PathBuf) -> Self {
        Self {
            session,
            export_dir,
            status: None,
        }
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some((message.into(), Instant::now()));
    }

    fn expire_status(&mut self) {
        if self
            .status
            .as_ref()
            .is_some_and(|(_, at)| at.elapsed() >= STATUS_TTL)
        {
            self.status = None;
        }
    }

    // ── Input form ───────────────────────────────────────────────────────

    fn draw_inputs(&mut self, ui: &mut egui::Ui) {
        let listening = self.session.speech_state() == SpeechState::Listening;

        ui.horizontal(|ui| {
            ui.label("Theme");
            let input = self.session.input_mut();
            egui::ComboBox::from_id_salt("theme")
                .selected_text(if THEMES.contains(&input.theme.as_str()) {
                    input.theme.as_str()
                } else {
                    "Custom"
                })
                .show_ui(ui, |ui| {
                    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                        for theme in THEMES {
                            ui.selectable_value(&mut input.theme, (*theme).to_string(), *theme);
                        }
                    });
                });
            ui.add(egui::TextEdit::singleline(&mut input.theme).desired_width(180.0));

            let mic = if listening { "⏹ Listening…" } else { "🎤" };
            if ui
                .add(egui::Button::new(mic))
                .on_hover_text("Speak a theme")
                .clicked()
            {
                if listening {
                    self.session.stop_listening();
                } else {
                    self.session.start_listening();
                }
            }
        });

        let input = self.session.input_mut();
        ui.horizontal(|ui| {
            ui.label("Language");
            egui::ComboBox::from_id_salt("language")
                .selected_text(input.language.as_str())
                .show_ui(ui, |ui| {
                    egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                        for language in LANGUAGES {
                            ui.selectable_value(
                                &mut input.language,
                                (*language).to_string(),
                                *language,
                            );
                        }
                    });
                });

            ui.label("Lines");
            egui::ComboBox::from_id_salt("lines")
                .selected_text(input.line_count.to_string())
                .show_ui(ui, |ui| {
                    for count in LINE_COUNTS {
                        ui.selectable_value(&mut input.line_count, *count, count.to_string());
                    }
                });

            ui.label("Length");
            egui::ComboBox::from_id_salt("length")
                .selected_text(input.length.as_str())
                .show_ui(ui, |ui| {
                    for length in Length::CHOICES {
                        let label = length.to_string();
                        ui.selectable_value(&mut input.length, length, label);
                    }
                });
        });

        ui.label("Include words, sentences or facts (optional)");
        ui.add(
            egui::TextEdit::multiline(&mut input.custom_input)
                .desired_rows(2)
                .desired_width(f32::INFINITY),
        );
    }

    fn draw_generate(&mut self, ui: &mut egui::Ui) {
        let pending = self.session.generation_state().is_busy();
        ui.horizontal(|ui| {
            let label = egui::RichText::new("Generate Shayari").size(15.0);
            if ui
                .add_enabled(!pending, egui::Button::new(label).min_size(egui::vec2(160.0, 28.0)))
                .clicked()
            {
                self.session.submit();
            }
            if pending {
                ui.spinner();
                ui.label(egui::RichText::new(self.session.generation_state().label()).color(MUTED_COLOR));
                if ui.button("Cancel").clicked() {
                    self.session.cancel_generation();
                }
            }
        });
    }

    // ── Result panel ─────────────────────────────────────────────────────

    fn draw_result(&mut self, ui: &mut egui::Ui) {
        if let Some(error) = self.session.error() {
            ui.label(egui::RichText::new(error).color(ERROR_COLOR));
            return;
        }
        let Some(text) = self.session.result().map(str::to_string) else {
            return;
        };

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(&text).size(16.0));
        });

        let speaking = self.session.speech_state() == SpeechState::Speaking;
        ui.horizontal(|ui| {
            let save_label = if self.session.is_saved() { "❤ Saved" } else { "❤ Save" };
            if ui.button(save_label).clicked() {
                if self.session.save_current() {
                    self.set_status("Saved to favorites");
                } else {
                    self.set_status("Already in favorites");
                }
            }
            if ui.button("📋 Copy").clicked() {
                match self.session.copy_result() {
                    Ok(()) => self.set_status("Copied to clipboard"),
                    Err(e) => self.set_status(e.to_string()),
                }
            }
            if ui.add_enabled(!speaking, egui::Button::new("🔊 Speak")).clicked() {
                self.session.speak();
            }
            if ui.add_enabled(speaking, egui::Button::new("⏹ Stop")).clicked() {
                self.session.stop_speaking();
            }
            if ui.button("💾 Download").clicked() {
                match self.session.export_result(&self.export_dir) {
                    Ok(path) => self.set_status(format!("Saved {}", path.display())),
                    Err(e) => self.set_status(e.to_string()),
                }
            }
        });
    }

    fn draw_favorites(&mut self, ui: &mut egui::Ui) {
        ui.heading("Favorites");
        if self.session.favorites().is_empty() {
            ui.label(egui::RichText::new("Nothing saved yet.").color(MUTED_COLOR));
            return;
        }

        let mut remove = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for (index, entry) in self.session.favorites().iter().enumerate() {
                egui::Frame::group(ui.style()).show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.horizontal(|ui| {
                        ui.label(entry.as_str());
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            if ui.small_button("✕").on_hover_text("Remove").clicked() {
                                remove = Some(index);
                            }
                        });
                    });
                });
            }
        });

        if let Some(index) = remove {
            self.session.remove_favorite(index);
        }
    }
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for ShayariApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        if let Some(notice) = self.session.take_notice() {
            self.set_status(notice);
        }
        self.expire_status();

        // Outcomes and engine callbacks arrive off-frame; keep polling while
        // anything is in flight.
        if self.session.generation_state().is_busy() || self.session.speech_state().is_busy() {
            ctx.request_repaint_after(Duration::from_millis(100));
        } else if self.status.is_some() {
            ctx.request_repaint_after(Duration::from_millis(500));
        }

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let speech = self.session.speech_state();
                if speech.is_busy() {
                    ui.label(egui::RichText::new(speech.label()).color(ACCENT_COLOR));
                }
                if let Some((message, _)) = &self.status {
                    ui.label(egui::RichText::new(message.as_str()).color(MUTED_COLOR));
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading(egui::RichText::new("Shayari Studio").color(ACCENT_COLOR));
            ui.add_space(6.0);
            self.draw_inputs(ui);
            ui.add_space(6.0);
            self.draw_generate(ui);
            ui.separator();
            self.draw_result(ui);
            ui.separator();
            self.draw_favorites(ui);
        });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.session.cancel_generation();
        self.session.stop_speaking();
        self.session.stop_listening();
        log::info!("Shayari Studio closing");
    }
}
