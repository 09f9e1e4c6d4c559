//! Text chat, voice chat and scenario conversations.

use eframe::egui;

use super::{card_frame, error_banner, heading, send_row, transcript, Services, ACCENT, MUTED, PINK};
use crate::screens::conversations::Stage;
use crate::screens::text_chat::QUICK_PROMPTS;
use crate::screens::{ConversationMode, Conversations, TextChat, VoiceChat};

fn transcript_height(ui: &egui::Ui) -> f32 {
    (ui.available_height() - 110.0).max(160.0)
}

pub fn text_chat(ui: &mut egui::Ui, screen: &mut TextChat, services: &mut Services<'_>) {
    screen.update();

    ui.horizontal(|ui| {
        heading(ui, "Text Chat", "Have natural text conversations in English");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear").clicked() {
                screen.clear();
            }
        });
    });

    if screen.session.messages().is_empty() {
        ui.label(egui::RichText::new("Try one of these to get started:").color(MUTED));
        ui.horizontal_wrapped(|ui| {
            for prompt in QUICK_PROMPTS {
                if ui.button(prompt).clicked() {
                    screen.use_quick_prompt(prompt);
                }
            }
        });
    }

    transcript(
        ui,
        screen.session.messages(),
        screen.session.is_processing(),
        transcript_height(ui),
    );
    error_banner(ui, screen.session.error());

    if send_row(ui, &mut screen.input, !screen.session.is_processing()) {
        screen.submit(services.relay, services.profile);
    }
}

/// Microphone and speaker controls shared by the voice screens.
fn voice_controls(
    ui: &mut egui::Ui,
    listening: bool,
    speaking: bool,
    processing: bool,
) -> (bool, bool, bool) {
    let (mut start, mut stop, mut hush) = (false, false, false);
    ui.horizontal(|ui| {
        if listening {
            if ui
                .button(egui::RichText::new("⏹ Stop listening").color(PINK))
                .clicked()
            {
                stop = true;
            }
            ui.add(egui::Spinner::new());
            ui.label(egui::RichText::new("Listening...").color(PINK));
        } else {
            let enabled = !processing && !speaking;
            if ui
                .add_enabled(enabled, egui::Button::new("🎤 Tap to speak"))
                .clicked()
            {
                start = true;
            }
        }
        if speaking {
            ui.label(egui::RichText::new("🔊 Speaking...").color(ACCENT));
            if ui.button("Stop").clicked() {
                hush = true;
            }
        }
    });
    (start, stop, hush)
}

pub fn voice_chat(ui: &mut egui::Ui, screen: &mut VoiceChat, services: &mut Services<'_>) {
    screen.update(services.speech, services.relay, services.profile);

    ui.horizontal(|ui| {
        heading(ui, "Voice Chat", "Practice speaking English with AI voice responses");
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button("Clear").clicked() {
                screen.clear();
            }
        });
    });

    if screen.session.messages().is_empty() && !screen.is_listening() {
        card_frame().show(ui, |ui| {
            ui.label("Press the microphone and say something in English.");
            ui.label(egui::RichText::new("Your tutor will answer out loud.").color(MUTED));
        });
    }

    transcript(
        ui,
        screen.session.messages(),
        screen.session.is_processing(),
        transcript_height(ui),
    );
    error_banner(ui, screen.session.error());

    let (start, stop, hush) = voice_controls(
        ui,
        screen.is_listening(),
        screen.is_speaking(),
        screen.session.is_processing(),
    );
    if start {
        screen.start_listening(services.speech);
    }
    if stop {
        screen.stop_listening(services.speech);
    }
    if hush {
        screen.stop_speaking(services.speech);
    }
}

pub fn conversations(ui: &mut egui::Ui, screen: &mut Conversations, services: &mut Services<'_>) {
    screen.update(services.speech, services.relay, services.profile);

    match screen.stage() {
        Stage::ChooseScenario => {
            heading(ui, "Practice Scenarios", "Choose a real-life scenario to practice your English");
            egui::Grid::new("scenarios")
                .num_columns(3)
                .spacing([12.0, 12.0])
                .show(ui, |ui| {
                    for (i, scenario) in screen.scenarios().iter().enumerate() {
                        let text = format!(
                            "{}  {}\n{}",
                            scenario.icon, scenario.title, scenario.description
                        );
                        if ui.add(egui::Button::new(text).min_size(egui::vec2(220.0, 64.0))).clicked() {
                            screen.select_scenario(scenario);
                        }
                        if i % 3 == 2 {
                            ui.end_row();
                        }
                    }
                });
        }
        Stage::ChooseMode(scenario) => {
            if ui.button("← Back").clicked() {
                screen.back();
            }
            heading(
                ui,
                &format!("{} {}", scenario.icon, scenario.title),
                scenario.description,
            );
            ui.label(egui::RichText::new("Choose Your Mode").strong());
            ui.horizontal(|ui| {
                if ui
                    .button("🎤 Voice Conversation\nPractice speaking with voice input and responses")
                    .clicked()
                {
                    screen.start(ConversationMode::Voice, services.speech);
                }
                if ui
                    .button("💬 Text Conversation\nPractice writing with text-based chat")
                    .clicked()
                {
                    screen.start(ConversationMode::Text, services.speech);
                }
            });
        }
        Stage::Chat(scenario, mode) => {
            ui.horizontal(|ui| {
                heading(ui, &format!("{} {}", scenario.icon, scenario.title), "");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("New Scenario").clicked() {
                        screen.reset(services.speech);
                    }
                });
            });
            transcript(
                ui,
                screen.session.messages(),
                screen.session.is_processing(),
                transcript_height(ui),
            );
            error_banner(ui, screen.session.error());

            let processing = screen.session.is_processing();
            let send_enabled = !processing && !screen.is_listening();
            if send_row(ui, &mut screen.input, send_enabled) {
                screen.submit_text(services.relay, services.profile);
            }
            if mode == ConversationMode::Voice {
                let (start, stop, hush) =
                    voice_controls(ui, screen.is_listening(), screen.is_speaking(), processing);
                if start {
                    screen.start_voice_input(services.speech);
                }
                if stop {
                    screen.stop_listening(services.speech);
                }
                if hush {
                    screen.stop_speaking(services.speech);
                }
            }
        }
    }
}
