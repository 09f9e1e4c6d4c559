//! Dashboard, grammar check and reply generator.

use eframe::egui;

use super::{card_frame, error_banner, heading, Services, ACCENT, MUTED, PINK, SUCCESS};
use crate::prompt::reply::EXAMPLE_CONTEXTS;
use crate::prompt::{Platform, Tone};
use crate::router::Route;
use crate::screens::dashboard::TIPS;
use crate::screens::grammar::EXAMPLE_SENTENCES;
use crate::screens::{Dashboard, GrammarCheck, ReplyGenerator};

pub fn dashboard(ui: &mut egui::Ui, screen: &Dashboard<'_>) -> Option<Route> {
    let mut target = None;
    heading(ui, &screen.greeting(), "Ready to practice your English today?");

    ui.horizontal(|ui| {
        card_frame().show(ui, |ui| {
            ui.label(egui::RichText::new("AI Provider").color(ACCENT));
            ui.label(egui::RichText::new(screen.provider_name()).strong());
        });
        card_frame().show(ui, |ui| {
            ui.label(egui::RichText::new("Native Language").color(PINK));
            ui.label(egui::RichText::new(screen.native_language()).strong());
        });
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Choose Your Practice Mode").size(18.0).strong());
    egui::Grid::new("features")
        .num_columns(3)
        .spacing([12.0, 12.0])
        .show(ui, |ui| {
            for (i, feature) in screen.features().iter().enumerate() {
                let text = format!("{}  {}\n{}", feature.icon, feature.title, feature.description);
                if ui
                    .add(egui::Button::new(text).min_size(egui::vec2(240.0, 72.0)))
                    .clicked()
                {
                    target = Some(feature.route);
                }
                if i % 3 == 2 {
                    ui.end_row();
                }
            }
        });

    ui.add_space(8.0);
    card_frame().show(ui, |ui| {
        ui.label(egui::RichText::new("💡 Tips for Better Learning").strong());
        for tip in TIPS {
            ui.label(format!("• {tip}"));
        }
    });
    target
}

pub fn grammar(ui: &mut egui::Ui, screen: &mut GrammarCheck, services: &mut Services<'_>) {
    screen.update();
    heading(ui, "Grammar Check", "Type a sentence and get it corrected instantly");

    ui.add(
        egui::TextEdit::multiline(&mut screen.input)
            .hint_text("Type or paste your sentence here...")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );

    ui.horizontal(|ui| {
        let can_check = !screen.is_processing() && !screen.input.trim().is_empty();
        if ui
            .add_enabled(can_check, egui::Button::new("Check Grammar"))
            .clicked()
        {
            screen.submit(services.relay, services.profile);
        }
        if screen.is_processing() {
            ui.add(egui::Spinner::new());
            ui.label(egui::RichText::new("Checking...").color(MUTED));
        }
    });

    ui.label(egui::RichText::new("Try an example:").color(MUTED));
    ui.horizontal_wrapped(|ui| {
        for sentence in EXAMPLE_SENTENCES {
            if ui.small_button(sentence).clicked() {
                screen.use_example(sentence);
            }
        }
    });

    error_banner(ui, screen.error());

    if !screen.corrections().is_empty() {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("Corrections").size(18.0).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Clear History").clicked() {
                    screen.clear_history();
                }
            });
        });
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            for correction in screen.corrections() {
                card_frame().show(ui, |ui| {
                    ui.set_width(ui.available_width());
                    ui.label(egui::RichText::new("Original").color(MUTED).small());
                    ui.label(egui::RichText::new(&correction.original).strikethrough());
                    ui.label(egui::RichText::new("Corrected").color(SUCCESS).small());
                    ui.label(egui::RichText::new(&correction.corrected).strong().color(SUCCESS));
                    ui.label(
                        egui::RichText::new(correction.timestamp.format("%H:%M:%S").to_string())
                            .color(MUTED)
                            .small(),
                    );
                });
            }
        });
}

pub fn reply(
    ui: &mut egui::Ui,
    egui_ctx: &egui::Context,
    screen: &mut ReplyGenerator,
    services: &mut Services<'_>,
) {
    screen.update();
    heading(ui, "Reply Generator", "Generate smart replies for any conversation");

    ui.label("Conversation context");
    let mut context = screen.context().to_string();
    let response = ui.add(
        egui::TextEdit::multiline(&mut context)
            .hint_text("Paste the message you need to reply to... (e.g., email content, WhatsApp message, etc.)")
            .desired_rows(5)
            .desired_width(f32::INFINITY),
    );
    if response.changed() {
        screen.set_context(context);
    }

    if !screen.show_options() {
        ui.label(egui::RichText::new("Or try an example:").color(MUTED));
        for example in EXAMPLE_CONTEXTS {
            if ui.small_button(example).clicked() {
                screen.use_example(example);
            }
        }
    } else {
        ui.label(egui::RichText::new("Select Tone").strong());
        ui.horizontal_wrapped(|ui| {
            for tone in Tone::ALL {
                let text = format!("{} {}", tone.icon(), tone.label());
                if ui
                    .selectable_label(screen.tone == Some(tone), text)
                    .on_hover_text(tone.description())
                    .clicked()
                {
                    screen.tone = Some(tone);
                }
            }
        });
        ui.label(egui::RichText::new("Select Platform").strong());
        ui.horizontal_wrapped(|ui| {
            for platform in Platform::ALL {
                let text = format!("{} {}", platform.icon(), platform.label());
                if ui
                    .selectable_label(screen.platform == Some(platform), text)
                    .clicked()
                {
                    screen.platform = Some(platform);
                }
            }
        });
    }

    ui.horizontal(|ui| {
        if ui
            .add_enabled(!screen.is_processing(), egui::Button::new("✨ Generate Reply"))
            .clicked()
        {
            screen.generate(services.relay, services.profile);
        }
        if ui.button("Reset").clicked() {
            screen.reset();
        }
        if screen.is_processing() {
            ui.add(egui::Spinner::new());
        }
    });

    error_banner(ui, screen.error());

    if let Some(text) = screen.reply().map(str::to_string) {
        card_frame().show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new("Your Reply").strong().color(SUCCESS));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let label = if screen.recently_copied() { "Copied!" } else { "Copy" };
                    if ui.button(label).clicked() {
                        egui_ctx.copy_text(text.clone());
                        screen.mark_copied();
                    }
                });
            });
            ui.label(&text);
        });
    }
}
