//! Onboarding and settings forms.

use eframe::egui;

use super::{card_frame, error_banner, heading, ACCENT, MUTED};
use crate::profile::{AppContext, Provider, NATIVE_LANGUAGES};
use crate::router::Route;
use crate::screens::{Onboarding, OnboardingStep, ProfileForm, Settings};

fn language_picker(ui: &mut egui::Ui, id: &str, value: &mut String) {
    let selected = NATIVE_LANGUAGES
        .iter()
        .find(|(v, _)| *v == value.as_str())
        .map(|(_, label)| *label)
        .unwrap_or(if value.is_empty() { "Choose language" } else { value.as_str() })
        .to_string();
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .show_ui(ui, |ui| {
            for (stored, label) in NATIVE_LANGUAGES {
                ui.selectable_value(value, stored.to_string(), *label);
            }
        });
}

fn provider_cards(ui: &mut egui::Ui, selected: &mut Option<Provider>) {
    ui.horizontal(|ui| {
        for provider in Provider::ALL {
            let blurb = match provider {
                Provider::Gemini => "Fast and reliable AI responses",
                _ => "Ultra-fast inference speed",
            };
            let text = format!("{}\n{}", provider.display_name(), blurb);
            if ui
                .selectable_label(*selected == Some(provider), text)
                .clicked()
            {
                *selected = Some(provider);
            }
        }
    });
}

fn api_key_field(ui: &mut egui::Ui, form: &mut ProfileForm) {
    let provider = form.provider.unwrap_or(Provider::Unknown);
    ui.label(provider.key_label());
    ui.add(
        egui::TextEdit::singleline(&mut form.api_key)
            .password(true)
            .hint_text(format!(
                "Enter your {} API key",
                if provider == Provider::Gemini { "Gemini" } else { "Groq" }
            )),
    );
    if let Some(url) = provider.key_help_url() {
        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("🔑 Get your free API key from:").color(MUTED));
            ui.hyperlink(url);
        });
    }
}

pub fn onboarding(ui: &mut egui::Ui, screen: &mut Onboarding, ctx: &mut AppContext) -> Option<Route> {
    heading(
        ui,
        "Welcome to English AI Practice",
        "Let's set up your personalized learning experience",
    );
    let step_label = match screen.step {
        OnboardingStep::PersonalInfo => "Step 1 of 2 · Personal Info",
        OnboardingStep::AiSetup => "Step 2 of 2 · AI Setup",
    };
    ui.label(egui::RichText::new(step_label).color(ACCENT));

    card_frame().show(ui, |ui| match screen.step {
        OnboardingStep::PersonalInfo => {
            ui.label("What's your name?");
            ui.add(egui::TextEdit::singleline(&mut screen.form.name).hint_text("Enter your name"));
            ui.label("Select your native language");
            language_picker(ui, "onboarding_language", &mut screen.form.native_language);
        }
        OnboardingStep::AiSetup => {
            ui.label("Choose AI Provider");
            provider_cards(ui, &mut screen.form.provider);
            if screen.form.provider.is_some() {
                api_key_field(ui, &mut screen.form);
            }
        }
    });

    error_banner(ui, screen.error());

    let mut done = false;
    ui.horizontal(|ui| {
        if screen.step == OnboardingStep::AiSetup && ui.button("Back").clicked() {
            screen.back();
        }
        let label = match screen.step {
            OnboardingStep::PersonalInfo => "Continue",
            OnboardingStep::AiSetup => "Get Started",
        };
        if ui
            .add_enabled(screen.can_continue(), egui::Button::new(label))
            .clicked()
        {
            done = screen.submit(ctx);
        }
    });
    done.then_some(Route::Dashboard)
}

pub fn settings(
    ui: &mut egui::Ui,
    egui_ctx: &egui::Context,
    screen: &mut Settings,
    ctx: &mut AppContext,
) -> Option<Route> {
    heading(ui, "Settings", "Manage your profile and AI provider");

    card_frame().show(ui, |ui| {
        ui.add_enabled_ui(screen.is_editing(), |ui| {
            ui.label("Name");
            ui.text_edit_singleline(&mut screen.form.name);
            ui.label("Native language");
            language_picker(ui, "settings_language", &mut screen.form.native_language);
            ui.label("AI provider");
            provider_cards(ui, &mut screen.form.provider);
            api_key_field(ui, &mut screen.form);
        });
    });

    error_banner(ui, screen.error());

    ui.horizontal(|ui| {
        if screen.is_editing() {
            if ui.button("Save Changes").clicked() {
                screen.save(ctx);
            }
            if ui.button("Cancel").clicked() {
                screen.cancel(ctx);
            }
        } else if ui.button("Edit Profile").clicked() {
            screen.edit();
        }
    });

    ui.add_space(16.0);
    ui.label(egui::RichText::new("Danger Zone").strong().color(super::ERROR));
    ui.label(
        egui::RichText::new("Delete your profile, API key and conversation history from this computer.")
            .color(MUTED),
    );
    if ui.button("Delete All Data").clicked() {
        screen.request_delete();
    }

    let mut route = None;
    if screen.is_confirming_delete() {
        egui::Window::new("Delete all data?")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(egui_ctx, |ui| {
                ui.label("This will permanently delete your profile and settings. This action cannot be undone.");
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        screen.cancel_delete();
                    }
                    if ui
                        .button(egui::RichText::new("Delete Everything").color(super::ERROR))
                        .clicked()
                        && screen.confirm_delete(ctx)
                    {
                        route = Some(Route::Onboarding);
                    }
                });
            });
    }
    route
}
