//! egui rendering for the screens.
//!
//! Draw functions take a controller plus whatever services it needs and
//! return `Some(route)` when the user asked to go somewhere else.  All
//! state lives in the controllers; nothing here outlives a frame.

pub mod chat;
pub mod forms;
pub mod tools;

use eframe::egui;

use crate::format::{format_message, Span};
use crate::profile::Profile;
use crate::relay::RelayWorker;
use crate::router::Route;
use crate::screens::{Message, Role};
use crate::speech::SpeechAdapter;

/// What the chat and tool screens need besides their own state.
pub struct Services<'a> {
    pub speech: &'a mut SpeechAdapter,
    pub relay: &'a RelayWorker,
    pub profile: &'a Profile,
}

// ── Palette ──────────────────────────────────────────────────────────────

pub const ACCENT: egui::Color32 = egui::Color32::from_rgb(99, 102, 241);
pub const PINK: egui::Color32 = egui::Color32::from_rgb(236, 72, 153);
pub const SUCCESS: egui::Color32 = egui::Color32::from_rgb(80, 200, 120);
pub const ERROR: egui::Color32 = egui::Color32::from_rgb(255, 136, 68);
pub const MUTED: egui::Color32 = egui::Color32::from_rgb(150, 150, 150);
pub const PANEL: egui::Color32 = egui::Color32::from_rgb(30, 30, 38);
pub const CARD: egui::Color32 = egui::Color32::from_rgb(42, 42, 54);
pub const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(67, 56, 202);
pub const TUTOR_BUBBLE: egui::Color32 = egui::Color32::from_rgb(48, 48, 62);

pub fn apply_theme(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals::dark());
    ctx.style_mut(|style| {
        style.spacing.item_spacing = egui::vec2(8.0, 8.0);
        style.spacing.button_padding = egui::vec2(10.0, 6.0);
    });
}

pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(CARD)
        .corner_radius(egui::CornerRadius::same(10))
        .inner_margin(egui::Margin::same(12))
}

// ── Shared widgets ───────────────────────────────────────────────────────

/// Top navigation bar.  Returns the clicked route.
pub fn nav_bar(ui: &mut egui::Ui, current: Route) -> Option<Route> {
    let mut target = None;
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("English AI").color(ACCENT).strong().size(16.0));
        ui.separator();
        for route in Route::NAV {
            if ui
                .selectable_label(current == route, route.nav_label())
                .clicked()
            {
                target = Some(route);
            }
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .selectable_label(current == Route::Settings, "⚙ Settings")
                .clicked()
            {
                target = Some(Route::Settings);
            }
        });
    });
    target
}

pub fn heading(ui: &mut egui::Ui, title: &str, subtitle: &str) {
    ui.label(egui::RichText::new(title).size(24.0).strong());
    if !subtitle.is_empty() {
        ui.label(egui::RichText::new(subtitle).color(MUTED));
    }
    ui.add_space(6.0);
}

pub fn error_banner(ui: &mut egui::Ui, error: Option<&str>) {
    if let Some(message) = error {
        egui::Frame::new()
            .fill(egui::Color32::from_rgba_premultiplied(80, 30, 10, 200))
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.label(egui::RichText::new(message).color(ERROR));
            });
    }
}

/// Tutor text with `**bold**` and quoted phrases emphasised.
pub fn rich_text(ui: &mut egui::Ui, text: &str) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in format_message(text) {
            match span {
                Span::Strong(s) => ui.label(egui::RichText::new(s).strong().color(egui::Color32::WHITE)),
                Span::Plain(s) => ui.label(s),
            };
        }
    });
}

pub fn message_bubble(ui: &mut egui::Ui, message: &Message) {
    let (fill, align) = match message.role {
        Role::User => (USER_BUBBLE, egui::Align::Max),
        Role::Assistant => (TUTOR_BUBBLE, egui::Align::Min),
    };
    ui.with_layout(egui::Layout::top_down(align), |ui| {
        ui.set_max_width(ui.available_width() * 0.8);
        egui::Frame::new()
            .fill(fill)
            .corner_radius(egui::CornerRadius::same(10))
            .inner_margin(egui::Margin::same(10))
            .show(ui, |ui| match message.role {
                Role::User => {
                    ui.label(&message.content);
                }
                Role::Assistant => rich_text(ui, &message.content),
            });
    });
}

/// Scrolling transcript that follows new messages.
pub fn transcript(ui: &mut egui::Ui, messages: &[Message], processing: bool, height: f32) {
    egui::ScrollArea::vertical()
        .max_height(height)
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for message in messages {
                message_bubble(ui, message);
            }
            if processing {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.label(egui::RichText::new("Thinking...").color(MUTED));
                });
            }
        });
}

/// Single-line input with a send button.  Returns `true` on Enter or click.
pub fn send_row(ui: &mut egui::Ui, input: &mut String, enabled: bool) -> bool {
    let mut send = false;
    ui.horizontal(|ui| {
        let width = (ui.available_width() - 80.0).max(120.0);
        let response = ui.add(
            egui::TextEdit::singleline(input)
                .hint_text("Type your message...")
                .desired_width(width),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            send = true;
            response.request_focus();
        }
        let can_send = enabled && !input.trim().is_empty();
        if ui.add_enabled(can_send, egui::Button::new("Send")).clicked() {
            send = true;
        }
    });
    send && enabled
}
