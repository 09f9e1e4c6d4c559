//! The eframe application shell.
//!
//! [`TutorApp`] owns the application context, the speech adapter and the
//! relay worker, keeps exactly one screen controller alive for the current
//! route and hands it to the matching draw function each frame.
//!
//! # Routing
//!
//! Every navigation goes through [`Route::resolve`], so without a profile
//! the only reachable screen is onboarding.  Deleting the profile from
//! settings is picked up through an [`AppContext`] observer.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use eframe::egui;

use crate::profile::AppContext;
use crate::relay::RelayWorker;
use crate::router::Route;
use crate::screens::{
    Conversations, GrammarCheck, Onboarding, ReplyGenerator, Settings, TextChat, VoiceChat,
};
use crate::speech::SpeechAdapter;
use crate::ui::{self, Services};

/// Controller for the active route.  Dropped on navigation.
enum ActiveScreen {
    Onboarding(Onboarding),
    Dashboard,
    Settings(Settings),
    VoiceChat(VoiceChat),
    TextChat(TextChat),
    Conversations(Conversations),
    GrammarCheck(GrammarCheck),
    ReplyGenerator(ReplyGenerator),
}

impl ActiveScreen {
    fn build(route: Route, ctx: &AppContext) -> Self {
        match route {
            Route::Onboarding => ActiveScreen::Onboarding(Onboarding::new()),
            Route::Dashboard => ActiveScreen::Dashboard,
            Route::Settings => ActiveScreen::Settings(Settings::new(ctx)),
            Route::VoiceChat => ActiveScreen::VoiceChat(VoiceChat::new()),
            Route::TextChat => ActiveScreen::TextChat(TextChat::new()),
            Route::Conversations => ActiveScreen::Conversations(Conversations::new()),
            Route::GrammarCheck => ActiveScreen::GrammarCheck(GrammarCheck::new()),
            Route::ReplyGenerator => ActiveScreen::ReplyGenerator(ReplyGenerator::new()),
        }
    }

    /// Whether the screen is waiting on a relay call or speech.
    fn is_busy(&self, speech: &SpeechAdapter) -> bool {
        let pending = match self {
            ActiveScreen::VoiceChat(s) => s.session.is_processing(),
            ActiveScreen::TextChat(s) => s.session.is_processing(),
            ActiveScreen::Conversations(s) => s.session.is_processing(),
            ActiveScreen::GrammarCheck(s) => s.is_processing(),
            ActiveScreen::ReplyGenerator(s) => s.is_processing() || s.recently_copied(),
            _ => false,
        };
        pending || speech.is_listening() || speech.is_speaking()
    }
}

pub struct TutorApp {
    ctx: AppContext,
    speech: SpeechAdapter,
    relay: RelayWorker,
    route: Route,
    screen: ActiveScreen,
    profile_changed: Rc<Cell<bool>>,
}

impl TutorApp {
    pub fn new(mut ctx: AppContext, speech: SpeechAdapter, relay: RelayWorker) -> Self {
        let profile_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&profile_changed);
        ctx.subscribe(move |_| flag.set(true));

        let route = Route::resolve(Route::Dashboard, ctx.has_profile());
        let screen = ActiveScreen::build(route, &ctx);
        Self {
            ctx,
            speech,
            relay,
            route,
            screen,
            profile_changed,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Switch screens.  Any capture or playback of the old screen is
    /// stopped and its state discarded.
    pub fn navigate(&mut self, requested: Route) {
        let route = Route::resolve(requested, self.ctx.has_profile());
        if route == self.route {
            return;
        }
        log::debug!("Navigate {} -> {}", self.route.path(), route.path());
        self.speech.stop_listening();
        self.speech.stop_speaking();
        self.route = route;
        self.screen = ActiveScreen::build(route, &self.ctx);
    }

    /// Re-apply the guard after the profile was saved or deleted.
    fn check_profile(&mut self) {
        if self.profile_changed.replace(false) {
            let guarded = Route::resolve(self.route, self.ctx.has_profile());
            if guarded != self.route {
                self.navigate(guarded);
            }
        }
    }

    fn draw_screen(&mut self, ui: &mut egui::Ui, egui_ctx: &egui::Context) -> Option<Route> {
        match &mut self.screen {
            ActiveScreen::Onboarding(screen) => ui::forms::onboarding(ui, screen, &mut self.ctx),
            ActiveScreen::Settings(screen) => ui::forms::settings(ui, egui_ctx, screen, &mut self.ctx),
            screen => {
                let profile = self.ctx.profile()?;
                let mut services = Services {
                    speech: &mut self.speech,
                    relay: &self.relay,
                    profile,
                };
                match screen {
                    ActiveScreen::Dashboard => {
                        return ui::tools::dashboard(ui, &crate::screens::Dashboard::new(profile));
                    }
                    ActiveScreen::VoiceChat(s) => ui::chat::voice_chat(ui, s, &mut services),
                    ActiveScreen::TextChat(s) => ui::chat::text_chat(ui, s, &mut services),
                    ActiveScreen::Conversations(s) => ui::chat::conversations(ui, s, &mut services),
                    ActiveScreen::GrammarCheck(s) => ui::tools::grammar(ui, s, &mut services),
                    ActiveScreen::ReplyGenerator(s) => {
                        ui::tools::reply(ui, egui_ctx, s, &mut services)
                    }
                    ActiveScreen::Onboarding(_) | ActiveScreen::Settings(_) => {}
                }
                None
            }
        }
    }
}

impl eframe::App for TutorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.check_profile();

        let mut target = None;
        if self.route != Route::Onboarding {
            egui::TopBottomPanel::top("nav")
                .frame(
                    egui::Frame::new()
                        .fill(ui::PANEL)
                        .inner_margin(egui::Margin::symmetric(12, 8)),
                )
                .show(ctx, |ui| {
                    target = ui::nav_bar(ui, self.route);
                });
        }

        let frame = egui::Frame::new()
            .fill(egui::Color32::from_rgb(24, 24, 32))
            .inner_margin(egui::Margin::same(16));
        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            if let Some(route) = self.draw_screen(ui, ctx) {
                target = Some(route);
            }
        });

        if let Some(route) = target {
            self.navigate(route);
        }
        self.check_profile();

        // Relay replies and speech callbacks arrive off the UI thread.
        if self.screen.is_busy(&self.speech) {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.speech.stop_listening();
        self.speech.stop_speaking();
        log::info!("English tutor closing");
    }
}
