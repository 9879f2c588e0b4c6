//! Application shell: routes, overlays and the message funnel.
//!
//! Every state change flows through [`AppMessage`]. Input handlers and
//! spawned commands only ever send messages; `handle_messages` is the one
//! place that mutates the app, so surface toggles stay race-free and each
//! open/close is a guarded no-op when already in the target state.

use std::sync::Arc;

use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::{debug, error};

use crate::catalog;
use crate::command::{Command, CopyTextCmd};
use crate::config::{
    DialogAction, FormAction, GlobalAction, HomeAction, KeyResolver, NavAction, SearchAction,
};
use crate::intake::{FollowUp, IntakeFlow, IntakeMsg, IntakeUpdate, Notice};
use crate::screen::{
    HomeEvent, HomeScreen, NearbyEvent, NearbyScreen, QueueForm, QueueFormEvent, ServicePicker,
    ServicePickerEvent,
};
use crate::theme::Theme;
use crate::tui::{Event, Tui};
use crate::ui::{AlertDialog, AlertEvent, EventResult, Hint, StatusBar};

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

/// Everything that can happen to the app, funneled through one channel.
#[derive(Debug)]
pub enum AppMessage {
    Tick,
    Render,
    Resize(u16, u16),
    ClearScreen,
    Quit,
    Suspend,
    Resume,
    OpenServicePicker,
    CloseServicePicker,
    /// Open the queue form for the named venue.
    OpenQueueForm(String),
    CloseQueueForm,
    DismissAlert,
    CopyAlertDetails,
    GoHome,
    /// Show a short status-bar confirmation.
    Flash(String),
    Intake(IntakeMsg),
}

enum Route {
    Home(HomeScreen),
    Nearby(NearbyScreen),
}

pub struct App {
    route: Route,
    picker: Option<ServicePicker>,
    queue_form: Option<QueueForm>,
    alert: Option<AlertDialog>,
    status_bar: StatusBar,
    flow: IntakeFlow,
    theme: Theme,
    resolver: Arc<KeyResolver>,
    message_tx: UnboundedSender<AppMessage>,
    message_rx: UnboundedReceiver<AppMessage>,
    should_quit: bool,
    should_suspend: bool,
}

impl App {
    pub fn new(flow: IntakeFlow, resolver: Arc<KeyResolver>, theme: Theme) -> Self {
        let (message_tx, message_rx) = mpsc::unbounded_channel();
        Self {
            route: Route::Home(HomeScreen::new(Arc::clone(&resolver))),
            picker: None,
            queue_form: None,
            alert: None,
            status_bar: StatusBar::new(),
            flow,
            theme,
            resolver,
            message_tx,
            message_rx,
            should_quit: false,
            should_suspend: false,
        }
    }

    /// Queue a `--service` selection so it runs through the normal path
    /// before the first frame.
    pub fn preselect_service(&self, id: &str) -> Result<()> {
        if catalog::category_by_id(id).is_none() {
            let available = catalog::CATEGORIES
                .iter()
                .map(|category| category.id)
                .collect::<Vec<_>>()
                .join(", ");
            return Err(eyre!("unknown service {id:?} (available: {available})"));
        }
        self.message_tx
            .send(AppMessage::Intake(IntakeMsg::ServiceChosen(id.to_string())))?;
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new(60.0, 4.0)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            self.handle_messages(&mut tui)?;
            if self.should_suspend {
                tui.suspend()?;
                self.message_tx.send(AppMessage::Resume)?;
                self.message_tx.send(AppMessage::ClearScreen)?;
                tui.enter()?;
            } else if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> Result<()> {
        let Some(event) = tui.next_event().await else {
            return Ok(());
        };

        match event {
            Event::Init => {}
            Event::Quit => self.message_tx.send(AppMessage::Quit)?,
            Event::Error(message) => error!("terminal event error: {message}"),
            Event::Tick => self.message_tx.send(AppMessage::Tick)?,
            Event::Render => self.message_tx.send(AppMessage::Render)?,
            Event::Resize(width, height) => {
                self.message_tx.send(AppMessage::Resize(width, height))?;
            }
            Event::Key(key) => self.handle_key(key)?,
        }
        Ok(())
    }

    /// Top-most surface wins: alert, then form, then picker, then the
    /// route screen, then the global bindings.
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('z') {
            self.message_tx.send(AppMessage::Suspend)?;
            return Ok(());
        }

        if let Some(alert) = &mut self.alert {
            match alert.handle_key(key) {
                EventResult::Event(AlertEvent::Dismissed) => {
                    self.message_tx.send(AppMessage::DismissAlert)?;
                }
                EventResult::Event(AlertEvent::CopyRequested) => {
                    self.message_tx.send(AppMessage::CopyAlertDetails)?;
                }
                _ => {}
            }
            return Ok(());
        }

        if let Some(form) = &mut self.queue_form {
            match form.handle_key(key) {
                EventResult::Event(QueueFormEvent::Submitted { name, phone }) => {
                    self.message_tx
                        .send(AppMessage::Intake(IntakeMsg::QueueSubmitted { name, phone }))?;
                }
                EventResult::Event(QueueFormEvent::Cancelled) => {
                    self.message_tx.send(AppMessage::CloseQueueForm)?;
                }
                _ => {}
            }
            return Ok(());
        }

        if let Some(picker) = &mut self.picker {
            match picker.handle_key(key) {
                EventResult::Event(ServicePickerEvent::Selected(id)) => {
                    self.message_tx
                        .send(AppMessage::Intake(IntakeMsg::ServiceChosen(id)))?;
                }
                EventResult::Event(ServicePickerEvent::Cancelled) => {
                    self.message_tx.send(AppMessage::CloseServicePicker)?;
                }
                _ => {}
            }
            return Ok(());
        }

        let handled = match &mut self.route {
            Route::Home(home) => match home.handle_key(key) {
                EventResult::Event(HomeEvent::ChooseService) => {
                    self.message_tx.send(AppMessage::OpenServicePicker)?;
                    true
                }
                result => result.is_consumed(),
            },
            Route::Nearby(nearby) => match nearby.handle_key(key) {
                EventResult::Event(NearbyEvent::Join(venue)) => {
                    self.message_tx.send(AppMessage::OpenQueueForm(venue))?;
                    true
                }
                result => result.is_consumed(),
            },
        };
        if handled {
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.message_tx.send(AppMessage::Quit)?;
        } else if self.resolver.matches_global(&key, GlobalAction::Back)
            && matches!(self.route, Route::Nearby(_))
        {
            self.message_tx.send(AppMessage::GoHome)?;
        }
        Ok(())
    }

    fn handle_messages(&mut self, tui: &mut Tui) -> Result<()> {
        while let Ok(message) = self.message_rx.try_recv() {
            if !matches!(message, AppMessage::Tick | AppMessage::Render) {
                debug!("handling {message:?}");
            }
            if let Err(err) = self.handle_message(message, tui) {
                error!("message handling failed: {err}");
                self.show_alert(Notice::error(GENERIC_FAILURE));
            }
        }
        Ok(())
    }

    fn handle_message(&mut self, message: AppMessage, tui: &mut Tui) -> Result<()> {
        match message {
            AppMessage::Tick => self.handle_tick(),
            AppMessage::Render => self.render(tui)?,
            AppMessage::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            AppMessage::ClearScreen => tui.clear()?,
            AppMessage::Quit => self.should_quit = true,
            AppMessage::Suspend => self.should_suspend = true,
            AppMessage::Resume => self.should_suspend = false,
            AppMessage::OpenServicePicker => self.open_service_picker(),
            AppMessage::CloseServicePicker => self.close_service_picker(),
            AppMessage::OpenQueueForm(venue) => self.open_queue_form(venue),
            AppMessage::CloseQueueForm => self.close_queue_form(),
            AppMessage::DismissAlert => self.dismiss_alert(),
            AppMessage::CopyAlertDetails => self.copy_alert_details(),
            AppMessage::GoHome => self.go_home(),
            AppMessage::Flash(text) => self.status_bar.flash(text),
            AppMessage::Intake(msg) => self.flow_update(msg),
        }
        Ok(())
    }

    fn handle_tick(&mut self) {
        self.status_bar.handle_tick();
        if let Route::Home(home) = &mut self.route {
            home.handle_tick();
        }
    }

    fn open_service_picker(&mut self) {
        if self.picker.is_none() {
            self.picker = Some(ServicePicker::new(Arc::clone(&self.resolver)));
        }
    }

    fn close_service_picker(&mut self) {
        self.picker = None;
    }

    fn open_queue_form(&mut self, venue: String) {
        if self.queue_form.is_none() {
            self.queue_form = Some(QueueForm::new(venue.clone(), Arc::clone(&self.resolver)));
            self.flow_update(IntakeMsg::QueueOpened(venue));
        }
    }

    fn close_queue_form(&mut self) {
        // Only a form that actually closed may clear the flow context.
        if self.queue_form.take().is_some() {
            self.flow_update(IntakeMsg::QueueClosed);
        }
    }

    fn dismiss_alert(&mut self) {
        if let Some(alert) = self.alert.take()
            && let Some(FollowUp::ShowNearby) = alert.notice().follow_up
        {
            self.show_nearby();
        }
    }

    fn copy_alert_details(&mut self) {
        if let Some(alert) = &self.alert
            && let Some(text) = alert.notice().copy_text.clone()
        {
            self.spawn_command(Box::new(CopyTextCmd::new(text, "queue details")));
        }
    }

    fn go_home(&mut self) {
        self.route = Route::Home(HomeScreen::new(Arc::clone(&self.resolver)));
    }

    fn flow_update(&mut self, msg: IntakeMsg) {
        let update = self.flow.update(msg);
        self.apply_update(update);
    }

    fn apply_update(&mut self, update: IntakeUpdate) {
        match update {
            IntakeUpdate::Idle => {}
            IntakeUpdate::Selected(commands) => {
                self.picker = None;
                for command in commands {
                    self.spawn_command(command);
                }
            }
            IntakeUpdate::ShowNearby => self.show_nearby(),
            IntakeUpdate::Alert(notice) => self.show_alert(notice),
            IntakeUpdate::Accepted(request) => {
                self.queue_form = None;
                self.show_alert(Notice::confirmation(&request));
            }
        }
    }

    fn show_nearby(&mut self) {
        let Some(category) = self.flow.category() else {
            debug!("nearby requested without a category");
            return;
        };
        self.route = Route::Nearby(NearbyScreen::new(
            category,
            self.flow.location(),
            Arc::clone(&self.resolver),
        ));
    }

    fn show_alert(&mut self, notice: Notice) {
        self.alert = Some(AlertDialog::new(notice, Arc::clone(&self.resolver)));
    }

    fn spawn_command(&self, command: Box<dyn Command>) {
        let message_tx = self.message_tx.clone();
        tokio::spawn(async move {
            let name = command.name();
            debug!("running {name}");
            if let Err(err) = command.execute(message_tx.clone()).await {
                error!("{name} failed: {err}");
                let _ = message_tx.send(AppMessage::Flash(format!("{name} failed")));
            }
        });
    }

    fn render(&mut self, tui: &mut Tui) -> Result<()> {
        tui.draw(|frame| {
            let [body, status] = Layout::vertical([Constraint::Fill(1), Constraint::Length(3)])
                .areas(frame.area());

            match &mut self.route {
                Route::Home(home) => {
                    home.set_locating(self.flow.is_locating());
                    home.render(frame, body, &self.theme);
                }
                Route::Nearby(nearby) => nearby.render(frame, body, &self.theme),
            }

            let selection = self.flow.category().map(|category| category.name);
            let hints = self.hints();
            self.status_bar
                .render(frame, status, &self.theme, selection, &hints);

            if let Some(picker) = &mut self.picker {
                picker.render(frame, body, &self.theme);
            }
            if let Some(form) = &mut self.queue_form {
                form.render(frame, body, &self.theme);
            }
            if let Some(alert) = &mut self.alert {
                alert.render(frame, body, &self.theme);
            }
        })?;
        Ok(())
    }

    fn hints(&self) -> Vec<Hint> {
        if let Some(alert) = &self.alert {
            let mut hints = vec![Hint::new(
                self.resolver.display_dialog(DialogAction::Dismiss),
                "dismiss",
            )];
            if alert.notice().copy_text.is_some() {
                hints.push(Hint::new(
                    self.resolver.display_dialog(DialogAction::Copy),
                    "copy details",
                ));
            }
            return hints;
        }
        if self.queue_form.is_some() {
            return vec![
                Hint::new(self.resolver.display_form(FormAction::Submit), "join"),
                Hint::new(self.resolver.display_form(FormAction::NextField), "next"),
                Hint::new(self.resolver.display_form(FormAction::Cancel), "cancel"),
            ];
        }
        if self.picker.is_some() {
            return vec![
                Hint::new(self.resolver.display_nav(NavAction::Select), "select"),
                Hint::new(self.resolver.display_global(GlobalAction::Back), "close"),
            ];
        }
        match self.route {
            Route::Home(_) => vec![
                Hint::new(
                    self.resolver.display_home(HomeAction::ChooseService),
                    "choose service",
                ),
                Hint::new(self.resolver.display_global(GlobalAction::Quit), "quit"),
            ],
            Route::Nearby(_) => vec![
                Hint::new(self.resolver.display_nav(NavAction::Select), "join"),
                Hint::new(self.resolver.display_search(SearchAction::Toggle), "filter"),
                Hint::new(self.resolver.display_global(GlobalAction::Back), "home"),
                Hint::new(self.resolver.display_global(GlobalAction::Quit), "quit"),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeybindingsConfig;
    use crate::intake::LocationOutcome;
    use crate::location::{FixRequest, LocationFix, StubProvider};
    use crate::store::MemoryStore;

    fn test_app(provider: StubProvider) -> App {
        let store = Arc::new(MemoryStore::new());
        let flow = IntakeFlow::new(store, Arc::new(provider), FixRequest::default());
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        App::new(flow, resolver, Theme::default())
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn quit_key_reaches_the_funnel_only_from_the_base_layer() {
        let mut app = test_app(StubProvider::hanging());

        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(matches!(app.message_rx.try_recv(), Ok(AppMessage::Quit)));

        // With the picker open the same key is swallowed by the modal.
        app.open_service_picker();
        app.handle_key(key(KeyCode::Char('q'))).unwrap();
        assert!(app.message_rx.try_recv().is_err());
    }

    #[test]
    fn ctrl_z_requests_suspension() {
        let mut app = test_app(StubProvider::hanging());
        app.handle_key(KeyEvent::new(KeyCode::Char('z'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(matches!(app.message_rx.try_recv(), Ok(AppMessage::Suspend)));
    }

    #[test]
    fn picker_toggles_are_guarded() {
        let mut app = test_app(StubProvider::hanging());

        app.open_service_picker();
        assert!(app.picker.is_some());
        app.open_service_picker();
        assert!(app.picker.is_some());

        app.close_service_picker();
        assert!(app.picker.is_none());
        app.close_service_picker();
        assert!(app.picker.is_none());
    }

    #[tokio::test]
    async fn selection_closes_the_picker_and_starts_locating() {
        let mut app = test_app(StubProvider::hanging());
        app.open_service_picker();

        app.flow_update(IntakeMsg::ServiceChosen("pharmacy".to_string()));

        assert!(app.picker.is_none());
        assert!(app.flow.is_locating());
        assert!(matches!(app.route, Route::Home(_)));
    }

    #[tokio::test]
    async fn fix_resolution_switches_to_the_nearby_screen() {
        let mut app = test_app(StubProvider::hanging());
        app.flow_update(IntakeMsg::ServiceChosen("pharmacy".to_string()));

        app.flow_update(IntakeMsg::LocationResolved {
            seq: 0,
            outcome: LocationOutcome::Fix(LocationFix {
                lat: 38.7,
                lng: -9.1,
            }),
        });

        assert!(matches!(app.route, Route::Nearby(_)));
        assert!(app.alert.is_none());
    }

    #[tokio::test]
    async fn denied_location_alerts_first_and_reaches_nearby_on_dismiss() {
        let mut app = test_app(StubProvider::hanging());
        app.flow_update(IntakeMsg::ServiceChosen("pharmacy".to_string()));

        app.flow_update(IntakeMsg::LocationResolved {
            seq: 0,
            outcome: LocationOutcome::Denied("permission refused".to_string()),
        });

        assert!(app.alert.is_some());
        assert!(matches!(app.route, Route::Home(_)));

        app.dismiss_alert();

        assert!(app.alert.is_none());
        assert!(matches!(app.route, Route::Nearby(_)));
    }

    #[tokio::test]
    async fn opening_the_form_twice_keeps_the_first_venue() {
        let mut app = test_app(StubProvider::hanging());

        app.open_queue_form("Central Pharmacy".to_string());
        app.open_queue_form("Harbor Pharmacy".to_string());

        app.flow_update(IntakeMsg::QueueSubmitted {
            name: "Ana Reis".to_string(),
            phone: "5551234567".to_string(),
        });

        assert!(app.queue_form.is_none());
        let alert = app.alert.as_ref().unwrap();
        assert!(alert.notice().message.contains("Central Pharmacy"));
        assert!(alert.notice().copy_text.is_some());
    }

    #[tokio::test]
    async fn escape_from_nearby_goes_home() {
        let mut app = test_app(StubProvider::hanging());
        app.flow_update(IntakeMsg::ServiceChosen("bank".to_string()));
        app.flow_update(IntakeMsg::LocationResolved {
            seq: 0,
            outcome: LocationOutcome::Fix(LocationFix {
                lat: 38.7,
                lng: -9.1,
            }),
        });
        assert!(matches!(app.route, Route::Nearby(_)));

        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(matches!(app.message_rx.try_recv(), Ok(AppMessage::GoHome)));

        app.go_home();
        assert!(matches!(app.route, Route::Home(_)));
    }

    #[test]
    fn rejecting_an_unknown_cli_service_lists_the_catalog() {
        let app = test_app(StubProvider::hanging());
        let error = app.preselect_service("spa").unwrap_err();
        assert!(error.to_string().contains("hospital"));
    }
}
