//! The intake flow: the headless core behind the screens.
//!
//! `IntakeFlow` owns the storage and location surfaces and turns UI
//! messages into typed updates. It never touches a widget; the app shell
//! interprets the updates and drives screens, overlays and commands from
//! them.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::catalog::{self, ServiceCategory};
use crate::command::{AcquireLocationCmd, Command};
use crate::location::{FixRequest, LocationFix, LocationProvider};
use crate::request::QueueRequest;
use crate::store::{SERVICE_TYPE_KEY, SessionStore};

const SELECT_FAILED: &str = "Error selecting service. Please try again.";
const SUBMIT_FAILED: &str = "Error joining queue. Please try again.";
const LOCATION_FALLBACK: &str =
    "Location access denied. Nearby results will be approximate.";
const LOOKUP_UNSUPPORTED: &str = "Location lookup is not available on this system.";

/// How a location acquisition ended.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Fix(LocationFix),
    Denied(String),
    TimedOut,
    Unsupported,
    /// A newer selection cancelled this acquisition.
    Superseded,
}

/// Messages the flow consumes.
#[derive(Debug)]
pub enum IntakeMsg {
    /// A service category id was picked.
    ServiceChosen(String),
    /// A location acquisition finished.
    LocationResolved { seq: u64, outcome: LocationOutcome },
    /// The queue form opened for the named venue.
    QueueOpened(String),
    /// The queue form closed without acceptance.
    QueueClosed,
    /// The queue form was submitted with raw input values.
    QueueSubmitted { name: String, phone: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

/// Action the shell runs once a notice is dismissed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    ShowNearby,
}

/// A user-facing notice for the blocking alert dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub copy_text: Option<String>,
    pub follow_up: Option<FollowUp>,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::with(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with(Severity::Error, message)
    }

    fn with(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            copy_text: None,
            follow_up: None,
        }
    }

    #[must_use]
    pub fn with_copy_text(mut self, text: impl Into<String>) -> Self {
        self.copy_text = Some(text.into());
        self
    }

    #[must_use]
    pub fn then_show_nearby(mut self) -> Self {
        self.follow_up = Some(FollowUp::ShowNearby);
        self
    }

    /// The confirmation raised after a queue request is accepted, with the
    /// details available for the clipboard.
    pub fn confirmation(request: &QueueRequest) -> Self {
        let details = request.details();
        Self::success(format!("Queue joined!\n\n{details}")).with_copy_text(details)
    }
}

/// Typed outcome of one processed message.
pub enum IntakeUpdate {
    /// Nothing for the shell to do.
    Idle,
    /// Selection accepted: close the picker and spawn these.
    Selected(Vec<Box<dyn Command>>),
    /// Move to the nearby screen for the current category.
    ShowNearby,
    /// Raise the blocking notice dialog.
    Alert(Notice),
    /// A queue request was accepted: close the form and confirm.
    Accepted(QueueRequest),
}

struct PendingFix {
    seq: u64,
    cancel: CancellationToken,
}

/// State machine for the select-locate-join funnel.
///
/// One location acquisition runs at a time. Selecting again while one is
/// in flight cancels it, and completions are matched against a sequence
/// number so a cancelled lookup that still reports cannot navigate twice.
pub struct IntakeFlow {
    store: Arc<dyn SessionStore>,
    provider: Arc<dyn LocationProvider>,
    fix_request: FixRequest,
    category: Option<ServiceCategory>,
    location: Option<LocationFix>,
    pending: Option<PendingFix>,
    /// The venue the queue form is open for. Lives exactly as long as the
    /// form does.
    active_service: Option<String>,
    next_seq: u64,
}

impl IntakeFlow {
    pub fn new(
        store: Arc<dyn SessionStore>,
        provider: Arc<dyn LocationProvider>,
        fix_request: FixRequest,
    ) -> Self {
        Self {
            store,
            provider,
            fix_request,
            category: None,
            location: None,
            pending: None,
            active_service: None,
            next_seq: 0,
        }
    }

    pub fn update(&mut self, msg: IntakeMsg) -> IntakeUpdate {
        match msg {
            IntakeMsg::ServiceChosen(id) => self.select_service(&id),
            IntakeMsg::LocationResolved { seq, outcome } => self.location_resolved(seq, outcome),
            IntakeMsg::QueueOpened(service) => {
                debug!("queue form opened for {service:?}");
                self.active_service = Some(service);
                IntakeUpdate::Idle
            }
            IntakeMsg::QueueClosed => {
                self.active_service = None;
                IntakeUpdate::Idle
            }
            IntakeMsg::QueueSubmitted { name, phone } => self.submit_queue(&name, &phone),
        }
    }

    pub const fn category(&self) -> Option<ServiceCategory> {
        self.category
    }

    pub const fn location(&self) -> Option<LocationFix> {
        self.location
    }

    pub const fn is_locating(&self) -> bool {
        self.pending.is_some()
    }

    fn select_service(&mut self, id: &str) -> IntakeUpdate {
        let id = id.trim();
        if id.is_empty() {
            error!("service selection with an empty id");
            return IntakeUpdate::Idle;
        }
        let Some(category) = catalog::category_by_id(id) else {
            error!("service selection with unknown id {id:?}");
            return IntakeUpdate::Idle;
        };

        if let Err(err) = self.store.put(SERVICE_TYPE_KEY, id) {
            error!("failed to persist service selection: {err}");
            return IntakeUpdate::Alert(Notice::error(SELECT_FAILED));
        }

        debug!("service {id:?} selected");
        self.category = Some(category);
        IntakeUpdate::Selected(vec![self.begin_fix()])
    }

    /// Cancels any lookup in flight and arms the next one.
    fn begin_fix(&mut self) -> Box<dyn Command> {
        if let Some(pending) = self.pending.take() {
            debug!("superseding location lookup {}", pending.seq);
            pending.cancel.cancel();
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        let cancel = CancellationToken::new();
        self.pending = Some(PendingFix {
            seq,
            cancel: cancel.clone(),
        });

        Box::new(AcquireLocationCmd::new(
            Arc::clone(&self.provider),
            Arc::clone(&self.store),
            self.fix_request,
            seq,
            cancel,
        ))
    }

    fn location_resolved(&mut self, seq: u64, outcome: LocationOutcome) -> IntakeUpdate {
        if self.pending.as_ref().map(|pending| pending.seq) != Some(seq) {
            debug!("dropping stale location outcome for lookup {seq}");
            return IntakeUpdate::Idle;
        }
        self.pending = None;

        match outcome {
            LocationOutcome::Fix(fix) => {
                self.location = Some(fix);
                IntakeUpdate::ShowNearby
            }
            LocationOutcome::Superseded => {
                debug!("location lookup {seq} cancelled");
                IntakeUpdate::Idle
            }
            LocationOutcome::Denied(reason) => {
                warn!("location request denied: {reason}");
                IntakeUpdate::Alert(Notice::warning(LOCATION_FALLBACK).then_show_nearby())
            }
            LocationOutcome::TimedOut => {
                warn!("location request timed out");
                IntakeUpdate::Alert(Notice::warning(LOCATION_FALLBACK).then_show_nearby())
            }
            LocationOutcome::Unsupported => {
                warn!("location lookup unsupported");
                IntakeUpdate::Alert(Notice::warning(LOOKUP_UNSUPPORTED).then_show_nearby())
            }
        }
    }

    fn submit_queue(&mut self, name: &str, phone: &str) -> IntakeUpdate {
        let Some(service) = self.active_service.clone() else {
            warn!("queue submission without an open form");
            return IntakeUpdate::Alert(Notice::error(SUBMIT_FAILED));
        };

        match QueueRequest::new(&service, name, phone) {
            Ok(request) => {
                self.active_service = None;
                IntakeUpdate::Accepted(request)
            }
            Err(reason) => IntakeUpdate::Alert(Notice::error(reason.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::app::AppMessage;
    use crate::location::StubProvider;
    use crate::store::MemoryStore;

    fn flow_with(provider: StubProvider) -> (IntakeFlow, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let flow = IntakeFlow::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::new(provider),
            FixRequest::default(),
        );
        (flow, store)
    }

    fn choose(flow: &mut IntakeFlow, id: &str) -> IntakeUpdate {
        flow.update(IntakeMsg::ServiceChosen(id.to_string()))
    }

    fn resolve(flow: &mut IntakeFlow, seq: u64, outcome: LocationOutcome) -> IntakeUpdate {
        flow.update(IntakeMsg::LocationResolved { seq, outcome })
    }

    fn submit(flow: &mut IntakeFlow, name: &str, phone: &str) -> IntakeUpdate {
        flow.update(IntakeMsg::QueueSubmitted {
            name: name.to_string(),
            phone: phone.to_string(),
        })
    }

    #[test]
    fn selecting_persists_the_id_and_starts_one_lookup() {
        let (mut flow, store) = flow_with(StubProvider::fix(1.0, 2.0));

        let update = choose(&mut flow, "hospital");

        assert_eq!(store.get(SERVICE_TYPE_KEY).unwrap().unwrap(), "hospital");
        let IntakeUpdate::Selected(commands) = update else {
            panic!("expected Selected");
        };
        assert_eq!(commands.len(), 1);
        assert!(flow.is_locating());
        assert_eq!(flow.category().unwrap().id, "hospital");
    }

    #[test]
    fn blank_or_unknown_ids_are_silently_dropped() {
        let (mut flow, store) = flow_with(StubProvider::fix(1.0, 2.0));

        assert!(matches!(choose(&mut flow, "   "), IntakeUpdate::Idle));
        assert!(matches!(choose(&mut flow, "spa"), IntakeUpdate::Idle));

        assert_eq!(store.len(), 0);
        assert!(!flow.is_locating());
        assert!(flow.category().is_none());
    }

    #[test]
    fn reselecting_overwrites_the_stored_id() {
        let (mut flow, store) = flow_with(StubProvider::fix(1.0, 2.0));

        choose(&mut flow, "hospital");
        choose(&mut flow, "bank");

        assert_eq!(store.get(SERVICE_TYPE_KEY).unwrap().unwrap(), "bank");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn store_failure_alerts_and_leaves_the_flow_unchanged() {
        let store = Arc::new(MemoryStore::failing());
        let mut flow = IntakeFlow::new(
            Arc::clone(&store) as Arc<dyn SessionStore>,
            Arc::new(StubProvider::fix(1.0, 2.0)),
            FixRequest::default(),
        );

        let IntakeUpdate::Alert(notice) = choose(&mut flow, "hospital") else {
            panic!("expected Alert");
        };

        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Error selecting service. Please try again.");
        assert!(flow.category().is_none());
        assert!(!flow.is_locating());
    }

    #[test]
    fn fix_outcome_shows_nearby_and_remembers_the_fix() {
        let (mut flow, _store) = flow_with(StubProvider::fix(38.7, -9.1));
        choose(&mut flow, "pharmacy");

        let fix = LocationFix { lat: 38.7, lng: -9.1 };
        let update = resolve(&mut flow, 0, LocationOutcome::Fix(fix));

        assert!(matches!(update, IntakeUpdate::ShowNearby));
        assert_eq!(flow.location(), Some(fix));
        assert!(!flow.is_locating());
    }

    #[test]
    fn denied_and_timeout_still_reach_nearby_via_the_alert() {
        let outcomes = [
            LocationOutcome::Denied("permission refused".to_string()),
            LocationOutcome::TimedOut,
        ];
        for outcome in outcomes {
            let (mut flow, _store) = flow_with(StubProvider::fix(1.0, 2.0));
            choose(&mut flow, "clinic");

            let IntakeUpdate::Alert(notice) = resolve(&mut flow, 0, outcome) else {
                panic!("expected Alert");
            };

            assert_eq!(notice.severity, Severity::Warning);
            assert_eq!(
                notice.message,
                "Location access denied. Nearby results will be approximate."
            );
            assert_eq!(notice.follow_up, Some(FollowUp::ShowNearby));
        }
    }

    #[test]
    fn unsupported_lookup_reaches_nearby_via_the_alert() {
        let (mut flow, _store) = flow_with(StubProvider::unsupported());
        choose(&mut flow, "clinic");

        let IntakeUpdate::Alert(notice) = resolve(&mut flow, 0, LocationOutcome::Unsupported)
        else {
            panic!("expected Alert");
        };

        assert_eq!(notice.severity, Severity::Warning);
        assert_eq!(
            notice.message,
            "Location lookup is not available on this system."
        );
        assert_eq!(notice.follow_up, Some(FollowUp::ShowNearby));
    }

    #[test]
    fn stale_sequence_outcomes_are_ignored() {
        let (mut flow, _store) = flow_with(StubProvider::fix(1.0, 2.0));
        choose(&mut flow, "hospital");
        choose(&mut flow, "bank");

        // The first lookup reports back after being superseded.
        assert!(matches!(
            resolve(&mut flow, 0, LocationOutcome::Superseded),
            IntakeUpdate::Idle
        ));
        assert!(flow.is_locating());

        // A stale fix cannot navigate either.
        let stale = LocationOutcome::Fix(LocationFix { lat: 0.0, lng: 0.0 });
        assert!(matches!(resolve(&mut flow, 0, stale), IntakeUpdate::Idle));
        assert!(flow.location().is_none());

        let fix = LocationOutcome::Fix(LocationFix { lat: 38.7, lng: -9.1 });
        assert!(matches!(
            resolve(&mut flow, 1, fix),
            IntakeUpdate::ShowNearby
        ));
    }

    #[tokio::test]
    async fn a_new_selection_cancels_the_lookup_in_flight() {
        let (mut flow, _store) = flow_with(StubProvider::hanging());

        let IntakeUpdate::Selected(mut first) = choose(&mut flow, "hospital") else {
            panic!("expected Selected");
        };
        let IntakeUpdate::Selected(_second) = choose(&mut flow, "bank") else {
            panic!("expected Selected");
        };

        // Despite the hanging provider the superseded command finishes
        // immediately, and its report changes nothing.
        let (tx, mut rx) = mpsc::unbounded_channel();
        first.remove(0).execute(tx).await.unwrap();
        let AppMessage::Intake(msg) = rx.try_recv().unwrap() else {
            panic!("expected an intake message");
        };
        assert!(matches!(flow.update(msg), IntakeUpdate::Idle));
        assert!(flow.is_locating());
    }

    #[test]
    fn rejected_submissions_alert_in_validation_order() {
        let (mut flow, store) = flow_with(StubProvider::fix(1.0, 2.0));
        flow.update(IntakeMsg::QueueOpened("Central Pharmacy".to_string()));

        let IntakeUpdate::Alert(notice) = submit(&mut flow, "   ", "12345") else {
            panic!("expected Alert");
        };
        assert_eq!(notice.message, "Please enter both name and phone.");

        let IntakeUpdate::Alert(notice) = submit(&mut flow, "Ana Reis", "12345") else {
            panic!("expected Alert");
        };
        assert_eq!(notice.message, "Please enter a valid phone number.");

        // Rejections leave the form context alone, so a corrected submission
        // still knows its venue.
        let IntakeUpdate::Accepted(request) = submit(&mut flow, "Ana Reis", "555-123-4567")
        else {
            panic!("expected Accepted");
        };
        assert_eq!(request.service_name, "Central Pharmacy");
        assert_eq!(request.phone, "555-123-4567");

        // Contact details never touch the store.
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn acceptance_clears_the_service_context() {
        let (mut flow, _store) = flow_with(StubProvider::fix(1.0, 2.0));
        flow.update(IntakeMsg::QueueOpened("Tasca do Cais".to_string()));

        assert!(matches!(
            submit(&mut flow, "Rui Costa", "0215550123"),
            IntakeUpdate::Accepted(_)
        ));

        let IntakeUpdate::Alert(notice) = submit(&mut flow, "Rui Costa", "0215550123") else {
            panic!("expected Alert");
        };
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Error joining queue. Please try again.");
    }

    #[test]
    fn closing_the_form_clears_the_service_context() {
        let (mut flow, _store) = flow_with(StubProvider::fix(1.0, 2.0));
        flow.update(IntakeMsg::QueueOpened("Tasca do Cais".to_string()));
        flow.update(IntakeMsg::QueueClosed);

        let IntakeUpdate::Alert(notice) = submit(&mut flow, "Rui Costa", "0215550123") else {
            panic!("expected Alert");
        };
        assert_eq!(notice.message, "Error joining queue. Please try again.");
    }

    #[test]
    fn confirmation_notice_carries_copyable_details() {
        let request = QueueRequest::new("Central Pharmacy", "Ana Reis", "5551234567").unwrap();
        let notice = Notice::confirmation(&request);

        assert_eq!(notice.severity, Severity::Success);
        assert!(notice.message.starts_with("Queue joined!\n\n"));
        assert!(notice.message.contains("Service: Central Pharmacy"));
        assert_eq!(notice.copy_text.as_deref(), Some(request.details().as_str()));
        assert!(notice.follow_up.is_none());
    }
}
