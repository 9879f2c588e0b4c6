use std::sync::Arc;

use async_trait::async_trait;
use color_eyre::Result;
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::app::AppMessage;
use crate::command::Command;
use crate::intake::{IntakeMsg, LocationOutcome};
use crate::location::{FixRequest, LocationError, LocationFix, LocationProvider};
use crate::store::{SessionStore, USER_LOCATION_KEY};

/// Resolves the visitor's position once and reports how it went.
///
/// Exactly one `LocationResolved` message is sent per command, whichever
/// way the lookup ends. Selecting another service cancels the token, which
/// turns the pending lookup into a `Superseded` outcome instead of a stale
/// result arriving later.
pub struct AcquireLocationCmd {
    provider: Arc<dyn LocationProvider>,
    store: Arc<dyn SessionStore>,
    request: FixRequest,
    seq: u64,
    cancel: CancellationToken,
}

impl AcquireLocationCmd {
    pub fn new(
        provider: Arc<dyn LocationProvider>,
        store: Arc<dyn SessionStore>,
        request: FixRequest,
        seq: u64,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            provider,
            store,
            request,
            seq,
            cancel,
        }
    }

    async fn resolve(&self) -> LocationOutcome {
        if !self.provider.supported() {
            return LocationOutcome::Unsupported;
        }

        let fix = tokio::select! {
            () = self.cancel.cancelled() => return LocationOutcome::Superseded,
            fix = self.provider.request_fix(self.request) => fix,
        };

        match fix {
            Ok(fix) => {
                self.remember(fix);
                LocationOutcome::Fix(fix)
            }
            Err(LocationError::Timeout) => LocationOutcome::TimedOut,
            Err(err) => LocationOutcome::Denied(err.to_string()),
        }
    }

    /// Best effort: the fix is still usable this session even when it
    /// cannot be persisted.
    fn remember(&self, fix: LocationFix) {
        match serde_json::to_string(&fix) {
            Ok(json) => {
                if let Err(err) = self.store.put(USER_LOCATION_KEY, &json) {
                    warn!("failed to persist location fix: {err}");
                }
            }
            Err(err) => warn!("failed to encode location fix: {err}"),
        }
    }
}

#[async_trait]
impl Command for AcquireLocationCmd {
    fn name(&self) -> String {
        "Locating you".to_string()
    }

    async fn execute(self: Box<Self>, action_tx: UnboundedSender<AppMessage>) -> Result<()> {
        let outcome = self.resolve().await;
        action_tx.send(AppMessage::Intake(IntakeMsg::LocationResolved {
            seq: self.seq,
            outcome,
        }))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::location::StubProvider;
    use crate::store::MemoryStore;

    fn command(
        provider: StubProvider,
        store: Arc<MemoryStore>,
        seq: u64,
        cancel: CancellationToken,
    ) -> Box<AcquireLocationCmd> {
        Box::new(AcquireLocationCmd::new(
            Arc::new(provider),
            store,
            FixRequest::default(),
            seq,
            cancel,
        ))
    }

    async fn run(cmd: Box<AcquireLocationCmd>) -> (u64, LocationOutcome) {
        let (tx, mut rx) = mpsc::unbounded_channel();
        cmd.execute(tx).await.unwrap();
        let message = rx.try_recv().unwrap();
        assert!(rx.try_recv().is_err(), "expected exactly one message");
        match message {
            AppMessage::Intake(IntakeMsg::LocationResolved { seq, outcome }) => (seq, outcome),
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn successful_fix_is_reported_and_persisted() {
        let store = Arc::new(MemoryStore::new());
        let cmd = command(
            StubProvider::fix(38.72, -9.14),
            Arc::clone(&store),
            3,
            CancellationToken::new(),
        );

        let (seq, outcome) = run(cmd).await;

        assert_eq!(seq, 3);
        assert_eq!(
            outcome,
            LocationOutcome::Fix(LocationFix {
                lat: 38.72,
                lng: -9.14
            })
        );
        assert_eq!(
            store.get(USER_LOCATION_KEY).unwrap().unwrap(),
            r#"{"lat":38.72,"lng":-9.14}"#
        );
    }

    #[tokio::test]
    async fn cancelled_lookup_reports_superseded_without_store_writes() {
        let store = Arc::new(MemoryStore::new());
        let cancel = CancellationToken::new();
        cancel.cancel();
        let cmd = command(StubProvider::hanging(), Arc::clone(&store), 1, cancel);

        let (seq, outcome) = run(cmd).await;

        assert_eq!(seq, 1);
        assert_eq!(outcome, LocationOutcome::Superseded);
        assert_eq!(store.len(), 0);
    }

    #[tokio::test]
    async fn timeout_maps_to_timed_out() {
        let store = Arc::new(MemoryStore::new());
        let cmd = command(
            StubProvider::failing(LocationError::Timeout),
            store,
            0,
            CancellationToken::new(),
        );

        let (_, outcome) = run(cmd).await;
        assert_eq!(outcome, LocationOutcome::TimedOut);
    }

    #[tokio::test]
    async fn denial_carries_the_provider_message() {
        let store = Arc::new(MemoryStore::new());
        let cmd = command(
            StubProvider::failing(LocationError::Denied("quota exceeded".to_string())),
            store,
            0,
            CancellationToken::new(),
        );

        let (_, outcome) = run(cmd).await;
        assert_eq!(
            outcome,
            LocationOutcome::Denied("location request denied: quota exceeded".to_string())
        );
    }

    #[tokio::test]
    async fn unsupported_provider_short_circuits() {
        let store = Arc::new(MemoryStore::new());
        let cmd = command(
            StubProvider::unsupported(),
            store,
            0,
            CancellationToken::new(),
        );

        let (_, outcome) = run(cmd).await;
        assert_eq!(outcome, LocationOutcome::Unsupported);
    }

    #[tokio::test]
    async fn store_failure_still_reports_the_fix() {
        let store = Arc::new(MemoryStore::failing());
        let cmd = command(
            StubProvider::fix(1.0, 2.0),
            store,
            0,
            CancellationToken::new(),
        );

        let (_, outcome) = run(cmd).await;
        assert_eq!(outcome, LocationOutcome::Fix(LocationFix { lat: 1.0, lng: 2.0 }));
    }
}
