//! IntakeSession: coordinates one engine, the transcript log, and the
//! completion handoff.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{HandoffError, IntakeError, Result};

use super::engine::{ActionOutcome, DialogState, IntakeAction, IntakeEngine};
use super::handoff::CompletionHandler;
use super::log::{LoggedMessage, TranscriptLog};
use super::model::LearningProfile;

struct SessionInner {
    engine: IntakeEngine,
    /// Transcript entries already mirrored to the log.
    logged: usize,
    finished: bool,
}

/// One intake conversation from opening prompt to handoff.
pub struct IntakeSession {
    id: Uuid,
    inner: Mutex<SessionInner>,
    log: Option<TranscriptLog>,
    handler: Arc<dyn CompletionHandler>,
}

impl IntakeSession {
    pub fn new(handler: Arc<dyn CompletionHandler>) -> Self {
        Self {
            id: Uuid::new_v4(),
            inner: Mutex::new(SessionInner {
                engine: IntakeEngine::new(),
                logged: 0,
                finished: false,
            }),
            log: None,
            handler,
        }
    }

    /// Mirror every transcript entry to `log` as it is appended.
    pub fn with_log(mut self, log: TranscriptLog) -> Self {
        self.log = Some(log);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Write the opening prompt to the log.
    pub async fn start(&self) {
        let mut inner = self.inner.lock().await;
        self.mirror(&mut inner).await;
        tracing::info!(session = %self.id, "Intake session started");
    }

    pub async fn state(&self) -> DialogState {
        self.inner.lock().await.engine.snapshot()
    }

    pub async fn is_finished(&self) -> bool {
        self.inner.lock().await.finished
    }

    /// Apply an action. `Complete` also runs the handoff.
    pub async fn apply(&self, action: IntakeAction) -> Result<ActionOutcome> {
        if action == IntakeAction::Complete {
            return self.complete().await.map(ActionOutcome::Completed);
        }

        let mut inner = self.inner.lock().await;
        if inner.finished {
            return Err(IntakeError::AlreadyCompleted.into());
        }
        let outcome = inner.engine.apply(action)?;
        self.mirror(&mut inner).await;
        Ok(outcome)
    }

    /// Hand the finished profile to the completion handler.
    ///
    /// If the handler fails the session stays open so the caller can retry.
    pub async fn complete(&self) -> Result<LearningProfile> {
        let mut inner = self.inner.lock().await;
        if inner.finished {
            return Err(IntakeError::AlreadyCompleted.into());
        }
        let profile = inner.engine.complete()?;

        self.handler
            .on_complete(&profile)
            .await
            .map_err(HandoffError)?;

        inner.finished = true;
        tracing::info!(session = %self.id, name = %profile.name, "Learning profile handed off");
        Ok(profile)
    }

    /// Append not-yet-logged transcript entries to the log.
    async fn mirror(&self, inner: &mut SessionInner) {
        let total = inner.engine.transcript().len();
        let Some(log) = &self.log else {
            inner.logged = total;
            return;
        };

        let pending: Vec<LoggedMessage> = inner
            .engine
            .transcript()
            .since(inner.logged)
            .iter()
            .map(|m| LoggedMessage::new(self.id, m))
            .collect();

        match log.extend(&pending).await {
            Ok(()) => inner.logged = total,
            Err(e) => {
                // The dialog goes on; unlogged entries are retried next time.
                tracing::warn!(session = %self.id, "Failed to write transcript log: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::intake::model::{HoursChoice, SkillLevel};
    use crate::intake::steps::StepId;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl CompletionHandler for CountingHandler {
        async fn on_complete(&self, _profile: &LearningProfile) -> anyhow::Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("planner unavailable");
            }
            Ok(())
        }
    }

    fn handler(fail: bool) -> Arc<CountingHandler> {
        Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    async fn drive_to_summary(session: &IntakeSession) {
        let actions = [
            IntakeAction::SubmitText("Ada".into()),
            IntakeAction::SubmitText("new job".into()),
            IntakeAction::SubmitText("SQL".into()),
            IntakeAction::ChooseLevel(SkillLevel::Mixed),
            IntakeAction::ConfirmProviders,
            IntakeAction::SubmitText(String::new()),
            IntakeAction::ChooseHours(HoursChoice::Four),
            IntakeAction::ChooseTimeframe(None),
        ];
        for action in actions {
            session.apply(action).await.unwrap();
        }
    }

    #[tokio::test]
    async fn complete_before_summary_is_rejected() {
        let h = handler(false);
        let session = IntakeSession::new(h.clone());
        let err = session.complete().await.unwrap_err();
        assert!(matches!(
            err,
            Error::Intake(IntakeError::InvalidStepAction {
                step: StepId::Name,
                ..
            })
        ));
        assert_eq!(h.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handoff_happens_once() {
        let h = handler(false);
        let session = IntakeSession::new(h.clone());
        drive_to_summary(&session).await;

        let outcome = session.apply(IntakeAction::Complete).await.unwrap();
        assert!(matches!(outcome, ActionOutcome::Completed(ref p) if p.name == "Ada"));
        assert!(session.is_finished().await);

        let again = session.complete().await.unwrap_err();
        assert!(matches!(again, Error::Intake(IntakeError::AlreadyCompleted)));
        assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_handoff_keeps_session_open() {
        let h = handler(true);
        let session = IntakeSession::new(h.clone());
        drive_to_summary(&session).await;

        let err = session.complete().await.unwrap_err();
        assert!(matches!(err, Error::Handoff(_)));
        assert!(!session.is_finished().await);
        assert_eq!(session.state().await.step, StepId::Summary);

        assert!(session.complete().await.is_err());
        assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn rejected_action_is_reported() {
        let session = IntakeSession::new(handler(false));
        let err = session
            .apply(IntakeAction::SubmitText("  ".into()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Intake(IntakeError::EmptyAnswerRejected { .. })
        ));
        assert_eq!(session.state().await.transcript.len(), 1);
    }
}
