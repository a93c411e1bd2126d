//! Async driver for the bootstrap state machine

use super::state::{BootstrapOutcome, BootstrapUpdate, ValidationOutcome};
use super::transition::{transition, BootstrapEffect, BootstrapInput, BootstrapMachine};
use crate::mount::WidgetMount;
use crate::validators::{OrganizationValidator, SessionValidator};
use futures_util::Stream;
use parley_core::{ContactSessionId, OrganizationId, ParleyError, Result, WidgetConfig};
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tracing::{debug, info, warn};

/// Default bound on each validator call
pub const DEFAULT_VALIDATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Tuning for a bootstrap run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootstrapOptions {
    /// Bound on each validator call; an expired call counts as a transport failure
    pub validation_timeout: Duration,
}

impl Default for BootstrapOptions {
    fn default() -> Self {
        Self {
            validation_timeout: DEFAULT_VALIDATION_TIMEOUT,
        }
    }
}

impl From<&WidgetConfig> for BootstrapOptions {
    fn from(config: &WidgetConfig) -> Self {
        Self {
            validation_timeout: config.validation_timeout,
        }
    }
}

/// Progress updates of a running bootstrap
///
/// Ends after the `Done` update, or early if the widget unmounts.
pub struct BootstrapStream {
    inner: UnboundedReceiverStream<BootstrapUpdate>,
}

impl BootstrapStream {
    /// Drain the stream and return the final outcome, if one was reached
    pub async fn outcome(mut self) -> Option<BootstrapOutcome> {
        while let Some(update) = self.inner.next().await {
            if let Some(outcome) = update.outcome {
                return Some(outcome);
            }
        }
        None
    }
}

impl Stream for BootstrapStream {
    type Item = BootstrapUpdate;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[derive(Clone)]
struct Driver {
    organizations: Arc<dyn OrganizationValidator>,
    sessions: Arc<dyn SessionValidator>,
    options: BootstrapOptions,
}

impl Driver {
    async fn drive<F>(
        self,
        mount: WidgetMount,
        organization_id: Option<OrganizationId>,
        session_id: Option<ContactSessionId>,
        mut emit: F,
    ) -> Option<BootstrapOutcome>
    where
        F: FnMut(BootstrapUpdate) + Send,
    {
        let (mut machine, effects) = transition(
            BootstrapMachine::new(),
            BootstrapInput::Start {
                organization_id,
                session_id,
            },
        );
        let mut queue: VecDeque<BootstrapEffect> = effects.into();

        while let Some(effect) = queue.pop_front() {
            if !mount.is_alive() {
                debug!("Widget unmounted during bootstrap; discarding remaining work");
                return None;
            }

            let input = match effect {
                BootstrapEffect::Emit(update) => {
                    debug!("Bootstrap {}: {}", update.state, update.status);
                    emit(update);
                    continue;
                }
                BootstrapEffect::RetainOrganization(id) => {
                    mount.retain_organization(id);
                    continue;
                }
                BootstrapEffect::ValidateOrganization(id) => {
                    let outcome = tokio::select! {
                        outcome = self.check_organization(&id) => outcome,
                        _ = mount.unmounted() => {
                            debug!("Widget unmounted while validating organization {}", id);
                            return None;
                        }
                    };
                    BootstrapInput::OrganizationResolved(outcome)
                }
                BootstrapEffect::ValidateSession(id) => {
                    let outcome = tokio::select! {
                        outcome = self.check_session(&id) => outcome,
                        _ = mount.unmounted() => {
                            debug!("Widget unmounted while validating contact session");
                            return None;
                        }
                    };
                    BootstrapInput::SessionResolved(outcome)
                }
            };

            if !mount.is_alive() {
                debug!("Widget unmounted; dropping validator result");
                return None;
            }
            let (next, effects) = transition(machine, input);
            machine = next;
            queue.extend(effects);
        }

        let outcome = machine.outcome().cloned();
        if let Some(outcome) = &outcome {
            info!(
                "Bootstrap finished: screen={:?} organization={}",
                outcome.screen,
                outcome
                    .organization_id
                    .as_ref()
                    .map(|id| id.as_str())
                    .unwrap_or("-")
            );
        }
        outcome
    }

    async fn check_organization(&self, id: &OrganizationId) -> ValidationOutcome<OrganizationId> {
        let call = self.organizations.validate_organization(id);
        match bounded(self.options.validation_timeout, call).await {
            Ok(result) if result.valid => ValidationOutcome::Valid(id.clone()),
            Ok(result) => {
                info!(
                    "Organization {} rejected: {}",
                    id,
                    result.reason.as_deref().unwrap_or("no reason given")
                );
                ValidationOutcome::Invalid(result.reason)
            }
            Err(e) => {
                warn!("Organization validation for {} failed: {}", id, e);
                ValidationOutcome::Unverified
            }
        }
    }

    async fn check_session(&self, id: &ContactSessionId) -> ValidationOutcome<ContactSessionId> {
        let call = self.sessions.validate_session(id);
        match bounded(self.options.validation_timeout, call).await {
            Ok(result) if result.valid => ValidationOutcome::Valid(id.clone()),
            Ok(_) => {
                debug!("Cached contact session is no longer valid");
                ValidationOutcome::Invalid(None)
            }
            Err(e) => {
                warn!("Contact session validation failed: {}", e);
                ValidationOutcome::Unverified
            }
        }
    }
}

async fn bounded<T>(
    limit: Duration,
    call: impl std::future::Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(ParleyError::timeout(format!(
            "validator did not answer within {:?}",
            limit
        ))),
    }
}

/// Runs the session bootstrap for one widget mount
///
/// A sequencer runs at most once; build a new one for each mount.
pub struct BootstrapSequencer {
    driver: Driver,
    started: AtomicBool,
}

impl BootstrapSequencer {
    /// Create a sequencer over the two validators
    pub fn new(
        organizations: Arc<dyn OrganizationValidator>,
        sessions: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            driver: Driver {
                organizations,
                sessions,
                options: BootstrapOptions::default(),
            },
            started: AtomicBool::new(false),
        }
    }

    /// Replace the run options
    pub fn with_options(mut self, options: BootstrapOptions) -> Self {
        self.driver.options = options;
        self
    }

    /// Current run options
    pub fn options(&self) -> BootstrapOptions {
        self.driver.options
    }

    /// Whether `start` or `run` has been called
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    fn claim(&self) -> Result<()> {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(ParleyError::runtime("bootstrap already started for this mount"));
        }
        Ok(())
    }

    /// Start the bootstrap on a background task and stream its progress
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &self,
        mount: &WidgetMount,
        organization_id: Option<OrganizationId>,
        session_id: Option<ContactSessionId>,
    ) -> Result<BootstrapStream> {
        self.claim()?;

        let (tx, rx) = mpsc::unbounded_channel();
        let driver = self.driver.clone();
        let mount = mount.clone();
        tokio::spawn(async move {
            driver
                .drive(mount, organization_id, session_id, move |update| {
                    // A dropped receiver only means nobody is watching.
                    let _ = tx.send(update);
                })
                .await;
        });

        Ok(BootstrapStream {
            inner: UnboundedReceiverStream::new(rx),
        })
    }

    /// Run the bootstrap on the current task, passing each update to `emit`
    ///
    /// Returns `None` if the widget unmounted before the bootstrap finished.
    pub async fn run<F>(
        &self,
        mount: &WidgetMount,
        organization_id: Option<OrganizationId>,
        session_id: Option<ContactSessionId>,
        emit: F,
    ) -> Result<Option<BootstrapOutcome>>
    where
        F: FnMut(BootstrapUpdate) + Send,
    {
        self.claim()?;
        Ok(self
            .driver
            .clone()
            .drive(mount.clone(), organization_id, session_id, emit)
            .await)
    }
}
