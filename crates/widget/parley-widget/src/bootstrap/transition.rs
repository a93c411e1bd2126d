//! Pure bootstrap state machine
//!
//! `transition(machine, input) -> (machine, effects)` holds every routing
//! decision. It performs no I/O: validator calls are requested as effects and
//! their results come back as inputs. Inputs that do not fit the current
//! state (a second start, a late or duplicate validator result) produce no
//! effects, which keeps a finished bootstrap finished.

use super::messages;
use super::state::{
    BootstrapOutcome, BootstrapState, BootstrapUpdate, ScreenSelection, StatusMessage,
    ValidationOutcome,
};
use parley_core::{ContactSessionId, OrganizationId};

/// Events fed into the machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapInput {
    /// Begin the bootstrap
    Start {
        /// Organization the widget was embedded for
        organization_id: Option<OrganizationId>,
        /// Contact session cached for that organization
        session_id: Option<ContactSessionId>,
    },
    /// The organization validator finished
    OrganizationResolved(ValidationOutcome<OrganizationId>),
    /// The session validator finished
    SessionResolved(ValidationOutcome<ContactSessionId>),
}

/// Work the driver must perform, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapEffect {
    /// Publish a progress update
    Emit(BootstrapUpdate),
    /// Call the organization validator
    ValidateOrganization(OrganizationId),
    /// Call the session validator
    ValidateSession(ContactSessionId),
    /// Keep the confirmed organization for the rest of the mount
    RetainOrganization(OrganizationId),
}

/// Bootstrap state plus the data gathered so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapMachine {
    state: BootstrapState,
    started: bool,
    status: StatusMessage,
    organization_id: Option<OrganizationId>,
    session_id: Option<ContactSessionId>,
    session_requested: bool,
    session_rejected: bool,
    outcome: Option<BootstrapOutcome>,
}

impl BootstrapMachine {
    /// A machine that has not started yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> BootstrapState {
        self.state
    }

    /// Current loading text
    pub fn status(&self) -> &StatusMessage {
        &self.status
    }

    /// Final outcome, once `Done`
    pub fn outcome(&self) -> Option<&BootstrapOutcome> {
        self.outcome.as_ref()
    }

    /// Whether the machine has reached `Done`
    pub fn is_done(&self) -> bool {
        self.state == BootstrapState::Done
    }

    /// Apply one input in place and return the resulting effects
    pub fn apply(&mut self, input: BootstrapInput) -> Vec<BootstrapEffect> {
        match input {
            BootstrapInput::Start {
                organization_id,
                session_id,
            } => self.on_start(organization_id, session_id),
            BootstrapInput::OrganizationResolved(outcome) => self.on_organization(outcome),
            BootstrapInput::SessionResolved(outcome) => self.on_session(outcome),
        }
    }

    fn on_start(
        &mut self,
        organization_id: Option<OrganizationId>,
        session_id: Option<ContactSessionId>,
    ) -> Vec<BootstrapEffect> {
        if self.started {
            return Vec::new();
        }
        self.started = true;
        self.session_id = session_id;

        let mut effects = vec![self.set_status(messages::LOADING_ORGANIZATION)];
        match organization_id {
            None => effects.push(self.finish(
                ScreenSelection::Error,
                Some(messages::ORGANIZATION_ID_REQUIRED.to_string()),
            )),
            Some(id) => {
                effects.push(self.set_status(messages::FINDING_ORGANIZATION));
                effects.push(BootstrapEffect::ValidateOrganization(id));
            }
        }
        effects
    }

    fn on_organization(
        &mut self,
        outcome: ValidationOutcome<OrganizationId>,
    ) -> Vec<BootstrapEffect> {
        if !self.started || self.state != BootstrapState::ResolvingOrganization {
            return Vec::new();
        }

        match outcome {
            ValidationOutcome::Unverified => vec![self.finish(
                ScreenSelection::Error,
                Some(messages::UNABLE_TO_VERIFY_ORGANIZATION.to_string()),
            )],
            ValidationOutcome::Invalid(reason) => {
                let reason = reason
                    .filter(|r| !r.trim().is_empty())
                    .unwrap_or_else(|| messages::INVALID_CONFIGURATION.to_string());
                vec![self.finish(ScreenSelection::Error, Some(reason))]
            }
            ValidationOutcome::Valid(id) => {
                self.organization_id = Some(id.clone());
                self.state = BootstrapState::ResolvingSession;

                let mut effects = vec![
                    BootstrapEffect::RetainOrganization(id),
                    self.set_status(messages::FINDING_CONTACT_SESSION),
                ];
                match self.session_id.clone() {
                    None => effects.push(self.finalize(false, false)),
                    Some(session_id) => {
                        effects.push(self.set_status(messages::VERIFYING_CONTACT_SESSION));
                        self.session_requested = true;
                        effects.push(BootstrapEffect::ValidateSession(session_id));
                    }
                }
                effects
            }
        }
    }

    fn on_session(&mut self, outcome: ValidationOutcome<ContactSessionId>) -> Vec<BootstrapEffect> {
        if self.state != BootstrapState::ResolvingSession || !self.session_requested {
            return Vec::new();
        }
        let rejected = matches!(outcome, ValidationOutcome::Invalid(_));
        vec![self.finalize(outcome.is_valid(), rejected)]
    }

    fn finalize(&mut self, session_valid: bool, session_rejected: bool) -> BootstrapEffect {
        self.state = BootstrapState::Finalizing;
        self.session_rejected = session_rejected;
        let screen = if session_valid {
            ScreenSelection::Selection
        } else {
            ScreenSelection::Auth
        };
        self.finish(screen, None)
    }

    fn finish(&mut self, screen: ScreenSelection, error_reason: Option<String>) -> BootstrapEffect {
        self.state = BootstrapState::Done;
        let outcome = BootstrapOutcome {
            screen,
            error_reason,
            organization_id: self.organization_id.clone(),
            session_rejected: self.session_rejected,
        };
        self.outcome = Some(outcome.clone());
        BootstrapEffect::Emit(BootstrapUpdate {
            state: self.state,
            status: self.status.clone(),
            outcome: Some(outcome),
        })
    }

    fn set_status(&mut self, message: &str) -> BootstrapEffect {
        self.status = StatusMessage::new(message);
        BootstrapEffect::Emit(BootstrapUpdate {
            state: self.state,
            status: self.status.clone(),
            outcome: None,
        })
    }
}

/// Pure transition: consume a machine and an input, return the next machine and its effects
pub fn transition(
    mut machine: BootstrapMachine,
    input: BootstrapInput,
) -> (BootstrapMachine, Vec<BootstrapEffect>) {
    let effects = machine.apply(input);
    (machine, effects)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn org(id: &str) -> OrganizationId {
        OrganizationId::parse(id).unwrap()
    }

    fn sess(id: &str) -> ContactSessionId {
        ContactSessionId::parse(id).unwrap()
    }

    fn start(org_id: Option<&str>, session: Option<&str>) -> BootstrapInput {
        BootstrapInput::Start {
            organization_id: OrganizationId::parse_optional(org_id),
            session_id: ContactSessionId::parse_optional(session),
        }
    }

    fn statuses(effects: &[BootstrapEffect]) -> Vec<String> {
        effects
            .iter()
            .filter_map(|e| match e {
                BootstrapEffect::Emit(update) if update.outcome.is_none() => {
                    Some(update.status.to_string())
                }
                _ => None,
            })
            .collect()
    }

    fn final_outcome(effects: &[BootstrapEffect]) -> Option<BootstrapOutcome> {
        effects.iter().find_map(|e| match e {
            BootstrapEffect::Emit(update) => update.outcome.clone(),
            _ => None,
        })
    }

    #[test]
    fn test_missing_organization_ends_in_error_without_validation() {
        let (machine, effects) = transition(BootstrapMachine::new(), start(None, Some("sess_9")));

        assert!(machine.is_done());
        assert_eq!(statuses(&effects), vec![messages::LOADING_ORGANIZATION]);
        assert!(!effects.iter().any(|e| matches!(
            e,
            BootstrapEffect::ValidateOrganization(_) | BootstrapEffect::ValidateSession(_)
        )));

        let outcome = final_outcome(&effects).unwrap();
        assert_eq!(outcome.screen, ScreenSelection::Error);
        assert_eq!(
            outcome.error_reason.as_deref(),
            Some(messages::ORGANIZATION_ID_REQUIRED)
        );
    }

    #[test]
    fn test_start_requests_organization_validation() {
        let (machine, effects) = transition(BootstrapMachine::new(), start(Some("org_1"), None));

        assert_eq!(machine.state(), BootstrapState::ResolvingOrganization);
        assert_eq!(
            statuses(&effects),
            vec![messages::LOADING_ORGANIZATION, messages::FINDING_ORGANIZATION]
        );
        assert_eq!(
            effects.last(),
            Some(&BootstrapEffect::ValidateOrganization(org("org_1")))
        );
        assert!(machine.outcome().is_none());
    }

    #[test]
    fn test_invalid_organization_uses_reason_or_fallback() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), None));
        let (_, effects) = transition(
            machine.clone(),
            BootstrapInput::OrganizationResolved(ValidationOutcome::Invalid(Some(
                "Organization disabled".to_string(),
            ))),
        );
        let outcome = final_outcome(&effects).unwrap();
        assert_eq!(outcome.screen, ScreenSelection::Error);
        assert_eq!(outcome.error_reason.as_deref(), Some("Organization disabled"));

        for reason in [None, Some(String::new())] {
            let (_, effects) = transition(
                machine.clone(),
                BootstrapInput::OrganizationResolved(ValidationOutcome::Invalid(reason)),
            );
            let outcome = final_outcome(&effects).unwrap();
            assert_eq!(
                outcome.error_reason.as_deref(),
                Some(messages::INVALID_CONFIGURATION)
            );
        }
    }

    #[test]
    fn test_valid_organization_without_session_routes_to_auth() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), None));
        let (machine, effects) = transition(
            machine,
            BootstrapInput::OrganizationResolved(ValidationOutcome::Valid(org("org_1"))),
        );

        assert!(machine.is_done());
        assert_eq!(
            effects.first(),
            Some(&BootstrapEffect::RetainOrganization(org("org_1")))
        );
        assert_eq!(statuses(&effects), vec![messages::FINDING_CONTACT_SESSION]);
        assert!(!effects
            .iter()
            .any(|e| matches!(e, BootstrapEffect::ValidateSession(_))));

        let outcome = final_outcome(&effects).unwrap();
        assert_eq!(outcome.screen, ScreenSelection::Auth);
        assert_eq!(outcome.error_reason, None);
        assert_eq!(outcome.organization_id, Some(org("org_1")));
    }

    #[test]
    fn test_session_result_selects_screen() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), Some("sess_9")));
        let (machine, effects) = transition(
            machine,
            BootstrapInput::OrganizationResolved(ValidationOutcome::Valid(org("org_1"))),
        );
        assert_eq!(machine.state(), BootstrapState::ResolvingSession);
        assert_eq!(
            statuses(&effects),
            vec![
                messages::FINDING_CONTACT_SESSION,
                messages::VERIFYING_CONTACT_SESSION
            ]
        );
        assert_eq!(
            effects.last(),
            Some(&BootstrapEffect::ValidateSession(sess("sess_9")))
        );

        let (done, effects) = transition(
            machine.clone(),
            BootstrapInput::SessionResolved(ValidationOutcome::Valid(sess("sess_9"))),
        );
        assert!(done.is_done());
        assert_eq!(
            final_outcome(&effects).unwrap().screen,
            ScreenSelection::Selection
        );

        let (_, effects) = transition(
            machine.clone(),
            BootstrapInput::SessionResolved(ValidationOutcome::Invalid(None)),
        );
        let rejected = final_outcome(&effects).unwrap();
        assert_eq!(rejected.screen, ScreenSelection::Auth);
        assert!(rejected.session_rejected);

        let (_, effects) = transition(
            machine,
            BootstrapInput::SessionResolved(ValidationOutcome::Unverified),
        );
        let unverified = final_outcome(&effects).unwrap();
        assert_eq!(unverified.screen, ScreenSelection::Auth);
        assert!(!unverified.session_rejected);
    }

    #[test]
    fn test_unverified_organization_uses_generic_message() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), Some("sess_9")));
        let (machine, effects) = transition(
            machine,
            BootstrapInput::OrganizationResolved(ValidationOutcome::Unverified),
        );
        assert!(machine.is_done());
        let outcome = final_outcome(&effects).unwrap();
        assert_eq!(outcome.screen, ScreenSelection::Error);
        assert_eq!(
            outcome.error_reason.as_deref(),
            Some(messages::UNABLE_TO_VERIFY_ORGANIZATION)
        );
        assert!(!outcome.session_rejected);
    }

    #[test]
    fn test_late_inputs_after_done_are_ignored() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), Some("sess_9")));
        let (machine, _) = transition(
            machine,
            BootstrapInput::OrganizationResolved(ValidationOutcome::Valid(org("org_1"))),
        );
        let (machine, _) = transition(
            machine,
            BootstrapInput::SessionResolved(ValidationOutcome::Invalid(None)),
        );
        let resolved = machine.outcome().cloned();

        let (machine, effects) = transition(
            machine,
            BootstrapInput::SessionResolved(ValidationOutcome::Valid(sess("sess_9"))),
        );
        assert!(effects.is_empty());
        let (machine, effects) = transition(
            machine,
            BootstrapInput::OrganizationResolved(ValidationOutcome::Invalid(None)),
        );
        assert!(effects.is_empty());
        let (machine, effects) = transition(machine, start(None, None));
        assert!(effects.is_empty());

        assert_eq!(machine.outcome().cloned(), resolved);
        assert_eq!(resolved.unwrap().screen, ScreenSelection::Auth);
    }

    #[test]
    fn test_session_result_before_request_is_ignored() {
        let (machine, _) = transition(BootstrapMachine::new(), start(Some("org_1"), Some("sess_9")));
        let (machine, effects) = transition(
            machine,
            BootstrapInput::SessionResolved(ValidationOutcome::Valid(sess("sess_9"))),
        );
        assert!(effects.is_empty());
        assert_eq!(machine.state(), BootstrapState::ResolvingOrganization);
    }

    #[test]
    fn test_organization_result_before_start_is_ignored() {
        let (machine, effects) = transition(
            BootstrapMachine::new(),
            BootstrapInput::OrganizationResolved(ValidationOutcome::Valid(org("org_1"))),
        );
        assert!(effects.is_empty());
        assert_eq!(machine, BootstrapMachine::new());
    }
}
