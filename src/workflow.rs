//! Submission workflow controller.
//!
//! A controller owns one form. `submit` validates the entered values,
//! performs a single write to the record store and reports the outcome
//! through the notification sink:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded | Failed -> Idle
//! ```
//!
//! An in-flight flag keeps at most one write outstanding per controller.
//! Nothing is retried; a failed submission waits for the visitor to try
//! again.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use log::{debug, o, warn, Logger};
use tokio::sync::mpsc;
use url::Url;
use uuid::Uuid;

use crate::adoption::{AdoptionForm, AdoptionRequest, Applicant, NewAdoptionRequest};
use crate::contact::{ContactForm, ContactMessage, NewContactMessage};
use crate::db::Db;
use crate::errors::BackendError;
use crate::notification::{Notification, NotificationSink};
use crate::pet::{ListingForm, NewPet, PetRecord};
use crate::session::{Navigator, Session};
use crate::validation::{self, PhoneRequirement, ValidationErrors};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// How a call to [`SubmissionController::submit`] ended.
#[derive(Debug)]
pub enum SubmitOutcome<T> {
    /// Another submission was still in flight; nothing happened.
    Busy,

    /// The form did not validate; nothing was written.
    Invalid(ValidationErrors),

    Succeeded(T),

    /// No session; the visitor was sent to sign in.
    AuthRequired,

    Failed(BackendError),
}

/// One kind of form and the write it turns into.
pub trait Workflow: Send + Sync {
    type Form: Clone + Default + Send + Sync;
    type Valid: Send;
    type Written: Send;

    /// Used in logs.
    fn name(&self) -> &'static str;

    fn requires_session(&self) -> bool;

    fn validate(&self, form: &Self::Form) -> Result<Self::Valid, ValidationErrors>;

    fn write<'a>(
        &'a self,
        db: &'a (dyn Db + Send + Sync),
        user: Option<Uuid>,
        valid: Self::Valid,
    ) -> BoxFuture<'a, Result<Self::Written, BackendError>>;

    fn success(&self, written: &Self::Written) -> Notification;
}

/// The collaborators a controller needs. Cheap to clone.
#[derive(Clone)]
pub struct Context {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub session: Arc<dyn Session>,
    pub notifier: Arc<dyn NotificationSink>,
    pub navigator: Arc<dyn Navigator>,
    pub sign_in: Url,
}

pub struct SubmissionController<W: Workflow> {
    workflow: W,
    context: Context,
    logger: Logger,
    in_flight: AtomicBool,
    state: Mutex<SubmissionState>,
    form: Mutex<W::Form>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<SubmissionState>>>,
}

impl<W: Workflow> SubmissionController<W> {
    pub fn new(workflow: W, context: Context) -> Self {
        let logger = context.logger.new(o!("workflow" => workflow.name()));

        SubmissionController {
            workflow,
            context,
            logger,
            in_flight: AtomicBool::new(false),
            state: Mutex::new(SubmissionState::Idle),
            form: Mutex::new(W::Form::default()),
            subscribers: Mutex::new(vec![]),
        }
    }

    pub fn workflow(&self) -> &W {
        &self.workflow
    }

    pub fn state(&self) -> SubmissionState {
        *self.state.lock().unwrap()
    }

    /// The values currently in the form.
    pub fn form(&self) -> W::Form {
        self.form.lock().unwrap().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Checks `input` without submitting it.
    pub fn validate(&self, input: &W::Form) -> Result<W::Valid, ValidationErrors> {
        self.workflow.validate(input)
    }

    /// Receives every state change from now on.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<SubmissionState> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers.lock().unwrap().push(sender);

        receiver
    }

    pub async fn submit(&self, input: W::Form) -> SubmitOutcome<W::Written> {
        let _guard = match InFlight::acquire(self) {
            Some(guard) => guard,
            None => {
                debug!(self.logger, "Ignoring submission while another is in flight");
                return SubmitOutcome::Busy;
            }
        };

        *self.form.lock().unwrap() = input.clone();

        self.transition(SubmissionState::Validating);
        let valid = match self.workflow.validate(&input) {
            Ok(valid) => valid,
            Err(errors) => {
                debug!(self.logger, "Submission failed validation"; "errors" => %errors);
                return SubmitOutcome::Invalid(errors);
            }
        };

        let user = self.context.session.user();

        if self.workflow.requires_session() && user.is_none() {
            return self.fail(BackendError::NotAuthenticated);
        }

        self.transition(SubmissionState::Submitting);
        debug!(self.logger, "Submitting...");
        let result = self
            .workflow
            .write(self.context.db.as_ref(), user, valid)
            .await;

        match result {
            Ok(written) => {
                self.transition(SubmissionState::Succeeded);
                *self.form.lock().unwrap() = W::Form::default();
                self.context.notifier.notify(self.workflow.success(&written));

                SubmitOutcome::Succeeded(written)
            }
            Err(e) => self.fail(e),
        }
    }

    fn fail(&self, error: BackendError) -> SubmitOutcome<W::Written> {
        self.transition(SubmissionState::Failed);

        match error {
            BackendError::NotAuthenticated => {
                debug!(self.logger, "Not signed in; redirecting"; "to" => %self.context.sign_in);
                self.context.navigator.redirect(&self.context.sign_in);

                SubmitOutcome::AuthRequired
            }
            e => {
                warn!(self.logger, "Submission failed"; "error" => ?e);
                self.context
                    .notifier
                    .notify(Notification::error("Error", e.user_message()));

                SubmitOutcome::Failed(e)
            }
        }
    }

    fn transition(&self, next: SubmissionState) {
        *self.state.lock().unwrap() = next;

        self.subscribers
            .lock()
            .unwrap()
            .retain(|s| s.send(next).is_ok());
    }
}

/// Holds the in-flight flag for one submission. Dropping it returns the
/// controller to `Idle`, even if the submission future is dropped early.
struct InFlight<'a, W: Workflow> {
    controller: &'a SubmissionController<W>,
}

impl<'a, W: Workflow> InFlight<'a, W> {
    fn acquire(controller: &'a SubmissionController<W>) -> Option<Self> {
        controller
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlight { controller })
    }
}

impl<'a, W: Workflow> Drop for InFlight<'a, W> {
    // release first, so anyone who sees `Idle` can submit again
    fn drop(&mut self) {
        self.controller.in_flight.store(false, Ordering::Release);
        self.controller.transition(SubmissionState::Idle);
    }
}

/// Requests to adopt one pet.
pub struct AdoptionWorkflow {
    pet: PetRecord,
}

impl AdoptionWorkflow {
    pub fn new(pet: PetRecord) -> Self {
        AdoptionWorkflow { pet }
    }

    pub fn pet(&self) -> &PetRecord {
        &self.pet
    }
}

impl Workflow for AdoptionWorkflow {
    type Form = AdoptionForm;
    type Valid = Applicant;
    type Written = AdoptionRequest;

    fn name(&self) -> &'static str {
        "adoption"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn validate(&self, form: &AdoptionForm) -> Result<Applicant, ValidationErrors> {
        validation::validate_applicant(form, PhoneRequirement::Required)
    }

    fn write<'a>(
        &'a self,
        db: &'a (dyn Db + Send + Sync),
        user: Option<Uuid>,
        valid: Applicant,
    ) -> BoxFuture<'a, Result<AdoptionRequest, BackendError>> {
        let request = NewAdoptionRequest::new(*self.pet.id(), user, valid);

        db.insert_request(request)
    }

    fn success(&self, _written: &AdoptionRequest) -> Notification {
        Notification::info(
            "Adoption request sent!",
            format!(
                "Thank you for your interest in adopting {}. We'll be in touch soon.",
                self.pet.name()
            ),
        )
    }
}

/// Uploads a new pet listing on behalf of the signed-in user.
#[derive(Default)]
pub struct ListingWorkflow;

impl Workflow for ListingWorkflow {
    type Form = ListingForm;
    type Valid = NewPet;
    type Written = PetRecord;

    fn name(&self) -> &'static str {
        "listing"
    }

    fn requires_session(&self) -> bool {
        true
    }

    fn validate(&self, form: &ListingForm) -> Result<NewPet, ValidationErrors> {
        validation::validate_listing(form)
    }

    fn write<'a>(
        &'a self,
        db: &'a (dyn Db + Send + Sync),
        user: Option<Uuid>,
        valid: NewPet,
    ) -> BoxFuture<'a, Result<PetRecord, BackendError>> {
        db.insert_pet(valid, user)
    }

    fn success(&self, written: &PetRecord) -> Notification {
        Notification::info(
            "Pet Added Successfully!",
            format!("{} has been added to our adoption list.", written.name()),
        )
    }
}

/// Leaves a message for the shelter. Anyone may write.
#[derive(Default)]
pub struct ContactWorkflow;

impl Workflow for ContactWorkflow {
    type Form = ContactForm;
    type Valid = NewContactMessage;
    type Written = ContactMessage;

    fn name(&self) -> &'static str {
        "contact"
    }

    fn requires_session(&self) -> bool {
        false
    }

    fn validate(&self, form: &ContactForm) -> Result<NewContactMessage, ValidationErrors> {
        validation::validate_contact(form)
    }

    fn write<'a>(
        &'a self,
        db: &'a (dyn Db + Send + Sync),
        _user: Option<Uuid>,
        valid: NewContactMessage,
    ) -> BoxFuture<'a, Result<ContactMessage, BackendError>> {
        db.insert_message(valid)
    }

    fn success(&self, _written: &ContactMessage) -> Notification {
        Notification::info(
            "Message Sent!",
            "We'll get back to you as soon as possible.",
        )
    }
}
