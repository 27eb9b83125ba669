//! Field validation for the adoption, listing and contact forms.
//!
//! Each check reports at most one error per field. A form that passes is
//! turned into the value that gets written.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::adoption::{AdoptionForm, Applicant};
use crate::contact::{ContactForm, NewContactMessage};
use crate::pet::{ListingForm, NewPet};

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PHONE_LENGTH: usize = 10;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$"
    )
    .expect("compile email pattern");
}

/// A problem with a single form field.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every field that failed validation, in form order.
#[derive(Clone, Debug, Eq, Error, PartialEq, Serialize)]
#[serde(transparent)]
#[error("{}", summarize(.0))]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }

    /// The error for `field`, if it failed.
    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.0.iter().find(|e| e.field == field)
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Whether a form demands a phone number.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PhoneRequirement {
    Required,
    Optional,
}

#[derive(Default)]
struct Collector(Vec<FieldError>);

impl Collector {
    fn check(&mut self, ok: bool, field: &'static str, message: &'static str) {
        if !ok {
            self.0.push(FieldError { field, message });
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(ValidationErrors(self.0))
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    !email.starts_with('.') && !email.contains("..") && EMAIL.is_match(email)
}

fn length(s: &str) -> usize {
    s.chars().count()
}

fn optional(s: &str) -> Option<String> {
    let s = s.trim();

    if s.is_empty() {
        None
    } else {
        Some(s.to_owned())
    }
}

fn phone_ok(phone: &str, requirement: PhoneRequirement) -> bool {
    match requirement {
        PhoneRequirement::Required => length(phone) >= MIN_PHONE_LENGTH,
        PhoneRequirement::Optional => phone.is_empty() || length(phone) >= MIN_PHONE_LENGTH,
    }
}

pub fn validate_applicant(
    form: &AdoptionForm,
    phone: PhoneRequirement,
) -> Result<Applicant, ValidationErrors> {
    let name = form.name.trim();
    let email = form.email.trim();
    let phone_number = form.phone.trim();

    let mut errors = Collector::default();
    errors.check(
        length(name) >= MIN_NAME_LENGTH,
        "name",
        "Name must be at least 2 characters.",
    );
    errors.check(
        is_valid_email(email),
        "email",
        "Please enter a valid email address.",
    );
    errors.check(
        phone_ok(phone_number, phone),
        "phone",
        "Please enter a valid phone number.",
    );

    errors.finish(|| Applicant {
        name: name.to_owned(),
        email: email.to_owned(),
        phone: phone_number.to_owned(),
        message: optional(&form.message),
    })
}

pub fn validate_listing(form: &ListingForm) -> Result<NewPet, ValidationErrors> {
    let mut errors = Collector::default();
    errors.check(!form.name.trim().is_empty(), "name", "Pet name is required.");
    errors.check(!form.age.trim().is_empty(), "age", "Age is required.");
    errors.check(!form.breed.trim().is_empty(), "breed", "Breed is required.");
    errors.check(
        !form.description.trim().is_empty(),
        "description",
        "Description is required.",
    );
    errors.check(
        !form.images.is_empty(),
        "images",
        "Please upload an image of the pet.",
    );

    errors.finish(|| NewPet {
        name: form.name.trim().to_owned(),
        species: form.species,
        breed: form.breed.trim().to_owned(),
        age: form.age.trim().to_owned(),
        gender: form.gender,
        size: form.size,
        description: optional(&form.description),
        images: form.images.clone(),
        temperament: if form.temperament.is_empty() {
            None
        } else {
            Some(form.temperament.clone())
        },
        health_status: optional(&form.health_status),
    })
}

pub fn validate_contact(form: &ContactForm) -> Result<NewContactMessage, ValidationErrors> {
    let name = form.name.trim();
    let email = form.email.trim();
    let phone = form.phone.trim();

    let mut errors = Collector::default();
    errors.check(
        length(name) >= MIN_NAME_LENGTH,
        "name",
        "Name must be at least 2 characters.",
    );
    errors.check(
        is_valid_email(email),
        "email",
        "Please enter a valid email address.",
    );
    errors.check(
        phone_ok(phone, PhoneRequirement::Optional),
        "phone",
        "Please enter a valid phone number.",
    );
    errors.check(
        !form.message.trim().is_empty(),
        "message",
        "Message is required.",
    );

    errors.finish(|| NewContactMessage {
        name: name.to_owned(),
        email: email.to_owned(),
        phone: optional(phone),
        message: form.message.trim().to_owned(),
    })
}
