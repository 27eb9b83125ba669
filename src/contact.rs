use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalization;

/// A message left through the contact form.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ContactMessage {
    id: Uuid,

    #[serde(flatten)]
    message: NewContactMessage,

    #[serde(with = "time::serde::timestamp")]
    created_at: OffsetDateTime,
}

impl ContactMessage {
    pub fn new(id: Uuid, message: NewContactMessage, created_at: OffsetDateTime) -> Self {
        ContactMessage {
            id,
            message,
            created_at,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NewContactMessage {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: Option<String>,
    pub(crate) message: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct ContactForm {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    pub email: String,

    pub phone: String,

    pub message: String,
}
