use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::normalization;

text_enum! {
    /// Where a request stands. Staff move it along; this crate only
    /// creates pending requests.
    RequestStatus as "request status" {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Completed => "completed",
    }
}

impl Default for RequestStatus {
    fn default() -> Self {
        RequestStatus::Pending
    }
}

/// An adoption request held by the record store.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct AdoptionRequest {
    id: Uuid,

    #[serde(flatten)]
    request: NewAdoptionRequest,

    status: RequestStatus,

    #[serde(with = "time::serde::timestamp")]
    created_at: OffsetDateTime,

    #[serde(with = "time::serde::timestamp")]
    updated_at: OffsetDateTime,
}

impl AdoptionRequest {
    pub fn new(
        id: Uuid,
        request: NewAdoptionRequest,
        status: RequestStatus,
        created_at: OffsetDateTime,
        updated_at: OffsetDateTime,
    ) -> Self {
        AdoptionRequest {
            id,
            request,
            status,
            created_at,
            updated_at,
        }
    }

    pub fn id(&self) -> &Uuid {
        &self.id
    }

    pub fn request(&self) -> &NewAdoptionRequest {
        &self.request
    }

    pub fn status(&self) -> RequestStatus {
        self.status
    }
}

/// An adoption request before the store has accepted it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct NewAdoptionRequest {
    pub(crate) pet_id: Uuid,

    /// The signed-in requester, if there is one.
    pub(crate) user_id: Option<Uuid>,

    pub(crate) name: String,

    pub(crate) email: String,

    pub(crate) phone: String,

    pub(crate) message: Option<String>,
}

impl NewAdoptionRequest {
    pub fn new(pet_id: Uuid, user_id: Option<Uuid>, applicant: Applicant) -> Self {
        let Applicant {
            name,
            email,
            phone,
            message,
        } = applicant;

        NewAdoptionRequest {
            pet_id,
            user_id,
            name,
            email,
            phone,
            message,
        }
    }

    pub fn pet_id(&self) -> &Uuid {
        &self.pet_id
    }
}

/// The requester's validated contact details.
#[derive(Clone, Debug, PartialEq)]
pub struct Applicant {
    pub(crate) name: String,
    pub(crate) email: String,
    pub(crate) phone: String,
    pub(crate) message: Option<String>,
}

/// The adoption form as the user fills it in.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct AdoptionForm {
    #[serde(deserialize_with = "normalization::deserialize")]
    pub name: String,

    pub email: String,

    pub phone: String,

    pub message: String,
}
