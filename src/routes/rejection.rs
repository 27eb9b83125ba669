use serde::Serialize;
use warp::reject;

use crate::errors::BackendError;
use crate::validation::FieldError;

#[derive(Debug)]
pub struct Rejection {
    pub(crate) context: Context,
    pub(crate) error: BackendError,
}

impl Rejection {
    pub fn new(context: Context, error: BackendError) -> Self {
        Rejection { context, error }
    }

    pub fn flatten(&self) -> FlattenedRejection {
        let fields = match &self.error {
            BackendError::InvalidSubmission(errors) => Some(errors.fields().to_vec()),
            _ => None,
        };

        FlattenedRejection {
            context: self.context.clone(),
            message: self.error.user_message(),
            fields,
        }
    }
}

impl reject::Reject for Rejection {}

#[derive(Debug, Serialize)]
pub struct FlattenedRejection {
    #[serde(flatten)]
    pub(crate) context: Context,
    pub(crate) message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) fields: Option<Vec<FieldError>>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum Context {
    Contact,
    CreatePet,
    Featured,
    List,
    Request { pet: String },
    Retrieve { id: String },
}

impl Context {
    pub fn contact() -> Context {
        Context::Contact
    }

    pub fn create_pet() -> Context {
        Context::CreatePet
    }

    pub fn featured() -> Context {
        Context::Featured
    }

    pub fn list() -> Context {
        Context::List
    }

    pub fn request(pet: String) -> Context {
        Context::Request { pet }
    }

    pub fn retrieve(id: String) -> Context {
        Context::Retrieve { id }
    }
}

