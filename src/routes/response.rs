use serde::Serialize;
use uuid::Uuid;

use crate::pet::PetRecord;

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum SuccessResponse<'a> {
    Created {
        id: Uuid,
    },
    Healthz {
        revision: Option<&'a str>,
        timestamp: Option<&'a str>,
        version: &'a str,
    },
    Pets {
        pets: Vec<PetRecord>,
    },
    Request {
        id: Uuid,
        pet: Uuid,
        status: &'a str,
    },
}
