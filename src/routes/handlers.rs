use std::time::{Duration, Instant};

use log::debug;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use warp::{
    http::StatusCode,
    hyper::body::Bytes,
    reject,
    reply::{json, with_header, with_status, Reply},
};

use crate::adoption::AdoptionForm;
use crate::contact::ContactForm;
use crate::environment::Environment;
use crate::errors::BackendError;
use crate::filter;
use crate::pet::{ListingForm, PetRecord};
use crate::routes::{
    query::FilterQuery,
    rejection::{Context, Rejection},
    response::SuccessResponse,
};
use crate::workflow::{AdoptionWorkflow, ContactWorkflow, ListingWorkflow, Workflow};

const SERVER_TIMING_HEADER: &str = "server-timing";
type RouteResult = Result<Box<dyn Reply>, reject::Rejection>;

macro_rules! timed {
    ($($expression:stmt);+) => {
        let start = Instant::now();

        let result = { $($expression)+ };

        Ok(Box::new(with_header(
            result,
            SERVER_TIMING_HEADER,
            format_server_timing(start.elapsed()),
        )) as Box<dyn Reply>)
    };
}

pub async fn list(environment: Environment, query: FilterQuery) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::list(), e);

        let filter = query.into_filter().map_err(error_handler)?;
        let pets = environment.db.list_available().await.map_err(error_handler)?;
        debug!(environment.logger, "Filtering pets..."; "species" => %filter.species, "search" => &filter.search);

        json(&SuccessResponse::Pets {
            pets: filter::compute_visible(&pets, &filter),
        })
    }
}

pub async fn featured(environment: Environment, query: FilterQuery) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::featured(), e);

        let filter = query.into_filter().map_err(error_handler)?;
        let pets = environment.db.list_available().await.map_err(error_handler)?;
        let visible = filter::compute_visible(&pets, &filter);

        json(&SuccessResponse::Pets {
            pets: filter::featured(&visible, environment.config.featured_per_species),
        })
    }
}

pub async fn retrieve(environment: Environment, id: String) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::retrieve(id.clone()), e);

        let id = parse_id(&id).map_err(error_handler)?;
        debug!(environment.logger, "Retrieving pet..."; "id" => %id);

        // unlisted pets are not shown to visitors
        let pet = environment
            .db
            .retrieve(&id)
            .await
            .map_err(error_handler)?
            .filter(PetRecord::is_available)
            .ok_or(BackendError::NonExistentId(id))
            .map_err(error_handler)?;

        with_status(json(&pet), StatusCode::OK)
    }
}

pub async fn create(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::create_pet(), e);

        debug!(environment.logger, "Parsing listing...");
        let form: ListingForm = parse_body(&body).map_err(error_handler)?;
        let workflow = ListingWorkflow;
        let pet = workflow
            .validate(&form)
            .map_err(BackendError::InvalidSubmission)
            .map_err(error_handler)?;

        debug!(environment.logger, "Writing pet to database..."; "name" => pet.name());
        let record = workflow
            .write(environment.db.as_ref(), None, pet)
            .await
            .map_err(error_handler)?;
        let id = *record.id();

        with_header(
            with_status(json(&SuccessResponse::Created { id }), StatusCode::CREATED),
            "location",
            environment.urls.pet(&id).as_str(),
        )
    }
}

pub async fn request(environment: Environment, pet_id: String, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::request(pet_id.clone()), e);

        let id = parse_id(&pet_id).map_err(error_handler)?;
        let form: AdoptionForm = parse_body(&body).map_err(error_handler)?;

        debug!(environment.logger, "Looking up pet..."; "pet" => %id);
        let pet = environment
            .db
            .retrieve(&id)
            .await
            .map_err(error_handler)?
            .filter(PetRecord::is_available)
            .ok_or(BackendError::NonExistentId(id))
            .map_err(error_handler)?;

        let workflow = AdoptionWorkflow::new(pet);
        let applicant = workflow
            .validate(&form)
            .map_err(BackendError::InvalidSubmission)
            .map_err(error_handler)?;

        debug!(environment.logger, "Writing adoption request..."; "pet" => %id);
        let request = workflow
            .write(environment.db.as_ref(), None, applicant)
            .await
            .map_err(error_handler)?;

        with_status(
            json(&SuccessResponse::Request {
                id: *request.id(),
                pet: *workflow.pet().id(),
                status: request.status().as_str(),
            }),
            StatusCode::CREATED,
        )
    }
}

pub async fn contact(environment: Environment, body: Bytes) -> RouteResult {
    timed! {
        let error_handler = |e: BackendError| Rejection::new(Context::contact(), e);

        let form: ContactForm = parse_body(&body).map_err(error_handler)?;
        let workflow = ContactWorkflow;
        let message = workflow
            .validate(&form)
            .map_err(BackendError::InvalidSubmission)
            .map_err(error_handler)?;

        debug!(environment.logger, "Writing contact message...");
        let message = workflow
            .write(environment.db.as_ref(), None, message)
            .await
            .map_err(error_handler)?;

        with_status(
            json(&SuccessResponse::Created { id: *message.id() }),
            StatusCode::CREATED,
        )
    }
}

fn parse_id(id: &str) -> Result<Uuid, BackendError> {
    Uuid::parse_str(id).map_err(|source| BackendError::InvalidId {
        id: id.to_owned(),
        source,
    })
}

fn parse_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, BackendError> {
    serde_json::from_slice(body).map_err(BackendError::MalformedSubmission)
}

fn format_server_timing(seconds: Duration) -> String {
    format!("handler;dur={}", seconds.as_secs_f64() * 1000.0)
}
