//! Runs against a migrated database when `SHELTER_TEST_DB_CONNECTION_STRING`
//! is set, and does nothing otherwise.

use std::env;

use uuid::Uuid;

use shelter::adoption::{AdoptionForm, NewAdoptionRequest, RequestStatus};
use shelter::db::{Db, PgDb};
use shelter::errors::BackendError;
use shelter::pet::ListingForm;
use shelter::validation::{validate_applicant, validate_listing, PhoneRequirement};

async fn make_db() -> Option<PgDb> {
    dotenv::dotenv().ok();

    let connection_string = env::var("SHELTER_TEST_DB_CONNECTION_STRING").ok()?;
    let pool = sqlx::Pool::connect(&connection_string)
        .await
        .expect("create PgPool from SHELTER_TEST_DB_CONNECTION_STRING");

    Some(PgDb::new(pool))
}

fn listing(name: &str) -> ListingForm {
    ListingForm {
        name: name.to_owned(),
        age: "5 years".to_owned(),
        breed: "Maine Coon".to_owned(),
        description: "Big and gentle.".to_owned(),
        images: vec!["https://images.example.com/cat.jpg".to_owned()],
        ..Default::default()
    }
}

fn applicant() -> AdoptionForm {
    AdoptionForm {
        name: "Alice Smith".to_owned(),
        email: "alice@example.com".to_owned(),
        phone: "5551234567".to_owned(),
        message: String::new(),
    }
}

#[tokio::test]
async fn inserted_pets_are_listed_and_requestable() {
    let db = match make_db().await {
        Some(db) => db,
        None => return,
    };

    let name = format!("Test {}", Uuid::new_v4());
    let pet = validate_listing(&listing(&name)).expect("valid listing");
    let record = db.insert_pet(pet, None).await.expect("insert pet");
    assert!(record.is_available());

    let listed = db.list_available().await.expect("list pets");
    assert_eq!(listed[0].id(), record.id());

    let retrieved = db
        .retrieve(record.id())
        .await
        .expect("retrieve pet")
        .expect("pet exists");
    assert_eq!(retrieved.name(), name);

    let applicant =
        validate_applicant(&applicant(), PhoneRequirement::Required).expect("valid applicant");
    let request = db
        .insert_request(NewAdoptionRequest::new(*record.id(), None, applicant))
        .await
        .expect("insert request");
    assert_eq!(request.status(), RequestStatus::Pending);
}

#[tokio::test]
async fn requests_for_unknown_pets_fail() {
    let db = match make_db().await {
        Some(db) => db,
        None => return,
    };

    let unknown = Uuid::new_v4();
    let applicant =
        validate_applicant(&applicant(), PhoneRequirement::Required).expect("valid applicant");

    match db
        .insert_request(NewAdoptionRequest::new(unknown, None, applicant))
        .await
    {
        Err(BackendError::NonExistentId(id)) => assert_eq!(id, unknown),
        other => panic!("unexpected result: {:?}", other),
    }
}
