use futures::future::BoxFuture;
use uuid::Uuid;

use crate::adoption::{AdoptionRequest, NewAdoptionRequest};
use crate::contact::{ContactMessage, NewContactMessage};
use crate::errors::BackendError;
use crate::pet::{NewPet, PetRecord};

#[cfg(test)]
pub(crate) mod mock;

/// The record store holding pets, adoption requests and contact
/// messages.
pub trait Db {
    /// Every available pet, newest first.
    fn list_available(&self) -> BoxFuture<Result<Vec<PetRecord>, BackendError>>;

    /// The pet with the given ID, listed or not.
    fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<PetRecord>, BackendError>>;

    fn insert_pet(
        &self,
        pet: NewPet,
        uploaded_by: Option<Uuid>,
    ) -> BoxFuture<Result<PetRecord, BackendError>>;

    fn insert_request(
        &self,
        request: NewAdoptionRequest,
    ) -> BoxFuture<Result<AdoptionRequest, BackendError>>;

    fn insert_message(
        &self,
        message: NewContactMessage,
    ) -> BoxFuture<Result<ContactMessage, BackendError>>;
}

pub use self::postgres::*;

mod postgres {
    use futures::future::BoxFuture;
    use futures::FutureExt;
    use sqlx::{
        self,
        postgres::{PgPool, PgRow},
    };
    use time::OffsetDateTime;
    use uuid::Uuid;

    use crate::adoption::{AdoptionRequest, NewAdoptionRequest, RequestStatus};
    use crate::contact::{ContactMessage, NewContactMessage};
    use crate::errors::BackendError;
    use crate::pet::{NewPet, PetRecord};

    const REQUESTS_PET_CONSTRAINT: &str = "adoption_requests_pet_id_fkey";

    pub struct PgDb {
        pool: PgPool,
    }

    impl PgDb {
        pub fn new(pool: PgPool) -> Self {
            PgDb { pool }
        }
    }

    // these can be simplified once async functions in traits are stabilized
    impl super::Db for PgDb {
        fn list_available(&self) -> BoxFuture<Result<Vec<PetRecord>, BackendError>> {
            async move {
                let query = sqlx::query(include_str!("queries/list_available.sql"));

                let pets = query
                    .try_map(|row: PgRow| pet_from_row(&row))
                    .fetch_all(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(pets)
            }
            .boxed()
        }

        fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<PetRecord>, BackendError>> {
            let id = *id;

            async move {
                let query = sqlx::query(include_str!("queries/retrieve.sql"));

                let pet = query
                    .bind(id)
                    .try_map(|row: PgRow| pet_from_row(&row))
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(pet)
            }
            .boxed()
        }

        fn insert_pet(
            &self,
            pet: NewPet,
            uploaded_by: Option<Uuid>,
        ) -> BoxFuture<Result<PetRecord, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/create_pet.sql"));

                let (id, available, created_at): (Uuid, bool, OffsetDateTime) = query
                    .bind(&pet.name)
                    .bind(pet.species.as_str())
                    .bind(&pet.breed)
                    .bind(&pet.age)
                    .bind(pet.gender.as_str())
                    .bind(pet.size.map(|s| s.as_str()))
                    .bind(&pet.description)
                    .bind(&pet.images)
                    .bind(&pet.temperament)
                    .bind(&pet.health_status)
                    .bind(uploaded_by)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(PetRecord::new(id, pet, available, uploaded_by, created_at))
            }
            .boxed()
        }

        fn insert_request(
            &self,
            request: NewAdoptionRequest,
        ) -> BoxFuture<Result<AdoptionRequest, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/create_request.sql"));
                let pet_id = request.pet_id;

                let (id, status, created_at, updated_at): (
                    Uuid,
                    String,
                    OffsetDateTime,
                    OffsetDateTime,
                ) = query
                    .bind(request.pet_id)
                    .bind(request.user_id)
                    .bind(&request.name)
                    .bind(&request.email)
                    .bind(&request.phone)
                    .bind(&request.message)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(|e| match e {
                        sqlx::Error::Database(ref d)
                            if d.constraint() == Some(REQUESTS_PET_CONSTRAINT) =>
                        {
                            BackendError::NonExistentId(pet_id)
                        }
                        e => map_sqlx_error(e),
                    })?;

                let status: RequestStatus = status.parse()?;

                Ok(AdoptionRequest::new(
                    id, request, status, created_at, updated_at,
                ))
            }
            .boxed()
        }

        fn insert_message(
            &self,
            message: NewContactMessage,
        ) -> BoxFuture<Result<ContactMessage, BackendError>> {
            async move {
                let query = sqlx::query_as(include_str!("queries/create_message.sql"));

                let (id, created_at): (Uuid, OffsetDateTime) = query
                    .bind(&message.name)
                    .bind(&message.email)
                    .bind(&message.phone)
                    .bind(&message.message)
                    .fetch_one(&self.pool)
                    .await
                    .map_err(map_sqlx_error)?;

                Ok(ContactMessage::new(id, message, created_at))
            }
            .boxed()
        }
    }

    fn pet_from_row(row: &PgRow) -> Result<PetRecord, sqlx::Error> {
        let id: Uuid = try_get(row, "id")?;
        let species: String = try_get(row, "species")?;
        let gender: String = try_get(row, "gender")?;
        let size: Option<String> = try_get(row, "size")?;

        let pet = NewPet {
            name: try_get(row, "name")?,
            species: parse_column(&species)?,
            breed: try_get(row, "breed")?,
            age: try_get(row, "age")?,
            gender: parse_column(&gender)?,
            size: size.as_deref().map(parse_column).transpose()?,
            description: try_get(row, "description")?,
            images: try_get(row, "images")?,
            temperament: try_get(row, "temperament")?,
            health_status: try_get(row, "health_status")?,
        };

        Ok(PetRecord::new(
            id,
            pet,
            try_get(row, "available")?,
            try_get(row, "uploaded_by")?,
            try_get(row, "created_at")?,
        ))
    }

    // the table constraints should make this impossible, but a column
    // we can't interpret is still a decoding error
    fn parse_column<T>(value: &str) -> Result<T, sqlx::Error>
    where
        T: std::str::FromStr<Err = BackendError>,
    {
        value
            .parse()
            .map_err(|e: BackendError| sqlx::Error::Decode(Box::new(e)))
    }

    fn try_get<'a, T: sqlx::Type<sqlx::Postgres> + sqlx::decode::Decode<'a, sqlx::Postgres>>(
        row: &'a PgRow,
        column: &str,
    ) -> Result<T, sqlx::Error> {
        use sqlx::prelude::*;

        row.try_get(column)
    }

    fn map_sqlx_error(error: sqlx::Error) -> BackendError {
        use sqlx::Error;

        match error {
            Error::Database(ref e) if e.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE) => {
                BackendError::NotAuthenticated
            }
            Error::Database(ref e) if e.code().as_deref() == Some(CHECK_VIOLATION) => {
                BackendError::WriteRejected {
                    message: Some(e.message().to_owned()),
                }
            }
            _ => BackendError::Sqlx { source: error },
        }
    }

    /// Raised by row-level security policies when no user is signed in.
    const INSUFFICIENT_PRIVILEGE: &str = "42501";

    const CHECK_VIOLATION: &str = "23514";
}
