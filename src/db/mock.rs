use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use futures::future::{BoxFuture, FutureExt};
use time::OffsetDateTime;
use tokio::sync::oneshot;
use uuid::Uuid;

use crate::adoption::{AdoptionRequest, NewAdoptionRequest, RequestStatus};
use crate::contact::{ContactMessage, NewContactMessage};
use crate::db::Db;
use crate::errors::BackendError;
use crate::pet::{NewPet, PetRecord};

/// An in-memory record store. Writes can be made to fail or to wait
/// until released.
#[derive(Default)]
pub(crate) struct MockDb {
    pub(crate) pets: RwLock<Vec<PetRecord>>,
    pub(crate) requests: RwLock<Vec<AdoptionRequest>>,
    pub(crate) messages: RwLock<Vec<ContactMessage>>,
    failure: Mutex<Option<BackendError>>,
    load_failure: Mutex<Option<BackendError>>,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    writes: AtomicUsize,
}

impl MockDb {
    pub(crate) fn with_pets(pets: Vec<PetRecord>) -> Self {
        MockDb {
            pets: RwLock::new(pets),
            ..Default::default()
        }
    }

    /// The number of writes attempted so far.
    pub(crate) fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub(crate) fn fail_next_write(&self, error: BackendError) {
        *self.failure.lock().unwrap() = Some(error);
    }

    pub(crate) fn fail_next_load(&self, error: BackendError) {
        *self.load_failure.lock().unwrap() = Some(error);
    }

    /// Makes the next write wait until the returned sender fires or is
    /// dropped.
    pub(crate) fn hold_next_write(&self) -> oneshot::Sender<()> {
        let (sender, receiver) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(receiver);

        sender
    }

    async fn begin_write(&self) -> Result<(), BackendError> {
        self.writes.fetch_add(1, Ordering::SeqCst);

        let gate = self.gate.lock().unwrap().take();

        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.failure.lock().unwrap().take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Db for MockDb {
    fn list_available(&self) -> BoxFuture<Result<Vec<PetRecord>, BackendError>> {
        async move {
            if let Some(e) = self.load_failure.lock().unwrap().take() {
                return Err(e);
            }

            let mut pets = self
                .pets
                .read()
                .unwrap()
                .iter()
                .filter(|p| p.available)
                .cloned()
                .collect::<Vec<_>>();
            pets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

            Ok(pets)
        }
        .boxed()
    }

    fn retrieve(&self, id: &Uuid) -> BoxFuture<Result<Option<PetRecord>, BackendError>> {
        let id = *id;

        async move {
            let pets = self.pets.read().unwrap();

            Ok(pets.iter().find(|p| *p.id() == id).cloned())
        }
        .boxed()
    }

    fn insert_pet(
        &self,
        pet: NewPet,
        uploaded_by: Option<Uuid>,
    ) -> BoxFuture<Result<PetRecord, BackendError>> {
        async move {
            self.begin_write().await?;

            let record = PetRecord::new(
                Uuid::new_v4(),
                pet,
                true,
                uploaded_by,
                OffsetDateTime::now_utc(),
            );
            self.pets.write().unwrap().push(record.clone());

            Ok(record)
        }
        .boxed()
    }

    fn insert_request(
        &self,
        request: NewAdoptionRequest,
    ) -> BoxFuture<Result<AdoptionRequest, BackendError>> {
        async move {
            self.begin_write().await?;

            let known = self
                .pets
                .read()
                .unwrap()
                .iter()
                .any(|p| *p.id() == request.pet_id);

            if !known {
                return Err(BackendError::NonExistentId(request.pet_id));
            }

            let now = OffsetDateTime::now_utc();
            let request =
                AdoptionRequest::new(Uuid::new_v4(), request, RequestStatus::Pending, now, now);
            self.requests.write().unwrap().push(request.clone());

            Ok(request)
        }
        .boxed()
    }

    fn insert_message(
        &self,
        message: NewContactMessage,
    ) -> BoxFuture<Result<ContactMessage, BackendError>> {
        async move {
            self.begin_write().await?;

            let message = ContactMessage::new(Uuid::new_v4(), message, OffsetDateTime::now_utc());
            self.messages.write().unwrap().push(message.clone());

            Ok(message)
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::MockDb;
    use crate::db::Db;
    use crate::pet::fixtures::pet;
    use crate::pet::Species;

    #[tokio::test]
    async fn lists_only_available_pets_newest_first() {
        let mut hidden = pet(3, "Ghost", Species::Cat, "Sphynx");
        hidden.available = false;

        let db = MockDb::with_pets(vec![
            pet(1, "Rex", Species::Dog, "Boxer"),
            hidden,
            pet(2, "Luna", Species::Cat, "Siamese"),
        ]);

        let names = db
            .list_available()
            .await
            .expect("list pets")
            .iter()
            .map(|p| p.name().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["Luna", "Rex"]);
    }
}
