use std::sync::Arc;

use log::Logger;

use crate::db::Db;
use crate::notification::NotificationSink;
use crate::session::{Navigator, Session};
use crate::urls::Urls;
use crate::workflow;

/// Everything a route handler needs. Cloning is cheap.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<dyn Db + Send + Sync>,
    pub urls: Arc<Urls>,
    pub config: Config,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<dyn Db + Send + Sync>,
        urls: Arc<Urls>,
        config: Config,
    ) -> Self {
        Self {
            logger,
            db,
            urls,
            config,
        }
    }

    /// Builds the collaborators for a submission controller serving one
    /// visitor.
    pub fn workflow_context(
        &self,
        session: Arc<dyn Session>,
        notifier: Arc<dyn NotificationSink>,
        navigator: Arc<dyn Navigator>,
    ) -> workflow::Context {
        workflow::Context {
            logger: self.logger.clone(),
            db: self.db.clone(),
            session,
            notifier,
            navigator,
            sign_in: self.urls.sign_in().clone(),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) featured_per_species: usize,
}

impl Config {
    pub fn new(featured_per_species: usize) -> Self {
        Self {
            featured_per_species,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(2)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Config, Environment};
    use crate::contact::ContactForm;
    use crate::db::mock::MockDb;
    use crate::notification::LogSink;
    use crate::session::fakes::RecordingNavigator;
    use crate::session::SessionHandle;
    use crate::urls::Urls;
    use crate::workflow::{ContactWorkflow, SubmissionController, SubmitOutcome};

    #[tokio::test]
    async fn workflow_contexts_share_the_store_and_sign_in_url() {
        let db = Arc::new(MockDb::default());
        let logger = Arc::new(log::discard());
        let environment = Environment::new(
            logger.clone(),
            db.clone(),
            Arc::new(Urls::new("https://shelter.example.com/", "pets", "/auth")),
            Config::default(),
        );

        let context = environment.workflow_context(
            Arc::new(SessionHandle::anonymous()),
            Arc::new(LogSink::new(logger)),
            Arc::new(RecordingNavigator::default()),
        );
        assert_eq!(context.sign_in.as_str(), "https://shelter.example.com/auth");

        let controller = SubmissionController::new(ContactWorkflow, context);
        let outcome = controller
            .submit(ContactForm {
                name: "Sam Jones".to_owned(),
                email: "sam@example.com".to_owned(),
                phone: "555 123 4567".to_owned(),
                message: "Hello!".to_owned(),
            })
            .await;

        assert!(matches!(outcome, SubmitOutcome::Succeeded(_)));
        assert_eq!(db.messages.read().unwrap().len(), 1);
    }
}
