use std::sync::RwLock;

use url::Url;
use uuid::Uuid;

/// What the auth provider says about the current visitor.
pub trait Session: Send + Sync {
    /// The signed-in user, if any.
    fn user(&self) -> Option<Uuid>;

    fn is_present(&self) -> bool {
        self.user().is_some()
    }
}

/// A session the auth adapter updates as the visitor signs in and out.
#[derive(Debug, Default)]
pub struct SessionHandle {
    user: RwLock<Option<Uuid>>,
}

impl SessionHandle {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: Uuid) -> Self {
        SessionHandle {
            user: RwLock::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: Uuid) {
        *self.user.write().unwrap() = Some(user);
    }

    pub fn sign_out(&self) {
        *self.user.write().unwrap() = None;
    }
}

impl Session for SessionHandle {
    fn user(&self) -> Option<Uuid> {
        *self.user.read().unwrap()
    }
}

/// Moves the visitor to another page.
pub trait Navigator: Send + Sync {
    fn redirect(&self, to: &Url);
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::sync::Mutex;

    use url::Url;

    use super::Navigator;

    #[derive(Default)]
    pub(crate) struct RecordingNavigator {
        pub(crate) visited: Mutex<Vec<Url>>,
    }

    impl Navigator for RecordingNavigator {
        fn redirect(&self, to: &Url) {
            self.visited.lock().unwrap().push(to.clone());
        }
    }
}
