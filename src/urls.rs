use url::Url;
use uuid::Uuid;

/// Convenience wrapper for URL generation functions.
#[derive(Clone, Debug)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,

    /// Path for all pet-related actions.
    pub(crate) pets_path: String,

    /// Prefix for all pet-related actions.
    pets_prefix: String,

    /// Where visitors without a session are sent.
    sign_in: Url,
}

impl Urls {
    /// Create a new instance. `pets_prefix` should *not* include a trailing slash.
    pub fn new(
        base: impl AsRef<str>,
        pets_prefix: impl Into<String>,
        sign_in_path: impl AsRef<str>,
    ) -> Self {
        let base =
            Url::parse(base.as_ref()).unwrap_or_else(|_| panic!("parse {} as URL", base.as_ref()));
        let pets_path = pets_prefix.into();
        let pets_prefix = format!("{}/", pets_path);
        let sign_in = base
            .join(sign_in_path.as_ref())
            .unwrap_or_else(|_| panic!("get sign-in URL from {}", sign_in_path.as_ref()));

        Urls {
            base,
            pets_path,
            pets_prefix,
            sign_in,
        }
    }

    pub fn pets(&self) -> Url {
        self.base.join(&self.pets_prefix).expect("get pets URL")
    }

    pub fn pet(&self, id: &Uuid) -> Url {
        let path = format!("id/{}", id);
        self.pets()
            .join(&path)
            .unwrap_or_else(|_| panic!("get URL for pet {}", id))
    }

    pub fn sign_in(&self) -> &Url {
        &self.sign_in
    }
}
