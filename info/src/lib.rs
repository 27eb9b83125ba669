//! Build metadata shared by the shelter binaries.

pub const NAME: &str = "shelter";

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const REVISION: Option<&str> = option_env!("SHELTER_REVISION");

pub const BUILD_TIMESTAMP: Option<&str> = option_env!("SHELTER_BUILD_TIMESTAMP");
