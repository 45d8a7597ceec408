#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Could not create PAM client for service `{service}': {error}")]
    Start { service: String, error: String },

    #[error("Could not authenticate user `{user}' for service `{service}': {error}")]
    Denied {
        user: String,
        service: String,
        error: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
