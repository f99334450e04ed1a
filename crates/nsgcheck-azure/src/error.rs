use thiserror::Error;

#[derive(Debug, Error)]
pub enum AzureError {
    #[error("credential acquisition failed: {0}")]
    Credential(String),

    #[error("client construction failed: {0}")]
    ClientConstruction(String),

    #[error("GET {url}: {message}")]
    Request { url: String, message: String },

    #[error("{resource} does not exist")]
    NotFound { resource: String },

    #[error("ARM returned status {status} for {url}: {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },
}
