use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("deployment output error: {0}")]
    Output(#[from] nsgcheck_terraform::OutputError),

    #[error("azure error: {0}")]
    Azure(#[from] nsgcheck_azure::AzureError),

    #[error("domain error: {0}")]
    Domain(#[from] nsgcheck_domain::DomainError),
}
