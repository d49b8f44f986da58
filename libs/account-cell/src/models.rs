// libs/account-cell/src/models.rs

#[derive(Debug, Clone, thiserror::Error)]
pub enum AccountError {
    /// Dependent data is already gone when this fires; the login identity
    /// survives in an inconsistent terminal state the design does not repair.
    #[error("Failed to delete authentication identity: {0}")]
    IdentityDeletionFailed(String),
}
