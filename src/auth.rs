use alloy_primitives::Address;
use async_trait::async_trait;
use secrecy::Secret;

/// A consumer account ordering services. Key management and signing live in
/// the collaborating wallet layer; only the address is needed here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Account {
    pub address: Address,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Account { address }
    }
}

#[derive(Debug)]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    pub fn new(message: impl Into<String>) -> Self {
        AuthError {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AuthError {}

/// Credential the compute provider accepts for a consumer, exposed only at
/// the HTTP boundary.
pub type AuthToken = Secret<String>;

#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn get_token(&self, account: &Account) -> Result<AuthToken, AuthError>;
}
