pub mod credential_store;
pub mod errors;
pub mod types;

pub use credential_store::CredentialStore;
pub use errors::CredentialStoreError;
pub use types::{BearerToken, Credential, Role, UserProfile};
