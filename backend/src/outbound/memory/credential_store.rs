use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{Email, User};

/// Credential store keyed by the verbatim email address.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: Mutex<HashMap<String, User>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, User>>, CredentialStoreError> {
        self.users
            .lock()
            .map_err(|_| CredentialStoreError::query("credential store lock poisoned"))
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, CredentialStoreError> {
        Ok(self.lock()?.get(email.as_ref()).cloned())
    }

    async fn insert(&self, user: &User) -> Result<(), CredentialStoreError> {
        let mut users = self.lock()?;
        let key = user.email().as_ref().to_owned();
        if users.contains_key(&key) {
            return Err(CredentialStoreError::duplicate_email(key));
        }
        users.insert(key, user.clone());
        Ok(())
    }
}
