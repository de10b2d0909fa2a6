use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::authentication::errors::CredentialStoreError;
use crate::authentication::errors::LookupError;
use crate::authentication::models::Principal;
use crate::authentication::ports::CredentialStore;
use crate::authentication::ports::PrincipalLookup;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store keyed by username.
///
/// Used when no database is configured, and by the HTTP tests.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
    password_hasher: auth::PasswordHasher,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.contains_key(user.username.as_str()) {
            return Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ));
        }
        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        users.insert(user.username.as_str().to_string(), user.clone());
        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(username.as_str()).cloned())
    }

    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError> {
        self.users
            .write()
            .await
            .remove(username.as_str())
            .map(|_| ())
            .ok_or_else(|| UserError::NotFoundByUsername(username.to_string()))
    }

    async fn update(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|existing| existing.email == user.email && existing.username != user.username)
        {
            return Err(UserError::EmailAlreadyExists(user.email.as_str().to_string()));
        }

        let stored = users
            .get_mut(user.username.as_str())
            .ok_or_else(|| UserError::NotFoundByUsername(user.username.to_string()))?;
        stored.email = user.email.clone();
        stored.password_hash = user.password_hash.clone();
        stored.roles = user.roles.clone();
        stored.enabled = user.enabled;

        Ok(stored.clone())
    }

    async fn list_all(&self) -> Result<Vec<User>, UserError> {
        let mut users: Vec<User> = self.users.read().await.values().cloned().collect();
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.username.as_str().cmp(b.username.as_str()))
        });
        Ok(users)
    }
}

#[async_trait]
impl PrincipalLookup for InMemoryUserRepository {
    async fn lookup(&self, identity: &str) -> Result<Option<Principal>, LookupError> {
        Ok(self
            .users
            .read()
            .await
            .get(identity)
            .filter(|user| user.enabled)
            .map(Principal::from))
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserRepository {
    async fn verify(&self, identifier: &str, password: &str) -> Result<bool, CredentialStoreError> {
        let (stored_hash, enabled) = match self.users.read().await.get(identifier) {
            Some(user) => (Some(user.password_hash.clone()), user.enabled),
            None => (None, false),
        };

        let matched = self
            .password_hasher
            .verify_stored(password, stored_hash.as_deref())
            .map_err(|e| CredentialStoreError::CorruptHash(e.to_string()))?;

        Ok(matched && enabled)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::Utc;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::UserId;

    fn user(username: &str, password: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: auth::PasswordHasher::new().hash(password).unwrap(),
            roles: BTreeSet::from([Role::user()]),
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("alice", "password123")).await.unwrap();

        let same_username = repository.create(user("alice", "password123")).await;
        assert!(matches!(
            same_username,
            Err(UserError::UsernameAlreadyExists(_))
        ));

        let mut same_email = user("alice2", "password123");
        same_email.email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        assert!(matches!(
            repository.create(same_email).await,
            Err(UserError::EmailAlreadyExists(_))
        ));
    }

    #[tokio::test]
    async fn test_lookup_hides_disabled_accounts() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository.create(user("alice", "password123")).await.unwrap();

        let principal = repository.lookup("alice").await.unwrap().unwrap();
        assert_eq!(principal.identity, "alice");
        assert!(principal.has_authority(&Role::user()));

        alice.enabled = false;
        repository.update(alice).await.unwrap();
        assert_eq!(repository.lookup("alice").await.unwrap(), None);
        assert_eq!(repository.lookup("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let repository = InMemoryUserRepository::new();
        let mut alice = repository.create(user("alice", "password123")).await.unwrap();

        assert!(repository.verify("alice", "password123").await.unwrap());
        assert!(!repository.verify("alice", "wrong").await.unwrap());
        assert!(!repository.verify("nobody", "password123").await.unwrap());

        alice.enabled = false;
        repository.update(alice).await.unwrap();
        assert!(!repository.verify("alice", "password123").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_username() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("alice", "password123")).await.unwrap();
        let username = Username::new("alice".to_string()).unwrap();

        repository.delete_by_username(&username).await.unwrap();
        assert!(repository.find_by_username(&username).await.unwrap().is_none());
        assert!(matches!(
            repository.delete_by_username(&username).await,
            Err(UserError::NotFoundByUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_update_keeps_emails_unique() {
        let repository = InMemoryUserRepository::new();
        repository.create(user("alice", "password123")).await.unwrap();
        let mut bob = repository.create(user("bob", "password123")).await.unwrap();

        bob.email = EmailAddress::new("alice@example.com".to_string()).unwrap();
        assert!(matches!(
            repository.update(bob.clone()).await,
            Err(UserError::EmailAlreadyExists(_))
        ));

        bob.email = EmailAddress::new("bob@work.example.com".to_string()).unwrap();
        let updated = repository.update(bob).await.unwrap();
        assert_eq!(updated.email.as_str(), "bob@work.example.com");

        let ghost = user("ghost", "password123");
        assert!(matches!(
            repository.update(ghost).await,
            Err(UserError::NotFoundByUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_list_all_in_creation_order() {
        let repository = InMemoryUserRepository::new();
        let start = Utc::now();
        for (offset, name) in (0..).zip(["carol", "alice", "bob"]) {
            let mut account = user(name, "password123");
            account.created_at = start + chrono::Duration::seconds(offset);
            repository.create(account).await.unwrap();
        }

        let names: Vec<String> = repository
            .list_all()
            .await
            .unwrap()
            .iter()
            .map(|user| user.username.to_string())
            .collect();
        assert_eq!(names, ["carol", "alice", "bob"]);
    }
}
