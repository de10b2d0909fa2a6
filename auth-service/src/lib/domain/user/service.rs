use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::Role;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for user operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    password_hasher: auth::PasswordHasher,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }

    fn new_user(
        &self,
        command: CreateUserCommand,
        roles: BTreeSet<Role>,
    ) -> Result<User, UserError> {
        let password_hash = self.password_hasher.hash(command.password.expose())?;

        Ok(User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            roles,
            enabled: true,
            created_at: Utc::now(),
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let user = self.new_user(command, BTreeSet::from([Role::user()]))?;

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError> {
        self.repository
            .find_by_username(username)
            .await?
            .ok_or(UserError::NotFoundByUsername(username.to_string()))
    }

    async fn delete_user(&self, username: &Username) -> Result<(), UserError> {
        self.repository.delete_by_username(username).await?;
        tracing::info!(username = %username, "User deleted");

        Ok(())
    }

    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError> {
        let mut user = self.get_user_by_username(username).await?;
        if command.is_empty() {
            return Ok(user);
        }

        if let Some(email) = command.email {
            user.email = email;
        }
        if let Some(password) = command.password {
            user.password_hash = self.password_hasher.hash(password.expose())?;
        }

        let updated_user = self.repository.update(user).await?;
        tracing::info!(username = %updated_user.username, "User updated");

        Ok(updated_user)
    }

    async fn list_users(&self) -> Result<Vec<User>, UserError> {
        self.repository.list_all().await
    }

    async fn set_user_enabled(
        &self,
        username: &Username,
        enabled: bool,
    ) -> Result<User, UserError> {
        let mut user = self.get_user_by_username(username).await?;
        if user.enabled == enabled {
            return Ok(user);
        }

        user.enabled = enabled;
        let updated_user = self.repository.update(user).await?;
        tracing::info!(username = %updated_user.username, enabled, "User access changed");

        Ok(updated_user)
    }

    async fn bootstrap_admin(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let Some(mut user) = self.repository.find_by_username(&command.username).await? else {
            let user = self.new_user(command, BTreeSet::from([Role::user(), Role::admin()]))?;
            let created_user = self.repository.create(user).await?;
            tracing::info!(username = %created_user.username, "Administrator registered");
            return Ok(created_user);
        };

        if user.enabled && user.roles.contains(&Role::admin()) {
            return Ok(user);
        }

        user.roles.insert(Role::admin());
        user.enabled = true;
        let updated_user = self.repository.update(user).await?;
        tracing::info!(username = %updated_user.username, "Administrator role granted");

        Ok(updated_user)
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;
            async fn delete_by_username(&self, username: &Username) -> Result<(), UserError>;
            async fn update(&self, user: User) -> Result<User, UserError>;
            async fn list_all(&self) -> Result<Vec<User>, UserError>;
        }
    }

    fn command(username: &str, email: &str) -> CreateUserCommand {
        CreateUserCommand::new(
            Username::new(username.to_string()).unwrap(),
            EmailAddress::new(email.to_string()).unwrap(),
            Password::new("password123".to_string()).unwrap(),
        )
    }

    fn stored_user(username: &str) -> User {
        User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: "$argon2id$test_hash".to_string(),
            roles: BTreeSet::from([Role::user()]),
            enabled: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_user_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.email.as_str() == "test@example.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.enabled
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let user = service
            .create_user(command("testuser", "test@example.com"))
            .await
            .expect("Failed to create user");

        assert_eq!(user.username.as_str(), "testuser");
        assert_eq!(user.roles, BTreeSet::from([Role::user()]));
        // Password is hashed with real Argon2
        assert!(auth::PasswordHasher::new()
            .verify("password123", &user.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_create().times(1).returning(|user| {
            Err(UserError::UsernameAlreadyExists(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository));

        let result = service
            .create_user(command("testuser", "test2@example.com"))
            .await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::UsernameAlreadyExists(_)
        ));
    }

    #[tokio::test]
    async fn test_get_user_by_username_success() {
        let mut repository = MockTestUserRepository::new();

        let returned_user = stored_user("testuser");
        repository
            .expect_find_by_username()
            .withf(|u| u.as_str() == "testuser")
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("testuser".to_string()).unwrap();
        let user = service.get_user_by_username(&username).await.unwrap();
        assert_eq!(user.username, username);
    }

    #[tokio::test]
    async fn test_get_user_by_username_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("nonexistent".to_string()).unwrap();
        let result = service.get_user_by_username(&username).await;
        assert!(matches!(
            result.unwrap_err(),
            UserError::NotFoundByUsername(_)
        ));
    }

    #[tokio::test]
    async fn test_delete_user_propagates_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_delete_by_username()
            .times(1)
            .returning(|username| Err(UserError::NotFoundByUsername(username.to_string())));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("ghost".to_string()).unwrap();
        assert!(matches!(
            service.delete_user(&username).await,
            Err(UserError::NotFoundByUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_update_user_rehashes_password() {
        let mut repository = MockTestUserRepository::new();

        let returned_user = stored_user("testuser");
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository
            .expect_update()
            .withf(|user| {
                user.email.as_str() == "new@example.com"
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("testuser".to_string()).unwrap();
        let command = UpdateUserCommand {
            email: Some(EmailAddress::new("new@example.com".to_string()).unwrap()),
            password: Some(Password::new("new_password".to_string()).unwrap()),
        };
        let user = service.update_user(&username, command).await.unwrap();

        assert!(auth::PasswordHasher::new()
            .verify("new_password", &user.password_hash)
            .unwrap());
    }

    #[tokio::test]
    async fn test_empty_update_does_not_write() {
        let mut repository = MockTestUserRepository::new();

        let returned_user = stored_user("testuser");
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository.expect_update().never();

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("testuser".to_string()).unwrap();
        let user = service
            .update_user(&username, UpdateUserCommand::default())
            .await
            .unwrap();
        assert_eq!(user.email.as_str(), "testuser@example.com");
    }

    #[tokio::test]
    async fn test_set_user_enabled() {
        let mut repository = MockTestUserRepository::new();

        let returned_user = stored_user("testuser");
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(returned_user.clone())));
        repository
            .expect_update()
            .withf(|user| !user.enabled)
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("testuser".to_string()).unwrap();
        let user = service.set_user_enabled(&username, false).await.unwrap();
        assert!(!user.enabled);
    }

    #[tokio::test]
    async fn test_set_user_enabled_unknown_user() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_update().never();

        let service = UserService::new(Arc::new(repository));

        let username = Username::new("ghost".to_string()).unwrap();
        assert!(matches!(
            service.set_user_enabled(&username, false).await,
            Err(UserError::NotFoundByUsername(_))
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_admin_creates_account() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_username()
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| user.roles == BTreeSet::from([Role::user(), Role::admin()]))
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        let admin = service
            .bootstrap_admin(command("root", "root@example.com"))
            .await
            .unwrap();
        assert!(admin.enabled);
    }

    #[tokio::test]
    async fn test_bootstrap_admin_promotes_existing_account() {
        let mut repository = MockTestUserRepository::new();

        let mut existing = stored_user("root");
        existing.enabled = false;
        repository
            .expect_find_by_username()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().never();
        repository
            .expect_update()
            .withf(|user| {
                user.enabled
                    && user.roles.contains(&Role::admin())
                    && user.password_hash == "$argon2id$test_hash"
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = UserService::new(Arc::new(repository));

        service
            .bootstrap_admin(command("root", "root@example.com"))
            .await
            .unwrap();
    }
}
