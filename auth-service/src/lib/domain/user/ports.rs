use async_trait::async_trait;

use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::UpdateUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::models::Username;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user with the default role.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError>;

    /// Retrieve user by unique username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn get_user_by_username(&self, username: &Username) -> Result<User, UserError>;

    /// Delete a user account.
    ///
    /// Tokens already issued for the account stop authenticating because the
    /// subject no longer resolves.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn delete_user(&self, username: &Username) -> Result<(), UserError>;

    /// Change the email and/or password of an account.
    ///
    /// An empty command leaves the account untouched.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `EmailAlreadyExists` - Email belongs to another account
    /// * `Password` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn update_user(
        &self,
        username: &Username,
        command: UpdateUserCommand,
    ) -> Result<User, UserError>;

    /// All accounts, oldest first.
    async fn list_users(&self) -> Result<Vec<User>, UserError>;

    /// Enable or disable an account.
    ///
    /// A disabled account cannot log in, and tokens already issued for it
    /// stop authenticating until it is enabled again.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - No user with this username
    /// * `DatabaseError` - Database operation failed
    async fn set_user_enabled(
        &self,
        username: &Username,
        enabled: bool,
    ) -> Result<User, UserError>;

    /// Make sure an administrator account exists.
    ///
    /// Creates the account with the `USER` and `ADMIN` roles, or grants
    /// `ADMIN` to an existing account of that name and enables it. An
    /// existing account keeps its password.
    async fn bootstrap_admin(&self, command: CreateUserCommand) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by username.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Remove user from storage.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn delete_by_username(&self, username: &Username) -> Result<(), UserError>;

    /// Overwrite the stored email, password hash, roles and enabled flag of
    /// the user with the same username.
    ///
    /// # Errors
    /// * `NotFoundByUsername` - User does not exist
    /// * `EmailAlreadyExists` - Email belongs to another account
    /// * `DatabaseError` - Database operation failed
    async fn update(&self, user: User) -> Result<User, UserError>;

    /// Retrieve every user, ordered by creation time.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_all(&self) -> Result<Vec<User>, UserError>;
}
