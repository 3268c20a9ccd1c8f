use super::domain::{NewUser, Role, User, UserId};
use crate::store::RepositoryError;

/// Storage abstraction for user identities.
///
/// `insert` owns the uniqueness rule for usernames: a second insert with an
/// existing username must fail with [`RepositoryError::Conflict`] and store nothing.
pub trait UserRepository: Send + Sync {
    fn insert(&self, user: NewUser) -> Result<User, RepositoryError>;
    fn fetch(&self, id: UserId) -> Result<Option<User>, RepositoryError>;
    fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError>;
    /// All users in storage order.
    fn list(&self) -> Result<Vec<User>, RepositoryError>;

    fn list_by_role(&self, role: Role) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|user| user.role == role)
            .collect())
    }

    fn username_exists(&self, username: &str) -> Result<bool, RepositoryError> {
        Ok(self.find_by_username(username)?.is_some())
    }
}
