use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use super::users_model::{NewUser, User, UserUpdate};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{Error, Result};

/// Service for managing users.
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    fn list_users(&self) -> Result<Vec<User>> {
        self.repository.list()
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        if user_id.trim().is_empty() {
            return Err(Error::missing_field("userId"));
        }
        self.repository.get_by_id(user_id)
    }

    async fn create_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        let new_user = NewUser {
            name: new_user.name.trim().to_string(),
            email: new_user.email.trim().to_lowercase(),
            ..new_user
        };
        let user = self.repository.create(new_user).await?;
        info!("Created user {}", user.id);
        Ok(user)
    }

    async fn update_user(&self, user_id: &str, update: UserUpdate) -> Result<User> {
        update.validate()?;
        if update.is_empty() {
            return self.get_user(user_id);
        }
        let update = UserUpdate {
            name: update.name.map(|n| n.trim().to_string()),
            email: update.email.map(|e| e.trim().to_lowercase()),
            is_admin: update.is_admin,
        };
        let user = self.repository.update(user_id, update).await?;
        debug!("Updated user {}", user_id);
        Ok(user)
    }

    async fn delete_user(&self, user_id: &str) -> Result<()> {
        let deleted = self.repository.delete(user_id).await?;
        if deleted == 0 {
            return Err(Error::not_found("User", user_id));
        }
        info!("Deleted user {}", user_id);
        Ok(())
    }
}
