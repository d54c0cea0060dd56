use std::sync::Arc;

use log::warn;

use super::orders_model::Order;
use super::orders_traits::{OrderRepositoryTrait, OrderServiceTrait};
use crate::errors::{Error, Result};
use crate::identity::{require_identity, Identity};

pub struct OrderService {
    repository: Arc<dyn OrderRepositoryTrait>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepositoryTrait>) -> Self {
        Self { repository }
    }
}

impl OrderServiceTrait for OrderService {
    fn list_orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        if user_id.trim().is_empty() {
            return Err(Error::missing_field("userId"));
        }
        self.repository.list_for_user(user_id)
    }

    fn list_orders_for(
        &self,
        identity: Option<&Identity>,
        requested_user_id: Option<&str>,
    ) -> Result<Vec<Order>> {
        let identity = require_identity(identity)?;
        let target = requested_user_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(identity.user_id.as_str());

        if !identity.can_access_user(target) {
            warn!(
                "User {} asked for orders of user {}",
                identity.user_id, target
            );
            return Err(Error::Unauthorized(
                "cannot read another user's orders".to_string(),
            ));
        }
        self.repository.list_for_user(target)
    }
}
