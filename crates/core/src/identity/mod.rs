//! Caller identity as resolved by the request layer.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Who is calling. The request layer builds this from a verified token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: String,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, is_admin: bool) -> Self {
        Self {
            user_id: user_id.into(),
            is_admin,
        }
    }

    /// Admins may act on anyone; everyone else only on themselves.
    pub fn can_access_user(&self, user_id: &str) -> bool {
        self.is_admin || self.user_id == user_id
    }
}

/// Fails with Unauthorized when no identity was resolved.
pub fn require_identity(identity: Option<&Identity>) -> Result<&Identity> {
    match identity {
        Some(identity) if !identity.user_id.trim().is_empty() => Ok(identity),
        _ => Err(Error::Unauthorized("authentication required".to_string())),
    }
}

pub fn require_admin(identity: Option<&Identity>) -> Result<&Identity> {
    let identity = require_identity(identity)?;
    if !identity.is_admin {
        return Err(Error::Unauthorized("admin access required".to_string()));
    }
    Ok(identity)
}
