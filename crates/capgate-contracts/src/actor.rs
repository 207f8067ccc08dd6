//! Actor, user, and principal types.
//!
//! An `Actor` is whoever a permission check is about. A `Principal` is a
//! record the permission store can hold capabilities on: a role or a user.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A host user ID. Always positive once it has passed sanitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The subject of a capability resolution. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: UserId,
    /// Role names the actor is a member of.
    pub roles: BTreeSet<String>,
}

impl Actor {
    pub fn new<I, S>(user_id: UserId, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }
}

/// A record the permission store attaches capabilities to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Principal {
    Role(String),
    User(UserId),
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::Role(name) => write!(f, "role:{}", name),
            Principal::User(id) => write!(f, "user:{}", id),
        }
    }
}

/// Display fields the access report shows for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: UserId,
    pub login: String,
    pub email: String,
}
