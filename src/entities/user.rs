use serde::{Deserialize, Serialize};

use crate::utils::{new_object_id, now_ms};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>, is_admin: bool) -> Self {
        let now = now_ms();
        Self {
            id: new_object_id(),
            name: name.into(),
            email: email.into(),
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn owner_ref(&self) -> OwnerRef {
        OwnerRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Owner projection used when populating orders: `{ _id, name }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OwnerRef {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
}
