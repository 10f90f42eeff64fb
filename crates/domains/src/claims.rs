//! # Claims
//!
//! The string-keyed identity claims issued for a user and carried in access
//! tokens. Downstream handlers read the caller's reference id from `uid`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const UID: &str = "uid";
pub const USERNAME: &str = "username";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(BTreeMap<String, String>);

impl Claims {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard claim set for an authenticated user.
    pub fn for_user(reference_id: &str, username: &str) -> Self {
        let mut claims = Self::new();
        claims.insert(UID, reference_id);
        claims.insert(USERNAME, username);
        claims
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn uid(&self) -> Option<&str> {
        self.get(UID)
    }

    pub fn username(&self) -> Option<&str> {
        self.get(USERNAME)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, String)> for Claims {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
