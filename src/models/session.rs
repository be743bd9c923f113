use serde::{Deserialize, Serialize};

/// The signed-in user of the demo login flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub email: String,
    #[serde(rename = "name", alias = "displayName")]
    pub display_name: String,
}

impl SessionRecord {
    /// Builds a record whose display name is the local part of `email`.
    #[must_use]
    pub fn from_email(email: &str) -> Self {
        let display_name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            email: email.to_string(),
            display_name,
        }
    }
}
