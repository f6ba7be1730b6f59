use serde::{Deserialize, Serialize};

/// OAuth grant returned by `/oauth/access_token`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenData {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub scope: Option<String>,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

/// The authenticated logbook account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogbookUser {
    pub id: u64,
    pub username: String,
    #[serde(default, rename = "profile_image")]
    pub profile_image_url: Option<String>,
}
