use serde::{Deserialize, Serialize};

/// Credentials body shared by register and login. Missing fields decode as empty.
#[derive(Debug, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl Credentials {
    pub fn is_complete(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
