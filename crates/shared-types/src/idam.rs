use serde::{Deserialize, Serialize};

/// Identity of the authenticated user as reported by `/o/userinfo`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    #[serde(default, alias = "uid")]
    pub id: String,
    #[serde(default, alias = "sub")]
    pub email: String,
    #[serde(default, alias = "given_name")]
    pub forename: String,
    #[serde(default, alias = "family_name")]
    pub surname: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A bearer token together with the identity it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub auth_token: String,
    pub user_details: UserDetails,
}

impl User {
    pub fn new(auth_token: impl Into<String>, user_details: UserDetails) -> Self {
        Self {
            auth_token: auth_token.into(),
            user_details,
        }
    }

    /// The token in `Bearer <token>` form, whatever form it was stored in.
    pub fn bearer(&self) -> String {
        if self.auth_token.starts_with("Bearer ") {
            self.auth_token.clone()
        } else {
            format!("Bearer {}", self.auth_token)
        }
    }
}
