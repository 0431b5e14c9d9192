//! Caller authentication
//!
//! Tokens are lowercase hex SHA-512 digests. Ordinary callers sign
//! `account + login + salt`; the admin login signs the current local hour
//! (`%Y%m%d%H`) plus the admin salt, so an admin token stays valid for the
//! rest of the wall-clock hour it was issued in.

use chrono::NaiveDateTime;
use constant_time_eq::constant_time_eq;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};

use crate::binder::BoundRequest;
use crate::error::DispatchError;

/// Hour-resolution timestamp signed by admin tokens
pub const ADMIN_HOUR_FORMAT: &str = "%Y%m%d%H";

/// Shared secrets used to derive expected tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSecrets {
    /// Salt for ordinary account tokens
    #[serde(default = "default_salt")]
    pub salt: String,
    /// Salt for hourly admin tokens
    #[serde(default = "default_admin_salt")]
    pub admin_salt: String,
    /// Login that is granted admin rights
    #[serde(default = "default_admin_login")]
    pub admin_login: String,
}

fn default_salt() -> String {
    "Otus".to_string()
}

fn default_admin_salt() -> String {
    "42".to_string()
}

fn default_admin_login() -> String {
    "admin".to_string()
}

impl Default for AuthSecrets {
    fn default() -> Self {
        Self {
            salt: default_salt(),
            admin_salt: default_admin_salt(),
            admin_login: default_admin_login(),
        }
    }
}

/// Credentials taken from a validated envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub account: String,
    pub login: String,
    pub token: String,
    pub is_admin: bool,
}

/// Derives and checks caller tokens
#[derive(Debug, Clone, Default)]
pub struct Authenticator {
    secrets: AuthSecrets,
}

impl Authenticator {
    pub fn new(secrets: AuthSecrets) -> Self {
        Self { secrets }
    }

    pub fn secrets(&self) -> &AuthSecrets {
        &self.secrets
    }

    /// Extract credentials from a bound envelope; null fields read as `""`
    pub fn context(&self, envelope: &BoundRequest) -> AuthContext {
        let login = envelope.text("login").unwrap_or_default().to_string();
        AuthContext {
            account: envelope.text("account").unwrap_or_default().to_string(),
            is_admin: login == self.secrets.admin_login,
            token: envelope.text("token").unwrap_or_default().to_string(),
            login,
        }
    }

    /// Token the caller must present at `now`
    pub fn expected_token(&self, auth: &AuthContext, now: NaiveDateTime) -> String {
        if auth.is_admin {
            admin_token(&self.secrets.admin_salt, now)
        } else {
            account_token(&auth.account, &auth.login, &self.secrets.salt)
        }
    }

    /// Compare the presented token with the expected digest
    pub fn authenticate(&self, auth: &AuthContext, now: NaiveDateTime) -> Result<(), DispatchError> {
        let expected = self.expected_token(auth, now);
        if constant_time_eq(expected.as_bytes(), auth.token.as_bytes()) {
            Ok(())
        } else {
            tracing::warn!(login = %auth.login, is_admin = auth.is_admin, "Token mismatch");
            Err(DispatchError::AuthenticationFailed {
                login: auth.login.clone(),
            })
        }
    }
}

/// Admin token for the hour containing `now`
pub fn admin_token(admin_salt: &str, now: NaiveDateTime) -> String {
    sha512_hex(&format!("{}{}", now.format(ADMIN_HOUR_FORMAT), admin_salt))
}

/// Token for an ordinary account/login pair
pub fn account_token(account: &str, login: &str, salt: &str) -> String {
    sha512_hex(&format!("{}{}{}", account, login, salt))
}

fn sha512_hex(input: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::method_envelope;
    use chrono::NaiveDate;
    use serde_json::json;

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2017, 7, 20)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn envelope(body: serde_json::Value) -> BoundRequest {
        method_envelope().bind_at(body.as_object().unwrap(), at(0, 0).date())
    }

    #[test]
    fn test_account_token_is_sha512_hex() {
        let token = account_token("horns&hoofs", "h&f", "Otus");
        assert_eq!(token.len(), 128);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(token, account_token("horns&hoofs", "h&f", "Otus"));
        assert_ne!(token, account_token("horns&hoofs", "h&f", "other"));
    }

    #[test]
    fn test_admin_token_rolls_hourly() {
        assert_eq!(admin_token("42", at(10, 0)), admin_token("42", at(10, 59)));
        assert_ne!(admin_token("42", at(10, 59)), admin_token("42", at(11, 0)));
        assert_eq!(admin_token("42", at(10, 5)), sha512_hex("201707201042"));
    }

    #[test]
    fn test_context_from_envelope() {
        let auth = Authenticator::default();
        let ctx = auth.context(&envelope(json!({
            "login": "admin",
            "token": "t",
            "arguments": {},
            "method": "online_score"
        })));

        assert!(ctx.is_admin);
        assert_eq!(ctx.account, "");
        assert_eq!(ctx.token, "t");
    }

    #[test]
    fn test_authenticate_user() {
        let auth = Authenticator::default();
        let token = account_token("horns&hoofs", "h&f", "Otus");
        let ctx = auth.context(&envelope(json!({
            "account": "horns&hoofs",
            "login": "h&f",
            "token": token,
            "arguments": {},
            "method": "online_score"
        })));

        assert!(!ctx.is_admin);
        assert!(auth.authenticate(&ctx, at(12, 0)).is_ok());

        let forged = AuthContext {
            token: ctx.token.to_uppercase(),
            ..ctx
        };
        assert!(matches!(
            auth.authenticate(&forged, at(12, 0)),
            Err(DispatchError::AuthenticationFailed { .. })
        ));
    }

    #[test]
    fn test_authenticate_admin_within_hour() {
        let auth = Authenticator::default();
        let ctx = AuthContext {
            account: String::new(),
            login: "admin".to_string(),
            token: admin_token("42", at(9, 1)),
            is_admin: true,
        };

        assert!(auth.authenticate(&ctx, at(9, 59)).is_ok());
        assert!(auth.authenticate(&ctx, at(10, 0)).is_err());
    }

    #[test]
    fn test_empty_token_rejected() {
        let auth = Authenticator::default();
        let ctx = AuthContext {
            account: String::new(),
            login: String::new(),
            token: String::new(),
            is_admin: false,
        };
        assert!(auth.authenticate(&ctx, at(0, 0)).is_err());
    }
}
