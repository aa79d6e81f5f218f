//! Authentication
//!
//! Bearer tokens are looked up in the `sessions` table; issuing them is
//! someone else's job.
//! - [`CurrentUser`] - the resolved caller, extracted per request

pub mod extractor;

use serde::Serialize;
use shared::models::{CallerContext, Role};

use crate::db::repository::user::User;

/// Authenticated caller of an HTTP request
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: i64,
    pub name: String,
    pub role: Role,
}

impl CurrentUser {
    /// Identity handed to the services
    pub fn caller(&self) -> CallerContext {
        CallerContext {
            user_id: self.id,
            role: self.role,
        }
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            role: user.role,
        }
    }
}

/// Strip the `Bearer ` prefix of an Authorization header value
pub fn extract_from_header(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_from_header() {
        assert_eq!(extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(extract_from_header("Bearer "), None);
        assert_eq!(extract_from_header("Basic abc"), None);
        assert_eq!(extract_from_header(""), None);
    }

    #[test]
    fn test_caller_context() {
        let user = CurrentUser {
            id: 5,
            name: "Mesa 5".into(),
            role: Role::Client,
        };
        assert_eq!(user.caller(), CallerContext::client(5));
        assert!(!user.caller().is_admin());
    }
}
