use std::fmt;
use std::str::FromStr;

use mongodb::bson::Document;
use serde::{Deserialize, Serialize};

/// Fields a client may write through the profile upsert.
pub const PROFILE_FIELDS: &[&str] = &["name", "email", "role", "photoURL"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "Buyer",
            Role::Seller => "Seller",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Buyer" => Ok(Role::Buyer),
            "Seller" => Ok(Role::Seller),
            "Admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// The stored user record as seen by the authorization gate.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub email: String,
    pub role: Option<Role>,
    pub is_verified: bool,
}

impl CurrentUser {
    pub fn from_document(document: &Document) -> Option<Self> {
        let email = document.get_str("email").ok()?.to_string();
        let role = document.get_str("role").ok().and_then(|r| r.parse().ok());
        let is_verified = document.get_bool("isVerified").unwrap_or(false);
        Some(Self { email, role, is_verified })
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == Some(role)
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AdminCheck {
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SellerCheck {
    #[serde(rename = "isSeller")]
    pub is_seller: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct BuyerCheck {
    #[serde(rename = "isBuyer")]
    pub is_buyer: bool,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct VerifiedCheck {
    #[serde(rename = "isVerified")]
    pub is_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_role_parsing_is_exact() {
        assert_eq!("Seller".parse::<Role>(), Ok(Role::Seller));
        assert!("seller".parse::<Role>().is_err());
        assert!("".parse::<Role>().is_err());
    }

    #[test]
    fn test_current_user_from_document() {
        let user = CurrentUser::from_document(&doc! {
            "email": "a@x.com",
            "role": "Admin",
            "isVerified": true,
        })
        .unwrap();
        assert!(user.has_role(Role::Admin));
        assert!(!user.has_role(Role::Seller));
        assert!(user.is_verified);
    }

    #[test]
    fn test_unknown_role_means_no_role() {
        let user = CurrentUser::from_document(&doc! { "email": "a@x.com", "role": "Moderator" }).unwrap();
        assert_eq!(user.role, None);
        assert!(!user.is_verified);
    }

    #[test]
    fn test_record_without_email_is_rejected() {
        assert!(CurrentUser::from_document(&doc! { "role": "Admin" }).is_none());
    }
}
