//! Domain primitives shared by every marketplace component.
//!
//! The core never authenticates anyone. It consumes an already-authenticated
//! [`Principal`] and decides ownership and role questions from it.

pub mod text;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role carried by an authenticated caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Vendor,
    Admin,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buyer => "buyer",
            Self::Vendor => "vendor",
            Self::Admin => "admin",
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
        match s.trim().to_ascii_lowercase().as_str() {
            "buyer" => Ok(Self::Buyer),
            "vendor" => Ok(Self::Vendor),
            "admin" => Ok(Self::Admin),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

/// The authenticated caller of a core operation.
///
/// # Examples
///
/// ```rust
/// use rfqhub::domain::{Principal, Role};
///
/// let buyer = Principal::new(7, Role::Buyer);
/// assert!(buyer.can_post_rfq());
/// assert!(!buyer.can_bid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl Principal {
    #[must_use]
    pub const fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }

    #[must_use]
    pub const fn can_post_rfq(&self) -> bool {
        matches!(self.role, Role::Buyer | Role::Admin)
    }

    #[must_use]
    pub const fn can_bid(&self) -> bool {
        matches!(self.role, Role::Vendor | Role::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("buyer".parse::<Role>().unwrap(), Role::Buyer);
        assert_eq!(" Vendor ".parse::<Role>().unwrap(), Role::Vendor);
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn test_admin_can_do_both() {
        let admin = Principal::new(1, Role::Admin);
        assert!(admin.can_post_rfq());
        assert!(admin.can_bid());

        let vendor = Principal::new(2, Role::Vendor);
        assert!(!vendor.can_post_rfq());
        assert!(vendor.can_bid());
    }
}
