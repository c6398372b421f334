use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Admins see the escalation dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Customer,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Customer => "customer",
            Self::Admin => "admin",
        }
    }

    /// Parse a stored role name, treating anything unknown as a customer.
    pub fn from_db(s: &str) -> Self {
        match s {
            "admin" => Self::Admin,
            _ => Self::Customer,
        }
    }
}

/// A storefront account. Passwords are stored and compared verbatim (demo only).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied at registration.
#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// The account fields returned to the browser after login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub email: String,
    pub role: UserRole,
}

impl User {
    pub fn from_new(new: NewUser) -> Self {
        Self {
            id: Uuid::now_v7(),
            email: new.email,
            password: new.password,
            role: new.role,
            created_at: Utc::now(),
        }
    }

    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email.clone(),
            role: self.role,
        }
    }
}
