//! Core data types for the offer admin client

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Offer identifier type
pub type OfferId = u64;

/// User identifier type
pub type UserId = u64;

/// Role string carried by administrator accounts
pub const ADMIN_ROLE: &str = "admin";

/// Moderation status of an offer
///
/// The backend only ever reports these two states. The rejected state keeps
/// the backend's literal `inaccepted` on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Approved by an administrator
    Accepted,
    /// Rejected or not yet approved
    Inaccepted,
}

impl OfferStatus {
    /// Wire literal for this status
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::Inaccepted => "inaccepted",
        }
    }

    /// Status label with the first letter capitalised, as shown in the table
    #[must_use]
    pub fn label(self) -> String {
        let raw = self.as_str();
        let mut chars = raw.chars();
        chars.next().map_or_else(String::new, |first| {
            first.to_uppercase().chain(chars).collect()
        })
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sellable listing awaiting or carrying moderation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Offer {
    /// Backend identifier
    pub id: OfferId,

    /// Offer title
    pub title: String,

    /// Free-text description; `null` reads as empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,

    /// Asking price
    pub price: Decimal,

    /// Image filename, served under `/offers/images/`
    #[serde(default)]
    pub image: Option<String>,

    /// Moderation status
    pub status: OfferStatus,
}

/// A backend user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    /// Backend identifier
    pub id: UserId,

    /// Role name (`admin`, `user`, ...); `null` reads as empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: String,

    /// Avatar filename, served under `/users/avatar/`
    #[serde(default)]
    pub avatar: Option<String>,

    /// Any other fields the backend sends
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl User {
    /// Whether this user holds the administrator role
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Response body of `GET /api/offers`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffersEnvelope {
    /// Offers in backend order
    pub offers: Vec<Offer>,
}

/// Response body of `GET /api/users`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersEnvelope {
    /// All user accounts
    pub users: Vec<User>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Find the first administrator in a user list
#[must_use]
pub fn find_admin(users: &[User]) -> Option<&User> {
    users.iter().find(|user| user.is_admin())
}
