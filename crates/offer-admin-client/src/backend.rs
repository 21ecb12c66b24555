//! Backend trait consumed by the offer view
//!
//! This trait is the seam between [`crate::view::OfferAdminView`] and the
//! REST API, allowing the view to run against [`crate::api_client::ApiClient`]
//! or the in-memory [`crate::mock::MockBackend`].

use crate::error::ClientResult;
use async_trait::async_trait;
use offer_admin_core::{Offer, OfferId, User};

/// Operations the offer admin view needs from the backend
#[async_trait]
pub trait AdminBackend: Send + Sync {
    /// List all users (authenticated)
    async fn list_users(&self) -> ClientResult<Vec<User>>;

    /// List all offers (unauthenticated)
    async fn list_offers(&self) -> ClientResult<Vec<Offer>>;

    /// Delete an offer (authenticated)
    async fn delete_offer(&self, id: OfferId) -> ClientResult<()>;

    /// Mark an offer accepted (authenticated)
    async fn accept_offer(&self, id: OfferId) -> ClientResult<()>;

    /// Mark an offer inaccepted (authenticated)
    async fn reject_offer(&self, id: OfferId) -> ClientResult<()>;

    /// Archive an offer (authenticated)
    async fn archive_offer(&self, id: OfferId) -> ClientResult<()>;

    /// Backend name, for logging
    fn name(&self) -> &str;
}
