//! Offer admin client
//!
//! Fetches offers and users from the marketplace backend, keeps them in an
//! [`OfferAdminView`], and lets an administrator accept, reject, archive or
//! delete offers.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc
)]

pub mod api_client;
pub mod backend;
pub mod backoff;
pub mod error;
pub mod mock;
pub mod render;
pub mod session;
pub mod view;

pub use api_client::ApiClient;
pub use backend::AdminBackend;
pub use backoff::RetryPolicy;
pub use error::{ClientError, ClientResult};
pub use mock::MockBackend;
pub use session::Session;
pub use view::{Mutation, Notification, NotificationKind, OfferAdminView, ViewState};
