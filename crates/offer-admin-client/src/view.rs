//! Offer moderation view state
//!
//! [`OfferAdminView`] owns a [`ViewState`] and an [`AdminBackend`]. Fetches
//! write into the state; mutations only touch the local offer list once the
//! backend has acknowledged them, so a failed request leaves the list exactly
//! as it was.

use crate::backend::AdminBackend;
use crate::backoff::{RetryPolicy, SleepFuture, retry_rate_limited, tokio_sleep};
use crate::error::{ClientError, ClientResult};
use chrono::{DateTime, Utc};
use offer_admin_core::types::find_admin;
use offer_admin_core::{Offer, OfferId, OfferStatus, User};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Injectable sleep used between rate-limit retries
pub type Sleeper = Arc<dyn Fn(Duration) -> SleepFuture + Send + Sync>;

/// Severity of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// The action went through
    Success,
    /// The action failed; state is unchanged
    Failure,
}

/// Transient message produced by a mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Success or failure
    pub kind: NotificationKind,
    /// Message shown to the administrator
    pub message: String,
    /// Underlying error message for failures
    pub detail: Option<String>,
    /// When the notification was raised
    pub raised_at: DateTime<Utc>,
}

impl Notification {
    /// Success notification
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
            detail: None,
            raised_at: Utc::now(),
        }
    }

    /// Failure notification carrying the error text
    pub fn failure(message: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Failure,
            message: message.into(),
            detail: Some(detail.into()),
            raised_at: Utc::now(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{} {detail}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Administrator actions on a single offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// `DELETE /api/deleteOffer/{id}`
    Delete,
    /// `PUT /api/offers/accept/{id}`
    Accept,
    /// `PUT /api/offers/reject/{id}`
    Reject,
    /// `DELETE /api/offers/archive/{id}`
    Archive,
}

impl Mutation {
    const fn verb(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::Accept => "accept",
            Self::Reject => "reject",
            Self::Archive => "archive",
        }
    }

    const fn past_tense(self) -> &'static str {
        match self {
            Self::Delete => "deleted",
            Self::Accept => "accepted",
            Self::Reject => "rejected",
            Self::Archive => "archived",
        }
    }

    /// Message raised when the backend acknowledges the action
    pub fn success_message(self) -> String {
        format!("Offer {} successfully", self.past_tense())
    }

    /// Message raised when the action fails
    pub fn failure_message(self) -> String {
        format!("Failed to {} offer !", self.verb())
    }

    /// Status an offer takes after this action, for in-place updates
    pub const fn resulting_status(self) -> Option<OfferStatus> {
        match self {
            Self::Accept => Some(OfferStatus::Accepted),
            Self::Reject => Some(OfferStatus::Inaccepted),
            Self::Delete | Self::Archive => None,
        }
    }
}

/// Confirmation buttons shown next to an offer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Accept the offer
    Accept,
    /// Deny (reject) the offer
    Deny,
}

impl ConfirmAction {
    /// Button label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accept => "Accept",
            Self::Deny => "Deny",
        }
    }

    /// Mutation issued by this button
    pub const fn mutation(self) -> Mutation {
        match self {
            Self::Accept => Mutation::Accept,
            Self::Deny => Mutation::Reject,
        }
    }
}

/// Confirmation actions offered for a status: an accepted offer can only be
/// denied; an inaccepted one can be accepted or denied
pub const fn available_actions(status: OfferStatus) -> &'static [ConfirmAction] {
    match status {
        OfferStatus::Accepted => &[ConfirmAction::Deny],
        OfferStatus::Inaccepted => &[ConfirmAction::Accept, ConfirmAction::Deny],
    }
}

/// What the page should show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen<'a> {
    /// Offers fetch still running
    Loading,
    /// A fetch failed
    Error(&'a str),
    /// The offers table
    Table(&'a [Offer]),
}

/// State owned by one view instance
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// Search box text; stored but not used for filtering
    pub search_term: String,
    /// Offers in backend order
    pub offers: Vec<Offer>,
    /// All users
    pub users: Vec<User>,
    /// Avatar filename of the first admin user
    pub admin_avatar: Option<String>,
    /// True until the offers fetch reaches a terminal outcome
    pub loading: bool,
    /// Last fetch error message
    pub error: Option<String>,
    /// Pending notifications, oldest first
    pub notifications: Vec<Notification>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            offers: Vec::new(),
            users: Vec::new(),
            admin_avatar: None,
            loading: true,
            error: None,
            notifications: Vec::new(),
        }
    }
}

impl ViewState {
    /// Screen to render; loading wins over error, error over the table
    pub fn screen(&self) -> Screen<'_> {
        if self.loading {
            Screen::Loading
        } else if let Some(error) = &self.error {
            Screen::Error(error)
        } else {
            Screen::Table(&self.offers)
        }
    }

    /// Record the outcome of the users fetch
    pub fn apply_users(&mut self, result: ClientResult<Vec<User>>) {
        match result {
            Ok(users) => {
                self.admin_avatar = find_admin(&users).and_then(|admin| admin.avatar.clone());
                if self.admin_avatar.is_none() {
                    warn!("No admin user with an avatar in user list");
                }
                self.users = users;
                self.error = None;
            }
            Err(err) => self.record_users_error(&err),
        }
    }

    fn record_users_error(&mut self, err: &ClientError) {
        error!(error = %err, "Failed to fetch users");
        self.error = Some(err.to_string());
    }

    /// Record the terminal outcome of the offers fetch
    pub fn apply_offers(&mut self, result: ClientResult<Vec<Offer>>) {
        match result {
            Ok(offers) => {
                info!(count = offers.len(), "Offers fetched successfully");
                self.offers = offers;
                self.error = None;
            }
            Err(err) => {
                error!(error = %err, "Failed to fetch offers");
                self.error = Some(err.to_string());
            }
        }
        self.loading = false;
    }

    /// Apply an acknowledged mutation to the local offer list
    pub fn apply_mutation(&mut self, mutation: Mutation, id: OfferId) {
        match mutation.resulting_status() {
            Some(status) => {
                for offer in self.offers.iter_mut().filter(|offer| offer.id == id) {
                    offer.status = status;
                }
            }
            None => self.offers.retain(|offer| offer.id != id),
        }
    }

    /// Find an offer by id
    pub fn offer(&self, id: OfferId) -> Option<&Offer> {
        self.offers.iter().find(|offer| offer.id == id)
    }
}

/// The offer moderation view
pub struct OfferAdminView<B> {
    backend: B,
    policy: RetryPolicy,
    sleeper: Sleeper,
    state: ViewState,
}

impl<B> fmt::Debug for OfferAdminView<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfferAdminView")
            .field("policy", &self.policy)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

impl<B: AdminBackend> OfferAdminView<B> {
    /// Create a view that sleeps on the tokio timer between retries
    pub fn new(backend: B, policy: RetryPolicy) -> Self {
        Self {
            backend,
            policy,
            sleeper: Arc::new(tokio_sleep),
            state: ViewState::default(),
        }
    }

    /// Replace the sleep used between retries
    #[must_use]
    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Current state
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Backend this view talks to
    pub const fn backend(&self) -> &B {
        &self.backend
    }

    /// Update the search box text
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.state.search_term = term.into();
    }

    /// Drain pending notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.state.notifications)
    }

    /// Run the users fetch and the offers fetch concurrently
    pub async fn mount(&mut self) {
        info!(backend = self.backend.name(), "Mounting offer admin view");

        let backend = &self.backend;
        let sleeper: &(dyn Fn(Duration) -> SleepFuture + Send + Sync) = &*self.sleeper;
        let (users, offers) = tokio::join!(
            backend.list_users(),
            retry_rate_limited(self.policy, |_| backend.list_offers(), |delay| sleeper(delay)),
        );

        self.state.apply_users(users);
        self.state.apply_offers(offers);
    }

    /// Fetch users once; failures are stored, never retried
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording its message in the state.
    pub async fn fetch_users(&mut self) -> ClientResult<()> {
        match self.backend.list_users().await {
            Ok(users) => {
                self.state.apply_users(Ok(users));
                Ok(())
            }
            Err(err) => {
                self.state.record_users_error(&err);
                Err(err)
            }
        }
    }

    /// Fetch offers, retrying rate limits per the view's policy
    pub async fn fetch_offers(&mut self) {
        let backend = &self.backend;
        let sleeper: &(dyn Fn(Duration) -> SleepFuture + Send + Sync) = &*self.sleeper;
        let result =
            retry_rate_limited(self.policy, |_| backend.list_offers(), |delay| sleeper(delay))
                .await;
        self.state.apply_offers(result);
    }

    /// Delete an offer
    ///
    /// # Errors
    ///
    /// Returns the backend error; a failure notification is queued as well.
    pub async fn delete_offer(&mut self, id: OfferId) -> ClientResult<()> {
        self.run_mutation(Mutation::Delete, id).await
    }

    /// Accept an offer
    ///
    /// # Errors
    ///
    /// Returns the backend error; a failure notification is queued as well.
    pub async fn confirm_offer(&mut self, id: OfferId) -> ClientResult<()> {
        self.run_mutation(Mutation::Accept, id).await
    }

    /// Reject an offer
    ///
    /// # Errors
    ///
    /// Returns the backend error; a failure notification is queued as well.
    pub async fn reject_offer(&mut self, id: OfferId) -> ClientResult<()> {
        self.run_mutation(Mutation::Reject, id).await
    }

    /// Archive an offer
    ///
    /// # Errors
    ///
    /// Returns the backend error; a failure notification is queued as well.
    pub async fn archive_offer(&mut self, id: OfferId) -> ClientResult<()> {
        self.run_mutation(Mutation::Archive, id).await
    }

    /// Issue a mutation and update state only on success
    ///
    /// # Errors
    ///
    /// Returns the backend error; a failure notification is queued as well.
    pub async fn run_mutation(&mut self, mutation: Mutation, id: OfferId) -> ClientResult<()> {
        let result: Result<(), ClientError> = match mutation {
            Mutation::Delete => self.backend.delete_offer(id).await,
            Mutation::Accept => self.backend.accept_offer(id).await,
            Mutation::Reject => self.backend.reject_offer(id).await,
            Mutation::Archive => self.backend.archive_offer(id).await,
        };

        match result {
            Ok(()) => {
                self.state.apply_mutation(mutation, id);
                self.state
                    .notifications
                    .push(Notification::success(mutation.success_message()));
                Ok(())
            }
            Err(err) => {
                self.state
                    .notifications
                    .push(Notification::failure(mutation.failure_message(), err.to_string()));
                Err(err)
            }
        }
    }
}
