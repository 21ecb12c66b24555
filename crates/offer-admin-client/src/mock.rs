//! In-memory backend for testing

use crate::backend::AdminBackend;
use crate::error::{ClientError, ClientResult};
use crate::view::Mutation;
use async_trait::async_trait;
use offer_admin_core::{Offer, OfferId, OfferStatus, User};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Mock backend serving canned users and offers
#[derive(Debug)]
pub struct MockBackend {
    /// Users returned by `list_users`
    users: Vec<User>,

    /// Offers returned by `list_offers`
    offers: Vec<Offer>,

    /// Status codes returned by successive `list_offers` calls before succeeding
    offer_failures: Mutex<VecDeque<u16>>,

    /// Status returned by every `list_users` call, if set
    users_failure: Option<u16>,

    /// Status returned by every mutation, if set
    mutation_failure: Option<u16>,

    /// Number of `list_offers` calls
    offer_calls: AtomicUsize,

    /// Mutations received, in order
    mutations: Mutex<Vec<(Mutation, OfferId)>>,
}

impl MockBackend {
    /// Create a mock serving [`sample_users`] and [`sample_offers`]
    pub fn new() -> Self {
        Self {
            users: sample_users(),
            offers: sample_offers(),
            offer_failures: Mutex::new(VecDeque::new()),
            users_failure: None,
            mutation_failure: None,
            offer_calls: AtomicUsize::new(0),
            mutations: Mutex::new(Vec::new()),
        }
    }

    /// Serve these offers instead of the samples
    pub fn with_offers(mut self, offers: Vec<Offer>) -> Self {
        self.offers = offers;
        self
    }

    /// Serve these users instead of the samples
    pub fn with_users(mut self, users: Vec<User>) -> Self {
        self.users = users;
        self
    }

    /// Fail the next `list_offers` calls with these statuses, in order
    pub fn with_offer_failures(self, statuses: Vec<u16>) -> Self {
        if let Ok(mut queue) = self.offer_failures.lock() {
            queue.extend(statuses);
        }
        self
    }

    /// Fail every `list_users` call with this status
    pub fn with_users_failure(mut self, status: u16) -> Self {
        self.users_failure = Some(status);
        self
    }

    /// Fail every mutation with this status
    pub fn with_mutation_failure(mut self, status: u16) -> Self {
        self.mutation_failure = Some(status);
        self
    }

    /// Number of `list_offers` calls so far
    pub fn offer_calls(&self) -> usize {
        self.offer_calls.load(Ordering::SeqCst)
    }

    /// Mutations received so far
    pub fn mutations(&self) -> Vec<(Mutation, OfferId)> {
        self.mutations
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    fn record(&self, mutation: Mutation, id: OfferId) -> ClientResult<()> {
        if let Ok(mut log) = self.mutations.lock() {
            log.push((mutation, id));
        }
        match self.mutation_failure {
            Some(status) => Err(ClientError::status(status, "mock mutation failure")),
            None => Ok(()),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AdminBackend for MockBackend {
    async fn list_users(&self) -> ClientResult<Vec<User>> {
        match self.users_failure {
            Some(status) => Err(ClientError::status(status, "mock users failure")),
            None => Ok(self.users.clone()),
        }
    }

    async fn list_offers(&self) -> ClientResult<Vec<Offer>> {
        self.offer_calls.fetch_add(1, Ordering::SeqCst);

        let next_failure = self
            .offer_failures
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());

        match next_failure {
            Some(status) => Err(ClientError::status(status, "mock offers failure")),
            None => Ok(self.offers.clone()),
        }
    }

    async fn delete_offer(&self, id: OfferId) -> ClientResult<()> {
        self.record(Mutation::Delete, id)
    }

    async fn accept_offer(&self, id: OfferId) -> ClientResult<()> {
        self.record(Mutation::Accept, id)
    }

    async fn reject_offer(&self, id: OfferId) -> ClientResult<()> {
        self.record(Mutation::Reject, id)
    }

    async fn archive_offer(&self, id: OfferId) -> ClientResult<()> {
        self.record(Mutation::Archive, id)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Three offers: 1 accepted, 2 and 3 inaccepted
pub fn sample_offers() -> Vec<Offer> {
    vec![
        Offer {
            id: 1,
            title: "Mountain bike".to_string(),
            description: "Hardtail, 29 inch wheels".to_string(),
            price: Decimal::new(45_000, 2),
            image: Some("bike.jpg".to_string()),
            status: OfferStatus::Accepted,
        },
        Offer {
            id: 2,
            title: "Desk lamp".to_string(),
            description: "Brass, works fine".to_string(),
            price: Decimal::new(1_999, 2),
            image: Some("lamp.png".to_string()),
            status: OfferStatus::Inaccepted,
        },
        Offer {
            id: 3,
            title: "Bookshelf".to_string(),
            description: "Oak, five shelves".to_string(),
            price: Decimal::new(120, 0),
            image: None,
            status: OfferStatus::Inaccepted,
        },
    ]
}

/// One regular user followed by one admin with avatar `admin.png`
pub fn sample_users() -> Vec<User> {
    vec![
        User {
            id: 10,
            role: "user".to_string(),
            avatar: Some("someone.png".to_string()),
            extra: serde_json::Map::new(),
        },
        User {
            id: 11,
            role: offer_admin_core::types::ADMIN_ROLE.to_string(),
            avatar: Some("admin.png".to_string()),
            extra: serde_json::Map::new(),
        },
    ]
}
