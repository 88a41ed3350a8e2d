//! Shared test utilities for controller integration tests.
//!
//! Provides in-memory stand-ins for the REST backends:
//! - `FakeBookings` - a paged booking collection (`ListSource`)
//! - `FakeStore` - a record store for the form controller (`RecordStore`)
//! - `FakeAuth` - an auth backend with one known account (`AuthBackend`)
//!
//! Every fake is `Clone` and clones share state, so a test can hand one copy
//! to a controller and inspect the other.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use frontdesk::error::ApiError;
use frontdesk::models::{Booking, BookingStatus, User};
use frontdesk::state::{
    AuthBackend, AuthGrant, BookingFilter, ListSource, Page, PageQuery, RecordStore, Sort,
    SortOrder, StatusFilter,
};

pub const GOOD_TOKEN: &str = "good-token";
pub const EMAIL: &str = "jane@example.com";
pub const PASSWORD: &str = "Secret#1";

/// A server-side failure without a message of its own.
pub fn server_error(status: u16) -> ApiError {
    ApiError::Server {
        status,
        message: None,
    }
}

pub fn rejection(status: u16, message: &str) -> ApiError {
    ApiError::Server {
        status,
        message: Some(message.to_string()),
    }
}

/// Build a booking the way the backend would return it.
pub fn booking(id: &str, customer: &str, status: BookingStatus) -> Booking {
    serde_json::from_value(json!({
        "_id": id,
        "customerName": customer,
        "carDetails": { "make": "Toyota", "model": "Corolla", "type": "sedan" },
        "serviceType": "Basic Wash",
        "date": "2025-03-01T10:00",
        "duration": 30,
        "price": 25,
        "status": status.to_string(),
    }))
    .expect("booking fixture")
}

/// `count` pending bookings named "Customer 1".."Customer n" with ids b1..bn.
pub fn bookings(count: usize) -> Vec<Booking> {
    (1..=count)
        .map(|i| {
            booking(
                &format!("b{}", i),
                &format!("Customer {}", i),
                BookingStatus::Pending,
            )
        })
        .collect()
}

pub fn user() -> User {
    User {
        id: "u1".to_string(),
        email: EMAIL.to_string(),
        name: Some("Jane".to_string()),
    }
}

// ============================================================================
// BOOKINGS LIST
// ============================================================================

#[derive(Default)]
struct BookingsState {
    bookings: Vec<Booking>,
    queries: Vec<PageQuery<BookingFilter>>,
    deleted: Vec<String>,
    failing_fetches: usize,
    delete_error: Option<(u16, Option<String>)>,
}

#[derive(Clone, Default)]
pub struct FakeBookings {
    state: Arc<Mutex<BookingsState>>,
}

impl FakeBookings {
    pub fn with(bookings: Vec<Booking>) -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().bookings = bookings;
        fake
    }

    /// The next `n` fetches answer 503.
    pub fn fail_fetches(&self, n: usize) {
        self.state.lock().unwrap().failing_fetches = n;
    }

    pub fn fail_deletes(&self, status: u16, message: Option<&str>) {
        self.state.lock().unwrap().delete_error = Some((status, message.map(str::to_string)));
    }

    pub fn queries(&self) -> Vec<PageQuery<BookingFilter>> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.state.lock().unwrap().deleted.clone()
    }
}

fn matches_filter(booking: &Booking, filter: &BookingFilter) -> bool {
    if let StatusFilter::Only(status) = filter.status {
        if booking.status != status {
            return false;
        }
    }
    if filter.service_type.is_some() && booking.service_type != filter.service_type {
        return false;
    }
    let q = filter.query.trim().to_lowercase();
    q.is_empty() || booking.customer_name.to_lowercase().contains(&q)
}

#[async_trait]
impl ListSource for FakeBookings {
    type Item = Booking;
    type Filter = BookingFilter;

    fn label(&self) -> &'static str {
        "bookings"
    }

    fn default_sort(&self) -> Option<Sort> {
        Some(Sort::new("date", SortOrder::Desc))
    }

    async fn fetch_page(&self, query: &PageQuery<BookingFilter>) -> Result<Page<Booking>, ApiError> {
        let mut state = self.state.lock().unwrap();
        state.queries.push(query.clone());
        if state.failing_fetches > 0 {
            state.failing_fetches -= 1;
            return Err(server_error(503));
        }

        let matching: Vec<Booking> = state
            .bookings
            .iter()
            .filter(|b| matches_filter(b, &query.filter))
            .cloned()
            .collect();
        let start = ((query.page.max(1) - 1) * query.limit) as usize;
        let items = matching
            .iter()
            .skip(start)
            .take(query.limit as usize)
            .cloned()
            .collect();
        Ok(Page::new(items, Some(matching.len() as u64), None, query.limit))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some((status, message)) = state.delete_error.clone() {
            return Err(ApiError::Server { status, message });
        }
        let before = state.bookings.len();
        state.bookings.retain(|b| b.id != id);
        if state.bookings.len() == before {
            return Err(rejection(404, "Booking not found"));
        }
        state.deleted.push(id.to_string());
        Ok(())
    }
}

// ============================================================================
// RECORD STORE
// ============================================================================

#[derive(Default)]
struct StoreState {
    records: HashMap<String, Value>,
    created: Vec<Value>,
    updated: Vec<(String, Value)>,
    reject_with: Option<(u16, String)>,
    next_id: u32,
}

#[derive(Clone, Default)]
pub struct FakeStore {
    state: Arc<Mutex<StoreState>>,
}

impl FakeStore {
    pub fn with_record(id: &str, record: Value) -> Self {
        let store = Self::default();
        store
            .state
            .lock()
            .unwrap()
            .records
            .insert(id.to_string(), record);
        store
    }

    /// Every write answers `status` with `message`.
    pub fn reject_writes(&self, status: u16, message: &str) {
        self.state.lock().unwrap().reject_with = Some((status, message.to_string()));
    }

    pub fn created(&self) -> Vec<Value> {
        self.state.lock().unwrap().created.clone()
    }

    pub fn updated(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().updated.clone()
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn fetch_record(&self, id: &str) -> Result<Value, ApiError> {
        self.state
            .lock()
            .unwrap()
            .records
            .get(id)
            .cloned()
            .ok_or_else(|| server_error(500))
    }

    async fn create_record(&self, payload: &Value) -> Result<Option<Value>, ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some((status, message)) = &state.reject_with {
            return Err(rejection(*status, message));
        }
        state.created.push(payload.clone());
        state.next_id += 1;
        let id = format!("new{}", state.next_id);

        let mut record = payload.clone();
        record["_id"] = Value::String(id.clone());
        record["createdAt"] = json!("2025-03-01T10:00:00Z");
        state.records.insert(id, record.clone());
        Ok(Some(record))
    }

    async fn update_record(&self, id: &str, payload: &Value) -> Result<(), ApiError> {
        let mut state = self.state.lock().unwrap();
        if let Some((status, message)) = &state.reject_with {
            return Err(rejection(*status, message));
        }
        state.updated.push((id.to_string(), payload.clone()));
        Ok(())
    }
}

// ============================================================================
// AUTH
// ============================================================================

#[derive(Default)]
struct AuthState {
    login_calls: usize,
    register_calls: usize,
    reset_requests: Vec<String>,
}

/// Knows one account (`EMAIL` / `PASSWORD`) and one valid token.
#[derive(Clone, Default)]
pub struct FakeAuth {
    state: Arc<Mutex<AuthState>>,
}

impl FakeAuth {
    pub fn login_calls(&self) -> usize {
        self.state.lock().unwrap().login_calls
    }

    pub fn register_calls(&self) -> usize {
        self.state.lock().unwrap().register_calls
    }

    pub fn reset_requests(&self) -> Vec<String> {
        self.state.lock().unwrap().reset_requests.clone()
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn login(&self, email: &str, password: &str) -> Result<AuthGrant, ApiError> {
        self.state.lock().unwrap().login_calls += 1;
        match (email, password) {
            (EMAIL, PASSWORD) => Ok(AuthGrant {
                user: user(),
                token: GOOD_TOKEN.to_string(),
            }),
            (EMAIL, _) => Err(rejection(401, "Invalid credentials")),
            _ => Err(server_error(500)),
        }
    }

    async fn register(&self, email: &str, _password: &str) -> Result<AuthGrant, ApiError> {
        self.state.lock().unwrap().register_calls += 1;
        if email == EMAIL {
            return Err(rejection(400, "User already exists"));
        }
        Ok(AuthGrant {
            user: User {
                id: "u2".to_string(),
                email: email.to_string(),
                name: None,
            },
            token: GOOD_TOKEN.to_string(),
        })
    }

    async fn verify(&self, token: &str) -> Result<User, ApiError> {
        if token == GOOD_TOKEN {
            Ok(user())
        } else {
            Err(rejection(401, "Invalid token"))
        }
    }

    async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        self.state
            .lock()
            .unwrap()
            .reset_requests
            .push(email.to_string());
        Ok(())
    }
}
