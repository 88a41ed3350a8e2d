use super::{decode, unwrap_data, ApiClient};
use crate::error::ApiError;
use crate::models::Booking;
use crate::state::filters::BookingFilter;
use crate::state::form::RecordStore;
use crate::state::list::{ListSource, Page, PageQuery, Sort, SortOrder};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

const COLLECTION: &str = "bookings";

/// `/bookings` on the booking backend. Routes are open.
#[derive(Clone)]
pub struct BookingsApi {
    client: ApiClient,
}

#[derive(Debug, Deserialize)]
struct ListBody {
    #[serde(default)]
    data: Vec<Booking>,
    #[serde(default)]
    meta: ListMeta,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListMeta {
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl BookingsApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Typed single-record read, for detail views.
    pub async fn get(&self, id: &str) -> Result<Booking, ApiError> {
        let body = self.fetch_record(id).await?;
        if body.is_null() {
            return Err(ApiError::NotFound("Booking not found".to_string()));
        }
        decode(body)
    }
}

/// Query pairs for a list request. "All" filters go out as empty values.
pub fn list_query(query: &PageQuery<BookingFilter>) -> Vec<(&'static str, String)> {
    let filter = &query.filter;
    let mut pairs = vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        (
            "status",
            filter.status.status().map(|s| s.to_string()).unwrap_or_default(),
        ),
        (
            "serviceType",
            filter.service_type.map(|s| s.to_string()).unwrap_or_default(),
        ),
    ];
    if let Some(sort) = &query.sort {
        pairs.push(("sortBy", sort.by.clone()));
        pairs.push(("sortOrder", sort.order.as_str().to_string()));
    }
    pairs.push(("q", filter.query.trim().to_string()));
    pairs
}

#[async_trait]
impl ListSource for BookingsApi {
    type Item = Booking;
    type Filter = BookingFilter;

    fn label(&self) -> &'static str {
        "bookings"
    }

    fn default_sort(&self) -> Option<Sort> {
        Some(Sort::new("date", SortOrder::Desc))
    }

    async fn fetch_page(&self, query: &PageQuery<BookingFilter>) -> Result<Page<Booking>, ApiError> {
        let url = self
            .client
            .endpoint_with_query(&[COLLECTION], &list_query(query))?;
        let body: ListBody = decode(self.client.get(url).await?)?;
        Ok(Page::new(
            body.data,
            body.meta.total,
            body.meta.total_pages,
            query.limit,
        ))
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let url = self.client.endpoint(&[COLLECTION, id])?;
        self.client.delete(url).await.map(|_| ())
    }
}

#[async_trait]
impl RecordStore for BookingsApi {
    async fn fetch_record(&self, id: &str) -> Result<Value, ApiError> {
        let url = self.client.endpoint(&[COLLECTION, id])?;
        Ok(unwrap_data(self.client.get(url).await?))
    }

    async fn create_record(&self, payload: &Value) -> Result<Option<Value>, ApiError> {
        let url = self.client.endpoint(&[COLLECTION])?;
        let created = unwrap_data(self.client.post(url, payload).await?);
        Ok(created.is_object().then_some(created))
    }

    async fn update_record(&self, id: &str, payload: &Value) -> Result<(), ApiError> {
        let url = self.client.endpoint(&[COLLECTION, id])?;
        self.client.put(url, payload).await.map(|_| ())
    }
}
