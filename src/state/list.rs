//! Paged, filtered list state over a remote collection.
//!
//! The controller owns the query (page, limit, filter, sort) and the last page
//! of items the backend returned. Setters only mutate the query and mark the
//! list stale; `refresh` (or `begin_fetch` + `apply` when the fetch runs on
//! another task) performs the request.

use crate::error::ApiError;
use crate::models::Record;
use crate::state::notice::Notices;
use async_trait::async_trait;
use std::fmt;
use tracing::{debug, error, info, warn};

/// Filter state for one kind of list.
pub trait Filter: Clone + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Partial update merged into the filter.
    type Patch;

    fn merge(&mut self, patch: Self::Patch);

    /// Whether anything narrows the list beyond the defaults.
    fn is_active(&self) -> bool {
        *self != Self::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    /// Backend field name, e.g. `date`
    pub by: String,
    pub order: SortOrder,
}

impl Sort {
    pub fn new(by: &str, order: SortOrder) -> Self {
        Self {
            by: by.to_string(),
            order,
        }
    }
}

/// Everything that determines which page the backend returns.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub filter: F,
    pub sort: Option<Sort>,
}

/// One page of results, normalised across backends.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Build a page, deriving the page count from the item total when the
    /// backend did not report one.
    pub fn new(items: Vec<T>, total_items: Option<u64>, total_pages: Option<u32>, limit: u32) -> Self {
        let total_items = total_items.unwrap_or(items.len() as u64);
        let total_pages = match total_pages {
            Some(pages) if pages > 0 => pages,
            _ => total_items.div_ceil(u64::from(limit.max(1))) as u32,
        };
        Self {
            items,
            total_items,
            total_pages,
        }
    }
}

/// A remote collection the controller can page through.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Record + Clone + Send + Sync;
    type Filter: Filter;

    /// Plural noun used in user-facing messages ("bookings").
    fn label(&self) -> &'static str;

    /// Sort applied when none is chosen.
    fn default_sort(&self) -> Option<Sort> {
        None
    }

    async fn fetch_page(&self, query: &PageQuery<Self::Filter>) -> Result<Page<Self::Item>, ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}

/// Identifies one issued fetch so a late response can be recognised.
#[derive(Debug, Clone)]
pub struct FetchTicket<F> {
    seq: u64,
    query: PageQuery<F>,
}

impl<F> FetchTicket<F> {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &PageQuery<F> {
        &self.query
    }
}

pub struct ListController<S: ListSource> {
    source: S,
    query: PageQuery<S::Filter>,
    default_limit: u32,
    items: Vec<S::Item>,
    total_pages: u32,
    total_items: u64,
    loading: bool,
    stale: bool,
    seq: u64,
    notices: Notices,
}

impl<S: ListSource> ListController<S> {
    pub fn new(source: S, limit: u32) -> Self {
        let limit = limit.max(1);
        let sort = source.default_sort();
        Self {
            source,
            query: PageQuery {
                page: 1,
                limit,
                filter: S::Filter::default(),
                sort,
            },
            default_limit: limit,
            items: Vec::new(),
            total_pages: 1,
            total_items: 0,
            loading: false,
            stale: true,
            seq: 0,
            notices: Notices::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn query(&self) -> &PageQuery<S::Filter> {
        &self.query
    }

    pub fn filter(&self) -> &S::Filter {
        &self.query.filter
    }

    /// What to show when the page has no items.
    pub fn empty_message(&self) -> String {
        let label = self.source.label();
        if self.query.filter.is_active() {
            format!("No {} match the current filters", label)
        } else {
            format!("No {} found", label)
        }
    }

    pub fn page(&self) -> u32 {
        self.query.page
    }

    pub fn limit(&self) -> u32 {
        self.query.limit
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn total_items(&self) -> u64 {
        self.total_items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Whether the query changed since the last applied response.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Merge `patch` into the filter; always returns to the first page.
    pub fn set_filter(&mut self, patch: <S::Filter as Filter>::Patch) {
        self.query.filter.merge(patch);
        self.query.page = 1;
        self.stale = true;
        debug!(filter = ?self.query.filter, "{} filter changed", self.source.label());
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.query.sort = Some(sort);
        self.query.page = 1;
        self.stale = true;
    }

    pub fn set_limit(&mut self, limit: u32) {
        self.query.limit = limit.max(1);
        self.query.page = 1;
        self.stale = true;
    }

    /// Restore default filter and sort
    pub fn clear_filters(&mut self) {
        self.query.filter = S::Filter::default();
        self.query.sort = self.source.default_sort();
        self.query.limit = self.default_limit;
        self.query.page = 1;
        self.stale = true;
    }

    /// Move to page `n`, clamped to `[1, total_pages]`. Returns the page chosen.
    pub fn set_page(&mut self, n: u32) -> u32 {
        let page = n.clamp(1, self.total_pages.max(1));
        if page != self.query.page {
            self.query.page = page;
            self.stale = true;
        }
        page
    }

    pub fn next_page(&mut self) -> u32 {
        self.set_page(self.query.page.saturating_add(1))
    }

    pub fn prev_page(&mut self) -> u32 {
        self.set_page(self.query.page.saturating_sub(1))
    }

    /// Start a fetch for the current query. Any earlier ticket becomes stale.
    pub fn begin_fetch(&mut self) -> FetchTicket<S::Filter> {
        self.seq += 1;
        self.loading = true;
        FetchTicket {
            seq: self.seq,
            query: self.query.clone(),
        }
    }

    /// Apply the outcome of a fetch. Returns false when the ticket was
    /// superseded and the result was dropped.
    pub fn apply(
        &mut self,
        ticket: FetchTicket<S::Filter>,
        result: Result<Page<S::Item>, ApiError>,
    ) -> bool {
        if ticket.seq != self.seq {
            debug!(
                ticket = ticket.seq,
                latest = self.seq,
                "Discarding superseded {} response",
                self.source.label()
            );
            return false;
        }
        self.loading = false;

        match result {
            Ok(page) => {
                info!(
                    page = ticket.query.page,
                    items = page.items.len(),
                    total = page.total_items,
                    "Loaded {}",
                    self.source.label()
                );
                self.items = page.items;
                self.total_items = page.total_items;
                self.total_pages = page.total_pages.max(1);
                self.stale = ticket.query != self.query;
                if self.query.page > self.total_pages {
                    self.query.page = self.total_pages;
                    self.stale = true;
                }
            }
            Err(e) => {
                error!("Failed to load {}: {}", self.source.label(), e);
                // The failed query is not retried; one changed meanwhile still is.
                self.stale = ticket.query != self.query;
                self.notices
                    .error(e.user_message(&format!("Failed to load {}", self.source.label())));
            }
        }
        true
    }

    /// Fetch the current page and replace the list.
    pub async fn refresh(&mut self) -> bool {
        let ticket = self.begin_fetch();
        let result = self.source.fetch_page(ticket.query()).await;
        self.apply(ticket, result)
    }

    /// Delete a record, drop it from the local list, then reconcile.
    pub async fn delete(&mut self, id: &str) -> Result<(), ApiError> {
        let label = self.source.label();
        if let Err(e) = self.source.delete(id).await {
            error!("Failed to delete {} record {}: {}", label, id, e);
            self.notices
                .error(e.user_message(&format!("Failed to delete from {}", label)));
            return Err(e);
        }

        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() < before {
            self.total_items = self.total_items.saturating_sub(1);
        }
        info!("Deleted {} record {}", label, id);

        let ticket = self.begin_fetch();
        let result = self.source.fetch_page(ticket.query()).await;
        match result {
            Ok(page) => {
                self.apply(ticket, Ok(page));
                self.notices.success("Deleted successfully");
            }
            Err(e) => {
                // Keep the optimistic removal; the server already confirmed it.
                self.loading = false;
                warn!("Refresh after delete failed: {}", e);
                self.notices.warning(format!(
                    "Deleted, but the {} list could not be refreshed and may be out of date",
                    label
                ));
            }
        }
        Ok(())
    }
}
