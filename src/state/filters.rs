//! Filter state for the booking and task lists.

use crate::models::{BookingStatus, ServiceType, TaskStatus};
use crate::state::list::Filter;
use std::fmt;
use std::str::FromStr;

/// Either every status or exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter<S> {
    #[default]
    All,
    Only(S),
}

impl<S: Copy + PartialEq> StatusFilter<S> {
    pub fn status(&self) -> Option<S> {
        match self {
            StatusFilter::All => None,
            StatusFilter::Only(s) => Some(*s),
        }
    }

    /// Step through All -> each status -> All.
    pub fn cycle(&self, statuses: &[S]) -> Self {
        match self {
            StatusFilter::All => statuses.first().copied().map_or(StatusFilter::All, StatusFilter::Only),
            StatusFilter::Only(current) => {
                let pos = statuses.iter().position(|s| s == current);
                match pos.and_then(|p| statuses.get(p + 1)) {
                    Some(next) => StatusFilter::Only(*next),
                    None => StatusFilter::All,
                }
            }
        }
    }
}

impl<S: fmt::Display> fmt::Display for StatusFilter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusFilter::All => f.write_str("all"),
            StatusFilter::Only(s) => s.fmt(f),
        }
    }
}

impl<S: FromStr> FromStr for StatusFilter<S> {
    type Err = S::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        trimmed.parse().map(StatusFilter::Only)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookingFilter {
    pub status: StatusFilter<BookingStatus>,
    pub service_type: Option<ServiceType>,
    /// Free text matched against customer, car make/model and plate
    pub query: String,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilterPatch {
    pub status: Option<StatusFilter<BookingStatus>>,
    /// `Some(None)` clears the service filter
    pub service_type: Option<Option<ServiceType>>,
    pub query: Option<String>,
}

impl Filter for BookingFilter {
    type Patch = BookingFilterPatch;

    fn merge(&mut self, patch: Self::Patch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
        if let Some(query) = patch.query {
            self.query = query;
        }
    }
}

impl BookingFilter {
    /// Next service type in the cycle All -> each service -> All.
    pub fn next_service_type(&self) -> Option<ServiceType> {
        match self.service_type {
            None => ServiceType::ALL.first().copied(),
            Some(current) => {
                let pos = ServiceType::ALL.iter().position(|s| *s == current);
                pos.and_then(|p| ServiceType::ALL.get(p + 1)).copied()
            }
        }
    }

    /// One-line summary for status bars.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("status: {}", self.status)];
        parts.push(format!(
            "service: {}",
            self.service_type.map_or("all".to_string(), |s| s.to_string())
        ));
        if !self.query.is_empty() {
            parts.push(format!("search: \"{}\"", self.query));
        }
        parts.join("  ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter<TaskStatus>,
    pub search: String,
}

#[derive(Debug, Clone, Default)]
pub struct TaskFilterPatch {
    pub status: Option<StatusFilter<TaskStatus>>,
    pub search: Option<String>,
}

impl Filter for TaskFilter {
    type Patch = TaskFilterPatch;

    fn merge(&mut self, patch: Self::Patch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(search) = patch.search {
            self.search = search;
        }
    }
}

impl TaskFilter {
    pub fn describe(&self) -> String {
        if self.search.is_empty() {
            format!("status: {}", self.status)
        } else {
            format!("status: {}  search: \"{}\"", self.status, self.search)
        }
    }
}
