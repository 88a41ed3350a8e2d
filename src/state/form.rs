//! Editable record forms.
//!
//! Form state is a JSON object so fields can be addressed by dotted path
//! (`carDetails.type`) exactly as the backend names them. A [`FormSchema`]
//! describes which paths are editable, how raw text is parsed, which fields
//! are required, and which fields are derived from others.

use crate::error::ApiError;
use crate::models::{
    BookingStatus, ServiceType, TaskStatus, VehicleType, SERVER_OWNED_FIELDS,
};
use crate::pricing;
use crate::state::notice::Notices;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::marker::PhantomData;
use thiserror::Error;
use tracing::{debug, error, info};

/// Per-field validation messages keyed by path.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    /// One of a fixed set of values
    Choice(&'static [&'static str]),
    /// `YYYY-MM-DDTHH:MM` or RFC 3339
    DateTime,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    /// Message shown when the field is left empty; `None` for optional fields
    pub required: Option<&'static str>,
}

impl FieldSpec {
    const fn optional(path: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            path,
            label,
            kind,
            required: None,
        }
    }

    const fn required(
        path: &'static str,
        label: &'static str,
        kind: FieldKind,
        message: &'static str,
    ) -> Self {
        Self {
            path,
            label,
            kind,
            required: Some(message),
        }
    }

    /// Parse raw user input into the JSON value stored for this field.
    pub fn parse(&self, raw: &str) -> Result<Value, FieldError> {
        let raw = raw.trim();
        let invalid = |reason: String| FieldError::InvalidValue {
            path: self.path.to_string(),
            reason,
        };
        if raw.is_empty() {
            return Ok(Value::String(String::new()));
        }
        match self.kind {
            FieldKind::Text => Ok(Value::String(raw.to_string())),
            FieldKind::Number => parse_number(raw)
                .map(Value::Number)
                .ok_or_else(|| invalid(format!("'{}' is not a number", raw))),
            FieldKind::Choice(choices) => choices
                .iter()
                .find(|c| c.eq_ignore_ascii_case(raw))
                .map(|c| Value::String((*c).to_string()))
                .ok_or_else(|| invalid(format!("expected one of: {}", choices.join(", ")))),
            FieldKind::DateTime => {
                if is_valid_datetime(raw) {
                    Ok(Value::String(raw.to_string()))
                } else {
                    Err(invalid(
                        "expected YYYY-MM-DDTHH:MM or an RFC 3339 timestamp".to_string(),
                    ))
                }
            }
        }
    }
}

fn parse_number(raw: &str) -> Option<Number> {
    if let Ok(n) = raw.parse::<u64>() {
        return Some(Number::from(n));
    }
    raw.parse::<f64>().ok().and_then(Number::from_f64)
}

fn is_valid_datetime(raw: &str) -> bool {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").is_ok()
        || DateTime::parse_from_rfc3339(raw).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("'{0}' is not an editable field")]
    UnknownField(String),
    #[error("'{0}' nests deeper than one level")]
    TooDeep(String),
    #[error("invalid value for '{path}': {reason}")]
    InvalidValue { path: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Client-side validation failed; nothing was sent
    #[error("{} field(s) need attention", .0.len())]
    Invalid(FieldErrors),
    /// The backend refused the write
    #[error("{0}")]
    Rejected(String),
}

/// Result of a successful submit, for the caller to navigate on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created { id: Option<String> },
    Updated { id: String },
}

/// Describes one kind of editable record.
pub trait FormSchema {
    /// Singular noun used in messages ("booking")
    const RECORD: &'static str;

    fn fields() -> &'static [FieldSpec];

    /// Values a new record starts with
    fn defaults() -> Map<String, Value> {
        Map::new()
    }

    /// Recompute derived fields after `changed` was written.
    fn derive(_values: &mut Map<String, Value>, _changed: &str) {}

    fn field(path: &str) -> Option<&'static FieldSpec> {
        Self::fields().iter().find(|f| f.path == path)
    }
}

/// Backend operations a form needs.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch one record as its raw JSON object
    async fn fetch_record(&self, id: &str) -> Result<Value, ApiError>;
    /// Create a record; returns the created record when the backend echoes it
    async fn create_record(&self, payload: &Value) -> Result<Option<Value>, ApiError>;
    async fn update_record(&self, id: &str, payload: &Value) -> Result<(), ApiError>;
}

/// Split a dotted path into at most two segments.
fn split_path(path: &str) -> Result<(&str, Option<&str>), FieldError> {
    let mut parts = path.split('.');
    let head = parts.next().unwrap_or_default();
    let tail = parts.next();
    if parts.next().is_some() {
        return Err(FieldError::TooDeep(path.to_string()));
    }
    Ok((head, tail))
}

/// Read a value by dotted path.
pub fn read_path<'a>(values: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    let (head, tail) = split_path(path).ok()?;
    let value = values.get(head)?;
    match tail {
        Some(child) => value.as_object()?.get(child),
        None => Some(value),
    }
}

/// Write a value by dotted path, creating the parent object if missing.
pub fn write_path(values: &mut Map<String, Value>, path: &str, value: Value) -> Result<(), FieldError> {
    let (head, tail) = split_path(path)?;
    match tail {
        None => {
            values.insert(head.to_string(), value);
        }
        Some(child) => {
            let parent = values
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !parent.is_object() {
                *parent = Value::Object(Map::new());
            }
            if let Value::Object(map) = parent {
                map.insert(child.to_string(), value);
            }
        }
    }
    Ok(())
}

/// Keep only the paths `K` edits; server-owned fields never survive.
pub fn retain_editable<K: FormSchema>(record: &Map<String, Value>) -> Map<String, Value> {
    let mut kept = Map::new();
    for spec in K::fields() {
        if let Some(value) = read_path(record, spec.path) {
            // Paths come from the schema and are at most one level deep.
            let _ = write_path(&mut kept, spec.path, value.clone());
        }
    }
    for owned in SERVER_OWNED_FIELDS {
        kept.remove(*owned);
    }
    kept
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

/// Form state for creating or editing one record.
pub struct FormController<K: FormSchema, S: RecordStore> {
    store: S,
    id: Option<String>,
    values: Map<String, Value>,
    errors: FieldErrors,
    notices: Notices,
    _schema: PhantomData<K>,
}

impl<K: FormSchema, S: RecordStore> FormController<K, S> {
    /// Form for a new record, seeded with the schema defaults.
    pub fn create(store: S) -> Self {
        Self {
            store,
            id: None,
            values: K::defaults(),
            errors: FieldErrors::new(),
            notices: Notices::new(),
            _schema: PhantomData,
        }
    }

    /// Form for an existing record; call [`load`](Self::load) to seed it.
    pub fn edit(store: S, id: impl Into<String>) -> Self {
        Self {
            store,
            id: Some(id.into()),
            values: Map::new(),
            errors: FieldErrors::new(),
            notices: Notices::new(),
            _schema: PhantomData,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn is_edit(&self) -> bool {
        self.id.is_some()
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, path: &str) -> Option<&Value> {
        read_path(&self.values, path)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    /// Fetch the record being edited and seed the form with its editable fields.
    pub async fn load(&mut self) -> Result<(), ApiError> {
        let Some(id) = self.id.clone() else {
            return Ok(());
        };
        match self.store.fetch_record(&id).await {
            Ok(Value::Object(record)) => {
                self.values = retain_editable::<K>(&record);
                self.errors.clear();
                debug!("Loaded {} {} into form", K::RECORD, id);
                Ok(())
            }
            Ok(other) => {
                let err = ApiError::Decode(format!("expected an object, got {}", other));
                self.notices.error(format!("Failed to load {} data", K::RECORD));
                Err(err)
            }
            Err(e) => {
                error!("Failed to load {} {}: {}", K::RECORD, id, e);
                self.notices
                    .error(e.user_message(&format!("Failed to load {} data", K::RECORD)));
                Err(e)
            }
        }
    }

    /// Set one field by dotted path, then recompute derived fields.
    pub fn set_field(&mut self, path: &str, value: Value) -> Result<(), FieldError> {
        split_path(path)?;
        if K::field(path).is_none() {
            return Err(FieldError::UnknownField(path.to_string()));
        }
        write_path(&mut self.values, path, value)?;
        self.errors.remove(path);
        K::derive(&mut self.values, path);
        Ok(())
    }

    /// Parse raw text by the field's kind and set it.
    pub fn set_field_str(&mut self, path: &str, raw: &str) -> Result<(), FieldError> {
        split_path(path)?;
        let spec = K::field(path).ok_or_else(|| FieldError::UnknownField(path.to_string()))?;
        let value = spec.parse(raw)?;
        self.set_field(path, value)
    }

    /// Check required fields and value kinds. Errors are kept per field.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for spec in K::fields() {
            let value = read_path(&self.values, spec.path);
            if is_blank(value) {
                if let Some(message) = spec.required {
                    self.errors.insert(spec.path.to_string(), message.to_string());
                }
                continue;
            }
            if let Some(Value::String(raw)) = value {
                if spec.kind != FieldKind::Text {
                    if let Err(e) = spec.parse(raw) {
                        self.errors.insert(spec.path.to_string(), e.to_string());
                    }
                }
            }
        }
        self.errors.is_empty()
    }

    /// The body to send: editable fields only.
    ///
    /// A create drops blank fields. An update sends every editable field,
    /// with blanks as `""`, so a cleared value is cleared on the server too.
    pub fn payload(&self) -> Value {
        let mut payload = retain_editable::<K>(&self.values);
        if self.id.is_some() {
            for spec in K::fields() {
                if is_blank(read_path(&payload, spec.path)) {
                    let _ = write_path(&mut payload, spec.path, Value::String(String::new()));
                }
            }
            return Value::Object(payload);
        }
        payload.retain(|_, v| !is_blank(Some(v)));
        for value in payload.values_mut() {
            if let Value::Object(child) = value {
                child.retain(|_, v| !is_blank(Some(v)));
            }
        }
        Value::Object(payload)
    }

    /// Validate and send a create or update.
    pub async fn submit(&mut self) -> Result<Submitted, SubmitError> {
        if !self.validate() {
            debug!(errors = ?self.errors, "{} form has validation errors", K::RECORD);
            return Err(SubmitError::Invalid(self.errors.clone()));
        }
        let payload = self.payload();

        let result = match self.id.clone() {
            Some(id) => self
                .store
                .update_record(&id, &payload)
                .await
                .map(|()| Submitted::Updated { id }),
            None => self.store.create_record(&payload).await.map(|created| {
                let id = created.as_ref().and_then(|record| {
                    record
                        .get("_id")
                        .or_else(|| record.get("id"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                });
                Submitted::Created { id }
            }),
        };

        match result {
            Ok(submitted) => {
                let verb = match submitted {
                    Submitted::Created { .. } => "created",
                    Submitted::Updated { .. } => "updated",
                };
                info!("{} {}", K::RECORD, verb);
                self.notices
                    .success(format!("{} {} successfully!", capitalize(K::RECORD), verb));
                Ok(submitted)
            }
            Err(e) => {
                error!("Failed to submit {}: {}", K::RECORD, e);
                let message = e.user_message("An error occurred");
                self.notices.error(message.clone());
                Err(SubmitError::Rejected(message))
            }
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

const SERVICE_CHOICES: &[&str] = &["Basic Wash", "Deluxe Wash", "Full Detailing"];
const VEHICLE_CHOICES: &[&str] = &["sedan", "SUV", "hatchback", "luxury"];
const BOOKING_STATUS_CHOICES: &[&str] = &["Pending", "Confirmed", "Completed", "Cancelled"];
const TASK_STATUS_CHOICES: &[&str] = &["pending", "done"];

/// Car-wash booking form.
pub struct BookingSchema;

static BOOKING_FIELDS: [FieldSpec; 11] = [
    FieldSpec::required(
        "customerName",
        "Customer Name",
        FieldKind::Text,
        "Customer name is required",
    ),
    FieldSpec::optional("customerPhone", "Phone Number", FieldKind::Text),
    FieldSpec::optional("carDetails.make", "Car Make", FieldKind::Text),
    FieldSpec::optional("carDetails.model", "Car Model", FieldKind::Text),
    FieldSpec::optional(
        "carDetails.type",
        "Vehicle Type",
        FieldKind::Choice(VEHICLE_CHOICES),
    ),
    FieldSpec::required(
        "serviceType",
        "Service Type",
        FieldKind::Choice(SERVICE_CHOICES),
        "Service type is required",
    ),
    FieldSpec::required(
        "date",
        "Date & Time",
        FieldKind::DateTime,
        "Date and time are required",
    ),
    FieldSpec::optional("duration", "Duration (minutes)", FieldKind::Number),
    FieldSpec::optional("price", "Price", FieldKind::Number),
    FieldSpec::optional(
        "status",
        "Status",
        FieldKind::Choice(BOOKING_STATUS_CHOICES),
    ),
    FieldSpec::optional("notes", "Additional Notes", FieldKind::Text),
];

impl FormSchema for BookingSchema {
    const RECORD: &'static str = "booking";

    fn fields() -> &'static [FieldSpec] {
        &BOOKING_FIELDS
    }

    fn defaults() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert(
            "status".to_string(),
            Value::String(BookingStatus::default().to_string()),
        );
        let mut car = Map::new();
        car.insert(
            "type".to_string(),
            Value::String(VehicleType::Sedan.to_string()),
        );
        values.insert("carDetails".to_string(), Value::Object(car));
        values
    }

    /// Price and duration follow service and vehicle type; the last write wins.
    fn derive(values: &mut Map<String, Value>, changed: &str) {
        if changed != "serviceType" && changed != "carDetails.type" {
            return;
        }
        let service = read_path(values, "serviceType")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<ServiceType>().ok());
        let vehicle = read_path(values, "carDetails.type")
            .and_then(Value::as_str)
            .and_then(|s| s.parse::<VehicleType>().ok());
        if let (Some(service), Some(vehicle)) = (service, vehicle) {
            let quote = pricing::quote(service, vehicle);
            values.insert("price".to_string(), Value::from(quote.price));
            values.insert("duration".to_string(), Value::from(quote.duration_minutes));
        }
    }
}

/// Task form.
pub struct TaskSchema;

static TASK_FIELDS: [FieldSpec; 3] = [
    FieldSpec::required("title", "Title", FieldKind::Text, "Title is required"),
    FieldSpec::optional("description", "Description", FieldKind::Text),
    FieldSpec::optional("status", "Status", FieldKind::Choice(TASK_STATUS_CHOICES)),
];

impl FormSchema for TaskSchema {
    const RECORD: &'static str = "task";

    fn fields() -> &'static [FieldSpec] {
        &TASK_FIELDS
    }

    fn defaults() -> Map<String, Value> {
        let mut values = Map::new();
        values.insert("title".to_string(), Value::String(String::new()));
        values.insert("description".to_string(), Value::String(String::new()));
        values.insert(
            "status".to_string(),
            Value::String(TaskStatus::default().to_string()),
        );
        values
    }
}
