//! Integration tests for the record form controller.
//!
//! Covers the booking form's derived price and duration, the write payload
//! shape, validation and the create/update paths, plus the task form.

mod common;

use common::FakeStore;
use frontdesk::state::{
    BookingSchema, FieldError, FormController, NoticeLevel, SubmitError, Submitted, TaskSchema,
};
use serde_json::{json, Value};

type BookingForm = FormController<BookingSchema, FakeStore>;
type TaskForm = FormController<TaskSchema, FakeStore>;

fn stored_booking() -> Value {
    json!({
        "_id": "b1",
        "__v": 0,
        "createdAt": "2025-02-01T08:00:00Z",
        "updatedAt": "2025-02-02T08:00:00Z",
        "customerName": "Jane Doe",
        "customerPhone": "555-0100",
        "carDetails": { "make": "Audi", "model": "A6", "type": "SUV" },
        "serviceType": "Deluxe Wash",
        "date": "2025-03-01T10:00",
        "duration": 75,
        "price": 99,
        "status": "Confirmed",
        "addOns": ["wax"],
    })
}

fn fill_valid_booking(form: &mut BookingForm) {
    form.set_field_str("customerName", "Jane Doe").unwrap();
    form.set_field_str("serviceType", "Basic Wash").unwrap();
    form.set_field_str("date", "2025-03-01T10:00").unwrap();
}

// ============================================================================
// DERIVED FIELDS
// ============================================================================

#[test]
fn new_booking_starts_with_defaults() {
    let form = BookingForm::create(FakeStore::default());

    assert!(!form.is_edit());
    assert_eq!(form.value("status"), Some(&json!("Pending")));
    assert_eq!(form.value("carDetails.type"), Some(&json!("sedan")));
    assert_eq!(form.value("price"), None);
}

#[test]
fn service_and_vehicle_changes_set_price_and_duration() {
    let mut form = BookingForm::create(FakeStore::default());

    // Default vehicle is sedan
    form.set_field_str("serviceType", "Deluxe Wash").unwrap();
    assert_eq!(form.value("price"), Some(&json!(45)));
    assert_eq!(form.value("duration"), Some(&json!(60)));

    form.set_field_str("carDetails.type", "SUV").unwrap();
    assert_eq!(form.value("price"), Some(&json!(55)));
    assert_eq!(form.value("duration"), Some(&json!(60)));

    form.set_field_str("serviceType", "Full Detailing").unwrap();
    assert_eq!(form.value("price"), Some(&json!(150)));
    assert_eq!(form.value("duration"), Some(&json!(180)));
}

#[test]
fn manual_price_is_overwritten_by_later_vehicle_change() {
    let mut form = BookingForm::create(FakeStore::default());
    form.set_field_str("serviceType", "Basic Wash").unwrap();

    // An explicit price sticks until service or vehicle changes again
    form.set_field_str("price", "40").unwrap();
    assert_eq!(form.value("price"), Some(&json!(40)));
    form.set_field_str("notes", "regular customer").unwrap();
    assert_eq!(form.value("price"), Some(&json!(40)));

    form.set_field_str("carDetails.type", "luxury").unwrap();
    assert_eq!(form.value("price"), Some(&json!(50)));
}

#[test]
fn choices_are_stored_in_canonical_form() {
    let mut form = BookingForm::create(FakeStore::default());
    form.set_field_str("carDetails.type", "suv").unwrap();
    form.set_field_str("status", "completed").unwrap();

    assert_eq!(form.value("carDetails.type"), Some(&json!("SUV")));
    assert_eq!(form.value("status"), Some(&json!("Completed")));
}

#[test]
fn rejects_unknown_and_deep_paths() {
    let mut form = BookingForm::create(FakeStore::default());

    assert_eq!(
        form.set_field("carDetails.engine.size", json!("2.0")),
        Err(FieldError::TooDeep("carDetails.engine.size".to_string()))
    );
    assert_eq!(
        form.set_field("createdAt", json!("2025-01-01")),
        Err(FieldError::UnknownField("createdAt".to_string()))
    );
    assert!(matches!(
        form.set_field_str("price", "cheap"),
        Err(FieldError::InvalidValue { .. })
    ));
    assert!(matches!(
        form.set_field_str("serviceType", "Hand Polish"),
        Err(FieldError::InvalidValue { .. })
    ));
}

// ============================================================================
// EDIT
// ============================================================================

#[tokio::test]
async fn load_keeps_stored_price() {
    // Given: a stored booking whose price differs from the table
    let store = FakeStore::with_record("b1", stored_booking());
    let mut form = BookingForm::edit(store, "b1");

    // When: loading it
    form.load().await.expect("load succeeds");

    // Then: stored values are kept, server-owned fields are not
    assert_eq!(form.value("price"), Some(&json!(99)));
    assert_eq!(form.value("duration"), Some(&json!(75)));
    assert_eq!(form.value("carDetails.model"), Some(&json!("A6")));
    for key in ["_id", "__v", "createdAt", "updatedAt", "addOns"] {
        assert!(!form.values().contains_key(key), "{} should be dropped", key);
    }
}

#[tokio::test]
async fn update_payload_has_no_server_fields() {
    let store = FakeStore::with_record("b1", stored_booking());
    let mut form = BookingForm::edit(store.clone(), "b1");
    form.load().await.unwrap();
    form.set_field_str("notes", "Use side entrance").unwrap();

    let submitted = form.submit().await.expect("update succeeds");

    assert_eq!(
        submitted,
        Submitted::Updated {
            id: "b1".to_string()
        }
    );
    let updated = store.updated();
    assert_eq!(updated.len(), 1);
    let (id, payload) = &updated[0];
    assert_eq!(id, "b1");
    for key in ["_id", "id", "__v", "createdAt", "updatedAt"] {
        assert!(payload.get(key).is_none(), "{} must not be sent", key);
    }
    assert_eq!(payload["notes"], json!("Use side entrance"));
    assert_eq!(payload["price"], json!(99));
    assert_eq!(payload["carDetails"]["type"], json!("SUV"));

    let notice = form.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Success);
    assert_eq!(notice.message, "Booking updated successfully!");
}

#[tokio::test]
async fn failed_load_raises_notice() {
    let mut form = BookingForm::edit(FakeStore::default(), "missing");

    assert!(form.load().await.is_err());

    let notice = form.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Failed to load booking data");
}

// ============================================================================
// CREATE
// ============================================================================

#[tokio::test]
async fn missing_required_fields_block_submit() {
    let store = FakeStore::default();
    let mut form = BookingForm::create(store.clone());

    let err = form.submit().await.unwrap_err();

    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation errors, got {:?}", err);
    };
    assert_eq!(
        errors.get("customerName").map(String::as_str),
        Some("Customer name is required")
    );
    assert!(errors.contains_key("serviceType"));
    assert!(errors.contains_key("date"));
    assert!(!errors.contains_key("notes"));
    assert!(store.created().is_empty());
    assert_eq!(form.errors(), &errors);
}

#[tokio::test]
async fn editing_a_field_clears_its_error() {
    let mut form = BookingForm::create(FakeStore::default());
    assert!(!form.validate());
    assert!(form.errors().contains_key("customerName"));

    form.set_field_str("customerName", "Jane").unwrap();
    assert!(!form.errors().contains_key("customerName"));
}

#[tokio::test]
async fn create_sends_editable_non_blank_fields() {
    let store = FakeStore::default();
    let mut form = BookingForm::create(store.clone());
    fill_valid_booking(&mut form);
    form.set_field_str("customerPhone", "").unwrap();
    form.set_field_str("carDetails.make", "").unwrap();

    let submitted = form.submit().await.expect("create succeeds");

    assert_eq!(
        submitted,
        Submitted::Created {
            id: Some("new1".to_string())
        }
    );
    let created = store.created();
    let payload = &created[0];
    assert_eq!(payload["customerName"], json!("Jane Doe"));
    assert_eq!(payload["price"], json!(25));
    assert_eq!(payload["duration"], json!(30));
    assert_eq!(payload["status"], json!("Pending"));
    assert!(payload.get("customerPhone").is_none());
    assert!(payload["carDetails"].get("make").is_none());
    assert_eq!(payload["carDetails"]["type"], json!("sedan"));

    assert_eq!(
        form.notices().current().unwrap().message,
        "Booking created successfully!"
    );
}

#[tokio::test]
async fn server_rejection_is_reported() {
    let store = FakeStore::default();
    store.reject_writes(409, "Time slot is already booked");
    let mut form = BookingForm::create(store.clone());
    fill_valid_booking(&mut form);

    let err = form.submit().await.unwrap_err();

    assert_eq!(
        err,
        SubmitError::Rejected("Time slot is already booked".to_string())
    );
    let notice = form.notices().current().unwrap();
    assert_eq!(notice.level, NoticeLevel::Error);
    assert_eq!(notice.message, "Time slot is already booked");
    // Values survive so the user can retry
    assert_eq!(form.value("customerName"), Some(&json!("Jane Doe")));
}

// ============================================================================
// TASKS
// ============================================================================

#[tokio::test]
async fn task_title_is_required() {
    let mut form = TaskForm::create(FakeStore::default());
    form.set_field_str("title", "   ").unwrap();

    let err = form.submit().await.unwrap_err();

    let SubmitError::Invalid(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(
        errors.get("title").map(String::as_str),
        Some("Title is required")
    );
}

#[tokio::test]
async fn task_create_drops_blank_description() {
    let store = FakeStore::default();
    let mut form = TaskForm::create(store.clone());
    form.set_field_str("title", "Write report").unwrap();

    form.submit().await.expect("create succeeds");

    assert_eq!(
        store.created()[0],
        json!({ "title": "Write report", "status": "pending" })
    );
    assert_eq!(
        form.notices().current().unwrap().message,
        "Task created successfully!"
    );
}

#[tokio::test]
async fn task_update_sends_cleared_description() {
    // Given: a stored task with a description
    let store = FakeStore::with_record(
        "t1",
        json!({ "_id": "t1", "title": "T", "description": "old", "status": "pending" }),
    );
    let mut form = TaskForm::edit(store.clone(), "t1");
    form.load().await.expect("load succeeds");

    // When: clearing the description and saving
    form.set_field_str("description", "").unwrap();
    form.submit().await.expect("update succeeds");

    // Then: the blank is sent so the server clears it
    let updated = store.updated();
    let (id, payload) = &updated[0];
    assert_eq!(id, "t1");
    assert_eq!(
        payload,
        &json!({ "title": "T", "description": "", "status": "pending" })
    );
}

#[tokio::test]
async fn task_status_accepts_only_known_values() {
    let mut form = TaskForm::create(FakeStore::default());
    assert!(form.set_field_str("status", "DONE").is_ok());
    assert_eq!(form.value("status"), Some(&json!("done")));
    assert!(form.set_field_str("status", "archived").is_err());
}
