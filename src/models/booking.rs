use super::{Record, UnknownVariant};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A car-wash booking as returned by `/bookings`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub car_details: CarDetails,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: BookingStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub add_ons: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "__v", default, skip_serializing)]
    pub revision: Option<u32>,
}

impl Record for Booking {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Booking {
    /// Short vehicle label: the type if known, else make and model.
    pub fn vehicle_label(&self) -> String {
        if let Some(vehicle) = self.car_details.vehicle_type {
            return vehicle.to_string();
        }
        let make = self.car_details.make.as_deref().unwrap_or("");
        let model = self.car_details.model.as_deref().unwrap_or("");
        format!("{} {}", make, model).trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarDetails {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(rename = "type", default)]
    pub vehicle_type: Option<VehicleType>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 4] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Completed,
        BookingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("booking status", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceType {
    #[serde(rename = "Basic Wash")]
    BasicWash,
    #[serde(rename = "Deluxe Wash")]
    DeluxeWash,
    #[serde(rename = "Full Detailing")]
    FullDetailing,
}

impl ServiceType {
    pub const ALL: [ServiceType; 3] = [
        ServiceType::BasicWash,
        ServiceType::DeluxeWash,
        ServiceType::FullDetailing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::BasicWash => "Basic Wash",
            ServiceType::DeluxeWash => "Deluxe Wash",
            ServiceType::FullDetailing => "Full Detailing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ServiceType::BasicWash => "Exterior wash and dry",
            ServiceType::DeluxeWash => "Exterior wash, interior vacuum, and window cleaning",
            ServiceType::FullDetailing => "Complete interior and exterior detailing",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = UnknownVariant;

    /// Accepts the display name ("Deluxe Wash") or a slug ("deluxe-wash").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['-', '_'], " ");
        ServiceType::ALL
            .into_iter()
            .find(|service| service.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| UnknownVariant::new("service type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "sedan")]
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    #[serde(rename = "hatchback")]
    Hatchback,
    #[serde(rename = "luxury")]
    Luxury,
}

impl VehicleType {
    pub const ALL: [VehicleType; 4] = [
        VehicleType::Sedan,
        VehicleType::Suv,
        VehicleType::Hatchback,
        VehicleType::Luxury,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Sedan => "sedan",
            VehicleType::Suv => "SUV",
            VehicleType::Hatchback => "hatchback",
            VehicleType::Luxury => "luxury",
        }
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VehicleType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VehicleType::ALL
            .into_iter()
            .find(|vehicle| vehicle.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownVariant::new("vehicle type", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_deserializes_server_shape() {
        let body = serde_json::json!({
            "_id": "66a1",
            "customerName": "Jane Doe",
            "carDetails": { "make": "Toyota", "model": "RAV4", "type": "SUV" },
            "serviceType": "Deluxe Wash",
            "date": "2024-06-01T10:30",
            "duration": 60,
            "price": 55,
            "status": "Confirmed",
            "createdAt": "2024-05-30T08:00:00.000Z",
            "updatedAt": "2024-05-30T08:00:00.000Z",
            "__v": 0
        });
        let booking: Booking = serde_json::from_value(body).unwrap();
        assert_eq!(booking.id, "66a1");
        assert_eq!(booking.service_type, Some(ServiceType::DeluxeWash));
        assert_eq!(booking.car_details.vehicle_type, Some(VehicleType::Suv));
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(booking.revision, Some(0));
        assert!(booking.created_at.is_some());
    }

    #[test]
    fn test_serialized_booking_has_no_revision_marker() {
        let booking: Booking = serde_json::from_value(serde_json::json!({
            "_id": "1", "customerName": "A", "__v": 3
        }))
        .unwrap();
        let value = serde_json::to_value(&booking).unwrap();
        assert!(value.get("__v").is_none());
    }

    #[test]
    fn test_service_type_parses_slugs() {
        assert_eq!("full-detailing".parse(), Ok(ServiceType::FullDetailing));
        assert_eq!("Basic Wash".parse(), Ok(ServiceType::BasicWash));
        assert!("hand wash".parse::<ServiceType>().is_err());
    }

    #[test]
    fn test_vehicle_label_falls_back_to_make_model() {
        let mut booking: Booking =
            serde_json::from_value(serde_json::json!({ "_id": "1" })).unwrap();
        booking.car_details.make = Some("Honda".to_string());
        booking.car_details.model = Some("Civic".to_string());
        assert_eq!(booking.vehicle_label(), "Honda Civic");

        booking.car_details.vehicle_type = Some(VehicleType::Hatchback);
        assert_eq!(booking.vehicle_label(), "hatchback");
    }
}
