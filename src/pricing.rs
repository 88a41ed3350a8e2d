//! Static price and duration tables for car-wash services.

use crate::models::{ServiceType, VehicleType};

/// Price and duration derived from a service and vehicle type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quote {
    pub price: u32,
    pub duration_minutes: u32,
}

pub fn price(service: ServiceType, vehicle: VehicleType) -> u32 {
    use ServiceType::*;
    use VehicleType::*;

    match (service, vehicle) {
        (BasicWash, Sedan | Hatchback) => 25,
        (BasicWash, Suv) => 30,
        (BasicWash, Luxury) => 50,
        (DeluxeWash, Sedan | Hatchback) => 45,
        (DeluxeWash, Suv) => 55,
        (DeluxeWash, Luxury) => 85,
        (FullDetailing, Sedan | Hatchback) => 120,
        (FullDetailing, Suv) => 150,
        (FullDetailing, Luxury) => 250,
    }
}

pub fn duration_minutes(service: ServiceType) -> u32 {
    match service {
        ServiceType::BasicWash => 30,
        ServiceType::DeluxeWash => 60,
        ServiceType::FullDetailing => 180,
    }
}

pub fn quote(service: ServiceType, vehicle: VehicleType) -> Quote {
    Quote {
        price: price(service, vehicle),
        duration_minutes: duration_minutes(service),
    }
}
