pub mod booking;
pub mod booking_number;
pub mod clock;
pub mod config;
pub mod confirmation;
pub mod macros;
pub mod pricing;
pub mod slot_reservation;
pub mod uuid_service;
