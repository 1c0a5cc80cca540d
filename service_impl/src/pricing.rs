use kidbook_utils::Money;
use service::{booking::BookingType, offering::Offering, ServiceError};

/// Computes the amount charged for a booking of `booking_type`.
///
/// Packages use their explicit price if the offering has one and fall back
/// to the per-session price times the session count otherwise. Trials
/// require an explicit trial price.
pub fn resolve_amount(offering: &Offering, booking_type: BookingType) -> Result<Money, ServiceError> {
    let package_price = match booking_type {
        BookingType::Trial => {
            return offering
                .trial_price
                .ok_or_else(|| ServiceError::PriceUnavailable(booking_type.as_str().into()));
        }
        BookingType::Single => return Ok(offering.price_per_session),
        BookingType::Package4 => offering.package_4_price,
        BookingType::Package8 => offering.package_8_price,
        BookingType::Package12 => offering.package_12_price,
    };
    match package_price {
        Some(price) => Ok(price),
        None => offering
            .price_per_session
            .checked_times(booking_type.session_count() as i64)
            .ok_or(ServiceError::InternalError),
    }
}
