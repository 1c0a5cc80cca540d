use std::sync::Arc;

use kidbook_utils::Money;

/// A bookable activity with its price table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Offering {
    pub id: i64,
    pub vendor_id: i64,
    pub name: Arc<str>,
    pub price_per_session: Money,
    pub trial_price: Option<Money>,
    pub package_4_price: Option<Money>,
    pub package_8_price: Option<Money>,
    pub package_12_price: Option<Money>,
}

impl From<&dao::offering::OfferingEntity> for Offering {
    fn from(offering: &dao::offering::OfferingEntity) -> Self {
        Self {
            id: offering.id,
            vendor_id: offering.vendor_id,
            name: offering.name.clone(),
            price_per_session: offering.price_per_session,
            trial_price: offering.trial_price,
            package_4_price: offering.package_4_price,
            package_8_price: offering.package_8_price,
            package_12_price: offering.package_12_price,
        }
    }
}
