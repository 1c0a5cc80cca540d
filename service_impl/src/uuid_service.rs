use service::uuid_service::UuidService;
use uuid::Uuid;

/// Random v4 UUIDs, used as a source of random bits.
pub struct UuidServiceImpl;

impl UuidService for UuidServiceImpl {
    fn new_uuid(&self, _usage: &str) -> Uuid {
        Uuid::new_v4()
    }
}
