/// The authenticated parent on whose behalf a request runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParentPrincipal {
    pub parent_id: i64,
}

impl ParentPrincipal {
    pub fn new(parent_id: i64) -> Self {
        Self { parent_id }
    }
}
