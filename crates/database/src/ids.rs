use cuid2::CuidConstructor;
use once_cell::sync::Lazy;

static CUID: Lazy<CuidConstructor> = Lazy::new(CuidConstructor::new);

/// Opaque identifier used in URLs instead of row ids.
pub fn new_public_id() -> String {
    CUID.create_id()
}
