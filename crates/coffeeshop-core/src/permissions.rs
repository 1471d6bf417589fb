//! Permission constants for the Coffee Shop API.
//!
//! Access tokens carry a `permissions` array; each gated endpoint requires
//! exactly one of these strings.

/// Permission to read the detailed (long) drink view
pub const DRINKS_DETAIL_READ: &str = "get:drinks-detail";
/// Permission to create drinks
pub const DRINKS_CREATE: &str = "post:drinks";
/// Permission to update drinks
pub const DRINKS_UPDATE: &str = "patch:drinks";
/// Permission to delete drinks
pub const DRINKS_DELETE: &str = "delete:drinks";

/// Every permission known to the API. Barista tokens usually hold only
/// [`DRINKS_DETAIL_READ`]; managers hold all of them.
pub const ALL: [&str; 4] = [
    DRINKS_DETAIL_READ,
    DRINKS_CREATE,
    DRINKS_UPDATE,
    DRINKS_DELETE,
];
