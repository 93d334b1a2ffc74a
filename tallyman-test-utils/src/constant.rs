//! Standard values shared by tests.

/// User agent sent by test HTTP clients.
pub static TEST_USER_AGENT: &str = "tallyman-test/1.0 (contact@example.com)";

/// Jita, the system most fixtures place killmails in.
pub const TEST_SYSTEM_ID: i64 = 30000142;

/// Ship type used for fixture victims (Rifter).
pub const TEST_SHIP_TYPE_ID: i64 = 587;

/// Lock name used by lock tests.
pub static TEST_LOCK_NAME: &str = "test-run";
