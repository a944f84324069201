//! Shared constants for end-to-end tests
//!
//! When test data changes (user credentials, seeded courses, etc.),
//! update only this file.

// ============================================================================
// Test User Credentials
// ============================================================================

/// Regular test user
pub const TEST_USER: &str = "testuser";

/// Regular test user password
pub const TEST_PASS: &str = "testpass123";

/// Agent test user (can manage the catalog)
pub const AGENT_USER: &str = "agentuser";

/// Agent test user password
pub const AGENT_PASS: &str = "agentpass123";

// ============================================================================
// Seeded Catalog Data
// ============================================================================

/// Title of the first seeded course
pub const COURSE_1_TITLE: &str = "Rust for Beginners";

/// Title of the second seeded course
pub const COURSE_2_TITLE: &str = "Advanced Databases";

/// Title of the third seeded course
pub const COURSE_3_TITLE: &str = "Watercolor Painting";

/// Category shared by the first two seeded courses
pub const CATEGORY_PROGRAMMING: &str = "Programming";

/// Category of the third seeded course
pub const CATEGORY_ART: &str = "Art";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
