// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Client role - submits investigation requests and rates reports
pub const ROLE_CLIENT: &str = "client";

/// Investigator role - accepts, declines and completes requests, files reports
pub const ROLE_INVESTIGATOR: &str = "investigator";

// =============================================================================
// LIFECYCLE CONSTANTS
// =============================================================================

/// Lowest accepted report rating
pub const MIN_RATING: i32 = 1;

/// Highest accepted report rating
pub const MAX_RATING: i32 = 5;

/// Number of rows shown in each dashboard list
pub const DASHBOARD_LIST_LIMIT: i64 = 5;

/// Largest whole budget that fits NUMERIC(10,2)
pub const MAX_BUDGET: i64 = 99_999_999;
