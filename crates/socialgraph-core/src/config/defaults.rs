//! Default values for socialgraph configuration.
//!
//! All hardcoded defaults and hard limits are centralized here.

// ============================================================================
// Store Defaults
// ============================================================================

/// Default on-disk location of the graph store.
pub const DEFAULT_STORE_PATH: &str = ".socialgraph/graph.db";

/// Default SurrealDB namespace.
pub const DEFAULT_NAMESPACE: &str = "socialgraph";

/// Default SurrealDB database (the graph name).
pub const DEFAULT_DATABASE: &str = "red_usuarios";

// ============================================================================
// Usuario Limits
// ============================================================================

/// Minimum allowed age.
pub const MIN_EDAD: i64 = 12;

/// Maximum allowed age.
pub const MAX_EDAD: i64 = 150;

/// Maximum page size for user listings.
pub const MAX_PAGE_SIZE: usize = 1000;

/// Default page size for user listings.
pub const DEFAULT_PAGE_SIZE: usize = 100;

// ============================================================================
// Analysis Defaults
// ============================================================================

/// Default depth ceiling for shortest-path search.
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Hard ceiling for shortest-path search depth.
pub const MAX_DEPTH_LIMIT: usize = 5;

/// Default number of recommendations.
pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 10;

/// Hard ceiling for the number of recommendations.
pub const MAX_RECOMMENDATION_LIMIT: usize = 100;

/// Default minimum number of common friends.
pub const DEFAULT_MIN_COMMON_FRIENDS: usize = 1;

/// Upper bound for the common-friends threshold.
pub const MAX_MIN_COMMON_FRIENDS: usize = 10;

/// Default node cap for ego networks.
pub const DEFAULT_EGO_MAX_NODES: usize = 500;

/// Smallest accepted node cap for ego networks.
pub const MIN_EGO_MAX_NODES: usize = 10;

/// Largest accepted node cap for ego networks.
pub const MAX_EGO_MAX_NODES: usize = 2000;

// ============================================================================
// Logging Defaults
// ============================================================================

/// Default log level when `RUST_LOG` is not set.
pub const DEFAULT_LOG_LEVEL: &str = "info";
