//! Crash point injection for testing durability
//!
//! The `BUDGETD_CRASH_POINT` environment variable names a point in the
//! snapshot write path. When a crash point is enabled, budgetd immediately
//! terminates via `std::process::abort()` - no cleanup, no unwinding, no
//! catching. Zero-cost when the variable is unset.
//!
//! # Usage
//!
//! ```ignore
//! use budgetd::crash_point::maybe_crash;
//!
//! maybe_crash("snapshot_before_rename");
//! ```
//!
//! # Testing
//!
//! ```bash
//! BUDGETD_CRASH_POINT=snapshot_before_rename cargo run -- start
//! ```

use std::sync::OnceLock;

/// Cache the crash point name to avoid repeated env var lookups
static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

/// Get the configured crash point (cached)
#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var("BUDGETD_CRASH_POINT").ok())
        .as_deref()
}

/// Check if a specific crash point is enabled
///
/// Returns true if `BUDGETD_CRASH_POINT` equals the given name.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Trigger a crash if the named crash point is enabled
///
/// Terminates the process immediately, without cleanup, without unwinding,
/// without catching. This is a no-op when `BUDGETD_CRASH_POINT` is not set
/// or doesn't match.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    pub const SNAPSHOT_BEFORE_TEMP_WRITE: &str = "snapshot_before_temp_write";
    pub const SNAPSHOT_AFTER_TEMP_WRITE: &str = "snapshot_after_temp_write";
    pub const SNAPSHOT_BEFORE_RENAME: &str = "snapshot_before_rename";
    pub const SNAPSHOT_AFTER_RENAME: &str = "snapshot_after_rename";

    /// Get all crash point names
    pub fn all() -> &'static [&'static str] {
        &[
            SNAPSHOT_BEFORE_TEMP_WRITE,
            SNAPSHOT_AFTER_TEMP_WRITE,
            SNAPSHOT_BEFORE_RENAME,
            SNAPSHOT_AFTER_RENAME,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_disabled_by_default() {
        assert!(!crash_point_enabled("snapshot_before_rename"));
    }

    #[test]
    fn test_all_crash_points_defined() {
        let all = points::all();
        assert_eq!(all.len(), 4);
        assert!(all.contains(&"snapshot_before_temp_write"));
        assert!(all.contains(&"snapshot_after_rename"));
    }

    #[test]
    fn test_crash_point_names_are_lowercase_with_underscores() {
        for point in points::all() {
            assert!(
                point.chars().all(|c| c.is_lowercase() || c == '_'),
                "Crash point '{}' should be lowercase with underscores",
                point
            );
        }
    }
}
