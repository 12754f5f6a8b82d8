//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Validation error - configuration rejected by a resource schema
pub const VALIDATION_ERROR: i32 = 2;

/// Provider configuration missing or invalid
pub const CONFIG_ERROR: i32 = 3;

/// The artifact server rejected a request or could not be reached
pub const REMOTE_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// `plan --detailed-exitcode` found pending changes
pub const CHANGES_PENDING: i32 = 6;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
