//! Standard exit codes for CLI operations
//!
//! These exit codes follow Unix conventions and sysexits.h where applicable.

/// General error - unspecified failure
pub const ERROR: i32 = 1;

/// Configuration error - the reconciler config file is invalid
pub const CONFIG_ERROR: i32 = 2;

/// Template error - a manifest failed to render
pub const TEMPLATE_ERROR: i32 = 3;

/// Manifest error - a rendered manifest could not be decoded
pub const MANIFEST_ERROR: i32 = 4;

/// IO error - file not found, permission denied, etc.
pub const IO_ERROR: i32 = 5;

/// Cluster error - no usable connection to the cluster
pub const CLUSTER_ERROR: i32 = 6;

/// Partial failure - some resources failed and `--fail-on-error` was given
pub const PARTIAL_FAILURE: i32 = 7;

/// Usage error - invalid arguments or options (following sysexits.h convention)
pub const USAGE_ERROR: i32 = 64;
