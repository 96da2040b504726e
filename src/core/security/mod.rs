// Security module for path containment
//
// This module keeps every filesystem operation inside the configured base
// directory, rejecting traversal and sibling-prefix escapes before any
// filesystem access happens.

pub mod path_guard;

pub use path_guard::{BaseDirectory, PathGuard, PathSecurityError};
