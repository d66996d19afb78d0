//! Command implementations invoked by the binary.

/// Push/pull of a single path through rsync.
pub mod transfer;
