//! Shared toolbar contracts.
//!
//! Plain serializable shapes for toolbar configuration and selection data,
//! plus the selector engine used to test element descriptors.

pub mod toolbar;
