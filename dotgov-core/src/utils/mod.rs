//! Utility modules

// The datetime serde helpers live next to the wire types; entity types here
// use the same representation.
pub use dotgov_registry::datetime;
