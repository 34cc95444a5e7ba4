//! Repository traits for domain layer.

pub mod groups;

pub use groups::GroupStore;
