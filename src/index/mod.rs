//! Secondary indexes kept consistent with the stores

pub mod property_index;

pub use property_index::PropertyIndex;
