//! Storage layer tests
//!
//! Collections persisted under a store root: reopening, listing,
//! deleting and querying.
