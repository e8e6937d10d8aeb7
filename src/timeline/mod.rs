//! Ordered parameter-change events and forward-only clock resolution.

pub(crate) mod store;
