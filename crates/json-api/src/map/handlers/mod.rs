//! Map Handlers

pub(crate) mod cargas;
pub(crate) mod feed;
pub(crate) mod info;
pub(crate) mod trucks;
