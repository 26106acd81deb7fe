//! Shared helpers for the crate's unit tests.

pub(crate) mod helpers;
