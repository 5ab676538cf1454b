//! HTTP route handlers

pub mod history;
pub mod quiz;
pub mod topics;
