//! HTTP route handlers

pub mod insert;
pub mod query;
