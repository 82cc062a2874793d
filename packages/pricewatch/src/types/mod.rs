//! Core data types for the price tracking pipeline.

pub mod alert;
pub mod comparison;
pub mod config;
pub mod listing;
pub mod recommendation;
