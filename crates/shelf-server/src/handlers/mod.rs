//! HTTP handlers

pub mod books;
pub mod health;

pub use health::health;
