//! Data models

pub mod classification;
pub mod chat;

pub use classification::*;
pub use chat::*;
