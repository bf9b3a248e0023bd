pub mod common;
pub mod error;
pub mod local;
pub mod map;
