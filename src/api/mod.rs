pub mod error;
pub mod openwall;
