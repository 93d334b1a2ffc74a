//! Database and HTTP fixtures.

pub mod campaign;
pub mod killmail;
pub mod mockito;
