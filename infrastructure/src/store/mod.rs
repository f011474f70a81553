//! CRM store backends

pub mod memory;
#[cfg(feature = "rest-store")]
pub mod rest;

pub use memory::InMemoryCrmStore;
#[cfg(feature = "rest-store")]
pub use rest::RestCrmStore;
