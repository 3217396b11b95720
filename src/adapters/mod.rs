// Adapters layer: concrete implementations for external systems (http APIs, local storage).

pub mod basisregisters;
pub mod geolocation;
pub mod http;
pub mod storage;

pub use basisregisters::BasisregistersClient;
pub use geolocation::GeolocationClient;
pub use storage::LocalStorage;
