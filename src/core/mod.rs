pub mod builder;
pub mod cache;
pub mod details;
pub mod lookup;
pub mod paging;
pub mod policy;
pub mod province;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::domain::model::{PostalCodeEntry, PostalNameEntry};
pub use crate::domain::ports::{AddressVerifier, LocationSearch, PostalApi, Storage};
pub use crate::utils::error::Result;
