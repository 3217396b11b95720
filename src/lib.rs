pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::Cli;

pub use crate::adapters::{BasisregistersClient, GeolocationClient, LocalStorage};
pub use crate::config::AppConfig;
pub use crate::core::{
    builder::StoreBuilder,
    cache::DiskCache,
    lookup::LookupService,
    policy::FetchPolicy,
    province::{classify, is_in_covered_region, Province},
    store::{ReferenceStore, StoreState},
};
pub use crate::utils::error::{Result, StoreError};
