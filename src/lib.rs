//! qt-ts-catalog
//!
//! Loads Qt Linguist (`.ts`) translation catalogs and resolves UI strings.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod input;
pub mod types;

pub use catalog::{
    Catalog,
    CatalogError,
    CatalogHandle,
    DuplicatePolicy,
};
