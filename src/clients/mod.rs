pub mod jikan;

pub use jikan::{CatalogClient, CatalogTransport, HttpTransport};
