pub mod loader;

pub use loader::{import_trains, CatalogError, ImportReport};
