#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod model;
pub mod scheduler;
pub mod time;
pub mod tracker;

pub use catalog::{Catalog, KanaCatalog};
pub use error::Error;
pub use time::Clock;
