//! API document module - loads the static description and exposes a read-only view

pub mod load;
pub mod model;

pub use load::{load_document, parse_document, DocumentError, DocumentFormat};
pub use model::*;
