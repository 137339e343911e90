pub mod collector;
pub mod config;
pub mod error;
pub mod gather;
pub mod materialize;
pub mod paths;
pub mod provenance;
pub mod resolver;
pub mod writer;

pub use config::{Config, RemoveImports};
pub use error::{AppError, Result};
pub use gather::{Collection, gather_files};
pub use materialize::{FileBlock, ReadErrorKind, ReadOutcome, materialize};
pub use provenance::{CollectionContext, Provenance};
pub use writer::{resolve_output_path, write_output};
