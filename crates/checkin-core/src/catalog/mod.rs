//! Topic catalog and partner directory.
//!
//! Both are read-only to the check-in engine; callers use them to validate
//! input before handing it to the engine.

mod builtin;
mod directory;
mod model;

pub use builtin::BuiltinCatalog;
pub use directory::{CategoryCatalog, ConfigPartnerDirectory, PartnerDirectory};
pub use model::{Category, Partner};
