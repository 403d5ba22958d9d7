pub mod model;
pub mod parser;

pub use model::{Document, ModificationEntry, ModificationKind, Release, UnknownModificationKind};
pub use parser::diagnostics::Diagnostic;
pub use parser::{parse, Parsed};
