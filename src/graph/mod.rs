pub mod artifact;
pub mod conversion;
pub mod definition;
pub mod diagnostics;
pub mod index;
pub mod wire;

pub use artifact::*;
pub use conversion::*;
pub use definition::*;
pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use index::*;
pub use wire::WireFunnel;
