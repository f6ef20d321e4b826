pub mod script;

pub use script::{ScriptStep, VisitorAction, VisitorScript};
