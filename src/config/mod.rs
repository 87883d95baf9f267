//! Package file parsing and validation
//!
//! This module handles parsing of atbuild.yml package files, the dynamically
//! typed option values they carry, and validation of their structure.

pub mod parse;
pub mod schema;
pub mod types;
pub mod value;

// Re-export main types
pub use parse::*;
pub use schema::*;
pub use types::*;
pub use value::*;
