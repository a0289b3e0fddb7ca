//! In-memory document model.
//!
//! The builder owns one [`Document`] buffer, its [`SectionState`], and
//! validates tables in the [`TableSpec`] form before handing them to a
//! dialect renderer.

mod document;
mod table;

pub use document::*;
pub use table::*;
