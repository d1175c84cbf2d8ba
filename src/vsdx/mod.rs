//! VSDX document output
//!
//! `geometry` maps pixel shapes to page-space paths, `parts` and `page` render
//! the XML parts, `package` zips them atomically, `inspect` reads them back.

pub mod geometry;
pub mod inspect;
pub mod package;
pub mod page;
pub mod parts;
pub mod schema;

pub use inspect::{inspect_document, DocumentSummary};
pub use package::{create_document, DocumentOptions, VsdxWriter};
pub use parts::DocumentPart;
