//! Source model objects and document files for the rfpmml pipeline.
//!
//! The source side is a [`Rexp`]: a tree of typed vectors carrying named
//! attributes, addressed by name through [`Rexp::field`] and
//! [`Rexp::attribute`]. [`RexpReader`] loads one from its JSON rendition;
//! [`DocumentWriter`] stores converted documents as JSON.

mod error;
mod reader;
mod rexp;
mod writer;

pub use error::IoError;
pub use reader::RexpReader;
pub use rexp::{Attribute, Rexp};
pub use writer::{DocumentWriter, write_document};
