//! Document-object layer over `.docx` packages.
//!
//! [`reader`] opens an existing package and lists its body paragraphs the way
//! a word processor would; [`writer`] builds a new package from paragraphs and
//! runs. Neither aims at fidelity beyond plain text, bold, size, colour,
//! alignment, and page breaks.

pub mod reader;
pub mod writer;

pub use reader::{OoxmlBackend, Package, body_paragraph_texts};
pub use writer::{Alignment, Document, Paragraph, RgbColor, Run, WriteError};
