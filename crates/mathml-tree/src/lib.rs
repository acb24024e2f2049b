//! MathML element tree for the `mml2tex` converter.
//!
//! This crate holds the input side of the conversion: the [`MathNode`] tree that the engine
//! walks, and the collaborators that produce it from MathML text. [`read_mathml`] parses a
//! document with `quick-xml` and resolves character and named entity references through the
//! [`entities`] catalog before the tree is handed on.
//!
//! # Example
//!
//! ```rust
//! use mml2tex_tree::{read_mathml, ElementKind};
//!
//! let root = read_mathml("<math><mfrac><mi>a</mi><mi>&beta;</mi></mfrac></math>").unwrap();
//! assert_eq!(root.kind, ElementKind::Math);
//!
//! let frac = &root.children[0];
//! assert_eq!(frac.kind, ElementKind::Mfrac);
//! assert_eq!(frac.children[1].text(), Some("β"));
//! ```
pub mod entities;
mod node;
mod reader;

pub use node::{ElementKind, MathNode, OperatorForm};
pub use reader::{ReadError, extract_processing_instruction, read_mathml};
