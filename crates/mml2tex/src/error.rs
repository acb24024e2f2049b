use std::fmt;
use std::ops::Range;

use thiserror::Error;

use crate::symbol_table::Namespace;

/// Represents an error that occurred while rendering a tree.
///
/// The range is the byte span of the offending element in the source document, as recorded by
/// the reader. Constructed trees carry `0..0`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}: {}", .0.start, .1)]
pub struct ConversionError(pub Range<usize>, pub ErrorKind);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The element has no rendering rule.
    #[error("unsupported element <{element}>")]
    UnsupportedConstruct { element: Box<str> },
    #[error("<{element}> expects {expected}, got {got}")]
    ArityMismatch {
        element: Box<str>,
        expected: Arity,
        got: usize,
    },
    /// A named character reference that survived reading because the catalog has no entry for it.
    #[error("unresolved entity reference {reference}")]
    UnresolvedEntity { reference: Box<str> },
    /// The tree nests deeper than the walker is willing to recurse.
    #[error("elements nested more than {limit} levels deep")]
    DepthLimitExceeded { limit: usize },
}

/// The number of children a structural element accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
    /// A base followed by subscript/superscript pairs, optionally split by `<mprescripts/>`.
    Paired,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(1) => f.write_str("exactly 1 child"),
            Arity::Exactly(n) => write!(f, "exactly {n} children"),
            Arity::AtLeast(1) => f.write_str("at least 1 child"),
            Arity::AtLeast(n) => write!(f, "at least {n} children"),
            Arity::Paired => f.write_str("a base followed by subscript/superscript pairs"),
        }
    }
}

impl ConversionError {
    #[inline]
    pub fn span(&self) -> Range<usize> {
        self.0.clone()
    }

    #[inline]
    pub fn kind(&self) -> &ErrorKind {
        &self.1
    }

    #[cfg(feature = "ariadne")]
    pub fn to_report<'name>(
        &self,
        source_name: &'name str,
        with_color: bool,
    ) -> ariadne::Report<'static, (&'name str, Range<usize>)> {
        use ariadne::{Label, Report, ReportKind};

        let label_msg = match &self.1 {
            ErrorKind::UnsupportedConstruct { .. } => "no rendering for this element".to_string(),
            ErrorKind::ArityMismatch { got, .. } => format!("found {got} here"),
            ErrorKind::UnresolvedEntity { .. } => "unknown entity in this element".to_string(),
            ErrorKind::DepthLimitExceeded { .. } => "nesting limit reached here".to_string(),
        };

        let mut config = ariadne::Config::default().with_index_type(ariadne::IndexType::Byte);
        if !with_color {
            config = config.with_color(false);
        }
        Report::build(ReportKind::Error, (source_name, self.0.start..self.0.start))
            .with_config(config)
            .with_message(self.1.to_string())
            .with_label(Label::new((source_name, self.0.clone())).with_message(label_msg))
            .finish()
    }
}

/// Errors raised while building a [`SymbolTable`](crate::SymbolTable).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("duplicate symbol entry for \"{identifier}\" in namespace {namespace}")]
    DuplicateEntry {
        namespace: Namespace,
        identifier: Box<str>,
    },
    #[error(
        "rule for \"{identifier}\" in namespace {namespace} takes {got} argument(s), but the namespace supplies {expected}"
    )]
    TemplateArity {
        namespace: Namespace,
        identifier: Box<str>,
        expected: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ConversionError(
            4..20,
            ErrorKind::ArityMismatch {
                element: "mfrac".into(),
                expected: Arity::Exactly(2),
                got: 3,
            },
        );
        assert_eq!(
            err.to_string(),
            "4: <mfrac> expects exactly 2 children, got 3"
        );
        let err = ConversionError(
            0..0,
            ErrorKind::UnsupportedConstruct {
                element: "mstack".into(),
            },
        );
        assert_eq!(err.to_string(), "0: unsupported element <mstack>");
        let err = TableError::DuplicateEntry {
            namespace: Namespace::Char,
            identifier: "α".into(),
        };
        assert_eq!(
            err.to_string(),
            "duplicate symbol entry for \"α\" in namespace char"
        );
        let err = ConversionError(7..14, ErrorKind::DepthLimitExceeded { limit: 128 });
        assert_eq!(
            err.to_string(),
            "7: elements nested more than 128 levels deep"
        );
    }
}
