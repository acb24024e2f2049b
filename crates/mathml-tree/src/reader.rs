use log::{trace, warn};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use crate::entities;
use crate::node::{ElementKind, MathNode};

const MAX_DEPTH: usize = 1000;

/// Errors raised while turning MathML text into a [`MathNode`] tree.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("XML error at byte {position}: {message}")]
    Xml { position: usize, message: String },
    #[error("invalid UTF-8 in element or attribute name at byte {0}")]
    Encoding(usize),
    #[error("closing tag `</{0}>` without an open element")]
    UnexpectedClose(String),
    #[error("element `<{0}>` is never closed")]
    UnclosedElement(String),
    #[error("document contains more than one root element")]
    MultipleRoots,
    #[error("document contains no element")]
    NoRoot,
    #[error("maximum nesting depth of {0} exceeded")]
    DepthLimitExceeded(usize),
}

/// An element whose end tag has not been seen yet, with the character data collected so far.
struct OpenElement {
    node: MathNode,
    text: String,
}

/// Parse a MathML document (or fragment with a single root element) into a tree.
///
/// Element names are matched on their local part, so both `<mfrac>` and `<m:mfrac>` work.
/// Character data of token elements is whitespace-normalized and has all entity references
/// resolved; a named reference missing from the catalog is kept verbatim (e.g. `&foo;`) and
/// listed in [`MathNode::unresolved`] so that the converter can report it.
pub fn read_mathml(xml: &str) -> Result<MathNode, ReadError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<OpenElement> = Vec::with_capacity(32);
    let mut root: Option<MathNode> = None;

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|e| ReadError::Xml {
            position: reader.buffer_position() as usize,
            message: e.to_string(),
        })?;
        let end = reader.buffer_position() as usize;
        match event {
            Event::Start(ref e) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(ReadError::DepthLimitExceeded(MAX_DEPTH));
                }
                let node = element_node(e, start..end)?;
                trace!("open <{}> at {}", node.name, start);
                stack.push(OpenElement {
                    node,
                    text: String::new(),
                });
            }
            Event::Empty(ref e) => {
                let node = element_node(e, start..end)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(ref e) => {
                let Some(OpenElement { mut node, text }) = stack.pop() else {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Err(ReadError::UnexpectedClose(name));
                };
                node.span.end = end;
                if node.kind.is_token() || !text.trim().is_empty() {
                    node.text = Some(normalize_whitespace(&text).into());
                }
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(ref e) => {
                if let Some(open) = stack.last_mut() {
                    let text = reader.decoder().decode(e).map_err(|_| ReadError::Encoding(start))?;
                    open.text.push_str(&text);
                }
            }
            Event::CData(ref e) => {
                if let Some(open) = stack.last_mut() {
                    let text = reader.decoder().decode(e).map_err(|_| ReadError::Encoding(start))?;
                    open.text.push_str(&text);
                }
            }
            Event::GeneralRef(ref e) => {
                let name = reader.decoder().decode(e).map_err(|_| ReadError::Encoding(start))?;
                if let Some(open) = stack.last_mut() {
                    match entities::resolve(&name) {
                        Some(value) => open.text.push_str(&value),
                        None => {
                            warn!("unresolved entity reference `&{name};` at byte {start}");
                            let reference = format!("&{name};");
                            open.text.push_str(&reference);
                            open.node.unresolved.push(reference.into());
                        }
                    }
                }
            }
            Event::Eof => break,
            // Comments, the XML declaration, doctype and processing instructions carry no math.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(ReadError::UnclosedElement(open.node.name.into()));
    }
    root.ok_or(ReadError::NoRoot)
}

/// Return the data of the first processing instruction with the given target.
///
/// The converter's serialized form of a result is `<?mml2tex ...?>`; this reads it back.
/// Returns `Ok(None)` if the document has no such instruction.
pub fn extract_processing_instruction(
    xml: &str,
    target: &str,
) -> Result<Option<String>, ReadError> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event() {
            Ok(Event::PI(pi)) => {
                if pi.target() == target.as_bytes() {
                    let content = reader
                        .decoder()
                        .decode(pi.content())
                        .map_err(|_| ReadError::Encoding(reader.buffer_position() as usize))?;
                    return Ok(Some(content.trim().to_string()));
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => {
                return Err(ReadError::Xml {
                    position: reader.buffer_position() as usize,
                    message: e.to_string(),
                });
            }
        }
    }
}

fn element_node(e: &BytesStart<'_>, span: std::ops::Range<usize>) -> Result<MathNode, ReadError> {
    let local = e.local_name();
    let name = std::str::from_utf8(local.as_ref()).map_err(|_| ReadError::Encoding(span.start))?;
    let mut node = match ElementKind::from_tag(name) {
        ElementKind::Unknown => MathNode::unknown(name, Vec::new()),
        kind => MathNode::new(kind, Vec::new()),
    };
    node.span = span;
    for attr in e.attributes().with_checks(false).flatten() {
        let key = attr.key.local_name();
        let Ok(key) = std::str::from_utf8(key.as_ref()) else {
            continue;
        };
        let value = String::from_utf8_lossy(&attr.value);
        node.set_attr(key, &entities::unescape(&value));
    }
    Ok(node)
}

fn attach(
    stack: &mut [OpenElement],
    root: &mut Option<MathNode>,
    node: MathNode,
) -> Result<(), ReadError> {
    match stack.last_mut() {
        Some(parent) => parent.node.children.push(node),
        None if root.is_some() => return Err(ReadError::MultipleRoots),
        None => *root = Some(node),
    }
    Ok(())
}

/// Trim and collapse runs of XML whitespace into single spaces.
fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for word in text.split([' ', '\t', '\n', '\r']).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}
