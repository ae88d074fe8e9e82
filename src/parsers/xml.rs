//! Parser for cppcheck's XML (version 2) report.
//!
//! Shape read: `results > errors > error[@id,@severity,@msg] > location[@file,@line]`.
//! Only the first `location` of an error counts. Malformed XML drops the
//! whole batch; an `error` without attributes or location drops only itself.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::parsers::{OutputFormat, ParseError, ParseResult, Parser, RawRecord};

const RESULTS: &[u8] = b"results";
const ERRORS: &[u8] = b"errors";
const ERROR: &[u8] = b"error";
const LOCATION: &[u8] = b"location";

/// Parser for `--xml-version=2` output.
#[derive(Debug, Default)]
pub struct XmlParser;

impl XmlParser {
    pub fn new() -> Self {
        Self
    }
}

impl Parser for XmlParser {
    fn parse(&self, output: &str, workspace_root: &Path) -> ParseResult {
        match read_errors(output) {
            Ok(elements) => collect(elements, workspace_root),
            Err(reason) => {
                tracing::warn!(%reason, "Discarding unreadable analyzer XML");
                ParseResult::default()
            }
        }
    }

    fn format(&self) -> OutputFormat {
        OutputFormat::Xml
    }
}

/// One `error` element as read from the document.
#[derive(Debug, Default)]
struct ErrorElement {
    attributes: Option<HashMap<String, String>>,
    location: Option<HashMap<String, String>>,
    seen_location: bool,
}

/// Walk the document and return every `results/errors/error` element.
fn read_errors(xml: &str) -> Result<Vec<ErrorElement>, String> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Vec<u8>> = Vec::new();
    let mut elements: Vec<ErrorElement> = Vec::new();
    let mut current: Option<ErrorElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                open_element(&e, &stack, &mut current);
                stack.push(e.name().as_ref().to_vec());
            }
            Ok(Event::Empty(e)) => {
                open_element(&e, &stack, &mut current);
                stack.push(e.name().as_ref().to_vec());
                close_element(&mut stack, &mut current, &mut elements);
            }
            Ok(Event::End(_)) => close_element(&mut stack, &mut current, &mut elements),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(format!("{e} at byte {}", reader.buffer_position())),
        }
    }

    if !stack.is_empty() {
        return Err("unexpected end of document".to_string());
    }
    Ok(elements)
}

fn open_element(e: &BytesStart<'_>, stack: &[Vec<u8>], current: &mut Option<ErrorElement>) {
    let name = e.name();
    let name = name.as_ref();
    if name == ERROR && is_path(stack, &[RESULTS, ERRORS]) {
        *current = Some(ErrorElement {
            attributes: read_attributes(e),
            ..ErrorElement::default()
        });
    } else if name == LOCATION && is_path(stack, &[RESULTS, ERRORS, ERROR]) {
        if let Some(error) = current.as_mut() {
            if !error.seen_location {
                error.seen_location = true;
                error.location = read_attributes(e);
            }
        }
    }
}

fn close_element(
    stack: &mut Vec<Vec<u8>>,
    current: &mut Option<ErrorElement>,
    elements: &mut Vec<ErrorElement>,
) {
    let closed = stack.pop();
    if closed.as_deref() == Some(ERROR) && is_path(stack, &[RESULTS, ERRORS]) {
        if let Some(error) = current.take() {
            elements.push(error);
        }
    }
}

fn is_path(stack: &[Vec<u8>], path: &[&[u8]]) -> bool {
    stack.len() == path.len() && stack.iter().zip(path).all(|(a, b)| a.as_slice() == *b)
}

/// All attributes of an element, or `None` if any of them is unreadable.
fn read_attributes(e: &BytesStart<'_>) -> Option<HashMap<String, String>> {
    let mut map = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.ok()?;
        let key = std::str::from_utf8(attr.key.as_ref()).ok()?.to_string();
        let raw = std::str::from_utf8(&attr.value).ok()?;
        let value: Cow<'_, str> = quick_xml::escape::unescape(raw).ok()?;
        map.insert(key, value.into_owned());
    }
    Some(map)
}

fn collect(elements: Vec<ErrorElement>, workspace_root: &Path) -> ParseResult {
    let mut result = ParseResult::default();
    for (index, element) in elements.into_iter().enumerate() {
        match to_raw(element) {
            Ok(raw) => {
                result.push_raw(index, raw, workspace_root);
            }
            Err((field, message)) => result.errors.push(ParseError {
                record_index: index,
                field: field.to_string(),
                message: message.to_string(),
            }),
        }
    }
    tracing::debug!(
        accepted = result.record_count(),
        dropped = result.errors.len(),
        duplicates = result.duplicates,
        "Parsed analyzer XML"
    );
    result
}

fn to_raw(element: ErrorElement) -> Result<RawRecord, (&'static str, &'static str)> {
    let mut attributes = element
        .attributes
        .ok_or(("error", "Unreadable error attributes"))?;
    let mut location = element
        .location
        .ok_or(("location", "Missing location element"))?;

    Ok(RawRecord {
        id: take(&mut attributes, "id")?,
        severity: take(&mut attributes, "severity")?,
        message: take(&mut attributes, "msg")?,
        file: take(&mut location, "file")?,
        line: take(&mut location, "line")?,
    })
}

fn take(
    map: &mut HashMap<String, String>,
    key: &'static str,
) -> Result<String, (&'static str, &'static str)> {
    map.remove(key).ok_or((key, "Missing attribute"))
}
