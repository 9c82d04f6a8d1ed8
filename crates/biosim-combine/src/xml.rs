//! Minimal element tree over `quick-xml` events.
//!
//! Namespace prefixes are dropped from element and attribute names and
//! `xmlns` declarations are not kept; SBML, SED-ML and COMBINE manifests are
//! addressed by local names only.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Display;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{CombineError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
    pub text: String,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Result<Self> {
        let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
        let mut attributes = BTreeMap::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            if attr.key.as_ref().starts_with(b"xmlns") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.insert(key, value);
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Attribute that must be present.
    pub fn required_attr(&self, key: &str, document: &'static str) -> Result<&str> {
        self.attr(key).ok_or_else(|| {
            CombineError::invalid(document, format!("<{}> missing attribute {key}", self.name))
        })
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// `L<level>V<version>` from the `level` and `version` attributes.
    pub fn version_label(&self) -> Option<String> {
        match (self.attr("level"), self.attr("version")) {
            (Some(level), Some(version)) => Some(version_label(level.trim(), version.trim())),
            _ => None,
        }
    }

    /// Children of the `list` child, e.g. `listOfSpecies` → `species`.
    pub fn list<'a>(&'a self, list: &str, item: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.child(list)
            .into_iter()
            .flat_map(move |l| l.children_named(item))
    }
}

/// Parse a document into its root element.
pub(crate) fn parse(text: &str, document: &'static str) -> Result<Element> {
    let mut reader = Reader::from_str(text);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::from_start(&start)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| CombineError::invalid(document, "unbalanced closing tag"))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text.unescape()?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CombineError::invalid(document, "unclosed element"));
    }
    root.ok_or_else(|| CombineError::invalid(document, "no root element"))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// `L<level>V<version>`, as stored in [`biosim_domain::Format::version`].
pub(crate) fn version_label(level: impl Display, version: impl Display) -> String {
    format!("L{level}V{version}")
}

/// Inverse of [`version_label`].
pub(crate) fn parse_version_label(label: &str) -> Option<(u32, u32)> {
    let (level, version) = label.strip_prefix('L')?.split_once('V')?;
    Some((level.parse().ok()?, version.parse().ok()?))
}

/// Escape text for use in attribute values and character data.
pub(crate) fn escape(raw: &str) -> Cow<'_, str> {
    quick_xml::escape::escape(raw)
}
