//! XML serialization of an element tree.
//!
//! The writer tracks the in-scope default namespace and emits an `xmlns`
//! declaration only where an element's namespace differs from its parent's.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::config::{INDENT_WIDTH, LATIN1_ENCODING, OUTPUT_ENCODING, XML_VERSION};
use crate::error::{ErmsError, Result};
use crate::tree::{ElementTree, NodeId};

/// Byte encoding of written documents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputEncoding {
    #[default]
    Utf8,
    /// ISO-8859-1. Characters above U+00FF become character references.
    Latin1,
}

impl OutputEncoding {
    /// Name written in the XML declaration.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Utf8 => OUTPUT_ENCODING,
            Self::Latin1 => LATIN1_ENCODING,
        }
    }

    /// Encode serialized XML text.
    ///
    /// Element and attribute names must be ASCII, as every ERMS and SVK
    /// tag is.
    #[must_use]
    pub fn encode(self, xml: &str) -> Vec<u8> {
        match self {
            Self::Utf8 => xml.as_bytes().to_vec(),
            Self::Latin1 => {
                let mut bytes = Vec::with_capacity(xml.len());
                for c in xml.chars() {
                    match u8::try_from(u32::from(c)) {
                        Ok(byte) => bytes.push(byte),
                        Err(_) => bytes.extend(format!("&#x{:X};", u32::from(c)).into_bytes()),
                    }
                }
                bytes
            }
        }
    }
}

impl fmt::Display for OutputEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for OutputEncoding {
    type Err = ErmsError;

    /// Accepts `UTF-8`/`utf8` and `ISO-8859-1`/`latin1`, ignoring case.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "iso-8859-1" | "latin1" | "latin-1" => Ok(Self::Latin1),
            _ => Err(ErmsError::InvalidControlledValue {
                field: "encoding".to_string(),
                value: s.to_string(),
                allowed: vec![OUTPUT_ENCODING.to_string(), LATIN1_ENCODING.to_string()],
            }),
        }
    }
}

/// Output options for [`to_xml_string`], [`to_xml_bytes`] and [`save_to_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeOptions {
    /// Indent nested elements by two spaces.
    pub pretty_print: bool,
    /// Start with `<?xml version="1.0" encoding="..."?>`.
    pub xml_declaration: bool,
    /// Encoding named in the declaration and used for byte output.
    pub encoding: OutputEncoding,
}

impl SerializeOptions {
    /// Single-line output without declaration.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            pretty_print: false,
            xml_declaration: false,
            encoding: OutputEncoding::Utf8,
        }
    }

    #[must_use]
    pub fn with_pretty_print(mut self, pretty_print: bool) -> Self {
        self.pretty_print = pretty_print;
        self
    }

    #[must_use]
    pub fn with_xml_declaration(mut self, xml_declaration: bool) -> Self {
        self.xml_declaration = xml_declaration;
        self
    }

    #[must_use]
    pub fn with_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.encoding = encoding;
        self
    }
}

impl Default for SerializeOptions {
    fn default() -> Self {
        Self {
            pretty_print: true,
            xml_declaration: true,
            encoding: OutputEncoding::Utf8,
        }
    }
}

/// Serialize the subtree rooted at `root`.
///
/// The result is always a Rust string; the declaration names
/// `options.encoding`, which [`to_xml_bytes`] applies.
///
/// # Errors
/// Returns `Serialization` if the writer fails.
///
/// # Examples
/// ```
/// use erms_create::{to_xml_string, ElementTree, QName, SerializeOptions};
///
/// let mut tree = ElementTree::new();
/// let root = tree.create(QName::erms("erms"));
/// let title = tree.create_text(QName::erms("title"), "A & B");
/// tree.append_child(root, title);
///
/// let xml = to_xml_string(&tree, root, &SerializeOptions::compact()).unwrap();
/// assert_eq!(
///     xml,
///     r#"<erms xmlns="https://DILCIS.eu/XML/ERMS"><title>A &amp; B</title></erms>"#
/// );
/// ```
pub fn to_xml_string(tree: &ElementTree, root: NodeId, options: &SerializeOptions) -> Result<String> {
    let mut writer = if options.pretty_print {
        Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH)
    } else {
        Writer::new(Vec::new())
    };

    if options.xml_declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new(
                XML_VERSION,
                Some(options.encoding.label()),
                None,
            )))
            .map_err(|e| ErmsError::Serialization(e.to_string()))?;
    }

    write_element(&mut writer, tree, root, None)?;

    let mut bytes = writer.into_inner();
    if options.pretty_print {
        bytes.push(b'\n');
    }
    String::from_utf8(bytes).map_err(|e| ErmsError::Serialization(e.to_string()))
}

/// Serialize to bytes in `options.encoding`.
///
/// # Errors
/// Returns `Serialization` if the writer fails.
pub fn to_xml_bytes(tree: &ElementTree, root: NodeId, options: &SerializeOptions) -> Result<Vec<u8>> {
    let xml = to_xml_string(tree, root, options)?;
    Ok(options.encoding.encode(&xml))
}

/// Serialize and write to `path`, creating or truncating the file.
///
/// # Errors
/// `Serialization` if writing XML fails, `FileWrite` (carrying `path`) if
/// the file cannot be written.
pub fn save_to_file(
    tree: &ElementTree,
    root: NodeId,
    path: &Path,
    options: &SerializeOptions,
) -> Result<()> {
    let bytes = to_xml_bytes(tree, root, options)?;
    fs::write(path, bytes).map_err(|source| ErmsError::FileWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(
        path = %path.display(),
        encoding = %options.encoding,
        "Saved ERMS document"
    );
    Ok(())
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    tree: &ElementTree,
    id: NodeId,
    inherited: Option<&'static str>,
) -> Result<()> {
    let element = tree.element(id);
    let name = element.name().local_name();
    let namespace = element.name().namespace();

    let mut start = BytesStart::new(name);
    if namespace != inherited {
        start.push_attribute(("xmlns", namespace.unwrap_or("")));
    }
    for (prefix, uri) in element.namespace_prefixes() {
        start.push_attribute((format!("xmlns:{prefix}").as_str(), *uri));
    }
    for (key, value) in element.attributes() {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let text = element.text();
    if element.children().is_empty() && text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| ErmsError::Serialization(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| ErmsError::Serialization(e.to_string()))?;
    if let Some(text) = text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| ErmsError::Serialization(e.to_string()))?;
    }
    for child in element.children() {
        write_element(writer, tree, *child, namespace)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| ErmsError::Serialization(e.to_string()))
}
