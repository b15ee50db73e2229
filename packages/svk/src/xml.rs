//! Helpers for reading serialized ERMS documents with roxmltree.
//!
//! Lookups match ERMS-namespace elements only, so SVK extension elements
//! with the same local name (such as `objectId` inside `relatedObject`)
//! are never picked up by mistake.

use std::fs;
use std::io;
use std::path::Path;

use erms_create::config::{ERMS_NAMESPACE, LATIN1_ENCODING};
use roxmltree::Node;

/// Get the tag name without namespace.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use erms_svk::xml::get_tag_name;
///
/// let xml = r#"<erms xmlns="https://DILCIS.eu/XML/ERMS"><control/></erms>"#;
/// let doc = Document::parse(xml).unwrap();
/// let control = doc.root_element().first_element_child().unwrap();
/// assert_eq!(get_tag_name(control), "control");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Check whether a node is the ERMS element `tag`.
pub fn is_erms(node: Node<'_, '_>, tag: &str) -> bool {
    node.is_element()
        && node.tag_name().namespace() == Some(ERMS_NAMESPACE)
        && get_tag_name(node) == tag
}

/// Find the first ERMS child element with the given tag name.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use erms_svk::xml::find_child;
///
/// let xml = r#"<erms xmlns="https://DILCIS.eu/XML/ERMS"><control/><aggregations/></erms>"#;
/// let doc = Document::parse(xml).unwrap();
/// let root = doc.root_element();
///
/// assert!(find_child(root, "aggregations").is_some());
/// assert!(find_child(root, "records").is_none());
/// ```
pub fn find_child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|child| is_erms(*child, tag))
}

/// Find all ERMS child elements with the given tag name.
pub fn find_children<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(move |child| is_erms(*child, tag))
}

/// Find all ERMS descendant elements with the given tag name, excluding
/// `node` itself.
pub fn find_descendants<'a, 'input>(
    node: Node<'a, 'input>,
    tag: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.descendants()
        .skip(1)
        .filter(move |child| is_erms(*child, tag))
}

/// Find a descendant element matching a path of tag names.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use erms_svk::xml::find_by_path;
///
/// let xml = r#"<control xmlns="https://DILCIS.eu/XML/ERMS">
///     <classificationSchema><textualDescriptionOfClassificationSchema>
///         <p>KlaSL2016_1.0</p>
///     </textualDescriptionOfClassificationSchema></classificationSchema>
/// </control>"#;
/// let doc = Document::parse(xml).unwrap();
///
/// let p = find_by_path(
///     doc.root_element(),
///     "classificationSchema/textualDescriptionOfClassificationSchema/p",
/// );
/// assert_eq!(p.and_then(|p| p.text()), Some("KlaSL2016_1.0"));
/// ```
pub fn find_by_path<'a, 'input>(node: Node<'a, 'input>, path: &str) -> Option<Node<'a, 'input>> {
    path.split('/')
        .try_fold(node, |current, part| find_child(current, part))
}

/// Get the text content of a node, trimmed.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed text of the first ERMS child `tag`, if present and non-empty.
pub fn child_text(node: Node<'_, '_>, tag: &str) -> Option<String> {
    find_child(node, tag)
        .map(get_text)
        .filter(|text| !text.is_empty())
}

/// Get an attribute value from a node.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Values of `attribute` on the entries of container `container/entry`.
///
/// Used for `dates/date@dateType` and `agents/agent@agentType`.
pub fn entry_attributes<'a>(
    node: Node<'a, '_>,
    container: &str,
    entry: &'a str,
    attribute: &str,
) -> Vec<&'a str> {
    find_child(node, container)
        .map(|found| {
            find_children(found, entry)
                .filter_map(|child| get_attribute(child, attribute))
                .collect()
        })
        .unwrap_or_default()
}

/// Read an XML file as text.
///
/// UTF-8 is read as is. Other bytes are accepted only when the declaration
/// names ISO-8859-1, and are then decoded byte by byte.
///
/// # Errors
/// `io::Error` if the file cannot be read, or `InvalidData` for non-UTF-8
/// content without a Latin-1 declaration.
pub fn read_xml_file(path: impl AsRef<Path>) -> io::Result<String> {
    let bytes = fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            let bytes = e.into_bytes();
            if declares_latin1(&bytes) {
                Ok(bytes.iter().map(|b| char::from(*b)).collect())
            } else {
                Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "file is neither UTF-8 nor declared as ISO-8859-1",
                ))
            }
        }
    }
}

fn declares_latin1(bytes: &[u8]) -> bool {
    if !bytes.starts_with(b"<?xml") {
        return false;
    }
    let end = bytes.iter().position(|b| *b == b'>').unwrap_or(bytes.len());
    let declaration = String::from_utf8_lossy(&bytes[..end]).to_ascii_uppercase();
    declaration.contains(&format!("ENCODING=\"{LATIN1_ENCODING}\""))
        || declaration.contains(&format!("ENCODING='{LATIN1_ENCODING}'"))
}
