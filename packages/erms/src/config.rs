//! Configuration constants for ERMS document output.

/// ERMS default namespace.
pub const ERMS_NAMESPACE: &str = "https://DILCIS.eu/XML/ERMS";

/// XML Schema instance namespace, declared on the root as `xsi`.
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// Prefix bound to [`XSI_NAMESPACE`] on the root element.
pub const XSI_PREFIX: &str = "xsi";

/// Indentation width used when pretty printing.
pub const INDENT_WIDTH: usize = 2;

/// Default output encoding.
pub const OUTPUT_ENCODING: &str = "UTF-8";

/// Declaration label of the Latin-1 output encoding.
pub const LATIN1_ENCODING: &str = "ISO-8859-1";

/// XML version written in the declaration.
pub const XML_VERSION: &str = "1.0";

/// Text written into `protectedIdentity` for agents flagged as protected.
pub const PROTECTED_IDENTITY_TEXT: &str = "true";
