//! Attribute codec
//!
//! Deterministic, side-effect-free conversion between domain values and the
//! wire attribute values the directory expects.
//!
//! Active Directory requires credential values to be set via the
//! `unicodePwd` attribute using a specific encoding:
//! 1. Surround the password with double quotes: `"password"`
//! 2. Encode the quoted string as UTF-16LE bytes, no byte-order mark
//!
//! Omitting the quotes or using a different encoding makes the directory
//! reject the value with a constraint violation.

use adkit_directory::{AttributeValue, DirectoryError, DirectoryResult};

/// Encode a plaintext password for the `unicodePwd` attribute.
///
/// The password is surrounded with double quotes and then encoded as
/// UTF-16LE. Every Rust string is representable in UTF-16, so the only
/// rejected inputs are the ones the directory itself cannot carry: the empty
/// password and embedded NUL.
///
/// # Errors
/// Returns `EncodingError` for an empty password or one containing NUL.
pub fn encode_password(password: &str) -> DirectoryResult<Vec<u8>> {
    if password.is_empty() {
        return Err(DirectoryError::encoding("password cannot be empty"));
    }
    if password.contains('\0') {
        return Err(DirectoryError::encoding(
            "password cannot contain a NUL character",
        ));
    }

    // Surround with double quotes as required by AD
    let quoted = format!("\"{password}\"");

    // Encode as UTF-16LE
    let encoded: Vec<u8> = quoted.encode_utf16().flat_map(u16::to_le_bytes).collect();

    Ok(encoded)
}

/// Encode a service principal name as an attribute value.
///
/// Identity passthrough; request-level escaping is the session layer's
/// responsibility.
pub fn encode_spn(spn: &str) -> AttributeValue {
    AttributeValue::Text(spn.to_string())
}

/// Escape special characters in a DN attribute value per RFC 4514.
///
/// Used when composing `CN=<name>,<parent>` so a name like
/// `"admin,dc=evil,dc=com"` cannot relocate the entry.
pub fn escape_dn_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut result = String::with_capacity(value.len());
    for (i, c) in value.chars().enumerate() {
        match c {
            '"' | '+' | ',' | ';' | '<' | '>' | '\\' => {
                result.push('\\');
                result.push(c);
            }
            '#' if i == 0 => {
                result.push('\\');
                result.push(c);
            }
            ' ' if i == 0 || i == last => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
