use lazy_static::lazy_static;
use regex::{bytes, Regex};

lazy_static! {
	static ref VALID_ID_REGEX: Regex = Regex::new(r"^[a-zA-Z_][0-9a-zA-Z_]*$").unwrap();
	static ref INVALID_ID_BYTE_REGEX: bytes::Regex = bytes::Regex::new(r"(?-u)[^0-9a-zA-Z]").unwrap();
}

/// Checks if `name` is a simple Verilog identifier
pub fn is_identifier_valid(name: &str) -> bool {
	VALID_ID_REGEX.is_match(name)
}

/// Turns an arbitrary string into a valid identifier.
/// A leading digit gets an underscore prefix and every byte that is not
/// an ASCII letter or digit is replaced with an underscore, so a multi-byte
/// UTF-8 character turns into one underscore per byte.
pub fn sanitize_identifier(name: &str) -> String {
	if name.is_empty() {
		return "_".into();
	}

	let prefixed = match name.starts_with(|c: char| c.is_ascii_digit()) {
		true => format!("_{}", name),
		false => name.to_string(),
	};
	let sanitized = INVALID_ID_BYTE_REGEX.replace_all(prefixed.as_bytes(), &b"_"[..]);
	String::from_utf8_lossy(&sanitized).into_owned()
}
