//! Small text helpers shared by the option types.

/// Derive a display label from a field name.
///
/// Underscores and dots become spaces and the first character is upper-cased:
/// `first_name` gives `First name`, `user.name` gives `User name`.
pub fn humanize(name: &str) -> String {
	let spaced = name.replace(['_', '.'], " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#039;"),
			other => escaped.push(other),
		}
	}
	escaped
}
