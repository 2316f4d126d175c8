/// Indentation unit of emitted text
pub const INDENT: &str = "  ";

/// Indents every non-empty line of `text` by one level
pub fn indent(text: &str) -> String {
	text.split('\n')
		.map(|line| match line.is_empty() {
			true => String::new(),
			false => format!("{}{}", INDENT, line),
		})
		.collect::<Vec<_>>()
		.join("\n")
}
