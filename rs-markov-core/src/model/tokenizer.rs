/// Punctuation characters that stay attached to the letters of a token.
pub const PUNCTUATION: &[u8] = b"\"',;:-.?!_";

/// Returns `true` if `byte` can be part of a token.
///
/// Only basic ASCII is supported: `a-z`, `A-Z` and the characters of [`PUNCTUATION`].
/// Everything else, non-ASCII bytes included, is a separator.
#[inline]
pub fn is_token_byte(byte: u8) -> bool {
	byte.is_ascii_alphabetic() || PUNCTUATION.contains(&byte)
}

/// Reads the token starting at or after `cursor`.
///
/// Separator bytes are skipped first, then the maximal run of token bytes is taken.
/// Returns the token and the position right after it.
///
/// # Notes
/// - The token is empty only when end-of-text is reached.
/// - Token boundaries always fall on ASCII bytes, so slicing `text` is UTF-8 safe.
pub fn next_token(text: &str, cursor: usize) -> (&str, usize) {
	let bytes = text.as_bytes();
	let mut start = cursor.min(bytes.len());

	while start < bytes.len() && !is_token_byte(bytes[start]) {
		start += 1;
	}

	let mut end = start;
	while end < bytes.len() && is_token_byte(bytes[end]) {
		end += 1;
	}

	(&text[start..end], end)
}

/// Iterator over the tokens of a text.
///
/// Repeatedly calls [`next_token`] until an empty token is produced.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
	text: &'a str,
	cursor: usize,
}

impl<'a> Tokens<'a> {
	pub fn new(text: &'a str) -> Self {
		Self { text, cursor: 0 }
	}
}

impl<'a> Iterator for Tokens<'a> {
	type Item = &'a str;

	fn next(&mut self) -> Option<Self::Item> {
		let (token, cursor) = next_token(self.text, self.cursor);
		self.cursor = cursor;
		if token.is_empty() { None } else { Some(token) }
	}
}

/// Shortcut for `Tokens::new(text)`.
pub fn tokenize(text: &str) -> Tokens<'_> {
	Tokens::new(text)
}
