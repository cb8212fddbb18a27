//! Rewrites English operator phrases into the symbols and keywords the scanner
//! understands, so `person.age greater than 20` reads as `person.age > 20`.

/// Phrases and their replacements. Longer phrases come before the phrases
/// they contain.
const PHRASES: &[(&str, &str)] = &[
	("greater than or equal to", ">="),
	("less than or equal to", "<="),
	("not equal to", "!=="),
	("equal to", "==="),
	("greater than", ">"),
	("less than", "<"),
	("the string", "toString"),
	("the boolean", "toBool"),
	("plus", "+"),
	("minus", "-"),
	("multiply", "*"),
	("divide", "/"),
	("||", "or"),
	("&&", "and"),
];

/// Replace every operator phrase of `source`.
///
/// Matching ignores ASCII case. Word phrases only match whole words, words
/// may be separated by any run of spaces or tabs, and quoted string literals
/// are copied untouched.
pub fn normalize(source: &str) -> String {
	let mut normalized = String::with_capacity(source.len());
	let mut rest = source;
	let mut previous = None;

	while let Some(c) = rest.chars().next() {
		if c == '"' || c == '\'' {
			let end = rest[1..].find(c).map_or(rest.len(), |end| end + 2);
			normalized.push_str(&rest[..end]);
			previous = Some(c);
			rest = &rest[end..];
			continue;
		}

		if let Some((length, replacement)) = match_phrase(rest, previous) {
			let is_keyword = replacement.starts_with(|c: char| c.is_ascii_alphabetic());
			if is_keyword && previous.is_some_and(is_word) {
				normalized.push(' ');
			}
			normalized.push_str(replacement);
			rest = &rest[length..];
			if is_keyword && rest.starts_with(is_word) {
				normalized.push(' ');
			}
			previous = replacement.chars().last();
			continue;
		}

		normalized.push(c);
		previous = Some(c);
		rest = &rest[c.len_utf8()..];
	}

	if normalized != source {
		tracing::trace!(%source, %normalized, "normalized descriptor");
	}
	normalized
}

fn is_word(c: char) -> bool { c.is_alphanumeric() || c == '_' }

fn match_phrase(rest: &str, previous: Option<char>) -> Option<(usize, &'static str)> {
	PHRASES.iter().find_map(|(phrase, replacement)| phrase_length(rest, phrase, previous).map(|length| (length, *replacement)))
}

/// Length in bytes of `phrase` at the start of `rest`.
fn phrase_length(rest: &str, phrase: &str, previous: Option<char>) -> Option<usize> {
	let is_words = phrase.starts_with(|c: char| c.is_ascii_alphabetic());
	// `person.plus` is a property, `surplus` an identifier.
	if is_words && previous.is_some_and(|c| is_word(c) || c == '.') {
		return None;
	}

	let mut length = 0;
	for (index, word) in phrase.split(' ').enumerate() {
		if index > 0 {
			let gap = rest[length..].len() - rest[length..].trim_start_matches([' ', '\t']).len();
			if gap == 0 {
				return None;
			}
			length += gap;
		}
		let candidate = rest.get(length..length + word.len())?;
		if !candidate.eq_ignore_ascii_case(word) {
			return None;
		}
		length += word.len();
	}

	if is_words && rest[length..].starts_with(is_word) {
		return None;
	}
	Some(length)
}
