//! Turns descriptor text into tokens.
//!
//! The scanner makes one left-to-right pass and never gives up early: every
//! malformed construct is reported to the [`ErrorTracker`] once and scanning
//! resumes right after it, so a single pass surfaces as many problems as
//! possible. The token list always ends with an `Eot` token carrying the last
//! line number.
//!
//! Operators are matched longest first (`!==` before `!=` before `!`), and we
//! can’t detect a keyword until we’ve reached the end of what might instead be
//! an identifier, this is `maximal munch`.
mod token;

use std::{iter::Peekable, str::CharIndices};

use TokenType::*;
pub use token::*;

use crate::error::{CompileError, ErrorTracker, scanner::ScanErrorType};

/// Scan `source` into tokens, reporting lexical errors to `errors`.
pub fn scan(source: &str, errors: &mut ErrorTracker) -> Vec<Token> { Scanner::new(source).scan_tokens(errors) }

/// A scanner for descriptor source text
pub struct Scanner<'a> {
	/// User input source code
	source:      &'a str,
	/// User input source code iterator
	source_iter: Peekable<CharIndices<'a>>,
	/// Points at the beginning of the current lexeme
	start:       usize,
	/// Points just past the character currently being considered
	cursor:      usize,
	/// Tracks what source line `cursor` is on so we can produce tokens that
	/// know their location.
	line:        usize,
}

impl<'a> Scanner<'a> {
	pub fn new(source: &'a str) -> Self {
		let source_iter = source.char_indices().peekable();

		Self { source, source_iter, start: 0, cursor: 0, line: 1 }
	}

	/// Scan all tokens from the source code
	pub fn scan_tokens(mut self, errors: &mut ErrorTracker) -> Vec<Token> {
		let mut tokens = Vec::new();
		while let Some(&(index, _)) = self.source_iter.peek() {
			// We are at the beginning of the next lexeme.
			self.start = index;
			self.cursor = self.start;
			self.scan_token(&mut tokens, errors);
		}
		tokens.push(Token::new(Eot, "", self.line));
		tracing::trace!(count = tokens.len(), lines = self.line, "scanned tokens");
		tokens
	}

	/// Scan a single token from the source code
	fn scan_token(&mut self, tokens: &mut Vec<Token>, errors: &mut ErrorTracker) {
		let Some(next_char) = self.advance() else { return };
		let line = self.line;
		#[rustfmt::skip]
		let r#type = match next_char {
			':' => Colon,
			',' => Comma,
			'.' => Dot,
			'{' => LeftBrace,
			'}' => RightBrace,
			'[' => LeftBracket,
			']' => RightBracket,
			'(' => LeftParen,
			')' => RightParen,
			'-' => Minus,
			'%' => Percent,
			'+' => Plus,
			'/' => Slash,
			'*' => Star,
			';' => NewLine,
			'!' => if self.match_next('=') {
				if self.match_next('=') { BangEqualEqual } else { BangEqual }
			} else { Bang },
			'=' => if self.match_next('=') {
				if self.match_next('=') { EqualEqualEqual } else { EqualEqual }
			} else { Equal },
			'<' => if self.match_next('=') { LessEqual } else { Less },
			'>' => if self.match_next('=') { GreaterEqual } else { Greater },
			' ' | '\r' | '\t' => return,
			'\n' => { self.line += 1; NewLine }
			'"' | '\'' => self.string(next_char, errors),
			c if c.is_ascii_digit() => self.number(errors),
			c if c.is_ascii_alphabetic() || c == '_' => self.identifier(),
			c => {
				errors.capture_compile_error(CompileError::new(line, ScanErrorType::UnknownToken(c), c.to_string()));
				return;
			}
		};

		let lexeme = &self.source[self.start..self.cursor];
		tokens.push(Token::new(r#type, lexeme, line));
	}

	/// Match the next character if it is the expected one
	fn match_next(&mut self, expected: char) -> bool {
		matches!(self.peek(), Some(c) if c == expected && { self.advance(); true })
	}

	/// Advance to the next character
	fn advance(&mut self) -> Option<char> {
		let (i, c) = self.source_iter.next()?;
		self.cursor = i + c.len_utf8();
		Some(c)
	}

	/// Peek the current character
	fn peek(&mut self) -> Option<char> { self.source_iter.peek().map(|&(_, c)| c) }

	/// Peek the second character ahead
	fn peek_second(&mut self) -> Option<char> {
		let mut it = self.source_iter.clone();
		it.next()?;
		it.peek().map(|&(_, c)| c)
	}

	/// Advance while `predicate` holds for the next character
	fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
		while self.peek().is_some_and(&predicate) {
			self.advance();
		}
	}

	/// Scan a string literal delimited by `quote`. An unterminated string is
	/// still turned into a token holding everything after the opening quote.
	fn string(&mut self, quote: char, errors: &mut ErrorTracker) -> TokenType {
		let start_line = self.line;
		while let Some(c) = self.peek() {
			if c == quote {
				break;
			}
			if c == '\n' {
				self.line += 1
			}
			self.advance();
		}

		if self.advance().is_none() {
			let text = &self.source[self.start..self.cursor];
			errors.capture_compile_error(CompileError::new(start_line, ScanErrorType::UnterminatedString, text));
			return StringLiteral(self.source[self.start + 1..self.cursor].to_string());
		}

		// Both quotes are one byte wide.
		StringLiteral(self.source[self.start + 1..self.cursor - 1].to_string())
	}

	/// Scan a number literal
	fn number(&mut self, errors: &mut ErrorTracker) -> TokenType {
		self.advance_while(|c| c.is_ascii_digit());

		let mut fractional = false;
		if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
			fractional = true;
			self.advance(); // consume '.'
			self.advance_while(|c| c.is_ascii_digit());
		}

		let value = self.source[self.start..self.cursor].parse().unwrap_or(f64::NAN);

		let malformed = if fractional && self.peek() == Some('.') {
			self.advance_while(|c| c == '.' || c.is_ascii_digit());
			Some(ScanErrorType::ExtraDecimalPoint)
		} else if self.peek().is_some_and(|c| c.is_ascii_alphabetic() || c == '_') {
			self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
			Some(ScanErrorType::AlphaAfterNumber)
		} else {
			None
		};
		if let Some(kind) = malformed {
			errors.capture_compile_error(CompileError::new(self.line, kind, &self.source[self.start..self.cursor]));
		}

		NumberLiteral(value)
	}

	/// Scan an identifier or keyword
	fn identifier(&mut self) -> TokenType {
		self.advance_while(|c| c.is_ascii_alphanumeric() || c == '_');
		TokenType::keyword_or_identifier(&self.source[self.start..self.cursor])
	}
}
