/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! Splits declaration text into tokens.
//!
//! Whitespace separates tokens, the characters `{}(),` are always tokens of their own,
//! double quoted strings are one token without their quotes, and both `//` and `/* */`
//! comments are skipped.

use crate::error::{ParseError, Result};

const DELIMITERS: &[u8] = b" \t\n\x0b\r";
const KEPT_DELIMITERS: &[u8] = b"{}(),";

/// A token along with the byte range it was read from.
#[derive(Debug, Clone)]
struct Scanned {
    token: String,
    start: usize,
    end: usize,
}

/// Tokeniser over a borrowed string. Keeps byte positions so callers can recover raw blocks.
#[derive(Debug, Clone)]
pub struct DefTokeniser<'a> {
    src: &'a str,
    pos: usize,
    last_start: usize,
    peeked: Option<Scanned>,
}

impl<'a> DefTokeniser<'a> {
    pub fn new(src: &'a str) -> DefTokeniser<'a> {
        DefTokeniser {
            src,
            pos: 0,
            last_start: 0,
            peeked: None,
        }
    }

    /// The text being tokenised.
    pub fn source(&self) -> &'a str {
        self.src
    }

    /// Byte offset just past the last consumed token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Byte offset where the last consumed token started.
    pub fn last_start(&self) -> usize {
        self.last_start
    }

    /// Look at the next token without consuming it.
    pub fn peek(&mut self) -> Option<&str> {
        if self.peeked.is_none() {
            self.peeked = Self::scan(self, self.pos);
        }

        self.peeked.as_ref().map(|s| s.token.as_str())
    }

    pub fn has_more(&mut self) -> bool {
        self.peek().is_some()
    }

    /// Consume the next token, failing at the end of input.
    pub fn next_token(&mut self) -> Result<String> {
        let scanned = match self.peeked.take() {
            Some(s) => s,
            None => Self::scan(self, self.pos).ok_or(ParseError::UnexpectedEof)?,
        };

        self.last_start = scanned.start;
        self.pos = scanned.end;
        Ok(scanned.token)
    }

    /// Consume the next token, which must equal `expected` ignoring case.
    pub fn assert_next(&mut self, expected: &str) -> Result<()> {
        let found = self.next_token()?;
        if found.eq_ignore_ascii_case(expected) {
            Ok(())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found,
            })
        }
    }

    /// Consume the next token as a float.
    pub fn next_float(&mut self) -> Result<f32> {
        let token = self.next_token()?;
        token
            .parse::<f32>()
            .map_err(|_| ParseError::InvalidNumber(token))
    }

    /// Consume the next token as an integer.
    pub fn next_int(&mut self) -> Result<i32> {
        let token = self.next_token()?;
        token
            .parse::<i32>()
            .map_err(|_| ParseError::InvalidNumber(token))
    }

    /// Consume `n` tokens.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.next_token()?;
        }
        Ok(())
    }

    fn scan(&self, from: usize) -> Option<Scanned> {
        let bytes = self.src.as_bytes();
        let len = bytes.len();
        let mut i = from;

        // Skip whitespace and comments
        loop {
            while i < len && DELIMITERS.contains(&bytes[i]) {
                i += 1;
            }
            if i >= len {
                return None;
            }

            if bytes[i] == b'/' && i + 1 < len {
                if bytes[i + 1] == b'/' {
                    while i < len && bytes[i] != b'\n' {
                        i += 1;
                    }
                    continue;
                } else if bytes[i + 1] == b'*' {
                    i += 2;
                    while i < len && !(bytes[i] == b'*' && i + 1 < len && bytes[i + 1] == b'/') {
                        i += 1;
                    }
                    i = (i + 2).min(len);
                    continue;
                }
            }

            break;
        }

        let start = i;
        let first = bytes[i];

        if KEPT_DELIMITERS.contains(&first) {
            return Some(Scanned {
                token: (first as char).to_string(),
                start,
                end: i + 1,
            });
        }

        if first == b'"' {
            let mut j = i + 1;
            while j < len && bytes[j] != b'"' {
                j += 1;
            }

            return Some(Scanned {
                token: self.src[i + 1..j].to_string(),
                start,
                end: (j + 1).min(len),
            });
        }

        let mut j = i;
        while j < len {
            let b = bytes[j];
            if DELIMITERS.contains(&b) || KEPT_DELIMITERS.contains(&b) || b == b'"' {
                break;
            }
            if b == b'/' && j + 1 < len && (bytes[j + 1] == b'/' || bytes[j + 1] == b'*') {
                break;
            }
            j += 1;
        }

        Some(Scanned {
            token: self.src[start..j].to_string(),
            start,
            end: j,
        })
    }
}

impl Iterator for DefTokeniser<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.next_token().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(src: &str) -> Vec<String> {
        DefTokeniser::new(src).collect()
    }

    #[test]
    fn splits_on_kept_delimiters() {
        assert_eq!(
            tokens("decl/test{diffusemap textures/foo}"),
            vec!["decl/test", "{", "diffusemap", "textures/foo", "}"]
        );
        assert_eq!(
            tokens("add(a,b)"),
            vec!["add", "(", "a", ",", "b", ")"]
        );
    }

    #[test]
    fn skips_comments() {
        let src = "// a line comment\nfoo /* block\n comment */ bar// trailing\nbaz";
        assert_eq!(tokens(src), vec!["foo", "bar", "baz"]);
    }

    #[test]
    fn quoted_strings_are_one_token() {
        assert_eq!(
            tokens("description \"A { quoted } string\" next"),
            vec!["description", "A { quoted } string", "next"]
        );
    }

    #[test]
    fn peek_does_not_consume() {
        let mut tok = DefTokeniser::new("one two");
        assert_eq!(tok.peek(), Some("one"));
        assert_eq!(tok.next_token().unwrap(), "one");
        assert_eq!(tok.peek(), Some("two"));
        assert_eq!(tok.next_token().unwrap(), "two");
        assert!(!tok.has_more());
        assert_eq!(tok.next_token(), Err(ParseError::UnexpectedEof));
    }

    #[test]
    fn positions_track_raw_text() {
        let src = "name { body text }";
        let mut tok = DefTokeniser::new(src);
        DefTokeniser::skip(&mut tok, 2).unwrap();
        let start = tok.position();
        DefTokeniser::skip(&mut tok, 2).unwrap();
        tok.assert_next("}").unwrap();

        assert_eq!(src[start..tok.last_start()].trim(), "body text");
    }

    #[test]
    fn assert_next_reports_mismatch() {
        let mut tok = DefTokeniser::new("( 1");
        assert!(tok.assert_next("(").is_ok());
        assert_eq!(
            tok.assert_next(")"),
            Err(ParseError::UnexpectedToken {
                expected: ")".to_string(),
                found: "1".to_string()
            })
        );
    }
}
