//! Lossless JSON value location
//!
//! Scans JSON text once and reports the byte span of the value stored at a
//! key path, so callers can splice a new value into the original text while
//! every other byte (whitespace, key order, unrelated members) stays as it was.

use std::ops::Range;

/// Syntax error while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanError {
    pub offset: usize,
    pub message: &'static str,
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.message, self.offset)
    }
}

impl std::error::Error for ScanError {}

/// Byte span of the value at `path` (object keys from the root)
///
/// When a key occurs more than once in the same object the last occurrence
/// is returned, matching how JSON parsers resolve duplicates.
pub fn find_value_span(text: &str, path: &[&str]) -> Result<Option<Range<usize>>, ScanError> {
    let mut scanner = Scanner {
        bytes: text.as_bytes(),
        src: text,
        pos: 0,
    };
    scanner.skip_ws();
    let found = scanner.value(path)?;
    scanner.skip_ws();
    if scanner.pos != scanner.bytes.len() {
        return Err(scanner.error("trailing characters"));
    }
    Ok(found)
}

/// Replace the byte spans in `text`; spans must not overlap
pub fn splice(text: &str, mut edits: Vec<(Range<usize>, String)>) -> String {
    edits.sort_by_key(|(range, _)| std::cmp::Reverse(range.start));
    let mut out = text.to_string();
    for (range, replacement) in edits {
        out.replace_range(range, &replacement);
    }
    out
}

struct Scanner<'a> {
    bytes: &'a [u8],
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn error(&self, message: &'static str) -> ScanError {
        ScanError {
            offset: self.pos,
            message,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.pos += 1;
        }
    }

    fn expect(&mut self, byte: u8, message: &'static str) -> Result<(), ScanError> {
        if self.peek() == Some(byte) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Scan one value; if `path` is empty the value itself is the target
    fn value(&mut self, path: &[&str]) -> Result<Option<Range<usize>>, ScanError> {
        let start = self.pos;
        let nested = match self.peek() {
            Some(b'{') => self.object(path)?,
            Some(b'[') => {
                self.array()?;
                None
            }
            Some(b'"') => {
                self.string()?;
                None
            }
            Some(b'-' | b'0'..=b'9') => {
                self.number()?;
                None
            }
            Some(b't') => {
                self.literal("true")?;
                None
            }
            Some(b'f') => {
                self.literal("false")?;
                None
            }
            Some(b'n') => {
                self.literal("null")?;
                None
            }
            _ => return Err(self.error("expected a value")),
        };

        if path.is_empty() {
            Ok(Some(start..self.pos))
        } else {
            Ok(nested)
        }
    }

    fn object(&mut self, path: &[&str]) -> Result<Option<Range<usize>>, ScanError> {
        self.expect(b'{', "expected '{'")?;
        let mut found = None;
        self.skip_ws();
        if self.peek() == Some(b'}') {
            self.pos += 1;
            return Ok(None);
        }

        loop {
            self.skip_ws();
            let key = self.string()?;
            self.skip_ws();
            self.expect(b':', "expected ':'")?;
            self.skip_ws();

            let matches = path.first().is_some_and(|wanted| key == *wanted);
            if matches {
                if let Some(span) = self.value(&path[1..])? {
                    found = Some(span);
                }
            } else {
                self.value(&[])?;
            }

            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(found);
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn array(&mut self) -> Result<(), ScanError> {
        self.expect(b'[', "expected '['")?;
        self.skip_ws();
        if self.peek() == Some(b']') {
            self.pos += 1;
            return Ok(());
        }

        loop {
            self.skip_ws();
            self.value(&[])?;
            self.skip_ws();
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b']') => {
                    self.pos += 1;
                    return Ok(());
                }
                _ => return Err(self.error("expected ',' or ']'")),
            }
        }
    }

    /// Scan a string and return its decoded contents
    fn string(&mut self) -> Result<String, ScanError> {
        let start = self.pos;
        self.expect(b'"', "expected a string")?;
        let mut escaped = false;
        loop {
            match self.peek() {
                None => return Err(self.error("unterminated string")),
                Some(b'\\') => {
                    escaped = true;
                    self.pos += 2;
                }
                Some(b'"') => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }

        let raw = &self.src[start..self.pos];
        if !escaped {
            return Ok(raw[1..raw.len() - 1].to_string());
        }
        serde_json::from_str(raw).map_err(|_| ScanError {
            offset: start,
            message: "invalid string escape",
        })
    }

    fn number(&mut self) -> Result<(), ScanError> {
        let start = self.pos;
        while let Some(b'-' | b'+' | b'.' | b'e' | b'E' | b'0'..=b'9') = self.peek() {
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.error("expected a number"));
        }
        Ok(())
    }

    fn literal(&mut self, word: &'static str) -> Result<(), ScanError> {
        if self.src[self.pos..].starts_with(word) {
            self.pos += word.len();
            Ok(())
        } else {
            Err(self.error("invalid literal"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{
  "name": "demo",
  "scripts": { "build": "tsc", "dependencies": "not-a-group" },
  "dependencies": {
    "lodash": "^4.17.0",
    "react": "~18.2.0"
  },
  "devDependencies": {
    "lodash": "^4.0.0"
  },
  "files": ["dist", {"lodash": "1.0.0"}]
}"#;

    fn value_at<'a>(text: &'a str, path: &[&str]) -> Option<&'a str> {
        find_value_span(text, path).unwrap().map(|r| &text[r])
    }

    #[test]
    fn test_nested_value() {
        assert_eq!(value_at(MANIFEST, &["dependencies", "lodash"]), Some(r#""^4.17.0""#));
        assert_eq!(value_at(MANIFEST, &["devDependencies", "lodash"]), Some(r#""^4.0.0""#));
        assert_eq!(value_at(MANIFEST, &["dependencies", "react"]), Some(r#""~18.2.0""#));
    }

    #[test]
    fn test_only_matches_exact_path() {
        // "dependencies" inside scripts is a string, not the group
        assert_eq!(value_at(MANIFEST, &["scripts", "dependencies"]), Some(r#""not-a-group""#));
        assert_eq!(value_at(MANIFEST, &["peerDependencies", "lodash"]), None);
        assert_eq!(value_at(MANIFEST, &["dependencies", "lodash.merge"]), None);
    }

    #[test]
    fn test_whole_object_span() {
        let span = value_at(MANIFEST, &["devDependencies"]).unwrap();
        assert!(span.starts_with('{'));
        assert!(span.ends_with('}'));
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let text = r#"{"dependencies": {"a": "1.0.0", "a": "2.0.0"}}"#;
        assert_eq!(value_at(text, &["dependencies", "a"]), Some(r#""2.0.0""#));
    }

    #[test]
    fn test_escaped_keys() {
        let text = r#"{"dependencies": {"@scope\/pkg": "1.0.0", "q\"uote": "2.0.0"}}"#;
        assert_eq!(value_at(text, &["dependencies", "@scope/pkg"]), Some(r#""1.0.0""#));
        assert_eq!(value_at(text, &["dependencies", "q\"uote"]), Some(r#""2.0.0""#));
    }

    #[test]
    fn test_non_string_values_are_skipped() {
        let text = r#"{"a": [1, -2.5e3, true, false, null, {"b": {}}], "dependencies": {"x": "1.0.0"}}"#;
        assert_eq!(value_at(text, &["dependencies", "x"]), Some(r#""1.0.0""#));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(find_value_span(r#"{"a": }"#, &["a"]).is_err());
        assert!(find_value_span(r#"{"a": "1"#, &["a"]).is_err());
        assert!(find_value_span(r#"{"a": 1} x"#, &["a"]).is_err());
        assert!(find_value_span(r#"{"a" 1}"#, &["a"]).is_err());
    }

    #[test]
    fn test_splice_multiple_edits() {
        let text = r#"{"a": "1", "b": "2"}"#;
        let a = find_value_span(text, &["a"]).unwrap().unwrap();
        let b = find_value_span(text, &["b"]).unwrap().unwrap();
        let out = splice(text, vec![(a, "\"10\"".to_string()), (b, "\"20\"".to_string())]);
        assert_eq!(out, r#"{"a": "10", "b": "20"}"#);
    }
}
