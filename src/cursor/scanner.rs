//! Incremental JSON scanner for editor-cursor mapping.
//!
//! Deliberately not a parser: it keeps only the container stack needed to
//! locate a position structurally, tolerates in-progress invalid JSON, and
//! never fails. Brace and bracket characters inside string literals are
//! ignored by tracking string/escape state, and newlines are counted even
//! inside strings.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Object,
    Array,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub kind: FrameKind,
    /// Property key this container was opened under, if any.
    pub key: Option<String>,
    /// Element the scan is currently inside (arrays only), advanced on `,`.
    pub index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    ObjectOpen,
    ObjectClose,
    ArrayOpen,
    ArrayClose,
    /// A property key completed: a closed string followed by `:`.
    Key { name: String, line: usize },
}

#[derive(Debug)]
pub struct JsonScanner {
    stack: Vec<Frame>,
    line: usize,
    in_string: bool,
    escaped: bool,
    string_buf: String,
    string_line: usize,
    /// Closed string waiting to learn whether it is a key (next `:`) or a
    /// plain value (anything else).
    pending_string: Option<(String, usize)>,
    current_key: Option<String>,
}

impl JsonScanner {
    pub fn new() -> Self {
        Self {
            stack: Vec::new(),
            line: 1,
            in_string: false,
            escaped: false,
            string_buf: String::new(),
            string_line: 1,
            pending_string: None,
            current_key: None,
        }
    }

    /// Current 1-based line number.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    /// Feed one character; returns a structural event if this character
    /// completed one.
    pub fn advance(&mut self, ch: char) -> Option<ScanEvent> {
        if ch == '\n' {
            self.line += 1;
        }

        if self.in_string {
            if self.escaped {
                self.escaped = false;
            } else {
                match ch {
                    '\\' => self.escaped = true,
                    '"' => {
                        self.in_string = false;
                        self.pending_string =
                            Some((std::mem::take(&mut self.string_buf), self.string_line));
                    }
                    _ => self.string_buf.push(ch),
                }
            }
            return None;
        }

        match ch {
            '"' => {
                self.in_string = true;
                self.string_buf.clear();
                self.string_line = self.line;
                self.pending_string = None;
                None
            }
            ':' => {
                if let Some((name, line)) = self.pending_string.take() {
                    self.current_key = Some(name.clone());
                    return Some(ScanEvent::Key { name, line });
                }
                None
            }
            '{' => {
                self.pending_string = None;
                let key = self.current_key.take();
                self.stack.push(Frame {
                    kind: FrameKind::Object,
                    key,
                    index: 0,
                });
                Some(ScanEvent::ObjectOpen)
            }
            '}' => {
                self.pending_string = None;
                self.pop_through(FrameKind::Object);
                Some(ScanEvent::ObjectClose)
            }
            '[' => {
                self.pending_string = None;
                let key = self.current_key.take();
                self.stack.push(Frame {
                    kind: FrameKind::Array,
                    key,
                    index: 0,
                });
                Some(ScanEvent::ArrayOpen)
            }
            ']' => {
                self.pending_string = None;
                self.pop_through(FrameKind::Array);
                Some(ScanEvent::ArrayClose)
            }
            ',' => {
                self.pending_string = None;
                if let Some(frame) = self.stack.last_mut() {
                    if frame.kind == FrameKind::Array {
                        frame.index += 1;
                    }
                }
                None
            }
            c if c.is_whitespace() => None,
            _ => {
                // Literal values (numbers, true/false/null) discard any
                // string still waiting to become a key.
                self.pending_string = None;
                None
            }
        }
    }

    /// Pop frames down through and including the nearest frame of `kind`.
    /// Unbalanced input may empty the stack; that is fine, the scan is
    /// best-effort by contract.
    fn pop_through(&mut self, kind: FrameKind) {
        while let Some(frame) = self.stack.pop() {
            if frame.kind == kind {
                break;
            }
        }
    }
}

impl Default for JsonScanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(text: &str) -> JsonScanner {
        let mut scanner = JsonScanner::new();
        for ch in text.chars() {
            scanner.advance(ch);
        }
        scanner
    }

    #[test]
    fn test_tracks_object_nesting() {
        let scanner = scan(r#"{"a":{"b":"#);
        assert_eq!(scanner.stack().len(), 2);
        assert_eq!(scanner.stack()[1].key.as_deref(), Some("a"));
    }

    #[test]
    fn test_array_index_advances_on_comma() {
        let scanner = scan(r#"{"items":[1,2,"#);
        let frame = scanner.stack().last().unwrap();
        assert_eq!(frame.kind, FrameKind::Array);
        assert_eq!(frame.key.as_deref(), Some("items"));
        assert_eq!(frame.index, 2);
    }

    #[test]
    fn test_braces_inside_strings_are_ignored() {
        let scanner = scan(r#"{"label":"a } b { c","x":"#);
        assert_eq!(scanner.stack().len(), 1);
        assert_eq!(scanner.stack()[0].kind, FrameKind::Object);
    }

    #[test]
    fn test_escaped_quote_does_not_close_string() {
        let scanner = scan(r#"{"label":"say \"hi\" {","#);
        // The brace sits inside the (closed) string literal.
        assert_eq!(scanner.stack().len(), 1);
    }

    #[test]
    fn test_value_string_is_not_a_key() {
        let mut scanner = JsonScanner::new();
        let mut keys = Vec::new();
        for ch in r#"{"a":"b","c":1}"#.chars() {
            if let Some(ScanEvent::Key { name, .. }) = scanner.advance(ch) {
                keys.push(name);
            }
        }
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_newlines_in_strings_count_lines() {
        let scanner = scan("{\"a\":\"line\nbreak\",\n\"b\":1");
        assert_eq!(scanner.line(), 3);
    }

    #[test]
    fn test_unbalanced_close_does_not_panic() {
        let scanner = scan("}}]]");
        assert!(scanner.stack().is_empty());
    }

    #[test]
    fn test_pop_through_skips_unclosed_arrays() {
        // Malformed: the array never closes, the object brace pops past it.
        let scanner = scan(r#"{"a":[1,2}"#);
        assert!(scanner.stack().is_empty());
    }
}
