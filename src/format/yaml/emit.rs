// Thu Feb 5 2026 - Alex

//! Line-oriented YAML writer for text stubs. Keys are padded so values
//! line up, flow sequences wrap under their first element.

use std::fmt::Write;

const KEY_COLUMN: usize = 17;
const WRAP_COLUMN: usize = 85;

pub(crate) struct YamlEmitter {
    out: String,
    /// Prefix for the next key line; `- ` for the first key of a list item.
    pending: Option<String>,
}

impl YamlEmitter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            pending: None,
        }
    }

    pub fn begin_document(&mut self, tag: Option<&str>) {
        match tag {
            Some(tag) => {
                let _ = writeln!(self.out, "--- {}", tag);
            }
            None => self.out.push_str("---\n"),
        }
    }

    pub fn end_document(&mut self) {
        self.out.push_str("...\n");
    }

    /// Starts a list item; the next key written at `indent` opens it.
    pub fn begin_item(&mut self, indent: usize) {
        self.pending = Some(format!("{}- ", " ".repeat(indent)));
    }

    fn lead(&mut self, indent: usize) -> String {
        self.pending.take().unwrap_or_else(|| " ".repeat(indent))
    }

    fn key(&mut self, indent: usize, key: &str) -> usize {
        let lead = self.lead(indent);
        let pad = KEY_COLUMN.saturating_sub(key.len() + 1).max(1);
        let _ = write!(self.out, "{}{}:{}", lead, key, " ".repeat(pad));
        lead.len() + key.len() + 1 + pad
    }

    pub fn scalar(&mut self, indent: usize, key: &str, value: &str) {
        self.key(indent, key);
        self.out.push_str(&quote(value));
        self.out.push('\n');
    }

    /// Integers and other values written exactly as given.
    pub fn number(&mut self, indent: usize, key: &str, value: impl std::fmt::Display) {
        self.key(indent, key);
        let _ = writeln!(self.out, "{}", value);
    }

    /// A key whose value is a block sequence of mappings on the lines below.
    pub fn block(&mut self, indent: usize, key: &str) {
        let lead = self.lead(indent);
        let _ = writeln!(self.out, "{}{}:", lead, key);
    }

    pub fn flow_seq<S: AsRef<str>>(&mut self, indent: usize, key: &str, items: &[S]) {
        let start = self.key(indent, key);
        self.out.push_str("[ ");
        let first_column = start + 2;
        let mut column = first_column;
        for (i, item) in items.iter().enumerate() {
            let item = quote(item.as_ref());
            if i > 0 {
                if column + 2 + item.len() > WRAP_COLUMN {
                    self.out.push_str(",\n");
                    self.out.push_str(&" ".repeat(first_column));
                    column = first_column;
                } else {
                    self.out.push_str(", ");
                    column += 2;
                }
            }
            self.out.push_str(&item);
            column += item.len();
        }
        self.out.push_str(" ]\n");
    }

    /// Writes `items` only when there are any.
    pub fn optional_seq<S: AsRef<str>>(&mut self, indent: usize, key: &str, items: &[S]) {
        if !items.is_empty() {
            self.flow_seq(indent, key, items);
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn is_plain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '$' | '-' | '/' | '+')
}

fn looks_like_number(s: &str) -> bool {
    let digits = s.trim_start_matches(['-', '+']);
    !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit() || b == b'.')
        && digits.bytes().filter(|b| *b == b'.').count() <= 1
        && !digits.starts_with('.')
}

fn needs_quotes(s: &str) -> bool {
    if s.is_empty() || s.starts_with('-') || !s.chars().all(is_plain_char) {
        return true;
    }
    let lower = s.to_ascii_lowercase();
    if matches!(lower.as_str(), "true" | "false" | "yes" | "no" | "on" | "off" | "null" | "~") {
        return true;
    }
    // Versions stay plain; anything else numeric would read back as a number.
    looks_like_number(s) && !s.contains('.')
}

/// Quotes `s` with single quotes when a plain scalar would not read back as
/// the same string.
pub(crate) fn quote(s: &str) -> String {
    if needs_quotes(s) {
        format!("'{}'", s.replace('\'', "''"))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aligned_keys() {
        let mut e = YamlEmitter::new();
        e.scalar(0, "install-name", "/usr/lib/libfoo.dylib");
        e.scalar(0, "compatibility-version", "1.2");
        e.flow_seq(0, "archs", &["i386", "x86_64"]);
        assert_eq!(
            e.finish(),
            "install-name:    /usr/lib/libfoo.dylib\n\
             compatibility-version: 1.2\n\
             archs:           [ i386, x86_64 ]\n"
        );
    }

    #[test]
    fn test_list_items() {
        let mut e = YamlEmitter::new();
        e.block(0, "exports");
        e.begin_item(2);
        e.flow_seq(4, "archs", &["x86_64"]);
        e.flow_seq(4, "symbols", &["_foo"]);
        assert_eq!(
            e.finish(),
            "exports:\n  - archs:           [ x86_64 ]\n    symbols:         [ _foo ]\n"
        );
    }

    #[test]
    fn test_flow_seq_wraps_under_first_item() {
        let names: Vec<String> = (0..12).map(|i| format!("_symbol_number_{}", i)).collect();
        let mut e = YamlEmitter::new();
        e.flow_seq(4, "symbols", &names);
        let text = e.finish();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines.len() > 1);
        for line in &lines[1..] {
            assert!(line.starts_with(&" ".repeat(23)));
            assert!(!line[23..].starts_with(' '));
        }
        assert!(lines.iter().all(|l| l.len() <= WRAP_COLUMN + 2));
        let parsed: serde_yaml::Value = serde_yaml::from_str(&text).unwrap();
        assert_eq!(parsed["symbols"].as_sequence().unwrap().len(), 12);
    }

    #[test]
    fn test_quoting() {
        assert_eq!(quote("_OBJC_CLASS_$_Foo"), "_OBJC_CLASS_$_Foo");
        assert_eq!(quote("x86_64: 0000-1111"), "'x86_64: 0000-1111'");
        assert_eq!(quote("-foo"), "'-foo'");
        assert_eq!(quote(""), "''");
        assert_eq!(quote("yes"), "'yes'");
        assert_eq!(quote("1.2.3"), "1.2.3");
        assert_eq!(quote("5"), "'5'");
        assert_eq!(quote("it's"), "'it''s'");
    }
}
