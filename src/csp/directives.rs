//! CSP directive tokenizer and ordered directive set.

use std::fmt;

/// A single `name value` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub value: String,
}

impl Directive {
    /// Tokenize one `;`-delimited segment.
    ///
    /// The name is the first whitespace-delimited token, lowercased. The value
    /// is the rest of the segment with whitespace runs collapsed to a single
    /// space. A segment with no name yields `None`; a name alone yields an
    /// empty value.
    pub fn parse(segment: &str) -> Option<Self> {
        let mut tokens = segment.split_whitespace();
        let name = tokens.next()?.trim_end_matches(';');
        if name.is_empty() {
            return None;
        }
        let value = tokens
            .map(|t| t.trim_end_matches(';'))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        Some(Self {
            name: name.to_ascii_lowercase(),
            value,
        })
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{} {}", self.name, self.value)
        }
    }
}

/// Directives keyed by name, in first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveSet {
    entries: Vec<Directive>,
}

impl DirectiveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a full header value. Empty segments are skipped and a repeated
    /// name keeps its first position with the last value.
    pub fn parse(header: &str) -> Self {
        let mut set = Self::new();
        for directive in header.split(';').filter_map(Directive::parse) {
            set.set(directive.name, directive.value);
        }
        set
    }

    /// Insert or overwrite. An existing key keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|d| d.name == name) {
            Some(existing) => existing.value = value,
            None => self.entries.push(Directive { name, value }),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Directive> {
        self.entries.iter()
    }

    /// Serialize as `name value; name value;` with a trailing `;`.
    pub fn to_header_string(&self) -> String {
        let joined = self
            .entries
            .iter()
            .map(Directive::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        format!("{joined};")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_full_source_list() {
        let d = Directive::parse("  default-src 'self'   https://cdn.shopify.com  https://shopify.com ").unwrap();
        assert_eq!(d.name, "default-src");
        assert_eq!(d.value, "'self' https://cdn.shopify.com https://shopify.com");
    }

    #[test]
    fn test_parse_valueless_directive() {
        let d = Directive::parse("upgrade-insecure-requests").unwrap();
        assert_eq!(d.value, "");
        assert_eq!(d.to_string(), "upgrade-insecure-requests");
    }

    #[test]
    fn test_parse_skips_empty_segments() {
        assert!(Directive::parse("").is_none());
        assert!(Directive::parse("   ").is_none());
        let set = DirectiveSet::parse("base-uri 'self';; ;frame-ancestors 'none';");
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_names_are_case_insensitive() {
        let mut set = DirectiveSet::parse("IMG-SRC 'self'");
        set.set("img-src", "data:");
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("Img-Src"), Some("data:"));
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut set = DirectiveSet::parse("a-src x; b-src y; c-src z");
        set.set("b-src", "w");
        assert_eq!(set.to_header_string(), "a-src x; b-src w; c-src z;");
    }

    #[test]
    fn test_empty_set_serializes_to_semicolon() {
        assert_eq!(DirectiveSet::new().to_header_string(), ";");
    }
}
