//! Local CSP overrides and the merge with the platform baseline.

use serde::{Deserialize, Serialize};

use crate::csp::directives::{Directive, DirectiveSet};

/// Directives this storefront always controls, in insertion order.
pub const OVERRIDE_DIRECTIVES: [&str; 5] =
    ["img-src", "style-src", "script-src", "connect-src", "font-src"];

/// Source lists for the override directives.
///
/// `script_src` must not carry a nonce; the per-request nonce is added when
/// the directives are built.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct CspOverrides {
    pub img_src: String,
    pub style_src: String,
    pub script_src: String,
    pub connect_src: String,
    pub font_src: String,
}

impl Default for CspOverrides {
    fn default() -> Self {
        Self {
            img_src: "'self' https://cdn.shopify.com https://shopify.com https://letsenhance.io https://cdn.jsdelivr.net data:".to_string(),
            style_src: "'self' 'unsafe-inline' https://cdn.shopify.com https://cdn.jsdelivr.net https://cdnjs.cloudflare.com".to_string(),
            script_src: "'self' https://cdn.shopify.com https://cdn.jsdelivr.net".to_string(),
            connect_src: "'self' https://monorail-edge.shopifysvc.com".to_string(),
            font_src: "'self' https://cdnjs.cloudflare.com".to_string(),
        }
    }
}

impl CspOverrides {
    /// Full directive strings (`name sources`) for this request.
    pub fn directive_strings(&self, nonce: &str) -> [String; 5] {
        [
            format!("img-src {}", self.img_src),
            format!("style-src {}", self.style_src),
            format!("script-src {}", with_nonce(&self.script_src, nonce)),
            format!("connect-src {}", self.connect_src),
            format!("font-src {}", self.font_src),
        ]
    }
}

/// Put `'nonce-<nonce>'` after a leading `'self'`, or first otherwise.
fn with_nonce(sources: &str, nonce: &str) -> String {
    let token = format!("'nonce-{nonce}'");
    let mut parts: Vec<&str> = sources.split_whitespace().collect();
    let at = usize::from(parts.first() == Some(&"'self'"));
    parts.insert(at, &token);
    parts.join(" ")
}

/// Merge the baseline header with the overrides and serialize.
///
/// Baseline directives keep their order; an override replaces the value of a
/// same-named baseline directive in place, and overrides missing from the
/// baseline are appended.
pub fn merge_policy(baseline: &str, overrides: &CspOverrides, nonce: &str) -> String {
    let mut set = DirectiveSet::parse(baseline);
    for directive in overrides
        .directive_strings(nonce)
        .iter()
        .filter_map(|s| Directive::parse(s))
    {
        set.set(directive.name, directive.value);
    }
    set.to_header_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const NONCE: &str = "abc123";

    fn names(header: &str) -> Vec<String> {
        DirectiveSet::parse(header).iter().map(|d| d.name.clone()).collect()
    }

    #[test]
    fn test_empty_baseline_yields_exactly_overrides() {
        let merged = merge_policy("", &CspOverrides::default(), NONCE);
        assert_eq!(names(&merged), OVERRIDE_DIRECTIVES);
        assert!(merged.ends_with(';'));
        assert!(!merged.ends_with(";;"));
    }

    #[test]
    fn test_override_wins_over_baseline() {
        let baseline = "default-src 'self'; style-src 'self' https://cdn.shopify.com; connect-src 'self' https://checkout.example.com";
        let overrides = CspOverrides::default();
        let set = DirectiveSet::parse(&merge_policy(baseline, &overrides, NONCE));
        assert_eq!(set.get("style-src"), Some(overrides.style_src.as_str()));
        assert_eq!(set.get("connect-src"), Some(overrides.connect_src.as_str()));
        assert_eq!(set.get("default-src"), Some("'self'"));
    }

    #[test]
    fn test_overridden_keys_keep_baseline_position() {
        let baseline = "base-uri 'self'; style-src x; frame-ancestors 'none'";
        let merged = merge_policy(baseline, &CspOverrides::default(), NONCE);
        assert_eq!(
            names(&merged),
            ["base-uri", "style-src", "frame-ancestors", "img-src", "script-src", "connect-src", "font-src"]
        );
    }

    #[test]
    fn test_no_duplicates_for_any_override_subset() {
        let baseline_parts = [
            "img-src a",
            "style-src b",
            "script-src c",
            "connect-src d",
            "font-src e",
        ];
        for mask in 0u8..32 {
            let mut baseline = vec!["default-src 'self'", "frame-ancestors 'none'"];
            for (i, part) in baseline_parts.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    baseline.push(part);
                }
            }
            let merged = merge_policy(&baseline.join("; "), &CspOverrides::default(), NONCE);
            let names = names(&merged);
            let unique: HashSet<_> = names.iter().collect();
            assert_eq!(unique.len(), names.len(), "duplicate in {merged}");
            assert_eq!(names.len(), 7);
            assert!(merged.ends_with(';'));
            let set = DirectiveSet::parse(&merged);
            assert_eq!(set.get("frame-ancestors"), Some("'none'"));
        }
    }

    #[test]
    fn test_script_src_carries_nonce() {
        let merged = merge_policy("", &CspOverrides::default(), NONCE);
        let set = DirectiveSet::parse(&merged);
        assert_eq!(
            set.get("script-src"),
            Some("'self' 'nonce-abc123' https://cdn.shopify.com https://cdn.jsdelivr.net")
        );
    }

    #[test]
    fn test_nonce_placed_first_without_self() {
        assert_eq!(with_nonce("https://a.com", "n"), "'nonce-n' https://a.com");
        assert_eq!(with_nonce("", "n"), "'nonce-n'");
    }

    #[test]
    fn test_empty_override_serializes_bare_name() {
        let overrides = CspOverrides {
            font_src: String::new(),
            ..CspOverrides::default()
        };
        let merged = merge_policy("", &overrides, NONCE);
        assert!(merged.ends_with("; font-src;"));
    }
}
