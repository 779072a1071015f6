//! Crawler detection from the `User-Agent` header.
//!
//! # Design Decisions
//! - One case-insensitive alternation, compiled once at startup
//! - Missing or blank user agents are treated as browsers
//! - Patterns are substrings or `^`-anchored prefixes; no lookaround

use regex::Regex;

/// Default crawler signatures.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "bot",
    "crawl",
    "spider",
    "slurp",
    "scrape",
    "archive",
    "headless",
    "lighthouse",
    "pagespeed",
    "pingdom",
    "statuscake",
    "phantomjs",
    "facebookexternalhit",
    "embedly",
    "quora link preview",
    "outbrain",
    "vkshare",
    "w3c_validator",
    "whatsapp",
    "linkcheck",
    "feedfetcher",
    "httrack",
    "nutch",
    "sogou",
    "yandex",
    "^curl/",
    "^wget",
    "^python",
    "^java/",
    "^go-http-client",
    "^okhttp",
    "^axios/",
    "^node-fetch",
    "^postman",
    "^apache-httpclient",
    "^libwww-perl",
    r"^mozilla/\d\.\d \(compatible;?\)$",
];

/// Decides whether a request comes from an automated crawler.
pub trait CrawlerClassifier: Send + Sync {
    fn is_bot(&self, user_agent: Option<&str>) -> bool;
}

/// Regex-backed classifier over `DEFAULT_PATTERNS` plus extras.
#[derive(Debug, Clone)]
pub struct UserAgentPatterns {
    pattern: Regex,
}

impl UserAgentPatterns {
    /// Build from the default list plus `extra` patterns.
    pub fn new<S: AsRef<str>>(extra: &[S]) -> Result<Self, regex::Error> {
        let alternation = DEFAULT_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(AsRef::as_ref))
            .filter(|p| !p.trim().is_empty())
            .map(|p| format!("(?:{p})"))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!("(?i){alternation}"))?;
        Ok(Self { pattern })
    }
}

impl Default for UserAgentPatterns {
    fn default() -> Self {
        Self::new::<&str>(&[]).expect("default crawler patterns are valid")
    }
}

impl CrawlerClassifier for UserAgentPatterns {
    fn is_bot(&self, user_agent: Option<&str>) -> bool {
        match user_agent.map(str::trim) {
            Some(ua) if !ua.is_empty() => self.pattern.is_match(ua),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHROME: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
    const SAFARI_IOS: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

    #[test]
    fn test_known_crawlers() {
        let c = UserAgentPatterns::default();
        for ua in [
            "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
            "Mozilla/5.0 (compatible; bingbot/2.0; +http://www.bing.com/bingbot.htm)",
            "facebookexternalhit/1.1 (+http://www.facebook.com/externalhit_uatext.php)",
            "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) HeadlessChrome/120.0.0.0 Safari/537.36",
            "curl/8.4.0",
            "Wget/1.21",
            "python-requests/2.31.0",
            "Mozilla/5.0 (compatible)",
        ] {
            assert!(c.is_bot(Some(ua)), "expected crawler: {ua}");
        }
    }

    #[test]
    fn test_browsers_are_not_bots() {
        let c = UserAgentPatterns::default();
        assert!(!c.is_bot(Some(CHROME)));
        assert!(!c.is_bot(Some(SAFARI_IOS)));
    }

    #[test]
    fn test_missing_user_agent() {
        let c = UserAgentPatterns::default();
        assert!(!c.is_bot(None));
        assert!(!c.is_bot(Some("   ")));
    }

    #[test]
    fn test_extra_patterns() {
        let c = UserAgentPatterns::new(&["^acme-monitor/"]).unwrap();
        assert!(c.is_bot(Some("ACME-Monitor/3.1")));
        assert!(!c.is_bot(Some("my acme-monitor/3.1")));
    }

    #[test]
    fn test_invalid_extra_pattern() {
        assert!(UserAgentPatterns::new(&["(unclosed"]).is_err());
    }
}
