//! Extraction of candidate rule lines from fetched documents.
//!
//! Two document shapes exist in the wild: plain lists (one rule per line)
//! and Clash-style YAML files whose rules are `- ` items under a `payload:`
//! key. YAML extraction is deliberately line-based rather than a full YAML
//! parse: upstream files are frequently malformed, and the line scan
//! recovers rules from them anyway.

use crate::classifier::COMMENT_PREFIXES;
use tracing::debug;

/// Extract candidate rule lines from a fetched document, choosing the
/// parser by the URL's path extension.
pub fn extract_rules(url: &str, content: &str) -> Vec<String> {
    if is_yaml_url(url) {
        extract_payload(content)
    } else {
        extract_list(content)
    }
}

/// True when the URL path ends in `.yaml` or `.yml` (query and fragment
/// ignored).
pub fn is_yaml_url(url: &str) -> bool {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url)
        .to_ascii_lowercase();
    path.ends_with(".yaml") || path.ends_with(".yml")
}

/// Plain list: one rule per line, empty lines and full-line comments
/// skipped.
pub fn extract_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(COMMENT_PREFIXES))
        .map(str::to_string)
        .collect()
}

/// Clash YAML payload: collect `- ` items following the `payload:` line,
/// stopping at the first non-item line. Falls back to scanning the whole
/// document for `- ` items when no `payload:` key is present or nothing was
/// collected under it.
pub fn extract_payload(content: &str) -> Vec<String> {
    let lines: Vec<&str> = content.lines().collect();
    let mut rules = Vec::new();

    if let Some(start) = lines.iter().position(|line| line.trim() == "payload:") {
        for line in &lines[start + 1..] {
            let stripped = line.trim();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }
            if !stripped.starts_with('-') {
                // End of the payload block.
                break;
            }
            if let Some(item) = clean_item(stripped) {
                rules.push(item);
            }
        }
    }

    if rules.is_empty() {
        debug!("no payload block found, scanning whole document for items");
        for line in &lines {
            let stripped = line.trim();
            if stripped.starts_with('-') {
                if let Some(item) = clean_item(stripped) {
                    rules.push(item);
                }
            }
        }
    }

    rules
}

/// Strip the leading `-` item marker (repeatedly, for malformed files) and
/// any matching surrounding quotes.
fn clean_item(stripped: &str) -> Option<String> {
    let mut item = stripped;
    while let Some(rest) = item.strip_prefix('-') {
        item = rest.trim();
    }
    let item = unquote(item);
    if item.is_empty() {
        None
    } else {
        Some(item.to_string())
    }
}

fn unquote(s: &str) -> &str {
    if s.len() >= 2 {
        let bytes = s.as_bytes();
        if (bytes[0] == b'\'' && bytes[s.len() - 1] == b'\'')
            || (bytes[0] == b'"' && bytes[s.len() - 1] == b'"')
        {
            return &s[1..s.len() - 1];
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_YAML: &str = "\
# NAME: Telegram
# UPDATED: 2024-12-08 02:12:03
payload:
  - DOMAIN,api.imem.app
  - DOMAIN-SUFFIX,cdn-telegram.org
  - IP-CIDR,109.239.140.0/24
  - PROCESS-NAME,org.telegram.messenger
  - IP-ASN,211157
";

    #[test]
    fn test_is_yaml_url() {
        assert!(is_yaml_url("https://example.com/rules/telegram.yaml"));
        assert!(is_yaml_url("https://example.com/Telegram.YML"));
        assert!(is_yaml_url("https://example.com/a.yaml?raw=true"));
        assert!(!is_yaml_url("https://example.com/telegram.list"));
        assert!(!is_yaml_url("https://example.com/yaml.txt"));
    }

    #[test]
    fn test_extract_list() {
        let content = "# header\nt.me\n\n  91.108.4.0/24  \n! note\n";
        let rules = extract_list(content);
        assert_eq!(rules, ["t.me", "91.108.4.0/24"]);
    }

    #[test]
    fn test_extract_payload() {
        let rules = extract_payload(SAMPLE_YAML);
        assert_eq!(rules.len(), 5);
        assert_eq!(rules[0], "DOMAIN,api.imem.app");
        assert_eq!(rules[4], "IP-ASN,211157");
    }

    #[test]
    fn test_extract_payload_stops_at_block_end() {
        let content = "payload:\n  - DOMAIN,t.me\nrules:\n  - MATCH,DIRECT\n";
        let rules = extract_payload(content);
        assert_eq!(rules, ["DOMAIN,t.me"]);
    }

    #[test]
    fn test_extract_payload_fallback_without_key() {
        let content = "# stripped header\n  - DOMAIN,t.me\n  - IP-ASN,44907\n";
        let rules = extract_payload(content);
        assert_eq!(rules, ["DOMAIN,t.me", "IP-ASN,44907"]);
    }

    #[test]
    fn test_extract_payload_cleans_repeated_dashes() {
        let content = "payload:\n  - - DOMAIN,t.me\n";
        let rules = extract_payload(content);
        assert_eq!(rules, ["DOMAIN,t.me"]);
    }

    #[test]
    fn test_extract_payload_unquotes_items() {
        let content = "payload:\n  - 'IP-CIDR,91.108.4.0/24'\n  - \"DOMAIN,t.me\"\n";
        let rules = extract_payload(content);
        assert_eq!(rules, ["IP-CIDR,91.108.4.0/24", "DOMAIN,t.me"]);
    }

    #[test]
    fn test_extract_payload_skips_comments_inside_block() {
        let content = "payload:\n  # note\n  - DOMAIN,t.me\n";
        let rules = extract_payload(content);
        assert_eq!(rules, ["DOMAIN,t.me"]);
    }

    #[test]
    fn test_extract_rules_dispatches_on_extension() {
        assert_eq!(
            extract_rules("https://example.com/t.yaml", SAMPLE_YAML).len(),
            5
        );
        // The same content read as a plain list keeps the non-comment lines.
        let as_list = extract_rules("https://example.com/t.list", "t.me\n# c\n");
        assert_eq!(as_list, ["t.me"]);
    }

    #[test]
    fn test_empty_documents() {
        assert!(extract_list("").is_empty());
        assert!(extract_payload("").is_empty());
        assert!(extract_payload("payload:\n").is_empty());
    }
}
