// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
//! Built-in example patterns and the sample a fresh session starts from.

use crate::{Flags, RunInput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preset {
    /// Short key for `--preset` and the session `preset` command.
    pub name: &'static str,
    pub label: &'static str,
    pub pattern: &'static str,
}

pub const PRESETS: &[Preset] = &[
    Preset {
        name: "email",
        label: "Email (named groups)",
        pattern: r"(?P<user>[A-Za-z0-9._%+-]+)@(?P<domain>[A-Za-z0-9.-]+)\.(?P<tld>[A-Za-z]{2,})",
    },
    Preset {
        name: "url",
        label: "Simple URL",
        pattern: r"(https?)://([^/\s]+)(/\S*)?",
    },
    Preset {
        name: "ipv4",
        label: "IPv4",
        pattern: r"\b(\d{1,3})\.(\d{1,3})\.(\d{1,3})\.(\d{1,3})\b",
    },
    Preset {
        name: "date",
        label: "Date (YYYY-MM-DD)",
        pattern: r"\b(\d{4})-(\d{2})-(\d{2})\b",
    },
    Preset {
        name: "iban",
        label: "IBAN (rough)",
        pattern: r"\b([A-Z]{2})(\d{2})([A-Z0-9]{1,30})\b",
    },
];

pub const SAMPLE_TEXT: &str = "Contact us at info@example.com or support@test.org";
pub const SAMPLE_PATTERN: &str = r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}";

/// Look a preset up by its 1-based position or its name (any case).
pub fn find(key: &str) -> Option<&'static Preset> {
    let key = key.trim();
    if let Ok(n) = key.parse::<usize>() {
        return n.checked_sub(1).and_then(|i| PRESETS.get(i));
    }
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(key))
}

/// The input a session starts from when nothing else is given: two email
/// addresses, an email pattern and case-insensitive matching.
pub fn sample_input() -> RunInput {
    RunInput::new(
        SAMPLE_TEXT,
        SAMPLE_PATTERN,
        Flags { ignore_case: true, ..Flags::default() },
    )
}

/// One line per preset: number, name, label.
pub fn listing() -> String {
    PRESETS
        .iter()
        .enumerate()
        .map(|(i, p)| format!("{:>2}. {:<6} {}\n", i + 1, p.name, p.label))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_number_and_name() {
        assert_eq!(find("1").map(|p| p.name), Some("email"));
        assert_eq!(find("5").map(|p| p.name), Some("iban"));
        assert_eq!(find("IPv4").map(|p| p.name), Some("ipv4"));
        assert_eq!(find(" date ").map(|p| p.name), Some("date"));
        assert!(find("0").is_none());
        assert!(find("6").is_none());
        assert!(find("phone").is_none());
    }

    #[test]
    fn email_preset_names_user_domain_tld_in_order() {
        let p = find("email").unwrap().pattern;
        let user = p.find("?P<user>").unwrap();
        let domain = p.find("?P<domain>").unwrap();
        let tld = p.find("?P<tld>").unwrap();
        assert!(user < domain && domain < tld);
    }

    #[test]
    fn sample_is_case_insensitive_email_search() {
        let input = sample_input();
        assert!(input.flags.ignore_case);
        assert!(!input.flags.multiline && !input.flags.dot_all);
        assert!(input.text.contains("info@example.com"));
        assert!(input.text.contains("support@test.org"));
        assert_eq!(input.pattern, SAMPLE_PATTERN);
    }

    #[test]
    fn listing_has_one_line_per_preset() {
        let out = listing();
        assert_eq!(out.lines().count(), PRESETS.len());
        assert!(out.starts_with(" 1. email  Email (named groups)"));
    }
}
