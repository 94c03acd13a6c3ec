//! License family and copyright recognition over comment text.

use std::sync::OnceLock;
use log::trace;
use regex::Regex;

use crate::snapshot::types::models::{Copyright, LicenseKind};

static SPDX_PATTERN: OnceLock<Regex> = OnceLock::new();
static COPYRIGHT_PATTERN: OnceLock<Regex> = OnceLock::new();
static WHITESPACE_PATTERN: OnceLock<Regex> = OnceLock::new();
static RESERVED_PATTERN: OnceLock<Regex> = OnceLock::new();

fn spdx_regex() -> &'static Regex {
    SPDX_PATTERN.get_or_init(|| {
        Regex::new(r"(?m)SPDX-License-Identifier:\s*(?P<id>[A-Za-z0-9.+\-() ]*[A-Za-z0-9.+)])")
            .expect("Invalid SPDX regex pattern")
    })
}

fn copyright_regex() -> &'static Regex {
    COPYRIGHT_PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)(?:\bcopyright\b[:\s]*(?P<mark>\(c\)|©)?|(?P<bare>\(c\)|©))\s*(?:(?P<years>\d{4}(?:\s*[-–,]\s*\d{2,4})*)[,.]?)?\s*(?:by\s+)?(?P<holder>.*)$",
        )
        .expect("Invalid copyright regex pattern")
    })
}

fn whitespace_regex() -> &'static Regex {
    WHITESPACE_PATTERN.get_or_init(|| Regex::new(r"\s+").expect("Invalid whitespace regex pattern"))
}

fn reserved_regex() -> &'static Regex {
    RESERVED_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\s*all\s+rights\s+reserved\.?\s*$").expect("Invalid reserved regex pattern")
    })
}

/// Phrases identifying a license family, matched against lower-cased,
/// whitespace-collapsed text. Order matters: LGPL texts mention the GPL.
const LICENSE_PHRASES: &[(&[&str], LicenseKind)] = &[
    (
        &[
            "gnu lesser general public license",
            "gnu library general public license",
        ],
        LicenseKind::Lgpl,
    ),
    (&["gnu general public license"], LicenseKind::Gpl),
    (&["apple public source license"], LicenseKind::Apsl),
    (
        &[
            "apache license, version 2.0",
            "apache license version 2.0",
            "apache license v2.0",
            "apache.org/licenses/license-2.0",
        ],
        LicenseKind::Apache2,
    ),
    (&["mozilla public license"], LicenseKind::Mpl),
    (&["php license"], LicenseKind::Php),
    (
        &["permission is hereby granted, free of charge", "mit license"],
        LicenseKind::Mit,
    ),
    (
        &["redistribution and use in source and binary forms"],
        LicenseKind::Bsd,
    ),
];

/// Returns the SPDX identifier declared in `text`, if any.
pub fn spdx_identifier(text: &str) -> Option<String> {
    spdx_regex()
        .captures(text)
        .and_then(|caps| caps.name("id"))
        .map(|id| id.as_str().trim().to_string())
}

/// Maps an SPDX identifier onto a license family.
fn kind_from_spdx(id: &str) -> LicenseKind {
    let upper = id.to_ascii_uppercase();
    if upper.starts_with("APACHE-2.0") {
        LicenseKind::Apache2
    } else if upper.starts_with("APSL") {
        LicenseKind::Apsl
    } else if upper.starts_with("LGPL") {
        LicenseKind::Lgpl
    } else if upper.starts_with("GPL") {
        LicenseKind::Gpl
    } else if upper.starts_with("MPL") {
        LicenseKind::Mpl
    } else if upper.starts_with("PHP") {
        LicenseKind::Php
    } else if upper == "MIT" {
        LicenseKind::Mit
    } else if upper.starts_with("BSD") {
        LicenseKind::Bsd
    } else {
        LicenseKind::Spdx(id.to_string())
    }
}

/// Classifies the license of a comment block.
///
/// An SPDX identifier wins over license prose.
pub fn classify(text: &str) -> LicenseKind {
    if let Some(id) = spdx_identifier(text) {
        trace!("SPDX identifier: {}", id);
        return kind_from_spdx(&id);
    }

    let normalized = whitespace_regex()
        .replace_all(&text.to_lowercase(), " ")
        .into_owned();
    LICENSE_PHRASES
        .iter()
        .find(|(phrases, _)| phrases.iter().any(|p| normalized.contains(p)))
        .map(|(_, kind)| kind.clone())
        .unwrap_or(LicenseKind::Unknown)
}

/// Extracts copyright statements, one per matching line.
///
/// A line counts when it carries a year or a `(c)`/`©` mark, which keeps
/// license prose such as "the above copyright notice" out. A mark without
/// the word "copyright" must either be followed by a year or open the line
/// in front of a capitalised holder, so clause labels like "paragraph (c)"
/// are not statements.
pub fn parse_copyrights(text: &str) -> Vec<Copyright> {
    let re = copyright_regex();
    text.lines()
        .filter_map(|line| {
            let caps = re.captures(line)?;
            let years = caps.name("years").map(|m| m.as_str().trim().to_string());
            let holder = caps.name("holder").map(|m| m.as_str()).unwrap_or_default();
            let marked = match caps.name("bare") {
                Some(bare) => {
                    years.is_some()
                        || (line[..bare.start()].trim().is_empty()
                            && holder.starts_with(|c: char| c.is_uppercase()))
                }
                None => caps.name("mark").is_some(),
            };
            if years.is_none() && !marked {
                return None;
            }
            let holder = reserved_regex().replace(holder, "");
            let holder = holder
                .trim_matches(|c: char| c.is_whitespace() || ",;:".contains(c))
                .to_string();
            if holder.is_empty() && years.is_none() {
                return None;
            }
            Some(Copyright { years, holder })
        })
        .collect()
}
