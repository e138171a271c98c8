//! Fixed detection rule tables.
//!
//! Every table entry is an independent alternative: a match on one entry
//! never short-circuits the rest of its table.

/// Promotional and spam wording.
pub const SPAM_PATTERNS: &[&str] = &[
    r"(?i)\b(?:viagra|cialis|\$\$\$|lottery|winner|nigerian prince|free money)\b",
    r"(?i)\b(?:click here|buy now|act now|limited time|special offer)\b",
    r"(?i)\b(?:congratulations|you've won|you are selected)\b",
];

/// Personal-data shapes: phone numbers, email addresses, card-like digit
/// runs, 9-digit identifiers, password and credential key-value pairs.
pub const PERSONAL_DATA_PATTERNS: &[&str] = &[
    r"(?i)\b\d{3}[-.]?\d{3}[-.]?\d{4}\b",
    r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b",
    r"(?i)\b(?:\d[ -]*?){13,16}\b",
    r"(?i)\b\d{9}\b",
    r"(?i)\b(?:password|senha|passe)\s*[:=]\s*\S+\b",
    r"(?i)\b(?:api[_-]?key|token|secret|credential)\s*[:=]\s*\S+\b",
];

/// Control characters stripped outright. Keeps `\n`, `\r`, `\t`.
pub const CONTROL_CHARS: &str = r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]";

/// Runs of spaces and tabs, collapsed to one space.
pub const BLANK_RUNS: &str = r"[ \t]+";

/// Three or more consecutive newlines, collapsed to a paragraph break.
pub const NEWLINE_RUNS: &str = r"\n{3,}";

pub const SPAM_TOKEN: &str = "[filtered]";
pub const PERSONAL_DATA_TOKEN: &str = "[personal data removed]";
