//! Sanitizer functions shared by the language renderers
//!
//! String-literal escaping, reserved-word avoidance, and the text cleanup applied
//! to every rendered fragment.

use once_cell::sync::Lazy;
use regex::Regex;

static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());
static TRAILING_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)[ \t]+$").unwrap());
static SMART_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\u{2018}\u{2019}\u{201C}\u{201D}\u{2014}]").unwrap());
static INNER_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static NON_IDENTIFIER_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield", "match", "case", "type",
];

const JS_KEYWORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for",
    "function", "if", "implements", "import", "in", "instanceof", "interface", "let", "new",
    "null", "package", "private", "protected", "public", "return", "static", "super",
    "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with",
    "yield", "arguments", "eval",
];

/// TypeScript adds its own type-level names on top of the JS reserved words
const TS_EXTRA_KEYWORDS: &[&str] = &[
    "any", "boolean", "declare", "keyof", "module", "namespace", "never", "number",
    "readonly", "string", "symbol", "type", "unknown",
];

const RUST_KEYWORDS: &[&str] = &[
    "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn",
    "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref",
    "return", "self", "Self", "static", "struct", "super", "trait", "true", "type", "unsafe",
    "use", "where", "while", "async", "await", "dyn", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "try",
];

fn escape_with(input: &str, control: impl Fn(char) -> String) -> String {
    let mut out = String::with_capacity(input.len() + 2);
    out.push('"');
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&control(c)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted Python literal; other control characters become `\xNN`
pub fn escape_python_string(input: &str) -> String {
    escape_with(input, |c| {
        let code = c as u32;
        if code <= 0xff {
            format!("\\x{code:02x}")
        } else {
            format!("\\u{code:04x}")
        }
    })
}

/// Double-quoted JavaScript/TypeScript literal; other control characters become `\uXXXX`
pub fn escape_js_string(input: &str) -> String {
    escape_with(input, |c| format!("\\u{:04x}", c as u32))
}

/// Double-quoted Rust literal; other control characters become `\u{..}`
pub fn escape_rust_string(input: &str) -> String {
    escape_with(input, |c| format!("\\u{{{:x}}}", c as u32))
}

/// Shape `name` into a valid identifier before keyword checks.
///
/// Characters outside `[A-Za-z0-9_]` become `_`, a leading digit gets a `_`
/// prefix, and empty input becomes `_unnamed`.
fn identifier(name: &str) -> String {
    let replaced = NON_IDENTIFIER_CHARS.replace_all(name, "_");
    if replaced.is_empty() {
        "_unnamed".to_string()
    } else if replaced.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{replaced}")
    } else {
        replaced.into_owned()
    }
}

/// Python identifier (`class` -> `class_`, `2fa` -> `_2fa`)
pub fn python_safe_name(name: &str) -> String {
    let name = identifier(name);
    if PYTHON_KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// JavaScript identifier (`delete` -> `_delete`, `dry-run` -> `dry_run`)
pub fn js_safe_name(name: &str) -> String {
    let name = identifier(name);
    if JS_KEYWORDS.contains(&name.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}

/// TypeScript identifier; also avoids the built-in type names (`type` -> `_type`)
pub fn ts_safe_name(name: &str) -> String {
    let name = identifier(name);
    if JS_KEYWORDS.contains(&name.as_str()) || TS_EXTRA_KEYWORDS.contains(&name.as_str()) {
        format!("_{name}")
    } else {
        name
    }
}

/// Rust identifier (`type` -> `type_`)
pub fn rust_safe_name(name: &str) -> String {
    let name = identifier(name);
    if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("{name}_")
    } else {
        name
    }
}

/// Cleanup applied to every rendered fragment.
///
/// Collapses runs of three or more newlines into one blank line and strips
/// trailing whitespace from each line.
pub fn post_process(rendered: &str) -> String {
    let trimmed = TRAILING_WHITESPACE.replace_all(rendered, "");
    EXCESS_NEWLINES.replace_all(&trimmed, "\n\n").into_owned()
}

/// Normalizes free-form description text for embedding in doc comments.
///
/// Smart punctuation is replaced with ASCII, inner whitespace is collapsed,
/// and blank lines are dropped.
pub fn sanitize_description(input: &str) -> String {
    input
        .lines()
        .map(|line| {
            let ascii = SMART_PUNCTUATION.replace_all(line, |caps: &regex::Captures| {
                match &caps[0] {
                    "\u{2018}" | "\u{2019}" => "'",
                    "\u{201C}" | "\u{201D}" => "\"",
                    _ => "-",
                }
            });
            INNER_WHITESPACE.replace_all(ascii.trim(), " ").into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_strings() {
        assert_eq!(escape_rust_string("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(escape_js_string("a\\b"), "\"a\\\\b\"");
        assert_eq!(escape_python_string("line\nnext\t"), "\"line\\nnext\\t\"");
        assert_eq!(escape_rust_string(""), "\"\"");
    }

    #[test]
    fn test_escape_control_characters() {
        assert_eq!(escape_python_string("\u{7}"), "\"\\x07\"");
        assert_eq!(escape_js_string("\u{1b}"), "\"\\u001b\"");
        assert_eq!(escape_rust_string("\u{0}"), "\"\\u{0}\"");
    }

    #[test]
    fn test_safe_names() {
        assert_eq!(python_safe_name("class"), "class_");
        assert_eq!(python_safe_name("name"), "name");
        assert_eq!(js_safe_name("delete"), "_delete");
        assert_eq!(js_safe_name("target"), "target");
        assert_eq!(ts_safe_name("type"), "_type");
        assert_eq!(ts_safe_name("string"), "_string");
        assert_eq!(rust_safe_name("type"), "type_");
        assert_eq!(rust_safe_name("self"), "self_");
        assert_eq!(rust_safe_name("verbose"), "verbose");
    }

    #[test]
    fn test_safe_names_fix_invalid_identifiers() {
        assert_eq!(rust_safe_name("2fa"), "_2fa");
        assert_eq!(python_safe_name("2fa"), "_2fa");
        assert_eq!(js_safe_name("9lives"), "_9lives");
        assert_eq!(rust_safe_name("dry-run"), "dry_run");
        assert_eq!(python_safe_name("output.path"), "output_path");
        assert_eq!(ts_safe_name("max-retries"), "max_retries");
        assert_eq!(rust_safe_name(""), "_unnamed");
        assert_eq!(python_safe_name(""), "_unnamed");
        assert_eq!(js_safe_name(""), "_unnamed");
        assert_eq!(ts_safe_name(""), "_unnamed");
    }

    #[test]
    fn test_post_process() {
        let input = "fn main() {   \n\n\n\n    run();\t\n}\n";
        assert_eq!(post_process(input), "fn main() {\n\n    run();\n}\n");
    }

    #[test]
    fn test_post_process_keeps_single_blank_lines() {
        let input = "a\n\nb\n";
        assert_eq!(post_process(input), input);
    }

    #[test]
    fn test_sanitize_description() {
        let input = "It\u{2019}s   a \u{201C}tool\u{201D}\u{2014}really\n\n  second line ";
        assert_eq!(
            sanitize_description(input),
            "It's a \"tool\"-really\nsecond line"
        );
    }
}
