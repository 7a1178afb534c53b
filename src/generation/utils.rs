//! String transformation utilities for code generation
//!
//! Every convention goes through the same tokenizer: input is split on hyphens,
//! underscores, spaces, dots and slashes, and on case boundaries (`fooBar`,
//! `HTTPResponse`). Tokens are then re-joined according to the convention.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier casing conventions understood by the naming filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingConvention {
    Snake,
    Camel,
    Pascal,
    ScreamingSnake,
    Kebab,
}

impl NamingConvention {
    /// Apply this convention to `s`
    pub fn apply(&self, s: &str) -> String {
        match self {
            NamingConvention::Snake => to_snake_case(s),
            NamingConvention::Camel => to_camel_case(s),
            NamingConvention::Pascal => to_pascal_case(s),
            NamingConvention::ScreamingSnake => to_screaming_snake_case(s),
            NamingConvention::Kebab => to_kebab_case(s),
        }
    }
}

impl FromStr for NamingConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "snake" | "snake_case" => Ok(NamingConvention::Snake),
            "camel" | "camel_case" | "camelCase" => Ok(NamingConvention::Camel),
            "pascal" | "pascal_case" | "PascalCase" => Ok(NamingConvention::Pascal),
            "screaming_snake" | "screaming_snake_case" | "SCREAMING_SNAKE_CASE" => {
                Ok(NamingConvention::ScreamingSnake)
            }
            "kebab" | "kebab_case" | "kebab-case" => Ok(NamingConvention::Kebab),
            _ => Err(format!("Unknown naming convention: {s}")),
        }
    }
}

/// Split an identifier into lowercase-agnostic word tokens.
///
/// # Examples
/// ```
/// use cliweave::generation::utils::split_words;
///
/// assert_eq!(split_words("getHTTPResponse"), vec!["get", "HTTP", "Response"]);
/// assert_eq!(split_words("list-all_items"), vec!["list", "all", "items"]);
/// assert!(split_words("").is_empty());
/// ```
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &ch) in chars.iter().enumerate() {
        if !ch.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if ch.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            // fooBar, v2Api, and the last capital of an acronym (HTTPResponse)
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }

        current.push(ch);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
    }
}

/// Converts a string to snake_case.
///
/// # Examples
/// ```
/// use cliweave::generation::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("listAllItems"), "list_all_items");
/// assert_eq!(to_snake_case("ListAllItems"), "list_all_items");
/// assert_eq!(to_snake_case("list-all-items"), "list_all_items");
/// assert_eq!(to_snake_case("get HTTP Response"), "get_http_response");
/// ```
pub fn to_snake_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts a string to PascalCase (UpperCamelCase) for type names.
///
/// # Examples
/// ```
/// use cliweave::generation::utils::to_pascal_case;
///
/// assert_eq!(to_pascal_case("list_all_items"), "ListAllItems");
/// assert_eq!(to_pascal_case("ListAllItems"), "ListAllItems");
/// assert_eq!(to_pascal_case("http-response"), "HttpResponse");
/// ```
pub fn to_pascal_case(s: &str) -> String {
    split_words(s).iter().map(|w| capitalize(w)).collect()
}

/// Converts a string to camelCase for JavaScript/TypeScript identifiers.
///
/// # Examples
/// ```
/// use cliweave::generation::utils::to_camel_case;
///
/// assert_eq!(to_camel_case("list_all_items"), "listAllItems");
/// assert_eq!(to_camel_case("ListAllItems"), "listAllItems");
/// ```
pub fn to_camel_case(s: &str) -> String {
    split_words(s)
        .iter()
        .enumerate()
        .map(|(i, w)| if i == 0 { w.to_lowercase() } else { capitalize(w) })
        .collect()
}

/// Converts a string to SCREAMING_SNAKE_CASE for constants.
pub fn to_screaming_snake_case(s: &str) -> String {
    to_snake_case(s).to_uppercase()
}

/// Converts a string to kebab-case for command and package names.
pub fn to_kebab_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}
