use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How logical type/field names turn into table/column names, and how
/// result columns turn into map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingPattern {
    /// Keep the name exactly as declared.
    #[default]
    #[serde(alias = "ORIGINAL")]
    Original,
    #[serde(alias = "LOWER_CASE")]
    LowerCase,
    #[serde(alias = "UPPER_CASE")]
    UpperCase,
    /// `UserAccount` -> `user_account`
    #[serde(alias = "LOWER_SNAKE", alias = "HUMP_TO_UNDERLINE_LOWER")]
    LowerSnake,
    /// `UserAccount` -> `USER_ACCOUNT`
    #[serde(alias = "UPPER_SNAKE", alias = "HUMP_TO_UNDERLINE_UPPER")]
    UpperSnake,
    /// `user_account` -> `userAccount`
    #[serde(alias = "CAMEL", alias = "HUMP")]
    Camel,
}

impl NamingPattern {
    pub fn apply(&self, name: &str) -> String {
        match self {
            Self::Original => name.to_string(),
            Self::LowerCase => name.to_lowercase(),
            Self::UpperCase => name.to_uppercase(),
            Self::LowerSnake => to_snake(name),
            Self::UpperSnake => to_snake(name).to_uppercase(),
            Self::Camel => to_camel(name),
        }
    }
}

impl FromStr for NamingPattern {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "original" => Ok(Self::Original),
            "lower_case" | "lowercase" => Ok(Self::LowerCase),
            "upper_case" | "uppercase" => Ok(Self::UpperCase),
            "lower_snake" | "hump_to_underline_lower" => Ok(Self::LowerSnake),
            "upper_snake" | "hump_to_underline_upper" => Ok(Self::UpperSnake),
            "camel" | "hump" => Ok(Self::Camel),
            other => Err(format!("unknown naming pattern '{}'", other)),
        }
    }
}

impl fmt::Display for NamingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Original => "original",
            Self::LowerCase => "lower_case",
            Self::UpperCase => "upper_case",
            Self::LowerSnake => "lower_snake",
            Self::UpperSnake => "upper_snake",
            Self::Camel => "camel",
        };
        f.write_str(label)
    }
}

/// Splits camel/Pascal case on word boundaries and joins with `_`, lowercased.
///
/// Acronyms stay together: `HTTPServer` -> `http_server`.
fn to_snake(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|c| c.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(ch.to_lowercase());
    }

    out
}

fn to_camel(input: &str) -> String {
    let has_lower = input.chars().any(|c| c.is_lowercase());
    let has_upper = input.chars().any(|c| c.is_uppercase());

    // Already camel/Pascal: only the first letter changes.
    if !input.contains('_') && has_lower && has_upper {
        let mut chars = input.chars();
        return match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => String::new(),
        };
    }

    let mut out = String::with_capacity(input.len());
    let mut upper_next = false;
    for ch in input.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
            continue;
        }
        if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.extend(ch.to_lowercase());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_conversions() {
        assert_eq!(NamingPattern::LowerSnake.apply("UserAccount"), "user_account");
        assert_eq!(NamingPattern::LowerSnake.apply("userName"), "user_name");
        assert_eq!(NamingPattern::LowerSnake.apply("user_name"), "user_name");
        assert_eq!(NamingPattern::LowerSnake.apply("HTTPServer"), "http_server");
        assert_eq!(NamingPattern::UpperSnake.apply("createTime"), "CREATE_TIME");
    }

    #[test]
    fn test_camel_conversions() {
        assert_eq!(NamingPattern::Camel.apply("user_name"), "userName");
        assert_eq!(NamingPattern::Camel.apply("USER_NAME"), "userName");
        assert_eq!(NamingPattern::Camel.apply("userName"), "userName");
        assert_eq!(NamingPattern::Camel.apply("ID"), "id");
        assert_eq!(NamingPattern::Camel.apply("_rank"), "rank");
    }

    #[test]
    fn test_parse_java_style_names() {
        assert_eq!("HUMP".parse::<NamingPattern>().unwrap(), NamingPattern::Camel);
        assert_eq!("lower-case".parse::<NamingPattern>().unwrap(), NamingPattern::LowerCase);
        assert!("kebab".parse::<NamingPattern>().is_err());
    }

    #[test]
    fn test_serde_aliases() {
        let pattern: NamingPattern = serde_json::from_str("\"UPPER_SNAKE\"").unwrap();
        assert_eq!(pattern, NamingPattern::UpperSnake);
        assert_eq!(serde_json::to_string(&NamingPattern::LowerSnake).unwrap(), "\"lower_snake\"");
    }
}
