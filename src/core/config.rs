use std::{
    fmt,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::KanjiGridError;
use crate::groups::GroupSet;

pub const DEFAULT_STRONG_INTERVAL: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    OrderFound,
    Unicode,
    Score,
    Frequency,
}

impl SortOrder {
    pub const ALL: [SortOrder; 4] =
        [SortOrder::OrderFound, SortOrder::Unicode, SortOrder::Score, SortOrder::Frequency];

    pub fn pretty_name(self) -> &'static str {
        match self {
            SortOrder::OrderFound => "order found",
            SortOrder::Unicode => "unicode order",
            SortOrder::Score => "score",
            SortOrder::Frequency => "frequency",
        }
    }

    fn token(self) -> &'static str {
        match self {
            SortOrder::OrderFound => "order-found",
            SortOrder::Unicode => "unicode",
            SortOrder::Score => "score",
            SortOrder::Frequency => "frequency",
        }
    }
}

/// Either one flat grid in a given order, or a grid per sublist of a named group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingMode {
    Flat(SortOrder),
    Grouped(usize),
}

impl Default for OrderingMode {
    fn default() -> Self {
        OrderingMode::Flat(SortOrder::Score)
    }
}

impl fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderingMode::Flat(order) => write!(f, "{}", order.token()),
            OrderingMode::Grouped(index) => write!(f, "group:{}", index),
        }
    }
}

impl FromStr for OrderingMode {
    type Err = KanjiGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_lowercase();
        if let Some(index) = token.strip_prefix("group:") {
            return index.parse::<usize>().map(OrderingMode::Grouped).map_err(|_| {
                KanjiGridError::InvalidConfig(format!("invalid group index '{}'", index))
            });
        }

        SortOrder::ALL
            .iter()
            .find(|order| order.token() == token)
            .map(|order| OrderingMode::Flat(*order))
            .ok_or_else(|| KanjiGridError::InvalidConfig(format!("unknown ordering '{}'", s)))
    }
}

/// A lower-cased note field name to scan for units.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldPattern(String);

impl FieldPattern {
    pub fn new(name: &str) -> Self {
        Self(name.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn matches(&self, field_name: &str) -> bool {
        field_name.to_lowercase() == self.0
    }

    /// Splits a field box like `kanji "front side" 'back side'` into lower-cased
    /// names, following shell quoting: single quotes are literal, backslash
    /// escapes the next character, and adjacent quoted pieces join one word.
    pub fn parse_list(input: &str) -> Result<Vec<FieldPattern>, KanjiGridError> {
        let mut names = Vec::new();
        let mut current = String::new();
        let mut in_word = false;
        let lowered = input.to_lowercase();
        let mut chars = lowered.chars();

        while let Some(c) = chars.next() {
            match c {
                c if c.is_whitespace() => {
                    if in_word {
                        names.push(std::mem::take(&mut current));
                        in_word = false;
                    }
                }
                '\\' => {
                    in_word = true;
                    if let Some(escaped) = chars.next() {
                        current.push(escaped);
                    }
                }
                '\'' => {
                    in_word = true;
                    loop {
                        match chars.next() {
                            Some('\'') => break,
                            Some(c) => current.push(c),
                            None => return Err(unbalanced(input, '\'')),
                        }
                    }
                }
                '"' => {
                    in_word = true;
                    loop {
                        match chars.next() {
                            Some('"') => break,
                            Some('\\') => match chars.next() {
                                Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                                Some('\n') => {}
                                Some(c) => {
                                    current.push('\\');
                                    current.push(c);
                                }
                                None => return Err(unbalanced(input, '"')),
                            },
                            Some(c) => current.push(c),
                            None => return Err(unbalanced(input, '"')),
                        }
                    }
                }
                c => {
                    in_word = true;
                    current.push(c);
                }
            }
        }
        if in_word {
            names.push(current);
        }

        Ok(names
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(FieldPattern::new)
            .collect())
    }
}

fn unbalanced(input: &str, quote: char) -> KanjiGridError {
    KanjiGridError::InvalidConfig(format!("unclosed {} quote in field list '{}'", quote, input))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub deck: String,
    pub fields: Vec<FieldPattern>,
    pub strong_interval: u32,
    pub ordering: OrderingMode,
    pub show_unseen: bool,
    pub kanji_only: bool,
    pub tooltips: bool,
    pub language: String,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            deck: "*".to_string(),
            fields: vec![FieldPattern::new("kanji")],
            strong_interval: DEFAULT_STRONG_INTERVAL,
            ordering: OrderingMode::default(),
            show_unseen: false,
            kanji_only: true,
            tooltips: true,
            language: "ja".to_string(),
        }
    }
}

impl GridConfig {
    pub fn validate(&self, groups: &GroupSet) -> Result<(), KanjiGridError> {
        if self.strong_interval == 0 {
            return Err(KanjiGridError::InvalidConfig(
                "strong interval must be at least 1 day".to_string(),
            ));
        }
        if self.fields.is_empty() {
            return Err(KanjiGridError::InvalidConfig("no fields to scan".to_string()));
        }
        if let OrderingMode::Grouped(index) = self.ordering {
            groups.get(index)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(input: &str) -> Vec<String> {
        FieldPattern::parse_list(input)
            .unwrap()
            .iter()
            .map(|field| field.as_str().to_string())
            .collect()
    }

    #[test]
    fn parses_quoted_field_lists() {
        let fields = FieldPattern::parse_list(r#"Kanji "Front Side"  expression"#).unwrap();
        let names: Vec<&str> = fields.iter().map(|f| f.as_str()).collect();
        assert_eq!(names, vec!["kanji", "front side", "expression"]);
        assert!(fields[1].matches("FRONT SIDE"));
        assert!(!fields[0].matches("Kanji2"));
    }

    #[test]
    fn field_lists_follow_shell_quoting() {
        assert_eq!(names("'front side' kanji"), vec!["front side", "kanji"]);
        assert_eq!(names(r"front\ side 'it''s'"), vec!["front side", "its"]);
        assert_eq!(names(r#""say \"hi\"" 'a\b'"#), vec![r#"say "hi""#, r"a\b"]);
        assert_eq!(names("Front' 'Side"), vec!["front side"]);
        assert!(names("  ").is_empty());
    }

    #[test]
    fn unclosed_quotes_are_rejected() {
        assert!(matches!(
            FieldPattern::parse_list("'front side kanji"),
            Err(KanjiGridError::InvalidConfig(_))
        ));
        assert!(FieldPattern::parse_list(r#"kanji "front"#).is_err());
    }

    #[test]
    fn parses_ordering_tokens() {
        assert_eq!(
            "unicode".parse::<OrderingMode>().unwrap(),
            OrderingMode::Flat(SortOrder::Unicode)
        );
        assert_eq!("Group:2".parse::<OrderingMode>().unwrap(), OrderingMode::Grouped(2));
        assert!("group:x".parse::<OrderingMode>().is_err());
        assert!("alphabetical".parse::<OrderingMode>().is_err());

        for order in SortOrder::ALL {
            let mode = OrderingMode::Flat(order);
            assert_eq!(mode.to_string().parse::<OrderingMode>().unwrap(), mode);
        }
    }

    #[test]
    fn validation_rejects_bad_values() {
        let groups = GroupSet::builtin();

        let mut config = GridConfig::default();
        assert!(config.validate(&groups).is_ok());

        config.strong_interval = 0;
        assert!(matches!(config.validate(&groups), Err(KanjiGridError::InvalidConfig(_))));

        config.strong_interval = 21;
        config.ordering = OrderingMode::Grouped(groups.len());
        assert!(matches!(
            config.validate(&groups),
            Err(KanjiGridError::InvalidGroupSelector { .. })
        ));
    }

    #[test]
    fn partial_settings_fill_in_defaults() {
        let config: GridConfig =
            serde_json::from_str(r#"{ "strong_interval": 30, "ordering": { "grouped": 0 } }"#)
                .unwrap();
        assert_eq!(config.strong_interval, 30);
        assert_eq!(config.ordering, OrderingMode::Grouped(0));
        assert_eq!(config.language, "ja");
        assert!(config.kanji_only);
    }
}
