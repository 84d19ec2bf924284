use std::{
    collections::BTreeSet,
    fs,
    path::Path,
};

use super::KanjiGridError;

/// Punctuation, digits and markup characters that are never tracked as units.
pub const DEFAULT_IGNORED_UNITS: &str = concat!(
    " \t\r\n\u{3000}",
    "0123456789０１２３４５６７８９",
    "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~",
    "、。，．・：；？！゛゜´｀¨＾￣＿ヽヾゝゞ〃〆〇ー―‐／＼～∥｜…‥",
    "‘’“”（）〔〕［］｛｝〈〉《》「」『』【】＋－±×÷＝≠＜＞",
    "￥＄％＃＆＊＠§☆★○●◎◇◆□■△▲▽▼※〒→←↑↓〜",
);

#[derive(Debug, Clone, PartialEq)]
pub struct IgnoreList {
    units: BTreeSet<char>,
}

impl Default for IgnoreList {
    fn default() -> Self {
        Self { units: DEFAULT_IGNORED_UNITS.chars().collect() }
    }
}

impl IgnoreList {
    pub fn empty() -> Self {
        Self { units: BTreeSet::new() }
    }

    pub fn with_units(mut self, units: impl IntoIterator<Item = char>) -> Self {
        self.units.extend(units);
        self
    }

    /// Returns `true` if the unit was not already ignored.
    pub fn add(&mut self, unit: char) -> bool {
        self.units.insert(unit)
    }

    pub fn remove(&mut self, unit: char) -> bool {
        self.units.remove(&unit)
    }

    pub fn contains(&self, unit: char) -> bool {
        self.units.contains(&unit)
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Every non-whitespace character on every line becomes an ignored unit.
    pub fn load_units_from_file(path: impl AsRef<Path>) -> Result<Vec<char>, KanjiGridError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            KanjiGridError::Custom(format!("Failed to read ignore file {}: {}", path.display(), e))
        })?;

        Ok(content
            .lines()
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .flat_map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn default_list_skips_punctuation_but_not_kanji() {
        let ignore = IgnoreList::default();
        assert!(ignore.contains('。'));
        assert!(ignore.contains('<'));
        assert!(ignore.contains('\u{3000}'));
        assert!(!ignore.contains('日'));
        assert!(!ignore.contains('あ'));
    }

    #[test]
    fn add_and_remove_report_changes() {
        let mut ignore = IgnoreList::empty();
        assert!(ignore.is_empty());
        assert!(ignore.add('人'));
        assert!(!ignore.add('人'));
        assert!(ignore.contains('人'));
        assert!(ignore.remove('人'));
        assert!(!ignore.contains('人'));
    }

    #[test]
    fn loads_units_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "一 二").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "三").unwrap();

        let units = IgnoreList::load_units_from_file(file.path()).unwrap();
        assert_eq!(units, vec!['一', '二', '三']);

        let ignore = IgnoreList::empty().with_units(units);
        assert_eq!(ignore.len(), 3);
    }

    #[test]
    fn missing_file_is_an_error() {
        let result = IgnoreList::load_units_from_file("/nonexistent/kanjigrid-ignore.txt");
        assert!(matches!(result, Err(KanjiGridError::Custom(_))));
    }
}
