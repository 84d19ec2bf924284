//! Curriculum groupings (school grades, proficiency levels) used by grouped grids.
//!
//! Group files are JSON or HJSON documents of the form
//!
//! ```hjson
//! {
//!   groups: [
//!     {
//!       name: Kyōiku
//!       lang: ja
//!       source: Kyōiku kanji https://en.wikipedia.org/wiki/Ky%C5%8Diku_kanji
//!       data: [
//!         ["Non-Kyōiku", ""]
//!         ["Grade 1", "一右雨円..."]
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! The first `data` entry names the catch-all section and its members are ignored.

use std::{
    collections::HashSet,
    fs,
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::KanjiGridError;

const GRADE_ONE: &str = "一右雨円王音下火花貝学気九休玉金空月犬見五口校左三山子四糸字耳七車手十出女小上森人水正生青夕石赤千川先早草足村大男竹中虫町天田土二日入年白八百文木本名目立力林六";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawGroupEntry", into = "RawGroupEntry")]
pub struct GroupEntry {
    pub label: String,
    pub members: Vec<char>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawGroupEntry(String, String);

impl From<RawGroupEntry> for GroupEntry {
    fn from(raw: RawGroupEntry) -> Self {
        GroupEntry::new(&raw.0, &raw.1)
    }
}

impl From<GroupEntry> for RawGroupEntry {
    fn from(entry: GroupEntry) -> Self {
        RawGroupEntry(entry.label, entry.members.into_iter().collect())
    }
}

impl GroupEntry {
    /// Whitespace is dropped and repeated members keep their first position.
    pub fn new(label: &str, members: &str) -> Self {
        let mut seen = HashSet::new();
        let members = members.chars().filter(|c| !c.is_whitespace() && seen.insert(*c)).collect();
        Self { label: label.to_string(), members }
    }

    pub fn contains(&self, unit: char) -> bool {
        self.members.contains(&unit)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedGroup {
    pub name: String,
    #[serde(rename = "lang")]
    pub language: String,
    #[serde(default)]
    pub source: String,
    pub data: Vec<GroupEntry>,
}

impl NamedGroup {
    /// Label of the catch-all section.
    pub fn other_label(&self) -> &str {
        self.data.first().map(|entry| entry.label.as_str()).unwrap_or("Other")
    }

    /// The declared sublists, skipping the catch-all entry.
    pub fn sublists(&self) -> &[GroupEntry] {
        self.data.get(1..).unwrap_or(&[])
    }

    pub fn declares(&self, unit: char) -> bool {
        self.sublists().iter().any(|entry| entry.contains(unit))
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct GroupsData {
    groups: Vec<NamedGroup>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSet {
    groups: Vec<NamedGroup>,
}

impl GroupSet {
    pub fn new(groups: Vec<NamedGroup>) -> Self {
        Self { groups }
    }

    pub fn builtin() -> Self {
        Self::new(vec![NamedGroup {
            name: "Kyōiku (grade 1)".to_string(),
            language: "ja".to_string(),
            source: "Kyōiku kanji https://en.wikipedia.org/wiki/Ky%C5%8Diku_kanji".to_string(),
            data: vec![GroupEntry::new("Non-Kyōiku", ""), GroupEntry::new("Grade 1", GRADE_ONE)],
        }])
    }

    pub fn from_json_str(content: &str) -> Result<Self, KanjiGridError> {
        let data: GroupsData = serde_json::from_str(content)?;
        Ok(Self::new(data.groups))
    }

    pub fn from_hjson_str(content: &str) -> Result<Self, KanjiGridError> {
        let data: GroupsData = serde_hjson::from_str(content)?;
        Ok(Self::new(data.groups))
    }

    /// `.json` files are parsed strictly, anything else as HJSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KanjiGridError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let is_json = path.extension().map_or(false, |ext| ext.eq_ignore_ascii_case("json"));
        let set =
            if is_json { Self::from_json_str(&content)? } else { Self::from_hjson_str(&content)? };
        log::info!("Loaded {} group(s) from {}", set.len(), path.display());
        Ok(set)
    }

    pub fn extend(&mut self, other: GroupSet) {
        self.groups.extend(other.groups);
    }

    pub fn get(&self, index: usize) -> Result<&NamedGroup, KanjiGridError> {
        self.groups.get(index).ok_or(KanjiGridError::InvalidGroupSelector {
            index,
            available: self.groups.len(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedGroup> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SAMPLE_HJSON: &str = r#"
    {
      groups: [
        {
          name: Numbers
          lang: zh
          source: "made up"
          data: [
            ["Other", ""]
            ["Small", "一二三 三"]
            ["Large", "百千万"]
          ]
        }
      ]
    }
    "#;

    #[test]
    fn builtin_grade_one_is_complete() {
        let set = GroupSet::builtin();
        let group = set.get(0).unwrap();
        assert_eq!(group.other_label(), "Non-Kyōiku");
        assert_eq!(group.sublists().len(), 1);
        assert_eq!(group.sublists()[0].members.len(), 80);
        assert!(group.declares('森'));
        assert!(!group.declares('語'));
    }

    #[test]
    fn parses_hjson_and_dedupes_members() {
        let set = GroupSet::from_hjson_str(SAMPLE_HJSON).unwrap();
        let group = set.get(0).unwrap();
        assert_eq!(group.language, "zh");
        assert_eq!(group.sublists()[0].members, vec!['一', '二', '三']);
        assert_eq!(group.sublists()[1].label, "Large");
    }

    #[test]
    fn out_of_range_selector_is_rejected() {
        let set = GroupSet::builtin();
        match set.get(3) {
            Err(KanjiGridError::InvalidGroupSelector { index, available }) => {
                assert_eq!(index, 3);
                assert_eq!(available, 1);
            }
            other => panic!("Expected InvalidGroupSelector, got {:?}", other),
        }
    }

    #[test]
    fn loads_json_file_by_extension() {
        let json = serde_json::to_string(&GroupsData {
            groups: GroupSet::builtin().groups,
        })
        .unwrap();
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let loaded = GroupSet::load(file.path()).unwrap();
        assert_eq!(loaded, GroupSet::builtin());
    }
}
