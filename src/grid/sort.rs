use std::{
    cmp::Ordering,
    fmt,
};

use serde::Serialize;

use crate::{
    core::{
        unicode::display_name,
        GridConfig,
        KanjiGridError,
        OrderingMode,
        SortOrder,
        UnitMap,
        UnitProfile,
    },
    groups::{
        GroupSet,
        NamedGroup,
    },
};

/// `shown` of `total` units, with the percentage guarded against an empty total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Coverage {
    pub shown: usize,
    pub total: usize,
}

impl Coverage {
    pub fn percent(&self) -> f64 {
        self.shown as f64 * 100.0 / self.total.max(1) as f64
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} — {:.2}%", self.shown, self.total, self.percent())
    }
}

#[derive(Debug, Clone)]
pub struct GroupSection<'a> {
    pub label: String,
    pub units: Vec<&'a UnitProfile>,
    /// Declared members the learner has no cards for, in declared order.
    pub missing: Vec<char>,
    pub coverage: Coverage,
}

#[derive(Debug, Clone)]
pub struct GroupedView<'a> {
    pub group: &'a NamedGroup,
    pub sections: Vec<GroupSection<'a>>,
    pub other: GroupSection<'a>,
}

#[derive(Debug, Clone)]
pub enum Classification<'a> {
    Flat { order: SortOrder, units: Vec<&'a UnitProfile> },
    Grouped(GroupedView<'a>),
}

fn visible(unit: &UnitProfile, show_unseen: bool) -> bool {
    unit.is_reviewed() || show_unseen
}

/// Orders every unit by `order`. Ties keep map order since the sort is stable.
pub fn sort_units<'a>(
    units: &'a UnitMap,
    order: SortOrder,
    strong_interval: u32,
) -> Vec<&'a UnitProfile> {
    let mut sorted: Vec<&UnitProfile> = units.values().collect();
    let score = |unit: &UnitProfile| unit.sort_strength(strong_interval);

    match order {
        SortOrder::OrderFound => {
            sorted.sort_by(|a, b| a.first_seen.cmp(&b.first_seen).then(a.count.cmp(&b.count)));
        }
        SortOrder::Unicode => {
            sorted.sort_by_cached_key(|unit| (display_name(unit.value), unit.count));
        }
        SortOrder::Score => {
            sorted.sort_by(|a, b| score(*b).total_cmp(&score(*a)).then(b.count.cmp(&a.count)));
        }
        SortOrder::Frequency => {
            sorted.sort_by(|a, b| {
                b.count.cmp(&a.count).then_with(|| score(*b).total_cmp(&score(*a)))
            });
        }
    }

    sorted
}

fn first_seen_order(a: &&UnitProfile, b: &&UnitProfile) -> Ordering {
    a.first_seen.cmp(&b.first_seen).then(a.value.cmp(&b.value))
}

/// Splits units into one section per declared sublist plus a catch-all section.
pub fn group_units<'a>(
    units: &'a UnitMap,
    group: &'a NamedGroup,
    show_unseen: bool,
) -> GroupedView<'a> {
    let mut sections = Vec::with_capacity(group.sublists().len());
    let mut shown_total = 0;

    for entry in group.sublists() {
        let shown: Vec<&UnitProfile> = entry
            .members
            .iter()
            .filter_map(|member| units.get(member))
            .filter(|unit| visible(unit, show_unseen))
            .collect();
        let missing: Vec<char> =
            entry.members.iter().copied().filter(|member| !units.contains_key(member)).collect();

        shown_total += shown.len();
        sections.push(GroupSection {
            label: entry.label.clone(),
            coverage: Coverage { shown: shown.len(), total: entry.members.len() },
            units: shown,
            missing,
        });
    }

    let mut rest: Vec<&UnitProfile> = units
        .values()
        .filter(|unit| !group.declares(unit.value))
        .filter(|unit| visible(unit, show_unseen))
        .collect();
    rest.sort_by(first_seen_order);

    // The catch-all is measured against everything shown in the declared sections.
    let other = GroupSection {
        label: group.other_label().to_string(),
        coverage: Coverage { shown: rest.len(), total: shown_total },
        units: rest,
        missing: Vec::new(),
    };

    GroupedView { group, sections, other }
}

pub fn classify<'a>(
    units: &'a UnitMap,
    config: &GridConfig,
    groups: &'a GroupSet,
) -> Result<Classification<'a>, KanjiGridError> {
    match config.ordering {
        OrderingMode::Flat(order) => {
            let units = sort_units(units, order, config.strong_interval)
                .into_iter()
                .filter(|unit| visible(unit, config.show_unseen))
                .collect();
            Ok(Classification::Flat { order, units })
        }
        OrderingMode::Grouped(index) => {
            let group = groups.get(index)?;
            Ok(Classification::Grouped(group_units(units, group, config.show_unseen)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::groups::GroupEntry;

    fn unit(value: char, first_seen: u64, count: u32, avg_interval: f64) -> UnitProfile {
        UnitProfile {
            value,
            first_seen: Some(first_seen),
            count,
            avg_interval,
            due: None,
            original_due: None,
            last_change: None,
        }
    }

    fn map(units: Vec<UnitProfile>) -> UnitMap {
        units.into_iter().map(|u| (u.value, u)).collect()
    }

    fn values(units: &[&UnitProfile]) -> String {
        units.iter().map(|u| u.value).collect()
    }

    fn sample_group() -> NamedGroup {
        NamedGroup {
            name: "Test".to_string(),
            language: "ja".to_string(),
            source: "test data".to_string(),
            data: vec![
                GroupEntry::new("Other", ""),
                GroupEntry::new("First", "一二"),
                GroupEntry::new("Second", "三四五"),
                GroupEntry::new("Third", "六七八"),
            ],
        }
    }

    #[test]
    fn frequency_ties_break_on_strength() {
        // 60 days against 21 scores ~0.93, 5 days ~0.35
        let units = map(vec![unit('B', 1, 5, 5.0), unit('A', 2, 5, 60.0), unit('C', 3, 9, 1.0)]);
        let sorted = sort_units(&units, SortOrder::Frequency, 21);
        assert_eq!(values(&sorted), "CAB");
    }

    #[test]
    fn score_orders_descending_then_count() {
        let units = map(vec![unit('x', 1, 1, 10.0), unit('y', 2, 3, 10.0), unit('z', 3, 1, 90.0)]);
        let sorted = sort_units(&units, SortOrder::Score, 21);
        assert_eq!(values(&sorted), "zyx");
    }

    #[test]
    fn order_found_and_unicode_are_ascending() {
        let units =
            map(vec![unit('本', 30, 1, 1.0), unit('日', 10, 1, 1.0), unit('一', 20, 1, 1.0)]);
        assert_eq!(values(&sort_units(&units, SortOrder::OrderFound, 21)), "日一本");
        assert_eq!(values(&sort_units(&units, SortOrder::Unicode, 21)), "一日本");
    }

    #[test]
    fn flat_mode_hides_unseen_unless_requested() {
        let units = map(vec![unit('日', 1, 0, 0.0), unit('月', 2, 2, 4.0)]);
        let groups = GroupSet::default();
        let mut config = GridConfig::default();
        config.ordering = OrderingMode::Flat(SortOrder::OrderFound);

        match classify(&units, &config, &groups).unwrap() {
            Classification::Flat { units, .. } => assert_eq!(values(&units), "月"),
            other => panic!("Expected Flat, got {:?}", other),
        }

        config.show_unseen = true;
        match classify(&units, &config, &groups).unwrap() {
            Classification::Flat { units, .. } => assert_eq!(values(&units), "日月"),
            other => panic!("Expected Flat, got {:?}", other),
        }
    }

    #[test]
    fn grouped_coverage_counts_reviewed_members() {
        let group = sample_group();
        let units = map(vec![
            unit('三', 1, 2, 3.0),
            unit('四', 2, 1, 9.0),
            unit('六', 3, 0, 0.0),
            unit('七', 4, 4, 30.0),
            unit('猫', 5, 1, 2.0),
        ]);

        let view = group_units(&units, &group, false);
        assert_eq!(view.sections.len(), 3);

        let second = &view.sections[1];
        assert_eq!(values(&second.units), "三四");
        assert_eq!(second.coverage.to_string(), "2 of 3 — 66.67%");

        // 六 has no reviews: hidden and not counted, but still declared
        let third = &view.sections[2];
        assert_eq!(values(&third.units), "七");
        assert_eq!(third.coverage, Coverage { shown: 1, total: 3 });
        assert_eq!(third.missing, vec!['八']);

        assert_eq!(values(&view.other.units), "猫");
        assert_eq!(view.other.coverage, Coverage { shown: 1, total: 3 });
    }

    #[test]
    fn show_unseen_includes_unreviewed_members() {
        let group = sample_group();
        let units = map(vec![unit('六', 3, 0, 0.0), unit('七', 4, 4, 30.0)]);
        let view = group_units(&units, &group, true);
        assert_eq!(view.sections[2].coverage.to_string(), "2 of 3 — 66.67%");
        assert_eq!(view.sections[0].missing, vec!['一', '二']);
    }

    #[test]
    fn empty_catch_all_does_not_divide_by_zero() {
        let group = sample_group();
        let units = UnitMap::new();
        let view = group_units(&units, &group, false);
        assert_eq!(view.other.coverage.to_string(), "0 of 0 — 0.00%");
    }

    #[test]
    fn grouped_selector_out_of_range_is_rejected() {
        let units = UnitMap::new();
        let groups = GroupSet::builtin();
        let mut config = GridConfig::default();
        config.ordering = OrderingMode::Grouped(1);
        assert!(matches!(
            classify(&units, &config, &groups),
            Err(KanjiGridError::InvalidGroupSelector { index: 1, available: 1 })
        ));
    }
}
