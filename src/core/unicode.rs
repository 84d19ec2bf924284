//! Character naming for grid units.
//!
//! The ideograph blocks carry algorithmic Unicode names, derived here from
//! their ranges. Other characters are looked up in the Unicode name table,
//! and characters without a name fall back to their `U+XXXX` label.

const UNIFIED_RANGES: &[(u32, u32)] = &[
    (0x3400, 0x4DBF),
    (0x4E00, 0x9FFF),
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2B739),
    (0x2B740, 0x2B81D),
    (0x2B820, 0x2CEA1),
    (0x2CEB0, 0x2EBE0),
    (0x2EBF0, 0x2EE5D),
    (0x30000, 0x3134A),
    (0x31350, 0x323AF),
];

const COMPATIBILITY_RANGES: &[(u32, u32)] =
    &[(0xF900, 0xFA6D), (0xFA70, 0xFAD9), (0x2F800, 0x2FA1D)];

fn in_ranges(ranges: &[(u32, u32)], code: u32) -> bool {
    ranges.iter().any(|&(start, end)| (start..=end).contains(&code))
}

/// Unicode character name, when it can be derived.
pub fn canonical_name(unit: char) -> Option<String> {
    let code = unit as u32;
    if in_ranges(UNIFIED_RANGES, code) {
        Some(format!("CJK UNIFIED IDEOGRAPH-{:04X}", code))
    } else if in_ranges(COMPATIBILITY_RANGES, code) {
        Some(format!("CJK COMPATIBILITY IDEOGRAPH-{:04X}", code))
    } else {
        None
    }
}

pub fn codepoint_label(unit: char) -> String {
    format!("U+{:04X}", unit as u32)
}

/// Name used for tooltips and unicode ordering.
pub fn display_name(unit: char) -> String {
    canonical_name(unit)
        .or_else(|| unicode_names2::name(unit).map(|name| name.to_string()))
        .unwrap_or_else(|| codepoint_label(unit))
}

/// Units without a derivable name never classify as ideographs.
pub fn is_ideograph(unit: char) -> bool {
    canonical_name(unit).is_some()
}
