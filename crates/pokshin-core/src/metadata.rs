//! Static per-group lookup tables.

use crate::domain::{Genre, GroupId, GroupMeta};

/// Background image of the landing view.
pub const HOME_IMAGE: &str = "./home.jpg";

pub const GENRES: [Genre; 5] = [
    Genre::Daily,
    Genre::Fantasy,
    Genre::Myth,
    Genre::Disaster,
    Genre::Period,
];

/// Swatches offered by the composer's color picker.
pub const TEXT_COLORS: [&str; 30] = [
    "#000000", "#4B5563", "#9CA3AF", "#EF4444", "#F87171", "#B91C1C", "#F97316", "#FB923C",
    "#F59E0B", "#EAB308", "#84CC16", "#22C55E", "#16A34A", "#10B981", "#14B8A6", "#06B6D4",
    "#0EA5E9", "#3B82F6", "#1D4ED8", "#6366F1", "#8B5CF6", "#A855F7", "#D946EF", "#EC4899",
    "#F43F5E", "#BE185D", "#92400E", "#78350F", "#64748B", "#334155",
];

static GROUPS: [GroupMeta; 4] = [
    GroupMeta {
        id: GroupId::Oneus,
        image: "./5.jpg",
        color: "from-blue-600 to-indigo-900",
        description: "Archive for TOMOON",
    },
    GroupMeta {
        id: GroupId::Onf,
        image: "./6.jpg",
        color: "from-sky-100 to-blue-50",
        description: "Archive for FUSE",
    },
    GroupMeta {
        id: GroupId::Verivery,
        image: "./73.jpg",
        color: "from-slate-800 to-slate-950",
        description: "Archive for VERRER",
    },
    GroupMeta {
        id: GroupId::P1harmony,
        image: "./6.jpg",
        color: "from-cyan-50 to-white",
        description: "Archive for P1ece",
    },
];

pub fn groups() -> &'static [GroupMeta] {
    &GROUPS
}

pub fn group_meta(id: GroupId) -> &'static GroupMeta {
    // GROUPS is declared in GroupId::ALL order.
    &GROUPS[GroupId::ALL.iter().position(|g| *g == id).unwrap_or_default()]
}

/// Pairings offered for a group; empty for an unknown id.
pub fn pairing_options(group_id: &str) -> &'static [&'static str] {
    match group_id {
        "ONEUS" => &["섷숀", "섷걶", "호학"],
        "ONF" => &["션윹"],
        "VERIVERY" => &["묭헌", "묭깡"],
        "P1HARMONY" => &["쫑테", "종쏠섭", "탁테", "웅양", "쏠키", "키즁"],
        _ => &[],
    }
}

/// Pen names offered for a group; empty for an unknown id.
pub fn pen_name_options(group_id: &str) -> &'static [&'static str] {
    match group_id {
        "ONEUS" => &["이백도", "dawn"],
        "ONF" => &["이겨울"],
        "VERIVERY" => &["김리베"],
        "P1HARMONY" => &["모히또", "란"],
        _ => &[],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pen_name_for_onf() {
        assert_eq!(pen_name_options("ONF"), &["이겨울"]);
    }

    #[test]
    fn test_unknown_group_has_no_options() {
        assert!(pairing_options("UNKNOWN").is_empty());
        assert!(pen_name_options("UNKNOWN").is_empty());
    }

    #[test]
    fn test_every_group_has_options_and_meta() {
        for id in GroupId::ALL {
            assert!(!pairing_options(id.as_str()).is_empty());
            assert!(!pen_name_options(id.as_str()).is_empty());
            assert_eq!(group_meta(id).id, id);
        }
        assert_eq!(groups().len(), GroupId::ALL.len());
    }

    #[test]
    fn test_palette_colors_parse() {
        for swatch in TEXT_COLORS {
            assert!(swatch.parse::<crate::domain::Color>().is_ok(), "{swatch}");
        }
    }
}
