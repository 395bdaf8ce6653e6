//! MARC variable fields: tag, indicators, content, and an ordering key.

use crate::content::{Atom, Content, Mode, FIELD_TERMINATOR};
use serde::{Deserialize, Serialize};

/// Tag reserved for the record leader; displayed as `LDR`.
pub const LEADER_TAG: u16 = 0;

/// One indicator position of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Indicator {
    /// A literal digit value.
    Value(u8),
    /// A blank indicator: backslash in display mode, space in binary mode.
    Blank,
    /// The indicator position does not exist for this field (control
    /// fields); renders as the empty string in both modes.
    Absent,
}

impl Indicator {
    /// Render this indicator in the given output mode.
    #[must_use]
    pub fn render(self, mode: Mode) -> String {
        match self {
            Indicator::Value(digit) => digit.to_string(),
            Indicator::Blank => Atom::Blank.render(mode),
            Indicator::Absent => String::new(),
        }
    }
}

/// A MARC variable field: tag, two indicators, content, and a tie-break
/// ordinal used when several fields share a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field tag; [`LEADER_TAG`] (0) is reserved for the leader.
    pub tag: u16,
    /// First indicator.
    pub indicator1: Indicator,
    /// Second indicator.
    pub indicator2: Indicator,
    /// Ordered field body.
    pub content: Content,
    /// Secondary sort key among fields sharing a tag. Not time of creation:
    /// a builder emitting several fields under one tag sets this to control
    /// their relative order.
    pub ordering: u8,
}

impl Field {
    /// Create a field with the default ordering of 1.
    #[must_use]
    pub fn new(tag: u16, indicator1: Indicator, indicator2: Indicator, content: Content) -> Self {
        Field {
            tag,
            indicator1,
            indicator2,
            content,
            ordering: 1,
        }
    }

    /// Set the tie-break ordinal.
    #[must_use]
    pub fn with_ordering(mut self, ordering: u8) -> Self {
        self.ordering = ordering;
        self
    }

    /// Sort key grouping same-tag repeats while letting a builder order its
    /// own repeats: `tag * 10 + ordering`.
    #[must_use]
    pub fn sort_key(&self) -> u32 {
        u32::from(self.tag) * 10 + u32::from(self.ordering)
    }

    /// Whether a trailing ISBD period may be appended to this field's content.
    #[must_use]
    pub fn can_accept_period(&self) -> bool {
        self.content.can_accept_period()
    }

    /// Render the field in the given output mode.
    ///
    /// Display mode prefixes `=NNN␠␠` (or `=LDR␠␠` for the leader) before the
    /// indicators and content. Binary mode has no tag prefix (the tag lives
    /// in the record directory) and appends the field terminator (0x1E).
    #[must_use]
    pub fn render(&self, mode: Mode) -> String {
        let i1 = self.indicator1.render(mode);
        let i2 = self.indicator2.render(mode);
        let body = self.content.render(mode);
        match mode {
            Mode::Display => {
                let tag = if self.tag == LEADER_TAG {
                    "LDR".to_string()
                } else {
                    format!("{:03}", self.tag)
                };
                format!("={tag}  {i1}{i2}{body}")
            }
            Mode::Binary => format!("{i1}{i2}{body}{FIELD_TERMINATOR}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title_field() -> Field {
        let content: Content = [
            Atom::subfield("a", "The Art of War"),
            Atom::punctuation("."),
        ]
        .into_iter()
        .collect();
        Field::new(245, Indicator::Value(0), Indicator::Value(4), content)
    }

    #[test]
    fn test_render_display_with_tag_prefix() {
        assert_eq!(
            title_field().render(Mode::Display),
            "=245  04$aThe Art of War."
        );
    }

    #[test]
    fn test_render_binary_has_no_tag_and_ends_with_terminator() {
        assert_eq!(
            title_field().render(Mode::Binary),
            "04\u{1f}aThe Art of War.\u{1e}"
        );
    }

    #[test]
    fn test_leader_tag_displays_as_ldr() {
        let content: Content = [Atom::literal("00000nam")].into_iter().collect();
        let field = Field::new(LEADER_TAG, Indicator::Absent, Indicator::Absent, content);
        assert_eq!(field.render(Mode::Display), "=LDR  00000nam");
    }

    #[test]
    fn test_blank_indicators() {
        let content: Content = [Atom::subfield("a", "volume")].into_iter().collect();
        let field = Field::new(338, Indicator::Blank, Indicator::Blank, content);
        assert_eq!(field.render(Mode::Display), "=338  \\\\$avolume");
        assert_eq!(field.render(Mode::Binary), "  \u{1f}avolume\u{1e}");
    }

    #[test]
    fn test_absent_indicators_render_empty() {
        let content: Content = [Atom::literal("20200930123755.0")].into_iter().collect();
        let field = Field::new(5, Indicator::Absent, Indicator::Absent, content);
        assert_eq!(field.render(Mode::Display), "=005  20200930123755.0");
        assert_eq!(field.render(Mode::Binary), "20200930123755.0\u{1e}");
    }

    #[test]
    fn test_sort_key_groups_tags_and_orders_repeats() {
        let content = Content::new();
        let first = Field::new(264, Indicator::Blank, Indicator::Value(1), content.clone());
        let second =
            Field::new(264, Indicator::Blank, Indicator::Value(4), content).with_ordering(2);
        assert!(first.sort_key() < second.sort_key());
        assert_eq!(first.sort_key(), 2641);
        assert_eq!(second.sort_key(), 2642);
    }
}
