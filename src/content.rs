//! The smallest serializable units of a MARC field.
//!
//! Field content is an ordered sequence of [`Atom`]s: coded or uncoded
//! subfields, ISBD punctuation literals, and positional blanks. An atom
//! renders differently depending on the output [`Mode`]:
//!
//! - **Display** (`.mrk`-style): subfields are prefixed with `$` + code,
//!   blanks render as a backslash.
//! - **Binary** (`.mrc`-style): subfields are prefixed with the ASCII Unit
//!   Separator (0x1F) + code, blanks render as a true space.
//!
//! Rendering is pure and total; the two modes must never be mixed within one
//! output.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// ASCII Unit Separator: delimits subfields in binary output.
pub const SUBFIELD_DELIMITER: char = '\u{1f}';
/// ASCII Record Separator: terminates each field in binary output.
pub const FIELD_TERMINATOR: char = '\u{1e}';
/// ASCII Group Separator: terminates each record in binary output.
pub const RECORD_TERMINATOR: char = '\u{1d}';

/// Output mode threaded through every render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Human-readable `.mrk`-style text.
    Display,
    /// ISO 2709 `.mrc`-style binary.
    Binary,
}

/// The smallest serializable unit of field content.
///
/// The variant set is closed; both render modes match exhaustively so a
/// missing case is a compile error rather than a runtime surprise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Atom {
    /// A subfield: an optional one/two-character code and a payload.
    ///
    /// A missing code means "raw literal" and is used for fixed-field
    /// control data (leader, 005, 008), which carries no subfield structure.
    Subfield {
        /// Subfield code (`a`, `b`, `6`, ...), or `None` for a raw literal.
        code: Option<String>,
        /// Subfield payload.
        value: String,
    },
    /// An ISBD punctuation literal such as `" :"`, `","`, `" ;"` or `"."`.
    ///
    /// See <https://www.itsmarc.com/crs/mergedprojects/lcri/lcri/1_0c__lcri.htm>
    Punctuation(String),
    /// A positional filler: backslash in display mode, space in binary mode.
    Blank,
}

impl Atom {
    /// Create a coded subfield.
    pub fn subfield(code: impl Into<String>, value: impl Into<String>) -> Self {
        Atom::Subfield {
            code: Some(code.into()),
            value: value.into(),
        }
    }

    /// Create an uncoded literal for fixed-field control data.
    pub fn literal(value: impl Into<String>) -> Self {
        Atom::Subfield {
            code: None,
            value: value.into(),
        }
    }

    /// Create an ISBD punctuation literal.
    pub fn punctuation(text: impl Into<String>) -> Self {
        Atom::Punctuation(text.into())
    }

    /// Render this atom in the given output mode.
    #[must_use]
    pub fn render(&self, mode: Mode) -> String {
        match self {
            Atom::Subfield { code: None, value } => value.clone(),
            Atom::Subfield {
                code: Some(code),
                value,
            } => match mode {
                Mode::Display => format!("${code}{value}"),
                Mode::Binary => format!("{SUBFIELD_DELIMITER}{code}{value}"),
            },
            Atom::Punctuation(text) => text.clone(),
            Atom::Blank => match mode {
                Mode::Display => "\\".to_string(),
                Mode::Binary => " ".to_string(),
            },
        }
    }
}

/// An ordered sequence of [`Atom`]s forming the body of one field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Content {
    atoms: SmallVec<[Atom; 4]>,
}

impl Content {
    /// Create empty content.
    #[must_use]
    pub fn new() -> Self {
        Content::default()
    }

    /// Append one atom.
    pub fn push(&mut self, atom: Atom) {
        self.atoms.push(atom);
    }

    /// Append a sequence of atoms.
    pub fn extend(&mut self, atoms: impl IntoIterator<Item = Atom>) {
        self.atoms.extend(atoms);
    }

    /// The atoms in order.
    #[must_use]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// True when no atoms have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Render all atoms in order in the given output mode.
    #[must_use]
    pub fn render(&self, mode: Mode) -> String {
        self.atoms.iter().map(|atom| atom.render(mode)).collect()
    }

    /// Whether a trailing ISBD period may be appended.
    ///
    /// Per cataloguing practice a free-text field ends with a period unless
    /// final punctuation is already present: this returns true iff the last
    /// non-whitespace character of the rendered text is not one of `?`, `!`
    /// or `.`. Empty content accepts a period.
    #[must_use]
    pub fn can_accept_period(&self) -> bool {
        match self.render(Mode::Display).trim_end().chars().last() {
            Some(last) => !matches!(last, '?' | '!' | '.'),
            None => true,
        }
    }
}

impl FromIterator<Atom> for Content {
    fn from_iter<I: IntoIterator<Item = Atom>>(iter: I) -> Self {
        Content {
            atoms: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subfield_render_display() {
        let atom = Atom::subfield("a", "Title");
        assert_eq!(atom.render(Mode::Display), "$aTitle");
    }

    #[test]
    fn test_subfield_render_binary() {
        let atom = Atom::subfield("a", "Title");
        assert_eq!(atom.render(Mode::Binary), "\u{1f}aTitle");
    }

    #[test]
    fn test_literal_renders_without_prefix_in_both_modes() {
        let atom = Atom::literal("00000nam");
        assert_eq!(atom.render(Mode::Display), "00000nam");
        assert_eq!(atom.render(Mode::Binary), "00000nam");
    }

    #[test]
    fn test_blank_render() {
        assert_eq!(Atom::Blank.render(Mode::Display), "\\");
        assert_eq!(Atom::Blank.render(Mode::Binary), " ");
    }

    #[test]
    fn test_punctuation_renders_verbatim() {
        let atom = Atom::punctuation(" :");
        assert_eq!(atom.render(Mode::Display), " :");
        assert_eq!(atom.render(Mode::Binary), " :");
    }

    #[test]
    fn test_content_renders_atoms_in_order() {
        let content: Content = [
            Atom::subfield("a", "Title"),
            Atom::punctuation(" :"),
            Atom::subfield("b", "subtitle"),
        ]
        .into_iter()
        .collect();
        assert_eq!(content.render(Mode::Display), "$aTitle :$bsubtitle");
        assert_eq!(content.render(Mode::Binary), "\u{1f}aTitle :\u{1f}bsubtitle");
    }

    #[test]
    fn test_can_accept_period_plain_text() {
        let content: Content = [Atom::subfield("a", "War")].into_iter().collect();
        assert!(content.can_accept_period());
    }

    #[test]
    fn test_can_accept_period_rejects_final_punctuation() {
        for ending in ["War.", "War?", "War!"] {
            let content: Content = [Atom::subfield("a", ending)].into_iter().collect();
            assert!(!content.can_accept_period(), "should reject {ending:?}");
        }
    }

    #[test]
    fn test_can_accept_period_ignores_trailing_whitespace() {
        let content: Content = [Atom::subfield("a", "War? ")].into_iter().collect();
        assert!(!content.can_accept_period());
    }

    #[test]
    fn test_can_accept_period_empty_content() {
        assert!(Content::new().can_accept_period());
    }
}
