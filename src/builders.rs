//! The ordered field-builder pipeline.
//!
//! Each builder derives one MARC field (or a small family of sibling fields)
//! from a [`Record`]. The pipeline applies them in a fixed order, collects
//! linked alternate-script fields generated along the way, and finishes with
//! a stable sort on `tag * 10 + ordering` so repeats of a tag keep the
//! relative order their builder chose.
//!
//! A builder never fails: it returns [`BuildOutcome::Absent`] when it has
//! nothing to emit, and the driver decides whether that is fatal (mandatory
//! fields) or silently skipped (optional fields).

use crate::content::{Atom, Content};
use crate::error::{MarcError, Result};
use crate::field::{Field, Indicator, LEADER_TAG};
use crate::normalize::check_for_detailed_region;
use crate::record::Record;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Manual non-filing marker: `The @@Art of War` files under `Art`.
const NONFILING_MARKER: &str = "@@";

lazy_static! {
    /// Per-language initial-article patterns for non-filing detection.
    ///
    /// Each pattern anchors at the start of the title. The article must be
    /// followed by a space, one punctuation character, or both (`The Art`,
    /// `The "Word"`), so a bare prefix like `Art` never matches `a`; an
    /// elided article (`l'`, `un'`) attaches directly to the next word.
    /// Keyed by MARC language code; a language without an entry files every
    /// title from position 0.
    static ref NONFILING_ARTICLES: HashMap<&'static str, Vec<Regex>> = {
        let articles: [(&str, &[&str]); 10] = [
            ("eng", &["the", "a", "an"]),
            ("fre", &["le", "la", "les", "l'", "un", "une"]),
            ("ita", &["lo", "il", "i", "l'", "gli", "le", "un", "una", "un'"]),
            ("spa", &["el", "la", "las", "los", "un", "una", "unos", "unas"]),
            ("ger", &["der", "die", "das", "ein", "eine"]),
            ("dut", &["de", "het"]),
            ("swe", &["en", "ett", "den", "det", "de"]),
            ("dan", &["en", "et"]),
            ("nor", &["en", "ei", "et"]),
            ("chi", &[]),
        ];
        articles
            .into_iter()
            .map(|(lang, words)| {
                let patterns = words
                    .iter()
                    .map(|word| {
                        let escaped = regex::escape(word);
                        let pattern = if word.ends_with('\'') {
                            format!(r"(?i)^({escaped}\s?)\w")
                        } else {
                            format!(r"(?i)^({escaped}(?:\s[^\w\s]?|[^\w\s]))\w")
                        };
                        Regex::new(&pattern).expect("article pattern")
                    })
                    .collect();
                (lang, patterns)
            })
            .collect()
    };
}

/// What one builder produced for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// One or more fields; siblings (264 with copyright) come out together.
    Built(Vec<Field>),
    /// The builder has nothing to emit for this record.
    Absent {
        /// MARC tag the builder is responsible for.
        tag: u16,
        /// Optional explanation; empty means the driver supplies a generic
        /// message when the field was mandatory.
        message: String,
    },
}

impl BuildOutcome {
    fn built(field: Field) -> Self {
        BuildOutcome::Built(vec![field])
    }

    fn absent(tag: u16) -> Self {
        BuildOutcome::Absent {
            tag,
            message: String::new(),
        }
    }
}

type BuilderFn = fn(&mut Record) -> BuildOutcome;

/// The pipeline: builders in application order, each flagged mandatory or
/// optional. A mandatory builder returning [`BuildOutcome::Absent`] aborts
/// the record; an optional one is skipped silently.
const FIELD_BUILDERS: &[(BuilderFn, bool)] = &[
    (build_leader, true),
    (build_040, true),
    (build_336, true),
    (build_337, true),
    (build_338, true),
    (build_904, true),
    (build_005, true),
    (build_008, true),
    (build_033, true),
    (build_245, true),
    (build_264, true),
    (build_300, true),
    (build_490, false),
    (build_876, true),
    (build_020, false),
    (build_024, false),
    (build_041, false),
    (build_246, false),
    (build_500, false),
];

/// Apply every builder to one record and return its fields in final order.
///
/// Linked alternate-script fields accumulated in `record.links` during the
/// pass are appended before the sort, so an 880 lands after the fields that
/// reference it.
///
/// # Errors
///
/// Returns [`MarcError::MissingField`] when a mandatory builder has nothing
/// to emit; the error aborts this record only.
pub fn build_fields(record: &mut Record) -> Result<Vec<Field>> {
    let mut fields: Vec<Field> = Vec::new();
    for (builder, is_mandatory) in FIELD_BUILDERS {
        match builder(record) {
            BuildOutcome::Built(built) => fields.extend(built),
            BuildOutcome::Absent { tag, message } => {
                if *is_mandatory {
                    let message = if message.is_empty() {
                        format!("Data for required field {tag:03} is required.")
                    } else {
                        message
                    };
                    warn!(tag, %message, "mandatory field could not be built");
                    return Err(MarcError::MissingField { tag, message });
                }
            }
        }
    }
    fields.append(&mut std::mem::take(&mut record.links));
    fields.sort_by_key(Field::sort_key);
    Ok(fields)
}

/// Find the non-filing offset of a title's initial article.
///
/// A manual `@@` marker anywhere past the first position wins and is removed
/// from the title; otherwise the language's article patterns are tried in
/// order. Returns the offset (0 when the whole title files) and the title to
/// use.
#[must_use]
pub fn check_for_nonfiling(title: &str, lang: &str) -> (usize, String) {
    if let Some(position) = title.find(NONFILING_MARKER) {
        if position > 0 {
            let offset = title[..position].chars().count();
            return (offset, title.replacen(NONFILING_MARKER, "", 1));
        }
    }
    if let Some(patterns) = NONFILING_ARTICLES.get(lang) {
        for pattern in patterns {
            if let Some(found) = pattern.find(title) {
                let offset = title[..found.end()].chars().count() - 1;
                return (offset, title.to_string());
            }
        }
    }
    (0, title.to_string())
}

fn primary_language(record: &Record) -> String {
    record.languages.first().cloned().unwrap_or_default()
}

/// Pad a fixed-width control value out to `width` with positional blanks.
fn fill_with_blanks(value: &str, width: usize) -> Vec<Atom> {
    let used = value.chars().count();
    (used..width).map(|_| Atom::Blank).collect()
}

/// Divert an original-script title into a linked 880 field.
///
/// Builds the original-script content (with ISBD subtitle punctuation and,
/// for a 245 caller, the trailing period), allocates the shared occurrence
/// number, queues the 880 on `record.links` with the caller's indicators,
/// and returns the `$6 880-NN` linkage atom for the caller to lead with.
fn divert_original_script(
    record: &mut Record,
    title_original: &str,
    subtitle_original: &str,
    indicator1: Indicator,
    indicator2: Indicator,
    caller: u16,
) -> Atom {
    let mut original = Content::new();
    original.push(Atom::subfield("a", title_original));
    if !subtitle_original.is_empty() {
        original.extend([
            Atom::punctuation(" :"),
            Atom::subfield("b", subtitle_original),
        ]);
    }
    if caller == 245 && original.can_accept_period() {
        original.push(Atom::punctuation("."));
    }
    let occurrence = record.allocate_occurrence();
    let mut linked = Content::new();
    linked.push(Atom::subfield("6", format!("{caller:03}-{occurrence}")));
    linked.extend(original.atoms().iter().cloned());
    record
        .links
        .push(Field::new(880, indicator1, indicator2, linked));
    Atom::subfield("6", format!("880-{occurrence}"))
}

/// Leader placeholder. The length and base-address slots stay zero here;
/// the binary encoder recomputes them from the finished record.
fn build_leader(_record: &mut Record) -> BuildOutcome {
    let content: Content = [
        Atom::literal("00000nam"),
        Atom::Blank,
        Atom::literal("a22000003i"),
        Atom::Blank,
        Atom::literal("4500"),
    ]
    .into_iter()
    .collect();
    BuildOutcome::built(Field::new(
        LEADER_TAG,
        Indicator::Absent,
        Indicator::Absent,
        content,
    ))
}

/// 040: cataloguing source.
fn build_040(_record: &mut Record) -> BuildOutcome {
    let content: Content = [
        Atom::subfield("a", "UkOxU"),
        Atom::subfield("b", "eng"),
        Atom::subfield("e", "rda"),
        Atom::subfield("c", "UkOxU"),
    ]
    .into_iter()
    .collect();
    BuildOutcome::built(Field::new(40, Indicator::Blank, Indicator::Blank, content))
}

/// 336: content type boilerplate.
fn build_336(_record: &mut Record) -> BuildOutcome {
    let content: Content = [Atom::subfield("a", "text"), Atom::subfield("2", "rdacontent")]
        .into_iter()
        .collect();
    BuildOutcome::built(Field::new(336, Indicator::Blank, Indicator::Blank, content))
}

/// 337: media type boilerplate.
fn build_337(_record: &mut Record) -> BuildOutcome {
    let content: Content = [
        Atom::subfield("a", "unmediated"),
        Atom::subfield("2", "rdamedia"),
    ]
    .into_iter()
    .collect();
    BuildOutcome::built(Field::new(337, Indicator::Blank, Indicator::Blank, content))
}

/// 338: carrier type boilerplate.
fn build_338(_record: &mut Record) -> BuildOutcome {
    let content: Content = [
        Atom::subfield("a", "volume"),
        Atom::subfield("2", "rdacarrier"),
    ]
    .into_iter()
    .collect();
    BuildOutcome::built(Field::new(338, Indicator::Blank, Indicator::Blank, content))
}

/// 904: local authority boilerplate.
fn build_904(_record: &mut Record) -> BuildOutcome {
    let content: Content = [Atom::subfield("a", "Oxford Local Record")]
        .into_iter()
        .collect();
    BuildOutcome::built(Field::new(904, Indicator::Blank, Indicator::Blank, content))
}

/// 005: date and time of transaction, `yyyymmddhhmmss.f`.
fn build_005(record: &mut Record) -> BuildOutcome {
    let stamp: String = record
        .timestamp
        .format("%Y%m%d%H%M%S%.6f")
        .to_string()
        .chars()
        .take(16)
        .collect();
    let content: Content = [Atom::literal(stamp)].into_iter().collect();
    BuildOutcome::built(Field::new(
        5,
        Indicator::Absent,
        Indicator::Absent,
        content,
    ))
}

/// 008: fixed-length data elements: date entered, publication year, region
/// of publication and primary language, with unused positions pipe-filled.
fn build_008(record: &mut Record) -> BuildOutcome {
    let region = check_for_detailed_region(&record.country_code, &record.state, &record.place);
    let language = primary_language(record);
    let mut content = Content::new();
    content.push(Atom::literal(
        record.timestamp.format("%y%m%d").to_string(),
    ));
    content.push(Atom::literal("s"));
    content.push(Atom::literal(record.pub_year.clone()));
    content.push(Atom::literal("||||"));
    content.push(Atom::literal(region.clone()));
    content.extend(fill_with_blanks(&region, 3));
    content.push(Atom::literal("||||||||||||||"));
    content.push(Atom::Blank);
    content.push(Atom::literal("||"));
    content.push(Atom::literal(language.clone()));
    content.extend(fill_with_blanks(&language, 3));
    content.push(Atom::literal("||"));
    BuildOutcome::built(Field::new(
        8,
        Indicator::Absent,
        Indicator::Absent,
        content,
    ))
}

/// 033: date(s) of the sale; the first indicator distinguishes a single
/// date from a range of dates.
fn build_033(record: &mut Record) -> BuildOutcome {
    let indicator1 = if record.sale_dates.len() == 1 {
        Indicator::Value(0)
    } else {
        Indicator::Value(1)
    };
    let content: Content = record
        .sale_dates
        .iter()
        .map(|date| Atom::subfield("a", date))
        .collect();
    BuildOutcome::built(Field::new(33, indicator1, Indicator::Blank, content))
}

/// 245: title statement. Mandatory.
///
/// A title with a transliteration is catalogued under the transliteration
/// and the original script is diverted to a linked 880. A Latin-script
/// title is scanned for a non-filing initial article, which sets the second
/// indicator. The field ends with a period unless final punctuation is
/// already present.
fn build_245(record: &mut Record) -> BuildOutcome {
    let tag = 245;
    let indicator1 = Indicator::Value(0);
    let has_transliteration = !record.title.transliteration.is_empty();
    let (title, subtitle, nonfiling, linkage) = if has_transliteration {
        let title = record.title.transliteration.clone();
        let subtitle = record.subtitle.transliteration.clone();
        let original_title = record.title.original.clone();
        let original_subtitle = record.subtitle.original.clone();
        let linkage = divert_original_script(
            record,
            &original_title,
            &original_subtitle,
            indicator1,
            Indicator::Value(0),
            tag,
        );
        (title, subtitle, 0, Some(linkage))
    } else {
        let (nonfiling, title) =
            check_for_nonfiling(&record.title.original, &primary_language(record));
        (title, record.subtitle.original.clone(), nonfiling, None)
    };
    if title.is_empty() {
        return BuildOutcome::absent(tag);
    }
    #[allow(clippy::cast_possible_truncation)]
    let indicator2 = Indicator::Value(nonfiling.min(9) as u8);
    let mut content = Content::new();
    if let Some(linkage) = linkage {
        content.push(linkage);
    }
    content.push(Atom::subfield("a", title));
    if !subtitle.is_empty() {
        content.extend([Atom::punctuation(" :"), Atom::subfield("b", subtitle)]);
    }
    if content.can_accept_period() {
        content.push(Atom::punctuation("."));
    }
    BuildOutcome::built(Field::new(tag, indicator1, indicator2, content))
}

/// 264: publication statement, with a sibling copyright-notice field when a
/// copyright year is present.
fn build_264(record: &mut Record) -> BuildOutcome {
    let place_name = if record.place.is_empty() {
        record.state.clone()
    } else {
        record.place.clone()
    };
    let pub_year = if record.pub_year_is_approx {
        format!("[{}?]", record.pub_year)
    } else {
        record.pub_year.clone()
    };
    let content: Content = [
        Atom::subfield("a", place_name),
        Atom::punctuation(" :"),
        Atom::subfield("b", record.publisher.clone()),
        Atom::punctuation(","),
        Atom::subfield("c", pub_year),
    ]
    .into_iter()
    .collect();
    let publication = Field::new(264, Indicator::Blank, Indicator::Value(1), content);
    if record.copyright_year.is_empty() {
        BuildOutcome::built(publication)
    } else {
        let notice: Content = [Atom::subfield(
            "c",
            format!("\u{a9} {}", record.copyright_year),
        )]
        .into_iter()
        .collect();
        let copyright =
            Field::new(264, Indicator::Blank, Indicator::Value(4), notice).with_ordering(2);
        BuildOutcome::Built(vec![publication, copyright])
    }
}

/// 300: physical description.
fn build_300(record: &mut Record) -> BuildOutcome {
    let pages = if record.extent_is_approx {
        format!("approximately {} pages", record.extent)
    } else {
        format!("{} pages", record.extent)
    };
    let content: Content = [
        Atom::subfield("a", pages),
        Atom::punctuation(" ;"),
        Atom::subfield("c", format!("{} cm", record.size)),
    ]
    .into_iter()
    .collect();
    BuildOutcome::built(Field::new(300, Indicator::Blank, Indicator::Blank, content))
}

/// 490: series statement. Optional.
fn build_490(record: &mut Record) -> BuildOutcome {
    let title = &record.series_title;
    let enumeration = &record.series_enum;
    let content: Content = match (title.is_empty(), enumeration.is_empty()) {
        (false, false) => [
            Atom::subfield("a", title),
            Atom::punctuation(" ;"),
            Atom::subfield("v", enumeration),
        ]
        .into_iter()
        .collect(),
        (false, true) => [Atom::subfield("a", title)].into_iter().collect(),
        (true, false) => [Atom::subfield("v", enumeration)].into_iter().collect(),
        (true, true) => return BuildOutcome::absent(490),
    };
    BuildOutcome::built(Field::new(
        490,
        Indicator::Value(0),
        Indicator::Blank,
        content,
    ))
}

/// 876: item information. Mandatory through its barcode: a record without a
/// barcode cannot be attached to a holding, so an empty barcode makes the
/// whole field absent rather than emitting an empty `$p`.
fn build_876(record: &mut Record) -> BuildOutcome {
    if record.barcode.is_empty() {
        return BuildOutcome::absent(876);
    }
    let mut content = Content::new();
    content.push(Atom::subfield("p", record.barcode.clone()));
    if !record.donation.is_empty() {
        content.push(Atom::subfield("z", record.donation.clone()));
    }
    if !record.holdings_notes.is_empty() {
        content.push(Atom::subfield("z", record.holdings_notes.clone()));
    }
    BuildOutcome::built(Field::new(876, Indicator::Blank, Indicator::Blank, content))
}

/// 020: ISBN and/or volume qualifier. Optional.
fn build_020(record: &mut Record) -> BuildOutcome {
    let mut content = Content::new();
    if !record.isbn.is_empty() {
        content.push(Atom::subfield("a", record.isbn.clone()));
    }
    if !record.volume.is_empty() {
        content.push(Atom::subfield("q", format!("volume {}", record.volume)));
    }
    if content.is_empty() {
        return BuildOutcome::absent(20);
    }
    BuildOutcome::built(Field::new(20, Indicator::Blank, Indicator::Blank, content))
}

/// 024: sale code as an unspecified standard identifier. Optional.
fn build_024(record: &mut Record) -> BuildOutcome {
    if record.sales_code.is_empty() {
        return BuildOutcome::absent(24);
    }
    let content: Content = [Atom::subfield("a", record.sales_code.clone())]
        .into_iter()
        .collect();
    BuildOutcome::built(Field::new(
        24,
        Indicator::Value(8),
        Indicator::Blank,
        content,
    ))
}

/// 041: language codes, only for a multilingual item. Optional.
fn build_041(record: &mut Record) -> BuildOutcome {
    if record.languages.len() <= 1 {
        return BuildOutcome::absent(41);
    }
    let content: Content = record
        .languages
        .iter()
        .map(|language| Atom::subfield("a", language))
        .collect();
    BuildOutcome::built(Field::new(
        41,
        Indicator::Value(0),
        Indicator::Blank,
        content,
    ))
}

/// 246: varying form of title (the parallel title). Optional.
///
/// A transliterated parallel title diverts its original script to a linked
/// 880 exactly as 245 does, but initial articles are not suppressed and no
/// trailing period is added.
fn build_246(record: &mut Record) -> BuildOutcome {
    let tag = 246;
    let indicator1 = Indicator::Value(3);
    let indicator2 = Indicator::Value(1);
    let has_transliteration = !record.parallel_title.transliteration.is_empty();
    let (title, subtitle, linkage) = if has_transliteration {
        let title = record.parallel_title.transliteration.clone();
        let subtitle = record.parallel_subtitle.transliteration.clone();
        let original_title = record.parallel_title.original.clone();
        let original_subtitle = record.parallel_subtitle.original.clone();
        let linkage = divert_original_script(
            record,
            &original_title,
            &original_subtitle,
            indicator1,
            indicator2,
            tag,
        );
        (title, subtitle, Some(linkage))
    } else {
        (
            record.parallel_title.original.clone(),
            record.parallel_subtitle.original.clone(),
            None,
        )
    };
    if title.is_empty() {
        return BuildOutcome::absent(tag);
    }
    let mut content = Content::new();
    if let Some(linkage) = linkage {
        content.push(linkage);
    }
    content.push(Atom::subfield("a", title));
    if !subtitle.is_empty() {
        content.push(Atom::subfield("b", subtitle));
    }
    BuildOutcome::built(Field::new(tag, indicator1, indicator2, content))
}

/// 500: general note. Optional; trailing-period rule applies.
fn build_500(record: &mut Record) -> BuildOutcome {
    if record.notes.is_empty() {
        return BuildOutcome::absent(500);
    }
    let mut content = Content::new();
    content.push(Atom::subfield("a", record.notes.clone()));
    if content.can_accept_period() {
        content.push(Atom::punctuation("."));
    }
    BuildOutcome::built(Field::new(500, Indicator::Blank, Indicator::Blank, content))
}
