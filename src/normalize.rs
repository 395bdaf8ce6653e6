//! Normalization tables and scalar cleanups for raw row values.
//!
//! Three independent lookup tables (language, country, place/state) map
//! free-text names to fixed-width MARC codes. All three share the same miss
//! policy: log an advisory and pass the original text through unchanged, so
//! partially-processed or already-coded input never hard-fails.
//!
//! The country table deliberately maps USA, UK, Canada and Australia to
//! 3-character sentinels (`xxu`/`xxk`/`xxc`/`xxa`): MARC encodes those four
//! by state or province rather than by country, and
//! [`check_for_detailed_region`] resolves the sentinel against the state
//! column at build time. Australia is the odd one out whose real country
//! code is the 2-character `at`.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;
use tracing::{debug, warn};

lazy_static! {
    static ref GEOGRAPHIC_JUNK: Regex =
        Regex::new(r"[\s\-.']").expect("geographic junk pattern");
    static ref LANGUAGE_SEPARATORS: Regex =
        Regex::new(r"[,/]").expect("language separator pattern");
    static ref EXTENT_JUNK: Regex = Regex::new(r"pages|\[|\]").expect("extent junk pattern");
    static ref NON_DIGITS: Regex = Regex::new(r"[^\d]").expect("non-digit pattern");
    static ref YEAR_BRACKETS: Regex = Regex::new(r"[\[\]]").expect("year bracket pattern");
    static ref ISBN_SEPARATORS: Regex = Regex::new(r"[\s\-]").expect("isbn separator pattern");
    static ref BARCODE_FORMAT: Regex = Regex::new(r"^[367]\d{8}$").expect("barcode pattern");
    static ref DATE_JUNK: Regex = Regex::new(r"\s|\.0").expect("date junk pattern");

    static ref LANGUAGE_CODES: HashMap<&'static str, &'static str> = [
        ("english", "eng"),
        ("chinese", "chi"),
        ("german", "ger"),
        ("italian", "ita"),
        ("spanish", "spa"),
        ("french", "fre"),
        ("swedish", "swe"),
        ("danish", "dan"),
        ("norwegian", "nor"),
        ("dutch", "dut"),
    ]
    .into_iter()
    .collect();

    static ref COUNTRY_CODES: HashMap<&'static str, &'static str> = [
        // Countries MARC codes by state/province; resolved at build time.
        ("usa", "xxu"),
        ("unitedstates", "xxu"),
        ("unitedstatesofamerica", "xxu"),
        ("uk", "xxk"),
        ("unitedkingdom", "xxk"),
        ("canada", "xxc"),
        ("australia", "xxa"), // sentinel; swapped to "at" at output
        ("algeria", "ae"),
        ("angola", "ao"),
        ("benin", "dm"),
        ("botswana", "bs"),
        ("burkinafaso", "uv"),
        ("burundi", "bd"),
        ("cameroon", "cm"),
        ("centralafricanrepublic", "cx"),
        ("chad", "cd"),
        ("congo", "cf"),
        ("democraticrepublicofcongo", "cg"),
        ("côtedivoire", "iv"),
        ("cotedivoire", "iv"),
        ("djibouti", "ft"),
        ("egypt", "ua"),
        ("equatorialguinea", "eg"),
        ("eritrea", "ea"),
        ("ethiopia", "et"),
        ("gabon", "go"),
        ("gambia", "gm"),
        ("ghana", "gh"),
        ("guinea", "gv"),
        ("guineabissau", "pg"),
        ("kenya", "ke"),
        ("lesotho", "lo"),
        ("liberia", "lb"),
        ("libya", "ly"),
        ("madagascar", "mg"),
        ("malawi", "mw"),
        ("mali", "ml"),
        ("mauritania", "mu"),
        ("morocco", "mr"),
        ("mozambique", "mz"),
        ("namibia", "sx"),
        ("niger", "ng"),
        ("nigeria", "nr"),
        ("rwanda", "rw"),
        ("saotomeandprincipe", "sf"),
        ("senegal", "sg"),
        ("sierraleone", "sl"),
        ("somalia", "so"),
        ("southafrica", "sa"),
        ("southsudan", "sd"),
        ("spanishnorthafrica", "sh"),
        ("sudan", "sj"),
        ("swaziland", "sq"),
        ("tanzania", "tz"),
        ("togo", "tg"),
        ("tunisia", "ti"),
        ("uganda", "ug"),
        ("westernsahara", "ss"),
        ("zambia", "za"),
        ("zimbabwe", "rh"),
        ("afghanistan", "af"),
        ("armenia", "ai"),
        ("republicofarmenia", "ar"),
        ("azerbaijan", "aj"),
        ("bahrain", "ba"),
        ("bangladesh", "bg"),
        ("bhutan", "bt"),
        ("brunei", "bx"),
        ("burma", "br"),
        ("cambodia", "cb"),
        ("china", "cc"),
        ("cyprus", "cy"),
        ("easttimor", "em"),
        ("gazastrip", "gz"),
        ("georgia", "gs"),
        ("georgianrepublic", "gs"),
        ("republicofgeorgia", "gs"),
        ("india", "ii"),
        ("indonesia", "io"),
        ("iran", "ir"),
        ("iraq", "iq"),
        ("israel", "is"),
        ("japan", "ja"),
        ("jordan", "jo"),
        ("kazakhstan", "kz"),
        ("northkorea", "kn"),
        ("korea", "ko"),
        ("southkorea", "ko"),
        ("kuwait", "ku"),
        ("kyrgyzstan", "kg"),
        ("laos", "ls"),
        ("lebanon", "le"),
        ("malaysia", "my"),
        ("mongolia", "mp"),
        ("nepal", "np"),
        ("oman", "mk"),
        ("pakistan", "pk"),
        ("papuanewguinea", "pp"),
        ("paracelislands", "pf"),
        ("philippines", "ph"),
        ("qatar", "qa"),
        ("saudiarabia", "su"),
        ("singapore", "si"),
        ("spratlyisland", "xp"),
        ("srilanka", "ce"),
        ("syria", "sy"),
        ("tajikistan", "ta"),
        ("thailand", "th"),
        ("turkey", "tu"),
        ("turkmenistan", "tk"),
        ("unitedarabemirates", "ts"),
        ("uae", "ts"),
        ("uzbekistan", "uz"),
        ("vietnam", "vm"),
        ("westbankofthejordanriver", "wj"),
        ("westbank", "wj"),
        ("yemen", "ye"),
        ("bermudaislands", "bm"),
        ("bermuda", "bm"),
        ("bouvetisland", "bv"),
        ("caboverde", "cv"),
        ("faroeislands", "fa"),
        ("faroes", "fa"),
        ("falklandislands", "fk"),
        ("falklands", "fk"),
        ("sainthelena", "xj"),
        ("southgeorgiaandthesouthsandwichislands", "xs"),
        ("southgeorgia", "xs"),
        ("southsandwichislands", "xs"),
        ("belize", "bh"),
        ("costarica", "cr"),
        ("elsalvador", "es"),
        ("guatemala", "gt"),
        ("honduras", "ho"),
        ("nicaragua", "nq"),
        ("panama", "pn"),
        ("albania", "aa"),
        ("andorra", "an"),
        ("austria", "au"),
        ("belarus", "bw"),
        ("belgium", "be"),
        ("bosniaandherzegovina", "bn"),
        ("bosnia", "bn"),
        ("bosniaherzegovina", "bn"),
        ("herzegovina", "bn"),
        ("bulgaria", "bu"),
        ("croatia", "ci"),
        ("czechrepublic", "xr"),
        ("czechia", "xr"),
        ("denmark", "dk"),
        ("estonia", "er"),
        ("finland", "fi"),
        ("france", "fr"),
        ("germany", "gw"),
        ("gibraltar", "gi"),
        ("greece", "gr"),
        ("guernsey", "gg"),
        ("hungary", "hu"),
        ("iceland", "ic"),
        ("ireland", "ie"),
        ("isleofman", "im"),
        ("italy", "it"),
        ("jersey", "je"),
        ("kosovo", "kv"),
        ("latvia", "lv"),
        ("liechtenstein", "lh"),
        ("lithuania", "li"),
        ("luxembourg", "lu"),
        ("macedonia", "xn"),
        ("malta", "mm"),
        ("montenegro", "mo"),
        ("moldova", "mv"),
        ("monaco", "mc"),
        ("netherlands", "ne"),
        ("norway", "no"),
        ("poland", "pl"),
        ("portugal", "po"),
        ("serbia", "rb"),
        ("romania", "rm"),
        ("russia", "ru"),
        ("russianfederation", "ru"),
        ("sanmarino", "sm"),
        ("slovakia", "xo"),
        ("slovenia", "xv"),
        ("spain", "sp"),
        ("sweden", "sw"),
        ("switzerland", "sz"),
        ("ukraine", "un"),
        ("vaticancity", "vc"),
        ("serbiaandmontenegro", "yu"),
        ("britishindianoceanterritory", "bi"),
        ("christmasisland", "xa"),
        ("cocosislands", "xb"),
        ("keelingislands", "xb"),
        ("comoros", "cq"),
        ("heardandmcdonaldislands", "hm"),
        ("maldives", "xc"),
        ("mauritius", "mf"),
        ("mayotte", "ot"),
        ("réunion", "re"),
        ("reunion", "re"),
        ("seychelles", "se"),
        ("americansamoa", "as"),
        ("cookislands", "cw"),
        ("fiji", "fj"),
        ("frenchpolynesia", "fp"),
        ("guam", "gu"),
        ("johnstonatoll", "ji"),
        ("kiribati", "gb"),
        ("marshallislands", "xe"),
        ("micronesia", "fm"),
        ("federatedstatesofmicronesia", "fm"),
        ("midwayislands", "xf"),
        ("nauru", "nu"),
        ("newcaledonia", "nl"),
        ("niue", "xh"),
        ("northernmarianaislands", "nw"),
        ("palau", "pw"),
        ("pitcairnisland", "pc"),
        ("samoa", "ws"),
        ("solomonislands", "bp"),
        ("tokelau", "tl"),
        ("tonga", "to"),
        ("tuvalu", "tv"),
        ("vanuatu", "nn"),
        ("wakeisland", "wk"),
        ("wallisandfutuna", "wf"),
        ("wallis", "wf"),
        ("futuna", "wf"),
        ("argentina", "ag"),
        ("bolivia", "bo"),
        ("brazil", "bl"),
        ("chile", "cl"),
        ("colombia", "ck"),
        ("ecuador", "ec"),
        ("frenchguiana", "fg"),
        ("guyana", "gy"),
        ("paraguay", "py"),
        ("peru", "pe"),
        ("surinam", "sr"),
        ("uruguay", "uy"),
        ("venezuela", "ve"),
        ("anguilla", "am"),
        ("antiguaandbarbuda", "aq"),
        ("antigua", "aq"),
        ("barbuda", "aq"),
        ("aruba", "aw"),
        ("bahamas", "bf"),
        ("barbados", "bb"),
        ("britishvirginislands", "vb"),
        ("caribbeannetherlands", "ca"),
        ("caymanislands", "cj"),
        ("cuba", "cu"),
        ("curaçao", "co"),
        ("curacao", "co"),
        ("dominica", "dq"),
        ("dominicanrepublic", "dr"),
        ("grenada", "gd"),
        ("guadeloupe", "gp"),
        ("haiti", "ht"),
        ("jamaica", "jm"),
        ("martinique", "mq"),
        ("montserrat", "mj"),
        ("puertorico", "pr"),
        ("saintbarthélemy", "sc"),
        ("saintbarthelemy", "sc"),
        ("saintkittsnevis", "xd"),
        ("saintkitts", "xd"),
        ("nevis", "xd"),
        ("saintlucia", "xk"),
        ("saintmartin", "st"),
        ("saintvincentandthegrenadines", "xm"),
        ("saintvincent", "xm"),
        ("thegrenadines", "xm"),
        ("grenadines", "xm"),
        ("sintmaarten", "sn"),
        ("trinidadandtobago", "tr"),
        ("trinidad", "tr"),
        ("tobago", "tr"),
        ("turksandcaicosislands", "tc"),
        ("virginislandsoftheunitedstates", "vi"),
        ("antarctica", "ay"),
        ("noplace", "xx"),
        ("unknown", "xx"),
        ("undetermined", "xx"),
        ("variousplaces", "vp"),
        ("various", "vp"),
    ]
    .into_iter()
    .collect();

    static ref PLACE_CODES: HashMap<&'static str, &'static str> = [
        // UK constituents
        ("england", "enk"),
        ("northernireland", "nik"),
        ("scotland", "stk"),
        ("wales", "wlk"),
        // Canadian provinces
        ("alberta", "abc"),
        ("britishcolumbia", "bcc"),
        ("manitoba", "mbc"),
        ("newbrunswick", "nkc"),
        ("newfoundland", "nfc"),
        ("labrador", "nfc"),
        ("newfoundlandandlabrador", "nfc"),
        ("northwestterritories", "ntc"),
        ("novascotia", "nsc"),
        ("nunavut", "nuc"),
        ("ontario", "onc"),
        ("princeedwardisland", "pic"),
        ("québecprovince", "quc"),
        ("québec", "quc"),
        ("quebecprovince", "quc"),
        ("quebec", "quc"),
        ("saskatchewan", "snc"),
        ("yukonterritory", "ykc"),
        ("yukon", "ykc"),
        // US states
        ("alabama", "alu"),
        ("alaska", "aku"),
        ("arizona", "azu"),
        ("arkansas", "aru"),
        ("california", "cau"),
        ("colorado", "cou"),
        ("connecticut", "ctu"),
        ("delaware", "deu"),
        ("districtofcolumbia", "dcu"),
        ("columbia", "dcu"),
        ("florida", "flu"),
        ("georgia", "gau"),
        ("hawaii", "hiu"),
        ("idaho", "idu"),
        ("illinois", "ilu"),
        ("indiana", "inu"),
        ("iowa", "iau"),
        ("kansas", "ksu"),
        ("kentucky", "kyu"),
        ("louisiana", "lau"),
        ("maine", "meu"),
        ("maryland", "mdu"),
        ("massachusetts", "mau"),
        ("michigan", "miu"),
        ("minnesota", "mnu"),
        ("mississippi", "msu"),
        ("missouri", "mou"),
        ("montana", "mtu"),
        ("nebraska", "nbu"),
        ("nevada", "nvu"),
        ("newhampshire", "nhu"),
        ("newjersey", "nju"),
        ("newmexico", "nmu"),
        ("newyork", "nyu"),
        ("newyorkstate", "nyu"),
        ("northcarolina", "ncu"),
        ("northdakota", "ndu"),
        ("ohio", "ohu"),
        ("oklahoma", "oku"),
        ("oregon", "oru"),
        ("pennsylvania", "pau"),
        ("rhodeisland", "riu"),
        ("southcarolina", "scu"),
        ("southdakota", "sdu"),
        ("tennessee", "tnu"),
        ("texas", "txu"),
        ("utah", "utu"),
        ("vermont", "vtu"),
        ("virginia", "vau"),
        ("washington", "wau"),
        ("washingtonstate", "wau"),
        ("westvirginia", "wvu"),
        ("wisconsin", "wiu"),
        ("wyoming", "wyu"),
        // Australian states
        ("australiancapitalterritory", "aca"),
        ("queensland", "qea"),
        ("tasmania", "tma"),
        ("victoria", "vra"),
        ("westernaustralia", "wea"),
        ("newsouthwales", "xna"),
        ("northernterritory", "xoa"),
        ("southaustralia", "xra"),
        // US postal abbreviations
        ("al", "alu"),
        ("ak", "aku"),
        ("az", "azu"),
        ("ar", "aru"),
        ("ca", "cau"),
        ("co", "cou"),
        ("ct", "ctu"),
        ("de", "deu"),
        ("dc", "dcu"),
        ("fl", "flu"),
        ("ga", "gau"),
        ("hi", "hiu"),
        ("id", "idu"),
        ("il", "ilu"),
        ("in", "inu"),
        ("ia", "iau"),
        ("ks", "ksu"),
        ("ky", "kyu"),
        ("la", "lau"),
        ("me", "meu"),
        ("md", "mdu"),
        ("ma", "mau"),
        ("mi", "miu"),
        ("mn", "mnu"),
        ("ms", "msu"),
        ("mo", "mou"),
        ("mt", "mtu"),
        ("ne", "nbu"),
        ("nv", "nvu"),
        ("nh", "nhu"),
        ("nj", "nju"),
        ("nm", "nmu"),
        ("ny", "nyu"),
        ("nc", "ncu"),
        ("nd", "ndu"),
        ("oh", "ohu"),
        ("ok", "oku"),
        ("or", "oru"),
        ("pa", "pau"),
        ("ri", "riu"),
        ("sc", "scu"),
        ("sd", "sdu"),
        ("tn", "tnu"),
        ("tx", "txu"),
        ("ut", "utu"),
        ("vt", "vtu"),
        ("va", "vau"),
        // "wa" stays the US state; Western Australia must be spelt out.
        ("wa", "wau"),
        ("wv", "wvu"),
        ("wi", "wiu"),
        ("wy", "wyu"),
        // Australian state abbreviations
        ("act", "aca"),
        ("qld", "qea"),
        ("tas", "tma"),
        ("vic", "vra"),
        ("nsw", "xna"),
        ("nt", "xoa"),
        ("sa", "xra"),
        // Canadian province abbreviations
        ("alb", "abc"),
        ("bc", "bcc"),
        ("man", "mbc"),
        ("nb", "nkc"),
        ("nfd", "nfc"),
        ("lab", "nfc"),
        ("nwt", "ntc"),
        ("ns", "nsc"),
        ("nu", "nuc"),
        ("ont", "onc"),
        ("pei", "pic"),
        ("que", "quc"),
        ("sas", "snc"),
        ("yt", "ykc"),
    ]
    .into_iter()
    .collect();
}

/// Lower-case a geographic name and strip whitespace, hyphens, periods and
/// apostrophes, producing the lookup key the tables are keyed by.
#[must_use]
pub fn normalize_geographic_name(name: &str) -> String {
    GEOGRAPHIC_JUNK.replace_all(name, "").to_lowercase()
}

/// Map a free-text language list (`"English / Chinese"`, `"french,german"`)
/// to MARC language codes, primary language first.
///
/// Unrecognized names are passed through unchanged with a warning.
#[must_use]
pub fn normalize_languages(raw: &str) -> Vec<String> {
    let compact = raw.replace(' ', "").to_lowercase();
    LANGUAGE_SEPARATORS
        .split(&compact)
        .map(|language| match LANGUAGE_CODES.get(language) {
            Some(code) => (*code).to_string(),
            None => {
                warn!(language, "not a recognised language; passed on unchanged");
                language.to_string()
            }
        })
        .collect()
}

/// Map a free-text country name to its MARC country code.
///
/// On a miss, input short enough to already be a code gets a debug-level
/// advisory; anything else gets a warning. Either way the original text is
/// passed through unchanged.
#[must_use]
pub fn normalize_country(raw: &str) -> String {
    let key = normalize_geographic_name(raw);
    match COUNTRY_CODES.get(key.as_str()) {
        Some(code) => (*code).to_string(),
        None => {
            if key.chars().count() <= 3 {
                debug!(country = raw, "assuming country name is already coded");
            } else {
                warn!(country = raw, "not a recognised country name; passed on unchanged");
            }
            raw.to_string()
        }
    }
}

/// Map a free-text state/province/place name to its 3-character MARC code.
///
/// Same miss policy as [`normalize_country`].
#[must_use]
pub fn normalize_place(raw: &str) -> String {
    let key = normalize_geographic_name(raw);
    match PLACE_CODES.get(key.as_str()) {
        Some(code) => (*code).to_string(),
        None => {
            if key.chars().count() == 3 {
                debug!(place = raw, "assuming place name is already coded");
            } else {
                warn!(place = raw, "not a recognised place name; passed on unchanged");
            }
            raw.to_string()
        }
    }
}

/// Normalize a state column, tolerating the empty string.
#[must_use]
pub fn normalize_state(raw: &str) -> String {
    if raw.is_empty() {
        String::new()
    } else {
        normalize_place(raw)
    }
}

/// Resolve a 3-character country sentinel to the detailed regional code.
///
/// The country code for USA, Australia, Canada and the UK is 3 characters,
/// based on the state; when no state was supplied the place column is tried
/// as a state (it is sometimes entered there by mistake) and accepted only
/// when it resolves to a 3-character code. Australia, however, only has a
/// 2-character superordinate code, so its sentinel rewrites to `at`.
#[must_use]
pub fn check_for_detailed_region(country: &str, state: &str, place: &str) -> String {
    let mut region = country.to_string();
    if region.chars().count() == 3 {
        if state.is_empty() {
            let from_place = normalize_state(place);
            if from_place.chars().count() == 3 {
                region = from_place;
            }
        } else {
            region = normalize_state(state);
        }
        if region == "xxa" {
            region = "at".to_string();
        }
    }
    region
}

/// Strip spaces and hyphens from an ISBN and warn when the remaining length
/// is not 10 to 13 characters. The value passes through either way.
#[must_use]
pub fn normalize_isbn(raw: &str) -> String {
    let isbn = ISBN_SEPARATORS.replace_all(raw, "").to_string();
    if !isbn.is_empty() && !(10..=13).contains(&isbn.chars().count()) {
        warn!(isbn = raw, "isbn is non-standard");
    }
    isbn
}

/// Warn when a barcode is not a 9-digit string starting with 3, 6 or 7.
/// The value passes through either way.
#[must_use]
pub fn normalize_barcode(raw: &str) -> String {
    if !raw.is_empty() && !BARCODE_FORMAT.is_match(raw) {
        warn!(barcode = raw, "barcode is non-standard");
    }
    raw.to_string()
}

/// Take a question mark in any position to mean the value is uncertain;
/// returns the value with all question marks removed plus the flag.
#[must_use]
pub fn check_for_approx(raw: &str) -> (String, bool) {
    let is_approx = raw.contains('?');
    let clean = raw.replace('?', "");
    (trim_mistaken_decimals(clean.trim()).to_string(), is_approx)
}

/// Strip a trailing `.0` left behind by spreadsheet float coercion.
#[must_use]
pub fn trim_mistaken_decimals(value: &str) -> &str {
    value.strip_suffix(".0").unwrap_or(value)
}

/// Clean an extent column: drop the word "pages" and editorial brackets;
/// a value marked "approx" keeps only its digits plus a `?` for
/// [`check_for_approx`] to pick up.
#[must_use]
pub fn normalize_pages(raw: &str) -> String {
    let pages = EXTENT_JUNK.replace_all(raw, "").trim().to_string();
    if pages.contains("approx") {
        let digits = NON_DIGITS.replace_all(&pages, "").to_string();
        format!("{digits}?")
    } else {
        pages
    }
}

/// Strip editorial brackets from a year column.
#[must_use]
pub fn normalize_year(raw: &str) -> String {
    YEAR_BRACKETS.replace_all(raw, "").trim().to_string()
}

/// Parse a physical size column (`"30 cm"`) to centimetres; -1 when the
/// remainder is not numeric.
#[must_use]
pub fn normalize_size(raw: &str) -> i32 {
    let clean = raw.replace("cm", "");
    clean.trim().parse().unwrap_or(-1)
}

/// Split a comma-separated sale-date column into individual dates, dropping
/// whitespace and mistaken `.0` decimals.
#[must_use]
pub fn split_sale_dates(raw: &str) -> Vec<String> {
    let compact = DATE_JUNK.replace_all(raw, "").to_string();
    compact.split(',').map(str::to_string).collect()
}
