// src/mapping.rs

//! Static vocabulary translation between Polygon and DOMjudge.
//!
//! Three small lookup concerns live here: standard checker names to
//! DOMjudge validator flags, solution verdict tags to submission buckets,
//! and operator-supplied colors to canonical hex form.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use phf::phf_map;
use regex::Regex;

use crate::error::{AppError, Result};

/// Standard testlib checkers shipped by Polygon, mapped to the
/// `validator_flags` DOMjudge needs to reproduce their behavior with the
/// default validator. `None` means the default validation needs no flags.
static CHECKERS: phf::Map<&'static str, Option<&'static str>> = phf_map! {
    "fcmp" => Some("case_sensitive space_change_sensitive"),
    "hcmp" => None,
    "lcmp" => None,
    "ncmp" => None,
    "nyesno" => None,
    "rcmp4" => Some("float_tolerance 1e-4"),
    "rcmp6" => Some("float_tolerance 1e-6"),
    "rcmp9" => Some("float_tolerance 1e-9"),
    "wcmp" => None,
    "yesno" => None,
};

/// Look up a standard checker identifier.
///
/// The outer `Option` distinguishes an unknown identifier from a known
/// checker that needs no flags.
pub fn checker_flags(ident: &str) -> Option<Option<&'static str>> {
    CHECKERS.get(ident).copied()
}

/// Extract the identifier from a declared standard checker name.
///
/// The canonical pattern is `std::<ident>.cpp` with a lowercase
/// alphanumeric identifier; every stock Polygon checker fits it.
pub fn parse_standard_checker(name: &str) -> Option<&str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"^std::([a-z0-9]+)\.cpp$").unwrap());
    re.captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// DOMjudge submission bucket for a reference solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Accepted,
    WrongAnswer,
    TimeLimitExceeded,
    RunTimeError,
}

impl Bucket {
    /// Subdirectory name under `submissions/`.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Bucket::Accepted => "accepted",
            Bucket::WrongAnswer => "wrong_answer",
            Bucket::TimeLimitExceeded => "time_limit_exceeded",
            Bucket::RunTimeError => "run_time_error",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "accepted" => Some(Bucket::Accepted),
            "wrong_answer" => Some(Bucket::WrongAnswer),
            "time_limit_exceeded" => Some(Bucket::TimeLimitExceeded),
            "run_time_error" => Some(Bucket::RunTimeError),
            _ => None,
        }
    }
}

/// Default verdict-tag mapping.
///
/// Tags describing ambiguous or non-deterministic outcomes map to `None`
/// and their solutions are not exported. Historical variants of this table
/// disagreed on `rejected` and the `…-or-…` tags; the contest config can
/// override any entry (see [`verdict_bucket`]).
fn default_verdict_bucket(tag: &str) -> Option<Option<Bucket>> {
    match tag {
        "main" | "accepted" => Some(Some(Bucket::Accepted)),
        "wrong-answer" | "presentation-error" => Some(Some(Bucket::WrongAnswer)),
        "time-limit-exceeded" => Some(Some(Bucket::TimeLimitExceeded)),
        "memory-limit-exceeded" => Some(Some(Bucket::RunTimeError)),
        "time-limit-exceeded-or-accepted"
        | "time-limit-exceeded-or-memory-limit-exceeded"
        | "rejected"
        | "failed"
        | "do-not-run" => Some(None),
        _ => None,
    }
}

/// Resolve a verdict tag to a submission bucket.
///
/// `overrides` maps tags to bucket names (or `"exclude"` to drop the
/// solutions carrying that tag). A tag unknown to both the override table
/// and the default table is fatal; `Ok(None)` is the deliberate
/// "do not export" outcome.
pub fn verdict_bucket(
    tag: &str,
    overrides: &BTreeMap<String, String>,
) -> Result<Option<Bucket>> {
    if let Some(target) = overrides.get(tag) {
        if target == "exclude" {
            return Ok(None);
        }
        return Bucket::parse(target).map(Some).ok_or_else(|| {
            AppError::config(format!(
                "verdict override for '{tag}' names unknown bucket '{target}' \
                 (expected accepted, wrong_answer, time_limit_exceeded, run_time_error or exclude)"
            ))
        });
    }
    default_verdict_bucket(tag)
        .ok_or_else(|| AppError::config(format!("unknown solution verdict tag '{tag}'")))
}

/// CSS extended color keywords, lowercase name to hex digits.
static CSS_COLORS: phf::Map<&'static str, &'static str> = phf_map! {
    "aliceblue" => "F0F8FF", "antiquewhite" => "FAEBD7", "aqua" => "00FFFF",
    "aquamarine" => "7FFFD4", "azure" => "F0FFFF", "beige" => "F5F5DC",
    "bisque" => "FFE4C4", "black" => "000000", "blanchedalmond" => "FFEBCD",
    "blue" => "0000FF", "blueviolet" => "8A2BE2", "brown" => "A52A2A",
    "burlywood" => "DEB887", "cadetblue" => "5F9EA0", "chartreuse" => "7FFF00",
    "chocolate" => "D2691E", "coral" => "FF7F50", "cornflowerblue" => "6495ED",
    "cornsilk" => "FFF8DC", "crimson" => "DC143C", "cyan" => "00FFFF",
    "darkblue" => "00008B", "darkcyan" => "008B8B", "darkgoldenrod" => "B8860B",
    "darkgray" => "A9A9A9", "darkgreen" => "006400", "darkgrey" => "A9A9A9",
    "darkkhaki" => "BDB76B", "darkmagenta" => "8B008B", "darkolivegreen" => "556B2F",
    "darkorange" => "FF8C00", "darkorchid" => "9932CC", "darkred" => "8B0000",
    "darksalmon" => "E9967A", "darkseagreen" => "8FBC8F", "darkslateblue" => "483D8B",
    "darkslategray" => "2F4F4F", "darkslategrey" => "2F4F4F", "darkturquoise" => "00CED1",
    "darkviolet" => "9400D3", "deeppink" => "FF1493", "deepskyblue" => "00BFFF",
    "dimgray" => "696969", "dimgrey" => "696969", "dodgerblue" => "1E90FF",
    "firebrick" => "B22222", "floralwhite" => "FFFAF0", "forestgreen" => "228B22",
    "fuchsia" => "FF00FF", "gainsboro" => "DCDCDC", "ghostwhite" => "F8F8FF",
    "gold" => "FFD700", "goldenrod" => "DAA520", "gray" => "808080",
    "green" => "008000", "greenyellow" => "ADFF2F", "grey" => "808080",
    "honeydew" => "F0FFF0", "hotpink" => "FF69B4", "indianred" => "CD5C5C",
    "indigo" => "4B0082", "ivory" => "FFFFF0", "khaki" => "F0E68C",
    "lavender" => "E6E6FA", "lavenderblush" => "FFF0F5", "lawngreen" => "7CFC00",
    "lemonchiffon" => "FFFACD", "lightblue" => "ADD8E6", "lightcoral" => "F08080",
    "lightcyan" => "E0FFFF", "lightgoldenrodyellow" => "FAFAD2", "lightgray" => "D3D3D3",
    "lightgreen" => "90EE90", "lightgrey" => "D3D3D3", "lightpink" => "FFB6C1",
    "lightsalmon" => "FFA07A", "lightseagreen" => "20B2AA", "lightskyblue" => "87CEFA",
    "lightslategray" => "778899", "lightslategrey" => "778899", "lightsteelblue" => "B0C4DE",
    "lightyellow" => "FFFFE0", "lime" => "00FF00", "limegreen" => "32CD32",
    "linen" => "FAF0E6", "magenta" => "FF00FF", "maroon" => "800000",
    "mediumaquamarine" => "66CDAA", "mediumblue" => "0000CD", "mediumorchid" => "BA55D3",
    "mediumpurple" => "9370DB", "mediumseagreen" => "3CB371", "mediumslateblue" => "7B68EE",
    "mediumspringgreen" => "00FA9A", "mediumturquoise" => "48D1CC", "mediumvioletred" => "C71585",
    "midnightblue" => "191970", "mintcream" => "F5FFFA", "mistyrose" => "FFE4E1",
    "moccasin" => "FFE4B5", "navajowhite" => "FFDEAD", "navy" => "000080",
    "oldlace" => "FDF5E6", "olive" => "808000", "olivedrab" => "6B8E23",
    "orange" => "FFA500", "orangered" => "FF4500", "orchid" => "DA70D6",
    "palegoldenrod" => "EEE8AA", "palegreen" => "98FB98", "paleturquoise" => "AFEEEE",
    "palevioletred" => "DB7093", "papayawhip" => "FFEFD5", "peachpuff" => "FFDAB9",
    "peru" => "CD853F", "pink" => "FFC0CB", "plum" => "DDA0DD",
    "powderblue" => "B0E0E6", "purple" => "800080", "rebeccapurple" => "663399",
    "red" => "FF0000", "rosybrown" => "BC8F8F", "royalblue" => "4169E1",
    "saddlebrown" => "8B4513", "salmon" => "FA8072", "sandybrown" => "F4A460",
    "seagreen" => "2E8B57", "seashell" => "FFF5EE", "sienna" => "A0522D",
    "silver" => "C0C0C0", "skyblue" => "87CEEB", "slateblue" => "6A5ACD",
    "slategray" => "708090", "slategrey" => "708090", "snow" => "FFFAFA",
    "springgreen" => "00FF7F", "steelblue" => "4682B4", "tan" => "D2B48C",
    "teal" => "008080", "thistle" => "D8BFD8", "tomato" => "FF6347",
    "turquoise" => "40E0D0", "violet" => "EE82EE", "wheat" => "F5DEB3",
    "white" => "FFFFFF", "whitesmoke" => "F5F5F5", "yellow" => "FFFF00",
    "yellowgreen" => "9ACD32",
};

/// Normalize an operator-supplied color to six upper-case hex digits.
///
/// Accepts `#RRGGBB` (any case) or a CSS color name (any case).
pub fn normalize_color(color: &str) -> Result<String> {
    if let Some(hex) = color.strip_prefix('#') {
        if hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Ok(hex.to_uppercase());
        }
        return Err(AppError::config(format!(
            "'{color}' is not a valid hexadecimal color (expected #RRGGBB)"
        )));
    }
    CSS_COLORS
        .get(color.to_lowercase().as_str())
        .map(|hex| (*hex).to_string())
        .ok_or_else(|| {
            AppError::config(format!(
                "'{color}' is neither a CSS color name nor a hexadecimal color"
            ))
        })
}
