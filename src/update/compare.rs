//! Total ordering over version strings
//!
//! Versions are ordered segment by segment in the style of PHP's
//! `version_compare`, so every pair of strings has an answer and special
//! forms such as `dev`, `RC` and `pl` rank the way release tags expect.

use std::cmp::Ordering;

use semver::Version;

/// Rank of a numeric segment among the special forms
const NUMBER_RANK: i8 = 4;

/// Rank for words that match no known special form
const UNKNOWN_RANK: i8 = -6;

/// Special forms, matched by prefix in this order
const SPECIAL_FORMS: &[(&str, i8)] = &[
    ("dev", 0),
    ("alpha", 1),
    ("a", 1),
    ("beta", 2),
    ("b", 2),
    ("RC", 3),
    ("rc", 3),
    ("pl", 5),
    ("p", 5),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Number(&'a str),
    Word(&'a str),
}

/// Parse a plain `MAJOR.MINOR.PATCH` release.
///
/// Returns `None` for anything with a pre-release or build suffix, a
/// leading `v`, or fewer or more than three components.
///
/// Examples:
/// - "1.2.3" -> Version(1, 2, 3)
/// - "1.2" -> None
/// - "1.2.3-rc.1" -> None
pub fn parse_release(version: &str) -> Option<Version> {
    Version::parse(version.trim())
        .ok()
        .filter(|v| v.pre.is_empty() && v.build.is_empty())
}

/// Compare two version strings.
///
/// Never fails: every pair is ordered segment by segment. Two plain
/// releases take the semver path, which orders them identically.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    if let (Some(left), Some(right)) = (parse_release(a), parse_release(b)) {
        return left.cmp(&right);
    }
    compare_segmented(a, b)
}

/// Returns `true` when `candidate` is strictly newer than `installed`.
pub fn is_newer(candidate: &str, installed: &str) -> bool {
    compare_versions(candidate, installed) == Ordering::Greater
}

fn compare_segmented(a: &str, b: &str) -> Ordering {
    let (a, b) = (a.trim(), b.trim());
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => {}
    }

    let left = segments(a);
    let right = segments(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ordering = compare_segment(*l, *r);
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    match left.len().cmp(&right.len()) {
        Ordering::Equal => Ordering::Equal,
        Ordering::Greater => remainder_rank(left[right.len()]).cmp(&NUMBER_RANK),
        Ordering::Less => NUMBER_RANK.cmp(&remainder_rank(right[left.len()])),
    }
}

/// Split into alphanumeric runs, breaking at digit/letter transitions.
/// Every other character acts as a separator.
fn segments(version: &str) -> Vec<Segment<'_>> {
    let mut result = Vec::new();
    let mut start: Option<usize> = None;
    let mut start_is_digit = false;

    for (i, c) in version.char_indices() {
        if !c.is_ascii_alphanumeric() {
            if let Some(s) = start.take() {
                result.push(segment(&version[s..i], start_is_digit));
            }
            continue;
        }

        match start {
            Some(s) if c.is_ascii_digit() != start_is_digit => {
                result.push(segment(&version[s..i], start_is_digit));
                start = Some(i);
                start_is_digit = c.is_ascii_digit();
            }
            Some(_) => {}
            None => {
                start = Some(i);
                start_is_digit = c.is_ascii_digit();
            }
        }
    }

    if let Some(s) = start {
        result.push(segment(&version[s..], start_is_digit));
    }

    result
}

fn segment(text: &str, is_digit: bool) -> Segment<'_> {
    if is_digit {
        Segment::Number(text)
    } else {
        Segment::Word(text)
    }
}

fn compare_segment(a: Segment<'_>, b: Segment<'_>) -> Ordering {
    match (a, b) {
        (Segment::Number(a), Segment::Number(b)) => compare_numeric(a, b),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Numeric comparison that cannot overflow: compare significant digit
/// count first, then the digits themselves.
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn rank(segment: Segment<'_>) -> i8 {
    match segment {
        Segment::Number(_) => NUMBER_RANK,
        Segment::Word(word) => SPECIAL_FORMS
            .iter()
            .find(|(form, _)| word.starts_with(form))
            .map_or(UNKNOWN_RANK, |(_, rank)| *rank),
    }
}

/// Rank of the first segment left over on the longer side.
/// A trailing number always makes that side newer.
fn remainder_rank(segment: Segment<'_>) -> i8 {
    match segment {
        Segment::Number(_) => NUMBER_RANK + 1,
        Segment::Word(_) => rank(segment),
    }
}
