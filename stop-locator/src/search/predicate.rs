//! Range predicates over text-encoded coordinates.
//!
//! Stops store their coordinates as text, so a store evaluates range
//! comparisons byte-wise. Byte order agrees with numeric order only for
//! numbers of the same sign and the same count of integer digits, and for
//! negative numbers it runs backwards: `"-6.26" < "-6.268300"` although
//! -6.26 > -6.2683. An axis whose bounds differ in sign or integer width
//! cannot be expressed as a single text range.
//!
//! Stored text may carry fewer decimals than a bound, and a shorter string
//! sorts before any string it prefixes: `"53.3418" < "53.341800"`. Each
//! clause therefore picks the bound form that makes the prefix case fall on
//! the right side. `>=` and `<` take the bound with trailing zeros removed,
//! so text equal in value to the bound sorts at or above it. `<=` and `>`
//! take the bound padded to full precision, so the same text sorts at or
//! below it. With these forms, text of up to
//! [`BOUND_PRECISION`](crate::domain::BOUND_PRECISION) decimals
//! compares the way its number does.

use crate::domain::{BoundingBox, Edge, bound_text};
use crate::store::{CompareOp, Filter};

pub const LAT_FIELD: &str = "stop_lat";
pub const LON_FIELD: &str = "stop_lon";

/// Build the four-clause range filter selecting stops inside `bbox`.
///
/// Returns `None` if either axis cannot be compared as text.
pub fn range_filter(bbox: &BoundingBox, edge: Edge) -> Option<Filter> {
    let mut clauses = axis_clauses(LAT_FIELD, bbox.min_lat(), bbox.max_lat(), edge)?;
    clauses.extend(axis_clauses(LON_FIELD, bbox.min_lon(), bbox.max_lon(), edge)?);
    Some(Filter::And(clauses))
}

fn axis_clauses(field: &str, min: f64, max: f64, edge: Edge) -> Option<Vec<Filter>> {
    let lo = bound_text(min);
    let hi = bound_text(max);

    let negative = lo.starts_with('-');
    if negative != hi.starts_with('-') || integer_width(&lo) != integer_width(&hi) {
        return None;
    }

    // On a negative axis the numeric lower bound is the textual upper bound
    let (text_lo, text_hi) = if negative { (&hi, &lo) } else { (&lo, &hi) };

    let clauses = match edge {
        Edge::Inclusive => vec![
            Filter::compare(field, CompareOp::Lte, text_hi.as_str()),
            Filter::compare(field, CompareOp::Gte, trimmed(text_lo)),
        ],
        Edge::Exclusive => vec![
            Filter::compare(field, CompareOp::Lt, trimmed(text_hi)),
            Filter::compare(field, CompareOp::Gt, text_lo.as_str()),
        ],
    };

    Some(clauses)
}

/// Drop trailing fractional zeros, and the point if nothing follows it.
fn trimmed(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

fn integer_width(text: &str) -> usize {
    text.trim_start_matches('-')
        .split('.')
        .next()
        .map_or(0, str::len)
}
