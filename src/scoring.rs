use std::collections::HashMap;

/// Grade-point bands as `(minimum total, grade point)`, highest first.
/// Bands overlap by construction, so lookup must walk them in this order.
pub const GRADE_BANDS: &[(i64, f64)] = &[
    (90, 4.0),
    (85, 3.75),
    (80, 3.5),
    (75, 3.25),
    (70, 3.0),
    (66, 2.75),
    (63, 2.5),
    (60, 2.0),
    (55, 1.5),
];

/// Grade point for a raw total (sum of marks, not an average).
pub fn compute_grade_point(total: i64) -> f64 {
    GRADE_BANDS
        .iter()
        .find(|(min, _)| total >= *min)
        .map(|(_, gp)| *gp)
        .unwrap_or(0.0)
}

pub fn compute_total(marks: &HashMap<String, i64>) -> i64 {
    marks.values().fold(0i64, |acc, v| acc.saturating_add(*v))
}

/// Lenient integer parse for typed-in marks.
///
/// Leading whitespace and an optional sign are accepted, then the longest run
/// of ASCII digits; trailing text is ignored. Out-of-range values saturate.
/// `None` means no leading digits were found; callers record that as 0.
pub fn parse_mark(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let d = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }

    seen_digit.then_some(value)
}
