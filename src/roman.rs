//! Roman numeral conversion.
//!
//! [`to_roman`] and [`from_roman`] never fail: out-of-range integers come
//! back as plain decimal text and unknown characters count as zero. Callers
//! that need a *valid* numeral use [`parse_roman`], which rejects anything
//! that does not round-trip.

const TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

/// Largest value expressible in standard subtractive notation.
pub const MAX_ROMAN: u32 = 3999;

/// Convert an integer to an uppercase Roman numeral.
///
/// Values outside `1..=3999` are returned as their decimal representation.
///
/// ```
/// use layered_numbering::to_roman;
///
/// assert_eq!(to_roman(1994), "MCMXCIV");
/// assert_eq!(to_roman(0), "0");
/// ```
pub fn to_roman(n: u32) -> String {
    if n == 0 || n > MAX_ROMAN {
        return n.to_string();
    }

    let mut remaining = n;
    let mut out = String::new();
    for &(value, symbol) in TABLE.iter() {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    out
}

fn symbol_value(c: char) -> u32 {
    match c.to_ascii_uppercase() {
        'I' => 1,
        'V' => 5,
        'X' => 10,
        'L' => 50,
        'C' => 100,
        'D' => 500,
        'M' => 1000,
        _ => 0,
    }
}

/// Convert a Roman numeral to an integer, case-insensitively.
///
/// Best effort: a symbol is subtracted when the next symbol is strictly
/// larger, otherwise added. Unrecognized characters contribute zero, so
/// garbage input yields a meaningless but finite number.
pub fn from_roman(text: &str) -> u32 {
    let values: Vec<u32> = text.chars().map(symbol_value).collect();
    let mut total: i64 = 0;

    for (i, &value) in values.iter().enumerate() {
        let next = values.get(i + 1).copied().unwrap_or(0);
        if value < next {
            total -= i64::from(value);
        } else {
            total += i64::from(value);
        }
    }

    total.max(0).min(i64::from(u32::MAX)) as u32
}

/// Parse a canonical Roman numeral.
///
/// Returns `(value, is_uppercase)` only when every character is a Roman
/// symbol of a single case and the text is exactly what [`to_roman`] would
/// produce for the value. `IIII` and `IL` are rejected.
pub fn parse_roman(text: &str) -> Option<(u32, bool)> {
    let first = text.chars().next()?;
    let uppercase = first.is_ascii_uppercase();

    let single_case = text.chars().all(|c| {
        symbol_value(c) > 0 && c.is_ascii_uppercase() == uppercase
    });
    if !single_case {
        return None;
    }

    let value = from_roman(text);
    if value == 0 || value > MAX_ROMAN {
        return None;
    }
    if to_roman(value) != text.to_ascii_uppercase() {
        return None;
    }

    Some((value, uppercase))
}
