use rust_decimal::{Decimal, RoundingStrategy};

/// Currency with a dollar prefix, thousand separators and two decimals.
/// e.g. `-1234.5` → `"-$1,234.50"`
pub(crate) fn format_amount(val: Decimal) -> String {
    let rounded = val
        .abs()
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let formatted = format!("{rounded:.2}");
    let (int_part, dec_part) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if val.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    format!("{sign}${grouped}.{dec_part}")
}

/// Truncate to `max` visible characters, ending in "…" when shortened.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max - 1).collect();
    format!("{kept}…")
}

/// `"1 change"`, `"3 changes"`.
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
