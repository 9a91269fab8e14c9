use chrono::NaiveDate;

/// Formats an integer with `,` thousands separators.
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn format_signed(n: i64) -> String {
    if n >= 0 {
        format!("+{}", format_number(n))
    } else {
        format_number(n)
    }
}

pub fn long_date(date: &NaiveDate) -> String {
    date.format("%b %-d, %Y").to_string()
}

pub fn short_date(date: &NaiveDate) -> String {
    date.format("%b %-d").to_string()
}

/// Integer division rounded half up; zero when `den` is zero.
pub fn rounded_ratio(num: u64, den: u64) -> u64 {
    if den == 0 {
        0
    } else {
        (num as f64 / den as f64).round() as u64
    }
}
