//! 표시용 숫자 포맷팅 (en-US 자릿수 구분)

/// 통화 포맷. 소수점 0~2자리, 음수는 기호 앞에 `-`
pub fn format_currency(amount: f64, currency: &str) -> String {
    let amount = if amount.is_finite() { amount } else { 0.0 };
    let rounded = (amount.abs() * 100.0).round() / 100.0;

    let fixed = format!("{:.2}", rounded);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    let body = group_fixed(trimmed);

    let sign = if amount < 0.0 && rounded > 0.0 { "-" } else { "" };
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}{}", sign, symbol, body),
        None => format!("{}{} {}", sign, currency.to_uppercase(), body),
    }
}

/// `+12.34%` / `-5.00%`
pub fn format_percentage(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    format!("{}{:.2}%", if value >= 0.0 { "+" } else { "" }, value)
}

/// 고정 소수점 + 천 단위 구분
pub fn format_number(value: f64, decimals: usize) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let fixed = format!("{:.*}", decimals, value.abs());
    let negative = value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0');
    format!("{}{}", if negative { "-" } else { "" }, group_fixed(&fixed))
}

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        "CNY" => Some("CN¥"),
        _ => None,
    }
}

// "1234567.5" -> "1,234,567.5"
fn group_fixed(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
