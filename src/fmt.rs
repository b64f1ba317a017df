fn group_thousands(int_part: &str) -> String {
    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    grouped
}

fn dollars(abs: f64) -> String {
    let cents = format!("{abs:.2}");
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));
    format!("${}.{dec_part}", group_thousands(int_part))
}

/// Dollar amount with thousands separators: $1,234.56, -$12.50
pub fn money(val: f64) -> String {
    if val < 0.0 && format!("{:.2}", val.abs()) != "0.00" {
        format!("-{}", dollars(val.abs()))
    } else {
        dollars(val.abs())
    }
}

/// Always carries a sign, for ledger lines: +$500.00, -$12.50
pub fn signed_money(val: f64) -> String {
    let sign = if val > 0.0 { '+' } else { '-' };
    format!("{sign}{}", dollars(val.abs()))
}
