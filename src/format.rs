/// Cart amounts: two decimals, currency after the number (`120.00 EGP`).
pub fn money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {currency}")
}

/// Gallery prices: rounded to whole units with thousands separators (`EGP 1,250`).
pub fn whole_price(amount: f64, currency: &str) -> String {
    let rounded = if amount.is_finite() { amount.round() } else { 0.0 };
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{currency} {sign}{}", grouped(&format!("{:.0}", rounded.abs())))
}

/// Like counts on gallery cards (`1,204`).
pub fn count(n: u64) -> String {
    grouped(&n.to_string())
}

fn grouped(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_has_two_decimals() {
        assert_eq!(money(120.0, "EGP"), "120.00 EGP");
        assert_eq!(money(35.5, "EGP"), "35.50 EGP");
    }

    #[test]
    fn whole_price_groups_thousands() {
        assert_eq!(whole_price(950.0, "EGP"), "EGP 950");
        assert_eq!(whole_price(1250.4, "EGP"), "EGP 1,250");
        assert_eq!(whole_price(1_000_000.0, "EGP"), "EGP 1,000,000");
        assert_eq!(whole_price(f64::NAN, "EGP"), "EGP 0");
        assert_eq!(count(87), "87");
        assert_eq!(count(1204), "1,204");
    }
}
