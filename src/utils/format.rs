/// Rupee price with two decimals and Indian digit grouping (`₹1,23,456.78`).
pub fn format_inr(price: f64) -> String {
    if !price.is_finite() {
        return "₹—".to_string();
    }
    let sign = if price < 0.0 { "-" } else { "" };
    let fixed = format!("{:.2}", price.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}₹{}.{}", sign, group_indian(int_part), frac_part)
}

/// Lakh/crore grouping: last three digits, then pairs.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Volume in Indian units: Cr (1e7), L (1e5), K (1e3).
pub fn format_volume(volume: f64) -> String {
    if volume >= 10_000_000.0 {
        format!("{:.2} Cr", volume / 10_000_000.0)
    } else if volume >= 100_000.0 {
        format!("{:.2} L", volume / 100_000.0)
    } else if volume >= 1_000.0 {
        format!("{:.2} K", volume / 1_000.0)
    } else {
        format!("{}", volume.round() as i64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inr_grouping() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(999.5), "₹999.50");
        assert_eq!(format_inr(1234.0), "₹1,234.00");
        assert_eq!(format_inr(123456.789), "₹1,23,456.79");
        assert_eq!(format_inr(12345678.0), "₹1,23,45,678.00");
    }

    #[test]
    fn volume_units() {
        assert_eq!(format_volume(950.0), "950");
        assert_eq!(format_volume(1_500.0), "1.50 K");
        assert_eq!(format_volume(250_000.0), "2.50 L");
        assert_eq!(format_volume(31_000_000.0), "3.10 Cr");
    }
}
