/// Normalizes an ingredient quantity to plain decimal text.
///
/// Accepts decimal commas, simple and vulgar fractions, mixed numbers and
/// ranges (the upper bound is kept). Anything else becomes an empty string.
pub fn normalize_quantity(raw: &str) -> String {
    let text = raw.trim().replace(',', ".");
    if text.is_empty() {
        return String::new();
    }

    let upper = text
        .split(['-', '–'])
        .flat_map(|part| part.split(" à "))
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .last();

    upper
        .and_then(parse_amount)
        .filter(|value| value.is_finite())
        .map(format_amount)
        .unwrap_or_default()
}

/// Rating text as a decimal string: the part before `/`, if numeric
pub fn normalize_rating(raw: &str) -> Option<String> {
    let score = raw.split('/').next()?.trim().replace(',', ".");
    score.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(score)
}

fn vulgar_fraction(c: char) -> Option<f64> {
    let value = match c {
        '½' => 0.5,
        '¼' => 0.25,
        '¾' => 0.75,
        '⅓' => 1.0 / 3.0,
        '⅔' => 2.0 / 3.0,
        '⅛' => 0.125,
        '⅜' => 0.375,
        '⅝' => 0.625,
        '⅞' => 0.875,
        _ => return None,
    };
    Some(value)
}

fn parse_amount(text: &str) -> Option<f64> {
    let mut total = 0.0;
    let mut any = false;
    for token in text.split_whitespace() {
        total += parse_token(token)?;
        any = true;
    }
    any.then_some(total)
}

fn parse_token(token: &str) -> Option<f64> {
    if let Some(last) = token.chars().last() {
        if let Some(fraction) = vulgar_fraction(last) {
            let whole = &token[..token.len() - last.len_utf8()];
            let whole = if whole.is_empty() { 0.0 } else { whole.parse::<f64>().ok()? };
            return Some(whole + fraction);
        }
    }

    if let Some((numerator, denominator)) = token.split_once('/') {
        let numerator: f64 = numerator.parse().ok()?;
        let denominator: f64 = denominator.parse().ok()?;
        return (denominator != 0.0).then(|| numerator / denominator);
    }

    token.parse().ok()
}

fn format_amount(value: f64) -> String {
    let rounded = (value.abs() * 1000.0).round() / 1000.0;
    format!("{rounded}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(normalize_quantity("3"), "3");
        assert_eq!(normalize_quantity(" 250 "), "250");
        assert_eq!(normalize_quantity("1.5"), "1.5");
        assert_eq!(normalize_quantity("2.0"), "2");
    }

    #[test]
    fn test_decimal_comma() {
        assert_eq!(normalize_quantity("1,5"), "1.5");
        assert_eq!(normalize_quantity("0,25"), "0.25");
    }

    #[test]
    fn test_fractions() {
        assert_eq!(normalize_quantity("1/2"), "0.5");
        assert_eq!(normalize_quantity("½"), "0.5");
        assert_eq!(normalize_quantity("1½"), "1.5");
        assert_eq!(normalize_quantity("1 1/2"), "1.5");
        assert_eq!(normalize_quantity("1/3"), "0.333");
        assert_eq!(normalize_quantity("1/0"), "");
    }

    #[test]
    fn test_ranges_keep_upper_bound() {
        assert_eq!(normalize_quantity("2-3"), "3");
        assert_eq!(normalize_quantity("2 - 3"), "3");
        assert_eq!(normalize_quantity("1 à 1,2"), "1.2");
    }

    #[test]
    fn test_unparseable_becomes_empty() {
        assert_eq!(normalize_quantity(""), "");
        assert_eq!(normalize_quantity("   "), "");
        assert_eq!(normalize_quantity("quelques"), "");
        assert_eq!(normalize_quantity("1 pincée"), "");
        assert_eq!(normalize_quantity("-"), "");
    }

    #[test]
    fn test_rating() {
        assert_eq!(normalize_rating("4.8/5"), Some("4.8".to_string()));
        assert_eq!(normalize_rating("4,5 / 5"), Some("4.5".to_string()));
        assert_eq!(normalize_rating("5"), Some("5".to_string()));
        assert_eq!(normalize_rating("Pas encore de note"), None);
        assert_eq!(normalize_rating(""), None);
    }
}
