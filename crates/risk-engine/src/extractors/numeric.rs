// Numeric extraction utilities shared by the matchers and the rule compiler
use once_cell::sync::Lazy;
use regex::Regex;

/// "two (2) years", "18 months", "ninety (90) days" style quantities.
/// The parenthesized digits win over the spelled word when both appear.
static DURATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?|[a-z]+)\s*(?:\((\d+)\))?[-\s]*(year|month|week)s?\b").unwrap()
});

static DISTANCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?|[a-z]+)\s*(?:\((\d+)\))?[-\s]*(mile|kilometer|km)s?\b")
        .unwrap()
});

static DAYS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d+(?:\.\d+)?|[a-z]+)\s*(?:\((\d+)\))?[-\s]*(?:business\s+)?days?\b")
        .unwrap()
});

/// Parse a spelled number ("two", "ninety"). Covers the range contract
/// drafting actually uses.
pub fn parse_number_word(word: &str) -> Option<f64> {
    let value = match word.to_ascii_lowercase().as_str() {
        "one" | "a" | "an" => 1.0,
        "two" => 2.0,
        "three" => 3.0,
        "four" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        "eleven" => 11.0,
        "twelve" => 12.0,
        "fifteen" => 15.0,
        "twenty" => 20.0,
        "thirty" => 30.0,
        "forty-five" | "forty five" => 45.0,
        "sixty" => 60.0,
        "ninety" => 90.0,
        "hundred" => 100.0,
        _ => return None,
    };
    Some(value)
}

fn captured_quantity(cap: &regex::Captures<'_>) -> Option<f64> {
    // Parenthesized digits are the authoritative form.
    if let Some(parenthesized) = cap.get(2) {
        if let Ok(n) = parenthesized.as_str().parse::<f64>() {
            return Some(n);
        }
    }
    let head = cap.get(1)?.as_str();
    head.parse::<f64>().ok().or_else(|| parse_number_word(head))
}

/// Extract the first duration in the text, normalized to months.
pub fn extract_duration_months(text: &str) -> Option<f64> {
    for cap in DURATION.captures_iter(text) {
        let Some(quantity) = captured_quantity(&cap) else {
            continue;
        };
        let months = match cap
            .get(3)
            .map(|m| m.as_str().to_ascii_lowercase())
            .as_deref()
        {
            Some("year") => quantity * 12.0,
            Some("month") => quantity,
            Some("week") => quantity / 4.0,
            _ => continue,
        };
        return Some(months);
    }
    None
}

/// Extract the first distance in the text, normalized to miles.
pub fn extract_distance_miles(text: &str) -> Option<f64> {
    for cap in DISTANCE.captures_iter(text) {
        let Some(quantity) = captured_quantity(&cap) else {
            continue;
        };
        let miles = match cap
            .get(3)
            .map(|m| m.as_str().to_ascii_lowercase())
            .as_deref()
        {
            Some("mile") => quantity,
            Some("kilometer") | Some("km") => quantity * 0.621371,
            _ => continue,
        };
        return Some(miles);
    }
    None
}

/// Extract a day count that appears in a notice context ("30 days' written
/// notice"). Day counts without nearby notice language are ignored.
pub fn extract_notice_days(text: &str) -> Option<f64> {
    for cap in DAYS.captures_iter(text) {
        let Some(quantity) = captured_quantity(&cap) else {
            continue;
        };
        let m = cap.get(0).expect("whole match");
        let window_start = m.start().saturating_sub(60);
        let window_end = (m.end() + 60).min(text.len());
        let context = text[window_start..window_end].to_ascii_lowercase();
        if context.contains("notice") || context.contains("notify") || context.contains("notification")
        {
            return Some(quantity);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parenthesized_digits_win() {
        assert_eq!(
            extract_duration_months("for a period of two (2) years after termination"),
            Some(24.0)
        );
    }

    #[test]
    fn plain_digits_and_words() {
        assert_eq!(extract_duration_months("within 18 months"), Some(18.0));
        assert_eq!(extract_duration_months("for three years"), Some(36.0));
        assert_eq!(extract_duration_months("no duration here"), None);
    }

    #[test]
    fn distances() {
        assert_eq!(
            extract_distance_miles("within a 100-mile radius of the office"),
            Some(100.0)
        );
        assert_eq!(extract_distance_miles("within fifty miles"), None); // not in the word table
        assert_eq!(extract_distance_miles("within ten miles"), Some(10.0));
        let km = extract_distance_miles("within 10 kilometers").unwrap();
        assert!((km - 6.21371).abs() < 1e-6);
    }

    #[test]
    fn notice_days_require_notice_context() {
        assert_eq!(
            extract_notice_days("by giving thirty (30) days' written notice"),
            Some(30.0)
        );
        assert_eq!(
            extract_notice_days("the warranty lasts 90 days from delivery"),
            None
        );
    }
}
