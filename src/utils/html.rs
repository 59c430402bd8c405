//! Markup helpers shared by the view updaters

/// Escape text for use inside HTML element content or attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Format an amount with 6 decimals; missing or non-finite values render empty
pub fn decimal(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.6}", v),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn decimals() {
        assert_eq!(decimal(Some(12.345678)), "12.345678");
        assert_eq!(decimal(Some(-1.5)), "-1.500000");
        assert_eq!(decimal(None), "");
        assert_eq!(decimal(Some(f64::NAN)), "");
    }
}
