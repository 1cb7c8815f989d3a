//! CSS text for animated element properties.

/// Compose the `transform` value from translation, percent translation and
/// rotation. Identity components are omitted.
pub fn transform_css(x: f64, y: f64, x_percent: f64, y_percent: f64, rotation_deg: f64) -> String {
    let mut out = String::new();
    if x_percent != 0.0 || y_percent != 0.0 {
        out.push_str(&format!("translate({}%, {}%) ", fmt_num(x_percent), fmt_num(y_percent)));
    }
    out.push_str(&format!("translate({}px, {}px)", fmt_num(x), fmt_num(y)));
    if rotation_deg != 0.0 {
        out.push_str(&format!(" rotate({}deg)", fmt_num(rotation_deg)));
    }
    out
}

pub fn px(v: f64) -> String {
    format!("{}px", fmt_num(v))
}

pub fn percent(v: f64) -> String {
    format!("{}%", fmt_num(v))
}

/// Short decimal text: at most three fractional digits, no trailing zeros.
pub fn fmt_num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    // avoid "-0"
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    let s = format!("{:.3}", rounded);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(fmt_num(12.0), "12");
        assert_eq!(fmt_num(-2.5), "-2.5");
        assert_eq!(fmt_num(0.33333), "0.333");
        assert_eq!(fmt_num(-0.0001), "0");
        assert_eq!(px(4.0), "4px");
        assert_eq!(percent(75.0), "75%");
    }

    #[test]
    fn transform_skips_identity_parts() {
        assert_eq!(transform_css(0.0, 50.0, 0.0, 0.0, 0.0), "translate(0px, 50px)");
        assert_eq!(
            transform_css(1.0, 2.0, -50.0, 0.0, 90.0),
            "translate(-50%, 0%) translate(1px, 2px) rotate(90deg)"
        );
        assert_eq!(
            transform_css(0.0, 0.0, 0.0, -100.0, 0.0),
            "translate(0%, -100%) translate(0px, 0px)"
        );
    }
}
