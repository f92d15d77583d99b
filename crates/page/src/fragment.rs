// ABOUTME: The display fragment rendered into each augmented package, and its stylesheet.
// ABOUTME: Text is HTML-escaped; the metric is rounded and thousands-grouped for display.

use gigprice_engine::Metric;

use crate::config::FragmentStyle;

const STYLESHEET: &str = r#"
.{class} {
  text-align: center;
  padding: 10px 0;
  margin-top: 15px;
  border-top: 1px dashed #e0e0e0;
  font-size: 1rem;
  color: #333;
  direction: rtl;
  background-color: #f9f9f9;
  border-radius: 0 0 8px 8px;
}
.{class} span:first-child {
  font-size: 0.9rem;
  color: #666;
}
"#;

/// What gets rendered for one package.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub metric: Metric,
    /// Rounded, grouped metric, e.g. `4,500`.
    pub display: String,
    pub class_name: String,
    pub label: String,
    pub currency: String,
}

impl Fragment {
    pub fn new(metric: Metric, style: &FragmentStyle) -> Self {
        Self {
            metric,
            display: metric.display_value(),
            class_name: style.class_name.clone(),
            label: style.label.clone(),
            currency: style.currency.clone(),
        }
    }

    /// Markup of the fragment element.
    pub fn to_html(&self) -> String {
        format!(
            concat!(
                r#"<div class="{}">"#,
                r#"<span style="font-weight: 600;">{}</span>"#,
                r#"<span style="font-weight: 800; color: #007bff; margin-right: 5px;">{}</span> {}"#,
                "</div>"
            ),
            escape_html(&self.class_name),
            escape_html(&self.label),
            escape_html(&self.display),
            escape_html(&self.currency),
        )
    }
}

/// The `<style>` element shared by every fragment on a page.
pub fn stylesheet_html(style: &FragmentStyle) -> String {
    format!(
        r#"<style id="{}">{}</style>"#,
        escape_html(&style.style_id),
        STYLESHEET.replace("{class}", &style.class_name)
    )
}

/// Escapes the characters that matter in text and double-quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_html_default_style() {
        let fragment = Fragment::new(Metric::new(4_499.5).unwrap(), &FragmentStyle::default());
        let html = fragment.to_html();

        assert!(html.starts_with(r#"<div class="price-per-gb-extension">"#));
        assert!(html.contains("ارزش هر گیگابایت:"));
        assert!(html.contains(">4,500</span> تومان"));
        assert_eq!(fragment.display, "4,500");
    }

    #[test]
    fn test_fragment_escapes_text() {
        let style = FragmentStyle {
            label: "<b>per GB</b>".to_string(),
            currency: "R&D".to_string(),
            ..Default::default()
        };
        let html = Fragment::new(Metric::new(1.0).unwrap(), &style).to_html();
        assert!(html.contains("&lt;b&gt;per GB&lt;/b&gt;"));
        assert!(html.contains("R&amp;D"));
    }

    #[test]
    fn test_stylesheet_uses_class_and_id() {
        let html = stylesheet_html(&FragmentStyle::default());
        assert!(html.starts_with(r#"<style id="price-per-gb-style">"#));
        assert!(html.contains(".price-per-gb-extension span:first-child"));
        assert!(!html.contains("{class}"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a<b>"c"&'d'"#), "a&lt;b&gt;&quot;c&quot;&amp;&#39;d&#39;");
        assert_eq!(escape_html(""), "");
    }
}
