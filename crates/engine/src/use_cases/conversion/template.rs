//! Template rendering for user-defined directive rules.
//!
//! Placeholders are `{{column}}` and the commented form `#{{column}}`.
//! Column names are normalized before lookup. A commented placeholder emits
//! `#` followed by the cell value with its line breaks collapsed to the
//! literal `\n` marker, so the value stays on one comment line. Literal `\n`
//! markers written in the template text itself become real line breaks;
//! substituted values are never re-expanded.

use std::sync::LazyLock;

use regex_lite::Regex;

use scenescript_domain::common::{collapse_line_breaks, expand_line_break_markers};
use scenescript_domain::Row;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(#?)\{\{([^{}]*)\}\}").expect("valid regex"));

/// Result of rendering a template against one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTemplate {
    pub text: String,
    /// Placeholder columns with no matching cell, in template order
    pub unresolved: Vec<String>,
}

impl RenderedTemplate {
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Render `template` against `row`.
///
/// Placeholders naming columns the row does not have are left verbatim.
///
/// # Example
///
/// ```
/// use scenescript_domain::Row;
/// use scenescript_engine::use_cases::conversion::render_template;
///
/// let row = Row::new().with("dialogue", "Hi\nthere");
/// let rendered = render_template("#{{dialogue}}\\n{{dialogue}}", &row);
/// assert_eq!(rendered.text, "#Hi\\nthere\nHi\nthere");
/// ```
pub fn render_template(template: &str, row: &Row) -> RenderedTemplate {
    let mut text = String::with_capacity(template.len());
    let mut unresolved = Vec::new();
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let Some(token) = caps.get(0) else {
            continue;
        };
        text.push_str(&expand_line_break_markers(&template[last..token.start()]));
        last = token.end();

        let commented = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let column = caps.get(2).map(|m| m.as_str().trim()).unwrap_or_default();

        match row.lookup(column) {
            Some(value) if commented => {
                text.push('#');
                text.push_str(&collapse_line_breaks(value));
            }
            Some(value) => text.push_str(value),
            None => {
                text.push_str(token.as_str());
                unresolved.push(column.to_string());
            }
        }
    }
    text.push_str(&expand_line_break_markers(&template[last..]));

    RenderedTemplate { text, unresolved }
}

/// Render a fixed rule's text: markers expanded, no substitution.
pub fn render_fixed(text: &str) -> String {
    expand_line_break_markers(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> Row {
        Row::new()
            .with("character", "Sam")
            .with("dialogue", "first\r\nsecond")
            .with("Sound File", "f1")
    }

    #[test]
    fn plain_placeholders_insert_raw_values() {
        let rendered = render_template("say({{character}}, {{sound file}})", &row());
        assert_eq!(rendered.text, "say(Sam, f1)");
        assert!(rendered.is_complete());
    }

    #[test]
    fn commented_placeholder_keeps_value_on_one_line() {
        let rendered = render_template("#{{dialogue}}", &row());
        assert_eq!(rendered.text, "#first\\nsecond");
    }

    #[test]
    fn commented_and_plain_forms_of_one_column_resolve_independently() {
        let rendered = render_template("#{{dialogue}}|{{dialogue}}", &row());
        assert_eq!(rendered.text, "#first\\nsecond|first\r\nsecond");
    }

    #[test]
    fn template_markers_become_line_breaks() {
        let rendered = render_template("a()\\n#{{dialogue}}\\nb()", &row());
        assert_eq!(rendered.text, "a()\n#first\\nsecond\nb()");
    }

    #[test]
    fn unknown_columns_stay_verbatim_and_are_reported() {
        let rendered = render_template("x={{missing}} y=#{{ also missing }}", &row());
        assert_eq!(rendered.text, "x={{missing}} y=#{{ also missing }}");
        assert_eq!(rendered.unresolved, vec!["missing", "also missing"]);
    }

    #[test]
    fn empty_cell_is_resolved() {
        let row = Row::new().with("expression", "");
        let rendered = render_template("[{{expression}}]", &row);
        assert_eq!(rendered.text, "[]");
        assert!(rendered.is_complete());
    }

    #[test]
    fn fixed_text_only_expands_markers() {
        assert_eq!(render_fixed("화면_흔들기()\\n대기()"), "화면_흔들기()\n대기()");
        assert_eq!(render_fixed("{{dialogue}}"), "{{dialogue}}");
    }
}
