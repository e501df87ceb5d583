//! Lazily re-resolved element locators.
//!
//! A [`Locator`] is a chain of query steps rooted at a CSS selector. Nothing is
//! resolved when the chain is built; every engine call evaluates the whole
//! chain against the live document, so a locator never holds a stale element.
//!
//! ```
//! use bookcart::Locator;
//!
//! let favourite = Locator::new(".card-title")
//!     .with_text("Slayer")
//!     .parent("app-book-card")
//!     .find(".favourite");
//! assert_eq!(
//!     favourite.to_string(),
//!     r#".card-title.withText("Slayer").parent("app-book-card").find(".favourite")"#
//! );
//! ```
//!
//! Zero matches is a valid result. Callers wait for existence or visibility
//! through [`crate::expect::Expectation`] before acting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of a locator chain
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Step {
    /// Root CSS query over the document
    Css(String),
    /// Descendants of the current matches
    Find(String),
    /// Keep matches whose text content contains the string
    WithText(String),
    /// Keep matches whose trimmed text content equals the string
    WithExactText(String),
    /// Keep only the match at this index
    Nth(usize),
    /// Closest ancestor matching the CSS, or the immediate parent when `None`
    Parent(Option<String>),
    /// Keep matches that are rendered and visible
    FilterVisible,
}

/// Lazy query over the current document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locator {
    steps: Vec<Step>,
}

impl Locator {
    /// Create a locator rooted at a CSS selector
    #[must_use]
    pub fn new(css: impl Into<String>) -> Self {
        Self {
            steps: vec![Step::Css(css.into())],
        }
    }

    /// Descend into matching children
    #[must_use]
    pub fn find(self, css: impl Into<String>) -> Self {
        self.push(Step::Find(css.into()))
    }

    /// Filter by substring of the text content
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.push(Step::WithText(text.into()))
    }

    /// Filter by exact (trimmed) text content
    #[must_use]
    pub fn with_exact_text(self, text: impl Into<String>) -> Self {
        self.push(Step::WithExactText(text.into()))
    }

    /// Select the match at `index`
    #[must_use]
    pub fn nth(self, index: usize) -> Self {
        self.push(Step::Nth(index))
    }

    /// Move to the closest ancestor matching `css`
    #[must_use]
    pub fn parent(self, css: impl Into<String>) -> Self {
        self.push(Step::Parent(Some(css.into())))
    }

    /// Move to the immediate parent element
    #[must_use]
    pub fn parent_element(self) -> Self {
        self.push(Step::Parent(None))
    }

    /// Drop matches that are not visible
    #[must_use]
    pub fn filter_visible(self) -> Self {
        self.push(Step::FilterVisible)
    }

    fn push(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    /// Steps of the chain, root first
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Split off the last step, returning the remaining chain
    #[must_use]
    pub fn split_last(&self) -> Option<(Self, &Step)> {
        if self.steps.len() < 2 {
            return None;
        }
        let (last, rest) = self.steps.split_last()?;
        Some((
            Self {
                steps: rest.to_vec(),
            },
            last,
        ))
    }

    /// The same chain with every `nth` step removed
    #[must_use]
    pub fn without_nth(&self) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .filter(|step| !matches!(step, Step::Nth(_)))
                .cloned()
                .collect(),
        }
    }

    /// JavaScript expression evaluating to the array of matched elements
    #[must_use]
    pub fn to_query(&self) -> String {
        let mut js = String::from("(() => {\n");
        js.push_str(VISIBLE_FN);
        js.push_str("const uniq = (xs) => [...new Set(xs.filter(Boolean))];\n");
        js.push_str("let els = [];\n");
        for step in &self.steps {
            let line = match step {
                Step::Css(css) => format!(
                    "els = Array.from(document.querySelectorAll({}));",
                    js_string(css)
                ),
                Step::Find(css) => format!(
                    "els = uniq(els.flatMap((el) => Array.from(el.querySelectorAll({}))));",
                    js_string(css)
                ),
                Step::WithText(text) => format!(
                    "els = els.filter((el) => (el.textContent || '').includes({}));",
                    js_string(text)
                ),
                Step::WithExactText(text) => format!(
                    "els = els.filter((el) => (el.textContent || '').trim() === {}.trim());",
                    js_string(text)
                ),
                Step::Nth(index) => format!("els = els.length > {index} ? [els[{index}]] : [];"),
                Step::Parent(Some(css)) => format!(
                    "els = uniq(els.map((el) => \
                     el.parentElement && el.parentElement.closest({})));",
                    js_string(css)
                ),
                Step::Parent(None) => "els = uniq(els.map((el) => el.parentElement));".to_string(),
                Step::FilterVisible => "els = els.filter(visible);".to_string(),
            };
            js.push_str(&line);
            js.push('\n');
        }
        js.push_str("return els;\n})()");
        js
    }

    /// Wrap `body` in a script that binds the matches to `els`.
    ///
    /// The body must `return` a JSON-serializable value; the script returns it
    /// stringified so the result always carries a value.
    #[must_use]
    pub fn script(&self, body: &str) -> String {
        format!(
            "(() => {{\n{VISIBLE_FN}const els = {};\n\
             const __result = (() => {{ {body} }})();\n\
             return JSON.stringify(__result === undefined ? null : __result);\n}})()",
            self.to_query()
        )
    }
}

const VISIBLE_FN: &str = "const visible = (el) => { \
    const s = window.getComputedStyle(el); const r = el.getBoundingClientRect(); \
    return s.visibility !== 'hidden' && s.display !== 'none' && r.width > 0 && r.height > 0; };\n";

fn js_string(s: &str) -> String {
    serde_json::Value::String(s.to_string()).to_string()
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for step in &self.steps {
            match step {
                Step::Css(css) => write!(f, "{css}")?,
                Step::Find(css) => write!(f, ".find(\"{css}\")")?,
                Step::WithText(text) => write!(f, ".withText(\"{text}\")")?,
                Step::WithExactText(text) => write!(f, ".withExactText(\"{text}\")")?,
                Step::Nth(index) => write!(f, ".nth({index})")?,
                Step::Parent(Some(css)) => write!(f, ".parent(\"{css}\")")?,
                Step::Parent(None) => write!(f, ".parent(0)")?,
                Step::FilterVisible => write!(f, ".filterVisible()")?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod chain_tests {
        use super::*;

        #[test]
        fn test_builder_records_steps_in_order() {
            let loc = Locator::new("#mat-mdc-form-field-label-0")
                .parent("mat-form-field")
                .find(".mat-mdc-form-field-error");
            assert_eq!(
                loc.steps(),
                &[
                    Step::Css("#mat-mdc-form-field-label-0".into()),
                    Step::Parent(Some("mat-form-field".into())),
                    Step::Find(".mat-mdc-form-field-error".into()),
                ]
            );
        }

        #[test]
        fn test_display_matches_chain_notation() {
            let form = Locator::new(".mat-mdc-card-content .mat-mdc-card-title")
                .with_text("Shipping address")
                .parent_element()
                .find("form");
            assert_eq!(
                form.to_string(),
                ".mat-mdc-card-content .mat-mdc-card-title\
                 .withText(\"Shipping address\").parent(0).find(\"form\")"
            );

            let details = Locator::new(".example-element-detail mat-card-content").filter_visible();
            assert!(details.to_string().ends_with(".filterVisible()"));

            let icon = Locator::new("mat-toolbar mat-icon.material-icons").nth(2);
            assert_eq!(icon.to_string(), "mat-toolbar mat-icon.material-icons.nth(2)");
        }

        #[test]
        fn test_split_last() {
            let loc = Locator::new("table thead tr th").nth(3);
            let (base, last) = loc.split_last().unwrap();
            assert_eq!(base, Locator::new("table thead tr th"));
            assert_eq!(last, &Step::Nth(3));
            assert!(Locator::new("table").split_last().is_none());
        }

        #[test]
        fn test_without_nth() {
            let loc = Locator::new(".card-deck-container app-book-card")
                .nth(4)
                .find("img");
            assert_eq!(
                loc.without_nth(),
                Locator::new(".card-deck-container app-book-card").find("img")
            );
        }
    }

    mod query_tests {
        use super::*;

        #[test]
        fn test_query_escapes_selector_quotes() {
            let query = Locator::new("input[placeholder=\"Username\"]").to_query();
            let select = r#"document.querySelectorAll("input[placeholder=\"Username\"]")"#;
            assert!(query.contains(select));
            assert!(query.trim_end().ends_with("})()"));
        }

        #[test]
        fn test_query_text_filters() {
            let query = Locator::new("mat-option span")
                .with_exact_text("Red Rising")
                .to_query();
            assert!(query.contains(".trim() === \"Red Rising\".trim()"));

            let query = Locator::new(".mdc-button__label").with_text("Clear cart").to_query();
            assert!(query.contains(".includes(\"Clear cart\")"));
        }

        #[test]
        fn test_query_keeps_unicode() {
            let query = Locator::new("tfoot th").with_exact_text("₹315.00").to_query();
            assert!(query.contains("\"₹315.00\""));
        }

        #[test]
        fn test_query_parent_and_nth() {
            let query = Locator::new(".card-title")
                .with_text("Robbie")
                .parent("app-book-card")
                .nth(0)
                .to_query();
            assert!(query.contains("el.parentElement.closest(\"app-book-card\")"));
            assert!(query.contains("els.length > 0 ? [els[0]] : []"));
        }

        #[test]
        fn test_script_stringifies_result() {
            let script = Locator::new("mat-error").script("return els.length;");
            assert!(script.contains("return els.length;"));
            assert!(script.contains("JSON.stringify"));
            assert!(script.contains("const visible"));
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_text_filter_is_embedded_as_json_literal(text in ".{0,24}") {
                let query = Locator::new("span").with_text(text.clone()).to_query();
                let literal = serde_json::to_string(&text).unwrap();
                prop_assert!(query.contains(&literal));
            }

            #[test]
            fn prop_display_grows_with_each_step(n in 0usize..8) {
                let mut loc = Locator::new("tr");
                for i in 0..n {
                    loc = loc.nth(i);
                }
                prop_assert_eq!(loc.steps().len(), n + 1);
                prop_assert_eq!(loc.to_string().matches(".nth(").count(), n);
            }
        }
    }
}
