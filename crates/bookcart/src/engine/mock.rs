//! Scripted in-memory engine for unit tests.
//!
//! The document is a map from locator description (its `Display` form) to a
//! [`MockElement`]. Lookups fall back in two ways so tests don't need to list
//! every index:
//! - `base.nth(i)` resolves to `base` when `i` is below its count
//! - a chain with `nth` steps inside resolves to the same chain without them
//!
//! Click handlers mutate the document to script page reactions.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{Engine, Key, TypeMode};
use crate::locator::{Locator, Step};
use crate::result::{BookcartError, BookcartResult};

/// Element in the mock document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockElement {
    /// Number of matches the locator yields
    pub count: usize,
    /// Whether the element is rendered and visible
    pub visible: bool,
    /// Rendered text, as `innerText` reports it
    pub text: String,
    /// Raw `textContent`, when it differs from `text`
    pub content: Option<String>,
    /// Input value, for form fields
    pub value: Option<String>,
    /// CSS classes
    pub classes: Vec<String>,
    /// Other attributes
    pub attributes: HashMap<String, String>,
}

impl Default for MockElement {
    fn default() -> Self {
        Self {
            count: 1,
            visible: true,
            text: String::new(),
            content: None,
            value: None,
            classes: Vec::new(),
            attributes: HashMap::new(),
        }
    }
}

impl MockElement {
    /// Visible element with one match
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Visible element with text
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new().with_text(text)
    }

    /// Empty input field
    #[must_use]
    pub fn input() -> Self {
        Self::new().with_value("")
    }

    /// Set the rendered text
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Set a raw `textContent` that differs from the rendered text
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Set the input value
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Set the number of matches
    #[must_use]
    pub const fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Add a CSS class
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set an attribute
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Present in the document but not visible
    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// Mutable state of the mock page
#[derive(Debug, Clone, Default)]
pub struct MockDom {
    url: String,
    elements: HashMap<String, MockElement>,
    focused: Option<String>,
    selected_all: bool,
}

impl MockDom {
    /// Current URL
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Set the current URL
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    /// Insert or replace an element
    pub fn insert(&mut self, key: impl ToString, element: MockElement) {
        self.elements.insert(key.to_string(), element);
    }

    /// Remove an element
    pub fn remove(&mut self, key: impl ToString) -> Option<MockElement> {
        self.elements.remove(&key.to_string())
    }

    /// Element stored under exactly this key
    #[must_use]
    pub fn element(&self, key: impl ToString) -> Option<&MockElement> {
        self.elements.get(&key.to_string())
    }

    /// Mutable element stored under exactly this key
    pub fn element_mut(&mut self, key: impl ToString) -> Option<&mut MockElement> {
        self.elements.get_mut(&key.to_string())
    }

    /// Set the text of an element, inserting a visible one if missing.
    /// Any raw content set earlier is dropped.
    pub fn set_text(&mut self, key: impl ToString, text: impl Into<String>) {
        let element = self.elements.entry(key.to_string()).or_default();
        element.text = text.into();
        element.content = None;
    }

    /// Value of an input, if present
    #[must_use]
    pub fn value_of(&self, key: impl ToString) -> Option<String> {
        self.element(key).and_then(|el| el.value.clone())
    }

    /// Key of the focused element
    #[must_use]
    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    fn resolve_key(&self, locator: &Locator) -> Option<(String, usize)> {
        let key = locator.to_string();
        if let Some(el) = self.elements.get(&key) {
            return (el.count > 0).then_some((key, el.count));
        }
        if let Some((base, Step::Nth(index))) = locator.split_last() {
            return self
                .resolve_key(&base)
                .filter(|(_, count)| index < count)
                .map(|(key, _)| (key, 1));
        }
        let stripped = locator.without_nth();
        if stripped != *locator {
            return self.resolve_key(&stripped);
        }
        None
    }

    fn resolve(&self, locator: &Locator) -> Option<(&str, &MockElement, usize)> {
        let (key, count) = self.resolve_key(locator)?;
        let (key, el) = self.elements.get_key_value(&key)?;
        Some((key.as_str(), el, count))
    }

    fn require(&self, locator: &Locator) -> BookcartResult<String> {
        self.resolve(locator)
            .map(|(key, _, _)| key.to_string())
            .ok_or_else(|| BookcartError::ElementNotFound {
                locator: locator.to_string(),
            })
    }
}

type ClickHandler = Arc<dyn Fn(&mut MockDom) + Send + Sync>;

/// In-memory engine
#[derive(Default)]
pub struct MockEngine {
    dom: Mutex<MockDom>,
    handlers: Mutex<HashMap<String, Vec<ClickHandler>>>,
    history: Mutex<Vec<String>>,
}

impl fmt::Debug for MockEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockEngine")
            .field("dom", &*lock(&self.dom))
            .field("history", &*lock(&self.history))
            .finish_non_exhaustive()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockEngine {
    /// Create an empty mock page
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at a URL
    #[must_use]
    pub fn with_url(self, url: impl Into<String>) -> Self {
        lock(&self.dom).set_url(url);
        self
    }

    /// Add an element
    #[must_use]
    pub fn with_element(self, key: impl ToString, element: MockElement) -> Self {
        self.insert(key, element);
        self
    }

    /// Add an element
    pub fn insert(&self, key: impl ToString, element: MockElement) {
        lock(&self.dom).insert(key, element);
    }

    /// Run a closure against the document
    pub fn with_dom<R>(&self, f: impl FnOnce(&mut MockDom) -> R) -> R {
        f(&mut lock(&self.dom))
    }

    /// Script the page's reaction to clicking `key`
    pub fn on_click(
        &self,
        key: impl ToString,
        handler: impl Fn(&mut MockDom) + Send + Sync + 'static,
    ) {
        lock(&self.handlers)
            .entry(key.to_string())
            .or_default()
            .push(Arc::new(handler));
    }

    /// Recorded calls, e.g. `click:.brand-title`
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        lock(&self.history).clone()
    }

    /// Whether any recorded call starts with `prefix`
    #[must_use]
    pub fn was_called(&self, prefix: &str) -> bool {
        lock(&self.history).iter().any(|c| c.starts_with(prefix))
    }

    /// Number of recorded calls equal to `call`
    #[must_use]
    pub fn call_count(&self, call: &str) -> usize {
        lock(&self.history).iter().filter(|c| *c == call).count()
    }

    fn record(&self, call: String) {
        lock(&self.history).push(call);
    }

    fn fire_click(&self, locator: &Locator) -> BookcartResult<()> {
        let key = {
            let mut dom = lock(&self.dom);
            let key = dom.require(locator)?;
            dom.focused = Some(key.clone());
            dom.selected_all = false;
            key
        };
        let clicked = locator.to_string();
        let handlers: Vec<ClickHandler> = {
            let handlers = lock(&self.handlers);
            let mut found = handlers.get(&clicked).cloned().unwrap_or_default();
            if key != clicked {
                found.extend(handlers.get(&key).cloned().unwrap_or_default());
            }
            found
        };
        let mut dom = lock(&self.dom);
        for handler in handlers {
            handler(&mut dom);
        }
        Ok(())
    }
}

#[async_trait]
impl Engine for MockEngine {
    async fn navigate(&self, url: &str) -> BookcartResult<()> {
        self.record(format!("navigate:{url}"));
        lock(&self.dom).set_url(url);
        Ok(())
    }

    async fn current_url(&self) -> BookcartResult<String> {
        Ok(lock(&self.dom).url.clone())
    }

    async fn count(&self, locator: &Locator) -> BookcartResult<usize> {
        Ok(lock(&self.dom)
            .resolve(locator)
            .map_or(0, |(_, _, count)| count))
    }

    async fn is_visible(&self, locator: &Locator) -> BookcartResult<bool> {
        Ok(lock(&self.dom)
            .resolve(locator)
            .is_some_and(|(_, el, _)| el.visible))
    }

    async fn inner_text(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        Ok(lock(&self.dom)
            .resolve(locator)
            .map(|(_, el, _)| el.text.clone()))
    }

    async fn text_content(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        Ok(lock(&self.dom)
            .resolve(locator)
            .map(|(_, el, _)| el.content.clone().unwrap_or_else(|| el.text.clone())))
    }

    async fn input_value(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        Ok(lock(&self.dom)
            .resolve(locator)
            .and_then(|(_, el, _)| el.value.clone()))
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> BookcartResult<Option<String>> {
        Ok(lock(&self.dom).resolve(locator).and_then(|(_, el, _)| {
            if name == "class" {
                Some(el.classes.join(" "))
            } else {
                el.attributes.get(name).cloned()
            }
        }))
    }

    async fn click(&self, locator: &Locator) -> BookcartResult<()> {
        self.record(format!("click:{locator}"));
        self.fire_click(locator)
    }

    async fn double_click(&self, locator: &Locator) -> BookcartResult<()> {
        self.record(format!("double_click:{locator}"));
        self.fire_click(locator)
    }

    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        mode: TypeMode,
    ) -> BookcartResult<()> {
        self.record(format!("type:{locator}:{text}"));
        let mut dom = lock(&self.dom);
        let key = dom.require(locator)?;
        if let Some(el) = dom.elements.get_mut(&key) {
            let value = match mode {
                TypeMode::Replace => text.to_string(),
                TypeMode::Append => format!("{}{text}", el.value.as_deref().unwrap_or_default()),
            };
            el.value = Some(value);
        }
        dom.focused = Some(key);
        dom.selected_all = false;
        Ok(())
    }

    async fn press_key(&self, key: Key) -> BookcartResult<()> {
        self.record(format!("press:{}", key.name()));
        let mut dom = lock(&self.dom);
        let focused = dom
            .focused
            .clone()
            .ok_or_else(|| BookcartError::page(format!("No focused element for {}", key.name())))?;
        match key {
            Key::SelectAll => dom.selected_all = true,
            Key::Backspace => {
                let clear = dom.selected_all;
                let value = dom
                    .elements
                    .get_mut(&focused)
                    .and_then(|el| el.value.as_mut());
                if let Some(value) = value {
                    if clear {
                        value.clear();
                    } else {
                        value.pop();
                    }
                }
                dom.selected_all = false;
            }
            Key::Enter => dom.selected_all = false,
        }
        Ok(())
    }
}
