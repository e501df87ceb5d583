//! Browser automation engine seam.
//!
//! Page objects talk to the browser only through [`Engine`]. Queries never
//! fail on zero matches: counts are zero, reads are `None`. Actions on a
//! locator with no match return
//! [`crate::BookcartError::ElementNotFound`].
//!
//! Two implementations ship with the crate:
//! - [`MockEngine`]: scripted in-memory document for unit tests
//! - `CdpEngine`: Chromium over the DevTools protocol (feature `browser`)

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::locator::Locator;
use crate::result::BookcartResult;

#[cfg(feature = "browser")]
pub mod cdp;
pub mod mock;

#[cfg(feature = "browser")]
pub use cdp::{CdpBrowser, CdpEngine};
pub use mock::{MockDom, MockElement, MockEngine};

/// Keys the suite presses on the focused element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Delete one character, or the selection
    Backspace,
    /// Submit
    Enter,
    /// Select the whole field content (ctrl+a)
    SelectAll,
}

impl Key {
    /// DOM key name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Backspace => "Backspace",
            Self::Enter => "Enter",
            Self::SelectAll => "ctrl+a",
        }
    }
}

/// How typed text combines with the existing field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TypeMode {
    /// Insert after the current value
    #[default]
    Append,
    /// Clear the field first
    Replace,
}

/// Browser automation backend
#[async_trait]
pub trait Engine: Send + Sync {
    /// Navigate the page to a URL
    async fn navigate(&self, url: &str) -> BookcartResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> BookcartResult<String>;

    /// Number of elements the locator matches
    async fn count(&self, locator: &Locator) -> BookcartResult<usize>;

    /// Whether the first match is rendered and visible
    async fn is_visible(&self, locator: &Locator) -> BookcartResult<bool>;

    /// Rendered text of the first match
    async fn inner_text(&self, locator: &Locator) -> BookcartResult<Option<String>>;

    /// Raw text content of the first match
    async fn text_content(&self, locator: &Locator) -> BookcartResult<Option<String>>;

    /// Current value of the first matching input
    async fn input_value(&self, locator: &Locator) -> BookcartResult<Option<String>>;

    /// Attribute of the first match
    async fn attribute(&self, locator: &Locator, name: &str) -> BookcartResult<Option<String>>;

    /// Click the first match
    async fn click(&self, locator: &Locator) -> BookcartResult<()>;

    /// Double-click the first match
    async fn double_click(&self, locator: &Locator) -> BookcartResult<()>;

    /// Focus the first match and type `text` into it
    async fn type_text(&self, locator: &Locator, text: &str, mode: TypeMode)
        -> BookcartResult<()>;

    /// Press a key on the focused element
    async fn press_key(&self, key: Key) -> BookcartResult<()>;

    /// Release the page; the engine is unusable afterwards
    async fn close(&self) -> BookcartResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::Backspace.name(), "Backspace");
        assert_eq!(Key::Enter.name(), "Enter");
        assert_eq!(Key::SelectAll.name(), "ctrl+a");
    }

    #[test]
    fn test_type_mode_default_appends() {
        assert_eq!(TypeMode::default(), TypeMode::Append);
    }
}
