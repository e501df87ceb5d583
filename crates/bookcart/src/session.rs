//! One browser tab and the page objects bound to it.

use std::sync::Arc;

use crate::assertion::Assertion;
use crate::config::SuiteConfig;
use crate::engine::Engine;
use crate::page_object::PageContext;
use crate::pages::{HomePage, LoginPage, RegisterPage};
use crate::result::{AssertionKind, BookcartResult};

/// Page objects sharing one engine
#[derive(Debug, Clone)]
pub struct Session {
    ctx: PageContext,
    config: SuiteConfig,
    login: LoginPage,
    home: HomePage,
    register: RegisterPage,
}

impl Session {
    /// Bind the page objects to `engine`
    #[must_use]
    pub fn new(engine: Arc<dyn Engine>, config: SuiteConfig) -> Self {
        let ctx = PageContext::new(engine, config.timeouts);
        Self {
            login: LoginPage::new(ctx.clone()),
            home: HomePage::new(ctx.clone()),
            register: RegisterPage::new(ctx.clone()),
            ctx,
            config,
        }
    }

    /// The session's engine
    #[must_use]
    pub fn engine(&self) -> &dyn Engine {
        self.ctx.engine()
    }

    /// Shared page context
    #[must_use]
    pub const fn context(&self) -> &PageContext {
        &self.ctx
    }

    /// Suite configuration
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Login page
    #[must_use]
    pub const fn login(&self) -> &LoginPage {
        &self.login
    }

    /// Home page
    #[must_use]
    pub const fn home(&self) -> &HomePage {
        &self.home
    }

    /// Registration page
    #[must_use]
    pub const fn register(&self) -> &RegisterPage {
        &self.register
    }

    /// Load the login page and check the browser stayed there
    pub async fn open_login_page(&self) -> BookcartResult<()> {
        let url = self.config.login_url();
        self.engine().navigate(&url).await?;
        let current = self.engine().current_url().await?;
        Assertion::equals(url.as_str(), current.as_str())
            .into_result(AssertionKind::Precondition, "Current Page is not Login Page")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;
    use crate::test_support::mock_session;

    #[tokio::test]
    async fn test_open_login_page_navigates() {
        let (engine, session) = mock_session();
        session.open_login_page().await.unwrap();
        assert_eq!(
            engine.history(),
            vec![format!("navigate:{}", session.config().login_url())]
        );
    }

    /// Engine whose page redirects away from wherever it is sent
    struct Redirecting(MockEngine);

    #[async_trait::async_trait]
    impl Engine for Redirecting {
        async fn navigate(&self, _url: &str) -> BookcartResult<()> {
            self.0.navigate("https://bookcart.azurewebsites.net/").await
        }
        async fn current_url(&self) -> BookcartResult<String> {
            self.0.current_url().await
        }
        async fn count(&self, l: &crate::Locator) -> BookcartResult<usize> {
            self.0.count(l).await
        }
        async fn is_visible(&self, l: &crate::Locator) -> BookcartResult<bool> {
            self.0.is_visible(l).await
        }
        async fn inner_text(&self, l: &crate::Locator) -> BookcartResult<Option<String>> {
            self.0.inner_text(l).await
        }
        async fn text_content(&self, l: &crate::Locator) -> BookcartResult<Option<String>> {
            self.0.text_content(l).await
        }
        async fn input_value(&self, l: &crate::Locator) -> BookcartResult<Option<String>> {
            self.0.input_value(l).await
        }
        async fn attribute(
            &self,
            l: &crate::Locator,
            name: &str,
        ) -> BookcartResult<Option<String>> {
            self.0.attribute(l, name).await
        }
        async fn click(&self, l: &crate::Locator) -> BookcartResult<()> {
            self.0.click(l).await
        }
        async fn double_click(&self, l: &crate::Locator) -> BookcartResult<()> {
            self.0.double_click(l).await
        }
        async fn type_text(
            &self,
            l: &crate::Locator,
            text: &str,
            mode: crate::engine::TypeMode,
        ) -> BookcartResult<()> {
            self.0.type_text(l, text, mode).await
        }
        async fn press_key(&self, key: crate::engine::Key) -> BookcartResult<()> {
            self.0.press_key(key).await
        }
    }

    #[tokio::test]
    async fn test_redirect_is_precondition_failure() {
        let session = Session::new(Arc::new(Redirecting(MockEngine::new())), SuiteConfig::new());
        let err = session.open_login_page().await.unwrap_err();
        assert_eq!(err.assertion_kind(), Some(AssertionKind::Precondition));
        assert!(err.to_string().contains("Current Page is not Login Page"));
    }
}
