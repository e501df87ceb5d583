//! Chromium engine over the DevTools protocol.
//!
//! Queries evaluate [`Locator::to_query`] in the page. Actions tag the first
//! match with a one-off `data-bookcart-ref` attribute, resolve it as a CDP
//! element and drive real input events on it.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType, InsertTextParams, MouseButton,
};
use chromiumoxide::element::Element;
use chromiumoxide::handler::viewport::Viewport;
use chromiumoxide::layout::Point;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Engine, Key, TypeMode};
use crate::config::{BrowserConfig, SuiteConfig};
use crate::locator::Locator;
use crate::result::{BookcartError, BookcartResult};
use crate::runner::SessionProvider;
use crate::session::Session;

const REF_ATTRIBUTE: &str = "data-bookcart-ref";

const SELECT_ALL_SCRIPT: &str = "JSON.stringify((() => { \
    const el = document.activeElement; \
    if (el && typeof el.select === 'function') { el.select(); } \
    else { document.execCommand('selectAll'); } \
    return true; })())";

/// Running Chromium instance
#[derive(Debug)]
pub struct CdpBrowser {
    config: SuiteConfig,
    inner: Arc<Mutex<Browser>>,
    #[allow(dead_code)]
    handle: tokio::task::JoinHandle<()>,
}

impl CdpBrowser {
    /// Launch Chromium with the suite's browser settings
    pub async fn launch(config: SuiteConfig) -> BookcartResult<Self> {
        let cdp_config = cdp_config(&config.browser)?;

        let (browser, mut handler) =
            Browser::launch(cdp_config)
                .await
                .map_err(|e| BookcartError::BrowserLaunchError {
                    message: e.to_string(),
                })?;

        let handle = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    warn!(error = %e, "CDP handler stopped");
                    break;
                }
            }
        });

        debug!(headless = config.browser.headless, "browser launched");
        Ok(Self {
            config,
            inner: Arc::new(Mutex::new(browser)),
            handle,
        })
    }

    /// Open a fresh page
    pub async fn new_engine(&self) -> BookcartResult<CdpEngine> {
        let browser = self.inner.lock().await;
        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        Ok(CdpEngine { page })
    }

    /// Suite configuration the browser was launched with
    #[must_use]
    pub const fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Close the browser
    pub async fn close(self) -> BookcartResult<()> {
        let mut browser = self.inner.lock().await;
        browser
            .close()
            .await
            .map_err(|e| BookcartError::BrowserLaunchError {
                message: e.to_string(),
            })?;
        Ok(())
    }
}

fn cdp_config(browser: &BrowserConfig) -> BookcartResult<CdpConfig> {
    let mut builder = CdpConfig::builder()
        .window_size(browser.viewport_width, browser.viewport_height)
        .viewport(Viewport {
            width: browser.viewport_width,
            height: browser.viewport_height,
            ..Viewport::default()
        });

    if !browser.headless {
        builder = builder.with_head();
    }

    if !browser.sandbox {
        builder = builder.no_sandbox();
    }

    let executable = browser.executable()?;
    if let Some(path) = executable {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(|message| {
        if executable.is_none() {
            debug!(%message, "chromium auto-detection failed");
            BookcartError::BrowserNotFound
        } else {
            BookcartError::BrowserLaunchError { message }
        }
    })
}

#[async_trait]
impl SessionProvider for CdpBrowser {
    async fn open_session(&self) -> BookcartResult<Session> {
        let engine = self.new_engine().await?;
        Ok(Session::new(Arc::new(engine), self.config.clone()))
    }

    async fn close_session(&self, session: Session) -> BookcartResult<()> {
        session.engine().close().await
    }
}

/// One Chromium tab
#[derive(Debug, Clone)]
pub struct CdpEngine {
    page: Page,
}

impl CdpEngine {
    /// Wrap an existing page
    #[must_use]
    pub const fn new(page: Page) -> Self {
        Self { page }
    }

    async fn eval<T: DeserializeOwned>(&self, script: String) -> BookcartResult<T> {
        let result = self
            .page
            .evaluate_expression(script)
            .await
            .map_err(|e| BookcartError::script(e.to_string()))?;
        let json: String = result
            .into_value()
            .map_err(|e| BookcartError::script(e.to_string()))?;
        Ok(serde_json::from_str(&json)?)
    }

    async fn first<T: DeserializeOwned>(
        &self,
        locator: &Locator,
        expr: &str,
    ) -> BookcartResult<Option<T>> {
        self.eval(locator.script(&format!(
            "const el = els[0]; return el ? ({expr}) : null;"
        )))
        .await
    }

    async fn element(&self, locator: &Locator) -> BookcartResult<Element> {
        let tag = Uuid::new_v4().to_string();
        let found: bool = self
            .eval(locator.script(&format!(
                "if (!els[0]) return false; \
                 els[0].setAttribute('{REF_ATTRIBUTE}', '{tag}'); return true;"
            )))
            .await?;
        if !found {
            return Err(BookcartError::ElementNotFound {
                locator: locator.to_string(),
            });
        }
        self.page
            .find_element(format!("[{REF_ATTRIBUTE}=\"{tag}\"]"))
            .await
            .map_err(|e| BookcartError::page(e.to_string()))
    }

    async fn mouse(
        &self,
        point: Point,
        kind: DispatchMouseEventType,
        clicks: i64,
    ) -> BookcartResult<()> {
        let params = DispatchMouseEventParams::builder()
            .r#type(kind)
            .x(point.x)
            .y(point.y)
            .button(MouseButton::Left)
            .click_count(clicks)
            .build()
            .map_err(BookcartError::page)?;
        self.page
            .execute(params)
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Engine for CdpEngine {
    async fn navigate(&self, url: &str) -> BookcartResult<()> {
        debug!(url, "navigate");
        self.page
            .goto(url)
            .await
            .map_err(|e| BookcartError::NavigationError {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> BookcartResult<String> {
        self.eval("JSON.stringify(window.location.href)".to_string())
            .await
    }

    async fn count(&self, locator: &Locator) -> BookcartResult<usize> {
        self.eval(locator.script("return els.length;")).await
    }

    async fn is_visible(&self, locator: &Locator) -> BookcartResult<bool> {
        self.eval(locator.script("return els.length > 0 && visible(els[0]);"))
            .await
    }

    async fn inner_text(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        self.first(locator, "el.innerText").await
    }

    async fn text_content(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        self.first(locator, "el.textContent").await
    }

    async fn input_value(&self, locator: &Locator) -> BookcartResult<Option<String>> {
        self.first(locator, "el.value === undefined ? null : el.value")
            .await
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> BookcartResult<Option<String>> {
        let name = serde_json::Value::String(name.to_string());
        self.first(locator, &format!("el.getAttribute({name})")).await
    }

    async fn click(&self, locator: &Locator) -> BookcartResult<()> {
        debug!(%locator, "click");
        self.element(locator)
            .await?
            .click()
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        Ok(())
    }

    async fn double_click(&self, locator: &Locator) -> BookcartResult<()> {
        debug!(%locator, "double click");
        let element = self.element(locator).await?;
        let point = element
            .scroll_into_view()
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?
            .clickable_point()
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        for clicks in 1..=2 {
            self.mouse(point, DispatchMouseEventType::MousePressed, clicks)
                .await?;
            self.mouse(point, DispatchMouseEventType::MouseReleased, clicks)
                .await?;
        }
        Ok(())
    }

    async fn type_text(
        &self,
        locator: &Locator,
        text: &str,
        mode: TypeMode,
    ) -> BookcartResult<()> {
        debug!(%locator, ?mode, "type");
        let element = self.element(locator).await?;
        element
            .focus()
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        if mode == TypeMode::Replace {
            let _: bool = self
                .eval(locator.script(
                    "const el = els[0]; \
                     if (el && typeof el.select === 'function') { el.select(); } return true;",
                ))
                .await?;
        }
        self.page
            .execute(InsertTextParams::new(text))
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        Ok(())
    }

    async fn press_key(&self, key: Key) -> BookcartResult<()> {
        debug!(key = key.name(), "press");
        if key == Key::SelectAll {
            let _: bool = self
                .eval(SELECT_ALL_SCRIPT.to_string())
                .await?;
            return Ok(());
        }
        let focused = self
            .page
            .find_element(":focus")
            .await
            .map_err(|e| {
                BookcartError::page(format!("No focused element for {}: {e}", key.name()))
            })?;
        focused
            .press_key(key.name())
            .await
            .map_err(|e| BookcartError::page(e.to_string()))?;
        Ok(())
    }

    async fn close(&self) -> BookcartResult<()> {
        self.page
            .clone()
            .close()
            .await
            .map_err(|e| BookcartError::page(e.to_string()))
    }
}
