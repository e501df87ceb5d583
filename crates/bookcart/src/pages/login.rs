//! Login screen.

use crate::engine::Key;
use crate::locator::Locator;
use crate::page_object::{PageContext, PageObject};
use crate::result::BookcartResult;

/// Seeded account username
pub const VALID_USERNAME: &str = "SamUser";

/// Seeded account password
pub const VALID_PASSWORD: &str = "Samuser123";

/// Shown when the server rejects a login
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Username or Password is incorrect.";

/// Shown under a blank username
pub const USERNAME_REQUIRED_MESSAGE: &str = "Username is required";

/// Shown under a blank password
pub const PASSWORD_REQUIRED_MESSAGE: &str = "Password is required";

/// Login page object
#[derive(Debug, Clone)]
pub struct LoginPage {
    ctx: PageContext,
    username_input: Locator,
    password_input: Locator,
    login_button: Locator,
    logged_in_user: Locator,
    error_message: Locator,
    empty_username_error: Locator,
    empty_password_error: Locator,
}

impl LoginPage {
    /// Build the page over a session context
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            username_input: Locator::new("input[placeholder=\"Username\"]"),
            password_input: Locator::new("input[placeholder=\"Password\"]"),
            login_button: Locator::new(".mdc-card .mdc-button .mdc-button__label")
                .with_text("Login"),
            logged_in_user: Locator::new(".mat-mdc-menu-trigger .mdc-button__label span"),
            error_message: Locator::new("mat-error.mat-mdc-form-field-error"),
            empty_username_error: Locator::new("#mat-mdc-form-field-label-0")
                .parent("mat-form-field")
                .find(".mat-mdc-form-field-error"),
            empty_password_error: Locator::new("#mat-mdc-form-field-label-2")
                .parent("mat-form-field")
                .find(".mat-mdc-form-field-error"),
        }
    }

    /// Username input
    #[must_use]
    pub const fn username_input(&self) -> &Locator {
        &self.username_input
    }

    /// Password input
    #[must_use]
    pub const fn password_input(&self) -> &Locator {
        &self.password_input
    }

    /// Login submit button
    #[must_use]
    pub const fn login_button(&self) -> &Locator {
        &self.login_button
    }

    /// Username shown in the toolbar once logged in
    #[must_use]
    pub const fn logged_in_user(&self) -> &Locator {
        &self.logged_in_user
    }

    /// Server-side rejection message
    #[must_use]
    pub const fn error_message(&self) -> &Locator {
        &self.error_message
    }

    /// Required-message under the username input
    #[must_use]
    pub const fn empty_username_error(&self) -> &Locator {
        &self.empty_username_error
    }

    /// Required-message under the password input
    #[must_use]
    pub const fn empty_password_error(&self) -> &Locator {
        &self.empty_password_error
    }

    async fn enter_credentials(&self, username: &str, password: &str) -> BookcartResult<()> {
        self.ctx
            .expect(&self.username_input)
            .precondition()
            .with_message("Username Input field not visible")
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.password_input)
            .precondition()
            .with_message("Password Input field not visible")
            .to_be_visible()
            .await?;
        self.ctx.type_text(&self.username_input, username).await?;
        self.ctx.type_text(&self.password_input, password).await
    }

    async fn submit(&self) -> BookcartResult<()> {
        self.ctx
            .expect(&self.login_button)
            .precondition()
            .with_message("Login Button not visible")
            .to_be_visible()
            .await?;
        self.ctx.click(&self.login_button).await
    }

    /// Log in and check the toolbar shows `username`
    pub async fn login_to_app(&self, username: &str, password: &str) -> BookcartResult<()> {
        tracing::debug!(username, "logging in");
        self.enter_credentials(username, password).await?;
        self.submit().await?;
        self.ctx
            .expect(&self.logged_in_user)
            .with_message("Expected User Was not Logged In")
            .to_have_text(username)
            .await
    }

    /// Submit credentials without checking the outcome
    pub async fn perform_login(&self, username: &str, password: &str) -> BookcartResult<()> {
        self.enter_credentials(username, password).await?;
        self.ctx
            .expect(&self.error_message)
            .precondition()
            .with_message("Expected Error Message not to be visible while entering Data")
            .not()
            .to_exist()
            .await?;
        self.submit().await
    }

    /// Leave a field touched but empty so its required-validation fires.
    ///
    /// The login form only validates fields that received input, so a space
    /// is typed and deleted.
    pub async fn blank_field(&self, field: &Locator) -> BookcartResult<()> {
        self.ctx.type_text(field, " ").await?;
        self.ctx.press_key(Key::Backspace).await
    }

    /// Submit with whitespace-only values treated as blank fields
    pub async fn submit_blank_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> BookcartResult<()> {
        let fields = [(&self.username_input, username), (&self.password_input, password)];
        for (field, value) in fields {
            if value.trim().is_empty() {
                self.blank_field(field).await?;
            } else {
                self.ctx.type_text(field, value).await?;
            }
        }
        self.submit().await
    }

    /// Rejection message is shown
    pub async fn expect_invalid_credentials_error(&self) -> BookcartResult<()> {
        self.ctx
            .expect(&self.error_message)
            .with_message("Expected Invalid Error Message Visible")
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.error_message)
            .with_message("Invalid Error Message is not as expected")
            .to_have_text_content(INVALID_CREDENTIALS_MESSAGE)
            .await
    }

    /// Username required-message is shown
    pub async fn expect_username_required(&self) -> BookcartResult<()> {
        self.ctx
            .expect(&self.empty_username_error)
            .with_message("Expected empty field error message for Username should be visible")
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.empty_username_error)
            .with_message("Empty Username error Message not as expected")
            .to_have_text_content(USERNAME_REQUIRED_MESSAGE)
            .await
    }

    /// Password required-message is shown
    pub async fn expect_password_required(&self) -> BookcartResult<()> {
        self.ctx
            .expect(&self.empty_password_error)
            .with_message("Expected empty field error message for Password should be visible")
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.empty_password_error)
            .with_message("Empty Password error Message not as expected")
            .to_have_text_content(PASSWORD_REQUIRED_MESSAGE)
            .await
    }
}

impl PageObject for LoginPage {
    fn page_name(&self) -> &'static str {
        "Login"
    }

    fn url_pattern(&self) -> &'static str {
        "/login"
    }

    fn locators(&self) -> Vec<(&'static str, &Locator)> {
        vec![
            ("username_input", &self.username_input),
            ("password_input", &self.password_input),
            ("login_button", &self.login_button),
            ("logged_in_user", &self.logged_in_user),
            ("error_message", &self.error_message),
            ("empty_username_error", &self.empty_username_error),
            ("empty_password_error", &self.empty_password_error),
        ]
    }
}
