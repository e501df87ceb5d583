//! User registration screen.

use rand::Rng;

use crate::engine::Key;
use crate::fixture::FormField;
use crate::locator::Locator;
use crate::page_object::{PageContext, PageObject};
use crate::result::BookcartResult;

/// Title of the registration card
pub const REGISTRATION_TITLE: &str = "User Registration";

/// Title of the card shown after a successful registration
pub const LOGIN_TITLE: &str = "Login";

/// Confirmation differs from the password
pub const PASSWORD_MISMATCH_MESSAGE: &str = " Password do not match";

/// Username already taken
pub const USERNAME_TAKEN_MESSAGE: &str = "User Name is not available";

/// Password fails the strength rule
pub const PASSWORD_FORMAT_MESSAGE: &str =
    " Password should have minimum 8 characters, at least 1 uppercase letter, \
     1 lowercase letter and 1 number";

const CHECKED_CLASS: &str = "mat-mdc-radio-checked";
const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Random `[A-Za-z]` string of `length` characters
#[must_use]
pub fn generate_string(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| char::from(LETTERS[rng.gen_range(0..LETTERS.len())]))
        .collect()
}

/// `base` followed by one to four random letters
#[must_use]
pub fn unique_username(base: &str) -> String {
    let suffix = rand::thread_rng().gen_range(1..=4);
    format!("{}{}", base.trim(), generate_string(suffix))
}

/// Registration page object
#[derive(Debug, Clone)]
pub struct RegisterPage {
    ctx: PageContext,
    register_button: Locator,
    page_title: Locator,
    submit_button: Locator,
    form_error: Locator,
}

impl RegisterPage {
    /// Build the page over a session context
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            register_button: Locator::new(".mdc-button__label").with_text("Register"),
            page_title: Locator::new("mat-card-header mat-card-title"),
            submit_button: Locator::new("app-user-registration button").with_text("Register"),
            form_error: Locator::new("mat-error"),
        }
    }

    /// Toolbar button opening the form
    #[must_use]
    pub const fn register_button(&self) -> &Locator {
        &self.register_button
    }

    /// Card title
    #[must_use]
    pub const fn page_title(&self) -> &Locator {
        &self.page_title
    }

    /// Form submit button
    #[must_use]
    pub const fn submit_button(&self) -> &Locator {
        &self.submit_button
    }

    /// Text input labelled `label`
    #[must_use]
    pub fn input(label: &str) -> Locator {
        Locator::new(format!("input[placeholder=\"{label}\"]"))
    }

    /// Radio button showing exactly `option`
    #[must_use]
    pub fn radio(option: &str) -> Locator {
        Locator::new("mat-radio-button").with_exact_text(option)
    }

    /// Open the form from the login screen
    pub async fn open(&self) -> BookcartResult<()> {
        self.ctx.click(&self.register_button).await?;
        self.ctx
            .expect(&self.page_title)
            .with_message("Not on Registration page")
            .to_have_text(REGISTRATION_TITLE)
            .await
    }

    /// Fill `fields` in order; every value must stick
    pub async fn fill_registration_form(&self, fields: &[FormField]) -> BookcartResult<()> {
        self.ctx
            .expect(&self.page_title)
            .precondition()
            .with_message("Not on Registration page")
            .to_have_text(REGISTRATION_TITLE)
            .await?;
        for field in fields {
            match field {
                FormField::Choice { option, .. } => {
                    let radio = Self::radio(option);
                    self.ctx.click(&radio).await?;
                    self.ctx
                        .expect(&radio)
                        .with_message("Gender Check Box not selected")
                        .to_have_class(CHECKED_CLASS)
                        .await?;
                }
                FormField::Text { label, value } => {
                    let input = Self::input(label);
                    self.ctx.replace_text(&input, value).await?;
                    self.ctx
                        .expect(&input)
                        .with_message("Registration field not filled as expected")
                        .to_have_value(value.as_str())
                        .await?;
                }
            }
        }
        Ok(())
    }

    /// Click the form's submit button
    pub async fn submit(&self) -> BookcartResult<()> {
        self.ctx.click(&self.submit_button).await
    }

    /// Form-level validation message equals `text`
    pub async fn expect_form_error(&self, text: &str) -> BookcartResult<()> {
        self.ctx
            .expect(&self.form_error)
            .with_message(format!("Expected {:?} error to be visible", text.trim()))
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.form_error)
            .with_message("Form error message not as expected")
            .to_have_exact_text(text)
            .await
    }

    /// Input `label` carries the invalid highlight
    pub async fn expect_field_highlighted(&self, label: &str) -> BookcartResult<()> {
        self.ctx
            .expect(&Self::input(label).parent(".mdc-text-field--invalid"))
            .with_message(format!("{label} not highlighted in red"))
            .to_be_visible()
            .await
    }

    /// Emptying `label` shows "{error_name} is required"
    pub async fn expect_required_error(
        &self,
        label: &str,
        error_name: &str,
    ) -> BookcartResult<()> {
        let input = Self::input(label);
        let error = input.clone().parent("mat-form-field").find("mat-error");
        self.ctx.click(&input).await?;
        self.ctx.press_key(Key::Backspace).await?;
        self.ctx
            .expect(&error)
            .with_message(format!("{label} required message not as expected"))
            .to_have_exact_text(format!("{error_name} is required"))
            .await
    }

    /// Fill and submit an accepted registration; lands on the login card.
    ///
    /// The form sometimes ignores the first submit while validating, so a
    /// button still shown after the double click is clicked once more.
    pub async fn register(&self, fields: &[FormField]) -> BookcartResult<()> {
        self.fill_registration_form(fields).await?;
        self.ctx
            .expect(&self.submit_button)
            .precondition()
            .with_message("Expected Register button to be visible")
            .to_be_visible()
            .await?;
        self.ctx.double_click(&self.submit_button).await?;
        self.ctx.pause().await;
        if self.ctx.is_visible(&self.submit_button).await? {
            tracing::debug!("register button still shown, clicking again");
            self.ctx.click(&self.submit_button).await?;
        }
        self.ctx
            .expect(&self.page_title)
            .with_message("Page Title not visible")
            .to_be_visible()
            .await?;
        self.ctx
            .expect(&self.page_title)
            .with_message("Registration did not return to the Login page")
            .to_have_text(LOGIN_TITLE)
            .await
    }
}

impl PageObject for RegisterPage {
    fn page_name(&self) -> &'static str {
        "Register"
    }

    fn url_pattern(&self) -> &'static str {
        "/register"
    }

    fn locators(&self) -> Vec<(&'static str, &Locator)> {
        vec![
            ("register_button", &self.register_button),
            ("page_title", &self.page_title),
            ("submit_button", &self.submit_button),
            ("form_error", &self.form_error),
        ]
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::{MockElement, MockEngine};
    use crate::result::AssertionKind;
    use crate::test_support::mock_context;
    use proptest::prelude::*;
    use std::sync::Arc;

    fn registration_form(labels: &[&str]) -> (Arc<MockEngine>, RegisterPage) {
        let (engine, ctx) = mock_context();
        let page = RegisterPage::new(ctx);
        engine.insert(page.page_title(), MockElement::text(REGISTRATION_TITLE));
        engine.insert(page.submit_button(), MockElement::text("Register"));
        for label in labels {
            engine.insert(RegisterPage::input(label), MockElement::input());
        }
        (engine, page)
    }

    mod string_tests {
        use super::*;

        proptest! {
            #[test]
            fn prop_generate_string_is_alphabetic(len in 0usize..64) {
                let s = generate_string(len);
                prop_assert_eq!(s.chars().count(), len);
                prop_assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
            }

            #[test]
            fn prop_unique_username_adds_one_to_four_letters(base in "[a-z]{1,12}") {
                let name = unique_username(&base);
                prop_assert!(name.starts_with(&base));
                prop_assert!((1..=4).contains(&(name.len() - base.len())));
                prop_assert!(!name.contains(' '));
            }
        }
    }

    mod form_tests {
        use super::*;

        #[tokio::test]
        async fn test_text_fields_round_trip() {
            let (engine, page) = registration_form(&["First name", "Password"]);
            let fields = [
                FormField::text("First name", "Sam"),
                FormField::text("Password", "Samtester123"),
            ];
            page.fill_registration_form(&fields).await.unwrap();
            assert_eq!(
                engine.with_dom(|dom| dom.value_of(RegisterPage::input("Password"))).as_deref(),
                Some("Samtester123")
            );
        }

        #[tokio::test]
        async fn test_choice_requires_checked_class() {
            let (engine, page) = registration_form(&[]);
            let radio = RegisterPage::radio("Female");
            engine.insert(&radio, MockElement::text("Female"));
            let key = radio.to_string();
            engine.on_click(&radio, move |dom| {
                if let Some(el) = dom.element_mut(&key) {
                    el.classes.push(CHECKED_CLASS.to_string());
                }
            });
            page.fill_registration_form(&[FormField::choice("Gender", "Female")])
                .await
                .unwrap();

            let male = RegisterPage::radio("Male");
            engine.insert(&male, MockElement::text("Male"));
            let err = page
                .fill_registration_form(&[FormField::choice("Gender", "Male")])
                .await
                .unwrap_err();
            assert!(err.to_string().contains("Gender Check Box not selected"));
        }

        #[tokio::test]
        async fn test_wrong_page_is_precondition() {
            let (engine, page) = registration_form(&[]);
            engine.insert(page.page_title(), MockElement::text(LOGIN_TITLE));
            let err = page.fill_registration_form(&[]).await.unwrap_err();
            assert_eq!(err.assertion_kind(), Some(AssertionKind::Precondition));
        }

        #[tokio::test]
        async fn test_form_error_compares_exactly() {
            let (engine, page) = registration_form(&[]);
            engine.insert("mat-error", MockElement::text(PASSWORD_MISMATCH_MESSAGE));
            page.expect_form_error(PASSWORD_MISMATCH_MESSAGE).await.unwrap();
            assert!(page.expect_form_error(USERNAME_TAKEN_MESSAGE).await.is_err());
        }

        #[tokio::test]
        async fn test_form_error_without_leading_space_fails() {
            let (engine, page) = registration_form(&[]);
            engine.insert("mat-error", MockElement::text("Password do not match"));
            let err = page
                .expect_form_error(PASSWORD_MISMATCH_MESSAGE)
                .await
                .unwrap_err();
            assert_eq!(err.assertion_kind(), Some(AssertionKind::Postcondition));
            assert!(err.to_string().contains("Form error message not as expected"));
        }

        #[tokio::test]
        async fn test_required_error_after_backspace() {
            let (engine, page) = registration_form(&["Last Name"]);
            let input = RegisterPage::input("Last Name");
            engine.with_dom(|dom| {
                if let Some(el) = dom.element_mut(&input) {
                    el.value = Some("a".to_string());
                }
            });
            let error = input.clone().parent("mat-form-field").find("mat-error").to_string();
            engine.on_click(&input, move |dom| dom.set_text(&error, "Last Name is required"));
            page.expect_required_error("Last Name", "Last Name").await.unwrap();
            assert!(engine.was_called("press:Backspace"));
        }

        #[tokio::test]
        async fn test_highlight_uses_invalid_parent() {
            let (engine, page) = registration_form(&[]);
            engine.insert(
                RegisterPage::input("User name").parent(".mdc-text-field--invalid"),
                MockElement::new(),
            );
            page.expect_field_highlighted("User name").await.unwrap();
            let err = page.expect_field_highlighted("Password").await.unwrap_err();
            assert!(err.to_string().contains("Password not highlighted in red"));
        }
    }

    mod register_tests {
        use super::*;

        #[tokio::test]
        async fn test_double_click_lands_on_login() {
            let (engine, page) = registration_form(&["User name"]);
            let title = page.page_title().to_string();
            let submit = page.submit_button().to_string();
            engine.on_click(page.submit_button(), move |dom| {
                dom.remove(&submit);
                dom.set_text(&title, LOGIN_TITLE);
            });
            page.register(&[FormField::text("User name", "samtesterAb")])
                .await
                .unwrap();
            assert!(engine.was_called("double_click:"));
            assert!(!engine.was_called(&format!("click:{}", page.submit_button())));
        }

        #[tokio::test]
        async fn test_button_still_shown_is_clicked_again() {
            let (engine, page) = registration_form(&[]);
            let title = page.page_title().to_string();
            let submit = page.submit_button().to_string();
            let seen = Arc::new(std::sync::atomic::AtomicUsize::new(0));
            let counter = Arc::clone(&seen);
            engine.on_click(page.submit_button(), move |dom| {
                if counter.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 1 {
                    dom.remove(&submit);
                    dom.set_text(&title, LOGIN_TITLE);
                }
            });
            page.register(&[]).await.unwrap();
            assert_eq!(engine.call_count(&format!("click:{}", page.submit_button())), 1);
        }
    }
}
