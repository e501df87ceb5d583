//! The BookCart suite.
//!
//! Every scenario starts from a freshly loaded login page. Parameterized
//! scenarios draw their inputs from the [`FixtureSet`].

use std::fmt;

use tracing::warn;

use crate::fixture::{Credentials, FixtureSet, PASSWORD_FIELD, USERNAME_FIELD};
use crate::pages::register::{
    unique_username, PASSWORD_FORMAT_MESSAGE, PASSWORD_MISMATCH_MESSAGE, USERNAME_TAKEN_MESSAGE,
};
use crate::result::{BookcartError, BookcartResult};
use crate::session::Session;

/// Brand shown in the toolbar
pub const BRAND_NAME: &str = "Book Cart";

/// Book favourited and carted by the UI scenario
pub const FAVOURITE_ITEM: &str = "Slayer";

/// Book searched for by the UI scenario
pub const SEARCH_ITEM: &str = "Red Rising";

/// Book bought by the checkout scenario
pub const CHECKOUT_ITEM: &str = "Robbie";

/// One test of the suite
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scenario {
    /// Seeded account logs in
    LoginValid,
    /// A rejected or incomplete login
    LoginInvalid(Credentials),
    /// Home page controls, wishlist, cart and search
    HomeUi,
    /// Search, add to cart, check out and find the order
    Checkout,
    /// Submitting an empty form highlights every field
    RegisterAllEmpty,
    /// Confirmation differs from the password
    RegisterPasswordMismatch,
    /// Username already registered
    RegisterUsernameTaken,
    /// Password too weak
    RegisterPasswordFormat,
    /// Each emptied field shows its required-message
    RegisterRequiredFields,
    /// Register a fresh username and log in with it
    RegisterAndLogin,
}

impl Scenario {
    /// Every scenario, login cases expanded from the fixtures
    #[must_use]
    pub fn all(fixtures: &FixtureSet) -> Vec<Self> {
        let mut scenarios = vec![Self::LoginValid];
        scenarios.extend(
            fixtures
                .login
                .invalid_credentials
                .iter()
                .cloned()
                .map(Self::LoginInvalid),
        );
        scenarios.extend([
            Self::HomeUi,
            Self::Checkout,
            Self::RegisterAllEmpty,
            Self::RegisterPasswordMismatch,
            Self::RegisterUsernameTaken,
            Self::RegisterPasswordFormat,
            Self::RegisterRequiredFields,
            Self::RegisterAndLogin,
        ]);
        scenarios
    }

    /// Display name, used for filtering and reports
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            Self::LoginValid => "Login Test: Login with Valid Credentials".to_string(),
            Self::LoginInvalid(case) => format!(
                "Login Test: Login with Invalid Credentials ({}) and Verify Error Message",
                case.test_case
            ),
            Self::HomeUi => "UI Test: key UI elements on the homepage".to_string(),
            Self::Checkout => {
                "Functional Test: search a product, add it to the cart and check out".to_string()
            }
            Self::RegisterAllEmpty => {
                "Form Validation Test: Register with all fields empty".to_string()
            }
            Self::RegisterPasswordMismatch => {
                "Form Validation Test: Register Form password matching Validation".to_string()
            }
            Self::RegisterUsernameTaken => {
                "Form Validation Test: Register Form UserName Availability Validation".to_string()
            }
            Self::RegisterPasswordFormat => {
                "Form Validation Test: Register Form password format Validation".to_string()
            }
            Self::RegisterRequiredFields => {
                "Form Validation Test: Register Form required Field Validation".to_string()
            }
            Self::RegisterAndLogin => {
                "Form Validation Test: Register Form correct Registration Details".to_string()
            }
        }
    }

    /// Run against `session`, starting from the login page
    pub async fn run(&self, session: &Session, fixtures: &FixtureSet) -> BookcartResult<()> {
        session.open_login_page().await?;
        match self {
            Self::LoginValid => log_in(session, fixtures).await,
            Self::LoginInvalid(case) => invalid_login(session, case).await,
            Self::HomeUi => {
                let outcome = home_ui(session, fixtures).await;
                let cleanup = clear_lists(session).await;
                if let Err(e) = &cleanup {
                    warn!(error = %e, "cleanup after UI scenario failed");
                }
                outcome.and(cleanup)
            }
            Self::Checkout => checkout(session, fixtures).await,
            Self::RegisterAllEmpty => {
                let register = session.register();
                register.open().await?;
                register.submit().await?;
                for field in &fixtures.register.field_names {
                    register.expect_field_highlighted(&field.field_name).await?;
                }
                Ok(())
            }
            Self::RegisterPasswordMismatch => {
                let register = session.register();
                register.open().await?;
                register
                    .fill_registration_form(&fixtures.register.password_matching_validation)
                    .await?;
                register.submit().await?;
                register.expect_form_error(PASSWORD_MISMATCH_MESSAGE).await
            }
            Self::RegisterUsernameTaken => {
                let register = session.register();
                register.open().await?;
                register
                    .fill_registration_form(&fixtures.register.user_name_availability_validation)
                    .await?;
                register.submit().await?;
                register.expect_form_error(USERNAME_TAKEN_MESSAGE).await
            }
            Self::RegisterPasswordFormat => {
                let register = session.register();
                register.open().await?;
                register
                    .fill_registration_form(&fixtures.register.password_format_validation)
                    .await?;
                register.expect_form_error(PASSWORD_FORMAT_MESSAGE).await
            }
            Self::RegisterRequiredFields => {
                let register = session.register();
                register.open().await?;
                register
                    .fill_registration_form(&fixtures.register.required_field_validation)
                    .await?;
                register.submit().await?;
                for field in &fixtures.register.field_names {
                    register
                        .expect_required_error(&field.field_name, &field.error_field_name)
                        .await?;
                }
                Ok(())
            }
            Self::RegisterAndLogin => register_and_login(session, fixtures).await,
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

async fn log_in(session: &Session, fixtures: &FixtureSet) -> BookcartResult<()> {
    let account = &fixtures.login.valid_credentials;
    session
        .login()
        .login_to_app(&account.username, &account.password)
        .await
}

async fn invalid_login(session: &Session, case: &Credentials) -> BookcartResult<()> {
    let login = session.login();
    if !case.is_empty_case() {
        login.perform_login(&case.username, &case.password).await?;
        return login.expect_invalid_credentials_error().await;
    }
    if !case.username_blank() && !case.password_blank() {
        return Err(BookcartError::fixture(format!(
            "case {:?} is marked Empty but has no blank field",
            case.test_case
        )));
    }
    login
        .submit_blank_credentials(&case.username, &case.password)
        .await?;
    if case.password_blank() {
        login.expect_password_required().await?;
    }
    if case.username_blank() {
        login.expect_username_required().await?;
    }
    Ok(())
}

async fn home_ui(session: &Session, fixtures: &FixtureSet) -> BookcartResult<()> {
    let home = session.home();
    log_in(session, fixtures).await?;
    home.verify_nav_bar_elements(BRAND_NAME).await?;
    home.verify_elements_of_purchase_items().await?;
    home.clear_wish_list().await?;
    home.verify_add_to_favourite(FAVOURITE_ITEM).await?;
    home.clear_cart().await?;
    home.verify_add_to_cart(FAVOURITE_ITEM).await?;
    home.verify_search_option(SEARCH_ITEM).await?;
    home.clear_search_box().await
}

async fn clear_lists(session: &Session) -> BookcartResult<()> {
    session.home().clear_wish_list().await?;
    session.home().clear_cart().await
}

async fn checkout(session: &Session, fixtures: &FixtureSet) -> BookcartResult<()> {
    let home = session.home();
    log_in(session, fixtures).await?;
    home.clear_cart().await?;
    home.search_and_add_to_cart(CHECKOUT_ITEM).await?;
    home.verify_check_out(&fixtures.shipping.shipping_details, CHECKOUT_ITEM)
        .await
}

async fn register_and_login(session: &Session, fixtures: &FixtureSet) -> BookcartResult<()> {
    let register = session.register();
    let username = unique_username(fixtures.register.correct_value(USERNAME_FIELD)?);
    let password = fixtures.register.correct_value(PASSWORD_FIELD)?;
    let fields = fixtures.register.correct_details_for(&username)?;
    tracing::info!(%username, "registering new account");
    register.open().await?;
    register.register(&fields).await?;
    session.login().login_to_app(&username, password).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::engine::{MockElement, MockEngine};
    use crate::fixture::FormField;
    use crate::locator::Locator;
    use crate::pages::login::{
        INVALID_CREDENTIALS_MESSAGE, PASSWORD_REQUIRED_MESSAGE, USERNAME_REQUIRED_MESSAGE,
    };
    use crate::pages::register::REGISTRATION_TITLE;
    use crate::pages::{HomePage, RegisterPage};
    use crate::result::AssertionKind;
    use crate::test_support::{mock_session, scripted_checkout, table_headers};
    use std::sync::Arc;

    fn fixtures() -> FixtureSet {
        FixtureSet::builtin().unwrap()
    }

    fn login_form(engine: &MockEngine, session: &Session) {
        let login = session.login();
        engine.insert(login.username_input(), MockElement::input());
        engine.insert(login.password_input(), MockElement::input());
        engine.insert(login.login_button(), MockElement::text("Login"));
    }

    /// Login form accepting the seeded account, then the home page chrome
    fn storefront(engine: &MockEngine, session: &Session, fixtures: &FixtureSet) {
        login_form(engine, session);
        let label = session.login().logged_in_user().to_string();
        let username = fixtures.login.valid_credentials.username.clone();
        engine.on_click(session.login().login_button(), move |dom| {
            dom.set_text(&label, username.as_str());
        });
        let home = session.home();
        engine.insert(".brand-title", MockElement::text(BRAND_NAME));
        engine.insert("app-book-filter mat-nav-list", MockElement::new());
        engine.insert(home.search_box(), MockElement::input());
        engine.insert(home.cart_badge(), MockElement::new());
        engine.insert(home.wishlist_badge(), MockElement::new());
        engine.insert(
            Locator::new(".mat-mdc-card-title").with_text("Your shopping cart is empty."),
            MockElement::new(),
        );
        engine.insert(
            Locator::new(".mat-mdc-card-title").with_text("Your wishlist is empty."),
            MockElement::new(),
        );
    }

    /// Search suggestion for `title` that filters the catalogue to it
    fn searchable(engine: &MockEngine, title: &'static str) {
        let suggestion = Locator::new("mat-option span").with_exact_text(title);
        engine.insert(&suggestion, MockElement::text(title));
        engine.on_click(&suggestion, move |dom| {
            dom.set_text("app-book-card .card-title", title);
        });
    }

    mod catalogue_tests {
        use super::*;

        #[test]
        fn test_all_expands_login_cases() {
            let fixtures = fixtures();
            let all = Scenario::all(&fixtures);
            assert_eq!(all.len(), 1 + fixtures.login.invalid_credentials.len() + 8);
            assert_eq!(all[0], Scenario::LoginValid);
            assert!(matches!(all[1], Scenario::LoginInvalid(_)));
            assert_eq!(all.last(), Some(&Scenario::RegisterAndLogin));
        }

        #[test]
        fn test_names_are_unique() {
            let names: Vec<String> =
                Scenario::all(&fixtures()).iter().map(Scenario::name).collect();
            let mut sorted = names.clone();
            sorted.sort();
            sorted.dedup();
            assert_eq!(sorted.len(), names.len());
            assert!(names.iter().any(|n| n.contains("(Empty Password)")));
        }
    }

    mod login_tests {
        use super::*;

        #[tokio::test]
        async fn test_valid_login_scenario() {
            let (engine, session) = mock_session();
            login_form(&engine, &session);
            let label = session.login().logged_in_user().to_string();
            engine.on_click(session.login().login_button(), move |dom| {
                dom.set_text(&label, "SamUser");
            });
            Scenario::LoginValid.run(&session, &fixtures()).await.unwrap();
            assert!(engine.history()[0].starts_with("navigate:"));
        }

        #[tokio::test]
        async fn test_invalid_password_scenario() {
            let (engine, session) = mock_session();
            login_form(&engine, &session);
            let error = session.login().error_message().to_string();
            engine.on_click(session.login().login_button(), move |dom| {
                dom.set_text(&error, INVALID_CREDENTIALS_MESSAGE);
            });
            let case = fixtures().login.invalid_credentials[1].clone();
            Scenario::LoginInvalid(case).run(&session, &fixtures()).await.unwrap();
        }

        #[tokio::test]
        async fn test_both_blank_checks_both_messages() {
            let (engine, session) = mock_session();
            login_form(&engine, &session);
            let user_error = session.login().empty_username_error().to_string();
            let pass_error = session.login().empty_password_error().to_string();
            engine.on_click(session.login().login_button(), move |dom| {
                dom.set_text(&user_error, USERNAME_REQUIRED_MESSAGE);
                dom.set_text(&pass_error, PASSWORD_REQUIRED_MESSAGE);
            });
            let case = Credentials {
                test_case: "Empty Username and Password".to_string(),
                username: " ".to_string(),
                password: " ".to_string(),
            };
            Scenario::LoginInvalid(case).run(&session, &fixtures()).await.unwrap();
            assert_eq!(engine.call_count("press:Backspace"), 2);
        }

        #[tokio::test]
        async fn test_empty_case_without_blank_is_fixture_error() {
            let (engine, session) = mock_session();
            login_form(&engine, &session);
            let case = Credentials {
                test_case: "Empty Nothing".to_string(),
                username: "a".to_string(),
                password: "b".to_string(),
            };
            let err = Scenario::LoginInvalid(case).run(&session, &fixtures()).await.unwrap_err();
            assert!(matches!(err, BookcartError::FixtureError { .. }));
            assert!(!engine.was_called("click:"));
        }
    }

    mod home_ui_tests {
        use super::*;

        #[tokio::test]
        async fn test_home_ui_scenario_passes() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            storefront(&engine, &session, &fixtures);
            let home = session.home();

            for css in [
                ".mat-toolbar .mat-toolbar-row",
                ".brand-title .material-icons",
                "app-price-filter mat-card",
            ] {
                engine.insert(css, MockElement::new());
            }
            engine.insert(".brand-title .mdc-button__label", MockElement::text(BRAND_NAME));
            engine.insert(
                "mat-toolbar mat-icon.material-icons",
                MockElement::new().with_count(3),
            );
            let card = Locator::new(".card-deck-container app-book-card");
            engine.insert(&card, MockElement::new().with_count(2));
            for css in [".favourite", "img"] {
                engine.insert(card.clone().find(css), MockElement::new());
            }
            engine.insert(
                card.clone()
                    .find("app-addtocart .mdc-button__label")
                    .with_text("Add to Cart"),
                MockElement::new(),
            );
            engine.insert(card.find("p"), MockElement::text("₹315.00"));

            let book = HomePage::book_card(FAVOURITE_ITEM);
            let favourite = book.clone().find(".favourite");
            let selected = book.clone().find(".favourite-selected").to_string();
            let add = book.find(".mdc-button__label").with_text("Add to Cart");
            let wishlist = home.wishlist_badge().to_string();
            let cart = home.cart_badge().to_string();
            engine.insert(&favourite, MockElement::new());
            engine.insert(&add, MockElement::text("Add to Cart"));
            engine.on_click(&favourite, move |dom| {
                dom.insert(&selected, MockElement::new());
                dom.set_text(&wishlist, "1");
            });
            engine.on_click(&add, move |dom| dom.set_text(&cart, "1"));
            table_headers(&engine, None, &["Cover", "Title"]);
            engine.on_click(home.wishlist_badge(), |dom| {
                dom.set_text(".mat-mdc-card-title", "My wishlist");
                dom.set_text(HomePage::first_row_cell(1, None), FAVOURITE_ITEM);
            });
            engine.on_click(home.cart_badge(), |dom| {
                dom.set_text(".mat-mdc-card-title", "Shopping cart");
                dom.set_text(HomePage::first_row_cell(1, None), FAVOURITE_ITEM);
            });
            searchable(&engine, SEARCH_ITEM);

            Scenario::HomeUi.run(&session, &fixtures).await.unwrap();
            let search = engine.with_dom(|dom| dom.value_of(home.search_box()));
            assert_eq!(search.as_deref(), Some(""));
            assert_eq!(engine.call_count(&format!("click:{favourite}")), 1);
            assert_eq!(engine.call_count(&format!("click:{add}")), 1);
        }

        #[tokio::test]
        async fn test_cleanup_runs_after_failure() {
            let (engine, session) = mock_session();
            let home = session.home();
            engine.insert(home.wishlist_badge(), MockElement::new());
            engine.insert(home.cart_badge(), MockElement::new());
            engine.insert(
                Locator::new(".mat-mdc-card-title").with_text("Your wishlist is empty."),
                MockElement::new(),
            );
            engine.insert(
                Locator::new(".mat-mdc-card-title").with_text("Your shopping cart is empty."),
                MockElement::new(),
            );
            let err = Scenario::HomeUi.run(&session, &fixtures()).await.unwrap_err();
            assert_eq!(err.assertion_kind(), Some(AssertionKind::Precondition));
            assert!(err.to_string().contains("Username Input field not visible"));
            assert!(engine.was_called(&format!("click:{}", home.wishlist_badge())));
            assert!(engine.was_called(&format!("click:{}", home.cart_badge())));
        }
    }

    mod checkout_tests {
        use super::*;

        const PRICE: &str = "₹294.00";

        #[tokio::test]
        async fn test_checkout_scenario_places_order() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            storefront(&engine, &session, &fixtures);
            let home = session.home();
            searchable(&engine, CHECKOUT_ITEM);
            let add = Locator::new("app-book-card app-addtocart .mdc-button__label")
                .with_text("Add to Cart");
            let cart = home.cart_badge().to_string();
            engine.insert(&add, MockElement::text("Add to Cart"));
            engine.on_click(&add, move |dom| dom.set_text(&cart, "1"));
            let shipping = &fixtures.shipping.shipping_details;
            scripted_checkout(&engine, &home, CHECKOUT_ITEM, PRICE, PRICE, shipping);

            Scenario::Checkout.run(&session, &fixtures).await.unwrap();
            assert!(engine.was_called("type:mat-form-field input[placeholder=\"Search\"]:8731"));
            for field in shipping {
                let typed = format!(":{}", field.value);
                assert!(engine.history().iter().any(|c| c.ends_with(&typed)));
            }
        }

        #[tokio::test]
        async fn test_checkout_price_mismatch_fails_scenario() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            storefront(&engine, &session, &fixtures);
            let home = session.home();
            searchable(&engine, CHECKOUT_ITEM);
            let add = Locator::new("app-book-card app-addtocart .mdc-button__label")
                .with_text("Add to Cart");
            let cart = home.cart_badge().to_string();
            engine.insert(&add, MockElement::text("Add to Cart"));
            engine.on_click(&add, move |dom| dom.set_text(&cart, "1"));
            let shipping = &fixtures.shipping.shipping_details;
            scripted_checkout(&engine, &home, CHECKOUT_ITEM, PRICE, "₹300.00", shipping);

            let err = Scenario::Checkout.run(&session, &fixtures).await.unwrap_err();
            assert_eq!(err.assertion_kind(), Some(AssertionKind::Postcondition));
            assert!(err.to_string().contains("Item Price on home page not matched"));
        }
    }

    mod register_tests {
        use super::*;

        fn registration(engine: &Arc<MockEngine>, session: &Session, fields: &[FormField]) {
            let register = session.register();
            let title = register.page_title().to_string();
            engine.insert(register.register_button(), MockElement::text("Register"));
            engine.insert(register.submit_button(), MockElement::text("Register"));
            engine.on_click(register.register_button(), move |dom| {
                dom.set_text(&title, REGISTRATION_TITLE);
            });
            for field in fields {
                match field {
                    FormField::Text { label, .. } => {
                        engine.insert(RegisterPage::input(label), MockElement::input());
                    }
                    FormField::Choice { option, .. } => engine.insert(
                        RegisterPage::radio(option),
                        MockElement::text(option.as_str()).with_class("mat-mdc-radio-checked"),
                    ),
                }
            }
        }

        #[tokio::test]
        async fn test_password_mismatch_scenario() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            registration(&engine, &session, &fixtures.register.password_matching_validation);
            engine.on_click(session.register().submit_button(), |dom| {
                dom.set_text("mat-error", PASSWORD_MISMATCH_MESSAGE);
            });
            Scenario::RegisterPasswordMismatch.run(&session, &fixtures).await.unwrap();
        }

        #[tokio::test]
        async fn test_password_format_error_is_postcondition() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            registration(&engine, &session, &fixtures.register.password_format_validation);
            engine.insert("mat-error", MockElement::text("Password do not match"));
            let err = Scenario::RegisterPasswordFormat
                .run(&session, &fixtures)
                .await
                .unwrap_err();
            assert_eq!(err.assertion_kind(), Some(AssertionKind::Postcondition));
            assert!(!engine.was_called(&format!("click:{}", session.register().submit_button())));
        }

        #[tokio::test]
        async fn test_register_then_login_with_new_name() {
            let fixtures = fixtures();
            let (engine, session) = mock_session();
            registration(&engine, &session, &fixtures.register.correct_registration_details);
            login_form(&engine, &session);
            let register = session.register();
            let title = register.page_title().to_string();
            let submit = register.submit_button().to_string();
            engine.on_click(register.submit_button(), move |dom| {
                dom.remove(&submit);
                dom.set_text(&title, "Login");
            });
            let username_input = session.login().username_input().to_string();
            let label = session.login().logged_in_user().to_string();
            engine.on_click(session.login().login_button(), move |dom| {
                let typed = dom.value_of(&username_input).unwrap_or_default();
                dom.set_text(&label, typed);
            });

            Scenario::RegisterAndLogin.run(&session, &fixtures).await.unwrap();
            let typed = engine.with_dom(|dom| dom.value_of(session.login().username_input()));
            let typed = typed.unwrap();
            assert!(typed.starts_with("samtester") && typed.len() > "samtester".len());
        }
    }
}
