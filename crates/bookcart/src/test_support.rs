//! Helpers shared by the in-crate tests.

use std::sync::Arc;

use crate::config::{SuiteConfig, Timeouts};
use crate::engine::{MockElement, MockEngine};
use crate::fixture::ShippingField;
use crate::locator::Locator;
use crate::page_object::PageContext;
use crate::pages::HomePage;
use crate::session::Session;

/// Timeouts short enough that failing expectations return quickly
pub(crate) fn fast_timeouts() -> Timeouts {
    Timeouts::default()
        .with_default_ms(60)
        .with_slow_ms(90)
        .with_poll_interval_ms(5)
}

/// Mock engine plus a context over it
pub(crate) fn mock_context() -> (Arc<MockEngine>, PageContext) {
    let engine = Arc::new(MockEngine::new());
    let ctx = PageContext::new(engine.clone(), fast_timeouts());
    (engine, ctx)
}

/// Mock engine plus a session over it, starting at the login page
pub(crate) fn mock_session() -> (Arc<MockEngine>, Session) {
    let config = SuiteConfig::new().with_timeouts(fast_timeouts());
    let engine = Arc::new(MockEngine::new().with_url(config.login_url()));
    let session = Session::new(engine.clone(), config);
    (engine, session)
}

/// Header row of a table, optionally inside `scope`, padded the way the
/// storefront renders it
pub(crate) fn table_headers(engine: &MockEngine, scope: Option<&Locator>, names: &[&str]) {
    let css = "table thead tr th";
    let cells = scope.map_or_else(|| Locator::new(css), |s| s.clone().find(css));
    engine.insert(&cells, MockElement::text("").with_count(names.len()));
    for (index, name) in names.iter().enumerate() {
        engine.insert(cells.clone().nth(index), MockElement::text(format!(" {name} ")));
    }
}

/// Cart holding one `item` at `cart_price` while the home page shows
/// `home_price`. Checkout, place-order and the newest order's details are
/// scripted behind their buttons.
pub(crate) fn scripted_checkout(
    engine: &MockEngine,
    page: &HomePage,
    item: &str,
    home_price: &str,
    cart_price: &str,
    shipping: &[ShippingField],
) {
    engine.insert("mat-card p", MockElement::text(home_price));
    table_headers(engine, None, &["Order Id", "Title", "Price", "Total"]);
    engine.insert(HomePage::first_row_cell(0, None), MockElement::text("8731"));
    engine.insert(HomePage::first_row_cell(2, None), MockElement::text(cart_price));
    engine.insert(HomePage::first_row_cell(3, None), MockElement::text(cart_price));
    engine.insert(
        Locator::new("mat-card-content>td").nth(3),
        MockElement::text(cart_price),
    );

    let checkout = Locator::new("mat-card-content>td").with_text("CheckOut");
    let place_order =
        Locator::new("mat-card-actions .mdc-button__label").with_text("Place Order");
    engine.insert(&checkout, MockElement::text("CheckOut"));
    engine.insert(&place_order, MockElement::text("Place Order"));
    engine.insert(
        Locator::new("tfoot th").with_exact_text(home_price),
        MockElement::text(home_price),
    );
    engine.insert(
        Locator::new("mat-form-field input[placeholder=\"Search\"]"),
        MockElement::input(),
    );
    let form = Locator::new(".mat-mdc-card-content .mat-mdc-card-title")
        .with_text("Shipping address")
        .parent_element()
        .find("form");
    for field in shipping {
        let input = form
            .clone()
            .find(format!("mat-form-field input[placeholder='{}']", field.label));
        engine.insert(input, MockElement::input());
    }

    let details = Locator::new(".example-element-detail mat-card-content").filter_visible();
    table_headers(engine, Some(&details), &["Title"]);
    engine.insert(HomePage::first_row_cell(0, Some(&details)), MockElement::text(item));
    engine.insert(&details, MockElement::new().hidden());

    let title = page.page_title().to_string();
    let title_after = title.clone();
    engine.on_click(&checkout, move |dom| dom.set_text(&title, "Check Out"));
    engine.on_click(&place_order, move |dom| dom.set_text(&title_after, "My Orders"));
    let details_key = details.to_string();
    engine.on_click(HomePage::first_row_cell(0, None), move |dom| {
        if let Some(el) = dom.element_mut(&details_key) {
            el.visible = true;
        }
    });
}
