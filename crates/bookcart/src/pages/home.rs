//! Home screen and the cart, wishlist, checkout and order screens reached
//! from its toolbar.

use crate::engine::Key;
use crate::fixture::ShippingField;
use crate::locator::Locator;
use crate::page_object::{PageContext, PageObject};
use crate::result::{BookcartError, BookcartResult};

const HEADER_CELLS: &str = "table thead tr th";
const LIST_TITLE: &str = ".mat-mdc-card-title";
const BUTTON_LABEL: &str = ".mdc-button__label";

/// Home page object
#[derive(Debug, Clone)]
pub struct HomePage {
    ctx: PageContext,
    nav_bar: Locator,
    brand_logo: Locator,
    brand_name: Locator,
    nav_bar_icons: Locator,
    search_box: Locator,
    filter_option: Locator,
    price_filter: Locator,
    purchase_items: Locator,
    wishlist_badge: Locator,
    cart_badge: Locator,
    home_button: Locator,
    page_title: Locator,
}

impl HomePage {
    /// Build the page over a session context
    #[must_use]
    pub fn new(ctx: PageContext) -> Self {
        Self {
            ctx,
            nav_bar: Locator::new(".mat-toolbar .mat-toolbar-row"),
            brand_logo: Locator::new(".brand-title .material-icons"),
            brand_name: Locator::new(".brand-title .mdc-button__label"),
            nav_bar_icons: Locator::new("mat-toolbar mat-icon.material-icons"),
            search_box: Locator::new("app-search .searchbox"),
            filter_option: Locator::new("app-book-filter mat-nav-list"),
            price_filter: Locator::new("app-price-filter mat-card"),
            purchase_items: Locator::new(".card-deck-container app-book-card"),
            wishlist_badge: Locator::new("#mat-badge-content-1"),
            cart_badge: Locator::new("#mat-badge-content-0"),
            home_button: Locator::new(".brand-title"),
            page_title: Locator::new("mat-card-header .mat-mdc-card-title"),
        }
    }

    /// Toolbar search input
    #[must_use]
    pub const fn search_box(&self) -> &Locator {
        &self.search_box
    }

    /// Wishlist count badge, also opens the wishlist
    #[must_use]
    pub const fn wishlist_badge(&self) -> &Locator {
        &self.wishlist_badge
    }

    /// Cart count badge, also opens the cart
    #[must_use]
    pub const fn cart_badge(&self) -> &Locator {
        &self.cart_badge
    }

    /// Title of the current card page
    #[must_use]
    pub const fn page_title(&self) -> &Locator {
        &self.page_title
    }

    /// Product card titled `name`
    #[must_use]
    pub fn book_card(name: &str) -> Locator {
        Locator::new(".card-title").with_text(name).parent("app-book-card")
    }

    /// First body cell of column `index`, optionally within `scope`
    #[must_use]
    pub fn first_row_cell(index: usize, scope: Option<&Locator>) -> Locator {
        let css = format!("table tbody tr td:nth-child({})", index + 1);
        scope
            .map_or_else(|| Locator::new(css.clone()), |s| s.clone().find(css.clone()))
            .nth(0)
    }

    fn header_cells(scope: Option<&Locator>) -> Locator {
        scope.map_or_else(|| Locator::new(HEADER_CELLS), |s| s.clone().find(HEADER_CELLS))
    }

    fn button(label: &str) -> Locator {
        Locator::new(BUTTON_LABEL).with_text(label)
    }

    /// Numeric badge value; an empty or absent badge counts as zero
    pub async fn read_badge(&self, badge: &Locator) -> BookcartResult<usize> {
        let text = self.ctx.engine().inner_text(badge).await?.unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            return Ok(0);
        }
        text.parse().map_err(|_| {
            BookcartError::page(format!("badge {badge} shows non-numeric value {text:?}"))
        })
    }

    /// Zero-based index of the header cell whose trimmed text is `header_text`
    pub async fn table_column_header_index(
        &self,
        header_text: &str,
        scope: Option<&Locator>,
    ) -> BookcartResult<Option<usize>> {
        let headers = Self::header_cells(scope);
        let count = self.ctx.count(&headers).await?;
        for index in 0..count {
            let text = self
                .ctx
                .engine()
                .inner_text(&headers.clone().nth(index))
                .await?
                .unwrap_or_default();
            if text.trim() == header_text {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }

    /// Like [`Self::table_column_header_index`], waiting for the table and
    /// failing when the column is missing
    pub async fn column_index(
        &self,
        header_text: &str,
        scope: Option<&Locator>,
    ) -> BookcartResult<usize> {
        self.ctx.wait_for(&Self::header_cells(scope)).await?;
        self.table_column_header_index(header_text, scope)
            .await?
            .ok_or_else(|| BookcartError::ColumnNotFound {
                header: header_text.to_string(),
            })
    }

    async fn go_home(&self) -> BookcartResult<()> {
        self.ctx.click(&self.home_button).await?;
        self.ctx
            .expect(&self.filter_option)
            .precondition()
            .with_message("For Searching be on homePage")
            .to_be_visible()
            .await
    }

    async fn expect_visible(&self, locator: &Locator, message: &str) -> BookcartResult<()> {
        self.ctx.expect(locator).with_message(message).to_be_visible().await
    }

    /// Toolbar and side filters are shown with the right brand
    pub async fn verify_nav_bar_elements(&self, brand_name: &str) -> BookcartResult<()> {
        self.expect_visible(&self.nav_bar, "Expected Nav Bar to be visible").await?;
        self.expect_visible(&self.brand_logo, "Expected Brand Logo to be visible").await?;
        self.expect_visible(&self.brand_name, "Expected Brand Name To be visible").await?;
        self.ctx
            .expect(&self.brand_name)
            .with_message("Brand Name is Incorrect")
            .to_have_text(brand_name)
            .await?;
        self.expect_visible(&self.search_box, "Expected SearchBox to be visible").await?;
        self.expect_visible(&self.filter_option, "Filter Option not visible").await?;
        self.expect_visible(&self.price_filter, "Price filter is not visible").await?;
        let icons = self.ctx.count(&self.nav_bar_icons).await?;
        for index in 0..icons {
            let icon = self.nav_bar_icons.clone().nth(index);
            self.expect_visible(&icon, "Icons not present in NavBar").await?;
        }
        Ok(())
    }

    /// Every product card shows its controls and a rupee price
    pub async fn verify_elements_of_purchase_items(&self) -> BookcartResult<()> {
        let cards = self.ctx.count(&self.purchase_items).await?;
        tracing::debug!(cards, "checking product cards");
        for index in 0..cards {
            let card = self.purchase_items.clone().nth(index);
            let favourite = card.clone().find(".favourite");
            let add_to_cart = card
                .clone()
                .find("app-addtocart .mdc-button__label")
                .with_text("Add to Cart");
            let image = card.clone().find("img");
            let price = card.find("p");
            let checks = [
                (
                    &favourite,
                    "Expected Favourite Icon on the purchase item should be visible",
                ),
                (
                    &add_to_cart,
                    "Expected Add To Cart option visible on the purchase item",
                ),
                (
                    &image,
                    "Expected purchase item Image to be visible on the purchase item",
                ),
                (
                    &price,
                    "Expected purchase item Price to be visible on the purchase item",
                ),
            ];
            for (locator, message) in checks {
                self.expect_visible(locator, message).await?;
            }
            self.ctx
                .expect(&price)
                .with_message("Expected currency symbol to be visible")
                .to_contain_text("₹")
                .await?;
        }
        Ok(())
    }

    async fn expect_first_title(&self, name: &str, message: String) -> BookcartResult<()> {
        let title = self.column_index("Title", None).await?;
        self.ctx
            .expect(&Self::first_row_cell(title, None))
            .with_message(message)
            .to_have_text(name)
            .await
    }

    async fn expect_list_title(&self, expected: &str, message: &str) -> BookcartResult<()> {
        let title = Locator::new(LIST_TITLE);
        self.expect_visible(&title, message).await?;
        self.ctx.expect(&title).to_have_text(expected).await
    }

    /// Favourite `name` and find it in the wishlist
    pub async fn verify_add_to_favourite(&self, name: &str) -> BookcartResult<()> {
        let card = Self::book_card(name);
        let favourite = card.clone().find(".favourite");
        let selected = card.find(".favourite-selected");
        let before = self.read_badge(&self.wishlist_badge).await?;
        self.go_home().await?;
        self.ctx
            .expect(&selected)
            .precondition()
            .with_message(format!("{name} is already added to Favourite"))
            .not()
            .to_be_visible()
            .await?;
        self.ctx.click(&favourite).await?;
        self.expect_visible(&selected, &format!("{name} not added to Favourite")).await?;
        self.ctx
            .expect(&self.wishlist_badge)
            .with_message("Total number of Favourite not matched")
            .to_have_text((before + 1).to_string())
            .await?;
        self.ctx.click(&self.wishlist_badge).await?;
        self.expect_list_title("My wishlist", "Expected Wishlist page heading to be visible")
            .await?;
        self.expect_first_title(name, format!("{name} is not added in the wishlist table"))
            .await
    }

    /// Add `name` to the cart and find it there
    pub async fn verify_add_to_cart(&self, name: &str) -> BookcartResult<()> {
        let add_to_cart = Self::book_card(name)
            .find(BUTTON_LABEL)
            .with_text("Add to Cart");
        self.ctx
            .expect(&self.cart_badge)
            .precondition()
            .with_message("Expected Total Count of Cart should be visible")
            .to_be_visible()
            .await?;
        let before = self.read_badge(&self.cart_badge).await?;
        self.go_home().await?;
        self.ctx.click(&add_to_cart).await?;
        self.ctx
            .expect(&self.cart_badge)
            .with_message("Total number of items in Cart not matched")
            .to_have_text((before + 1).to_string())
            .await?;
        self.ctx.click(&self.cart_badge).await?;
        self.expect_list_title("Shopping cart", "Expected Add To Cart page heading to be visible")
            .await?;
        self.expect_first_title(name, format!("{name} is not added in Cart")).await
    }

    async fn clear_list(
        &self,
        badge: &Locator,
        badge_message: &str,
        clear_label: &str,
        empty_text: &str,
        empty_message: &str,
    ) -> BookcartResult<()> {
        let clear = Self::button(clear_label);
        let empty = Locator::new(LIST_TITLE).with_text(empty_text);
        self.ctx
            .expect(badge)
            .precondition()
            .with_message(badge_message)
            .to_be_visible()
            .await?;
        self.ctx.click(badge).await?;
        if self.ctx.wait_for_any(&[&clear, &empty]).await? == 0 {
            tracing::debug!(list = clear_label, "clearing non-empty list");
            self.ctx.click(&clear).await?;
        }
        self.expect_visible(&empty, empty_message).await
    }

    /// Empty the wishlist; a no-op when already empty
    pub async fn clear_wish_list(&self) -> BookcartResult<()> {
        self.clear_list(
            &self.wishlist_badge,
            "Expected Favourite Navbar option to be visible",
            "Clear Wishlist",
            "Your wishlist is empty.",
            "Expected Wishlist to be empty",
        )
        .await
    }

    /// Empty the cart; a no-op when already empty
    pub async fn clear_cart(&self) -> BookcartResult<()> {
        self.clear_list(
            &self.cart_badge,
            "Expected Cart Navbar option to be visible",
            "Clear cart",
            "Your shopping cart is empty.",
            "Expected Cart to be empty",
        )
        .await
    }

    /// Empty the search box
    pub async fn clear_search_box(&self) -> BookcartResult<()> {
        self.ctx
            .expect(&self.search_box)
            .precondition()
            .with_message("Search Box should be present")
            .to_be_visible()
            .await?;
        let current = self.ctx.engine().input_value(&self.search_box).await?;
        if !current.unwrap_or_default().is_empty() {
            self.ctx.click(&self.search_box).await?;
            self.ctx.press_key(Key::SelectAll).await?;
            self.ctx.press_key(Key::Backspace).await?;
            self.ctx.press_key(Key::Enter).await?;
        }
        self.ctx
            .expect(&self.search_box)
            .with_message("Expected search option to be cleared")
            .to_have_value("")
            .await
    }

    /// Search for `text`, pick the suggestion and check the single result
    pub async fn verify_search_option(&self, text: &str) -> BookcartResult<()> {
        let suggestion = Locator::new("mat-option span").with_exact_text(text);
        let result = Locator::new("app-book-card .card-title");
        self.go_home().await?;
        self.ctx
            .expect(&self.search_box)
            .precondition()
            .with_message("Expected search option to be visible")
            .to_be_visible()
            .await?;
        self.ctx.replace_text(&self.search_box, text).await?;
        self.expect_visible(&suggestion, &format!("{text} is not present in purchase items"))
            .await?;
        self.ctx.click(&suggestion).await?;
        self.ctx
            .expect(&result)
            .with_message("The Search result not matched with the expected search result")
            .to_have_text(text)
            .await
    }

    /// Search for `name` and add the result to the cart
    pub async fn search_and_add_to_cart(&self, name: &str) -> BookcartResult<()> {
        let add_to_cart = Locator::new("app-book-card app-addtocart .mdc-button__label")
            .with_text("Add to Cart");
        self.verify_search_option(name).await?;
        let before = self.read_badge(&self.cart_badge).await?;
        self.ctx.click(&add_to_cart).await?;
        self.ctx
            .expect(&self.cart_badge)
            .with_message("Total number of items in Cart not matched")
            .to_have_text((before + 1).to_string())
            .await
    }

    /// Fill the checkout shipping address; every value must round-trip
    pub async fn fill_shipping_form(&self, fields: &[ShippingField]) -> BookcartResult<()> {
        let form = Locator::new(".mat-mdc-card-content .mat-mdc-card-title")
            .with_text("Shipping address")
            .parent_element()
            .find("form");
        for field in fields {
            let input = form
                .clone()
                .find(format!("mat-form-field input[placeholder='{}']", field.label));
            self.ctx.replace_text(&input, &field.value).await?;
            self.ctx
                .expect(&input)
                .with_message(format!("{} is not filled with expected value", field.value))
                .to_have_value(field.value.as_str())
                .await?;
        }
        self.ctx
            .expect(&Locator::new(".mdc-text-field--invalid"))
            .with_message("There are Empty field in the shipping address form")
            .to_have_count(0)
            .await
    }

    /// Check out the cart holding `name` alone and verify the placed order.
    ///
    /// The price shown on the home page must equal the cart line price, the
    /// line total, the cart total and the checkout grand total.
    pub async fn verify_check_out(
        &self,
        shipping: &[ShippingField],
        name: &str,
    ) -> BookcartResult<()> {
        let checkout_button = Locator::new("mat-card-content>td").with_text("CheckOut");
        let place_order =
            Locator::new("mat-card-actions .mdc-button__label").with_text("Place Order");
        let price = self.ctx.text_of(&Locator::new("mat-card p")).await?;
        let grand_total = Locator::new("tfoot th").with_exact_text(price.as_str());
        tracing::info!(item = name, %price, "checking out");

        self.ctx.click(&self.cart_badge).await?;
        let price_column = self.column_index("Price", None).await?;
        let total_column = self.column_index("Total", None).await?;
        let checks = [
            (
                Self::first_row_cell(price_column, None),
                "Item Price on home page not matched with price in cart",
            ),
            (Self::first_row_cell(total_column, None), "Item Total Price incorrect"),
            (
                Locator::new("mat-card-content>td").nth(total_column),
                "Total Cart Price incorrect",
            ),
        ];
        for (cell, message) in &checks {
            self.ctx
                .expect_slow(cell)
                .with_message(*message)
                .to_have_text(price.as_str())
                .await?;
        }

        self.ctx.click(&checkout_button).await?;
        self.ctx
            .expect(&self.page_title)
            .with_message("Not on Check Out page")
            .to_have_text("Check Out")
            .await?;
        self.ctx
            .expect_slow(&grand_total)
            .with_message("Expected the Grand Total to be as expected")
            .to_be_visible()
            .await?;
        self.fill_shipping_form(shipping).await?;
        self.ctx
            .expect(&place_order)
            .precondition()
            .with_message("Expected the Place Order Button to be visible")
            .to_be_visible()
            .await?;
        self.ctx.click(&place_order).await?;
        self.ctx
            .expect_slow(&self.page_title)
            .with_message("Not on My Orders page")
            .to_have_text("My Orders")
            .await?;
        self.verify_ordered_item(name).await
    }

    /// Open the newest order and check it contains `name`
    pub async fn verify_ordered_item(&self, name: &str) -> BookcartResult<()> {
        let details = Locator::new(".example-element-detail mat-card-content").filter_visible();
        let search = Locator::new("mat-form-field input[placeholder=\"Search\"]");
        self.ctx
            .expect_slow(&self.page_title)
            .with_message("Not on My Order page")
            .to_have_text("My Orders")
            .await?;
        let order_column = self.column_index("Order Id", None).await?;
        let order_id = Self::first_row_cell(order_column, None);
        let id = self.ctx.text_of(&order_id).await?;
        tracing::debug!(order = %id, "opening order");
        self.ctx
            .expect(&search)
            .precondition()
            .with_message("Expected Search order option to be visible")
            .to_be_visible()
            .await?;
        self.ctx.replace_text(&search, &id).await?;
        self.ctx.click(&order_id).await?;
        self.expect_visible(&details, "Expected order Details to be visible").await?;
        let title_column = self.column_index("Title", Some(&details)).await?;
        self.ctx
            .expect_slow(&Self::first_row_cell(title_column, Some(&details)))
            .with_message("Order Name is not as expected")
            .to_have_text(name)
            .await
    }
}

impl PageObject for HomePage {
    fn page_name(&self) -> &'static str {
        "Home"
    }

    fn url_pattern(&self) -> &'static str {
        "/"
    }

    fn locators(&self) -> Vec<(&'static str, &Locator)> {
        vec![
            ("nav_bar", &self.nav_bar),
            ("brand_logo", &self.brand_logo),
            ("brand_name", &self.brand_name),
            ("nav_bar_icons", &self.nav_bar_icons),
            ("search_box", &self.search_box),
            ("filter_option", &self.filter_option),
            ("price_filter", &self.price_filter),
            ("purchase_items", &self.purchase_items),
            ("wishlist_badge", &self.wishlist_badge),
            ("cart_badge", &self.cart_badge),
            ("home_button", &self.home_button),
            ("page_title", &self.page_title),
        ]
    }
}
