//! Example: Page Predicates
//!
//! Demonstrates: Polling assertions over a scripted mock page, from plain
//! selectors to semantic element kinds and checkbox state.
//!
//! Run with: `cargo run --example page_predicates`
//!
//! Toyota Way: Genchi Genbutsu (Go and See) - Assert against observed page state

use esperar::prelude::*;
use std::time::Duration;

fn main() -> EsperarResult<()> {
    println!("=== Esperar Page Predicates Example ===\n");

    let session = Session::new();
    let browser = MockBrowser::new();

    // A small page: a banner, a list, a login form, and two checkboxes.
    browser.add_element(MockElement::new("hdr", "header").with_marker("header.banner"));
    browser.add_element(MockElement::new("item-1", "li").with_marker("li.item"));
    browser.add_element(MockElement::new("item-2", "li").with_marker("li.item"));
    browser.add_element(MockElement::new("item-3", "li").with_marker("li.item"));
    browser.add_element(
        MockElement::new("field-user", "input")
            .with_id("username")
            .with_name("user"),
    );
    browser.add_element(MockElement::new("btn-save", "button").with_id("save"));
    browser.add_element(
        MockElement::new("btn-publish", "button")
            .with_text("Publish")
            .with_marker("//button[normalize-space(.) = 'Publish']"),
    );
    browser.add_element(MockElement::new("nav-docs", "a").with_text("Documentation"));
    browser.add_element(MockElement::new("country", "select").with_name("country"));
    browser.add_element(MockElement::new("fruit-table", "table").with_id("fruit"));
    browser.add_element(
        MockElement::new("opt-news", "input")
            .with_id("newsletter")
            .with_selected(true),
    );
    browser.add_element(MockElement::new("opt-terms", "input").with_id("terms"));
    browser.add_element(
        MockElement::new("greeting", "p")
            .with_text("Welcome back, dev")
            .with_marker("//*[contains(normalize-space(.), 'Welcome back')]"),
    );

    let page = Page::new(&browser, session).with_policy(RetryPolicy::fast());
    println!("Driving {}\n", page.session());

    // 1. Existence and counts by raw selector
    println!("1. Raw selectors...");
    println!("   has_css(\"header.banner\")      -> {}", page.has_css("header.banner")?);
    println!("   has_css_count(\"li.item\", 3)   -> {}", page.has_css_count("li.item", 3)?);

    // 2. Semantic element kinds: id, name, link text, caption
    println!("\n2. Semantic lookup...");
    println!("   has_field(\"username\")         -> {}", page.has_field("username")?);
    println!("   has_field(\"user\")             -> {}", page.has_field("user")?);
    println!("   has_button(\"save\")            -> {}", page.has_button("save")?);
    println!("   has_button(\"Publish\")         -> {}", page.has_button("Publish")?);
    println!("   has_link(\"Documentation\")     -> {}", page.has_link("Documentation")?);
    println!("   has_select(\"country\")         -> {}", page.has_select("country")?);
    println!("   has_table(\"fruit\")            -> {}", page.has_table("fruit")?);

    // 3. Text assertions build injection-safe XPath
    println!("\n3. Text assertions...");
    println!("   has_text(\"Welcome back\")      -> {}", page.has_text("Welcome back")?);
    let tricky = text_query(r#"she said "it's done""#);
    println!("   mixed quotes escape to: {}", tricky.selector);

    // 4. Checkbox state, safe when the field is absent
    println!("\n4. Checkbox state...");
    let strict = Page::new(&browser, session).with_policy(RetryPolicy::new(Duration::from_millis(100)));
    println!("   has_checked_field(\"newsletter\")  -> {}", strict.has_checked_field("newsletter")?);
    println!("   has_unchecked_field(\"terms\")     -> {}", strict.has_unchecked_field("terms")?);
    println!("   has_no_checked_field(\"missing\")  -> {}", strict.has_no_checked_field("missing")?);
    println!("   has_checked_field(\"missing\")     -> {}", strict.has_checked_field("missing")?);

    // 5. Eventual consistency: the notice appears while we poll
    println!("\n5. Element that appears mid-poll...");
    let late = MockBrowser::new();
    late.insert_at(3, MockElement::new("notice-1", "div").with_marker("div.notice"));
    let late_page = Page::new(&late, session).with_policy(RetryPolicy::fast());
    println!("   has_css(\"div.notice\")         -> {}", late_page.has_css("div.notice")?);
    println!("   satisfied after {} queries", late.query_count());

    // 6. Disappearance: non-existence polls the same way
    println!("\n6. Element that disappears mid-poll...");
    let fading = MockBrowser::new();
    fading.add_element(MockElement::new("banner-1", "div").with_marker("div.banner"));
    fading.remove_at(2, "banner-1");
    let fading_page = Page::new(&fading, session).with_policy(RetryPolicy::fast());
    println!("   has_no_css(\"div.banner\")      -> {}", fading_page.has_no_css("div.banner")?);
    println!("   satisfied after {} queries", fading.query_count());

    // 7. Transport failure is an error, never a quiet `false`
    println!("\n7. Transport failure...");
    let flaky = MockBrowser::new();
    flaky.fail_at(1, "connection reset");
    let flaky_page = Page::new(&flaky, session).with_policy(RetryPolicy::fast());
    match flaky_page.has_css("div.notice") {
        Ok(present) => println!("   unexpected verdict: {present}"),
        Err(e) => println!("   propagated: {e}"),
    }

    println!("\n✅ Page predicates example completed!");
    Ok(())
}
