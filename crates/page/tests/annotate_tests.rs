// ABOUTME: Integration tests for annotating HTML package listings.
// ABOUTME: Tests idempotent processing, metric ordering, the reactive driver and JSON config loading.

use gigprice_page::{
    Annotator, Config, Driver, HtmlPage, Metric, PackagePage, PageEvent, ProcessOutcome,
};
use pretty_assertions::assert_eq;
use tokio::sync::mpsc;

/// Builds one package card in the markup the default locators expect.
fn card(id: &str, price: &str, size: &str) -> String {
    format!(
        r#"<div class="card-templ-wrapper" id="{id}">
  <div class="card-template">
    <div class="card-description"><h6>{size}</h6></div>
    <div class="card-price"><span class="fa-number">{price}</span> تومان</div>
    <div class="card-buy-credit"><button>خرید از اعتبار</button></div>
  </div>
</div>"#
    )
}

fn page_with(cards: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>بسته‌ها</title></head><body><div class="row">{}</div></body></html>"#,
        cards.join("\n")
    )
}

fn position(html: &str, id: &str) -> usize {
    html.find(&format!(r#"id="{id}""#))
        .unwrap_or_else(|| panic!("{id} not in output"))
}

#[test]
fn process_twice_renders_one_fragment() {
    let html = page_with(&[card("a", "۱۲۰,۰۰۰", "۳۰ روزه ۴۰ گیگ")]);
    let config = Config::default();
    let mut page = HtmlPage::parse(&html, &config).unwrap();
    let mut annotator = Annotator::new(&config).unwrap();
    let a = page.packages()[0];

    assert!(annotator.process(&mut page, a).is_augmented());
    assert_eq!(annotator.process(&mut page, a), ProcessOutcome::AlreadyProcessed);

    let out = page.html();
    assert_eq!(out.matches(r#"class="price-per-gb-extension""#).count(), 1);
    assert_eq!(out.matches("data-price-per-gb=").count(), 1);
    assert!(out.contains(">3,000</span>"));
    assert_eq!(annotator.metric(a).map(Metric::value), Some(3_000.0));
}

#[test]
fn fresh_annotator_respects_previous_pass() {
    let html = page_with(&[card("a", "1000", "10 GB")]);
    let config = Config::default();

    let mut page = HtmlPage::parse(&html, &config).unwrap();
    let mut first = Annotator::new(&config).unwrap();
    let a = page.packages()[0];
    first.process(&mut page, a);

    let mut second = Annotator::new(&config).unwrap();
    assert_eq!(second.process(&mut page, a), ProcessOutcome::AlreadyProcessed);
    assert_eq!(second.metric(a).map(Metric::value), Some(100.0));
    assert_eq!(
        page.html().matches(r#"class="price-per-gb-extension""#).count(),
        1
    );
}

#[test]
fn order_by_metric_with_missing_last() {
    // Metrics 30, absent, 10, 20
    let html = page_with(&[
        card("m30", "300", "10 گیگ"),
        card("none", "تماس بگیرید", "10 گیگ"),
        card("m10", "100", "10 گیگ"),
        card("m20", "200", "10 گیگ"),
    ]);
    let config = Config::default();
    let mut page = HtmlPage::parse(&html, &config).unwrap();
    let mut annotator = Annotator::new(&config).unwrap();
    let packages = page.packages();
    annotator.process_all(&mut page, &packages);

    let ordered = annotator.sort_group(&mut page, &packages);
    assert_eq!(
        ordered,
        vec![packages[2], packages[3], packages[0], packages[1]]
    );
    assert_eq!(annotator.order_by_metric(&ordered), ordered);

    let out = page.html();
    assert!(position(&out, "m10") < position(&out, "m20"));
    assert!(position(&out, "m20") < position(&out, "m30"));
    assert!(position(&out, "m30") < position(&out, "none"));
}

#[test]
fn unusable_elements_are_left_alone() {
    let html = page_with(&[
        r#"<div class="card-templ-wrapper" id="empty"></div>"#.to_string(),
        card("zero", "0", "0 GB"),
    ]);
    let config = Config::default();
    let mut page = HtmlPage::parse(&html, &config).unwrap();
    let mut annotator = Annotator::new(&config).unwrap();
    let packages = page.packages();

    for _ in 0..3 {
        let summary = annotator.process_all(&mut page, &packages);
        assert_eq!(summary.skipped, 2);
    }
    assert!(!page.html().contains("price-per-gb-extension"));
    assert!(annotator.metrics().is_empty());
}

#[tokio::test]
async fn driver_processes_late_insertions() {
    let html = page_with(&[card("a", "500", "10 GB")]);
    let config = Config::default();
    let page = HtmlPage::parse(&html, &config).unwrap();
    let mut driver = Driver::new(page, Annotator::new(&config).unwrap());
    driver.scan();

    let roots = driver
        .page_mut()
        .insert_html(
            ".row",
            &format!(
                "<section>{}{}</section>",
                card("b", "100", "10 GB"),
                card("c", "90", "512 MB")
            ),
        )
        .unwrap();

    let (tx, rx) = mpsc::channel(4);
    for root in roots {
        tx.send(PageEvent::Inserted(root)).await.unwrap();
    }
    tx.send(PageEvent::SortRequested).await.unwrap();
    drop(tx);

    // The scan already ran, so only the insertion event can augment b and c
    let summary = driver.run(rx).await;
    assert_eq!(summary.augmented, 3);
    assert_eq!(summary.already_processed, 0);

    let out = driver.page().html();
    assert_eq!(out.matches(r#"class="price-per-gb-extension""#).count(), 3);
    // b (10 per GB) sorts before c (180 per GB) inside the inserted section
    assert!(position(&out, "b") < position(&out, "c"));
}

#[test]
fn inserted_card_is_augmented_by_its_event() {
    let html = page_with(&[card("a", "500", "10 GB")]);
    let config = Config::default();
    let page = HtmlPage::parse(&html, &config).unwrap();
    let mut driver = Driver::new(page, Annotator::new(&config).unwrap());
    assert_eq!(driver.scan().augmented, 1);

    let roots = driver
        .page_mut()
        .insert_html(".row", &card("late", "2000", "۴ گیگ"))
        .unwrap();
    assert_eq!(roots.len(), 1);

    let summary = driver.handle(PageEvent::Inserted(roots[0]));
    assert_eq!(summary.augmented, 1);
    assert_eq!(summary.already_processed, 0);

    let out = driver.page().html();
    assert_eq!(out.matches(r#"class="price-per-gb-extension""#).count(), 2);
    assert!(out.contains(">500</span>"));
    assert_eq!(driver.summary().augmented, 2);
}

#[test]
fn json_config_drives_custom_markup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.json");
    std::fs::write(
        &path,
        r#"{
            "locators": {"container": "tr.offer", "price": "td.price", "size": "td.volume",
                         "template": "td.volume", "insert_before": "span.never"},
            "vocabulary": {"large": ["Go"], "small": ["Mo"]},
            "fragment": {"label": "Prix/Go", "currency": "EUR", "inject_style": false}
        }"#,
    )
    .unwrap();
    let config = Config::from_path(&path).unwrap();

    let html = r#"<table><tr class="offer"><td class="price">20 €</td><td class="volume">5 Go</td></tr></table>"#;
    let mut page = HtmlPage::parse(html, &config).unwrap();
    let mut annotator = Annotator::new(&config).unwrap();
    let offer = page.packages()[0];

    assert!(annotator.process(&mut page, offer).is_augmented());
    let out = page.html();
    assert!(out.contains("Prix/Go"));
    assert!(out.contains(">4</span> EUR"));
    assert!(!out.contains("<style"));
}
