use click_announce::{AnnouncerConfig, ClickAnnouncer, Harness, MissingLabel, ReadyState};

const CATALOG_HTML: &str = r#"
<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Reports</title>
  <script src="scripts.js"></script>
</head>
<body>
  <header><h1>季度報告</h1></header>
  <div class="container">
    <div class="item" id="r1">
      <img src="a.png" alt="">
      <h3>Report A</h3>
      <p>First quarter</p>
    </div>
    <div class="item" id="r2">
      <h3>Report B</h3>
      <p>Second quarter</p>
    </div>
    <div class="item" id="r3">
      <h3>報告 C</h3>
      <p>Third quarter</p>
    </div>
  </div>
  <footer class="footer"><h3>Contact</h3></footer>
</body>
</html>
"#;

fn loaded(html: &str) -> click_announce::Result<Harness> {
    let mut page = Harness::from_html(html)?;
    ClickAnnouncer::default().install(&mut page)?;
    page.finish_loading()?;
    Ok(page)
}

#[test]
fn catalog_page_announces_each_report() -> click_announce::Result<()> {
    let mut page = loaded(CATALOG_HTML)?;
    assert_eq!(page.ready_state(), ReadyState::Interactive);
    assert_eq!(page.listener_total(), 3);

    page.click("#r1")?;
    page.click("#r2 p")?;
    page.click("#r3 h3")?;
    assert_eq!(
        page.take_alert_messages(),
        vec![
            "你點擊了 Report A".to_string(),
            "你點擊了 Report B".to_string(),
            "你點擊了 報告 C".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn page_chrome_outside_items_stays_silent() -> click_announce::Result<()> {
    let mut page = loaded(CATALOG_HTML)?;
    page.click("header h1")?;
    page.click(".footer")?;
    page.click(".footer h3")?;
    page.click(".container")?;
    page.click("body")?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn three_items_click_second_only() -> click_announce::Result<()> {
    let html = r#"
      <div class="item"><h3>X</h3></div>
      <div class="item"><h3>Y</h3></div>
      <div class="item"><h3>Z</h3></div>
    "#;
    let mut page = loaded(html)?;
    page.click(".item:nth-child(2)")?;
    assert_eq!(page.take_alert_messages(), vec!["你點擊了 Y".to_string()]);
    Ok(())
}

#[test]
fn empty_document_initializes_cleanly() -> click_announce::Result<()> {
    let mut page = loaded("")?;
    assert_eq!(page.listener_total(), 0);
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn missing_heading_degrades_to_prefix() -> click_announce::Result<()> {
    let mut page = loaded(r#"<div class="item" id="bare"><p>nothing here</p></div>"#)?;
    page.click("#bare")?;
    assert_eq!(page.take_alert_messages(), vec!["你點擊了 ".to_string()]);
    Ok(())
}

#[test]
fn configured_announcer_for_english_cards() -> click_announce::Result<()> {
    let html = r#"
      <article class="card" data-id="1"><header><h2>Inbox</h2></header></article>
      <article class="card" data-id="2"></article>
    "#;
    let mut page = Harness::from_html(html)?;
    let announcer = ClickAnnouncer::new(
        AnnouncerConfig::new()
            .with_item_class("card")
            .with_heading_selector("header > h2")
            .with_prefix("You clicked ")
            .with_missing_label(MissingLabel::Placeholder("(untitled)".into())),
    )?;
    announcer.install(&mut page)?;
    page.finish_loading()?;

    page.click(r#"[data-id="1"] h2"#)?;
    page.click(r#"[data-id="2"]"#)?;
    assert_eq!(
        page.take_alert_messages(),
        vec![
            "You clicked Inbox".to_string(),
            "You clicked (untitled)".to_string(),
        ]
    );
    Ok(())
}

#[test]
fn malformed_html_is_rejected() {
    let err = Harness::from_html("<div><!-- never closed").expect_err("parse must fail");
    assert_eq!(err.to_string(), "html parse error: unclosed HTML comment");
}
