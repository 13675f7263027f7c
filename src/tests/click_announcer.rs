use super::*;

#[test]
fn single_item_click_announces_heading_text() -> Result<()> {
    let mut page = ready_page(r#"<div class="item"><h3>Report A</h3></div>"#)?;
    page.click(".item")?;
    assert_eq!(page.take_alert_messages(), vec!["你點擊了 Report A".to_string()]);
    Ok(())
}

#[test]
fn clicking_second_of_three_items_announces_only_it() -> Result<()> {
    let mut page = ready_page(THREE_ITEMS_HTML)?;
    page.click(".item:nth-child(2)")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Y")]);

    page.click("#x")?;
    page.click("#z")?;
    assert_eq!(page.take_alert_messages(), vec![announced("X"), announced("Z")]);
    Ok(())
}

#[test]
fn zero_items_binds_nothing_and_never_alerts() -> Result<()> {
    let mut page = Harness::from_html(r#"<div id="a"><h3>A</h3></div>"#)?;
    let announcer = ClickAnnouncer::default();
    assert_eq!(announcer.start(&mut page)?, 0);
    assert_eq!(page.listener_total(), 0);

    page.click("#a")?;
    page.click("h3")?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}

#[test]
fn non_item_elements_never_alert() -> Result<()> {
    let mut page = ready_page(THREE_ITEMS_HTML)?;
    page.click("#plain")?;
    page.click("#plain h3")?;
    page.click("#list")?;
    assert!(page.take_alert_messages().is_empty());
    assert_eq!(page.listener_count("#plain", "click")?, 0);
    Ok(())
}

#[test]
fn each_item_gets_exactly_one_listener() -> Result<()> {
    let page = ready_page(THREE_ITEMS_HTML)?;
    for selector in ["#x", "#y", "#z"] {
        assert_eq!(page.listener_count(selector, "click")?, 1);
    }
    assert_eq!(page.listener_total(), 3);
    Ok(())
}

#[test]
fn missing_heading_renders_prefix_only_by_default() -> Result<()> {
    let mut page = ready_page(r#"<div class="item" id="bare"><p>no heading</p></div>"#)?;
    page.click("#bare")?;
    assert_eq!(page.take_alert_messages(), vec![DEFAULT_PREFIX.to_string()]);
    Ok(())
}

#[test]
fn missing_heading_can_render_placeholder() -> Result<()> {
    let mut page = Harness::from_html(r#"<div class="item" id="bare"></div>"#)?;
    let config = AnnouncerConfig::new()
        .with_missing_label(MissingLabel::Placeholder("undefined".to_string()));
    ClickAnnouncer::new(config)?.install(&mut page)?;
    page.finish_loading()?;

    page.click("#bare")?;
    assert_eq!(page.take_alert_messages(), vec![announced("undefined")]);
    Ok(())
}

#[test]
fn empty_heading_is_not_treated_as_missing() -> Result<()> {
    let mut page = Harness::from_html(r#"<div class="item" id="e"><h3></h3></div>"#)?;
    let config = AnnouncerConfig::new().with_missing_label(MissingLabel::Placeholder("?".into()));
    ClickAnnouncer::new(config)?.install(&mut page)?;
    page.finish_loading()?;

    page.click("#e")?;
    assert_eq!(page.take_alert_messages(), vec![DEFAULT_PREFIX.to_string()]);
    Ok(())
}

#[test]
fn label_lookup_reports_absence_explicitly() -> Result<()> {
    let page = Harness::from_html(
        r#"<div class="item" id="with"><h3>T</h3></div><div class="item" id="without"></div>"#,
    )?;
    let announcer = ClickAnnouncer::default();
    let with = page.dom.query_selector("#with")?.expect("item with heading");
    let without = page.dom.query_selector("#without")?.expect("item without heading");

    assert_eq!(announcer.label_for(&page, with)?, Some("T".to_string()));
    assert_eq!(announcer.label_for(&page, without)?, None);
    Ok(())
}

#[test]
fn clicking_heading_bubbles_to_item() -> Result<()> {
    let mut page = ready_page(THREE_ITEMS_HTML)?;
    page.click("#y h3")?;
    page.click("#z p")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Y"), announced("Z")]);
    Ok(())
}

#[test]
fn first_heading_in_document_order_wins() -> Result<()> {
    let mut page = ready_page(
        r#"<div class="item" id="i">
             <div><p>intro</p><h3>Deep first</h3></div>
             <h3>Shallow second</h3>
           </div>"#,
    )?;
    page.click("#i")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Deep first")]);
    Ok(())
}

#[test]
fn heading_text_joins_nested_text_and_decodes_entities() -> Result<()> {
    let mut page =
        ready_page(r#"<div class="item" id="i"><h3>Q&amp;A <em>2024</em> &#x263A;</h3></div>"#)?;
    page.click("#i")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Q&A 2024 ☺")]);
    Ok(())
}

#[test]
fn heading_whitespace_is_kept_verbatim() -> Result<()> {
    let mut page = ready_page("<div class=\"item\" id=\"i\"><h3>\n  Padded  </h3></div>")?;
    page.click("#i")?;
    assert_eq!(page.take_alert_messages(), vec![announced("\n  Padded  ")]);
    Ok(())
}

#[test]
fn item_heading_does_not_match_item_itself() -> Result<()> {
    let mut page = Harness::from_html(r#"<h3 class="item" id="h">Self</h3>"#)?;
    ClickAnnouncer::default().install(&mut page)?;
    page.finish_loading()?;

    page.click("#h")?;
    assert_eq!(page.take_alert_messages(), vec![DEFAULT_PREFIX.to_string()]);
    Ok(())
}

#[test]
fn heading_is_resolved_at_click_time() -> Result<()> {
    let mut page = ready_page(r#"<div class="item" id="i"><h3>Before</h3></div>"#)?;
    page.set_inner_html("#i", "<h3>After</h3>")?;
    page.click("#i")?;
    assert_eq!(page.take_alert_messages(), vec![announced("After")]);

    page.set_inner_html("#i", "<p>gone</p>")?;
    page.click("#i")?;
    assert_eq!(page.take_alert_messages(), vec![DEFAULT_PREFIX.to_string()]);
    Ok(())
}

#[test]
fn items_added_after_readiness_are_not_bound() -> Result<()> {
    let mut page = ready_page(
        r#"<div id="host"></div><div class="item" id="old"><h3>Old</h3></div>"#,
    )?;
    page.set_inner_html("#host", r#"<div class="item" id="new"><h3>New</h3></div>"#)?;

    page.click("#new")?;
    assert!(page.take_alert_messages().is_empty());
    assert_eq!(page.listener_count("#new", "click")?, 0);

    page.click("#old")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Old")]);
    Ok(())
}

#[test]
fn nested_items_announce_inner_then_outer() -> Result<()> {
    let mut page = ready_page(
        r#"<div class="item" id="outer"><h3>Outer</h3>
             <div class="item" id="inner"><h3>Inner</h3></div>
           </div>"#,
    )?;
    page.click("#inner")?;
    assert_eq!(
        page.take_alert_messages(),
        vec![announced("Inner"), announced("Outer")]
    );
    Ok(())
}

#[test]
fn capture_listeners_announce_outer_first() -> Result<()> {
    let mut page = Harness::from_html(
        r#"<div class="item" id="outer"><h3>Outer</h3>
             <div class="item" id="inner"><h3>Inner</h3></div>
           </div>"#,
    )?;
    ClickAnnouncer::new(AnnouncerConfig::new().with_capture(true))?.install(&mut page)?;
    page.finish_loading()?;

    page.click("#inner")?;
    assert_eq!(
        page.take_alert_messages(),
        vec![announced("Outer"), announced("Inner")]
    );
    Ok(())
}

#[test]
fn starting_twice_binds_twice() -> Result<()> {
    let mut page = Harness::from_html(r#"<div class="item" id="i"><h3>Twice</h3></div>"#)?;
    let announcer = ClickAnnouncer::default();
    assert_eq!(announcer.start(&mut page)?, 1);
    assert_eq!(announcer.start(&mut page)?, 1);
    assert_eq!(page.listener_count("#i", "click")?, 2);

    page.click("#i")?;
    assert_eq!(
        page.take_alert_messages(),
        vec![announced("Twice"), announced("Twice")]
    );
    Ok(())
}

#[test]
fn custom_marker_heading_and_prefix() -> Result<()> {
    let mut page = Harness::from_html(
        r#"<ul>
             <li class="card" id="c1"><h2>Alpha</h2><h3>ignored</h3></li>
             <li class="item" id="i1"><h2>Beta</h2></li>
           </ul>"#,
    )?;
    let config = AnnouncerConfig::new()
        .with_item_class("card")
        .with_heading_selector("h2")
        .with_prefix("You clicked ");
    assert_eq!(config.item_selector(), ".card");
    ClickAnnouncer::new(config)?.install(&mut page)?;
    page.finish_loading()?;

    page.click("#c1")?;
    page.click("#i1")?;
    assert_eq!(page.take_alert_messages(), vec!["You clicked Alpha".to_string()]);
    Ok(())
}

#[test]
fn item_class_must_be_a_whole_token() -> Result<()> {
    let mut page = ready_page(
        r#"<div class="items" id="a"><h3>A</h3></div>
           <div class="list-item" id="b"><h3>B</h3></div>
           <div class="big item wide" id="c"><h3>C</h3></div>"#,
    )?;
    page.click("#a")?;
    page.click("#b")?;
    page.click("#c")?;
    assert_eq!(page.take_alert_messages(), vec![announced("C")]);
    Ok(())
}

#[test]
fn invalid_selectors_are_rejected_up_front() {
    let bad_item = ClickAnnouncer::new(AnnouncerConfig::new().with_item_selector(".item >"));
    assert!(matches!(bad_item, Err(Error::UnsupportedSelector(_))));

    let bad_heading = ClickAnnouncer::new(AnnouncerConfig::new().with_heading_selector(""));
    assert!(matches!(bad_heading, Err(Error::UnsupportedSelector(_))));
}

#[test]
fn default_config_matches_marker_contract() {
    let config = AnnouncerConfig::default();
    assert_eq!(config.item_selector(), ".item");
    assert_eq!(config.heading_selector(), "h3");
    assert_eq!(config.prefix(), "你點擊了 ");
    assert_eq!(config.missing_label(), &MissingLabel::Empty);
    assert!(!config.capture());
}

#[test]
fn binder_never_writes_to_document() -> Result<()> {
    let mut page = Harness::from_html(THREE_ITEMS_HTML)?;
    let before = page.dump_dom("#list")?;
    ClickAnnouncer::default().install(&mut page)?;
    page.finish_loading()?;
    page.click("#x")?;
    page.click("#y h3")?;
    assert_eq!(page.dump_dom("#list")?, before);
    Ok(())
}

#[test]
fn deeply_nested_heading_is_found() -> Result<()> {
    let depth = 5_000;
    let mut html = String::from(r#"<div class="item" id="deep">"#);
    html.push_str(&"<div>".repeat(depth));
    html.push_str("<h3>Bottom</h3>");
    html.push_str(&"</div>".repeat(depth));
    html.push_str("</div>");

    let mut page = ready_page(&html)?;
    page.click("h3")?;
    assert_eq!(page.take_alert_messages(), vec![announced("Bottom")]);
    Ok(())
}

#[test]
fn combinator_item_selector_tries_every_ancestor() -> Result<()> {
    let html = r#"
      <div class="x"><div class="y"><div class="y">
        <div class="item" id="i"><h3>T</h3></div>
      </div></div></div>
    "#;
    let mut page = Harness::from_html(html)?;
    let announcer =
        ClickAnnouncer::new(AnnouncerConfig::new().with_item_selector(".x > .y .item"))?;
    assert_eq!(announcer.start(&mut page)?, 1);

    page.click("#i h3")?;
    assert_eq!(page.take_alert_messages(), vec![announced("T")]);
    Ok(())
}

#[test]
fn oversized_nth_child_offset_binds_nothing() -> Result<()> {
    let mut page = Harness::from_html(THREE_ITEMS_HTML)?;
    let announcer = ClickAnnouncer::new(
        AnnouncerConfig::new().with_item_selector(".item:nth-child(n-9223372036854775807)"),
    )?;
    assert_eq!(announcer.start(&mut page)?, 0);

    page.click("#x")?;
    assert!(page.take_alert_messages().is_empty());
    Ok(())
}
