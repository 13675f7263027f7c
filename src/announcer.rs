use super::*;

/// Text placed before the heading label in every announcement ("You clicked ").
pub const DEFAULT_PREFIX: &str = "你點擊了 ";

/// What an announcement carries when the item has no heading descendant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MissingLabel {
    /// The announcement is the prefix alone.
    #[default]
    Empty,
    /// The given text stands in for the label.
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnouncerConfig {
    item_selector: String,
    heading_selector: String,
    prefix: String,
    missing_label: MissingLabel,
    capture: bool,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            item_selector: ".item".to_string(),
            heading_selector: "h3".to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            missing_label: MissingLabel::Empty,
            capture: false,
        }
    }
}

impl AnnouncerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item_selector(mut self, selector: impl Into<String>) -> Self {
        self.item_selector = selector.into();
        self
    }

    /// Shorthand for `with_item_selector(".{class_name}")`.
    pub fn with_item_class(self, class_name: &str) -> Self {
        self.with_item_selector(format!(".{class_name}"))
    }

    pub fn with_heading_selector(mut self, selector: impl Into<String>) -> Self {
        self.heading_selector = selector.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_missing_label(mut self, missing_label: MissingLabel) -> Self {
        self.missing_label = missing_label;
        self
    }

    /// Register the click listeners for the capture phase instead of bubble.
    pub fn with_capture(mut self, capture: bool) -> Self {
        self.capture = capture;
        self
    }

    pub fn item_selector(&self) -> &str {
        &self.item_selector
    }

    pub fn heading_selector(&self) -> &str {
        &self.heading_selector
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn missing_label(&self) -> &MissingLabel {
        &self.missing_label
    }

    pub fn capture(&self) -> bool {
        self.capture
    }
}

/// Binds a click listener to every item present when it starts. A click
/// raises an alert made of the prefix and the text of the item's first
/// heading descendant.
///
/// ```
/// use click_announce::{ClickAnnouncer, Harness};
///
/// let mut page = Harness::from_html(r#"<div class="item"><h3>Report A</h3></div>"#)?;
/// ClickAnnouncer::default().install(&mut page)?;
/// page.finish_loading()?;
/// page.click(".item")?;
/// assert_eq!(page.take_alert_messages(), vec!["你點擊了 Report A".to_string()]);
/// # Ok::<(), click_announce::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClickAnnouncer {
    config: AnnouncerConfig,
}

impl ClickAnnouncer {
    pub fn new(config: AnnouncerConfig) -> Result<Self> {
        parse_selector_groups(&config.item_selector)?;
        parse_selector_groups(&config.heading_selector)?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnnouncerConfig {
        &self.config
    }

    /// Runs [`ClickAnnouncer::start`] once the page signals readiness.
    pub fn install(self, page: &mut Harness) -> Result<()> {
        page.on_dom_content_loaded(move |page| self.start(page).map(|_| ()))
    }

    /// Binds every item currently in the document and returns how many were
    /// bound. Items added later are never bound. Calling this twice binds
    /// every item twice.
    pub fn start(&self, page: &mut Harness) -> Result<usize> {
        let items = page.dom.query_selector_all(&self.config.item_selector)?;
        let shared = Rc::new(self.clone());
        for item in &items {
            page.add_listener(
                *item,
                "click",
                Listener {
                    capture: self.config.capture,
                    handler: EventHandler::Announce {
                        item: *item,
                        announcer: Rc::clone(&shared),
                    },
                },
            );
        }
        page.trace_bind_line(format!(
            "[bind] selector={} items={} capture={}",
            self.config.item_selector,
            items.len(),
            self.config.capture
        ));
        Ok(items.len())
    }

    pub(crate) fn label_for(&self, page: &Harness, item: NodeId) -> Result<Option<String>> {
        let heading = page
            .dom
            .query_selector_from(item, &self.config.heading_selector)?;
        Ok(heading.map(|heading| page.dom.text_content(heading)))
    }

    pub(crate) fn message_for(&self, page: &Harness, item: NodeId) -> Result<String> {
        let label = match self.label_for(page, item)? {
            Some(label) => label,
            None => match &self.config.missing_label {
                MissingLabel::Empty => String::new(),
                MissingLabel::Placeholder(placeholder) => placeholder.clone(),
            },
        };
        Ok(format!("{}{label}", self.config.prefix))
    }

    pub(crate) fn announce(&self, page: &mut Harness, item: NodeId) -> Result<()> {
        let message = self.message_for(page, item)?;
        page.alert(&message);
        Ok(())
    }
}
