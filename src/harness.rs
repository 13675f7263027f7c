use super::*;

/// Document lifecycle as seen by readiness hooks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
}

type ReadyHook = Box<dyn FnOnce(&mut Harness) -> Result<()>>;

#[derive(Debug)]
pub(crate) struct TraceState {
    pub(crate) enabled: bool,
    pub(crate) events: bool,
    pub(crate) logs: VecDeque<String>,
    pub(crate) log_limit: usize,
    pub(crate) to_stderr: bool,
}

impl Default for TraceState {
    fn default() -> Self {
        Self {
            enabled: false,
            events: true,
            logs: VecDeque::new(),
            log_limit: 10_000,
            to_stderr: true,
        }
    }
}

/// In-process page host: a parsed document, its listeners, the readiness
/// signal and a record of every alert raised.
pub struct Harness {
    pub(crate) dom: Dom,
    pub(crate) listeners: ListenerStore,
    ready_state: ReadyState,
    ready_hooks: Vec<ReadyHook>,
    alert_messages: Vec<String>,
    trace_state: TraceState,
}

impl fmt::Debug for Harness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Harness")
            .field("dom", &self.dom)
            .field("listeners", &self.listeners)
            .field("ready_state", &self.ready_state)
            .field("ready_hooks", &self.ready_hooks.len())
            .field("alert_messages", &self.alert_messages)
            .field("trace_state", &self.trace_state)
            .finish()
    }
}

impl Harness {
    pub fn from_html(html: &str) -> Result<Self> {
        let ParseOutput { dom } = parse_html(html)?;
        Ok(Self {
            dom,
            listeners: ListenerStore::default(),
            ready_state: ReadyState::Loading,
            ready_hooks: Vec::new(),
            alert_messages: Vec::new(),
            trace_state: TraceState::default(),
        })
    }

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Queues `hook` for the readiness signal. Once the document is
    /// interactive the hook runs immediately instead.
    pub fn on_dom_content_loaded<F>(&mut self, hook: F) -> Result<()>
    where
        F: FnOnce(&mut Harness) -> Result<()> + 'static,
    {
        match self.ready_state {
            ReadyState::Loading => {
                self.ready_hooks.push(Box::new(hook));
                Ok(())
            }
            ReadyState::Interactive => hook(self),
        }
    }

    /// Signals that the document structure is complete. Runs every queued
    /// hook in registration order, then dispatches `DOMContentLoaded` at the
    /// document. Only the first call has any effect.
    pub fn finish_loading(&mut self) -> Result<()> {
        if self.ready_state == ReadyState::Interactive {
            self.trace_line("[ready] already interactive".to_string());
            return Ok(());
        }

        self.ready_state = ReadyState::Interactive;
        let hooks = std::mem::take(&mut self.ready_hooks);
        self.trace_line(format!("[ready] DOMContentLoaded hooks={}", hooks.len()));
        for hook in hooks {
            hook(self)?;
        }

        let root = self.dom.root;
        self.dispatch_event(root, "DOMContentLoaded")?;
        Ok(())
    }

    pub fn click(&mut self, selector: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, "click")?;
        Ok(())
    }

    pub fn dispatch(&mut self, selector: &str, event: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dispatch_event(target, event)?;
        Ok(())
    }

    /// Raises a synchronous notification. The message is recorded instead of
    /// blocking.
    pub fn alert(&mut self, message: &str) {
        self.trace_line(format!("[alert] {message}"));
        self.alert_messages.push(message.to_string());
    }

    pub fn take_alert_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alert_messages)
    }

    pub fn set_inner_html(&mut self, selector: &str, html: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        self.dom.set_inner_html(target, html)
    }

    pub fn listener_count(&self, selector: &str, event: &str) -> Result<usize> {
        let target = self.select_one(selector)?;
        Ok(self.listeners.count(target, event))
    }

    pub fn listener_total(&self) -> usize {
        self.listeners.total()
    }

    pub fn text_content(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.text_content(target))
    }

    pub fn assert_text(&self, selector: &str, expected: &str) -> Result<()> {
        let target = self.select_one(selector)?;
        let actual = self.dom.text_content(target);
        if actual != expected {
            return Err(Error::AssertionFailed {
                selector: selector.to_string(),
                expected: expected.to_string(),
                actual,
                dom_snippet: self.node_snippet(target),
            });
        }
        Ok(())
    }

    pub fn assert_exists(&self, selector: &str) -> Result<()> {
        let _ = self.select_one(selector)?;
        Ok(())
    }

    pub fn dump_dom(&self, selector: &str) -> Result<String> {
        let target = self.select_one(selector)?;
        Ok(self.dom.dump_node(target))
    }

    pub fn enable_trace(&mut self, enabled: bool) {
        self.trace_state.enabled = enabled;
    }

    pub fn set_trace_events(&mut self, enabled: bool) {
        self.trace_state.events = enabled;
    }

    pub fn set_trace_stderr(&mut self, enabled: bool) {
        self.trace_state.to_stderr = enabled;
    }

    pub fn set_trace_log_limit(&mut self, max_entries: usize) -> Result<()> {
        if max_entries == 0 {
            return Err(Error::Runtime(
                "set_trace_log_limit requires at least 1 entry".into(),
            ));
        }
        self.trace_state.log_limit = max_entries;
        while self.trace_state.logs.len() > self.trace_state.log_limit {
            self.trace_state.logs.pop_front();
        }
        Ok(())
    }

    pub fn take_trace_logs(&mut self) -> Vec<String> {
        std::mem::take(&mut self.trace_state.logs).into()
    }

    pub(crate) fn add_listener(&mut self, node_id: NodeId, event: &str, listener: Listener) {
        self.listeners.add(node_id, event.to_string(), listener);
    }

    fn select_one(&self, selector: &str) -> Result<NodeId> {
        self.dom
            .query_selector(selector)?
            .ok_or_else(|| Error::SelectorNotFound(selector.to_string()))
    }

    fn node_snippet(&self, node_id: NodeId) -> String {
        truncate_chars(&self.dom.dump_node(node_id), 200)
    }

    fn dispatch_event(&mut self, target: NodeId, event_type: &str) -> Result<EventState> {
        let mut event = EventState::new(event_type, target);

        let mut path = Vec::new();
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            path.push(node);
            cursor = self.dom.parent(node);
        }
        path.reverse();
        let ancestors = &path[..path.len() - 1];

        // Capture phase.
        for node in ancestors {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, true)?;
        }

        // Target phase: capture listeners first.
        event.current_target = target;
        self.invoke_listeners(target, &mut event, true)?;
        self.invoke_listeners(target, &mut event, false)?;

        // Bubble phase.
        for node in ancestors.iter().rev() {
            event.current_target = *node;
            self.invoke_listeners(*node, &mut event, false)?;
        }

        let target_label = self.trace_node_label(event.target);
        self.trace_event_line(format!(
            "[event] done {} target={}",
            event.event_type, target_label
        ));
        Ok(event)
    }

    fn invoke_listeners(
        &mut self,
        node_id: NodeId,
        event: &mut EventState,
        capture: bool,
    ) -> Result<()> {
        // Snapshot: listeners added while these run wait for the next dispatch.
        let listeners = self.listeners.get(node_id, &event.event_type, capture);
        for listener in listeners {
            if self.trace_state.enabled {
                let phase = if capture { "capture" } else { "bubble" };
                let target_label = self.trace_node_label(event.target);
                let current_label = self.trace_node_label(event.current_target);
                self.trace_event_line(format!(
                    "[event] {} target={} current={} phase={}",
                    event.event_type, target_label, current_label, phase
                ));
            }
            match listener.handler {
                EventHandler::Announce { item, announcer } => announcer.announce(self, item)?,
            }
        }
        Ok(())
    }

    fn trace_node_label(&self, node: NodeId) -> String {
        if let Some(id) = self.dom.attr(node, "id") {
            if !id.is_empty() {
                return format!("#{id}");
            }
        }
        match self.dom.tag_name(node) {
            Some(tag) => match self.dom.attr(node, "class") {
                Some(classes) if !classes.trim().is_empty() => {
                    format!("{tag}.{}", classes.split_whitespace().collect::<Vec<_>>().join("."))
                }
                _ => tag.to_string(),
            },
            None if node == self.dom.root => "document".to_string(),
            None => format!("node-{}", node.0),
        }
    }

    pub(crate) fn trace_bind_line(&mut self, line: String) {
        self.trace_line(line);
    }

    fn trace_event_line(&mut self, line: String) {
        if self.trace_state.events {
            self.trace_line(line);
        }
    }

    fn trace_line(&mut self, line: String) {
        if self.trace_state.enabled {
            if self.trace_state.to_stderr {
                eprintln!("{line}");
            }
            if self.trace_state.logs.len() >= self.trace_state.log_limit {
                self.trace_state.logs.pop_front();
            }
            self.trace_state.logs.push_back(line);
        }
    }
}
