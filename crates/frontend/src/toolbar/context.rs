use std::fmt;

use super::host::ToolbarHost;
use super::tab::{Tab, TabDefinition};
use super::tab_set::TabSet;
use super::timer::ScheduledTask;

/// Identity of one editable surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(String);

impl ContextId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContextId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    NeverRendered,
    Hidden,
    Shown,
}

/// Toolbar state of one editable surface.
pub struct EditableContext {
    id: ContextId,
    definitions: Option<Vec<TabDefinition>>,
    tab_set: Option<TabSet>,
    state: RenderState,
    pending_hide: Option<Box<dyn ScheduledTask>>,
}

impl EditableContext {
    pub fn new(id: ContextId) -> Self {
        Self {
            id,
            definitions: None,
            tab_set: None,
            state: RenderState::NeverRendered,
            pending_hide: None,
        }
    }

    pub fn id(&self) -> &ContextId {
        &self.id
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn tab_set(&self) -> Option<&TabSet> {
        self.tab_set.as_ref()
    }

    pub(crate) fn tab_set_mut(&mut self) -> Option<&mut TabSet> {
        self.tab_set.as_mut()
    }

    pub fn has_pending_hide(&self) -> bool {
        self.pending_hide.is_some()
    }

    /// Per-editable tab list. Ignored once the toolbar has been rendered.
    pub(crate) fn set_definitions(&mut self, definitions: Vec<TabDefinition>) -> bool {
        if self.state != RenderState::NeverRendered {
            return false;
        }
        self.definitions = Some(definitions);
        true
    }

    pub(crate) fn set_state(&mut self, state: RenderState) {
        if self.state != RenderState::NeverRendered {
            self.state = state;
        }
    }

    /// Build the tab set once; later calls do nothing.
    pub(crate) fn render(&mut self, defaults: &[TabDefinition], host: &dyn ToolbarHost) {
        if self.state != RenderState::NeverRendered {
            return;
        }
        let definitions = self.definitions.as_deref().unwrap_or(defaults);
        let tabs: Vec<Tab> = definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| {
                Tab::new(index, definition.clone(), |control| {
                    host.render_control(control, &self.id)
                })
            })
            .collect();
        let headers: Vec<_> = tabs.iter().map(Tab::header).collect();
        let widget = host.create_tab_widget(&self.id, &headers);

        log::debug!("rendered toolbar for '{}' with {} tab(s)", self.id, tabs.len());
        self.tab_set = Some(TabSet::new(tabs, widget));
        self.state = RenderState::Hidden;
    }

    pub(crate) fn replace_pending_hide(&mut self, task: Box<dyn ScheduledTask>) {
        self.cancel_pending_hide();
        self.pending_hide = Some(task);
    }

    pub(crate) fn cancel_pending_hide(&mut self) -> bool {
        match self.pending_hide.take() {
            Some(task) => {
                task.cancel();
                true
            }
            None => false,
        }
    }

    /// The scheduled hide fired; the handle is spent.
    pub(crate) fn clear_pending_hide(&mut self) {
        self.pending_hide = None;
    }
}
