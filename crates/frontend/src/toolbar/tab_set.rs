use std::rc::Rc;

use super::element::ElementDescriptor;
use super::tab::{Tab, TabState};

/// Tab chrome provided by the host: handle visibility plus which panel is shown.
pub trait TabWidget {
    /// Number of rendered tab handles. Zero until the widget is built.
    fn handle_count(&self) -> usize;

    fn set_handle_visible(&mut self, index: usize, visible: bool);

    fn select(&mut self, index: usize);

    fn selected_index(&self) -> Option<usize>;

    /// Show no panel at all. Returns `false` if the widget cannot do that.
    fn deselect_all(&mut self) -> bool {
        false
    }

    /// Fallback for widgets without `deselect_all`: drop the "active"
    /// styling of one handle.
    fn clear_active_style(&mut self, _index: usize) {}
}

/// Ordered tabs of one editable, with at most one selected.
pub struct TabSet {
    tabs: Vec<Tab>,
    widget: Box<dyn TabWidget>,
    selected: Option<usize>,
}

impl TabSet {
    /// Every tab starts hidden.
    pub fn new(tabs: Vec<Tab>, mut widget: Box<dyn TabWidget>) -> Self {
        if widget.handle_count() > 0 {
            for tab in &tabs {
                widget.set_handle_visible(tab.index(), false);
            }
        }
        Self {
            tabs,
            widget,
            selected: None,
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn tabs(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn tab(&self, index: usize) -> Option<&Tab> {
        self.tabs.get(index)
    }

    pub(crate) fn tab_mut(&mut self, index: usize) -> Option<&mut Tab> {
        self.tabs.get_mut(index)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn tab_state(&self, index: usize) -> Option<TabState> {
        let tab = self.tabs.get(index)?;
        Some(if !tab.is_activated() {
            TabState::Hidden
        } else if self.selected == Some(index) {
            TabState::Selected
        } else {
            TabState::Shown
        })
    }

    pub fn tab_index_for_control(&self, name: &str) -> Option<usize> {
        self.tabs.iter().position(|t| t.contains_control(name))
    }

    fn is_rendered(&self) -> bool {
        self.widget.handle_count() > 0
    }

    /// Show the tab's handle; select it if nothing is selected or it was
    /// the selected tab.
    pub fn activate(&mut self, index: usize) {
        if !self.is_rendered() {
            return;
        }
        let Some(tab) = self.tabs.get_mut(index) else {
            return;
        };
        tab.set_activated(true);
        self.widget.set_handle_visible(index, true);
        log::debug!("tab '{}' activated", tab.label());

        if self.selected.is_none() || self.selected == Some(index) {
            self.select(index);
        }
    }

    /// Hide the tab's handle. If it was selected, the first activated tab
    /// in index order takes over, or the selection is cleared.
    pub fn deactivate(&mut self, index: usize) {
        if !self.is_rendered() {
            return;
        }
        let Some(tab) = self.tabs.get_mut(index) else {
            return;
        };
        tab.set_activated(false);
        self.widget.set_handle_visible(index, false);
        log::debug!("tab '{}' deactivated", tab.label());

        if self.selected != Some(index) {
            return;
        }
        match self.tabs.iter().position(Tab::is_activated) {
            Some(next) => self.select(next),
            None => self.clear_selection(index),
        }
    }

    /// Bring an activated tab to the front. Hidden tabs stay hidden.
    pub fn foreground(&mut self, index: usize) -> bool {
        if !self.is_rendered() || !self.tabs.get(index).is_some_and(Tab::is_activated) {
            return false;
        }
        self.select(index);
        true
    }

    /// Adopt a selection made directly on the widget (e.g. a click on a
    /// tab handle) if it points at an activated tab.
    pub fn sync_selection_from_widget(&mut self) {
        let Some(index) = self.widget.selected_index() else {
            return;
        };
        if self.selected != Some(index) && self.tabs.get(index).is_some_and(Tab::is_activated) {
            log::debug!("adopting widget selection {index}");
            self.selected = Some(index);
        }
    }

    /// Activate or deactivate every tab for the given effective elements,
    /// in declaration order.
    pub fn check_active_tabs(&mut self, elements: &[Rc<dyn ElementDescriptor>]) {
        self.sync_selection_from_widget();
        for index in 0..self.tabs.len() {
            let tab = &self.tabs[index];
            let should_activate = tab.should_activate_for_elements(elements);
            if should_activate && !tab.is_activated() {
                self.activate(index);
            } else if !should_activate && tab.is_activated() {
                self.deactivate(index);
            }
        }
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        self.widget.select(index);
        log::debug!("tab {index} selected");
    }

    fn clear_selection(&mut self, previous: usize) {
        self.selected = None;
        if !self.widget.deselect_all() {
            self.widget.clear_active_style(previous);
        }
        log::debug!("no tab selected");
    }
}
