//! Interfaces to the rendering layer.
//!
//! The core never paints anything itself: controls, tab chrome and the
//! toolbar container all belong to the host.

use std::any::Any;
use std::fmt;

use toolbar_contracts::toolbar::ControlDescriptor;

use super::context::ContextId;
use super::tab_set::TabWidget;

/// Opaque visual handle returned by the control renderer.
pub struct ControlHandle(Box<dyn Any>);

impl ControlHandle {
    pub fn new<T: Any>(value: T) -> Self {
        Self(Box::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

impl fmt::Debug for ControlHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ControlHandle(..)")
    }
}

/// What the tab widget needs to know to paint one tab handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabHeader {
    pub id: String,
    pub label: String,
    pub index: usize,
}

pub trait ControlRenderer {
    /// Called once per leaf control when a tab is constructed.
    fn render_control(&self, control: &ControlDescriptor, context: &ContextId) -> ControlHandle;
}

/// Host side of the toolbar: control rendering, tab chrome and the container.
pub trait ToolbarHost: ControlRenderer {
    fn create_tab_widget(&self, context: &ContextId, tabs: &[TabHeader]) -> Box<dyn TabWidget>;

    /// Make the toolbar of `context` the displayed one.
    fn attach(&self, context: &ContextId);

    fn detach(&self, context: &ContextId);

    /// Drop everything rendered for `context`. Called once it is removed.
    fn destroy(&self, _context: &ContextId) {}

    fn set_group_visible(
        &self,
        _context: &ContextId,
        _tab_index: usize,
        _group_index: usize,
        _visible: bool,
    ) {
    }
}
