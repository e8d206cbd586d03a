//! Contextual toolbar core.
//!
//! Contains:
//! - `predicate` - activation rules resolved into predicates
//! - `tab` / `tab_set` - tab activation and selected-tab reconciliation
//! - `controller` - per-editable lifecycle and event dispatch
//! - `host` / `timer` - narrow interfaces to the rendering layer and the clock

pub mod context;
pub mod controller;
pub mod element;
pub mod host;
pub mod predicate;
pub mod tab;
pub mod tab_set;
pub mod timer;

#[cfg(test)]
pub(crate) mod testing;

pub use context::{ContextId, EditableContext, RenderState};
pub use controller::{EditorEvent, NotificationSource, ToolbarController};
pub use element::{ElementDescriptor, SelectionSnapshot};
pub use host::{ControlHandle, ControlRenderer, TabHeader, ToolbarHost};
pub use predicate::{ActivationPredicate, ActivationRule};
pub use tab::{Tab, TabDefinition, TabState};
pub use tab_set::{TabSet, TabWidget};
pub use timer::{GlooScheduler, ScheduledTask, Scheduler};
