pub mod config;
pub mod element;
pub mod error;
pub mod selector;

pub use config::{ComponentGroup, ControlDescriptor, RuleSpec, TabConfig, ToolbarSettings};
pub use element::{ElementInfo, NodeInfo};
pub use error::ConfigError;
pub use selector::SelectorList;
