pub mod toolbar;

pub use toolbar::{LeptosToolbarHost, SignalTabWidget, Toolbar, ToolbarModel, ToolbarSignals};
