use std::rc::Rc;

use crate::config;
use crate::layout::{LeptosToolbarHost, ToolbarSignals};
use crate::toolbar::{ControlRenderer, GlooScheduler, ToolbarController};

/// Wire the toolbar for the browser: settings, Leptos host and `setTimeout` clock.
///
/// Render `<Toolbar signals=... />` with the returned signals and feed the
/// controller from the editor's notifications.
pub fn build_toolbar(
    renderer: Rc<dyn ControlRenderer>,
    settings_json: Option<&str>,
) -> anyhow::Result<(ToolbarController, ToolbarSignals)> {
    let settings = config::load_settings(settings_json)?;
    let signals = ToolbarSignals::new();
    let host = Rc::new(LeptosToolbarHost::new(signals, renderer));
    let controller = ToolbarController::from_settings(host, Rc::new(GlooScheduler), &settings);
    Ok((controller, signals))
}
