use anyhow::Context;
use toolbar_contracts::toolbar::ToolbarSettings;

/// Default toolbar embedded in the bundle
const DEFAULT_SETTINGS: &str = r#"
{
    "graceDelayMs": 10,
    "tabs": [
        {
            "label": "Format",
            "components": [
                ["bold", "italic", "underline", "strikethrough"],
                ["formatBlock"],
                ["removeFormat"]
            ]
        },
        {
            "label": "Lists",
            "activateOn": "ul,ol",
            "components": [
                ["orderedList", "unorderedList"],
                ["indentList", "outdentList"]
            ]
        },
        {
            "label": "Table",
            "activateOn": "table",
            "components": [
                ["addRowBefore", "addRowAfter", "deleteRows"],
                ["addColumnBefore", "addColumnAfter", "deleteColumns"]
            ]
        },
        {
            "label": "Link",
            "activateOn": "a",
            "components": [
                ["editLink", "removeLink"]
            ]
        }
    ]
}
"#;

/// Load toolbar settings
///
/// Uses `raw` when supplied, otherwise the embedded defaults.
pub fn load_settings(raw: Option<&str>) -> anyhow::Result<ToolbarSettings> {
    match raw {
        Some(raw) => {
            log::info!("Loading toolbar settings from supplied JSON");
            ToolbarSettings::from_json(raw).context("failed to parse supplied toolbar settings")
        }
        None => {
            log::info!("Using default embedded toolbar settings");
            ToolbarSettings::from_json(DEFAULT_SETTINGS)
                .context("embedded default toolbar settings are invalid")
        }
    }
}
