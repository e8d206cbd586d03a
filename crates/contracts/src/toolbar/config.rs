use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ConfigError;

/// Default debounce window before a deactivated editable hides its toolbar.
pub const DEFAULT_GRACE_DELAY_MS: u32 = 10;

/// Name of a leaf control (button, dropdown, ...) handed to the control renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlDescriptor(pub String);

impl ControlDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

pub type ComponentGroup = Vec<ControlDescriptor>;

/// Declarative activation rule as it appears in settings.
///
/// `null` or a missing key is `Unset`, a boolean is `Flag`, a string is a
/// `Selector`; any other JSON value is kept as `Unsupported`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum RuleSpec {
    #[default]
    Unset,
    Flag(bool),
    Selector(String),
    Unsupported(Value),
}

impl From<Value> for RuleSpec {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => RuleSpec::Unset,
            Value::Bool(b) => RuleSpec::Flag(b),
            Value::String(s) => RuleSpec::Selector(s),
            other => RuleSpec::Unsupported(other),
        }
    }
}

impl From<RuleSpec> for Value {
    fn from(rule: RuleSpec) -> Self {
        match rule {
            RuleSpec::Unset => Value::Null,
            RuleSpec::Flag(b) => Value::Bool(b),
            RuleSpec::Selector(s) => Value::String(s),
            RuleSpec::Unsupported(v) => v,
        }
    }
}

/// One declared tab: `{ label, activateOn?, components }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabConfig {
    pub label: String,
    #[serde(default)]
    pub activate_on: RuleSpec,
    #[serde(default)]
    pub components: Vec<ComponentGroup>,
}

impl TabConfig {
    pub fn new(label: &str, activate_on: RuleSpec, components: Vec<ComponentGroup>) -> Self {
        Self {
            label: label.to_string(),
            activate_on,
            components,
        }
    }
}

/// Toolbar settings.
///
/// `tabs` is the current shape. `components` is the older ungrouped shape:
/// still accepted, wrapped into a single unnamed tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarSettings {
    #[serde(default = "default_grace_delay_ms")]
    pub grace_delay_ms: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<TabConfig>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<ComponentGroup>>,
    #[serde(default)]
    pub unnamed_tab_label: String,
}

fn default_grace_delay_ms() -> u32 {
    DEFAULT_GRACE_DELAY_MS
}

impl Default for ToolbarSettings {
    fn default() -> Self {
        Self {
            grace_delay_ms: DEFAULT_GRACE_DELAY_MS,
            tabs: None,
            components: None,
            unnamed_tab_label: String::new(),
        }
    }
}

impl ToolbarSettings {
    pub fn with_tabs(tabs: Vec<TabConfig>) -> Self {
        Self {
            tabs: Some(tabs),
            ..Self::default()
        }
    }

    /// Parse settings from JSON and check that they declare some tab shape.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let settings: ToolbarSettings = serde_json::from_str(raw)?;
        if settings.tabs.is_none() && settings.components.is_none() {
            return Err(ConfigError::NoTabs);
        }
        Ok(settings)
    }

    /// True when only the deprecated ungrouped `components` shape is present.
    pub fn uses_legacy_components(&self) -> bool {
        self.tabs.is_none() && self.components.is_some()
    }

    /// Resolved tab list: explicit `tabs`, else one synthesized tab wrapping
    /// the ungrouped `components`, else nothing.
    pub fn tab_configs(&self) -> Vec<TabConfig> {
        if let Some(tabs) = &self.tabs {
            return tabs.clone();
        }
        match &self.components {
            Some(groups) => {
                log::warn!(
                    "toolbar `components` without `tabs` is deprecated; wrapping {} group(s) in an unnamed tab",
                    groups.len()
                );
                vec![TabConfig::new(
                    &self.unnamed_tab_label,
                    RuleSpec::Unset,
                    groups.clone(),
                )]
            }
            None => Vec::new(),
        }
    }
}
