use std::fmt;
use std::rc::Rc;

use toolbar_contracts::toolbar::{RuleSpec, SelectorList};

use super::element::ElementDescriptor;

pub type CustomPredicate = Rc<dyn Fn(Option<&dyn ElementDescriptor>) -> bool>;

/// When a tab should be activated.
#[derive(Clone, Default)]
pub enum ActivationRule {
    /// No rule given: the tab is always eligible.
    #[default]
    Unset,
    Flag(bool),
    /// Selector tested against each effective element and its ancestors.
    Selector(String),
    Custom(CustomPredicate),
    /// A rule shape we cannot interpret. Never activates.
    Unsupported,
}

impl ActivationRule {
    pub fn custom(f: impl Fn(Option<&dyn ElementDescriptor>) -> bool + 'static) -> Self {
        ActivationRule::Custom(Rc::new(f))
    }

    pub fn selector(selector: &str) -> Self {
        ActivationRule::Selector(selector.to_string())
    }
}

impl From<RuleSpec> for ActivationRule {
    fn from(spec: RuleSpec) -> Self {
        match spec {
            RuleSpec::Unset => ActivationRule::Unset,
            RuleSpec::Flag(b) => ActivationRule::Flag(b),
            RuleSpec::Selector(s) => ActivationRule::Selector(s),
            RuleSpec::Unsupported(value) => {
                log::warn!("unsupported activateOn rule {value}; tab will never activate");
                ActivationRule::Unsupported
            }
        }
    }
}

impl fmt::Debug for ActivationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivationRule::Unset => write!(f, "Unset"),
            ActivationRule::Flag(b) => write!(f, "Flag({b})"),
            ActivationRule::Selector(s) => write!(f, "Selector({s:?})"),
            ActivationRule::Custom(_) => write!(f, "Custom(..)"),
            ActivationRule::Unsupported => write!(f, "Unsupported"),
        }
    }
}

/// Relevance test for one element, or for "no element at all".
#[derive(Clone)]
pub enum ActivationPredicate {
    Always,
    Never,
    MatchSelector(SelectorList),
    Custom(CustomPredicate),
}

impl ActivationPredicate {
    /// Selector rules are parsed here, once. One that does not parse
    /// becomes `Never`.
    pub fn from_rule(rule: ActivationRule) -> Self {
        match rule {
            ActivationRule::Unset | ActivationRule::Flag(true) => ActivationPredicate::Always,
            ActivationRule::Flag(false) | ActivationRule::Unsupported => ActivationPredicate::Never,
            ActivationRule::Selector(s) => match SelectorList::parse(&s) {
                Ok(list) => ActivationPredicate::MatchSelector(list),
                Err(e) => {
                    log::warn!("{e}; tab will never activate");
                    ActivationPredicate::Never
                }
            },
            ActivationRule::Custom(f) => ActivationPredicate::Custom(f),
        }
    }

    pub fn evaluate(&self, element: Option<&dyn ElementDescriptor>) -> bool {
        match self {
            ActivationPredicate::Always => true,
            ActivationPredicate::Never => false,
            ActivationPredicate::MatchSelector(selector) => element
                .is_some_and(|el| el.matches(selector) || el.has_ancestor_matching(selector)),
            ActivationPredicate::Custom(f) => f(element),
        }
    }
}

impl From<ActivationRule> for ActivationPredicate {
    fn from(rule: ActivationRule) -> Self {
        Self::from_rule(rule)
    }
}
