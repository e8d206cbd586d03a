//! Minimal CSS selector engine for element descriptors.
//!
//! Supports what toolbar activation rules use in practice:
//! - selector lists (`ul,ol`)
//! - type, universal, id and class selectors (`td.num`, `#main`, `*`)
//! - descendant and child combinators (`table td`, `ul > li`)
//!
//! Pseudo-classes and attribute selectors are rejected at parse time.

use super::element::{ElementInfo, NodeInfo};
use super::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
}

impl Compound {
    fn matches(&self, node: &NodeInfo) -> bool {
        if let Some(tag) = &self.tag {
            if !tag.eq_ignore_ascii_case(&node.tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if node.id.as_deref() != Some(id.as_str()) {
                return false;
            }
        }
        self.classes.iter().all(|c| node.has_class(c))
    }
}

/// One comma-separated branch: compounds left to right, with
/// `combinators[i]` joining `compounds[i]` and `compounds[i + 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ComplexSelector {
    compounds: Vec<Compound>,
    combinators: Vec<Combinator>,
}

impl ComplexSelector {
    /// Matches compound `k` at `chain[pos]`, then walks outward.
    fn match_at(&self, chain: &[&NodeInfo], k: usize, pos: usize) -> bool {
        if !self.compounds[k].matches(chain[pos]) {
            return false;
        }
        if k == 0 {
            return true;
        }
        match self.combinators[k - 1] {
            Combinator::Child => pos + 1 < chain.len() && self.match_at(chain, k - 1, pos + 1),
            Combinator::Descendant => {
                (pos + 1..chain.len()).any(|p| self.match_at(chain, k - 1, p))
            }
        }
    }

    fn matches_from(&self, chain: &[&NodeInfo], pos: usize) -> bool {
        self.match_at(chain, self.compounds.len() - 1, pos)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorList {
    source: String,
    branches: Vec<ComplexSelector>,
}

impl SelectorList {
    pub fn parse(selector: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        let mut branches = Vec::new();
        for branch in selector.split(',') {
            let branch = branch.trim();
            if branch.is_empty() {
                return Err(invalid("empty selector"));
            }
            branches.push(parse_complex(branch).map_err(|reason| invalid(&reason))?);
        }
        Ok(Self {
            source: selector.trim().to_string(),
            branches,
        })
    }

    /// The selector text as it was parsed.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True if the element itself matches.
    pub fn matches(&self, element: &ElementInfo) -> bool {
        let chain: Vec<&NodeInfo> = element.chain().collect();
        self.branches.iter().any(|b| b.matches_from(&chain, 0))
    }

    /// Depth of the nearest node (0 = the element itself) that matches,
    /// searching outward through the element's ancestors.
    pub fn closest(&self, element: &ElementInfo) -> Option<usize> {
        self.find_from(element, 0)
    }

    /// Like `closest`, but skips the element itself.
    pub fn closest_ancestor(&self, element: &ElementInfo) -> Option<usize> {
        self.find_from(element, 1)
    }

    fn find_from(&self, element: &ElementInfo, start: usize) -> Option<usize> {
        let chain: Vec<&NodeInfo> = element.chain().collect();
        (start..chain.len()).find(|&pos| self.branches.iter().any(|b| b.matches_from(&chain, pos)))
    }
}

/// Structural-match test: does `element` match `selector`?
///
/// An unparseable selector never matches.
pub fn matches(element: &ElementInfo, selector: &str) -> bool {
    match SelectorList::parse(selector) {
        Ok(list) => list.matches(element),
        Err(e) => {
            log::warn!("{e}");
            false
        }
    }
}

fn parse_complex(input: &str) -> Result<ComplexSelector, String> {
    let mut compounds = Vec::new();
    let mut combinators = Vec::new();
    let mut pending: Option<Combinator> = None;
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            if pending.is_none() && !compounds.is_empty() {
                pending = Some(Combinator::Descendant);
            }
            continue;
        }
        if c == '>' {
            chars.next();
            if compounds.is_empty() {
                return Err("combinator without left-hand side".to_string());
            }
            pending = Some(Combinator::Child);
            continue;
        }

        let compound = parse_compound(&mut chars)?;
        if !compounds.is_empty() {
            combinators.push(pending.take().unwrap_or(Combinator::Descendant));
        }
        pending = None;
        compounds.push(compound);
    }

    if compounds.is_empty() || (pending == Some(Combinator::Child)) {
        return Err("dangling combinator".to_string());
    }
    Ok(ComplexSelector {
        compounds,
        combinators,
    })
}

fn parse_compound(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> Result<Compound, String> {
    let mut compound = Compound::default();
    let mut empty = true;

    match chars.peek() {
        Some('*') => {
            chars.next();
            empty = false;
        }
        Some(c) if is_ident_char(*c) => {
            compound.tag = Some(read_ident(chars));
            empty = false;
        }
        _ => {}
    }

    while let Some(&c) = chars.peek() {
        match c {
            '#' | '.' => {
                chars.next();
                let ident = read_ident(chars);
                if ident.is_empty() {
                    return Err(format!("expected a name after `{c}`"));
                }
                if c == '#' {
                    compound.id = Some(ident);
                } else {
                    compound.classes.push(ident);
                }
                empty = false;
            }
            c if c.is_whitespace() || c == '>' => break,
            other => return Err(format!("unsupported character `{other}`")),
        }
    }

    if empty {
        return Err("empty compound selector".to_string());
    }
    Ok(compound)
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

fn read_ident(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut ident = String::new();
    while let Some(&c) = chars.peek() {
        if !is_ident_char(c) {
            break;
        }
        ident.push(c);
        chars.next();
    }
    ident
}
