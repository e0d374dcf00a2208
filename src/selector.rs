//! CSS selector subset for locating widget elements.
//!
//! Supports compound steps of tag, `#id`, `.class`, `[attr]`, and
//! `[attr=value]`, joined by the descendant combinator, with comma-separated
//! groups. Anything else is reported as `Error::UnsupportedSelector` so a
//! typo in a test never reads as "element absent".

use crate::dom::{Dom, NodeId};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AttrCondition {
    Exists { key: String },
    Eq { key: String, value: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SelectorStep {
    pub(crate) tag: Option<String>,
    pub(crate) id: Option<String>,
    pub(crate) classes: Vec<String>,
    pub(crate) attrs: Vec<AttrCondition>,
}

impl SelectorStep {
    pub(crate) fn id_only(&self) -> Option<&str> {
        if self.tag.is_none() && self.classes.is_empty() && self.attrs.is_empty() {
            self.id.as_deref()
        } else {
            None
        }
    }

    fn matches(&self, dom: &Dom, node_id: NodeId) -> bool {
        let Some(element) = dom.element(node_id) else {
            return false;
        };
        if let Some(tag) = &self.tag {
            if !element.tag_name.eq_ignore_ascii_case(tag) {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if element.attrs.get("id") != Some(id) {
                return false;
            }
        }
        for class_name in &self.classes {
            if !dom.has_class(node_id, class_name) {
                return false;
            }
        }
        for cond in &self.attrs {
            match cond {
                AttrCondition::Exists { key } => {
                    if !element.attrs.contains_key(key) {
                        return false;
                    }
                }
                AttrCondition::Eq { key, value } => {
                    if element.attrs.get(key) != Some(value) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

/// Rightmost step must match the node itself; each remaining step must match
/// some strict ancestor, right to left.
pub(crate) fn matches_chain(dom: &Dom, node_id: NodeId, chain: &[SelectorStep]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !last.matches(dom, node_id) {
        return false;
    }

    let mut remaining = rest;
    let mut cursor = dom.parent(node_id);
    while let Some(step) = remaining.last() {
        let Some(node) = cursor else {
            return false;
        };
        if step.matches(dom, node) {
            remaining = &remaining[..remaining.len() - 1];
        }
        cursor = dom.parent(node);
    }
    true
}

pub(crate) fn parse_groups(selector: &str) -> Result<Vec<Vec<SelectorStep>>> {
    let mut groups = Vec::new();
    let mut bracket_depth = 0usize;
    let mut current = String::new();

    for ch in selector.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                if bracket_depth == 0 {
                    return Err(Error::UnsupportedSelector(selector.into()));
                }
                bracket_depth -= 1;
                current.push(ch);
            }
            ',' if bracket_depth == 0 => {
                groups.push(parse_chain(&current, selector)?);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    if bracket_depth != 0 {
        return Err(Error::UnsupportedSelector(selector.into()));
    }
    groups.push(parse_chain(&current, selector)?);
    Ok(groups)
}

pub(crate) fn parse_chain(chain_src: &str, full_selector: &str) -> Result<Vec<SelectorStep>> {
    let chain_src = chain_src.trim();
    if chain_src.is_empty() {
        return Err(Error::UnsupportedSelector(full_selector.into()));
    }

    let mut steps = Vec::new();
    let mut bracket_depth = 0usize;
    let mut current = String::new();
    for ch in chain_src.chars() {
        match ch {
            '[' => {
                bracket_depth += 1;
                current.push(ch);
            }
            ']' => {
                bracket_depth = bracket_depth.saturating_sub(1);
                current.push(ch);
            }
            ch if ch.is_ascii_whitespace() && bracket_depth == 0 => {
                if !current.is_empty() {
                    steps.push(parse_step(&current, full_selector)?);
                    current.clear();
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.is_empty() {
        steps.push(parse_step(&current, full_selector)?);
    }
    if steps.is_empty() {
        return Err(Error::UnsupportedSelector(full_selector.into()));
    }
    Ok(steps)
}

fn parse_step(part: &str, full_selector: &str) -> Result<SelectorStep> {
    let bytes = part.as_bytes();
    let mut i = 0usize;
    let mut step = SelectorStep::default();

    while i < bytes.len() {
        match bytes[i] {
            b'#' => {
                let (id, next) = parse_ident(part, i + 1)
                    .ok_or_else(|| Error::UnsupportedSelector(full_selector.into()))?;
                if step.id.replace(id).is_some() {
                    return Err(Error::UnsupportedSelector(full_selector.into()));
                }
                i = next;
            }
            b'.' => {
                let (class_name, next) = parse_ident(part, i + 1)
                    .ok_or_else(|| Error::UnsupportedSelector(full_selector.into()))?;
                step.classes.push(class_name);
                i = next;
            }
            b'[' => {
                let (cond, next) = parse_attr_condition(part, i, full_selector)?;
                step.attrs.push(cond);
                i = next;
            }
            _ => {
                if step.tag.is_some() || step.id.is_some() || !step.classes.is_empty() {
                    return Err(Error::UnsupportedSelector(full_selector.into()));
                }
                let (tag, next) = parse_ident(part, i)
                    .ok_or_else(|| Error::UnsupportedSelector(full_selector.into()))?;
                step.tag = Some(tag.to_ascii_lowercase());
                i = next;
            }
        }
    }

    if step.tag.is_none() && step.id.is_none() && step.classes.is_empty() && step.attrs.is_empty() {
        return Err(Error::UnsupportedSelector(full_selector.into()));
    }
    Ok(step)
}

fn parse_attr_condition(
    part: &str,
    open_bracket: usize,
    full_selector: &str,
) -> Result<(AttrCondition, usize)> {
    let bytes = part.as_bytes();
    let mut i = open_bracket + 1;

    let key_start = i;
    while i < bytes.len() && is_attr_name_char(bytes[i]) {
        i += 1;
    }
    if key_start == i {
        return Err(Error::UnsupportedSelector(full_selector.into()));
    }
    let key = part[key_start..i].to_ascii_lowercase();

    match bytes.get(i) {
        Some(b']') => Ok((AttrCondition::Exists { key }, i + 1)),
        Some(b'=') => {
            i += 1;
            let quote = match bytes.get(i) {
                Some(b'"') | Some(b'\'') => {
                    let q = bytes[i];
                    i += 1;
                    Some(q)
                }
                _ => None,
            };
            let value_start = i;
            while i < bytes.len() {
                match quote {
                    Some(q) if bytes[i] == q => break,
                    None if bytes[i] == b']' => break,
                    _ => i += 1,
                }
            }
            if i >= bytes.len() {
                return Err(Error::UnsupportedSelector(full_selector.into()));
            }
            let value = part[value_start..i].to_string();
            if quote.is_some() {
                i += 1;
            }
            if bytes.get(i) != Some(&b']') {
                return Err(Error::UnsupportedSelector(full_selector.into()));
            }
            Ok((AttrCondition::Eq { key, value }, i + 1))
        }
        _ => Err(Error::UnsupportedSelector(full_selector.into())),
    }
}

fn parse_ident(src: &str, start: usize) -> Option<(String, usize)> {
    let bytes = src.as_bytes();
    if start >= bytes.len() || !is_ident_char(bytes[start]) {
        return None;
    }
    let mut end = start + 1;
    while end < bytes.len() && is_ident_char(bytes[end]) {
        end += 1;
    }
    Some((src[start..end].to_string(), end))
}

fn is_ident_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-'
}

fn is_attr_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b':'
}
