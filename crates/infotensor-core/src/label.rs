//! Axis labels and the base-label convention.
//!
//! A tensor axis is named by a [`Label`]: a base name plus an optional
//! instance index. `"X_3"` is instance 3 of the group `"X"`, while `"time"`
//! carries no index. A selector string matches a label when it names the
//! label exactly or names its base, so `"X"` addresses every `X_<n>` axis of
//! a tensor at once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Identifier of one tensor axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Label {
    base: String,
    index: Option<u32>,
}

impl Label {
    /// Parse a concrete label name.
    ///
    /// A trailing `_<digits>` becomes the instance index. Digits with a
    /// leading zero (`"X_01"`) are kept as part of the base so the label
    /// prints back exactly as given.
    pub fn parse(name: &str) -> Self {
        if let Some((base, suffix)) = name.rsplit_once('_') {
            if let (false, Some(index)) = (base.is_empty(), canonical_index(suffix)) {
                return Self {
                    base: base.to_string(),
                    index: Some(index),
                };
            }
        }
        Self {
            base: name.to_string(),
            index: None,
        }
    }

    /// Build instance `index` of group `base`.
    pub fn grouped(base: impl Into<String>, index: u32) -> Self {
        Self {
            base: base.into(),
            index: Some(index),
        }
    }

    /// Group name (the whole name for ungrouped labels).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Instance index within the group, if any.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// True when `name` spells this exact label.
    pub fn is_named(&self, name: &str) -> bool {
        match self.index {
            None => self.base == name,
            Some(index) => name
                .strip_prefix(self.base.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
                .and_then(canonical_index)
                == Some(index),
        }
    }

    /// True when `selector` names this label or the group it belongs to.
    pub fn matches(&self, selector: &str) -> bool {
        self.is_named(selector) || (self.index.is_some() && self.base == selector)
    }
}

fn canonical_index(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}_{}", self.base, index),
            None => write!(f, "{}", self.base),
        }
    }
}

impl From<&str> for Label {
    fn from(name: &str) -> Self {
        Self::parse(name)
    }
}

impl From<String> for Label {
    fn from(name: String) -> Self {
        Self::parse(&name)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.to_string()
    }
}

/// Resolve selectors to axis positions in `labels`.
///
/// Selectors are processed in order; each contributes every matching axis in
/// tensor order. An axis matched twice is reported once. A selector that
/// matches nothing is an [`Error::UnknownLabel`], and an empty selector list
/// is [`Error::NoLabels`].
pub fn expand_axes<S: AsRef<str>>(selectors: &[S], labels: &[Label]) -> Result<Vec<usize>> {
    if selectors.is_empty() {
        return Err(Error::NoLabels);
    }
    let mut axes = Vec::new();
    for selector in selectors {
        let selector = selector.as_ref();
        let mut matched = false;
        for (axis, label) in labels.iter().enumerate() {
            if label.matches(selector) {
                matched = true;
                if !axes.contains(&axis) {
                    axes.push(axis);
                }
            }
        }
        if !matched {
            return Err(Error::UnknownLabel(selector.to_string()));
        }
    }
    Ok(axes)
}

/// Resolve selectors to the concrete labels they address.
pub fn expand_base_labels<S: AsRef<str>>(selectors: &[S], labels: &[Label]) -> Result<Vec<Label>> {
    Ok(expand_axes(selectors, labels)?
        .into_iter()
        .map(|axis| labels[axis].clone())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<Label> {
        names.iter().map(|n| Label::parse(n)).collect()
    }

    #[test]
    fn test_parse_grouped() {
        let l = Label::parse("X_12");
        assert_eq!(l.base(), "X");
        assert_eq!(l.index(), Some(12));
        assert_eq!(l.to_string(), "X_12");
    }

    #[test]
    fn test_parse_plain_and_non_numeric_suffix() {
        assert_eq!(Label::parse("time").index(), None);
        let l = Label::parse("initial_state");
        assert_eq!(l.base(), "initial_state");
        assert_eq!(l.index(), None);
    }

    #[test]
    fn test_leading_zero_kept_verbatim() {
        let l = Label::parse("X_01");
        assert_eq!(l.index(), None);
        assert_eq!(l.to_string(), "X_01");
    }

    #[test]
    fn test_matches_base_and_exact() {
        let l = Label::parse("X_2");
        assert!(l.matches("X"));
        assert!(l.matches("X_2"));
        assert!(!l.matches("X_3"));
        assert!(!l.matches("Y"));
        // Ungrouped labels only match exactly.
        assert!(!Label::parse("Xa").matches("X"));
    }

    #[test]
    fn test_expand_preserves_selector_then_tensor_order() {
        let all = labels(&["t", "X_1", "Y_1", "X_2"]);
        let axes = expand_axes(&["Y", "X"], &all).unwrap();
        assert_eq!(axes, vec![2, 1, 3]);
    }

    #[test]
    fn test_expand_deduplicates() {
        let all = labels(&["X_1", "X_2"]);
        let axes = expand_axes(&["X_2", "X"], &all).unwrap();
        assert_eq!(axes, vec![1, 0]);
    }

    #[test]
    fn test_expand_unknown_selector() {
        let all = labels(&["X_1"]);
        assert_eq!(
            expand_axes(&["Z"], &all),
            Err(Error::UnknownLabel("Z".to_string()))
        );
    }

    #[test]
    fn test_expand_empty_selector_list() {
        let all = labels(&["X_1"]);
        let none: [&str; 0] = [];
        assert_eq!(expand_axes(&none, &all), Err(Error::NoLabels));
    }

    #[test]
    fn test_serde_as_string() {
        let l = Label::grouped("S", 4);
        let json = serde_json::to_string(&l).unwrap();
        assert_eq!(json, "\"S_4\"");
        let back: Label = serde_json::from_str(&json).unwrap();
        assert_eq!(back, l);
    }
}
