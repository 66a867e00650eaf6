//! Labeled code fragments.
//!
//! A [`CodeSequence`] is an ordered list of text fragments. Independent
//! generation steps address fragments by label to insert content around them
//! or rewrite them, without knowing how the sequence was assembled. Labels
//! are metadata only: the order of the sequence is the order of the output.

use std::collections::VecDeque;
use tracing::debug;

/// Label carried by blank-line fragments.
pub const BLANK_LABEL: &str = "nl";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    BlankLine,
}

/// Atomic unit of generated text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub label: Option<String>,
    pub content: Content,
}

impl Fragment {
    pub fn text(code: impl Into<String>) -> Self {
        Self {
            label: None,
            content: Content::Text(code.into()),
        }
    }

    pub fn labeled(code: impl Into<String>, label: &str) -> Self {
        Self::text(code).with_label(Some(label))
    }

    pub fn blank() -> Self {
        Self {
            label: Some(BLANK_LABEL.to_string()),
            content: Content::BlankLine,
        }
    }

    pub fn with_label(mut self, label: Option<&str>) -> Self {
        self.label = label.map(str::to_string);
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Text of the fragment; blank lines read as an empty string.
    pub fn code(&self) -> &str {
        match &self.content {
            Content::Text(code) => code,
            Content::BlankLine => "",
        }
    }

    fn has_label(&self, label: &str) -> bool {
        self.label.as_deref() == Some(label)
    }

    fn push_lines(&self, lines: &mut Vec<String>) {
        match &self.content {
            Content::Text(code) => lines.extend(
                code.split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string()),
            ),
            Content::BlankLine => lines.push(String::new()),
        }
    }
}

/// Ordered, label-addressable sequence of fragments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeSequence {
    fragments: VecDeque<Fragment>,
}

impl CodeSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn fragments(&self) -> impl Iterator<Item = &Fragment> {
        self.fragments.iter()
    }

    /// Fragments carrying `label`, in sequence order.
    pub fn labeled<'s>(&'s self, label: &'s str) -> impl Iterator<Item = &'s Fragment> + 's {
        self.fragments.iter().filter(move |fragment| fragment.has_label(label))
    }

    pub fn push(&mut self, fragment: Fragment) {
        self.fragments.push_back(fragment);
    }

    pub fn append(&mut self, code: impl Into<String>, label: Option<&str>) {
        self.fragments.push_back(Fragment::text(code).with_label(label));
    }

    pub fn prepend(&mut self, code: impl Into<String>, label: Option<&str>) {
        self.fragments.push_front(Fragment::text(code).with_label(label));
    }

    /// Appends `count` blank lines.
    pub fn blank_line(&mut self, count: usize) {
        for _ in 0..count {
            self.fragments.push_back(Fragment::blank());
        }
    }

    /// Appends every fragment of `other`, keeping their labels.
    pub fn extend(&mut self, other: CodeSequence) {
        self.fragments.extend(other.fragments);
    }

    /// Inserts a copy of the new fragment before every fragment labeled
    /// `target`. Nothing happens when no fragment carries the label.
    pub fn insert_before(&mut self, target: &str, code: impl Into<String>, label: Option<&str>) {
        let inserted = Fragment::text(code).with_label(label);
        let mut fragments = VecDeque::with_capacity(self.fragments.len() + 1);
        let mut hits = 0;
        for fragment in self.fragments.drain(..) {
            if fragment.has_label(target) {
                fragments.push_back(inserted.clone());
                hits += 1;
            }
            fragments.push_back(fragment);
        }
        self.fragments = fragments;
        debug!(target, hits, "insert before label");
    }

    /// Inserts a copy of the new fragment after every fragment labeled
    /// `target`. Nothing happens when no fragment carries the label.
    pub fn insert_after(&mut self, target: &str, code: impl Into<String>, label: Option<&str>) {
        let inserted = Fragment::text(code).with_label(label);
        let mut fragments = VecDeque::with_capacity(self.fragments.len() + 1);
        let mut hits = 0;
        for fragment in self.fragments.drain(..) {
            let matched = fragment.has_label(target);
            fragments.push_back(fragment);
            if matched {
                fragments.push_back(inserted.clone());
                hits += 1;
            }
        }
        self.fragments = fragments;
        debug!(target, hits, "insert after label");
    }

    /// Replaces every fragment labeled `label` with whatever `mapper`
    /// returns for its text.
    ///
    /// The whole fragment is replaced: the returned fragment's label is the
    /// one kept, so a mapper that wants the fragment to stay addressable must
    /// set it again. Use [`CodeSequence::map_content`] to keep the label.
    pub fn transform<F>(&mut self, label: &str, mut mapper: F)
    where
        F: FnMut(&str) -> Fragment,
    {
        for fragment in self.fragments.iter_mut() {
            if fragment.has_label(label) {
                *fragment = mapper(fragment.code());
            }
        }
    }

    /// Rewrites the text of every fragment labeled `label`, keeping the label.
    pub fn map_content<F>(&mut self, label: &str, mut mapper: F)
    where
        F: FnMut(&str) -> String,
    {
        for fragment in self.fragments.iter_mut() {
            if fragment.has_label(label) {
                fragment.content = Content::Text(mapper(fragment.code()));
            }
        }
    }

    /// Output lines in sequence order. Fragments holding line breaks yield
    /// one line per break; blank-line fragments yield one empty line.
    pub fn render(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.fragments.len());
        for fragment in &self.fragments {
            fragment.push_lines(&mut lines);
        }
        lines
    }

    /// Rendered lines joined into file text, ending with a newline.
    pub fn render_string(&self) -> String {
        let mut text = self.render().join("\n");
        if !text.is_empty() {
            text.push('\n');
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sequence(items: &[(&str, Option<&str>)]) -> CodeSequence {
        let mut code = CodeSequence::new();
        for (text, label) in items {
            code.append(*text, *label);
        }
        code
    }

    fn contents(code: &CodeSequence) -> Vec<String> {
        code.fragments().map(|f| f.code().to_string()).collect()
    }

    #[test]
    fn test_append_and_prepend() {
        let mut code = CodeSequence::new();
        code.append("b", None);
        code.prepend("a", Some("first"));
        code.append("c", None);
        assert_eq!(code.render(), vec!["a", "b", "c"]);
        assert_eq!(code.labeled("first").count(), 1);
    }

    #[test]
    fn test_insert_after_every_occurrence() {
        let mut code = sequence(&[("A", Some("l1")), ("B", Some("l2")), ("C", Some("l1"))]);
        code.insert_after("l1", "X", None);
        assert_eq!(contents(&code), vec!["A", "X", "B", "C", "X"]);
    }

    #[test]
    fn test_insert_before_every_occurrence() {
        let mut code = sequence(&[("A", Some("l1")), ("B", Some("l2")), ("C", Some("l1"))]);
        code.insert_before("l1", "X", Some("x"));
        assert_eq!(contents(&code), vec!["X", "A", "B", "X", "C"]);
        assert_eq!(code.labeled("x").count(), 2);
    }

    #[test]
    fn test_insert_with_unknown_label_is_noop() {
        let mut code = sequence(&[("A", Some("l1"))]);
        let before = code.clone();
        code.insert_after("missing", "X", None);
        code.insert_before("missing", "X", None);
        assert_eq!(code, before);
    }

    #[test]
    fn test_transform_replaces_whole_fragment() {
        let mut code = sequence(&[("a", Some("up")), ("b", None), ("c", Some("up"))]);
        code.transform("up", |text| Fragment::text(text.to_uppercase()));
        assert_eq!(contents(&code), vec!["A", "b", "C"]);
        // the mapper dropped the label
        assert_eq!(code.labeled("up").count(), 0);
    }

    #[test]
    fn test_transform_can_keep_label() {
        let mut code = sequence(&[("a", Some("up"))]);
        code.transform("up", |text| Fragment::labeled(format!("{text}!"), "up"));
        code.transform("up", |text| Fragment::labeled(format!("{text}?"), "up"));
        assert_eq!(contents(&code), vec!["a!?"]);
    }

    #[test]
    fn test_map_content_keeps_label() {
        let mut code = sequence(&[("a", Some("up"))]);
        code.map_content("up", |text| text.repeat(2));
        code.map_content("up", |text| format!("<{text}>"));
        assert_eq!(contents(&code), vec!["<aa>"]);
    }

    #[test]
    fn test_render_splits_lines_and_blank_lines() {
        let mut code = CodeSequence::new();
        code.append("one\ntwo", None);
        code.blank_line(2);
        code.append("three\r\nfour", None);
        assert_eq!(code.render(), vec!["one", "two", "", "", "three", "four"]);
        assert_eq!(code.labeled(BLANK_LABEL).count(), 2);
    }

    #[test]
    fn test_render_empty_sequence() {
        let code = CodeSequence::new();
        assert!(code.render().is_empty());
        assert_eq!(code.render_string(), "");
    }

    #[test]
    fn test_render_is_repeatable() {
        let code = sequence(&[("a", None), ("b", None)]);
        assert_eq!(code.render(), code.render());
        assert_eq!(code.render_string(), "a\nb\n");
    }

    #[test]
    fn test_labels_recover_content_after_render() {
        let code = sequence(&[("alpha\nbeta", Some("first")), ("gamma", Some("second"))]);
        let lines = code.render();

        let mut offset = 0;
        for fragment in code.fragments() {
            let count = fragment.code().split('\n').count();
            let recovered = lines[offset..offset + count].join("\n");
            assert_eq!(recovered, fragment.code());
            offset += count;
        }
        assert_eq!(offset, lines.len());
    }
}
