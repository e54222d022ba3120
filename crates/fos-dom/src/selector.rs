//! Element Query
//!
//! A small selector engine: compound selectors (tag, `.class`, `#id`,
//! `[attr]`, `[attr="value"]`) joined by descendant or child combinators,
//! grouped with commas. Enough for widget markup contracts.

use crate::{DomError, DomResult, DomTree, ElementData, NodeId};

/// Simple selector component
#[derive(Debug, Clone, PartialEq, Eq)]
enum SimpleSelector {
    Tag(String),
    Class(String),
    Id(String),
    Attr { name: String, value: Option<String> },
}

impl SimpleSelector {
    fn matches(&self, elem: &ElementData) -> bool {
        match self {
            Self::Tag(tag) => elem.tag == *tag,
            Self::Class(class) => elem.has_class(class),
            Self::Id(id) => elem.id() == Some(id.as_str()),
            Self::Attr { name, value } => match (elem.get_attr(name), value) {
                (Some(_), None) => true,
                (Some(actual), Some(expected)) => actual == expected,
                (None, _) => false,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

/// Conjunction of simple selectors; empty means `*`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    parts: Vec<SimpleSelector>,
}

impl Compound {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        tree.element(id)
            .is_some_and(|elem| self.parts.iter().all(|p| p.matches(elem)))
    }
}

/// Compounds with the combinator linking each one to the previous compound
#[derive(Debug, Clone, PartialEq, Eq)]
struct Complex {
    head: Compound,
    rest: Vec<(Combinator, Compound)>,
}

impl Complex {
    fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.matches_at(tree, id, self.rest.len())
    }

    /// Match compound `index` (0 = head) against `id`, then walk leftwards
    fn matches_at(&self, tree: &DomTree, id: NodeId, index: usize) -> bool {
        if index == 0 {
            return self.head.matches(tree, id);
        }
        let (combinator, compound) = &self.rest[index - 1];
        if !compound.matches(tree, id) {
            return false;
        }
        match combinator {
            Combinator::Child => tree
                .parent(id)
                .is_some_and(|p| self.matches_at(tree, p, index - 1)),
            Combinator::Descendant => tree
                .ancestors(id)
                .any(|a| self.matches_at(tree, a, index - 1)),
        }
    }
}

/// Parsed selector list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    source: String,
    alternatives: Vec<Complex>,
}

impl Selector {
    /// Parse a selector list
    pub fn parse(source: &str) -> DomResult<Self> {
        let invalid = || DomError::InvalidSelector(source.to_string());

        let alternatives = split_list(source)
            .into_iter()
            .map(|group| Parser::new(group).complex().ok_or_else(invalid))
            .collect::<DomResult<Vec<_>>>()?;

        Ok(Self {
            source: source.to_string(),
            alternatives,
        })
    }

    /// Original selector text
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Check if an element matches any alternative
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        self.alternatives.iter().any(|c| c.matches(tree, id))
    }

    /// All matching descendants of `root`, in document order
    pub fn query_all(&self, tree: &DomTree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&id| self.matches(tree, id))
            .collect()
    }

    /// First matching descendant of `root`
    pub fn query(&self, tree: &DomTree, root: NodeId) -> Option<NodeId> {
        tree.descendants(root)
            .into_iter()
            .find(|&id| self.matches(tree, id))
    }

    /// Closest inclusive ancestor of `id` that matches
    pub fn closest(&self, tree: &DomTree, id: NodeId) -> Option<NodeId> {
        std::iter::once(id)
            .chain(tree.ancestors(id))
            .find(|&a| self.matches(tree, a))
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split a selector list at commas outside brackets and quotes
fn split_list(source: &str) -> Vec<&str> {
    let mut groups = Vec::new();
    let mut quote = None;
    let mut depth = 0usize;
    let mut start = 0;

    for (i, c) in source.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => depth = depth.saturating_sub(1),
            (None, ',') if depth == 0 => {
                groups.push(&source[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    groups.push(&source[start..]);
    groups
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace, reporting whether any was consumed
    fn skip_ws(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
        self.pos != start
    }

    fn ident(&mut self) -> Option<String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            self.bump();
        }
        (self.pos != start).then(|| self.input[start..self.pos].to_string())
    }

    fn complex(&mut self) -> Option<Complex> {
        self.skip_ws();
        let head = self.compound()?;
        let mut rest = Vec::new();

        loop {
            let had_ws = self.skip_ws();
            let combinator = match self.peek() {
                None => break,
                Some('>') => {
                    self.bump();
                    self.skip_ws();
                    Combinator::Child
                }
                Some(_) if had_ws => Combinator::Descendant,
                Some(_) => return None,
            };
            rest.push((combinator, self.compound()?));
        }
        Some(Complex { head, rest })
    }

    fn compound(&mut self) -> Option<Compound> {
        let mut parts = Vec::new();
        let mut universal = false;

        match self.peek()? {
            '*' => {
                self.bump();
                universal = true;
            }
            c if c.is_alphabetic() => {
                parts.push(SimpleSelector::Tag(self.ident()?.to_ascii_lowercase()));
            }
            _ => {}
        }

        loop {
            match self.peek() {
                Some('.') => {
                    self.bump();
                    parts.push(SimpleSelector::Class(self.ident()?));
                }
                Some('#') => {
                    self.bump();
                    parts.push(SimpleSelector::Id(self.ident()?));
                }
                Some('[') => {
                    self.bump();
                    parts.push(self.attribute()?);
                }
                _ => break,
            }
        }

        (universal || !parts.is_empty()).then_some(Compound { parts })
    }

    fn attribute(&mut self) -> Option<SimpleSelector> {
        self.skip_ws();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_ws();
        let value = match self.bump()? {
            ']' => return Some(SimpleSelector::Attr { name, value: None }),
            '=' => {
                self.skip_ws();
                self.attribute_value()?
            }
            _ => return None,
        };
        self.skip_ws();
        (self.bump()? == ']').then_some(SimpleSelector::Attr {
            name,
            value: Some(value),
        })
    }

    fn attribute_value(&mut self) -> Option<String> {
        match self.peek()? {
            quote @ ('"' | '\'') => {
                self.bump();
                let start = self.pos;
                while self.peek()? != quote {
                    self.bump();
                }
                let value = self.input[start..self.pos].to_string();
                self.bump();
                Some(value)
            }
            _ => self.ident(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// <div class="js-accordion" dir="rtl">
    ///   <section class="js-accordion__panel" id="p">
    ///     <h2 class="js-accordion__header">T</h2>
    ///   </section>
    ///   <button class="js-accordion__header" type="button"></button>
    /// </div>
    fn fixture() -> (DomTree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.set_attribute(div, "class", "js-accordion").unwrap();
        tree.set_attribute(div, "dir", "rtl").unwrap();
        tree.append_child(tree.root(), div).unwrap();

        let section = tree.create_element("section");
        tree.set_attribute(section, "class", "js-accordion__panel").unwrap();
        tree.set_attribute(section, "id", "p").unwrap();
        tree.append_child(div, section).unwrap();

        let h2 = tree.create_element("h2");
        tree.set_attribute(h2, "class", "js-accordion__header").unwrap();
        tree.append_child(section, h2).unwrap();

        let button = tree.create_element("button");
        tree.set_attribute(button, "class", "js-accordion__header").unwrap();
        tree.set_attribute(button, "type", "button").unwrap();
        tree.append_child(div, button).unwrap();

        (tree, div, section, h2, button)
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Selector::parse("").is_err());
        assert!(Selector::parse(".").is_err());
        assert!(Selector::parse("div,").is_err());
        assert!(Selector::parse("[dir=\"rtl\"").is_err());
        assert!(Selector::parse("a!b").is_err());
    }

    #[test]
    fn test_compound_selectors() {
        let (tree, div, section, h2, button) = fixture();

        let buttons = Selector::parse("button.js-accordion__header").unwrap();
        assert!(buttons.matches(&tree, button));
        assert!(!buttons.matches(&tree, h2));

        let by_id = Selector::parse("section#p").unwrap();
        assert!(by_id.matches(&tree, section));

        let attr = Selector::parse("[dir=\"rtl\"]").unwrap();
        assert!(attr.matches(&tree, div));
        assert!(Selector::parse("[dir]").unwrap().matches(&tree, div));
        assert!(!Selector::parse("[dir=ltr]").unwrap().matches(&tree, div));
        assert!(Selector::parse("*").unwrap().matches(&tree, h2));
    }

    #[test]
    fn test_combinators() {
        let (tree, div, _, h2, button) = fixture();

        let descendant = Selector::parse(".js-accordion .js-accordion__header").unwrap();
        assert_eq!(descendant.query_all(&tree, tree.root()), vec![h2, button]);

        let child = Selector::parse(".js-accordion > .js-accordion__header").unwrap();
        assert_eq!(child.query_all(&tree, tree.root()), vec![button]);
        assert_eq!(child.query(&tree, div), Some(button));
    }

    #[test]
    fn test_selector_list_and_closest() {
        let (tree, div, section, h2, _) = fixture();

        let list = Selector::parse("h2, section").unwrap();
        assert_eq!(list.query_all(&tree, div), vec![section, h2]);

        let rtl = Selector::parse("[dir=\"rtl\"]").unwrap();
        assert_eq!(rtl.closest(&tree, h2), Some(div));
        assert_eq!(rtl.closest(&tree, div), Some(div));
        assert_eq!(Selector::parse("ul").unwrap().closest(&tree, h2), None);
    }

    #[test]
    fn test_list_commas_inside_values() {
        let mut tree = DomTree::new();
        let div = tree.create_element("div");
        tree.append_child(tree.root(), div).unwrap();
        tree.set_attribute(div, "data-keys", "a,b").unwrap();
        let p = tree.create_element("p");
        tree.append_child(div, p).unwrap();

        let quoted = Selector::parse("[data-keys=\"a,b\"]").unwrap();
        assert_eq!(quoted.query_all(&tree, tree.root()), vec![div]);

        let list = Selector::parse("[data-keys='a,b'], p").unwrap();
        assert_eq!(list.query_all(&tree, tree.root()), vec![div, p]);

        assert_eq!(split_list("a, [x=\",\"], b"), vec!["a", " [x=\",\"]", " b"]);
        assert!(Selector::parse("h2,").is_err());
    }
}
