// ABOUTME: PackagePage host backed by a dom_query HTML document.
// ABOUTME: Locates packages with CSS matchers, renders fragments, stores metrics as data attributes and reorders siblings.

use std::cell::RefCell;
use std::collections::HashMap;

use dom_query::{Document, NodeId, NodeRef, Selection};
use gigprice_engine::Metric;

use crate::config::{CompiledLocators, Config, FragmentStyle};
use crate::error::ConfigError;
use crate::fragment::{stylesheet_html, Fragment};
use crate::page::PackagePage;

/// Stable handle to a node of an [`HtmlPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

/// A parsed HTML page whose package listings can be annotated.
pub struct HtmlPage {
    doc: Document,
    locators: CompiledLocators,
    fragment: FragmentStyle,
    handles: RefCell<Handles>,
}

/// Node registry; an ElementId is an index into `ids`.
#[derive(Default)]
struct Handles {
    ids: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl Handles {
    fn intern(&mut self, id: NodeId) -> ElementId {
        if let Some(&pos) = self.index.get(&id) {
            return ElementId(pos);
        }
        let pos = self.ids.len();
        self.ids.push(id);
        self.index.insert(id, pos);
        ElementId(pos)
    }

    fn get(&self, element: ElementId) -> Option<NodeId> {
        self.ids.get(element.0).copied()
    }

    fn len(&self) -> usize {
        self.ids.len()
    }
}

impl std::fmt::Debug for HtmlPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlPage")
            .field("locators", &self.locators)
            .field("handles", &self.handles.borrow().len())
            .finish_non_exhaustive()
    }
}

impl HtmlPage {
    /// Parses `html` and compiles the locators of `config`.
    pub fn parse(html: &str, config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            doc: Document::from(html),
            locators: CompiledLocators::compile(&config.locators, &config.fragment)?,
            fragment: config.fragment.clone(),
            handles: RefCell::new(Handles::default()),
        })
    }

    /// Serializes the current document.
    pub fn html(&self) -> String {
        self.doc.html().to_string()
    }

    /// Appends `html` to the first element matching `parent_css` and returns
    /// handles to the top-level nodes that were inserted.
    ///
    /// This is how a harness simulates content loaded after the first scan;
    /// the returned handles are what an insertion observer would report.
    pub fn insert_html(&mut self, parent_css: &str, html: &str) -> Result<Vec<ElementId>, ConfigError> {
        let matcher = dom_query::Matcher::new(parent_css)
            .map_err(|_| ConfigError::invalid_selector("parent", parent_css))?;
        let parent = self.doc.select_matcher(&matcher).first();
        if !parent.exists() {
            return Ok(Vec::new());
        }

        let before: Vec<NodeId> = parent.children().nodes().iter().map(|n| n.id).collect();
        parent.append_html(html);
        let inserted: Vec<NodeId> = parent
            .children()
            .nodes()
            .iter()
            .map(|n| n.id)
            .filter(|id| !before.contains(id))
            .collect();

        Ok(inserted.into_iter().map(|id| self.handle(id)).collect())
    }

    /// Text of the first element matching `matcher` inside the package.
    fn field_text(&self, element: ElementId, matcher: &dom_query::Matcher) -> Option<String> {
        let sel = self.selection(element)?;
        let field = sel.select_matcher(matcher).first();
        if !field.exists() {
            return None;
        }
        Some(normalize_whitespace(&field.text()))
    }

    fn handle(&self, id: NodeId) -> ElementId {
        self.handles.borrow_mut().intern(id)
    }

    fn node(&self, element: ElementId) -> Option<NodeRef<'_>> {
        let id = self.handles.borrow().get(element)?;
        self.doc.tree.get(&id)
    }

    fn selection(&self, element: ElementId) -> Option<Selection<'_>> {
        self.node(element).map(Selection::from)
    }

    fn ensure_stylesheet(&self) {
        if !self.fragment.inject_style {
            return;
        }
        if self.doc.select_matcher(&self.locators.style).exists() {
            return;
        }
        let head = self.doc.select_matcher(&self.locators.head).first();
        if head.exists() {
            head.append_html(stylesheet_html(&self.fragment));
        }
    }
}

impl PackagePage for HtmlPage {
    type Element = ElementId;

    fn packages(&self) -> Vec<ElementId> {
        let ids: Vec<NodeId> = self
            .doc
            .select_matcher(&self.locators.container)
            .nodes()
            .iter()
            .map(|n| n.id)
            .collect();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    fn packages_within(&self, root: ElementId) -> Vec<ElementId> {
        let Some(sel) = self.selection(root) else {
            return Vec::new();
        };
        let root_id = sel.nodes().first().map(|n| n.id);

        let is_package = self
            .doc
            .select_matcher(&self.locators.container)
            .nodes()
            .iter()
            .any(|n| Some(n.id) == root_id);
        if is_package {
            return vec![root];
        }

        let ids: Vec<NodeId> = sel
            .select_matcher(&self.locators.container)
            .nodes()
            .iter()
            .map(|n| n.id)
            .collect();
        ids.into_iter().map(|id| self.handle(id)).collect()
    }

    fn parent(&self, element: ElementId) -> Option<ElementId> {
        let parent = self.node(element)?.parent()?;
        Some(self.handle(parent.id))
    }

    fn price_text(&self, element: ElementId) -> Option<String> {
        self.field_text(element, &self.locators.price)
    }

    fn size_text(&self, element: ElementId) -> Option<String> {
        self.field_text(element, &self.locators.size)
    }

    fn has_fragment(&self, element: ElementId) -> bool {
        self.selection(element)
            .is_some_and(|sel| sel.select_matcher(&self.locators.fragment).exists())
    }

    fn stored_metric(&self, element: ElementId) -> Option<Metric> {
        let value = self.selection(element)?.attr(&self.fragment.metric_attr)?;
        value.trim().parse::<f64>().ok().and_then(Metric::new)
    }

    fn augment(&mut self, element: ElementId, fragment: &Fragment) {
        let Some(package) = self.selection(element) else {
            return;
        };

        package.set_attr(&self.fragment.metric_attr, &fragment.metric.value().to_string());

        // Inside the inner template before the buy button, else at the end of
        // the template, else at the end of the package itself
        let html = fragment.to_html();
        let template = package.select_matcher(&self.locators.template).first();
        if template.exists() {
            let button = template.select_matcher(&self.locators.insert_before).first();
            if button.exists() {
                button.before_html(html);
            } else {
                template.append_html(html);
            }
        } else {
            package.append_html(html);
        }

        self.ensure_stylesheet();
    }

    fn reorder(&mut self, ordered: &[ElementId]) {
        let Some(parent) = ordered.first().and_then(|&el| self.node(el)?.parent()) else {
            return;
        };
        let parent = Selection::from(parent);
        for &element in ordered {
            if let Some(child) = self.selection(element) {
                parent.append_selection(&child);
            }
        }
    }
}

/// Collapses runs of whitespace into single spaces.
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
