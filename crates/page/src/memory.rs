// ABOUTME: In-memory PackagePage host with synthetic packages grouped under parent nodes.
// ABOUTME: Lets harnesses and tests drive the annotator without parsing HTML.

use gigprice_engine::Metric;

use crate::fragment::Fragment;
use crate::page::PackagePage;

/// A synthetic package: optional price and size text plus what was rendered into it.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    price: Option<String>,
    size: Option<String>,
    stored_metric: Option<Metric>,
    foreign_fragment: bool,
    fragments: Vec<Fragment>,
}

impl MemoryPackage {
    pub fn new(price: impl Into<String>, size: impl Into<String>) -> Self {
        Self {
            price: Some(price.into()),
            size: Some(size.into()),
            ..Default::default()
        }
    }

    /// Drops the price element.
    pub fn without_price(mut self) -> Self {
        self.price = None;
        self
    }

    /// Drops the size element.
    pub fn without_size(mut self) -> Self {
        self.size = None;
        self
    }

    /// Marks the package as carrying a metric from an earlier pass.
    pub fn with_stored_metric(mut self, value: f64) -> Self {
        self.stored_metric = Metric::new(value);
        self
    }

    /// Marks the package as already showing a fragment rendered by someone else.
    pub fn with_foreign_fragment(mut self) -> Self {
        self.foreign_fragment = true;
        self
    }
}

#[derive(Debug, Clone)]
enum Node {
    Group {
        parent: Option<usize>,
        children: Vec<usize>,
    },
    Package {
        parent: usize,
        package: MemoryPackage,
    },
}

/// A tree of groups and packages addressed by index. Index 0 is the root group.
#[derive(Debug, Clone)]
pub struct MemoryPage {
    nodes: Vec<Node>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub const ROOT: usize = 0;

    pub fn new() -> Self {
        Self {
            nodes: vec![Node::Group {
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Adds a package under the root group.
    pub fn add(&mut self, package: MemoryPackage) -> usize {
        self.add_to(Self::ROOT, package)
    }

    /// Adds an empty group under `parent`.
    pub fn add_group(&mut self, parent: usize) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Group {
            parent: Some(parent),
            children: Vec::new(),
        });
        self.push_child(parent, id);
        id
    }

    /// Adds a package under `parent`, which must be a group.
    pub fn add_to(&mut self, parent: usize, package: MemoryPackage) -> usize {
        let id = self.nodes.len();
        self.nodes.push(Node::Package { parent, package });
        self.push_child(parent, id);
        id
    }

    /// Replaces the price text of a package.
    pub fn set_price(&mut self, id: usize, price: impl Into<String>) {
        if let Some(package) = self.package_mut(id) {
            package.price = Some(price.into());
        }
    }

    /// Fragments rendered into a package so far.
    pub fn fragments(&self, id: usize) -> &[Fragment] {
        match self.package(id) {
            Some(package) => &package.fragments,
            None => &[],
        }
    }

    fn push_child(&mut self, parent: usize, child: usize) {
        if let Some(Node::Group { children, .. }) = self.nodes.get_mut(parent) {
            children.push(child);
        }
    }

    fn package(&self, id: usize) -> Option<&MemoryPackage> {
        match self.nodes.get(id) {
            Some(Node::Package { package, .. }) => Some(package),
            _ => None,
        }
    }

    fn package_mut(&mut self, id: usize) -> Option<&mut MemoryPackage> {
        match self.nodes.get_mut(id) {
            Some(Node::Package { package, .. }) => Some(package),
            _ => None,
        }
    }

    fn collect_packages(&self, id: usize, out: &mut Vec<usize>) {
        match self.nodes.get(id) {
            Some(Node::Package { .. }) => out.push(id),
            Some(Node::Group { children, .. }) => {
                for &child in children {
                    self.collect_packages(child, out);
                }
            }
            None => {}
        }
    }
}

impl PackagePage for MemoryPage {
    type Element = usize;

    fn packages(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_packages(Self::ROOT, &mut out);
        out
    }

    fn packages_within(&self, root: usize) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_packages(root, &mut out);
        out
    }

    fn parent(&self, element: usize) -> Option<usize> {
        match self.nodes.get(element)? {
            Node::Group { parent, .. } => *parent,
            Node::Package { parent, .. } => Some(*parent),
        }
    }

    fn price_text(&self, element: usize) -> Option<String> {
        self.package(element)?.price.clone()
    }

    fn size_text(&self, element: usize) -> Option<String> {
        self.package(element)?.size.clone()
    }

    fn has_fragment(&self, element: usize) -> bool {
        self.package(element)
            .is_some_and(|p| p.foreign_fragment || !p.fragments.is_empty())
    }

    fn stored_metric(&self, element: usize) -> Option<Metric> {
        self.package(element)?.stored_metric
    }

    fn augment(&mut self, element: usize, fragment: &Fragment) {
        if let Some(package) = self.package_mut(element) {
            package.stored_metric = Some(fragment.metric);
            package.fragments.push(fragment.clone());
        }
    }

    fn reorder(&mut self, ordered: &[usize]) {
        let Some(parent) = ordered.first().and_then(|&id| self.parent(id)) else {
            return;
        };
        if let Some(Node::Group { children, .. }) = self.nodes.get_mut(parent) {
            children.retain(|c| !ordered.contains(c));
            children.extend(ordered.iter().copied());
        }
    }
}
