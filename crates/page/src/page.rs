// ABOUTME: Host abstraction over a page that lists packages.
// ABOUTME: Implemented by the HTML document host and the in-memory host used in tests and harnesses.

use std::fmt::Debug;
use std::hash::Hash;

use gigprice_engine::Metric;

use crate::fragment::Fragment;

/// A page holding package elements the annotator can read and augment.
///
/// Element handles are cheap identifiers. They must stay valid for the life
/// of the page, including after elements are moved by [`PackagePage::reorder`].
pub trait PackagePage {
    type Element: Copy + Eq + Hash + Debug;

    /// Every package currently on the page, in document order.
    fn packages(&self) -> Vec<Self::Element>;

    /// Packages at or under a newly inserted node: the node itself when it is
    /// a package, otherwise every package inside it.
    fn packages_within(&self, root: Self::Element) -> Vec<Self::Element>;

    /// Parent node of an element, used to group siblings for sorting.
    fn parent(&self, element: Self::Element) -> Option<Self::Element>;

    /// Price text of a package, `None` when the price element is missing.
    fn price_text(&self, element: Self::Element) -> Option<String>;

    /// Size text of a package, `None` when the size element is missing.
    fn size_text(&self, element: Self::Element) -> Option<String>;

    /// True when the package already shows a rendered fragment.
    fn has_fragment(&self, element: Self::Element) -> bool;

    /// Metric previously attached to the element itself, if the page stores one.
    fn stored_metric(&self, _element: Self::Element) -> Option<Metric> {
        None
    }

    /// Attaches the raw metric to the element and renders `fragment` into it.
    fn augment(&mut self, element: Self::Element, fragment: &Fragment);

    /// Moves `ordered` so they appear in that order under their common parent.
    fn reorder(&mut self, ordered: &[Self::Element]);
}
