use std::collections::HashSet;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::element::Element;
use crate::outcome::Outcome;
use crate::template::{Template, TemplateRef, RECURSION_MARKER};

/// A template built on first use, which is what makes self-referential schemas possible.
///
/// The supplier runs at most once even under concurrent first use. Recursive schemas are
/// usually declared as a `static` whose definition refers back to itself through [`lazy`]:
///
/// ```
/// use john::template::{lazy, record, Template, TemplateRef, STRING};
/// use once_cell::sync::Lazy;
///
/// struct Node {
///     label: String,
///     children: Vec<Node>,
/// }
///
/// static NODE: Lazy<TemplateRef<Node>> = Lazy::new(|| {
///     record(
///         (
///             STRING.property("label", |n: &Node| n.label.clone()),
///             lazy(|| NODE.clone())
///                 .array()
///                 .property("children", |n: &Node| n.children.iter().map(clone_node).collect())
///                 .or_else_with(Vec::new),
///         ),
///         |(label, children)| Node { label, children },
///     )
///     .boxed()
/// });
///
/// fn clone_node(node: &Node) -> Node {
///     Node {
///         label: node.label.clone(),
///         children: node.children.iter().map(clone_node).collect(),
///     }
/// }
///
/// assert!(NODE.name().contains("..."));
/// ```
pub struct LazyTemplate<T> {
    cell: OnceCell<TemplateRef<T>>,
    supplier: Box<dyn Fn() -> TemplateRef<T> + Send + Sync>,
}

pub fn lazy<T>(supplier: impl Fn() -> TemplateRef<T> + Send + Sync + 'static) -> LazyTemplate<T> {
    LazyTemplate {
        cell: OnceCell::new(),
        supplier: Box::new(supplier),
    }
}

impl<T> LazyTemplate<T> {
    fn get(&self) -> &TemplateRef<T> {
        self.cell.get_or_init(|| (self.supplier)())
    }
}

impl<T> Template for LazyTemplate<T> {
    type Value = T;

    fn parse(&self, element: &Element) -> Outcome<T> {
        self.get().parse(element)
    }

    fn serialize(&self, value: &T) -> Outcome<Element> {
        self.get().serialize(value)
    }

    /// Identifies the resolved template by the address of its shared allocation. Records register
    /// their own address too, so a record reached again through here renders the marker.
    fn describe(&self, encountered: &mut HashSet<usize>) -> String {
        let template = self.get();
        let identity = Arc::as_ptr(template) as *const () as usize;
        if !encountered.insert(identity) {
            return RECURSION_MARKER.to_owned();
        }
        let name = template.describe(encountered);
        encountered.remove(&identity);
        name
    }
}
