use crate::dom::LayoutHost;

/// Ancestors of `element` that clip their content, nearest first.
///
/// Not cached: the ancestor chain can change between alignments.
pub fn collect_scrollers<H: LayoutHost>(host: &H, element: &H::Element) -> Vec<H::Element> {
    let mut scrollers = Vec::new();
    let mut current = host.parent_element(element);
    while let Some(ancestor) = current {
        if host.computed_box(&ancestor).clips() {
            scrollers.push(ancestor.clone());
        }
        current = host.parent_element(&ancestor);
    }
    scrollers
}
