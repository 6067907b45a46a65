use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

const CLICK_HANDLER: &str = "on-click";

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

fn generate_id(prefix: &str) -> String {
    let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
    format!("{prefix}-{id}")
}

/// How an element takes part in layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Display {
    /// The element's natural display mode.
    #[default]
    Default,
    /// The element is not displayed at all.
    None,
    /// The element lays its children out in a row.
    Flex
}

/// Inline style of an element.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Style {
    /// Display mode.
    pub display: Display,
    /// Gap between flex children, in pixels.
    pub gap: u16
}

/// A node in the host document tree.
///
/// Elements own their children. Other parts of the system refer to
/// an element through its `id`, which is unique for the lifetime of
/// the process.
///
/// # Examples
///
/// ```
/// use table_roller::dom::Element;
///
/// let table = Element::new("table")
///     .child(Element::new("tr")
///         .child(Element::new("td").with_text("1"))
///         .child(Element::new("td").with_text("Goblin")));
///
/// assert_eq!(1, table.query_tag("tr").len());
/// assert_eq!("1Goblin", table.text_content());
/// ```
#[derive(Clone, Debug)]
pub struct Element {
    /// Unique identifier.
    pub id: String,
    /// Tag name, always lowercase.
    pub tag: String,
    /// Markup attributes. An attribute present with an empty value
    /// is a boolean attribute set to true.
    pub attributes: BTreeMap<String, String>,
    /// Inline style.
    pub style: Style,
    /// Text preceding the children.
    pub text: Option<String>,
    /// Child elements, in document order.
    pub children: Vec<Element>,
    // Component-private markers (click handlers, roles). Not markup.
    data: HashMap<String, String>
}

impl Element {
    /// Create an empty element with the given tag.
    pub fn new(tag: &str) -> Element {
        let tag = tag.to_ascii_lowercase();
        Element {
            id: generate_id(&tag),
            tag,
            attributes: BTreeMap::new(),
            style: Style::default(),
            text: None,
            children: Vec::new(),
            data: HashMap::new()
        }
    }

    /// Replace the generated id.
    pub fn with_id(mut self, id: impl Into<String>) -> Element {
        self.id = id.into();
        self
    }

    /// Set an attribute.
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Element {
        self.set_attribute(name, value);
        self
    }

    /// Set a boolean attribute.
    pub fn flag(self, name: &str) -> Element {
        self.attr(name, "")
    }

    /// Set the element's own text.
    pub fn with_text(mut self, text: impl Into<String>) -> Element {
        self.text = Some(text.into());
        self
    }

    /// Append a child.
    pub fn child(mut self, child: Element) -> Element {
        self.children.push(child);
        self
    }

    /// Append several children.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Element {
        self.children.extend(children);
        self
    }

    /// Get an attribute value. Attribute names are ASCII case
    /// insensitive here and in the other attribute methods.
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Is the attribute present, whatever its value?
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_ascii_lowercase())
    }

    /// Set an attribute, replacing any previous value.
    pub fn set_attribute(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Remove an attribute, returning its old value.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(&name.to_ascii_lowercase())
    }

    /// Make this element dispatch `action` to its component when
    /// clicked.
    pub fn on_click(mut self, action: &str) -> Element {
        self.set_data(CLICK_HANDLER, action);
        self
    }

    /// The action this element dispatches when clicked.
    pub fn click_handler(&self) -> Option<&str> {
        self.data(CLICK_HANDLER)
    }

    pub(crate) fn data(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }

    pub(crate) fn set_data(&mut self, key: &str, value: impl Into<String>) {
        self.data.insert(key.to_string(), value.into());
    }

    /// Is this element displayed?
    pub fn is_displayed(&self) -> bool {
        self.style.display != Display::None
    }

    /// All descendants in pre-order, not including this element.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(e) = stack.pop() {
            out.push(e);
            stack.extend(e.children.iter().rev());
        }
        out
    }

    /// All descendants with the given tag, in document order.
    pub fn query_tag(&self, tag: &str) -> Vec<&Element> {
        self.descendants()
            .into_iter()
            .filter(|e| e.tag.eq_ignore_ascii_case(tag))
            .collect()
    }

    /// Find the first element in this subtree (including this element)
    /// matching the predicate.
    pub fn find_where<F: Fn(&Element) -> bool>(&self, pred: F) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        self.descendants().into_iter().find(|e| pred(*e))
    }

    /// Find an element by id in this subtree, including this element.
    pub fn find(&self, id: &str) -> Option<&Element> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    /// Mutable version of [Element::find].
    pub fn find_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Does this subtree contain an element with the given id?
    pub fn contains(&self, id: &str) -> bool {
        self.find(id).is_some()
    }

    /// Append a child to this element.
    pub fn append_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// The parent of the element with the given id, and that
    /// element's index among its siblings.
    fn parent_of_mut(&mut self, id: &str) -> Option<(&mut Element, usize)> {
        if let Some(i) = self.children.iter().position(|c| c.id == id) {
            return Some((self, i));
        }
        self.children.iter_mut().find_map(|c| c.parent_of_mut(id))
    }

    /// Insert `element` as the next sibling of the element with id
    /// `reference_id`, wherever that is in this subtree.
    ///
    /// Returns false, dropping `element`, if no descendant has that id.
    pub fn insert_after(&mut self, reference_id: &str, element: Element) -> bool {
        let Some((parent, i)) = self.parent_of_mut(reference_id) else {
            return false;
        };
        parent.children.insert(i + 1, element);
        true
    }

    /// Remove all content (text and children) from this element.
    pub fn clear_content(&mut self) {
        self.text = None;
        self.children.clear();
    }

    /// The concatenated text of this element and its descendants.
    pub fn text_content(&self) -> String {
        let mut s = String::new();
        self.collect_text(&mut s);
        s
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(t) = &self.text {
            out.push_str(t);
        }
        for c in self.children.iter() {
            c.collect_text(out);
        }
    }
}
