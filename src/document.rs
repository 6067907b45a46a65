use log::{debug, trace};

use crate::component::{Component, Registry};
use crate::dom::Element;
use crate::error::DocumentError;

struct Mounted {
    host_id: String,
    component: Box<dyn Component>
}

/// A document tree with custom elements brought to life.
///
/// The document owns the tree, the component registry, and one
/// component instance per connected host element. All interaction
/// with the tree after [Document::connect] goes through the document
/// so components hear about it.
pub struct Document {
    root: Element,
    registry: Registry,
    mounted: Vec<Mounted>
}

impl Document {
    /// Create a document. Nothing is connected until
    /// [Document::connect] is called.
    pub fn new(root: Element, registry: Registry) -> Document {
        Document {
            root,
            registry,
            mounted: Vec::new()
        }
    }

    /// The root of the tree.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Find an element anywhere in the document.
    pub fn find(&self, id: &str) -> Option<&Element> {
        self.root.find(id)
    }

    /// Does the element with this id have a component?
    pub fn is_mounted(&self, id: &str) -> bool {
        self.mounted.iter().any(|m| m.host_id == id)
    }

    /// Create and connect a component for every element whose tag is
    /// defined in the registry and which has none yet, in document
    /// order. Returns how many were connected.
    pub fn connect(&mut self) -> usize {
        let pending: Vec<(String, String)> = std::iter::once(&self.root)
            .chain(self.root.descendants())
            .filter(|e| self.registry.is_defined(&e.tag) && !self.is_mounted(&e.id))
            .map(|e| (e.id.clone(), e.tag.clone()))
            .collect();

        let mut connected = 0;
        for (id, tag) in pending {
            let Some(mut component) = self.registry.create(&tag) else {
                continue;
            };
            // An earlier component may have changed the tree.
            let Some(host) = self.root.find_mut(&id) else {
                continue;
            };

            debug!("connecting <{tag}> {id}");
            component.connected(host);
            self.mounted.push(Mounted { host_id: id, component });
            connected += 1;
        }
        connected
    }

    /// Click an element.
    ///
    /// The element's click handler goes to the innermost component
    /// whose host contains it. Returns whether anything handled the
    /// click.
    pub fn click(&mut self, id: &str) -> Result<bool, DocumentError> {
        let target = self.root.find(id).ok_or_else(|| DocumentError::UnknownElement(id.into()))?;
        let Some(action) = target.click_handler().map(str::to_string) else {
            trace!("click on {id} has no handler");
            return Ok(false);
        };
        let Some(owner) = self.owner_of(id) else {
            debug!("click on {id} ({action}) is outside every component");
            return Ok(false);
        };

        trace!("dispatching {action} from {id}");
        self.with_host(owner, |c, host| c.handle_action(host, &action));
        Ok(true)
    }

    /// Set an attribute on an element, notifying its component if it
    /// is a host observing that attribute.
    pub fn set_attribute(&mut self, id: &str, name: &str, value: impl Into<String>) -> Result<(), DocumentError> {
        let e = self.root.find_mut(id).ok_or_else(|| DocumentError::UnknownElement(id.into()))?;
        e.set_attribute(name, value);
        self.attribute_changed(id, &name.to_ascii_lowercase());
        Ok(())
    }

    /// Remove an attribute from an element, notifying its component if
    /// the attribute was present and is observed.
    pub fn remove_attribute(&mut self, id: &str, name: &str) -> Result<(), DocumentError> {
        let e = self.root.find_mut(id).ok_or_else(|| DocumentError::UnknownElement(id.into()))?;
        if e.remove_attribute(name).is_some() {
            self.attribute_changed(id, &name.to_ascii_lowercase());
        }
        Ok(())
    }

    fn attribute_changed(&mut self, id: &str, name: &str) {
        let Some(i) = self.mounted.iter().position(|m| m.host_id == id) else {
            return;
        };
        if !self.mounted[i].component.observed_attributes().contains(&name) {
            return;
        }

        trace!("{id}: attribute {name} changed");
        self.with_host(i, |c, host| c.attribute_changed(host, name));
    }

    /// Index of the innermost mounted component containing the element.
    fn owner_of(&self, id: &str) -> Option<usize> {
        let mut owner: Option<(usize, &Element)> = None;
        for (i, m) in self.mounted.iter().enumerate() {
            let Some(host) = self.root.find(&m.host_id) else {
                continue;
            };
            if !host.contains(id) {
                continue;
            }
            // Hosts containing the same element are nested, so a host
            // inside the current owner is closer to the element.
            if owner.map_or(true, |(_, o)| o.contains(&host.id)) {
                owner = Some((i, host));
            }
        }
        owner.map(|(i, _)| i)
    }

    fn with_host<F: FnOnce(&mut dyn Component, &mut Element)>(&mut self, i: usize, f: F) {
        let m = &mut self.mounted[i];
        if let Some(host) = self.root.find_mut(&m.host_id) {
            f(m.component.as_mut(), host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every callback it receives.
    struct Recorder {
        name: &'static str,
        log: Log
    }

    impl Component for Recorder {
        fn observed_attributes(&self) -> &'static [&'static str] {
            &["watched"]
        }

        fn connected(&mut self, host: &mut Element) {
            self.log.borrow_mut().push(format!("{}: connected {}", self.name, host.id));
        }

        fn attribute_changed(&mut self, host: &mut Element, name: &str) {
            let value = host.get_attribute(name).unwrap_or("<none>").to_string();
            self.log.borrow_mut().push(format!("{}: {name}={value}", self.name));
        }

        fn handle_action(&mut self, host: &mut Element, action: &str) {
            self.log.borrow_mut().push(format!("{}: {action}", self.name));
            host.append_child(Element::new("p").with_text(action));
        }
    }

    fn registry(log: &Log) -> Registry {
        let mut r = Registry::new();
        for name in ["x-outer", "x-inner"] {
            let log = log.clone();
            r.define(name, Box::new(move || Box::new(Recorder { name, log: log.clone() }) as Box<dyn Component>)).unwrap();
        }
        r
    }

    fn tree() -> Element {
        Element::new("body").with_id("body")
            .child(Element::new("x-outer").with_id("outer")
                .child(Element::new("button").with_id("b1").on_click("one"))
                .child(Element::new("x-inner").with_id("inner")
                    .child(Element::new("button").with_id("b2").on_click("two"))))
            .child(Element::new("button").with_id("b3").on_click("three"))
            .child(Element::new("span").with_id("plain"))
    }

    /// Tests that defined elements are connected once, in document order.
    #[test]
    fn test_connect() {
        let log = Log::default();
        let mut d = Document::new(tree(), registry(&log));

        assert_eq!(2, d.connect());
        assert_eq!(0, d.connect());
        assert!(d.is_mounted("outer"));
        assert!(d.is_mounted("inner"));
        assert!(!d.is_mounted("plain"));
        assert_eq!(vec!["x-outer: connected outer", "x-inner: connected inner"], *log.borrow());
    }

    /// Tests that clicks go to the innermost component.
    #[test]
    fn test_click_dispatch() {
        let log = Log::default();
        let mut d = Document::new(tree(), registry(&log));
        d.connect();
        log.borrow_mut().clear();

        assert_eq!(Ok(true), d.click("b1"));
        assert_eq!(Ok(true), d.click("b2"));
        assert_eq!(Ok(false), d.click("b3"));
        assert_eq!(Ok(false), d.click("plain"));
        assert_eq!(Err(DocumentError::UnknownElement("nope".into())), d.click("nope"));

        assert_eq!(vec!["x-outer: one", "x-inner: two"], *log.borrow());
        assert_eq!("one", d.find("outer").unwrap().children.last().unwrap().text_content());
        assert_eq!("two", d.find("inner").unwrap().children.last().unwrap().text_content());
    }

    /// Tests that only observed attributes on hosts are reported.
    #[test]
    fn test_attribute_changes() {
        let log = Log::default();
        let mut d = Document::new(tree(), registry(&log));
        d.connect();
        log.borrow_mut().clear();

        d.set_attribute("outer", "watched", "1").unwrap();
        d.set_attribute("outer", "ignored", "1").unwrap();
        d.set_attribute("b1", "watched", "1").unwrap();
        d.remove_attribute("inner", "watched").unwrap();
        d.set_attribute("inner", "WATCHED", "2").unwrap();
        d.remove_attribute("inner", "watched").unwrap();

        assert_eq!(vec!["x-outer: watched=1", "x-inner: watched=2", "x-inner: watched=<none>"], *log.borrow());
        assert_eq!(Err(DocumentError::UnknownElement("nope".into())), d.set_attribute("nope", "watched", ""));
    }

    /// Tests that removing an attribute matches its name in any case
    /// and reports the lowercase name.
    #[test]
    fn test_remove_attribute_case() {
        let log = Log::default();
        let mut d = Document::new(tree(), registry(&log));
        d.connect();
        d.set_attribute("inner", "WATCHED", "1").unwrap();
        log.borrow_mut().clear();

        d.remove_attribute("inner", "Watched").unwrap();

        assert!(!d.find("inner").unwrap().has_attribute("watched"));
        assert_eq!(vec!["x-inner: watched=<none>"], *log.borrow());
    }
}
