use std::collections::HashMap;

use crate::dom::Element;
use crate::error::RegistryError;

/// A custom element: behaviour attached to a host element in a
/// [Document](crate::document::Document).
///
/// Every callback receives the host element, which owns everything
/// the component may look at or change. Callbacks run one at a time.
pub trait Component {
    /// Attributes whose changes are reported through
    /// [Component::attribute_changed].
    fn observed_attributes(&self) -> &'static [&'static str] {
        &[]
    }

    /// The host has been placed in a document.
    fn connected(&mut self, host: &mut Element);

    /// An observed attribute of the host was set or removed.
    fn attribute_changed(&mut self, _host: &mut Element, _name: &str) {}

    /// An element below the host was activated, and its click handler
    /// names `action`.
    fn handle_action(&mut self, host: &mut Element, action: &str);
}

/// Creates a fresh component for each host element.
pub type Factory = Box<dyn Fn() -> Box<dyn Component>>;

/// Maps custom element names to the components that implement them.
#[derive(Default)]
pub struct Registry {
    factories: HashMap<String, Factory>
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Registry {
        Registry { factories: HashMap::new() }
    }

    /// Define the component for a custom element name.
    ///
    /// The name must start with a lowercase ASCII letter, contain a
    /// hyphen, and have no uppercase letters. Each name can be defined
    /// once.
    pub fn define(&mut self, name: &str, factory: Factory) -> Result<(), RegistryError> {
        if !is_valid_name(name) {
            return Err(RegistryError::InvalidName(name.into()));
        }
        if self.factories.contains_key(name) {
            return Err(RegistryError::AlreadyDefined(name.into()));
        }

        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    /// Has a component been defined for this name?
    pub fn is_defined(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Create a new component for the name, if one is defined.
    pub fn create(&self, name: &str) -> Option<Box<dyn Component>> {
        self.factories.get(name).map(|f| f())
    }
}

fn is_valid_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_lowercase())
        && name.contains('-')
        && !name.chars().any(|c| c.is_ascii_uppercase() || c.is_whitespace())
}
