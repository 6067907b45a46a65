use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::component::{Component, Factory, Registry};
use crate::config::{RollerConfig, CLEAR_LABEL, OBSERVED_ATTRIBUTES, ROLL_LABEL};
use crate::dom::{Display, Element};
use crate::error::{RegistryError, SetupError};
use crate::roll::random_across;
use crate::table::DomTable;

/// Custom element name of the table roller.
pub const TAG: &str = "table-roller";
/// Click handler of the roll button.
pub const ROLL_ACTION: &str = "roll";
/// Click handler of the clear button.
pub const CLEAR_ACTION: &str = "clear";

const OUTPUT_ROLE: &str = "output";

/// Ids of the nodes a bound roller works with.
#[derive(Debug)]
struct Bound {
    table: String,
    roll_button: String,
    clear_button: String,
    output: String
}

/// Adds roll and clear buttons below the table it wraps.
///
/// Rolling picks a random row for each column of the table,
/// independently, and appends the concatenated cell text to an output
/// pane below the buttons. Clearing empties the pane.
///
/// The roller is configured through its host's attributes (see
/// [crate::config]), which are read afresh on every action.
pub struct TableRoller<R: Rng = StdRng> {
    bound: Option<Bound>,
    counter: usize,
    rng: R
}

impl TableRoller<StdRng> {
    /// Create a roller seeded from the operating system.
    pub fn new() -> TableRoller<StdRng> {
        TableRoller::with_rng(StdRng::from_os_rng())
    }
}

impl Default for TableRoller<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> TableRoller<R> {
    /// Create a roller drawing from the given random number generator.
    pub fn with_rng(rng: R) -> TableRoller<R> {
        TableRoller {
            bound: None,
            counter: 1,
            rng
        }
    }

    /// Has the roller found its table and built its controls?
    pub fn is_ready(&self) -> bool {
        self.bound.is_some()
    }

    /// Number the next output line will get.
    pub fn counter(&self) -> usize {
        self.counter
    }

    /// Find the table below `host` and add the controls after it.
    ///
    /// Exactly one table must be present. An already bound roller is
    /// left as it is.
    pub fn attach(&mut self, host: &mut Element) -> Result<(), SetupError> {
        if self.bound.is_some() {
            debug!("{} is already bound", host.id);
            return Ok(());
        }

        let table_id = match host.query_tag("table").as_slice() {
            [] => return Err(SetupError::NoTable),
            [table] => table.id.clone(),
            tables => return Err(SetupError::MultipleTables(tables.len()))
        };

        let config = RollerConfig::from_element(host);
        let roll_button = action_button(&config.roll_label, ROLL_ACTION, false);
        let clear_button = action_button(&config.clear_label, CLEAR_ACTION, true);
        let mut output = Element::new("div");
        output.set_data("role", OUTPUT_ROLE);

        let mut toolbar = Element::new("div");
        toolbar.style.display = Display::Flex;
        toolbar.style.gap = 5;

        let bound = Bound {
            table: table_id,
            roll_button: roll_button.id.clone(),
            clear_button: clear_button.id.clone(),
            output: output.id.clone()
        };
        let toolbar_id = toolbar.id.clone();
        let toolbar = toolbar.child(roll_button).child(clear_button);

        host.insert_after(&bound.table, toolbar);
        host.insert_after(&toolbar_id, output);

        info!("{} bound to table {}", host.id, bound.table);
        self.bound = Some(bound);
        self.counter = 1;
        Ok(())
    }

    /// Roll once across the bound table.
    ///
    /// Returns the empty string if the roller is not bound.
    pub fn random_across(&mut self, host: &Element) -> String {
        let Some(table) = self.bound.as_ref().and_then(|b| host.find(&b.table)) else {
            return String::new();
        };
        let config = RollerConfig::from_element(host);
        random_across(&DomTable::new(table), &config, &mut self.rng)
    }

    /// Roll, append the result to the output pane, and show the clear
    /// button. Returns the appended line.
    pub fn roll(&mut self, host: &mut Element) -> Option<String> {
        let (output, clear) = match &self.bound {
            Some(b) => (b.output.clone(), b.clear_button.clone()),
            None => return None
        };

        let config = RollerConfig::from_element(host);
        let s = self.random_across(host);
        let line = self.format_line(&s, &config);
        debug!("{} rolled {line:?}", host.id);

        host.find_mut(&output)?.append_child(Element::new("div").with_text(line.as_str()));
        if let Some(b) = host.find_mut(&clear) {
            b.style.display = Display::Default;
        }
        Some(line)
    }

    /// Empty the output pane, hide the clear button and restart the
    /// numbering.
    pub fn clear(&mut self, host: &mut Element) {
        let Some(b) = &self.bound else {
            return;
        };

        if let Some(output) = host.find_mut(&b.output) {
            output.clear_content();
        }
        if let Some(clear) = host.find_mut(&b.clear_button) {
            clear.style.display = Display::None;
        }
        self.counter = 1;
        debug!("{} cleared", host.id);
    }

    fn format_line(&mut self, s: &str, config: &RollerConfig) -> String {
        if config.output_dice_column {
            let line = format!("{}. {s}", self.counter);
            self.counter += 1;
            line
        }
        else {
            s.to_string()
        }
    }

    /// Is the clear button showing?
    pub fn clear_visible(&self, host: &Element) -> bool {
        self.bound
            .as_ref()
            .and_then(|b| host.find(&b.clear_button))
            .is_some_and(Element::is_displayed)
    }

    /// Text of each line in the output pane, oldest first.
    pub fn output_lines(&self, host: &Element) -> Vec<String> {
        self.bound
            .as_ref()
            .and_then(|b| host.find(&b.output))
            .map(|o| o.children.iter().map(Element::text_content).collect())
            .unwrap_or_default()
    }
}

impl<R: Rng> Component for TableRoller<R> {
    fn observed_attributes(&self) -> &'static [&'static str] {
        OBSERVED_ATTRIBUTES
    }

    fn connected(&mut self, host: &mut Element) {
        if let Err(e) = self.attach(host) {
            warn!("{}: {e}", host.id);
        }
    }

    fn attribute_changed(&mut self, host: &mut Element, name: &str) {
        let Some(b) = &self.bound else {
            return;
        };
        let config = RollerConfig::from_element(host);
        match name {
            ROLL_LABEL => relabel(host, &b.roll_button, &config.roll_label),
            CLEAR_LABEL => relabel(host, &b.clear_button, &config.clear_label),
            _ => {}
        }
    }

    fn handle_action(&mut self, host: &mut Element, action: &str) {
        match action {
            ROLL_ACTION => {
                self.roll(host);
            }
            CLEAR_ACTION => self.clear(host),
            _ => debug!("{}: unknown action {action:?}", host.id)
        }
    }
}

fn relabel(host: &mut Element, button: &str, label: &str) {
    if let Some(b) = host.find_mut(button) {
        b.text = Some(label.to_string());
        b.set_attribute("data-action", label);
    }
}

fn action_button(label: &str, action: &str, hidden: bool) -> Element {
    let mut b = Element::new("button")
        .attr("data-action", label)
        .with_text(label)
        .on_click(action);
    if hidden {
        b.style.display = Display::None;
    }
    b
}

/// Define the `table-roller` element, each instance seeded from the
/// operating system.
pub fn register(registry: &mut Registry) -> Result<(), RegistryError> {
    register_with(registry, Box::new(|| Box::new(TableRoller::new()) as Box<dyn Component>))
}

/// Define the `table-roller` element with a custom factory, e.g. one
/// handing out seeded rollers.
pub fn register_with(registry: &mut Registry, factory: Factory) -> Result<(), RegistryError> {
    registry.define(TAG, factory)
}

/// Find the output pane of a roller inside `root`.
pub fn find_output_pane(root: &Element) -> Option<&Element> {
    root.find_where(|e| e.data("role") == Some(OUTPUT_ROLE))
}
