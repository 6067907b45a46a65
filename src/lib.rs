#![deny(missing_docs)]

//! Table roller augments a table of data with controls for rolling on
//! it, as is done with random tables in tabletop games.
//! This includes:
//!
//! * A small document tree for hosting components
//! * A registry of custom elements
//! * The `table-roller` element itself
//!
//! ```
//! use table_roller::component::Registry;
//! use table_roller::document::Document;
//! use table_roller::dom::Element;
//! use table_roller::roller::{self, ROLL_ACTION};
//! use table_roller::table::RollTable;
//!
//! let table = RollTable::parse_markdown("| d2 | Weather |\n|---|---|\n| 1 | Rain |\n| 2 | Rain |").unwrap();
//! let body = Element::new("body").child(Element::new(roller::TAG).child(table.to_element()));
//!
//! let mut registry = Registry::new();
//! roller::register(&mut registry).unwrap();
//! let mut doc = Document::new(body, registry);
//! doc.connect();
//!
//! let roll = doc.root().find_where(|e| e.click_handler() == Some(ROLL_ACTION)).unwrap().id.clone();
//! doc.click(&roll).unwrap();
//!
//! let output = roller::find_output_pane(doc.root()).unwrap();
//! assert_eq!("Rain", output.text_content());
//! ```

/// Provides components and the registry mapping element names to them.
pub mod component;

/// Provides settings read live from a table roller's attributes.
pub mod config;

/// Provides a document that connects components and routes events to them.
pub mod document;

/// Provides the element tree components live in.
pub mod dom;

/// Provides the error types of this crate.
pub mod error;

/// Provides the random selection across a table's columns.
pub mod roll;

/// Provides the `table-roller` component.
pub mod roller;

/// Provides read access to tables, in a document or in memory.
pub mod table;

pub use error::{DocumentError, RegistryError, SetupError, TableParseError};
pub use roller::TableRoller;
