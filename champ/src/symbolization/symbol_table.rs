//! Bidirectional label ↔ address table
//!
//! Later bindings win: rebinding a label moves it to the new address, and
//! binding a new label at an occupied address replaces the old label. Both
//! cases are reported with `warn!` so duplicate labels don't go unnoticed.

use log::warn;
use std::collections::HashMap;

use crate::domain::Address;

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    label_for_address: HashMap<Address, String>,
    address_for_label: HashMap<String, Address>,
}

impl SymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `label` to `address`, overwriting previous bindings of either key
    pub fn bind(&mut self, label: &str, address: Address) {
        if let Some(previous) = self.address_for_label.get(label) {
            if *previous != address {
                warn!("label `{label}` rebound from {previous} to {address}");
            }
        }
        if let Some(previous) = self.label_for_address.get(&address) {
            if previous != label {
                warn!("address {address} relabelled from `{previous}` to `{label}`");
            }
        }

        self.label_for_address.insert(address, label.to_string());
        self.address_for_label.insert(label.to_string(), address);
    }

    /// Current label at `address`, if any
    #[must_use]
    pub fn symbol_for(&self, address: Address) -> Option<&str> {
        self.label_for_address.get(&address).map(String::as_str)
    }

    /// Current address of `label`, if any
    #[must_use]
    pub fn address_for(&self, label: &str) -> Option<Address> {
        self.address_for_label.get(label).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.address_for_label.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.address_for_label.is_empty()
    }
}
