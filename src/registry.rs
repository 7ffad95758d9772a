// SPDX-License-Identifier: Apache-2.0

//! Name-indexed table of module and interface definitions.
//!
//! The table is thread-local: definitions hold non-`Send` handles, and a
//! thread-local table gives each test (and each independent elaboration
//! thread) its own namespace.

use std::cell::RefCell;

use indexmap::IndexMap;

use crate::def::Def;

/// What a registered name denotes.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Kind {
    Module,
    Interface,
}

impl Kind {
    pub(crate) fn label(self) -> &'static str {
        match self {
            Kind::Module => "module",
            Kind::Interface => "interface",
        }
    }
}

struct Entry {
    def: Def,
    kind: Kind,
}

thread_local! {
    static REGISTRY: RefCell<IndexMap<String, Entry>> = RefCell::new(IndexMap::new());
}

pub(crate) fn register(def: &Def) {
    let name = def.name();
    let kind = def.kind();
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        if registry.contains_key(&name) {
            panic!("registration error: '{}' is already registered", name);
        }
        registry.insert(
            name,
            Entry {
                def: def.clone(),
                kind,
            },
        );
    });
}

/// Looks up a registered definition. Panics if the name is unknown or is
/// registered under the other kind.
pub fn get(name: impl AsRef<str>, kind: Kind) -> Def {
    let name = name.as_ref();
    REGISTRY.with(|registry| {
        let registry = registry.borrow();
        match registry.get(name) {
            None => panic!("registration error: '{}' is not registered", name),
            Some(entry) if entry.kind != kind => panic!(
                "registration error: '{}' is registered as a different kind '{}'",
                name,
                entry.kind.label()
            ),
            Some(entry) => entry.def.clone(),
        }
    })
}

/// Looks up a registered definition, or fabricates a fresh synthetic one
/// of the requested kind. The synthetic definition is not stored, so a
/// later explicit definition of the same name still succeeds; it has no
/// models and elaborates as a black box.
pub fn get_or_create(name: impl AsRef<str>, kind: Kind) -> Def {
    let name = name.as_ref();
    REGISTRY.with(|registry| {
        let registry = registry.borrow();
        match registry.get(name) {
            Some(entry) => entry.def.clone(),
            None => Def::synthetic(name, kind),
        }
    })
}

/// Removes a registered definition. The kind must match.
pub fn deregister(name: impl AsRef<str>, kind: Kind) {
    let name = name.as_ref();
    REGISTRY.with(|registry| {
        let mut registry = registry.borrow_mut();
        match registry.get(name) {
            None => panic!("registration error: '{}' is not registered", name),
            Some(entry) if entry.kind != kind => panic!(
                "registration error: '{}' is registered as a different kind '{}'",
                name,
                entry.kind.label()
            ),
            Some(_) => {
                registry.shift_remove(name);
            }
        }
    });
}

/// Empties the table.
pub fn clear() {
    REGISTRY.with(|registry| registry.borrow_mut().clear());
}
