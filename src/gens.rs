// SPDX-License-Identifier: Apache-2.0

//! Instance generators: the `instance()` and `interface()` entry points
//! of the DSL. A generator is a small builder consumed by its terminal
//! operation; subscripting (`vec`, `indices`) must come before the
//! terminal, and stacking a second subscript is unrepresentable.

use crate::def::{Def, IntfDef, ModDef};
use crate::intf_inst::{IntfInst, IntfInsts};
use crate::mod_inst::{ModInst, ModInsts};
use crate::registry::{self, Kind};

/// Starts a module-instance expression: `instance().of("Name")` for a
/// scalar, `instance().vec(n).of("Name")` for a vector.
pub fn instance() -> ModGen {
    ModGen
}

/// Starts an interface-instance expression.
pub fn interface() -> IntfGen {
    IntfGen
}

pub struct ModGen;

impl ModGen {
    /// Scalar instance of the named module. The name is resolved in the
    /// registry, auto-creating a black-box definition if absent.
    pub fn of(self, name: impl AsRef<str>) -> ModInst {
        let def = registry::get_or_create(name.as_ref(), Kind::Module);
        ModInst::new(def.instantiate(), None, None)
    }

    /// Scalar instance of an existing definition.
    pub fn of_def(self, def: &ModDef) -> ModInst {
        ModInst::new(def.def.instantiate(), None, None)
    }

    /// Vector of `count` instances, indexed `0..count`.
    pub fn vec(self, count: usize) -> ModVecGen {
        ModVecGen {
            indices: (0..count).collect(),
        }
    }

    /// Vector with one instance per element of `indices`; each element's
    /// value becomes that scalar's index.
    pub fn indices(self, indices: impl IntoIterator<Item = usize>) -> ModVecGen {
        ModVecGen {
            indices: indices.into_iter().collect(),
        }
    }
}

pub struct ModVecGen {
    indices: Vec<usize>,
}

impl ModVecGen {
    pub fn of(self, name: impl AsRef<str>) -> ModInsts {
        let def = registry::get_or_create(name.as_ref(), Kind::Module);
        self.build(&def)
    }

    pub fn of_def(self, def: &ModDef) -> ModInsts {
        self.build(&def.def)
    }

    fn build(self, def: &Def) -> ModInsts {
        ModInsts::new(
            self.indices
                .into_iter()
                .map(|index| ModInst::new(def.instantiate(), None, Some(index)))
                .collect(),
        )
    }
}

pub struct IntfGen;

impl IntfGen {
    /// Scalar instance of the named interface, auto-creating a black-box
    /// definition if absent.
    pub fn of(self, name: impl AsRef<str>) -> IntfInst {
        let def = registry::get_or_create(name.as_ref(), Kind::Interface);
        IntfInst::new(def.instantiate(), None, None)
    }

    pub fn of_def(self, def: &IntfDef) -> IntfInst {
        IntfInst::new(def.def.instantiate(), None, None)
    }

    pub fn vec(self, count: usize) -> IntfVecGen {
        IntfVecGen {
            indices: (0..count).collect(),
        }
    }

    pub fn indices(self, indices: impl IntoIterator<Item = usize>) -> IntfVecGen {
        IntfVecGen {
            indices: indices.into_iter().collect(),
        }
    }
}

pub struct IntfVecGen {
    indices: Vec<usize>,
}

impl IntfVecGen {
    pub fn of(self, name: impl AsRef<str>) -> IntfInsts {
        let def = registry::get_or_create(name.as_ref(), Kind::Interface);
        self.build(&def)
    }

    pub fn of_def(self, def: &IntfDef) -> IntfInsts {
        self.build(&def.def)
    }

    fn build(self, def: &Def) -> IntfInsts {
        IntfInsts::new(
            self.indices
                .into_iter()
                .map(|index| IntfInst::new(def.instantiate(), None, Some(index)))
                .collect(),
        )
    }
}
