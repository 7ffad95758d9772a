// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::intf_inst::{IntfInst, IntfInsts};
use crate::mod_inst::{ModInst, ModInsts};
use crate::net::{Concat, Const, Net, Wire};
use crate::registry::{self, Kind};
use crate::scope::{Ports, Scope};

/// A model body: the builder receives the scope under construction and
/// the port pseudo-instances fabricated from the model's formal names,
/// and returns its local bindings so the scope can name them.
pub type ModelBuilder = dyn Fn(&Scope, &Ports) -> Bindings;

#[derive(Clone)]
pub(crate) struct Model {
    pub(crate) ports: Vec<String>,
    pub(crate) builder: Rc<ModelBuilder>,
}

pub(crate) struct DefCore {
    name: String,
    kind: Kind,
    models: IndexMap<String, Model>,
}

/// A registered module or interface definition. A definition carries a
/// set of named models (alternative structural bodies); instances of the
/// definition each elaborate their own scope from the chosen model.
#[derive(Clone)]
pub struct Def {
    core: Rc<RefCell<DefCore>>,
}

impl Def {
    fn new(name: &str, kind: Kind) -> Def {
        Def {
            core: Rc::new(RefCell::new(DefCore {
                name: name.to_string(),
                kind,
                models: IndexMap::new(),
            })),
        }
    }

    /// A definition fabricated by name lookup, never registered. It has
    /// no models, so instances of it stay un-elaborated black boxes.
    pub(crate) fn synthetic(name: &str, kind: Kind) -> Def {
        Def::new(name, kind)
    }

    pub fn name(&self) -> String {
        self.core.borrow().name.clone()
    }

    pub fn kind(&self) -> Kind {
        self.core.borrow().kind
    }

    pub(crate) fn model(&self, name: &str) -> Option<Model> {
        self.core.borrow().models.get(name).cloned()
    }

    pub(crate) fn add_model(
        &self,
        name: &str,
        ports: &[&str],
        builder: impl Fn(&Scope, &Ports) -> Bindings + 'static,
    ) {
        let mut core = self.core.borrow_mut();
        if core.models.contains_key(name) {
            panic!(
                "value error: model '{}' is already defined on '{}'",
                name, core.name
            );
        }
        core.models.insert(
            name.to_string(),
            Model {
                ports: ports.iter().map(|p| p.to_string()).collect(),
                builder: Rc::new(builder),
            },
        );
    }

    pub(crate) fn instantiate(&self) -> Scope {
        Scope::new(self.clone())
    }
}

/// A module definition. Creating one registers it under its name.
#[derive(Clone)]
pub struct ModDef {
    pub(crate) def: Def,
}

impl ModDef {
    pub fn new(name: impl AsRef<str>) -> ModDef {
        let def = Def::new(name.as_ref(), Kind::Module);
        registry::register(&def);
        ModDef { def }
    }

    pub fn name(&self) -> String {
        self.def.name()
    }

    /// Installs a model: `ports` are the formal port names, and the
    /// builder constructs the body.
    pub fn model(
        &self,
        name: impl AsRef<str>,
        ports: &[&str],
        builder: impl Fn(&Scope, &Ports) -> Bindings + 'static,
    ) -> &Self {
        self.def.add_model(name.as_ref(), ports, builder);
        self
    }
}

/// An interface definition. Creating one registers it under its name.
#[derive(Clone)]
pub struct IntfDef {
    pub(crate) def: Def,
}

impl IntfDef {
    pub fn new(name: impl AsRef<str>) -> IntfDef {
        let def = Def::new(name.as_ref(), Kind::Interface);
        registry::register(&def);
        IntfDef { def }
    }

    pub fn name(&self) -> String {
        self.def.name()
    }

    pub fn model(
        &self,
        name: impl AsRef<str>,
        ports: &[&str],
        builder: impl Fn(&Scope, &Ports) -> Bindings + 'static,
    ) -> &Self {
        self.def.add_model(name.as_ref(), ports, builder);
        self
    }
}

/// One local binding returned from a model body. Conversions exist for
/// every DSL entity; values with no name slot (constants, concatenations,
/// replication lists) convert to `Skip` and are ignored, as the original
/// scan ignored locals without a name attribute.
pub enum Binding {
    Mod(ModInst),
    Mods(ModInsts),
    Intf(IntfInst),
    Intfs(IntfInsts),
    Wire(Wire),
    Skip,
}

/// Ordered local bindings, in source order, as produced by [`bindings!`].
pub type Bindings = Vec<(String, Binding)>;

impl From<&ModInst> for Binding {
    fn from(inst: &ModInst) -> Binding {
        Binding::Mod(inst.clone())
    }
}

impl From<&ModInsts> for Binding {
    fn from(insts: &ModInsts) -> Binding {
        Binding::Mods(insts.clone())
    }
}

impl From<&IntfInst> for Binding {
    fn from(inst: &IntfInst) -> Binding {
        Binding::Intf(inst.clone())
    }
}

impl From<&IntfInsts> for Binding {
    fn from(insts: &IntfInsts) -> Binding {
        Binding::Intfs(insts.clone())
    }
}

impl From<&Wire> for Binding {
    fn from(wire: &Wire) -> Binding {
        Binding::Wire(wire.clone())
    }
}

impl From<&Net> for Binding {
    fn from(net: &Net) -> Binding {
        match net {
            Net::Wire(wire) => Binding::Wire(wire.clone()),
            _ => Binding::Skip,
        }
    }
}

impl From<&Const> for Binding {
    fn from(_: &Const) -> Binding {
        Binding::Skip
    }
}

impl From<&Concat> for Binding {
    fn from(_: &Concat) -> Binding {
        Binding::Skip
    }
}

impl From<&Vec<Wire>> for Binding {
    fn from(_: &Vec<Wire>) -> Binding {
        Binding::Skip
    }
}

/// Captures model-body locals by name, the way the original returned
/// `locals()`: `bindings![a, b, si]` pairs each identifier with its
/// value so the enclosing scope can assign names to anonymous entities.
#[macro_export]
macro_rules! bindings {
    ($($local:ident),* $(,)?) => {
        vec![
            $((stringify!($local).to_string(), $crate::Binding::from(&$local)),)*
        ]
    };
}
