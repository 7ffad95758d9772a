// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::def::{Binding, Bindings, Def};
use crate::intf_inst::{IntfInst, IntfInsts};
use crate::mod_inst::{ModInst, ModInsts};
use crate::registry::Kind;

/// A module-instance child of a scope: a scalar instance or a vector.
#[derive(Clone)]
pub enum ModChild {
    Scalar(ModInst),
    List(ModInsts),
}

impl ModChild {
    pub fn scalars(&self) -> Vec<ModInst> {
        match self {
            ModChild::Scalar(inst) => vec![inst.clone()],
            ModChild::List(insts) => insts.iter().collect(),
        }
    }
}

/// An interface-instance child of a scope.
#[derive(Clone)]
pub enum IntfChild {
    Scalar(IntfInst),
    List(IntfInsts),
}

impl IntfChild {
    pub fn scalars(&self) -> Vec<IntfInst> {
        match self {
            IntfChild::Scalar(inst) => vec![inst.clone()],
            IntfChild::List(insts) => insts.iter().collect(),
        }
    }
}

pub(crate) struct ScopeCore {
    def: Def,
    name: String,
    model: Option<String>,
    module_instances: IndexMap<String, ModChild>,
    interface_instances: IndexMap<String, IntfChild>,
    port_at_pos: Vec<String>,
    elaborated: bool,
}

/// The per-instance elaboration container. Every instance of a
/// definition owns a fresh scope; running a model on it populates the
/// child instance maps and the formal port list.
#[derive(Clone)]
pub struct Scope {
    core: Rc<RefCell<ScopeCore>>,
}

impl Scope {
    pub(crate) fn new(def: Def) -> Scope {
        let name = def.name();
        Scope {
            core: Rc::new(RefCell::new(ScopeCore {
                def,
                name,
                model: None,
                module_instances: IndexMap::new(),
                interface_instances: IndexMap::new(),
                port_at_pos: Vec::new(),
                elaborated: false,
            })),
        }
    }

    pub fn name(&self) -> String {
        self.core.borrow().name.clone()
    }

    pub fn model(&self) -> Option<String> {
        self.core.borrow().model.clone()
    }

    pub fn kind(&self) -> Kind {
        self.core.borrow().def.kind()
    }

    /// Formal port names of the elaborated model, in declaration order.
    pub fn port_at_pos(&self) -> Vec<String> {
        self.core.borrow().port_at_pos.clone()
    }

    /// Builds this scope from the named model. Panics if the definition
    /// has no model by that name.
    pub fn make(&self, model: impl AsRef<str>) {
        let model = model.as_ref();
        if !self.try_make(model) {
            panic!("model '{}' does not exist on '{}'", model, self.name());
        }
    }

    /// Builds this scope from the named model, reporting whether the
    /// model exists. Re-making an already-elaborated scope is a no-op.
    pub(crate) fn try_make(&self, model: &str) -> bool {
        let found = {
            let core = self.core.borrow();
            if core.elaborated {
                return true;
            }
            core.def.model(model)
        };
        let Some(found) = found else {
            return false;
        };

        let mut proxies = Ports::default();
        {
            let mut core = self.core.borrow_mut();
            core.elaborated = true;
            core.model = Some(model.to_string());
            core.port_at_pos = found.ports.clone();
            for port_name in &found.ports {
                let proxy = ModInst::new_port(port_name);
                core.module_instances
                    .insert(port_name.clone(), ModChild::Scalar(proxy.clone()));
                proxies.map.insert(port_name.clone(), proxy);
            }
        }

        let locals = (found.builder)(self, &proxies);
        self.absorb(locals);
        true
    }

    /// Names and registers the local bindings returned by a model body:
    /// unnamed entities take their binding name; instances become
    /// children; wires are only named.
    fn absorb(&self, locals: Bindings) {
        for (local_name, binding) in locals {
            match binding {
                Binding::Mod(inst) => {
                    if inst.name().is_none() {
                        inst.set_name(&local_name);
                    }
                    self.add(&inst);
                }
                Binding::Mods(insts) => {
                    if insts.name().is_none() {
                        insts.set_name(&local_name);
                    }
                    self.add(&insts);
                }
                Binding::Intf(inst) => {
                    if inst.name().is_none() {
                        inst.set_name(&local_name);
                    }
                    self.add(&inst);
                }
                Binding::Intfs(insts) => {
                    if insts.name().is_none() {
                        insts.set_name(&local_name);
                    }
                    self.add(&insts);
                }
                Binding::Wire(wire) => {
                    if wire.name().is_none() {
                        wire.set_name(&local_name);
                    }
                }
                Binding::Skip => {}
            }
        }
    }

    /// Registers a child under its own name. Panics if the child has no
    /// name; non-instance bindings are ignored.
    pub fn add(&self, child: impl Into<Binding>) {
        let binding = child.into();
        let name = match &binding {
            Binding::Mod(inst) => inst.name(),
            Binding::Mods(insts) => insts.name(),
            Binding::Intf(inst) => inst.name(),
            Binding::Intfs(insts) => insts.name(),
            Binding::Wire(wire) => wire.name(),
            Binding::Skip => return,
        };
        let name = name.unwrap_or_else(|| {
            panic!("value error: child of '{}' has no name", self.name())
        });
        let mut core = self.core.borrow_mut();
        match binding {
            Binding::Mod(inst) => {
                core.module_instances.insert(name, ModChild::Scalar(inst));
            }
            Binding::Mods(insts) => {
                core.module_instances.insert(name, ModChild::List(insts));
            }
            Binding::Intf(inst) => {
                core.interface_instances
                    .insert(name, IntfChild::Scalar(inst));
            }
            Binding::Intfs(insts) => {
                core.interface_instances.insert(name, IntfChild::List(insts));
            }
            _ => {}
        }
    }

    /// Child module instances in insertion order, vectors intact.
    pub fn module_instances(&self) -> Vec<ModChild> {
        self.core.borrow().module_instances.values().cloned().collect()
    }

    /// Child module instances with vectors expanded into their scalars.
    pub fn flattened_module_instances(&self) -> Vec<ModInst> {
        self.module_instances()
            .iter()
            .flat_map(|child| child.scalars())
            .collect()
    }

    /// Child interface instances in insertion order, vectors intact.
    pub fn interface_instances(&self) -> Vec<IntfChild> {
        self.core
            .borrow()
            .interface_instances
            .values()
            .cloned()
            .collect()
    }

    /// Child interface instances with vectors expanded.
    pub fn flattened_interface_instances(&self) -> Vec<IntfInst> {
        self.interface_instances()
            .iter()
            .flat_map(|child| child.scalars())
            .collect()
    }

    /// Looks up a formal-port pseudo-instance by name. Used to resolve a
    /// modport when an interface binding is expanded.
    pub(crate) fn port_proxy(&self, name: &str) -> Option<ModInst> {
        match self.core.borrow().module_instances.get(name) {
            Some(ModChild::Scalar(inst)) => Some(inst.clone()),
            _ => None,
        }
    }

    /// Emits Verilog for this scope with default settings.
    pub fn emit_verilog(&self) -> String {
        crate::emit::Verilog::new(self).generate_module()
    }
}

/// The formal-port pseudo-instances handed to a model builder, keyed by
/// formal name.
#[derive(Default)]
pub struct Ports {
    pub(crate) map: IndexMap<String, ModInst>,
}

impl Ports {
    /// Returns the port pseudo-instance for a formal name.
    pub fn get(&self, name: impl AsRef<str>) -> ModInst {
        let name = name.as_ref();
        self.map
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("value error: no port named '{}'", name))
    }
}
