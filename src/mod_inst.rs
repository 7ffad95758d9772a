// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::intf_inst::IntfInst;
use crate::net::Net;
use crate::pin::{Dir, IntfPin, Modport, Pin};
use crate::registry::Kind;
use crate::scope::Scope;

pub(crate) struct ModInstCore {
    pub(crate) scope: Scope,
    pub(crate) name: Option<String>,
    pub(crate) index: Option<usize>,
    pub(crate) model: Option<String>,
    pub(crate) isport: bool,
    pub(crate) pins: Vec<Pin>,
    pub(crate) intfpins: Vec<IntfPin>,
    pub(crate) desc: Option<String>,
}

/// A scalar module instance. `ModInst` is a handle over shared state; a
/// templatized copy (`templatize`) shares the same pin lists, so bindings
/// made through the copy attach to the original instance. The pending
/// template rides on the handle and is consumed by the next binding.
#[derive(Clone)]
pub struct ModInst {
    pub(crate) core: Rc<RefCell<ModInstCore>>,
    pub(crate) template: Option<String>,
}

impl ModInst {
    pub(crate) fn new(scope: Scope, name: Option<String>, index: Option<usize>) -> ModInst {
        ModInst {
            core: Rc::new(RefCell::new(ModInstCore {
                scope,
                name,
                index,
                model: None,
                isport: false,
                pins: Vec::new(),
                intfpins: Vec::new(),
                desc: None,
            })),
            template: None,
        }
    }

    /// Fabricates a formal-port pseudo-instance. Its pins become the
    /// enclosing module's ports at emission.
    pub(crate) fn new_port(name: &str) -> ModInst {
        let scope = Scope::new(crate::def::Def::synthetic("_port_", Kind::Module));
        let inst = ModInst::new(scope, Some(name.to_string()), None);
        inst.core.borrow_mut().isport = true;
        inst
    }

    pub fn name(&self) -> Option<String> {
        self.core.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl AsRef<str>) {
        self.core.borrow_mut().name = Some(name.as_ref().to_string());
    }

    /// Position within the owning vector, if this scalar is an element of
    /// one.
    pub fn index(&self) -> Option<usize> {
        self.core.borrow().index
    }

    pub fn is_port(&self) -> bool {
        self.core.borrow().isport
    }

    /// The backing elaboration container of this instance.
    pub fn scope(&self) -> Scope {
        self.core.borrow().scope.clone()
    }

    /// Name of the definition this is an instance of, as emitted.
    pub fn def_name(&self) -> String {
        self.scope().name()
    }

    pub fn set_desc(&self, desc: impl AsRef<str>) {
        self.core.borrow_mut().desc = Some(desc.as_ref().to_string());
    }

    pub fn desc(&self) -> Option<String> {
        self.core.borrow().desc.clone()
    }

    /// Returns a shallow copy carrying `template` as the pending port
    /// name for the next binding. The copy aliases this instance's pins.
    pub fn templatize(&self, template: impl AsRef<str>) -> ModInst {
        ModInst {
            core: self.core.clone(),
            template: Some(template.as_ref().to_string()),
        }
    }

    pub(crate) fn label(&self) -> String {
        self.name()
            .unwrap_or_else(|| format!("<unnamed {}>", self.def_name()))
    }

    /// Records a direct pin binding this instance to `net`.
    pub fn bind_net(&self, net: impl Into<Net>, dir: Dir) {
        self.bind_net_with(net.into(), dir, self.template.clone());
    }

    pub(crate) fn bind_net_with(&self, net: Net, dir: Dir, name: Option<String>) {
        let pin = Pin::new(dir, self.label(), net, name);
        self.core.borrow_mut().pins.push(pin);
    }

    /// Records a deferred interface binding against one modport of
    /// `intf`, filtered by direction.
    pub fn bind_intf(&self, intf: &IntfInst, modport: Modport, filter: Dir) {
        self.bind_intf_with(intf, modport, filter, self.template.clone());
    }

    pub(crate) fn bind_intf_with(
        &self,
        intf: &IntfInst,
        modport: Modport,
        filter: Dir,
        template: Option<String>,
    ) {
        let pin = IntfPin::new(intf.clone(), modport, filter, template, self.index());
        self.core.borrow_mut().intfpins.push(pin);
    }

    /// Elaborates the backing scope with the named model. Panics if the
    /// model does not exist.
    pub fn make(&self, model: impl AsRef<str>) {
        let model = model.as_ref();
        self.core.borrow_mut().model = Some(model.to_string());
        self.scope().make(model);
    }

    /// Elaborates if the model exists; leaves the instance as a black box
    /// otherwise.
    pub(crate) fn try_make(&self, model: &str) -> bool {
        let made = self.scope().try_make(model);
        if made {
            self.core.borrow_mut().model = Some(model.to_string());
        }
        made
    }

    /// All pins of this instance: interface bindings expanded in order,
    /// followed by direct pins.
    pub fn get_pins(&self) -> Vec<Pin> {
        let intfpins = self.core.borrow().intfpins.clone();
        let mut pins = Vec::new();
        for intfpin in &intfpins {
            pins.extend(intfpin.get_pins());
        }
        pins.extend(self.core.borrow().pins.iter().cloned());
        pins
    }

    /// The deferred interface bindings recorded on this instance.
    pub fn interface_pins(&self) -> Vec<IntfPin> {
        self.core.borrow().intfpins.clone()
    }

    /// The direct pins recorded on this instance, without expanding
    /// interface bindings.
    pub fn direct_pins(&self) -> Vec<Pin> {
        self.core.borrow().pins.clone()
    }

    /// `fmt0` renders a standalone scalar, `fmt1` a vector element;
    /// substitution keys are `{name}` and `{index}`.
    pub fn formatted(&self, fmt0: &str, fmt1: &str) -> String {
        let name = self.label();
        match self.index() {
            None => fmt0.replace("{name}", &name).replace("{index}", ""),
            Some(index) => fmt1
                .replace("{name}", &name)
                .replace("{index}", &index.to_string()),
        }
    }
}

/// An ordered vector of scalar module instances sharing a base name and
/// model. Slicing returns a shallow view over the same scalars.
#[derive(Clone)]
pub struct ModInsts {
    pub(crate) scalars: Vec<ModInst>,
    pub(crate) name: Rc<RefCell<Option<String>>>,
    pub(crate) template: Option<String>,
}

impl ModInsts {
    /// Scalars arrive with their `index` fields already assigned by the
    /// generator (sequential for `vec`, per element for `indices`).
    pub(crate) fn new(scalars: Vec<ModInst>) -> ModInsts {
        ModInsts {
            scalars,
            name: Rc::new(RefCell::new(None)),
            template: None,
        }
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = ModInst> + '_ {
        self.scalars.iter().cloned()
    }

    pub fn name(&self) -> Option<String> {
        self.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl AsRef<str>) {
        *self.name.borrow_mut() = Some(name.as_ref().to_string());
        for scalar in &self.scalars {
            scalar.set_name(name.as_ref());
        }
    }

    pub(crate) fn label(&self) -> String {
        self.name().unwrap_or_else(|| {
            self.scalars
                .first()
                .map(|scalar| scalar.def_name())
                .unwrap_or_else(|| "<empty>".to_string())
        })
    }

    /// Selects one element.
    pub fn index(&self, key: usize) -> ModInst {
        self.scalars
            .get(key)
            .cloned()
            .unwrap_or_else(|| panic!("index error: instance index {} out of range", key))
    }

    /// Verilog-style slice `[msb:lsb]`, both bounds inclusive and
    /// defaulting to the ends. The result shares this vector's scalars.
    pub fn slice(&self, msb: impl Into<Option<usize>>, lsb: impl Into<Option<usize>>) -> ModInsts {
        let msb = msb.into().unwrap_or(self.scalars.len().saturating_sub(1));
        let lsb = lsb.into().unwrap_or(0);
        if msb >= self.scalars.len() || lsb >= self.scalars.len() {
            panic!("index error: instance index out of range");
        }
        if msb < lsb {
            panic!("index error: msb less than lsb");
        }
        ModInsts {
            scalars: self.scalars[lsb..=msb].to_vec(),
            name: self.name.clone(),
            template: self.template.clone(),
        }
    }

    /// Templatized copy: every scalar copy carries the template, all
    /// aliasing the original scalars' pin lists.
    pub fn templatize(&self, template: impl AsRef<str>) -> ModInsts {
        ModInsts {
            scalars: self
                .scalars
                .iter()
                .map(|scalar| scalar.templatize(template.as_ref()))
                .collect(),
            name: self.name.clone(),
            template: Some(template.as_ref().to_string()),
        }
    }

    /// Binds every scalar to `net`, using the vector-level pending
    /// template as the port name.
    pub fn bind_net(&self, net: impl Into<Net>, dir: Dir) {
        let net = net.into();
        for scalar in &self.scalars {
            scalar.bind_net_with(net.clone(), dir, self.template.clone());
        }
    }

    pub fn make(&self, model: impl AsRef<str>) {
        for scalar in &self.scalars {
            scalar.make(model.as_ref());
        }
    }
}
