// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::scope::Scope;

pub(crate) struct IntfInstCore {
    pub(crate) scope: Scope,
    pub(crate) name: Option<String>,
    pub(crate) index: Option<usize>,
    pub(crate) model: Option<String>,
    /// Persistent naming template for the nets traveling through this
    /// interface. Unlike a module instance's pending template, this is
    /// set in place by `templatize` and consulted at every expansion.
    pub(crate) template: Option<String>,
}

/// A scalar interface instance.
#[derive(Clone)]
pub struct IntfInst {
    pub(crate) core: Rc<RefCell<IntfInstCore>>,
}

impl IntfInst {
    pub(crate) fn new(scope: Scope, name: Option<String>, index: Option<usize>) -> IntfInst {
        IntfInst {
            core: Rc::new(RefCell::new(IntfInstCore {
                scope,
                name,
                index,
                model: None,
                template: None,
            })),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.core.borrow().name.clone()
    }

    pub fn set_name(&self, name: impl AsRef<str>) {
        self.core.borrow_mut().name = Some(name.as_ref().to_string());
    }

    pub fn index(&self) -> Option<usize> {
        self.core.borrow().index
    }

    pub fn scope(&self) -> Scope {
        self.core.borrow().scope.clone()
    }

    pub fn def_name(&self) -> String {
        self.scope().name()
    }

    pub fn template(&self) -> Option<String> {
        self.core.borrow().template.clone()
    }

    /// Sets the interface's naming template and returns the handle.
    pub fn templatize(&self, template: impl AsRef<str>) -> IntfInst {
        self.core.borrow_mut().template = Some(template.as_ref().to_string());
        self.clone()
    }

    pub(crate) fn label(&self) -> String {
        self.name()
            .unwrap_or_else(|| format!("<unnamed {}>", self.def_name()))
    }

    /// Elaborates the interface body with the named model. Panics if the
    /// model does not exist.
    pub fn make(&self, model: impl AsRef<str>) {
        let model = model.as_ref();
        self.core.borrow_mut().model = Some(model.to_string());
        self.scope().make(model);
    }
}

/// An ordered vector of scalar interface instances.
#[derive(Clone)]
pub struct IntfInsts {
    pub(crate) scalars: Vec<IntfInst>,
    pub(crate) name: Rc<RefCell<Option<String>>>,
}

impl IntfInsts {
    /// Scalars arrive with their `index` fields already assigned by the
    /// generator (sequential for `vec`, per element for `indices`).
    pub(crate) fn new(scalars: Vec<IntfInst>) -> IntfInsts {
        IntfInsts {
            scalars,
            name: Rc::new(RefCell::new(None)),
        }
    }

    pub fn len(&self) -> usize {
        self.scalars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scalars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = IntfInst> + '_ {
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

    pub fn index(&self, key: usize) -> IntfInst {
        self.scalars
            .get(key)
            .cloned()
            .unwrap_or_else(|| panic!("index error: instance index {} out of range", key))
    }

    /// Verilog-style slice `[msb:lsb]` over the same scalars.
    pub fn slice(&self, msb: impl Into<Option<usize>>, lsb: impl Into<Option<usize>>) -> IntfInsts {
        let msb = msb.into().unwrap_or(self.scalars.len().saturating_sub(1));
        let lsb = lsb.into().unwrap_or(0);
        if msb >= self.scalars.len() || lsb >= self.scalars.len() {
            panic!("index error: instance index out of range");
        }
        if msb < lsb {
            panic!("index error: msb less than lsb");
        }
        IntfInsts {
            scalars: self.scalars[lsb..=msb].to_vec(),
            name: self.name.clone(),
        }
    }

    /// Sets every scalar's naming template in place and returns the
    /// handle.
    pub fn templatize(&self, template: impl AsRef<str>) -> IntfInsts {
        for scalar in &self.scalars {
            scalar.templatize(template.as_ref());
        }
        self.clone()
    }

    pub fn make(&self, model: impl AsRef<str>) {
        for scalar in &self.scalars {
            scalar.make(model.as_ref());
        }
    }
}
