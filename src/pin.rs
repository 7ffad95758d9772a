// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use crate::intf_inst::IntfInst;
use crate::net::Net;

/// Direction of a pin, from the point of view of the instance that owns
/// it. `Any` is the wildcard used as a direction filter when binding
/// interfaces.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Dir {
    Input,
    Output,
    InOut,
    Any,
}

impl Dir {
    pub(crate) fn as_verilog(self) -> &'static str {
        match self {
            Dir::Input => "input",
            Dir::Output => "output",
            Dir::InOut => "inout",
            Dir::Any => "_any_dir_",
        }
    }

    /// Flips input and output; inout and the wildcard are unchanged. The
    /// emitter applies this at the module boundary: a net the body
    /// receives was recorded as an output of the port pseudo-instance.
    pub(crate) fn inverted(self) -> Dir {
        match self {
            Dir::Input => Dir::Output,
            Dir::Output => Dir::Input,
            other => other,
        }
    }

    /// Whether `self`, used as a filter, admits a pin of direction `dir`.
    pub(crate) fn admits(self, dir: Dir) -> bool {
        self == Dir::Any || self == dir
    }
}

/// Default port-name template for an interface bound to a scalar instance.
pub(crate) const SCALAR_PORT_TEMPLATE: &str = "{I}_{n}";
/// Default port-name template for an interface bound to a vector element.
pub(crate) const VECTOR_PORT_TEMPLATE: &str = "{i}_{n}";
/// Default net-name template for wires traveling through an interface.
pub(crate) const NET_TEMPLATE: &str = "{I}_{n}";

pub(crate) struct PinCore {
    pub(crate) dir: Dir,
    /// Label of the owning instance, for error messages.
    pub(crate) owner: String,
    pub(crate) net: Net,
    /// Explicit port name, set by a template expression at the binding
    /// site. Falls back to the net's own name.
    pub(crate) name: Option<String>,
    /// Port-name template; interface expansion rewrites this in place.
    pub(crate) template: String,
    /// Label of the interface instance this pin traveled through, used to
    /// group wire declarations.
    pub(crate) intf_label: Option<String>,
}

/// A concrete connection: instance `I` has port `P` bound to net `N`.
#[derive(Clone)]
pub struct Pin {
    pub(crate) core: Rc<RefCell<PinCore>>,
}

impl Pin {
    pub(crate) fn new(dir: Dir, owner: String, net: Net, name: Option<String>) -> Pin {
        Pin {
            core: Rc::new(RefCell::new(PinCore {
                dir,
                owner,
                net,
                name,
                template: "{name}".to_string(),
                intf_label: None,
            })),
        }
    }

    pub fn dir(&self) -> Dir {
        self.core.borrow().dir
    }

    pub fn net(&self) -> Net {
        self.core.borrow().net.clone()
    }

    /// The port name: the explicit name if one was given, else the net's
    /// base name.
    pub fn name(&self) -> String {
        let core = self.core.borrow();
        if let Some(name) = &core.name {
            return name.clone();
        }
        core.net.try_name().unwrap_or_else(|| {
            panic!(
                "connection error: port name not specified for '{}' and '{}'",
                core.owner,
                core.net.default_repr()
            )
        })
    }

    /// Full formatted port name: the template applied to `name()`.
    pub fn fname(&self) -> String {
        let template = self.core.borrow().template.clone();
        if template.contains("{name}") {
            template.replace("{name}", &self.name())
        } else {
            template
        }
    }

    pub(crate) fn intf_label(&self) -> Option<String> {
        self.core.borrow().intf_label.clone()
    }

    pub(crate) fn set_template(&self, template: String) {
        self.core.borrow_mut().template = template;
    }

    pub(crate) fn set_intf_label(&self, label: String) {
        self.core.borrow_mut().intf_label = Some(label);
    }
}

/// Selects which side of an interface a binding attaches to: a position
/// in the interface's formal port list, or a formal's name.
#[derive(Clone, Debug)]
pub enum Modport {
    Pos(usize),
    Named(String),
}

pub(crate) struct IntfPinCore {
    pub(crate) intfinst: IntfInst,
    pub(crate) modport: Modport,
    pub(crate) filter: Dir,
    /// Template from the binding site (module side), if any.
    pub(crate) template: Option<String>,
    /// Vector position of the bound module instance, which selects the
    /// default port template.
    pub(crate) owner_index: Option<usize>,
}

/// A deferred pin bundle: a filtered, renamed view of one modport of an
/// interface instance. Expanded on demand during emission.
#[derive(Clone)]
pub struct IntfPin {
    pub(crate) core: Rc<RefCell<IntfPinCore>>,
}

impl IntfPin {
    pub(crate) fn new(
        intfinst: IntfInst,
        modport: Modport,
        filter: Dir,
        template: Option<String>,
        owner_index: Option<usize>,
    ) -> IntfPin {
        IntfPin {
            core: Rc::new(RefCell::new(IntfPinCore {
                intfinst,
                modport,
                filter,
                template,
                owner_index,
            })),
        }
    }

    pub fn intfinst(&self) -> IntfInst {
        self.core.borrow().intfinst.clone()
    }

    pub fn filter(&self) -> Dir {
        self.core.borrow().filter
    }

    /// Resolves the modport, filters its pins by direction, and rewrites
    /// the survivors' port and net templates with the interface-instance
    /// substitutions: `{i}` base name, `{k}` index literal, `{I}` combined
    /// name-plus-index, `{n}` left as `{name}` for the final pin-name
    /// substitution.
    pub fn get_pins(&self) -> Vec<Pin> {
        let (intfinst, modport, filter, template, owner_index) = {
            let core = self.core.borrow();
            (
                core.intfinst.clone(),
                core.modport.clone(),
                core.filter,
                core.template.clone(),
                core.owner_index,
            )
        };

        let scope = intfinst.scope();
        let modport_name = match modport {
            Modport::Pos(pos) => {
                let ports = scope.port_at_pos();
                ports.get(pos).cloned().unwrap_or_else(|| {
                    panic!(
                        "index error: modport position {} out of range for '{}'",
                        pos,
                        scope.name()
                    )
                })
            }
            Modport::Named(name) => name,
        };
        let proxy = scope.port_proxy(&modport_name).unwrap_or_else(|| {
            panic!(
                "value error: no modport named '{}' on '{}'",
                modport_name,
                scope.name()
            )
        });

        let i = intfinst
            .name()
            .unwrap_or_else(|| panic!("value error: interface instance has no name"));
        let (k, combined) = match intfinst.index() {
            None => (String::new(), i.clone()),
            Some(index) => (index.to_string(), format!("{}{}", i, index)),
        };

        let pin_template = template
            .or_else(|| intfinst.template())
            .unwrap_or_else(|| {
                if owner_index.is_none() {
                    SCALAR_PORT_TEMPLATE.to_string()
                } else {
                    VECTOR_PORT_TEMPLATE.to_string()
                }
            });

        let mut pins = Vec::new();
        for pin in proxy.get_pins() {
            if !filter.admits(pin.dir()) {
                continue;
            }
            pin.set_template(fill(&pin_template, &i, &k, &combined));
            if let Net::Wire(w) = pin.net() {
                let net_template = intfinst
                    .template()
                    .unwrap_or_else(|| NET_TEMPLATE.to_string());
                w.set_template(fill(&net_template, &i, &k, &combined));
            }
            pin.set_intf_label(combined.clone());
            pins.push(pin);
        }
        pins
    }
}

fn fill(template: &str, i: &str, k: &str, combined: &str) -> String {
    template
        .replace("{i}", i)
        .replace("{k}", k)
        .replace("{I}", combined)
        .replace("{n}", "{name}")
}
