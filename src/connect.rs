// SPDX-License-Identifier: Apache-2.0

//! The binding operators. Every DSL operand implements [`Connect`], whose
//! four methods realize the connection algebra: `drives` (`>`),
//! `driven_by` (`<`), `links` (`<>`), and `connect` (`==`). Each method
//! applies the binding and returns the right-hand operand, so a chain
//! like `io > si > a` reads `io.drives(&si).drives(&a)`.

use crate::intf_inst::{IntfInst, IntfInsts};
use crate::mod_inst::{ModInst, ModInsts};
use crate::net::{Concat, Const, Net, Wire};
use crate::pin::{Dir, Modport};

/// One of the four binding operators.
#[derive(Clone, Copy)]
enum Op {
    Forward,
    Backward,
    Bidir,
    Any,
}

impl Op {
    /// Direction recorded on an instance pin when the instance is on the
    /// left of a net: `M > w` drives the net, so the pin is an output
    /// (inverted to `input` at the module boundary). `==` has no net
    /// direction.
    fn mod_net_dir(self) -> Option<Dir> {
        match self {
            Op::Forward => Some(Dir::Output),
            Op::Backward => Some(Dir::Input),
            Op::Bidir => Some(Dir::InOut),
            Op::Any => None,
        }
    }

    /// Direction recorded when the net is on the left: `w > M` feeds the
    /// instance, which sees an input.
    fn net_mod_dir(self) -> Option<Dir> {
        match self {
            Op::Forward => Some(Dir::Input),
            Op::Backward => Some(Dir::Output),
            Op::Bidir => Some(Dir::InOut),
            Op::Any => None,
        }
    }

    /// Direction filter applied to the modport when the instance is on
    /// the left of an interface.
    fn mod_intf_filter(self) -> Dir {
        match self {
            Op::Forward => Dir::Output,
            Op::Backward => Dir::Input,
            Op::Bidir => Dir::InOut,
            Op::Any => Dir::Any,
        }
    }

    /// Direction filter when the interface is on the left.
    fn intf_mod_filter(self) -> Dir {
        match self {
            Op::Forward => Dir::Input,
            Op::Backward => Dir::Output,
            Op::Bidir => Dir::InOut,
            Op::Any => Dir::Any,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Op::Forward => ">",
            Op::Backward => "<",
            Op::Bidir => "<>",
            Op::Any => "==",
        }
    }
}

/// One side of a binding expression, as seen by the dispatcher.
#[doc(hidden)]
pub enum Side {
    Mods {
        scalars: Vec<ModInst>,
        template: Option<String>,
        vector: bool,
        label: String,
    },
    Intfs {
        scalars: Vec<IntfInst>,
        vector: bool,
        label: String,
    },
    Net(Net),
}

impl Side {
    fn describe(&self) -> String {
        match self {
            Side::Mods { scalars, label, .. } => format!("{}({})", label, scalars.len()),
            Side::Intfs { scalars, label, .. } => format!("{}({})", label, scalars.len()),
            Side::Net(net) => match net {
                Net::Wire(wire) => wire
                    .name()
                    .map(|name| format!("wire '{}'", name))
                    .unwrap_or_else(|| "wire".to_string()),
                Net::Const(c) => format!("const {}", c.formatted()),
                Net::Concat(_) => "concat".to_string(),
            },
        }
    }
}

/// Operand of the binding operators. Implemented by instances, instance
/// vectors, and every net type.
pub trait Connect: Clone {
    #[doc(hidden)]
    fn side(&self) -> Side;

    /// `self > other`: signal flow from left to right.
    fn drives<T: Connect>(&self, other: &T) -> T {
        apply(self.side(), Op::Forward, other.side());
        other.clone()
    }

    /// `self < other`: signal flow from right to left.
    fn driven_by<T: Connect>(&self, other: &T) -> T {
        apply(self.side(), Op::Backward, other.side());
        other.clone()
    }

    /// `self <> other`: bidirectional binding.
    fn links<T: Connect>(&self, other: &T) -> T {
        apply(self.side(), Op::Bidir, other.side());
        other.clone()
    }

    /// `self == other`: direction-agnostic binding (interface bindings
    /// keep every pin regardless of direction).
    fn connect<T: Connect>(&self, other: &T) -> T {
        apply(self.side(), Op::Any, other.side());
        other.clone()
    }
}

fn apply(lhs: Side, op: Op, rhs: Side) {
    match (&lhs, &rhs) {
        (
            Side::Mods {
                scalars, template, ..
            },
            Side::Net(net),
        ) => {
            let dir = op.mod_net_dir().unwrap_or_else(|| {
                panic!(
                    "unsupported connection: '{}' {} '{}'",
                    lhs.describe(),
                    op.symbol(),
                    rhs.describe()
                )
            });
            for scalar in scalars {
                scalar.bind_net_with(net.clone(), dir, template.clone());
            }
        }
        (
            Side::Net(net),
            Side::Mods {
                scalars, template, ..
            },
        ) => {
            let dir = op.net_mod_dir().unwrap_or_else(|| {
                panic!(
                    "unsupported connection: '{}' {} '{}'",
                    lhs.describe(),
                    op.symbol(),
                    rhs.describe()
                )
            });
            for scalar in scalars {
                scalar.bind_net_with(net.clone(), dir, template.clone());
            }
        }
        (Side::Mods { .. }, Side::Intfs { .. }) => {
            bind_intf(&lhs, &rhs, Modport::Pos(0), op.mod_intf_filter());
        }
        (Side::Intfs { .. }, Side::Mods { .. }) => {
            bind_intf(&rhs, &lhs, Modport::Pos(1), op.intf_mod_filter());
        }
        _ => panic!(
            "unsupported connection: '{}' {} '{}'",
            lhs.describe(),
            op.symbol(),
            rhs.describe()
        ),
    }
}

/// Attaches interface pins to the module side, applying the scalar/vector
/// rules: a scalar instance collects one pin per interface scalar, a
/// vector instance broadcasts a scalar interface, and two vectors zip
/// elementwise with matching lengths.
fn bind_intf(mods: &Side, intfs: &Side, modport: Modport, filter: Dir) {
    let (mod_scalars, template, mod_vector, mod_label) = match mods {
        Side::Mods {
            scalars,
            template,
            vector,
            label,
        } => (scalars, template, *vector, label),
        _ => unreachable!(),
    };
    let (intf_scalars, intf_vector, intf_label) = match intfs {
        Side::Intfs {
            scalars,
            vector,
            label,
        } => (scalars, *vector, label),
        _ => unreachable!(),
    };

    if !mod_vector {
        for scalar in mod_scalars {
            for intf in intf_scalars {
                scalar.bind_intf_with(intf, modport.clone(), filter, template.clone());
            }
        }
    } else if !intf_vector {
        let intf = &intf_scalars[0];
        for scalar in mod_scalars {
            scalar.bind_intf_with(intf, modport.clone(), filter, template.clone());
        }
    } else {
        if mod_scalars.len() != intf_scalars.len() {
            panic!(
                "connection error: vector sizes differ: {}({}), {}({})",
                mod_label,
                mod_scalars.len(),
                intf_label,
                intf_scalars.len()
            );
        }
        for (scalar, intf) in mod_scalars.iter().zip(intf_scalars.iter()) {
            scalar.bind_intf_with(intf, modport.clone(), filter, template.clone());
        }
    }
}

impl Connect for ModInst {
    fn side(&self) -> Side {
        Side::Mods {
            scalars: vec![self.clone()],
            template: self.template.clone(),
            vector: false,
            label: self.label(),
        }
    }
}

impl Connect for ModInsts {
    fn side(&self) -> Side {
        Side::Mods {
            scalars: self.scalars.clone(),
            template: self.template.clone(),
            vector: true,
            label: self.label(),
        }
    }
}

impl Connect for IntfInst {
    fn side(&self) -> Side {
        Side::Intfs {
            scalars: vec![self.clone()],
            vector: false,
            label: self.label(),
        }
    }
}

impl Connect for IntfInsts {
    fn side(&self) -> Side {
        Side::Intfs {
            scalars: self.scalars.clone(),
            vector: true,
            label: self.label(),
        }
    }
}

impl Connect for Wire {
    fn side(&self) -> Side {
        Side::Net(Net::Wire(self.clone()))
    }
}

impl Connect for Const {
    fn side(&self) -> Side {
        Side::Net(Net::Const(self.clone()))
    }
}

impl Connect for Concat {
    fn side(&self) -> Side {
        Side::Net(Net::Concat(self.clone()))
    }
}

impl Connect for Net {
    fn side(&self) -> Side {
        Side::Net(self.clone())
    }
}
