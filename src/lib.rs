// SPDX-License-Identifier: Apache-2.0

mod net;
pub use net::{Concat, Const, Net, Radix, Wire, concat, constant, wire};

mod pin;
pub use pin::{Dir, IntfPin, Modport, Pin};

pub mod registry;
pub use registry::Kind;

mod def;
pub use def::{Binding, Bindings, Def, IntfDef, ModDef, ModelBuilder};

mod scope;
pub use scope::{IntfChild, ModChild, Ports, Scope};

mod mod_inst;
pub use mod_inst::{ModInst, ModInsts};

mod intf_inst;
pub use intf_inst::{IntfInst, IntfInsts};

mod connect;
pub use connect::{Connect, Side};

mod gens;
pub use gens::{IntfGen, IntfVecGen, ModGen, ModVecGen, instance, interface};

mod elab;
pub use elab::elaborate;

mod emit;
pub use emit::{OutputType, Verilog};

mod signals;
