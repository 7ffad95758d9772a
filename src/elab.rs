// SPDX-License-Identifier: Apache-2.0

use crate::def::ModDef;
use crate::scope::Scope;

/// Elaborates a top-level module: builds the top scope from the named
/// model (which must exist), then expands one level of children.
///
/// Child module instances whose definition lacks the model are left
/// un-elaborated and emit as black boxes. Interface instances must carry
/// the model; their own nested interface instances are expanded as well,
/// so interfaces composed of interfaces resolve to pins.
pub fn elaborate(def: &ModDef, model: impl AsRef<str>) -> Scope {
    let model = model.as_ref();
    let top = def.def.instantiate();
    top.make(model);

    for inst in top.flattened_module_instances() {
        inst.try_make(model);
    }

    for intf in top.flattened_interface_instances() {
        intf.make(model);
        for nested in intf.scope().flattened_interface_instances() {
            nested.make(model);
        }
    }

    top
}
