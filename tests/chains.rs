// SPDX-License-Identifier: Apache-2.0

use weft::*;

/// A chain threaded through two vector elements: `io > si > a > smid[0]`,
/// `smid[0] > b[0]/'si'`, `b[0]/'so' > smid[1]`, `smid[1] > b[1]/'si'`,
/// `b[1]/'so' > so > io`.
fn chain_top() -> Scope {
    registry::clear();
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().of("A");
        let b = instance().vec(2).of("B");
        let si = wire();
        let so = wire();
        let smid = Wire::vec(2);

        io.drives(&si).drives(&a);
        a.templatize("so").drives(&smid.index(0));
        smid.index(0).drives(&b.index(0).templatize("si"));
        b.index(0).templatize("so").drives(&smid.index(1));
        smid.index(1).drives(&b.index(1).templatize("si"));
        b.index(1).templatize("so").drives(&so).drives(&io);

        bindings![io, a, b, si, so, smid]
    });
    elaborate(&demo, "rtl")
}

#[test]
fn test_chain_through_wires() {
    let top = chain_top();
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 si
, output                so
);

wire             [1:0]  smid;

A a (
    .si                       ( si                       ),
    .so                       ( smid[0]                  )
    );

B b0 (
    .si                       ( smid[0]                  ),
    .so                       ( smid[1]                  )
    );

B b1 (
    .si                       ( smid[1]                  ),
    .so                       ( so                       )
    );
endmodule
"
    );
}

#[test]
fn test_templatized_copies_alias_original_pins() {
    let b = instance().vec(2).of("B");
    let w = Wire::vec(2).named("w");

    // Bindings made through templatized copies land on the originals.
    w.index(0).drives(&b.index(0).templatize("si"));
    b.index(0).templatize("so").drives(&w.index(1));

    let b0 = b.index(0);
    assert_eq!(b0.direct_pins().len(), 2);
    assert_eq!(b0.direct_pins()[0].name(), "si");
    assert_eq!(b0.direct_pins()[1].name(), "so");
    // The pending template does not stick to the original handle.
    assert_eq!(b.index(1).direct_pins().len(), 0);
}

#[test]
fn test_instance_vector_slicing_shares_scalars() {
    let b = instance().vec(4).of("B");
    let view = b.slice(2, 1);
    assert_eq!(view.len(), 2);
    let w = wire().named("w");
    view.bind_net(&w, Dir::Input);
    assert_eq!(b.index(1).direct_pins().len(), 1);
    assert_eq!(b.index(2).direct_pins().len(), 1);
    assert_eq!(b.index(0).direct_pins().len(), 0);
    assert_eq!(b.index(3).direct_pins().len(), 0);
}

#[test]
fn test_vector_net_binding_pins_every_scalar() {
    let b = instance().vec(3).of("B");
    let w = wire().named("w");
    b.templatize("strobe").bind_net(&w, Dir::Input);
    for scalar in b.iter() {
        let pins = scalar.direct_pins();
        assert_eq!(pins.len(), 1);
        assert_eq!(pins[0].name(), "strobe");
    }
}

#[test]
fn test_explicit_generator_indices_are_preserved() {
    let a = instance().indices([2, 5]).of("A");
    a.set_name("a");
    assert_eq!(a.len(), 2);
    assert_eq!(a.index(0).index(), Some(2));
    assert_eq!(a.index(1).index(), Some(5));
    assert_eq!(a.index(0).formatted("{name}", "{name}{index}"), "a2");
    assert_eq!(a.index(1).formatted("{name}", "{name}{index}"), "a5");

    let links = interface().indices([7]).of("cmd_if");
    assert_eq!(links.index(0).index(), Some(7));
}

#[test]
#[should_panic(expected = "index error: instance index 2 out of range")]
fn test_instance_index_out_of_range() {
    let b = instance().vec(2).of("B");
    b.index(2);
}
