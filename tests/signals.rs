// SPDX-License-Identifier: Apache-2.0

use weft::*;

#[test]
fn test_interface_declared_by_table() {
    registry::clear();
    let ab_if = IntfDef::new("ab_if");
    ab_if.signals_model(
        "rtl",
        "
        >   address 8
        <>  data    8
        >   ren     1
        >   wen     0
        ",
    );
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().of("A");
        let bus = interface().of("ab_if");
        io.connect(&bus.templatize("{n}")).connect(&a);
        bindings![io, a, bus]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input          [7:0]  address
, inout          [7:0]  data
, input          [0:0]  ren
, input                 wen
);


A a (
    .address                  ( address[7:0]             ),
    .data                     ( data[7:0]                ),
    .ren                      ( ren[0]                   ),
    .wen                      ( wen                      )
    );
endmodule
"
    );
}

#[test]
fn test_zero_width_signal_collapses_to_scalar() {
    registry::clear();
    let ab_if = IntfDef::new("ab_if");
    ab_if.signals_model("rtl", "> wen 0");
    let inst = interface().of("ab_if");
    inst.set_name("bus");
    inst.make("rtl");

    let proxy = inst
        .scope()
        .flattened_module_instances()
        .into_iter()
        .find(|p| p.name().as_deref() == Some("a"))
        .unwrap();
    let pins = proxy.get_pins();
    assert_eq!(pins.len(), 1);
    match pins[0].net() {
        Net::Wire(w) => {
            assert!(w.is_scalar());
            assert_eq!(w.width(), 1);
        }
        _ => panic!("expected a wire"),
    }
}

#[test]
fn test_signal_ops_set_directions() {
    registry::clear();
    let mix_if = IntfDef::new("mix_if");
    mix_if.signals_model(
        "rtl",
        "
        >   down 0
        <   up   0
        <>  both 0
        ",
    );
    let inst = interface().of("mix_if");
    inst.set_name("m");
    inst.make("rtl");

    let dirs_of = |port: &str| -> Vec<Dir> {
        inst.scope()
            .flattened_module_instances()
            .into_iter()
            .find(|p| p.name().as_deref() == Some(port))
            .unwrap()
            .get_pins()
            .iter()
            .map(|pin| pin.dir())
            .collect()
    };

    assert_eq!(dirs_of("a"), vec![Dir::Output, Dir::Input, Dir::InOut]);
    assert_eq!(dirs_of("b"), vec![Dir::Input, Dir::Output, Dir::InOut]);
}

#[test]
#[should_panic(expected = "value error: invalid signal op '>>'")]
fn test_invalid_signal_op_fails() {
    registry::clear();
    let bad_if = IntfDef::new("bad_if");
    bad_if.signals_model("rtl", ">> x 1");
    interface().of("bad_if").make("rtl");
}

#[test]
#[should_panic(expected = "value error: malformed signal line 'lonely'")]
fn test_malformed_signal_line_fails() {
    registry::clear();
    let bad_if = IntfDef::new("bad_if");
    bad_if.signals_model("rtl", "lonely");
    interface().of("bad_if").make("rtl");
}
