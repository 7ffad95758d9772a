// SPDX-License-Identifier: Apache-2.0

use weft::*;

fn define_clk_if() -> IntfDef {
    registry::clear();
    let clk_if = IntfDef::new("clk_if");
    clk_if.model("rtl", &["a", "b"], |_scope, ports| {
        let a = ports.get("a");
        let b = ports.get("b");
        let clk = wire();
        let reset = wire();
        a.drives(&clk).drives(&b);
        a.drives(&reset).drives(&b);
        bindings![a, b, clk, reset]
    });
    clk_if
}

#[test]
fn test_broadcast_interface_to_vector() {
    define_clk_if();
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().vec(2).of("A");
        let clk = interface().of("clk_if");
        io.connect(&clk.templatize("{n}")).connect(&a);
        bindings![io, a, clk]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 clk
, input                 reset
);


A a0 (
    .clk                      ( clk                      ),
    .reset                    ( reset                    )
    );

A a1 (
    .clk                      ( clk                      ),
    .reset                    ( reset                    )
    );
endmodule
"
    );
}

#[test]
fn test_broadcast_attaches_one_intfpin_per_scalar() {
    define_clk_if();
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().vec(3).of("A");
        let clk = interface().of("clk_if");
        io.connect(&clk).connect(&a);
        bindings![io, a, clk]
    });
    let top = elaborate(&demo, "rtl");

    let mut checked = false;
    for child in top.module_instances() {
        if let ModChild::List(list) = child {
            assert_eq!(list.len(), 3);
            for scalar in list.iter() {
                let intfpins = scalar.interface_pins();
                assert_eq!(intfpins.len(), 1);
                assert_eq!(intfpins[0].intfinst().name().as_deref(), Some("clk"));
            }
            checked = true;
        }
    }
    assert!(checked);
}

#[test]
fn test_default_templates_prefix_with_instance_name() {
    define_clk_if();
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().of("A");
        let sys_clk = interface().of("clk_if");
        io.connect(&sys_clk).connect(&a);
        bindings![io, a, sys_clk]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 sys_clk_clk
, input                 sys_clk_reset
);


A a (
    .sys_clk_clk              ( sys_clk_clk              ),
    .sys_clk_reset            ( sys_clk_reset            )
    );
endmodule
"
    );
}

#[test]
fn test_vector_vector_binding_zips_elementwise() {
    registry::clear();
    let cmd_if = IntfDef::new("cmd_if");
    cmd_if.signals_model(
        "rtl",
        "
        >  req  0
        <  ack  0
        ",
    );
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let b = instance().vec(2).of("B");
        let links = interface().vec(2).of("cmd_if");
        io.connect(&links).connect(&b);
        bindings![io, b, links]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 links0_req
, output                links0_ack
, input                 links1_req
, output                links1_ack
);


B b0 (
    .links_req                ( links0_req               ),
    .links_ack                ( links0_ack               )
    );

B b1 (
    .links_req                ( links1_req               ),
    .links_ack                ( links1_ack               )
    );
endmodule
"
    );
}

#[test]
#[should_panic(expected = "connection error: vector sizes differ: A(2), ab_if(3)")]
fn test_vector_length_mismatch_fails() {
    let a = instance().vec(2).of("A");
    let ab = interface().vec(3).of("ab_if");
    a.connect(&ab);
}

#[test]
fn test_interface_within_interface() {
    define_clk_if();
    let sys_if = IntfDef::new("sys_if");
    sys_if.model("rtl", &["a", "b"], |_scope, ports| {
        let a = ports.get("a");
        let b = ports.get("b");
        let clk = interface().of("clk_if");
        a.connect(&clk).connect(&b);
        bindings![a, b, clk]
    });

    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let core = instance().of("A");
        let sys = interface().of("sys_if");
        io.connect(&sys.templatize("{n}")).connect(&core);
        bindings![io, core, sys]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 clk
, input                 reset
);


A core (
    .clk                      ( clk                      ),
    .reset                    ( reset                    )
    );
endmodule
"
    );
}

#[test]
fn test_directional_filter_keeps_matching_pins_only() {
    registry::clear();
    let cmd_if = IntfDef::new("cmd_if");
    cmd_if.signals_model(
        "rtl",
        "
        >  req  0
        <  ack  0
        ",
    );
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let link = interface().of("cmd_if");
        // `io > link` keeps only the outputs of the selected modport.
        io.drives(&link);
        bindings![io, link]
    });
    let top = elaborate(&demo, "rtl");
    assert_eq!(
        top.emit_verilog(),
        "\
module Demo (
  input                 link_req
);

endmodule
"
    );
}

#[test]
fn test_modport_selection_by_name() {
    define_clk_if();
    let demo = ModDef::new("Demo");
    demo.model("rtl", &["io"], |_scope, ports| {
        let io = ports.get("io");
        let a = instance().of("A");
        let clk = interface().of("clk_if");
        io.connect(&clk.templatize("{n}"));
        a.bind_intf(&clk, Modport::Named("b".to_string()), Dir::Any);
        bindings![io, a, clk]
    });
    let top = elaborate(&demo, "rtl");
    let text = top.emit_verilog();
    assert!(text.contains("  input                 clk\n"));
    assert!(text.contains(".clk                      ( clk                      )"));
    assert!(text.contains(".reset                    ( reset                    )"));
}
