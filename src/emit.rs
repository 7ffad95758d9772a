// SPDX-License-Identifier: Apache-2.0

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;

use crate::mod_inst::ModInst;
use crate::net::{Net, Wire};
use crate::pin::{Dir, Pin};
use crate::scope::Scope;

/// Column where bit ranges end (right-aligned).
const RANGE_COL: usize = 16;
/// Column where port and wire names start.
const NAME_COL: usize = 24;
/// Column where description comments start.
const DESC_COL: usize = 48;

/// Storage class added to `output` port declarations.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OutputType {
    Logic,
    Reg,
}

impl OutputType {
    fn word(self) -> &'static str {
        match self {
            OutputType::Logic => "logic",
            OutputType::Reg => "reg",
        }
    }
}

/// Line writer with an indentation stack and a cursor tracker for
/// column-aligned output. Strings emitted on the same line are joined by
/// a single space unless placed with `put`.
struct Writer {
    out: String,
    indent_stack: Vec<usize>,
    indent_pos: usize,
    cursor: usize,
    new_line: bool,
}

impl Writer {
    fn new() -> Writer {
        Writer {
            out: String::new(),
            indent_stack: Vec::new(),
            indent_pos: 0,
            cursor: 0,
            new_line: true,
        }
    }

    fn reset_indent(&mut self) {
        self.indent_stack.clear();
        self.indent_pos = 0;
        self.new_line = true;
    }

    fn next_line(&mut self) {
        self.out.push('\n');
        self.cursor = 0;
        self.new_line = true;
    }

    fn indent(&mut self) {
        self.indent_stack.push(self.indent_pos);
        self.indent_pos += 4;
    }

    fn dedent(&mut self) {
        self.indent_pos = self.indent_stack.pop().unwrap_or(0);
    }

    fn emit_sep(&mut self, text: &str, sep: &str) {
        let prefix = if self.new_line {
            self.new_line = false;
            " ".repeat(self.indent_pos)
        } else {
            sep.to_string()
        };
        self.out.push_str(&prefix);
        self.out.push_str(text);
        self.cursor += prefix.len() + text.len();
    }

    /// Space-joined emission.
    fn emit(&mut self, text: &str) {
        self.emit_sep(text, " ");
    }

    /// Emission with no joining space.
    fn put(&mut self, text: &str) {
        self.emit_sep(text, "");
    }

    fn emitln(&mut self, text: &str) {
        self.emit(text);
        self.next_line();
    }

    fn putln(&mut self, text: &str) {
        self.put(text);
        self.next_line();
    }

    /// Pads with spaces up to `col`; a cursor already past `col` stays
    /// put.
    fn advance_to(&mut self, col: usize) {
        let col = col.max(self.cursor);
        let pad = " ".repeat(col - self.cursor);
        self.put(&pad);
    }
}

fn ljust(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}

fn rjust(text: &str, width: usize) -> String {
    format!("{:>width$}", text, width = width)
}

/// Verilog generator for an elaborated scope. Emission is pure output:
/// it resolves pin views but does not otherwise change the netlist, and
/// repeated runs produce identical text.
pub struct Verilog {
    scope: Scope,
    output_type: Option<OutputType>,
    autos: bool,
}

impl Verilog {
    pub fn new(scope: &Scope) -> Verilog {
        Verilog {
            scope: scope.clone(),
            output_type: None,
            autos: false,
        }
    }

    /// Adds a storage-class word to output port declarations.
    pub fn output_type(mut self, output_type: OutputType) -> Verilog {
        self.output_type = Some(output_type);
        self
    }

    /// Emits `/*AUTO...*/` placeholder comments for emacs verilog-mode.
    pub fn autos(mut self, autos: bool) -> Verilog {
        self.autos = autos;
        self
    }

    /// Emits the full module: header and ports, wire declarations, and
    /// one instantiation per non-port child.
    pub fn generate_module(&self) -> String {
        let mut w = Writer::new();
        let port_inst = self.port_inst();

        w.emit("module");
        w.emit(&self.scope.name());
        w.emitln("(");
        if self.autos {
            w.emitln("  /*AUTOINOUT*/");
            w.emitln("  /*AUTOOUTPUT*/");
            w.emitln("  /*AUTOINPUT*/");
        }
        let port_pins = self.generate_ports(&mut w, &port_inst);
        w.emitln(");");
        w.next_line();
        if self.autos {
            w.emitln("/*AUTOWIRE*/");
        }

        self.generate_wires(&mut w, &port_pins);
        self.generate_instances(&mut w);
        w.emitln("endmodule");
        w.out
    }

    /// Writes the generated module to a file.
    pub fn emit_to_file(&self, path: &Path) {
        let err_msg = format!("writing Verilog to {:?}", path);
        std::fs::write(path, self.generate_module()).expect(&err_msg);
    }

    /// The unique formal-port pseudo-instance of the scope.
    fn port_inst(&self) -> ModInst {
        let mut ports: Vec<ModInst> = self
            .scope
            .flattened_module_instances()
            .into_iter()
            .filter(|inst| inst.is_port())
            .collect();
        if ports.len() != 1 {
            panic!(
                "value error: module '{}' must have exactly one port instance, found {}",
                self.scope.name(),
                ports.len()
            );
        }
        ports.remove(0)
    }

    /// Emits the port list, deduplicated by formatted net name in
    /// first-occurrence order, and returns the surviving pins for the
    /// wire pass.
    fn generate_ports(&self, w: &mut Writer, port_inst: &ModInst) -> Vec<Pin> {
        let mut uniq: IndexMap<String, Pin> = IndexMap::new();
        for pin in port_inst.get_pins() {
            uniq.insert(pin.net().fname(), pin);
        }
        let port_pins: Vec<Pin> = uniq.into_values().collect();

        if let Some((first, rest)) = port_pins.split_first() {
            w.emit(" ");
            self.generate_port(w, first);
            for pin in rest {
                w.emit(",");
                self.generate_port(w, pin);
            }
        }
        port_pins
    }

    fn generate_port(&self, w: &mut Writer, pin: &Pin) {
        // Boundary inversion: a net the module body receives was recorded
        // as an output of the port pseudo-instance.
        let dir = pin.dir().inverted();
        w.emit(&ljust(dir.as_verilog(), 6));

        match self.output_type {
            Some(output_type) if dir == Dir::Output => {
                w.emit(&ljust(output_type.word(), 5));
            }
            _ => w.emit(&" ".repeat(5)),
        }

        let range = match pin.net() {
            Net::Wire(wire) => wire.root().formatted("", "[{msb}:{lsb}]", "[{msb}:{lsb}]"),
            _ => String::new(),
        };
        w.advance_to(RANGE_COL);
        w.put(&rjust(&range, 6));

        w.advance_to(NAME_COL);
        w.put(&pin.net().fname());

        match pin.net().desc() {
            Some(desc) => self.generate_desc(w, &desc, DESC_COL),
            None => w.next_line(),
        }
    }

    fn generate_desc(&self, w: &mut Writer, desc: &str, col: usize) {
        for line in desc.split('\n') {
            w.advance_to(col);
            w.putln(&format!("// {}", line));
        }
    }

    /// Emits one declaration per internal wire: constants are skipped,
    /// concatenations are exploded into their wires, and anything whose
    /// formatted name matches a port net is omitted. Wires appear once
    /// each, grouped by the interface they traveled through, in
    /// first-seen order.
    fn generate_wires(&self, w: &mut Writer, port_pins: &[Pin]) {
        let port_wires: Vec<String> = port_pins.iter().map(|pin| pin.net().fname()).collect();

        let mut by_intf: IndexMap<Option<String>, Vec<Wire>> = IndexMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for inst in self.scope.flattened_module_instances() {
            if inst.is_port() {
                continue;
            }
            for pin in inst.get_pins() {
                let wires = match pin.net() {
                    Net::Const(_) => continue,
                    Net::Concat(c) => c.wires(),
                    Net::Wire(wire) => vec![wire],
                };
                for wire in wires {
                    let fname = wire.fname();
                    if port_wires.contains(&fname) {
                        continue;
                    }
                    if seen.insert(fname) {
                        by_intf.entry(pin.intf_label()).or_default().push(wire);
                    }
                }
            }
        }

        for wires in by_intf.values() {
            for wire in wires {
                self.generate_wire(w, wire);
            }
        }
    }

    fn generate_wire(&self, w: &mut Writer, wire: &Wire) {
        w.emit(&ljust("wire", 10));

        let range = wire.root().formatted("", "", "[{index}]");
        w.advance_to(RANGE_COL);
        w.put(&rjust(&range, 6));

        w.advance_to(NAME_COL);
        w.put(&wire.fname());
        w.put(";");

        match wire.desc() {
            Some(desc) => self.generate_desc(w, &desc, DESC_COL),
            None => w.next_line(),
        }
    }

    fn generate_instances(&self, w: &mut Writer) {
        for inst in self.scope.flattened_module_instances() {
            if inst.is_port() {
                continue;
            }
            self.generate_instance(w, &inst);
        }
    }

    fn generate_instance(&self, w: &mut Writer, inst: &ModInst) {
        w.next_line();

        if let Some(desc) = inst.desc() {
            self.generate_desc(w, &desc, 0);
        }

        w.emit(&inst.def_name());
        w.emit(&inst.formatted("{name}", "{name}{index}"));

        let pins = inst.get_pins();
        if pins.is_empty() {
            w.emitln("();");
            return;
        }

        w.emit("(");
        w.next_line();
        w.indent();

        self.generate_portmap(w, &pins[0]);
        for pin in &pins[1..] {
            w.putln(",");
            self.generate_portmap(w, pin);
        }
        w.next_line();
        if self.autos {
            w.emitln("/*AUTOINST*/");
        }
        w.putln(");");
        w.dedent();
    }

    fn generate_portmap(&self, w: &mut Writer, pin: &Pin) {
        w.emit(".");
        w.put(&ljust(&pin.fname(), NAME_COL));
        w.emit("(");
        w.emit(&ljust(&pin.net().default_repr(), NAME_COL));
        w.emit(")");
    }

    /// Emits standalone stubs (header-only modules) for the children
    /// selected by instance name or definition name, or for every child
    /// when both filters are `None`. Stub ports keep the recorded pin
    /// directions, with ranges derived from the pin net widths.
    pub fn generate_submodules(
        &self,
        submod_name: Option<&str>,
        inst_name: Option<&str>,
    ) -> String {
        let mut insts: Vec<ModInst> = self
            .scope
            .flattened_module_instances()
            .into_iter()
            .filter(|inst| !inst.is_port())
            .filter(|inst| inst_name.is_none() || inst.name().as_deref() == inst_name)
            .collect();
        if inst_name.is_none() {
            insts.retain(|inst| submod_name.is_none() || inst.def_name() == submod_name.unwrap());
        }

        if insts.is_empty() {
            if let Some(inst_name) = inst_name {
                panic!("value error: instance '{}' not found", inst_name);
            }
            if let Some(submod_name) = submod_name {
                panic!("value error: submodule '{}' not found", submod_name);
            }
            return String::new();
        }

        let mut w = Writer::new();
        for inst in &insts {
            self.generate_submodule(&mut w, inst);
        }
        w.out
    }

    fn generate_submodule(&self, w: &mut Writer, inst: &ModInst) {
        w.reset_indent();
        w.emit("module");
        w.emit(&inst.def_name());
        w.emitln("(");
        let pins = inst.get_pins();
        if let Some((first, rest)) = pins.split_first() {
            w.emit(" ");
            self.generate_submodule_port(w, first);
            for pin in rest {
                w.emit(",");
                self.generate_submodule_port(w, pin);
            }
        }
        w.emitln(");");
        w.emitln("endmodule");
    }

    fn generate_submodule_port(&self, w: &mut Writer, pin: &Pin) {
        let dir = pin.dir();
        w.emit(&ljust(dir.as_verilog(), 6));

        match self.output_type {
            Some(output_type) if dir == Dir::Output => {
                w.emit(&ljust(output_type.word(), 5));
            }
            _ => w.emit(&" ".repeat(5)),
        }

        let width = pin.net().width();
        let range = if width > 1 {
            format!("[{}:0]", width - 1)
        } else {
            String::new()
        };
        w.advance_to(RANGE_COL);
        w.put(&rjust(&range, 6));

        w.advance_to(NAME_COL);
        w.put(&pin.net().fname());

        match pin.net().desc() {
            Some(desc) => self.generate_desc(w, &desc, DESC_COL),
            None => w.next_line(),
        }
    }
}
