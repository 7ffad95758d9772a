// SPDX-License-Identifier: Apache-2.0

//! Interfaces declared from a signal table: one line per signal,
//! `<op> <name> <width>`, where the op binds the wire between the two
//! modports the way the connection operators do.

use itertools::Itertools;
use regex::Regex;

use crate::connect::Connect;
use crate::def::IntfDef;
use crate::net::Wire;

impl IntfDef {
    /// Installs a model named `model` with modports `(a, b)` parsed from
    /// a signal table. Each non-empty line reads `<op> <name> <width>`:
    /// `>` binds `a > w > b`, `<` binds `a < w < b`, `<>` binds
    /// `a <> w <> b`. Widths follow the wire generator rule, so a width
    /// below 1 yields a scalar wire.
    pub fn signals_model(&self, model: impl AsRef<str>, signals: impl AsRef<str>) -> &Self {
        let text = signals.as_ref().to_string();
        self.model(model.as_ref(), &["a", "b"], move |_scope, ports| {
            let a = ports.get("a");
            let b = ports.get("b");
            let sep = Regex::new(r"\s+").unwrap();
            for raw in text.lines() {
                let line = raw.trim();
                if line.is_empty() {
                    continue;
                }
                let Some((op, sig, width)) = sep.split(line).collect_tuple() else {
                    panic!("value error: malformed signal line '{}'", line);
                };
                let width: usize = width
                    .parse()
                    .unwrap_or_else(|_| panic!("value error: invalid signal width '{}'", width));
                let w = Wire::vec(width).named(sig);
                match op {
                    ">" => {
                        a.drives(&w).drives(&b);
                    }
                    "<" => {
                        a.driven_by(&w).driven_by(&b);
                    }
                    "<>" => {
                        a.links(&w).links(&b);
                    }
                    other => panic!("value error: invalid signal op '{}'", other),
                }
            }
            Vec::new()
        });
        self
    }
}
