// SPDX-License-Identifier: Apache-2.0

use std::cell::RefCell;
use std::rc::Rc;

use itertools::Itertools;
use num_bigint::BigUint;

/// Radix used when printing a constant.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Radix {
    Bin,
    Hex,
    Dec,
}

pub(crate) struct WireCore {
    pub(crate) name: Option<String>,
    /// `None` for a scalar wire. Slices keep the index values of the wire
    /// they were taken from, so a slice prints its original bit positions.
    pub(crate) indices: Option<Vec<usize>>,
    /// Root of the slice chain; `None` means this wire is its own root.
    pub(crate) parent: Option<Rc<RefCell<WireCore>>>,
    /// Naming template, rewritten when the wire travels through an
    /// interface binding.
    pub(crate) template: String,
    pub(crate) desc: Option<String>,
}

/// A named signal, scalar or vector. `Wire` is a handle: clones, slices,
/// and pins all refer to the same underlying wire, so renaming it (or
/// rewriting its template during interface expansion) is visible
/// everywhere it is connected.
#[derive(Clone)]
pub struct Wire {
    pub(crate) core: Rc<RefCell<WireCore>>,
}

impl Wire {
    pub(crate) fn from_parts(
        name: Option<String>,
        indices: Option<Vec<usize>>,
        parent: Option<Rc<RefCell<WireCore>>>,
    ) -> Wire {
        Wire {
            core: Rc::new(RefCell::new(WireCore {
                name,
                indices,
                parent,
                template: "{name}".to_string(),
                desc: None,
            })),
        }
    }

    /// Creates an anonymous scalar wire.
    pub fn scalar() -> Wire {
        Wire::from_parts(None, None, None)
    }

    /// Creates an anonymous vector wire with indices `0..size`. A size
    /// below 1 collapses to a scalar.
    pub fn vec(size: usize) -> Wire {
        if size < 1 {
            Wire::scalar()
        } else {
            Wire::from_parts(None, Some((0..size).collect()), None)
        }
    }

    /// Creates a vector wire with indices `0..=msb`.
    pub fn with_msb(msb: usize) -> Wire {
        Wire::from_parts(None, Some((0..=msb).collect()), None)
    }

    /// Creates a vector wire with the given index values.
    pub fn with_indices(indices: impl IntoIterator<Item = usize>) -> Wire {
        Wire::from_parts(None, Some(indices.into_iter().collect()), None)
    }

    /// Sets the base name and returns the wire, for use at construction.
    pub fn named(self, name: impl AsRef<str>) -> Wire {
        self.core.borrow_mut().name = Some(name.as_ref().to_string());
        self
    }

    /// Attaches a description, printed by the emitter as an aligned
    /// comment.
    pub fn with_desc(self, desc: impl AsRef<str>) -> Wire {
        self.core.borrow_mut().desc = Some(desc.as_ref().to_string());
        self
    }

    /// Returns the base name: this wire's own name, or the root's if this
    /// is a slice.
    pub fn name(&self) -> Option<String> {
        if let Some(name) = &self.core.borrow().name {
            return Some(name.clone());
        }
        let root = self.root_core();
        let root_name = root.borrow().name.clone();
        root_name
    }

    pub fn set_name(&self, name: impl AsRef<str>) {
        self.core.borrow_mut().name = Some(name.as_ref().to_string());
    }

    pub fn desc(&self) -> Option<String> {
        self.core.borrow().desc.clone()
    }

    /// Full formatted name: the naming template applied to the base name.
    pub fn fname(&self) -> String {
        let template = self.core.borrow().template.clone();
        if template.contains("{name}") {
            let name = self
                .name()
                .unwrap_or_else(|| panic!("value error: wire has no name"));
            template.replace("{name}", &name)
        } else {
            template
        }
    }

    pub(crate) fn set_template(&self, template: String) {
        self.core.borrow_mut().template = template;
    }

    fn root_core(&self) -> Rc<RefCell<WireCore>> {
        let mut core = self.core.clone();
        loop {
            let parent = core.borrow().parent.clone();
            match parent {
                Some(p) => core = p,
                None => return core,
            }
        }
    }

    /// Returns the root of the slice chain (the wire itself if not a
    /// slice). The root carries the full index range used for printing
    /// declarations.
    pub fn root(&self) -> Wire {
        Wire {
            core: self.root_core(),
        }
    }

    pub fn is_scalar(&self) -> bool {
        self.core.borrow().indices.is_none()
    }

    /// Index values of a vector wire, `None` for a scalar. Slices keep
    /// the index values of the wire they were cut from.
    pub fn indices(&self) -> Option<Vec<usize>> {
        self.core.borrow().indices.clone()
    }

    /// Whether this wire is the root of its slice chain.
    pub fn is_root(&self) -> bool {
        self.core.borrow().parent.is_none()
    }

    /// Bit width: 1 for a scalar, else the number of indices.
    pub fn width(&self) -> usize {
        match &self.core.borrow().indices {
            None => 1,
            Some(indices) => indices.len(),
        }
    }

    /// Selects a single bit. The result is a new wire whose only index is
    /// the selected original index, parented to this wire's root.
    pub fn index(&self, key: usize) -> Wire {
        let core = self.core.borrow();
        let indices = core
            .indices
            .as_ref()
            .unwrap_or_else(|| panic!("index error: scalar wire is not indexable"));
        if key >= indices.len() {
            panic!("index error: wire index {} out of range", key);
        }
        let selected = vec![indices[key]];
        drop(core);
        Wire::from_parts(None, Some(selected), Some(self.root_core()))
    }

    /// Verilog-style slice `[msb:lsb]`, both bounds inclusive. `msb`
    /// defaults to the highest valid position and `lsb` to the lowest.
    pub fn slice(&self, msb: impl Into<Option<usize>>, lsb: impl Into<Option<usize>>) -> Wire {
        let core = self.core.borrow();
        let indices = core
            .indices
            .as_ref()
            .unwrap_or_else(|| panic!("index error: scalar wire is not indexable"));
        let msb = msb.into().unwrap_or(indices.len() - 1);
        let lsb = lsb.into().unwrap_or(0);
        if msb >= indices.len() || lsb >= indices.len() {
            panic!("index error: wire index out of range");
        }
        if msb < lsb {
            panic!("index error: msb less than lsb");
        }
        let selected = indices[lsb..=msb].to_vec();
        drop(core);
        Wire::from_parts(None, Some(selected), Some(self.root_core()))
    }

    /// Returns `n` independent clones. Each clone is a root wire of its
    /// own, not a slice of the original.
    pub fn replicate(&self, n: usize) -> Vec<Wire> {
        let core = self.core.borrow();
        (0..n)
            .map(|_| {
                Wire {
                    core: Rc::new(RefCell::new(WireCore {
                        name: core.name.clone(),
                        indices: core.indices.clone(),
                        parent: None,
                        template: core.template.clone(),
                        desc: core.desc.clone(),
                    })),
                }
            })
            .collect()
    }

    /// Formatted representation with one template per shape: `fmt0` for
    /// scalars, `fmt1` for single-bit vectors, `fmt2` for wider vectors.
    /// Substitution keys are `{name}`, `{index}`, `{msb}`, `{lsb}`; for a
    /// multi-bit vector `{index}` is `msb:lsb`.
    pub fn formatted(&self, fmt0: &str, fmt1: &str, fmt2: &str) -> String {
        let indices = self.indices();
        let (fmt, index, msb, lsb) = match &indices {
            None => (fmt0, String::new(), String::new(), String::new()),
            Some(indices) if indices.len() == 1 => {
                let index = indices[0].to_string();
                (fmt1, index.clone(), index.clone(), index)
            }
            Some(indices) => {
                let lsb = indices[0];
                let msb = indices[indices.len() - 1];
                (fmt2, format!("{}:{}", msb, lsb), msb.to_string(), lsb.to_string())
            }
        };
        let mut out = fmt.to_string();
        if out.contains("{name}") {
            out = out.replace("{name}", &self.fname());
        }
        out.replace("{index}", &index)
            .replace("{msb}", &msb)
            .replace("{lsb}", &lsb)
    }

    pub fn default_repr(&self) -> String {
        self.formatted("{name}", "{name}[{index}]", "{name}[{index}]")
    }
}

/// A sized constant with a printing radix.
#[derive(Clone)]
pub struct Const {
    size: usize,
    val: BigUint,
    radix: Radix,
}

impl Const {
    pub fn new(size: usize, val: impl Into<BigUint>, radix: Radix) -> Const {
        let val = val.into();
        let limit = BigUint::from(1u8) << size;
        if val >= limit {
            panic!(
                "value error: constant value {} does not fit in {} bits",
                val, size
            );
        }
        Const { size, val, radix }
    }

    pub fn width(&self) -> usize {
        self.size
    }

    pub fn formatted(&self) -> String {
        self.formatted_as(self.radix)
    }

    pub fn formatted_as(&self, radix: Radix) -> String {
        match radix {
            Radix::Bin => {
                let digits = format!("{:b}", self.val);
                format!("{}'b{:0>width$}", self.size, digits, width = self.size)
            }
            Radix::Hex => {
                let digits = format!("{:x}", self.val);
                format!("{}'h{:0>width$}", self.size, digits, width = self.size.div_ceil(4))
            }
            Radix::Dec => format!("{}'d{}", self.size, self.val),
        }
    }
}

/// An ordered concatenation of nets, printed as `{a, b, ...}`.
#[derive(Clone)]
pub struct Concat {
    nets: Vec<Net>,
}

impl Concat {
    pub fn new(nets: Vec<Net>) -> Concat {
        Concat { nets }
    }

    /// Total width: the sum of the children's widths.
    pub fn width(&self) -> usize {
        self.nets.iter().map(|net| net.width()).sum()
    }

    /// The `Wire` children only, in order.
    pub fn wires(&self) -> Vec<Wire> {
        self.nets
            .iter()
            .filter_map(|net| match net {
                Net::Wire(wire) => Some(wire.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn formatted(&self) -> String {
        format!(
            "{{{}}}",
            self.nets.iter().map(|net| net.default_repr()).join(", ")
        )
    }
}

/// Anything that can sit on the net side of a connection.
#[derive(Clone)]
pub enum Net {
    Wire(Wire),
    Const(Const),
    Concat(Concat),
}

impl Net {
    pub fn width(&self) -> usize {
        match self {
            Net::Wire(wire) => wire.width(),
            Net::Const(c) => c.width(),
            Net::Concat(c) => c.width(),
        }
    }

    pub fn default_repr(&self) -> String {
        match self {
            Net::Wire(wire) => wire.default_repr(),
            Net::Const(c) => c.formatted(),
            Net::Concat(c) => c.formatted(),
        }
    }

    /// The base name, for wires. Constants and concatenations have none,
    /// which is why a pin over one of them needs an explicit port name.
    pub(crate) fn try_name(&self) -> Option<String> {
        match self {
            Net::Wire(wire) => wire.name(),
            _ => None,
        }
    }

    /// Formatted net name as used in port lists and wire dedup.
    pub(crate) fn fname(&self) -> String {
        match self {
            Net::Wire(wire) => wire.fname(),
            Net::Const(c) => c.formatted(),
            Net::Concat(c) => c.formatted(),
        }
    }

    pub(crate) fn desc(&self) -> Option<String> {
        match self {
            Net::Wire(wire) => wire.desc(),
            _ => None,
        }
    }
}

impl From<Wire> for Net {
    fn from(wire: Wire) -> Net {
        Net::Wire(wire)
    }
}

impl From<&Wire> for Net {
    fn from(wire: &Wire) -> Net {
        Net::Wire(wire.clone())
    }
}

impl From<Const> for Net {
    fn from(c: Const) -> Net {
        Net::Const(c)
    }
}

impl From<&Const> for Net {
    fn from(c: &Const) -> Net {
        Net::Const(c.clone())
    }
}

impl From<Concat> for Net {
    fn from(c: Concat) -> Net {
        Net::Concat(c)
    }
}

impl From<&Concat> for Net {
    fn from(c: &Concat) -> Net {
        Net::Concat(c.clone())
    }
}

/// Creates an anonymous scalar wire.
pub fn wire() -> Wire {
    Wire::scalar()
}

/// Creates a constant net.
pub fn constant(size: usize, val: impl Into<BigUint>, radix: Radix) -> Const {
    Const::new(size, val, radix)
}

/// Concatenates nets, most significant first.
pub fn concat(nets: Vec<Net>) -> Concat {
    Concat::new(nets)
}
