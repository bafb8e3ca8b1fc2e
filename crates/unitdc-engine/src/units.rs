//! Dimensions and the unit registry.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Write as _};
use std::iter;

use unitdc_types::{UnitPower, format_unit};

use crate::error::{EngineError, EngineResult};

/// Metric prefixes recognised in front of any known unit symbol.
const PREFIXES: &[(char, f64)] = &[
    ('k', 1e3),
    ('c', 1e-2),
    ('d', 1e-1),
    ('m', 1e-3),
    ('u', 1e-6),
    ('n', 1e-9),
];

/// A product of base-unit powers. Zero exponents are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimension(BTreeMap<String, i32>);

impl Dimension {
    pub fn unitless() -> Self {
        Self::default()
    }

    pub fn base(symbol: &str) -> Self {
        Self(BTreeMap::from([(symbol.to_string(), 1)]))
    }

    pub fn is_unitless(&self) -> bool {
        self.0.is_empty()
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn combine(mut self, rhs: Self, sign: i32) -> EngineResult<Self> {
        for (symbol, exponent) in rhs.0 {
            let entry = self.0.entry(symbol).or_insert(0);
            let current = *entry;
            *entry = sign
                .checked_mul(exponent)
                .and_then(|delta| current.checked_add(delta))
                .ok_or_else(|| {
                    EngineError::InvalidOperand("unit exponent out of range".to_string())
                })?;
        }
        self.0.retain(|_, e| *e != 0);
        Ok(self)
    }

    /// Product of two dimensions.
    ///
    /// # Errors
    /// Fails when an exponent leaves the `i32` range.
    pub fn try_mul(self, rhs: Self) -> EngineResult<Self> {
        self.combine(rhs, 1)
    }

    /// Quotient of two dimensions.
    ///
    /// # Errors
    /// Fails when an exponent leaves the `i32` range.
    pub fn try_div(self, rhs: Self) -> EngineResult<Self> {
        self.combine(rhs, -1)
    }

    /// Halves every exponent. Fails if any exponent is odd.
    pub fn sqrt(&self) -> Option<Self> {
        self.0
            .iter()
            .map(|(s, e)| (e % 2 == 0).then(|| (s.clone(), e / 2)))
            .collect::<Option<BTreeMap<_, _>>>()
            .map(Self)
    }

    pub fn powers(&self) -> Vec<UnitPower> {
        self.0
            .iter()
            .map(|(symbol, exponent)| UnitPower::new(symbol.clone(), *exponent))
            .collect()
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_unit(&self.powers()))
    }
}

/// A named unit: `base = value * scale + offset`.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitDef {
    pub symbol: String,
    pub scale: f64,
    pub offset: f64,
    pub dimension: Dimension,
}

impl UnitDef {
    fn base(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            scale: 1.0,
            offset: 0.0,
            dimension: Dimension::base(symbol),
        }
    }

    pub fn has_offset(&self) -> bool {
        self.offset != 0.0
    }

    pub fn to_base(&self, number: f64) -> f64 {
        number * self.scale + self.offset
    }

    pub fn from_base(&self, number: f64) -> f64 {
        (number - self.offset) / self.scale
    }
}

/// A resolved `(…)` unit expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    Base(String),
    Derived(UnitDef),
}

impl Unit {
    fn into_def(self) -> UnitDef {
        match self {
            Unit::Base(symbol) => UnitDef::base(&symbol),
            Unit::Derived(def) => def,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct UnitSystem {
    base: BTreeSet<String>,
    derived: BTreeMap<String, UnitDef>,
}

impl UnitSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_defined(&self, symbol: &str) -> bool {
        self.base.contains(symbol) || self.derived.contains_key(symbol)
    }

    fn ensure_new(&self, symbol: &str) -> EngineResult<()> {
        let valid = !symbol.is_empty()
            && symbol.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid {
            return Err(EngineError::InvalidOperand(format!(
                "invalid unit symbol {symbol:?}"
            )));
        }
        if self.is_defined(symbol) {
            return Err(EngineError::AlreadyDefined(symbol.to_string()));
        }
        Ok(())
    }

    /// Registers a new base unit.
    ///
    /// # Errors
    /// Fails if `symbol` is already defined or not a plain name.
    pub fn define_base(&mut self, symbol: &str) -> EngineResult<()> {
        self.ensure_new(symbol)?;
        self.base.insert(symbol.to_string());
        Ok(())
    }

    /// Registers a derived unit.
    ///
    /// # Errors
    /// Fails if the symbol is already defined, not a plain name, or the
    /// scale is zero.
    pub fn define_derived(&mut self, def: UnitDef) -> EngineResult<()> {
        self.ensure_new(&def.symbol)?;
        if def.scale == 0.0 || !def.scale.is_finite() {
            return Err(EngineError::InvalidOperand(format!(
                "scale of {} must be finite and non-zero",
                def.symbol
            )));
        }
        self.derived.insert(def.symbol.clone(), def);
        Ok(())
    }

    fn lookup(&self, symbol: &str) -> Option<Unit> {
        if self.base.contains(symbol) {
            return Some(Unit::Base(symbol.to_string()));
        }
        self.derived.get(symbol).cloned().map(Unit::Derived)
    }

    /// Looks up a symbol, falling back to a metric prefix on a known unit.
    fn lookup_prefixed(&self, symbol: &str) -> Option<Unit> {
        if let Some(unit) = self.lookup(symbol) {
            return Some(unit);
        }

        let mut chars = symbol.chars();
        let first = chars.next()?;
        let rest = chars.as_str();
        let (_, factor) = PREFIXES.iter().find(|(p, _)| *p == first)?;
        if rest.is_empty() {
            return None;
        }

        let def = self.lookup(rest)?.into_def();
        if def.has_offset() {
            return None;
        }
        Some(Unit::Derived(UnitDef {
            symbol: symbol.to_string(),
            scale: def.scale * factor,
            offset: 0.0,
            dimension: def.dimension,
        }))
    }

    /// Resolves a unit expression such as `km`, `m/s` or `g*m/s/s`.
    ///
    /// Terms combine left to right. Units with an offset cannot be combined.
    ///
    /// # Errors
    /// Fails on unknown symbols, empty terms, or offset units in a product.
    pub fn resolve(&self, expr: &str) -> EngineResult<Unit> {
        if !expr.contains(['*', '/']) {
            return self
                .lookup_prefixed(expr)
                .ok_or_else(|| EngineError::UndefinedUnit(expr.to_string()));
        }

        let mut result: Option<UnitDef> = None;
        let mut op = '*';
        let mut term = String::new();
        for ch in expr.chars().chain(iter::once('*')) {
            if ch != '*' && ch != '/' {
                term.push(ch);
                continue;
            }

            let def = self
                .lookup_prefixed(&term)
                .ok_or_else(|| EngineError::UndefinedUnit(term.clone()))?
                .into_def();
            if def.has_offset() {
                return Err(EngineError::InvalidOperand(format!(
                    "offset unit {} in compound unit {expr}",
                    def.symbol
                )));
            }

            result = Some(match result {
                None => def,
                Some(acc) if op == '*' => UnitDef {
                    scale: acc.scale * def.scale,
                    dimension: acc.dimension.try_mul(def.dimension)?,
                    ..acc
                },
                Some(acc) => UnitDef {
                    scale: acc.scale / def.scale,
                    dimension: acc.dimension.try_div(def.dimension)?,
                    ..acc
                },
            });
            op = ch;
            term.clear();
        }

        let def = result.ok_or_else(|| EngineError::UndefinedUnit(expr.to_string()))?;
        Ok(Unit::Derived(UnitDef {
            symbol: expr.to_string(),
            ..def
        }))
    }

    /// Human-readable listing of every defined unit.
    pub fn describe(&self) -> String {
        let base: Vec<&str> = self.base.iter().map(String::as_str).collect();
        let mut out = format!("Base units: {}", base.join(" "));

        let mut derived: Vec<&UnitDef> = self.derived.values().collect();
        derived.sort_by(|a, b| {
            a.dimension
                .to_string()
                .cmp(&b.dimension.to_string())
                .then_with(|| a.symbol.cmp(&b.symbol))
        });
        out.push_str("\nDerived units:");
        for def in derived {
            let _ = write!(out, "\n  {} = {} ({})", def.symbol, def.scale, def.dimension);
            if def.has_offset() {
                let _ = write!(out, " + {}", def.offset);
            }
        }
        out
    }
}
