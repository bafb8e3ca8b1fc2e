//! Engine results.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One factor of a product-of-powers unit, e.g. `m^-3`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPower {
    pub symbol: String,
    pub exponent: i32,
}

impl UnitPower {
    pub fn new(symbol: impl Into<String>, exponent: i32) -> Self {
        Self {
            symbol: symbol.into(),
            exponent,
        }
    }
}

/// A single value computed by the engine.
///
/// `display` is the engine's own rendering and is shown verbatim; `value` and
/// `unit` are the machine-readable form (value expressed in base units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub display: String,
    pub value: f64,
    #[serde(default)]
    pub unit: Vec<UnitPower>,
}

impl Quantity {
    pub fn new(display: impl Into<String>, value: f64, unit: Vec<UnitPower>) -> Self {
        Self {
            display: display.into(),
            value,
            unit,
        }
    }

    /// Returns true if every unit factor has a zero exponent (or there are none).
    pub fn is_unitless(&self) -> bool {
        self.unit.iter().all(|u| u.exponent == 0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Formats unit powers as a compact product, highest exponent first.
///
/// Zero exponents are skipped; an empty product renders as `1`.
/// `[m^1, s^-2]` renders as `m(s^-2)`.
pub fn format_unit(unit: &[UnitPower]) -> String {
    let mut powers: Vec<&UnitPower> = unit.iter().filter(|u| u.exponent != 0).collect();
    if powers.is_empty() {
        return "1".to_string();
    }
    powers.sort_by(|a, b| b.exponent.cmp(&a.exponent));

    let mut out = String::new();
    for power in powers {
        if power.exponent == 1 {
            out.push_str(&power.symbol);
        } else {
            out.push('(');
            out.push_str(&power.symbol);
            out.push('^');
            out.push_str(&power.exponent.to_string());
            out.push(')');
        }
    }
    out
}
