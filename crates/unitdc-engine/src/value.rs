//! Stack values.

use std::fmt;

use unitdc_types::Quantity;

use crate::error::{EngineError, EngineResult};
use crate::units::{Dimension, Unit, UnitDef};

/// A number in base units, plus the unit it should be shown in.
///
/// `number` is always expressed in base units. `display` is only honoured
/// while its dimension matches the value's dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub number: f64,
    pub dimension: Dimension,
    pub display: Option<UnitDef>,
}

impl Value {
    pub fn unitless(number: f64) -> Self {
        Self {
            number,
            dimension: Dimension::unitless(),
            display: None,
        }
    }

    /// Display unit, if it still matches the dimension.
    pub fn display_unit(&self) -> Option<&UnitDef> {
        self.display
            .as_ref()
            .filter(|def| def.dimension == self.dimension)
    }

    /// The number as shown to the user.
    pub fn shown_number(&self) -> f64 {
        self.display_unit()
            .map_or(self.number, |def| def.from_base(self.number))
    }

    /// Drops the unit, keeping the base-unit number.
    #[must_use]
    pub fn strip_unit(self) -> Self {
        Self::unitless(self.number)
    }

    /// Attaches `unit` to a unitless value, or switches the display unit of
    /// a value with the same dimension.
    ///
    /// # Errors
    /// Fails with `IncompatibleUnits` when the dimensions differ.
    pub fn apply_unit(self, unit: Unit) -> EngineResult<Self> {
        match unit {
            Unit::Base(symbol) => {
                let dimension = Dimension::base(&symbol);
                if self.dimension.is_unitless() || self.dimension == dimension {
                    Ok(Self {
                        number: self.number,
                        dimension,
                        display: None,
                    })
                } else {
                    Err(incompatible(&self.dimension, &dimension))
                }
            }
            Unit::Derived(def) => {
                if self.dimension == def.dimension {
                    Ok(Self {
                        display: Some(def),
                        ..self
                    })
                } else if self.dimension.is_unitless() {
                    Ok(Self {
                        number: def.to_base(self.number),
                        dimension: def.dimension.clone(),
                        display: Some(def),
                    })
                } else {
                    Err(incompatible(&self.dimension, &def.dimension))
                }
            }
        }
    }

    /// Sum of two values with the same dimension. Keeps the right display unit.
    ///
    /// # Errors
    /// Fails with `IncompatibleUnits` when the dimensions differ.
    pub fn try_add(self, rhs: Self) -> EngineResult<Self> {
        self.additive(rhs, 1.0)
    }

    /// Difference of two values with the same dimension.
    ///
    /// # Errors
    /// Fails with `IncompatibleUnits` when the dimensions differ.
    pub fn try_sub(self, rhs: Self) -> EngineResult<Self> {
        self.additive(rhs, -1.0)
    }

    fn additive(self, rhs: Self, sign: f64) -> EngineResult<Self> {
        if self.dimension != rhs.dimension {
            return Err(incompatible(&self.dimension, &rhs.dimension));
        }
        Ok(Self {
            number: self.number + sign * rhs.number,
            dimension: self.dimension,
            display: rhs.display,
        })
    }

    /// # Errors
    /// Fails when a unit exponent overflows.
    pub fn product(self, rhs: Self) -> EngineResult<Self> {
        Ok(Self {
            number: self.number * rhs.number,
            dimension: self.dimension.try_mul(rhs.dimension)?,
            display: rhs.display,
        })
    }

    /// # Errors
    /// Fails when a unit exponent overflows.
    pub fn quotient(self, rhs: Self) -> EngineResult<Self> {
        Ok(Self {
            number: self.number / rhs.number,
            dimension: self.dimension.try_div(rhs.dimension)?,
            display: rhs.display,
        })
    }

    /// Square root in base units.
    ///
    /// # Errors
    /// Fails for negative numbers and for dimensions with odd exponents.
    pub fn sqrt(self) -> EngineResult<Self> {
        if self.number < 0.0 {
            return Err(EngineError::InvalidOperand(format!(
                "square root of negative value {self}"
            )));
        }
        let dimension = self.dimension.sqrt().ok_or_else(|| {
            EngineError::InvalidOperand(format!("square root of unit {}", self.dimension))
        })?;
        Ok(Self {
            number: self.number.sqrt(),
            dimension,
            display: None,
        })
    }

    pub fn to_quantity(&self) -> Quantity {
        Quantity::new(self.to_string(), self.number, self.dimension.powers())
    }
}

fn incompatible(left: &Dimension, right: &Dimension) -> EngineError {
    EngineError::IncompatibleUnits(format!("{left} and {right}"))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_unit() {
            Some(def) => write!(f, "{} ({})", self.shown_number(), def.symbol),
            None => write!(f, "{} ({})", self.number, self.dimension),
        }
    }
}
