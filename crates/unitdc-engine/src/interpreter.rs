//! The RPN interpreter.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;
use unitdc_types::{Engine, EngineEvent, OutputCallback, SubmitError};

use crate::error::{EngineError, EngineResult};
use crate::prelude::PRELUDE;
use crate::tokenizer::{Token, Tokenizer};
use crate::units::{UnitDef, UnitSystem};
use crate::value::Value;

/// Stack machine state. Evaluation is not transactional: tokens processed
/// before an error keep their effect on the stack.
#[derive(Default)]
pub struct Interpreter {
    stack: Vec<Value>,
    variables: HashMap<String, Value>,
    units: UnitSystem,
    output: Option<OutputCallback>,
}

impl Interpreter {
    /// An interpreter with no units defined.
    pub fn new() -> Self {
        Self::default()
    }

    /// An interpreter with the built-in prelude already evaluated.
    ///
    /// # Errors
    /// Only fails if the built-in prelude itself is broken.
    pub fn with_prelude() -> EngineResult<Self> {
        let mut interpreter = Self::new();
        interpreter.run(PRELUDE)?;
        Ok(interpreter)
    }

    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn units(&self) -> &UnitSystem {
        &self.units
    }

    /// Evaluates `source` token by token.
    ///
    /// # Errors
    /// Returns the first tokenizer or evaluation error.
    pub fn run(&mut self, source: &str) -> EngineResult<()> {
        let mut tokenizer = Tokenizer::new(source);
        while let Some(token) = tokenizer.next_token()? {
            self.execute(token)?;
        }
        Ok(())
    }

    fn execute(&mut self, token: Token) -> EngineResult<()> {
        match token {
            Token::Number(n) => self.stack.push(Value::unitless(n)),
            Token::Unit(expr) => self.op_unit(&expr)?,
            Token::Add => self.op_additive(Value::try_add)?,
            Token::Sub => self.op_additive(Value::try_sub)?,
            Token::Mul => self.op_binary(Value::product)?,
            Token::Div => self.op_binary(Value::quotient)?,
            Token::Operator(op) => self.op_stack(op)?,
            Token::Store(name) => {
                let name = variable_name(name)?;
                let value = self.pop()?;
                self.variables.insert(name, value);
            }
            Token::Recall(name) => {
                let name = variable_name(name)?;
                let value = self
                    .variables
                    .get(&name)
                    .cloned()
                    .ok_or(EngineError::UndefinedVariable(name))?;
                self.stack.push(value);
            }
            Token::Macro { name, arg } => match name.as_str() {
                "base" => self.units.define_base(&arg)?,
                "derived" => self.op_define_derived(arg)?,
                _ => return Err(EngineError::UndefinedMacro(name)),
            },
            Token::Comment(_) => {}
        }
        Ok(())
    }

    fn emit(&mut self, event: EngineEvent) {
        if let Some(output) = self.output.as_mut() {
            output(event);
        }
    }

    fn pop(&mut self) -> EngineResult<Value> {
        self.stack.pop().ok_or(EngineError::StackUnderflow)
    }

    fn pop_pair(&mut self) -> EngineResult<(Value, Value)> {
        if self.stack.len() < 2 {
            return Err(EngineError::StackUnderflow);
        }
        let rhs = self.pop()?;
        let lhs = self.pop()?;
        Ok((lhs, rhs))
    }

    fn op_unit(&mut self, expr: &str) -> EngineResult<()> {
        let value = self.pop()?;
        let value = if expr == "1" {
            value.strip_unit()
        } else {
            value.apply_unit(self.units.resolve(expr)?)?
        };
        self.stack.push(value);
        Ok(())
    }

    fn op_additive(
        &mut self,
        op: fn(Value, Value) -> EngineResult<Value>,
    ) -> EngineResult<()> {
        let (lhs, rhs) = self.pop_pair()?;
        for warning in offset_warnings([&lhs, &rhs]) {
            self.emit(EngineEvent::Message(warning));
        }
        self.stack.push(op(lhs, rhs)?);
        Ok(())
    }

    fn op_binary(&mut self, op: fn(Value, Value) -> EngineResult<Value>) -> EngineResult<()> {
        let (lhs, rhs) = self.pop_pair()?;
        self.stack.push(op(lhs, rhs)?);
        Ok(())
    }

    fn op_stack(&mut self, op: char) -> EngineResult<()> {
        match op {
            'p' => {
                let top = self.stack.last().ok_or(EngineError::StackUnderflow)?;
                let event = EngineEvent::Quantity(top.to_quantity());
                self.emit(event);
            }
            'n' => {
                let top = self.pop()?;
                self.emit(EngineEvent::Quantity(top.to_quantity()));
            }
            'f' => {
                let list = self.stack.iter().map(Value::to_quantity).collect();
                let warnings = offset_warnings(&self.stack);
                self.emit(EngineEvent::QuantityList(list));
                for warning in warnings {
                    self.emit(EngineEvent::Message(warning));
                }
            }
            'c' => self.stack.clear(),
            'd' => {
                let top = self.stack.last().cloned().ok_or(EngineError::StackUnderflow)?;
                self.stack.push(top);
            }
            'r' => {
                let (lhs, rhs) = self.pop_pair()?;
                self.stack.push(rhs);
                self.stack.push(lhs);
            }
            'v' => {
                let top = self.pop()?;
                self.stack.push(top.sqrt()?);
            }
            'U' => {
                let listing = self.units.describe();
                self.emit(EngineEvent::Message(listing));
            }
            other => {
                return Err(EngineError::InvalidOperand(format!(
                    "unknown operator {other}"
                )));
            }
        }
        Ok(())
    }

    /// `offset scale @derived(sym)`: the offset carries the dimension.
    fn op_define_derived(&mut self, symbol: String) -> EngineResult<()> {
        let (offset, scale) = self.pop_pair()?;
        if !scale.dimension.is_unitless() {
            return Err(EngineError::InvalidOperand(format!(
                "scale of {symbol} must be unitless, got {scale}"
            )));
        }
        self.units.define_derived(UnitDef {
            symbol,
            scale: scale.number,
            offset: offset.number,
            dimension: offset.dimension,
        })
    }
}

fn variable_name(name: String) -> EngineResult<String> {
    if name.is_empty() {
        Err(EngineError::InvalidOperand("missing variable name".into()))
    } else {
        Ok(name)
    }
}

/// One warning per base unit shared by more than one offset display unit.
fn offset_warnings<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<String> {
    let mut by_base: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for def in values
        .into_iter()
        .filter_map(Value::display_unit)
        .filter(|def| def.has_offset())
    {
        for base in def.dimension.symbols() {
            by_base.entry(base).or_default().push(&def.symbol);
        }
    }

    by_base
        .into_iter()
        .filter(|(_, users)| users.len() > 1)
        .map(|(base, mut users)| {
            users.dedup();
            format!(
                "Warning: {base} is used in multiple quantities with an offset. \
                 This may lead to unexpected results. Affected units: [{}]",
                users.join(", ")
            )
        })
        .collect()
}

impl Engine for Interpreter {
    fn register_output(&mut self, output: OutputCallback) {
        self.output = Some(output);
    }

    fn submit(&mut self, text: &str) -> Result<(), SubmitError> {
        debug!(bytes = text.len(), depth = self.stack.len(), "Evaluating");
        self.run(text).map_err(|err| {
            debug!(error = %err, "Evaluation failed");
            SubmitError::new(err.to_string())
        })
    }
}
