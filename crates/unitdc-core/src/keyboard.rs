//! Virtual keyboard model.
//!
//! The keyboard is plain data: a grid of columns, each key carrying a label
//! and the action it triggers. Front-ends render the grid and hand pressed
//! keys to `Session::press`; they never interpret key semantics themselves.

use std::fmt;

/// Syntactic class of a token inserted by the keyboard.
///
/// Consecutive tokens of the same type are concatenated; a type change
/// inserts a separating space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenType {
    Operator,
    LiteralNum,
    Unit,
}

/// Metric prefix fused into the next unit token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitModifier {
    Kilo,
    Centi,
    Deci,
    Milli,
    Micro,
    Nano,
}

impl UnitModifier {
    pub const ALL: [UnitModifier; 6] = [
        UnitModifier::Kilo,
        UnitModifier::Centi,
        UnitModifier::Deci,
        UnitModifier::Milli,
        UnitModifier::Micro,
        UnitModifier::Nano,
    ];

    /// Prefix symbol as written inside a unit token.
    pub fn symbol(self) -> &'static str {
        match self {
            UnitModifier::Kilo => "k",
            UnitModifier::Centi => "c",
            UnitModifier::Deci => "d",
            UnitModifier::Milli => "m",
            UnitModifier::Micro => "u",
            UnitModifier::Nano => "n",
        }
    }
}

impl fmt::Display for UnitModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Transcript-level actions that bypass token type tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UiAction {
    AppendSpace,
    AppendNewline,
    Backspace,
    Clear,
    Submit,
}

/// What pressing a key does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Insert a token into the active input.
    Token { text: String, kind: TokenType },
    /// Toggle a unit modifier.
    Modifier(UnitModifier),
    /// Perform a UI action.
    Ui(UiAction),
}

/// A single keyboard key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub label: String,
    pub action: KeyAction,
}

impl Key {
    pub fn operator(token: &str) -> Self {
        Self::token(token, TokenType::Operator, token.to_string())
    }

    pub fn number(token: &str) -> Self {
        Self::token(token, TokenType::LiteralNum, token.to_string())
    }

    pub fn unit(symbol: &str) -> Self {
        Self::token(symbol, TokenType::Unit, format!("({symbol})"))
    }

    pub fn modifier(modifier: UnitModifier) -> Self {
        Self {
            label: format!("({modifier}*)"),
            action: KeyAction::Modifier(modifier),
        }
    }

    pub fn ui(action: UiAction, label: &str) -> Self {
        Self {
            label: label.to_string(),
            action: KeyAction::Ui(action),
        }
    }

    fn token(text: &str, kind: TokenType, label: String) -> Self {
        Self {
            label,
            action: KeyAction::Token {
                text: text.to_string(),
                kind,
            },
        }
    }
}

/// A column-major grid of keys.
#[derive(Debug, Clone)]
pub struct KeyboardLayout {
    columns: Vec<Vec<Key>>,
}

impl Default for KeyboardLayout {
    fn default() -> Self {
        Self::standard()
    }
}

impl KeyboardLayout {
    pub fn new(columns: Vec<Vec<Key>>) -> Self {
        Self { columns }
    }

    /// The standard calculator keyboard.
    pub fn standard() -> Self {
        use UiAction::{AppendNewline, AppendSpace, Backspace, Clear, Submit};
        use UnitModifier::{Centi, Deci, Kilo, Micro, Milli, Nano};

        let numbers = |tokens: &[&str]| tokens.iter().map(|t| Key::number(t)).collect::<Vec<_>>();
        let units = |tokens: &[&str]| tokens.iter().map(|t| Key::unit(t)).collect::<Vec<_>>();

        let mut columns = vec![
            vec![
                Key::operator("c"),
                Key::modifier(Kilo),
                Key::modifier(Centi),
                Key::modifier(Deci),
                Key::ui(AppendSpace, "␣"),
            ],
            vec![
                Key::operator("d"),
                Key::modifier(Milli),
                Key::modifier(Micro),
                Key::modifier(Nano),
                Key::ui(Backspace, "←"),
            ],
        ];

        let mut col = vec![Key::operator("v")];
        col.extend(numbers(&["7", "4", "1", "."]));
        columns.push(col);

        let mut col = vec![Key::operator("p")];
        col.extend(numbers(&["8", "5", "2", "0"]));
        columns.push(col);

        let mut col = vec![Key::operator("n")];
        col.extend(numbers(&["9", "6", "3", "e"]));
        col.push(Key::ui(AppendNewline, "↩"));
        columns.push(col);

        let mut col: Vec<Key> = ["f", "+", "-", "*", "/"]
            .iter()
            .map(|t| Key::operator(t))
            .collect();
        col.push(Key::ui(Submit, "✓"));
        columns.push(col);

        let mut col = vec![Key::operator("r"), Key::operator("U")];
        col.extend(units(&["1", "g", "l", "iu"]));
        columns.push(col);

        let mut col = vec![Key::ui(Clear, "CLR")];
        col.extend(units(&["m", "mol", "M", "Da"]));
        columns.push(col);

        Self { columns }
    }

    pub fn columns(&self) -> &[Vec<Key>] {
        &self.columns
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Height of the tallest column.
    pub fn height(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn key(&self, column: usize, row: usize) -> Option<&Key> {
        self.columns.get(column)?.get(row)
    }

    /// Finds the first key whose action matches `action`.
    pub fn position_of(&self, action: &KeyAction) -> Option<(usize, usize)> {
        self.columns.iter().enumerate().find_map(|(c, keys)| {
            keys.iter()
                .position(|k| &k.action == action)
                .map(|r| (c, r))
        })
    }
}
