//! Token composition rules for the virtual keyboard.

use crate::keyboard::{TokenType, UnitModifier};

/// Composer state for the active input.
///
/// Tracks the type of the last inserted token (for spacing) and the
/// currently selected unit modifier (fused into the next unit token only).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Composer {
    last_token: Option<TokenType>,
    modifier: Option<UnitModifier>,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_token(&self) -> Option<TokenType> {
        self.last_token
    }

    pub fn modifier(&self) -> Option<UnitModifier> {
        self.modifier
    }

    /// Selects `modifier`, or clears it if it is already selected.
    pub fn toggle_modifier(&mut self, modifier: UnitModifier) {
        self.modifier = if self.modifier == Some(modifier) {
            None
        } else {
            Some(modifier)
        };
    }

    /// Forgets the last token type. Called when a new input becomes active.
    pub fn reset_tracking(&mut self) {
        self.last_token = None;
    }

    /// Builds the fragment to append to `current` for `token`.
    ///
    /// Emitting any token clears the modifier selection.
    pub fn compose(&mut self, current: &str, token: &str, kind: TokenType) -> String {
        let mut fragment = String::new();

        if self.last_token != Some(kind) && needs_separator(current) {
            fragment.push(' ');
        }

        if kind == TokenType::Unit {
            fragment.push('(');
            if let Some(modifier) = self.modifier {
                fragment.push_str(modifier.symbol());
            }
            fragment.push_str(token);
            fragment.push(')');
        } else {
            fragment.push_str(token);
        }

        self.last_token = Some(kind);
        self.modifier = None;
        fragment
    }
}

fn needs_separator(current: &str) -> bool {
    current.chars().last().is_some_and(|c| !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compose_all(tokens: &[(&str, TokenType)]) -> String {
        let mut composer = Composer::new();
        let mut text = String::new();
        for (token, kind) in tokens {
            let fragment = composer.compose(&text, token, *kind);
            text.push_str(&fragment);
        }
        text
    }

    #[test]
    fn test_same_type_concatenates() {
        let text = compose_all(&[
            ("1", TokenType::LiteralNum),
            ("2", TokenType::LiteralNum),
            (".", TokenType::LiteralNum),
            ("5", TokenType::LiteralNum),
        ]);
        assert_eq!(text, "12.5");
    }

    #[test]
    fn test_type_change_inserts_single_space() {
        let mut composer = Composer::new();
        composer.compose("", "3", TokenType::LiteralNum);
        assert_eq!(composer.compose("3", "+", TokenType::Operator), " +");
        assert_eq!(composer.compose("3 +", "4", TokenType::LiteralNum), " 4");
    }

    #[test]
    fn test_untracked_text_gets_separator() {
        let mut composer = Composer::new();
        assert_eq!(composer.compose("3", "p", TokenType::Operator), " p");
    }

    #[test]
    fn test_no_separator_on_empty_or_trailing_whitespace() {
        let mut composer = Composer::new();
        assert_eq!(composer.compose("", "m", TokenType::Unit), "(m)");
        assert_eq!(composer.compose("(m) ", "2", TokenType::LiteralNum), "2");
        assert_eq!(composer.compose("(m) 2\n", "+", TokenType::Operator), "+");
    }

    #[test]
    fn test_unit_with_modifier_then_cleared() {
        let mut composer = Composer::new();
        composer.toggle_modifier(UnitModifier::Kilo);
        assert_eq!(composer.compose("", "m", TokenType::Unit), "(km)");
        assert_eq!(composer.modifier(), None);
        assert_eq!(composer.compose("(km)", "m", TokenType::Unit), "(m)");
    }

    #[test]
    fn test_any_token_clears_modifier() {
        let mut composer = Composer::new();
        composer.toggle_modifier(UnitModifier::Nano);
        composer.compose("", "7", TokenType::LiteralNum);
        assert_eq!(composer.modifier(), None);
        assert_eq!(composer.compose("7", "g", TokenType::Unit), " (g)");
    }

    #[test]
    fn test_toggle_modifier_replace_and_clear() {
        let mut composer = Composer::new();
        composer.toggle_modifier(UnitModifier::Milli);
        assert_eq!(composer.modifier(), Some(UnitModifier::Milli));
        composer.toggle_modifier(UnitModifier::Micro);
        assert_eq!(composer.modifier(), Some(UnitModifier::Micro));
        composer.toggle_modifier(UnitModifier::Micro);
        assert_eq!(composer.modifier(), None);
    }

    #[test]
    fn test_reset_tracking_keeps_modifier() {
        let mut composer = Composer::new();
        composer.compose("", "1", TokenType::LiteralNum);
        composer.toggle_modifier(UnitModifier::Deci);
        composer.reset_tracking();
        assert_eq!(composer.last_token(), None);
        assert_eq!(composer.modifier(), Some(UnitModifier::Deci));
    }
}
