//! Tokenizer for engine source text.
//!
//! Tokens are mostly whitespace-separated, but numbers, operators and unit
//! groups may also be written back to back (`4.5(ml)`, `2e3+`).

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::error::{EngineError, EngineResult, SyntaxError};

/// 1-based line and column just past the last character read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
}

impl Default for Cursor {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Unit expression between parentheses, e.g. `km` or `m/s`.
    Unit(String),
    Add,
    Sub,
    Mul,
    Div,
    /// Single-letter stack operator (`p n f c d r v U`).
    Operator(char),
    /// `>name`
    Store(String),
    /// `<name`
    Recall(String),
    /// `@name(arg)`
    Macro { name: String, arg: String },
    Comment(String),
}

pub const OPERATORS: &[char] = &['p', 'n', 'f', 'c', 'd', 'r', 'v', 'U'];

pub struct Tokenizer<'a> {
    chars: Peekable<Chars<'a>>,
    cursor: Cursor,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            cursor: Cursor::default(),
        }
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.chars.next()?;
        if ch == '\n' {
            self.cursor.line += 1;
            self.cursor.column = 1;
        } else {
            self.cursor.column += 1;
        }
        Some(ch)
    }

    fn bump_if(&mut self, accept: impl Fn(char) -> bool) -> Option<char> {
        let ch = *self.chars.peek()?;
        if accept(ch) { self.bump() } else { None }
    }

    fn error(&self, error: SyntaxError) -> EngineError {
        EngineError::Syntax {
            at: self.cursor,
            error,
        }
    }

    fn skip_whitespace(&mut self) {
        while self.bump_if(char::is_whitespace).is_some() {}
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut buf = String::new();
        while let Some(ch) = self.bump_if(&accept) {
            buf.push(ch);
        }
        buf
    }

    /// Reads up to `close`, consuming it. Fails on EOF or a rejected character.
    fn read_delimited(
        &mut self,
        close: char,
        accept: impl Fn(char) -> bool,
    ) -> EngineResult<String> {
        let mut buf = String::new();
        loop {
            match self.bump() {
                Some(ch) if ch == close => return Ok(buf),
                Some(ch) if accept(ch) => buf.push(ch),
                Some(ch) => return Err(self.error(SyntaxError::InvalidCharacter(ch))),
                None => return Err(self.error(SyntaxError::Unterminated)),
            }
        }
    }

    fn read_number(&mut self, first: char) -> EngineResult<Token> {
        let mut raw = String::from(first);
        while let Some(&ch) = self.chars.peek() {
            let after_exponent = raw.ends_with(['e', 'E']);
            let accept = ch.is_ascii_digit()
                || matches!(ch, '.' | 'e' | 'E' | '_')
                || (ch == '-' && after_exponent);
            if !accept {
                break;
            }
            raw.push(ch);
            self.bump();
        }

        let cleaned: String = raw.chars().filter(|&c| c != '_').collect();
        match cleaned.parse::<f64>() {
            Ok(number) => Ok(Token::Number(number)),
            Err(_) => Err(self.error(SyntaxError::InvalidNumber(raw))),
        }
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// # Errors
    /// Returns `EngineError::Syntax` for malformed input.
    pub fn next_token(&mut self) -> EngineResult<Option<Token>> {
        self.skip_whitespace();
        let Some(ch) = self.bump() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '_' | '.' => self.read_number(ch)?,
            '(' => Token::Unit(self.read_delimited(')', is_unit_char)?),
            '@' => {
                let name = self.read_delimited('(', is_name_char)?;
                let arg = self.read_delimited(')', |c| c != '\n')?;
                Token::Macro {
                    name,
                    arg: arg.trim().to_string(),
                }
            }
            '>' => Token::Store(self.read_while(is_name_char)),
            '<' => Token::Recall(self.read_while(is_name_char)),
            '#' => Token::Comment(self.read_while(|c| c != '\n' && c != '\r')),
            '+' => Token::Add,
            '-' => Token::Sub,
            '*' => Token::Mul,
            '/' => Token::Div,
            op if OPERATORS.contains(&op) => Token::Operator(op),
            other => return Err(self.error(SyntaxError::InvalidCharacter(other))),
        };
        Ok(Some(token))
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = EngineResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_unit_char(c: char) -> bool {
    is_name_char(c) || c == '/' || c == '*'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        Tokenizer::new(input).collect::<EngineResult<Vec<_>>>().unwrap()
    }

    #[test]
    fn test_mixed_tokens_without_spaces() {
        assert_eq!(
            tokens("1 2e3+ 3.4e5* (g) 4.5(ml) / 6_789 + 3.25"),
            vec![
                Token::Number(1.0),
                Token::Number(2000.0),
                Token::Add,
                Token::Number(340_000.0),
                Token::Mul,
                Token::Unit("g".into()),
                Token::Number(4.5),
                Token::Unit("ml".into()),
                Token::Div,
                Token::Number(6789.0),
                Token::Add,
                Token::Number(3.25),
            ]
        );
    }

    #[test]
    fn test_negative_exponent_and_trailing_minus() {
        assert_eq!(
            tokens("1e-3 4-"),
            vec![Token::Number(0.001), Token::Number(4.0), Token::Sub]
        );
    }

    #[test]
    fn test_variables_macros_and_comments() {
        assert_eq!(
            tokens("@derived( km ) >x <x # note\np"),
            vec![
                Token::Macro {
                    name: "derived".into(),
                    arg: "km".into()
                },
                Token::Store("x".into()),
                Token::Recall("x".into()),
                Token::Comment(" note".into()),
                Token::Operator('p'),
            ]
        );
    }

    #[test]
    fn test_compound_unit() {
        assert_eq!(tokens("(m/s)"), vec![Token::Unit("m/s".into())]);
    }

    #[test]
    fn test_invalid_character_reports_position() {
        let err = Tokenizer::new("1 2\n  $").find_map(Result::err).unwrap();
        assert_eq!(
            err,
            EngineError::Syntax {
                at: Cursor { line: 2, column: 4 },
                error: SyntaxError::InvalidCharacter('$'),
            }
        );
        assert_eq!(err.to_string(), "Invalid character: '$' at 2:4");
    }

    #[test]
    fn test_invalid_number() {
        let err = Tokenizer::new("1.2.3").next().unwrap().unwrap_err();
        assert!(err.to_string().starts_with("Invalid number: 1.2.3"));
    }

    #[test]
    fn test_unterminated_unit() {
        let result = Tokenizer::new("1 (km").nth(1).unwrap();
        assert!(matches!(
            result,
            Err(EngineError::Syntax {
                error: SyntaxError::Unterminated,
                ..
            })
        ));
    }
}
