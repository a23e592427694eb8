//! Arithmetic evaluator for the answer-review cross-check.
//!
//! Supports the four operators, parentheses, unary minus and decimal
//! numbers. Malformed expressions are typed errors so the review step
//! can catch them and treat the attempt as a rejection.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MathToolError {
    #[error("unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("invalid number at position {0}")]
    InvalidNumber(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("trailing input at position {0}")]
    TrailingInput(usize),
}

/// Calculator tool consumed by the answer-review step.
#[derive(Debug, Clone, Default)]
pub struct MathTool;

impl MathTool {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate an arithmetic expression.
    pub fn evaluate(&self, expression: &str) -> Result<f64, MathToolError> {
        let mut parser = Parser::new(expression);
        let value = parser.expression()?;
        parser.skip_whitespace();
        if parser.pos < parser.chars.len() {
            return Err(MathToolError::TrailingInput(parser.pos));
        }
        Ok(value)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    fn expression(&mut self) -> Result<f64, MathToolError> {
        let mut value = self.term()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('+') => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some('-') => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, MathToolError> {
        let mut value = self.factor()?;
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some('*') => {
                    self.pos += 1;
                    value *= self.factor()?;
                }
                Some('/') => {
                    self.pos += 1;
                    let divisor = self.factor()?;
                    if divisor == 0.0 {
                        return Err(MathToolError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn factor(&mut self) -> Result<f64, MathToolError> {
        self.skip_whitespace();
        match self.peek() {
            Some('-') => {
                self.pos += 1;
                Ok(-self.factor()?)
            }
            Some('(') => {
                self.pos += 1;
                let value = self.expression()?;
                self.skip_whitespace();
                match self.peek() {
                    Some(')') => {
                        self.pos += 1;
                        Ok(value)
                    }
                    Some(ch) => Err(MathToolError::UnexpectedChar(ch, self.pos)),
                    None => Err(MathToolError::UnexpectedEnd),
                }
            }
            Some(ch) if ch.is_ascii_digit() || ch == '.' => self.number(),
            Some(ch) => Err(MathToolError::UnexpectedChar(ch, self.pos)),
            None => Err(MathToolError::UnexpectedEnd),
        }
    }

    fn number(&mut self) -> Result<f64, MathToolError> {
        let start = self.pos;
        while matches!(self.peek(), Some(ch) if ch.is_ascii_digit() || ch == '.') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse()
            .map_err(|_| MathToolError::InvalidNumber(start))
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(ch) if ch.is_whitespace()) {
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_precedence_and_parentheses() {
        let tool = MathTool::new();
        assert_eq!(tool.evaluate("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(tool.evaluate("(2 + 3) * 4").unwrap(), 20.0);
        assert_eq!(tool.evaluate("10 / 4").unwrap(), 2.5);
    }

    #[test]
    fn handles_unary_minus_and_decimals() {
        let tool = MathTool::new();
        assert_eq!(tool.evaluate("-3 + 1.5").unwrap(), -1.5);
        assert_eq!(tool.evaluate("2 * -0.5").unwrap(), -1.0);
    }

    #[test]
    fn rejects_malformed_expressions() {
        let tool = MathTool::new();
        assert_eq!(tool.evaluate(""), Err(MathToolError::UnexpectedEnd));
        assert_eq!(tool.evaluate("(1 + 2"), Err(MathToolError::UnexpectedEnd));
        assert!(matches!(
            tool.evaluate("2 + apples"),
            Err(MathToolError::UnexpectedChar('a', _))
        ));
        assert!(matches!(
            tool.evaluate("1 2"),
            Err(MathToolError::TrailingInput(_))
        ));
        assert_eq!(
            tool.evaluate("1.2.3"),
            Err(MathToolError::InvalidNumber(0))
        );
    }

    #[test]
    fn division_by_zero_is_an_error() {
        let tool = MathTool::new();
        assert_eq!(tool.evaluate("5 / 0"), Err(MathToolError::DivisionByZero));
    }
}
