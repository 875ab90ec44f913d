//! Arithmetic calculator tool
//!
//! Evaluates plain arithmetic only: numbers, `+ - * / // % **`, unary signs and
//! parentheses. There are no names, calls or strings, so arbitrary input from
//! the model cannot do anything besides compute a number.
//!
//! Integer arithmetic stays integral (`200*7` is `1400`), `/` always yields a
//! float, `//` floors, `%` takes the sign of the divisor and `**` binds tighter
//! than a leading minus. Integer overflow falls back to floating point, and
//! floats of magnitude 1e16 or more print in exponent form (`1e20`).

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use super::tool_handler::BuiltinTool;
use crate::domain::Tool;

pub const TOOL_NAME: &str = "calculate";

/// Nesting limit for parentheses, unary operators and exponents
const MAX_DEPTH: usize = 64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Error: Invalid syntax in mathematical expression")]
    Syntax,
    #[error("Error: Division by zero")]
    DivisionByZero,
    #[error("Error: Numeric result out of range")]
    Overflow,
    #[error("Error: Result is not a real number")]
    NotReal,
}

/// A calculator value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    Float(f64),
}

impl Number {
    fn as_f64(self) -> f64 {
        match self {
            Number::Int(i) => i as f64,
            Number::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Number::Int(i) => i == 0,
            Number::Float(f) => f == 0.0,
        }
    }

    fn finite(value: f64) -> Result<Number, CalcError> {
        if value.is_nan() {
            Err(CalcError::NotReal)
        } else if value.is_infinite() {
            Err(CalcError::Overflow)
        } else {
            Ok(Number::Float(value))
        }
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(i) => write!(f, "{}", i),
            Number::Float(v) if v.fract() == 0.0 && v.abs() < 1e16 => write!(f, "{:.1}", v),
            Number::Float(v) if v.abs() >= 1e16 => write!(f, "{:e}", v),
            Number::Float(v) => write!(f, "{}", v),
        }
    }
}

/// Evaluate an expression, returning the result or an error message as text
pub fn calculate(expression: &str) -> String {
    match evaluate(expression) {
        Ok(number) => number.to_string(),
        Err(e) => e.to_string(),
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<Number, CalcError> {
    let tokens = tokenize(expression)?;
    let mut parser = Parser {
        tokens: &tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if parser.pos != tokens.len() {
        return Err(CalcError::Syntax);
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Num(Number),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Power,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => {
                i += 1;
            }
            '0'..='9' | '.' => {
                let (number, next) = read_number(&chars, i)?;
                tokens.push(Token::Num(number));
                i = next;
            }
            '+' => {
                tokens.push(Token::Plus);
                i += 1;
            }
            '-' => {
                tokens.push(Token::Minus);
                i += 1;
            }
            '*' if chars.get(i + 1) == Some(&'*') => {
                tokens.push(Token::Power);
                i += 2;
            }
            '*' => {
                tokens.push(Token::Star);
                i += 1;
            }
            '/' if chars.get(i + 1) == Some(&'/') => {
                tokens.push(Token::DoubleSlash);
                i += 2;
            }
            '/' => {
                tokens.push(Token::Slash);
                i += 1;
            }
            '%' => {
                tokens.push(Token::Percent);
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            _ => return Err(CalcError::Syntax),
        }
    }

    if tokens.is_empty() {
        return Err(CalcError::Syntax);
    }
    Ok(tokens)
}

fn read_number(chars: &[char], start: usize) -> Result<(Number, usize), CalcError> {
    let mut i = start;
    let mut text = String::new();
    let mut is_float = false;
    let mut digits = 0;

    while i < chars.len() {
        if chars[i].is_ascii_digit() {
            text.push(chars[i]);
            digits += 1;
        } else if chars[i] == '_'
            && digits > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit)
        {
            // digit separator, only between two digits
        } else {
            break;
        }
        i += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        is_float = true;
        text.push('.');
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            text.push(chars[i]);
            digits += 1;
            i += 1;
        }
    }
    if digits == 0 {
        return Err(CalcError::Syntax);
    }
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        is_float = true;
        text.push('e');
        i += 1;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            text.push(chars[i]);
            i += 1;
        }
        let exp_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            text.push(chars[i]);
            i += 1;
        }
        if i == exp_start {
            return Err(CalcError::Syntax);
        }
    }
    // "5x" or "1.2.3" are not numbers
    if i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '.' || chars[i] == '_') {
        return Err(CalcError::Syntax);
    }

    let number = if is_float {
        Number::finite(text.parse::<f64>().map_err(|_| CalcError::Syntax)?)?
    } else {
        match text.parse::<i64>() {
            Ok(value) => Number::Int(value),
            Err(_) => Number::finite(text.parse::<f64>().map_err(|_| CalcError::Syntax)?)?,
        }
    };
    Ok((number, i))
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::Syntax);
        }
        Ok(())
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> Result<Number, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ (Token::Plus | Token::Minus)) = self.peek() {
            self.pos += 1;
            let rhs = self.term()?;
            value = match op {
                Token::Plus => add(value, rhs)?,
                _ => sub(value, rhs)?,
            };
        }
        Ok(value)
    }

    // term := factor (('*' | '/' | '//' | '%') factor)*
    fn term(&mut self) -> Result<Number, CalcError> {
        let mut value = self.factor()?;
        while let Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) =
            self.peek()
        {
            self.pos += 1;
            let rhs = self.factor()?;
            value = match op {
                Token::Star => mul(value, rhs)?,
                Token::Slash => div(value, rhs)?,
                Token::DoubleSlash => floor_div(value, rhs)?,
                _ => modulo(value, rhs)?,
            };
        }
        Ok(value)
    }

    // factor := ('+' | '-') factor | power
    fn factor(&mut self) -> Result<Number, CalcError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.factor();
                self.depth -= 1;
                value
            }
            Some(Token::Minus) => {
                self.pos += 1;
                self.descend()?;
                let value = self.factor().and_then(negate);
                self.depth -= 1;
                value
            }
            _ => self.power(),
        }
    }

    // power := atom ('**' factor)?
    fn power(&mut self) -> Result<Number, CalcError> {
        let base = self.atom()?;
        if self.peek() == Some(Token::Power) {
            self.pos += 1;
            self.descend()?;
            let exponent = self.factor();
            self.depth -= 1;
            return pow(base, exponent?);
        }
        Ok(base)
    }

    // atom := number | '(' expr ')'
    fn atom(&mut self) -> Result<Number, CalcError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    _ => Err(CalcError::Syntax),
                }
            }
            _ => Err(CalcError::Syntax),
        }
    }
}

fn negate(n: Number) -> Result<Number, CalcError> {
    match n {
        Number::Int(i) => Ok(i
            .checked_neg()
            .map(Number::Int)
            .unwrap_or(Number::Float(-(i as f64)))),
        Number::Float(f) => Ok(Number::Float(-f)),
    }
}

fn int_or_float(
    a: Number,
    b: Number,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Result<Number, CalcError> {
    if let (Number::Int(x), Number::Int(y)) = (a, b) {
        if let Some(value) = int_op(x, y) {
            return Ok(Number::Int(value));
        }
    }
    Number::finite(float_op(a.as_f64(), b.as_f64()))
}

fn add(a: Number, b: Number) -> Result<Number, CalcError> {
    int_or_float(a, b, i64::checked_add, |x, y| x + y)
}

fn sub(a: Number, b: Number) -> Result<Number, CalcError> {
    int_or_float(a, b, i64::checked_sub, |x, y| x - y)
}

fn mul(a: Number, b: Number) -> Result<Number, CalcError> {
    int_or_float(a, b, i64::checked_mul, |x, y| x * y)
}

fn div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    Number::finite(a.as_f64() / b.as_f64())
}

fn floor_div(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    int_or_float(
        a,
        b,
        |x, y| {
            let q = x.checked_div(y)?;
            if (x % y != 0) && ((x < 0) != (y < 0)) {
                q.checked_sub(1)
            } else {
                Some(q)
            }
        },
        |x, y| (x / y).floor(),
    )
}

fn modulo(a: Number, b: Number) -> Result<Number, CalcError> {
    if b.is_zero() {
        return Err(CalcError::DivisionByZero);
    }
    int_or_float(
        a,
        b,
        |x, y| {
            let r = x.checked_rem(y)?;
            if r != 0 && ((r < 0) != (y < 0)) {
                r.checked_add(y)
            } else {
                Some(r)
            }
        },
        |x, y| {
            let r = x % y;
            if r != 0.0 && ((r < 0.0) != (y < 0.0)) {
                r + y
            } else {
                r
            }
        },
    )
}

fn pow(base: Number, exponent: Number) -> Result<Number, CalcError> {
    if base.is_zero() && exponent.as_f64() < 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    if let (Number::Int(b), Number::Int(e)) = (base, exponent) {
        if e >= 0 {
            if let Some(value) = u32::try_from(e).ok().and_then(|e| b.checked_pow(e)) {
                return Ok(Number::Int(value));
            }
        }
    }
    Number::finite(base.as_f64().powf(exponent.as_f64()))
}

/// Calculator exposed to agents as the `calculate` tool
#[derive(Debug, Default, Clone)]
pub struct CalculatorTool;

impl CalculatorTool {
    pub fn new() -> Self {
        Self
    }

    /// Pull the expression out of whatever shape the model sent
    fn operation(args: &Value) -> Option<&str> {
        match args {
            Value::String(s) => Some(s.as_str()),
            Value::Object(map) => ["operation", "expression", "input"]
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str)),
            _ => None,
        }
    }
}

#[async_trait]
impl BuiltinTool for CalculatorTool {
    fn tool(&self) -> Tool {
        Tool {
            name: TOOL_NAME.to_string(),
            description: "Make a calculation. Performs mathematical calculations such as \
                          addition, subtraction, multiplication and division. The input must be \
                          a valid mathematical expression, e.g. '200*7' or '5000/2*10'."
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "operation": {
                        "type": "string",
                        "description": "Mathematical expression to evaluate"
                    }
                },
                "required": ["operation"]
            }),
        }
    }

    async fn call(&self, args: &Value) -> String {
        match Self::operation(args) {
            Some(expression) => {
                let result = calculate(expression);
                tracing::debug!(expression, %result, "Calculator evaluated");
                result
            }
            None => CalcError::Syntax.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_multiplication() {
        assert_eq!(evaluate("200*7"), Ok(Number::Int(1400)));
        assert_eq!(calculate("200*7"), "1400");
    }

    #[test]
    fn test_true_division_yields_float() {
        assert_eq!(calculate("5000/2*10"), "25000.0");
        assert_eq!(calculate("7/2"), "3.5");
    }

    #[test]
    fn test_malformed_expression_is_error_string() {
        assert_eq!(calculate("5*"), "Error: Invalid syntax in mathematical expression");
        assert_eq!(evaluate("(1+2"), Err(CalcError::Syntax));
        assert_eq!(evaluate("1+2)"), Err(CalcError::Syntax));
        assert_eq!(evaluate(""), Err(CalcError::Syntax));
        assert_eq!(evaluate("1.2.3"), Err(CalcError::Syntax));
    }

    #[test]
    fn test_rejects_anything_but_arithmetic() {
        assert_eq!(evaluate("__import__('os')"), Err(CalcError::Syntax));
        assert_eq!(evaluate("abs(-1)"), Err(CalcError::Syntax));
        assert_eq!(evaluate("x + 1"), Err(CalcError::Syntax));
        assert_eq!(evaluate("5x"), Err(CalcError::Syntax));
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(evaluate("2+3*4"), Ok(Number::Int(14)));
        assert_eq!(evaluate("(2+3)*4"), Ok(Number::Int(20)));
        assert_eq!(evaluate("2**3**2"), Ok(Number::Int(512)));
        assert_eq!(evaluate("-2**2"), Ok(Number::Int(-4)));
        assert_eq!(evaluate("2**-1"), Ok(Number::Float(0.5)));
        assert_eq!(evaluate("10-4-3"), Ok(Number::Int(3)));
    }

    #[test]
    fn test_floor_division_and_modulo_follow_divisor_sign() {
        assert_eq!(evaluate("7//2"), Ok(Number::Int(3)));
        assert_eq!(evaluate("-7//2"), Ok(Number::Int(-4)));
        assert_eq!(evaluate("-7%3"), Ok(Number::Int(2)));
        assert_eq!(evaluate("7%-3"), Ok(Number::Int(-2)));
        assert_eq!(evaluate("7.5//2"), Ok(Number::Float(3.0)));
    }

    #[test]
    fn test_division_by_zero() {
        assert_eq!(calculate("1/0"), "Error: Division by zero");
        assert_eq!(evaluate("1//0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("1%0"), Err(CalcError::DivisionByZero));
        assert_eq!(evaluate("0**-1"), Err(CalcError::DivisionByZero));
    }

    #[test]
    fn test_overflow_promotes_then_bounds() {
        assert_eq!(evaluate("9223372036854775807+1"), Ok(Number::Float(9223372036854775808.0)));
        assert_eq!(evaluate("10.0**400"), Err(CalcError::Overflow));
        assert_eq!(evaluate("9**9**9"), Err(CalcError::Overflow));
        assert_eq!(evaluate("(-8)**0.5"), Err(CalcError::NotReal));
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(evaluate(" 1_000 * 2 "), Ok(Number::Int(2000)));
        assert_eq!(evaluate(".5+1"), Ok(Number::Float(1.5)));
        assert_eq!(evaluate("1e3"), Ok(Number::Float(1000.0)));
        assert_eq!(evaluate("1e"), Err(CalcError::Syntax));
    }

    #[test]
    fn test_digit_separator_only_between_digits() {
        assert_eq!(calculate("1_000"), "1000");
        assert_eq!(calculate("1_000.5"), "1000.5");
        for bad in ["1_", "1__0", "12_.5", "_1", "1_e3", "1._5"] {
            assert_eq!(
                calculate(bad),
                "Error: Invalid syntax in mathematical expression",
                "{bad}"
            );
        }
    }

    #[test]
    fn test_large_floats_use_exponent_form() {
        assert_eq!(calculate("1e20"), "1e20");
        assert_eq!(calculate("10.0**20"), "1e20");
        assert_eq!(calculate("-2.5e17"), "-2.5e17");
        assert_eq!(calculate("9223372036854775807+1"), "9.223372036854776e18");
        assert_eq!(calculate("1e15"), "1000000000000000.0");
    }

    #[test]
    fn test_nesting_limit() {
        let deep = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(evaluate(&deep), Err(CalcError::Syntax));
        let fine = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&fine), Ok(Number::Int(1)));

        let tower = format!("{}1", "1**".repeat(50_000));
        assert_eq!(
            calculate(&tower),
            "Error: Invalid syntax in mathematical expression"
        );
        assert_eq!(evaluate(&format!("{}1", "1**".repeat(20))), Ok(Number::Int(1)));
        let signed = format!("{}1", "2**-".repeat(50_000));
        assert_eq!(evaluate(&signed), Err(CalcError::Syntax));
    }

    #[tokio::test]
    async fn test_tool_accepts_object_or_string() {
        let tool = CalculatorTool::new();
        assert_eq!(tool.call(&json!({ "operation": "200*7" })).await, "1400");
        assert_eq!(tool.call(&json!("3*3")).await, "9");
        assert_eq!(
            tool.call(&json!({ "unexpected": 1 })).await,
            "Error: Invalid syntax in mathematical expression"
        );
    }
}
