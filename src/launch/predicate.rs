//! Guard expressions of the form `$(eval robot == 'a' and dim in ['2d', '3d'])`.
//!
//! Only a closed grammar is accepted: string literals, `True`/`False`, variables
//! (bare or as `arg('name')`), lists, `==`, `!=`, `in`, `not in`, `and`, `or`,
//! `not` and parentheses. Nothing is executed.

use std::collections::BTreeMap;

use super::{ConfigError, Result};

/// Variables visible to predicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Environment {
    variables: BTreeMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    expression: String,
    root: Expr,
}

impl Predicate {
    /// Parses a launch `if` attribute: `$(eval ...)` or a bare `true`/`false`.
    pub fn from_attribute(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if let Some(inner) = trimmed
            .strip_prefix("$(eval")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return Self::parse(inner);
        }
        match trimmed {
            "true" | "1" => Self::parse("True"),
            "false" | "0" => Self::parse("False"),
            _ => Err(ConfigError::UnsupportedSubstitution(raw.to_string())),
        }
    }

    pub fn parse(expression: &str) -> Result<Self> {
        let tokens = tokenize(expression).map_err(|message| predicate_error(expression, message))?;
        let mut parser = Parser { tokens, position: 0 };
        let root = parser
            .parse_expression()
            .map_err(|message| predicate_error(expression, message))?;
        if let Some(token) = parser.peek() {
            return Err(predicate_error(
                expression,
                format!("unexpected trailing token {token:?}"),
            ));
        }
        Ok(Self {
            expression: expression.trim().to_string(),
            root,
        })
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn evaluate(&self, environment: &Environment) -> Result<bool> {
        evaluate(&self.root, environment)
            .map(|value| value.truthy())
            .map_err(|message| predicate_error(&self.expression, message))
    }
}

fn predicate_error(expression: &str, message: String) -> ConfigError {
    ConfigError::Predicate {
        expression: expression.trim().to_string(),
        message,
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Str(String),
    Ident(String),
    LeftParen,
    RightParen,
    LeftBracket,
    RightBracket,
    Comma,
    Equal,
    NotEqual,
}

fn tokenize(expression: &str) -> std::result::Result<Vec<Token>, String> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();
    while let Some(&current) = chars.peek() {
        match current {
            c if c.is_whitespace() => {
                chars.next();
            }
            '\'' | '"' => {
                chars.next();
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        Some(c) if c == current => break,
                        Some(c) => literal.push(c),
                        None => return Err("unterminated string literal".to_string()),
                    }
                }
                tokens.push(Token::Str(literal));
            }
            '(' | ')' | '[' | ']' | ',' => {
                chars.next();
                tokens.push(match current {
                    '(' => Token::LeftParen,
                    ')' => Token::RightParen,
                    '[' => Token::LeftBracket,
                    ']' => Token::RightBracket,
                    _ => Token::Comma,
                });
            }
            '=' | '!' => {
                chars.next();
                if chars.next() != Some('=') {
                    return Err(format!("expected `=` after `{current}`"));
                }
                tokens.push(if current == '=' {
                    Token::Equal
                } else {
                    Token::NotEqual
                });
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            other => return Err(format!("unexpected character `{other}`")),
        }
    }
    Ok(tokens)
}

#[derive(Debug, Clone, PartialEq)]
enum Expr {
    Literal(Value),
    Variable(String),
    List(Vec<Expr>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(Comparison, Box<Expr>, Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Comparison {
    Equal,
    NotEqual,
    In,
    NotIn,
}

const KEYWORDS: [&str; 6] = ["and", "or", "not", "in", "True", "False"];

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

type ParseResult<T> = std::result::Result<T, String>;

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn peek_keyword(&self, offset: usize, keyword: &str) -> bool {
        matches!(self.tokens.get(self.position + offset), Some(Token::Ident(ident)) if ident == keyword)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if self.peek_keyword(0, keyword) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> ParseResult<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(format!("expected {expected:?}, found {token:?}")),
            None => Err(format!("expected {expected:?}, found end of expression")),
        }
    }

    fn parse_expression(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_and()?;
        while self.eat_keyword("or") {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> ParseResult<Expr> {
        let mut left = self.parse_not()?;
        while self.eat_keyword("and") {
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> ParseResult<Expr> {
        if self.eat_keyword("not") {
            return Ok(Expr::Not(Box::new(self.parse_not()?)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ParseResult<Expr> {
        let left = self.parse_atom()?;
        let comparison = if self.eat(&Token::Equal) {
            Comparison::Equal
        } else if self.eat(&Token::NotEqual) {
            Comparison::NotEqual
        } else if self.eat_keyword("in") {
            Comparison::In
        } else if self.peek_keyword(0, "not") && self.peek_keyword(1, "in") {
            self.position += 2;
            Comparison::NotIn
        } else {
            return Ok(left);
        };
        let right = self.parse_atom()?;
        Ok(Expr::Compare(comparison, Box::new(left), Box::new(right)))
    }

    fn parse_atom(&mut self) -> ParseResult<Expr> {
        match self.next() {
            Some(Token::Str(literal)) => Ok(Expr::Literal(Value::Str(literal))),
            Some(Token::Ident(ident)) => match ident.as_str() {
                "True" => Ok(Expr::Literal(Value::Bool(true))),
                "False" => Ok(Expr::Literal(Value::Bool(false))),
                "arg" if self.peek() == Some(&Token::LeftParen) => {
                    self.expect(Token::LeftParen)?;
                    let name = match self.next() {
                        Some(Token::Str(name)) => name,
                        other => return Err(format!("arg() expects a string, found {other:?}")),
                    };
                    self.expect(Token::RightParen)?;
                    Ok(Expr::Variable(name))
                }
                keyword if KEYWORDS.contains(&keyword) => {
                    Err(format!("unexpected keyword `{keyword}`"))
                }
                _ => Ok(Expr::Variable(ident.clone())),
            },
            Some(Token::LeftBracket) => Ok(Expr::List(self.parse_items(Token::RightBracket)?)),
            Some(Token::LeftParen) => {
                let first = self.parse_expression()?;
                if self.eat(&Token::RightParen) {
                    return Ok(first);
                }
                self.expect(Token::Comma)?;
                let mut items = vec![first];
                items.extend(self.parse_items(Token::RightParen)?);
                Ok(Expr::List(items))
            }
            Some(token) => Err(format!("unexpected token {token:?}")),
            None => Err("unexpected end of expression".to_string()),
        }
    }

    /// Comma separated items up to `close`, trailing comma allowed.
    fn parse_items(&mut self, close: Token) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        loop {
            if self.eat(&close) {
                return Ok(items);
            }
            items.push(self.parse_expression()?);
            if !self.eat(&Token::Comma) {
                self.expect(close.clone())?;
                return Ok(items);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Value {
    Str(String),
    Bool(bool),
    List(Vec<Value>),
}

impl Value {
    fn truthy(&self) -> bool {
        match self {
            Self::Str(value) => !value.is_empty(),
            Self::Bool(value) => *value,
            Self::List(values) => !values.is_empty(),
        }
    }
}

fn evaluate(expr: &Expr, environment: &Environment) -> std::result::Result<Value, String> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Variable(name) => environment
            .get(name)
            .map(|value| Value::Str(value.to_string()))
            .ok_or_else(|| format!("unknown variable `{name}`")),
        Expr::List(items) => items
            .iter()
            .map(|item| evaluate(item, environment))
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(Value::List),
        Expr::Not(inner) => Ok(Value::Bool(!evaluate(inner, environment)?.truthy())),
        Expr::And(left, right) => {
            if !evaluate(left, environment)?.truthy() {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(evaluate(right, environment)?.truthy()))
        }
        Expr::Or(left, right) => {
            if evaluate(left, environment)?.truthy() {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(evaluate(right, environment)?.truthy()))
        }
        Expr::Compare(comparison, left, right) => {
            let left = evaluate(left, environment)?;
            let right = evaluate(right, environment)?;
            let result = match comparison {
                Comparison::Equal => left == right,
                Comparison::NotEqual => left != right,
                Comparison::In => contains(&right, &left)?,
                Comparison::NotIn => !contains(&right, &left)?,
            };
            Ok(Value::Bool(result))
        }
    }
}

fn contains(container: &Value, item: &Value) -> std::result::Result<bool, String> {
    match (container, item) {
        (Value::List(values), _) => Ok(values.contains(item)),
        (Value::Str(haystack), Value::Str(needle)) => Ok(haystack.contains(needle.as_str())),
        _ => Err("`in` needs a list or a string on the right".to_string()),
    }
}
