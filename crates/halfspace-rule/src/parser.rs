//! Rule expression lexer and recursive-descent parser.
//!
//! Grammar:
//!
//! ```text
//! union        := intersection ( ('+' | ':') intersection )*
//! intersection := factor factor*
//! factor       := literal | '(' union ')' | '#' factor
//! literal      := '-'? digit+
//! ```

use crate::error::{Result, RuleError};
use crate::rule::Rule;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Literal(i32),
    Union,
    LParen,
    RParen,
    Complement,
}

#[derive(Debug, Clone, Copy)]
struct SpannedToken {
    token: Token,
    pos: usize,
}

struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
        }
    }

    fn tokenize(mut self) -> Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();
        while let Some(tok) = self.next_token()? {
            tokens.push(tok);
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Option<SpannedToken>> {
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
        let Some(&ch) = self.input.get(self.pos) else {
            return Ok(None);
        };
        let start = self.pos;
        let token = match ch {
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'+' | b':' => Token::Union,
            b'#' => Token::Complement,
            b'-' | b'0'..=b'9' => return self.literal(start).map(Some),
            _ => {
                let text = self.char_at(start);
                return Err(RuleError::parse(start, text));
            }
        };
        self.pos += 1;
        Ok(Some(SpannedToken { token, pos: start }))
    }

    fn literal(&mut self, start: usize) -> Result<SpannedToken> {
        if self.input[self.pos] == b'-' {
            self.pos += 1;
        }
        let digits_start = self.pos;
        while self.pos < self.input.len() && self.input[self.pos].is_ascii_digit() {
            self.pos += 1;
        }
        if self.pos == digits_start {
            return Err(RuleError::parse(start, "-"));
        }
        // Input is ASCII up to here, so slicing on these offsets is safe
        let text = String::from_utf8_lossy(&self.input[start..self.pos]).into_owned();
        match text.parse::<i32>() {
            Ok(0 | i32::MIN) | Err(_) => Err(RuleError::parse(start, text)),
            Ok(n) => Ok(SpannedToken {
                token: Token::Literal(n),
                pos: start,
            }),
        }
    }

    fn char_at(&self, pos: usize) -> String {
        let rest = String::from_utf8_lossy(&self.input[pos..]);
        rest.chars().next().map(String::from).unwrap_or_default()
    }
}

struct Parser {
    tokens: Vec<SpannedToken>,
    index: usize,
    end: usize,
}

impl Parser {
    fn peek(&self) -> Option<SpannedToken> {
        self.tokens.get(self.index).copied()
    }

    fn advance(&mut self) -> Option<SpannedToken> {
        let tok = self.peek();
        if tok.is_some() {
            self.index += 1;
        }
        tok
    }

    fn unexpected(&self, tok: Option<SpannedToken>) -> RuleError {
        match tok {
            None => RuleError::parse(self.end, "<end>"),
            Some(t) => RuleError::parse(t.pos, describe(t.token)),
        }
    }

    fn union(&mut self) -> Result<Rule> {
        let mut terms = vec![self.intersection()?];
        while matches!(self.peek(), Some(t) if t.token == Token::Union) {
            self.advance();
            terms.push(self.intersection()?);
        }
        Ok(collapse(terms, Rule::Union))
    }

    fn intersection(&mut self) -> Result<Rule> {
        let mut factors = Vec::new();
        while let Some(tok) = self.peek() {
            match tok.token {
                Token::Literal(_) | Token::LParen | Token::Complement => {
                    factors.push(self.factor()?)
                }
                Token::Union | Token::RParen => break,
            }
        }
        if factors.is_empty() {
            return Err(self.unexpected(self.peek()));
        }
        Ok(collapse(factors, Rule::Intersection))
    }

    fn factor(&mut self) -> Result<Rule> {
        let tok = self.advance();
        match tok.map(|t| t.token) {
            Some(Token::Literal(n)) => Ok(Rule::Literal(n)),
            Some(Token::Complement) => Ok(self.factor()?.complement()),
            Some(Token::LParen) => {
                let inner = self.union()?;
                match self.advance() {
                    Some(t) if t.token == Token::RParen => Ok(inner),
                    // Unbalanced: report the opening parenthesis
                    _ => Err(self.unexpected(tok)),
                }
            }
            _ => Err(self.unexpected(tok)),
        }
    }
}

fn collapse(mut items: Vec<Rule>, wrap: fn(Vec<Rule>) -> Rule) -> Rule {
    if items.len() == 1 {
        items.remove(0)
    } else {
        wrap(items)
    }
}

fn describe(token: Token) -> String {
    match token {
        Token::Literal(n) => n.to_string(),
        Token::Union => "+".into(),
        Token::LParen => "(".into(),
        Token::RParen => ")".into(),
        Token::Complement => "#".into(),
    }
}

/// Parse a rule expression. Returns `None` for an empty expression.
pub fn parse_rule(expression: &str) -> Result<Option<Rule>> {
    let tokens = Lexer::new(expression).tokenize()?;
    if tokens.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser {
        tokens,
        index: 0,
        end: expression.len(),
    };
    let rule = parser.union()?;
    if let Some(extra) = parser.peek() {
        return Err(parser.unexpected(Some(extra)));
    }
    Ok(Some(rule))
}
