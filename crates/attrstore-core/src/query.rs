//! Select-expression parsing and evaluation.
//!
//! The grammar is the useful subset of the store's query language:
//!
//! ```text
//! select (* | itemName() | name [, name]*)
//! from domain
//! [where predicate [(and|or) predicate]*]
//! [limit N]
//! ```
//!
//! Predicates compare one attribute against a single-quoted string
//! (`=`, `!=`, `<`, `<=`, `>`, `>=`, `like`) or test presence
//! (`is null`, `is not null`). `and` binds tighter than `or`. A predicate
//! over a multi-valued attribute matches if any value matches.

use crate::error::{Result, StoreError};
use crate::types::{Attribute, Item};

/// Which attributes a select expression projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Projection {
    /// `select *`
    All,
    /// `select itemName()` -- names only, no attributes
    ItemNames,
    /// An explicit attribute list
    Attributes(Vec<String>),
}

/// Comparison operators in a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Like,
}

/// A parsed where-clause tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `name op 'value'`
    Compare {
        /// Attribute name
        name: String,
        /// Operator
        op: CmpOp,
        /// Right-hand value
        value: String,
    },
    /// `name is null`
    IsNull(String),
    /// `name is not null`
    IsNotNull(String),
    /// Both sides must match
    And(Box<Predicate>, Box<Predicate>),
    /// Either side must match
    Or(Box<Predicate>, Box<Predicate>),
}

/// A parsed select expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectExpr {
    /// Projected output
    pub projection: Projection,
    /// Domain named in the `from` clause
    pub domain_name: String,
    /// Optional filter
    pub predicate: Option<Predicate>,
    /// Optional result cap
    pub limit: Option<usize>,
}

impl SelectExpr {
    /// Parse an expression, rejecting malformed input with
    /// [`StoreError::InvalidQueryExpression`].
    pub fn parse(expression: &str) -> Result<Self> {
        Parser::new(expression)?.parse()
    }

    /// Returns true if the item passes the where clause.
    #[must_use]
    pub fn matches(&self, item: &Item) -> bool {
        self.predicate
            .as_ref()
            .map_or(true, |p| eval(p, &item.attributes))
    }

    /// Apply the projection to a matching item.
    #[must_use]
    pub fn project(&self, item: &Item) -> Item {
        match &self.projection {
            Projection::All => item.clone(),
            Projection::ItemNames => Item::new(item.name.clone(), Vec::new()),
            Projection::Attributes(names) => {
                let attributes = item
                    .attributes
                    .iter()
                    .filter(|a| names.contains(&a.name))
                    .cloned()
                    .collect();
                Item::new(item.name.clone(), attributes)
            }
        }
    }
}

fn eval(predicate: &Predicate, attributes: &[Attribute]) -> bool {
    match predicate {
        Predicate::Compare { name, op, value } => attributes
            .iter()
            .filter(|a| &a.name == name)
            .filter_map(|a| a.value.as_deref())
            .any(|v| compare(*op, v, value)),
        Predicate::IsNull(name) => !attributes.iter().any(|a| &a.name == name),
        Predicate::IsNotNull(name) => attributes.iter().any(|a| &a.name == name),
        Predicate::And(l, r) => eval(l, attributes) && eval(r, attributes),
        Predicate::Or(l, r) => eval(l, attributes) || eval(r, attributes),
    }
}

/// Lexicographic comparison, matching the store's string-ordered values.
fn compare(op: CmpOp, left: &str, right: &str) -> bool {
    match op {
        CmpOp::Eq => left == right,
        CmpOp::Ne => left != right,
        CmpOp::Lt => left < right,
        CmpOp::Le => left <= right,
        CmpOp::Gt => left > right,
        CmpOp::Ge => left >= right,
        CmpOp::Like => like(left, right),
    }
}

/// SQL `like` with `%` wildcards at either end of the pattern.
fn like(value: &str, pattern: &str) -> bool {
    match (pattern.strip_prefix('%'), pattern.strip_suffix('%')) {
        (Some(rest), _) if rest.is_empty() => true,
        (Some(_), Some(_)) => {
            // both ends wildcarded
            let middle = &pattern[1..pattern.len() - 1];
            value.contains(middle)
        }
        (Some(suffix), None) => value.ends_with(suffix),
        (None, Some(prefix)) => value.starts_with(prefix),
        (None, None) => value == pattern,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Str(String),
    Op(String),
    Star,
    Comma,
    LParen,
    RParen,
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn parse(mut self) -> Result<SelectExpr> {
        self.expect_keyword("select")?;
        let projection = self.parse_projection()?;
        self.expect_keyword("from")?;
        let domain_name = self.parse_word()?;

        let mut predicate = None;
        let mut limit = None;

        if self.peek_keyword("where") {
            self.pos += 1;
            predicate = Some(self.parse_or()?);
        }
        if self.peek_keyword("limit") {
            self.pos += 1;
            let n = self.parse_word()?;
            limit = Some(
                n.parse()
                    .map_err(|_| invalid(format!("bad limit: {n}")))?,
            );
        }
        if self.pos != self.tokens.len() {
            return Err(invalid("trailing input after expression"));
        }

        Ok(SelectExpr {
            projection,
            domain_name,
            predicate,
            limit,
        })
    }

    fn parse_projection(&mut self) -> Result<Projection> {
        if matches!(self.peek(), Some(Token::Star)) {
            self.pos += 1;
            return Ok(Projection::All);
        }

        let first = self.parse_word()?;
        if first.eq_ignore_ascii_case("itemname") && self.eat(&Token::LParen) {
            if !self.eat(&Token::RParen) {
                return Err(invalid("expected ')' after itemName("));
            }
            return Ok(Projection::ItemNames);
        }

        let mut names = vec![first];
        while self.eat(&Token::Comma) {
            names.push(self.parse_word()?);
        }
        Ok(Projection::Attributes(names))
    }

    fn parse_or(&mut self) -> Result<Predicate> {
        let mut left = self.parse_and()?;
        while self.peek_keyword("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Predicate::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Predicate> {
        let mut left = self.parse_predicate()?;
        while self.peek_keyword("and") {
            self.pos += 1;
            let right = self.parse_predicate()?;
            left = Predicate::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_predicate(&mut self) -> Result<Predicate> {
        let name = self.parse_word()?;

        if self.peek_keyword("is") {
            self.pos += 1;
            if self.peek_keyword("not") {
                self.pos += 1;
                self.expect_keyword("null")?;
                return Ok(Predicate::IsNotNull(name));
            }
            self.expect_keyword("null")?;
            return Ok(Predicate::IsNull(name));
        }

        let op = match self.next() {
            Some(Token::Op(op)) => match op.as_str() {
                "=" => CmpOp::Eq,
                "!=" => CmpOp::Ne,
                "<" => CmpOp::Lt,
                "<=" => CmpOp::Le,
                ">" => CmpOp::Gt,
                ">=" => CmpOp::Ge,
                other => return Err(invalid(format!("unknown operator: {other}"))),
            },
            Some(Token::Word(w)) if w.eq_ignore_ascii_case("like") => CmpOp::Like,
            _ => return Err(invalid(format!("expected operator after '{name}'"))),
        };

        match self.next() {
            Some(Token::Str(value)) => Ok(Predicate::Compare { name, op, value }),
            _ => Err(invalid("expected quoted value after operator")),
        }
    }

    fn parse_word(&mut self) -> Result<String> {
        match self.next() {
            Some(Token::Word(w)) => Ok(w),
            other => Err(invalid(format!("expected identifier, found {other:?}"))),
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<()> {
        if self.peek_keyword(keyword) {
            self.pos += 1;
            Ok(())
        } else {
            Err(invalid(format!("expected '{keyword}'")))
        }
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Token::Word(w)) if w.eq_ignore_ascii_case(keyword))
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '*' => {
                chars.next();
                tokens.push(Token::Star);
            }
            ',' => {
                chars.next();
                tokens.push(Token::Comma);
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '\'' => {
                chars.next();
                let mut value = String::new();
                loop {
                    match chars.next() {
                        Some('\'') => {
                            // '' escapes a literal quote
                            if chars.peek() == Some(&'\'') {
                                chars.next();
                                value.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some(c) => value.push(c),
                        None => return Err(invalid("unterminated string literal")),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '=' => {
                chars.next();
                tokens.push(Token::Op("=".into()));
            }
            '!' | '<' | '>' => {
                chars.next();
                let mut op = c.to_string();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    op.push('=');
                } else if c == '!' {
                    return Err(invalid("lone '!' is not an operator"));
                }
                tokens.push(Token::Op(op));
            }
            c if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                        word.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Word(word));
            }
            other => return Err(invalid(format!("unexpected character: {other}"))),
        }
    }

    Ok(tokens)
}

fn invalid(message: impl Into<String>) -> StoreError {
    StoreError::InvalidQueryExpression(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, attrs: &[(&str, &str)]) -> Item {
        Item::new(
            name,
            attrs.iter().map(|(n, v)| Attribute::new(*n, *v)).collect(),
        )
    }

    #[test]
    fn parses_select_star() {
        let expr = SelectExpr::parse("select * from users").unwrap();
        assert_eq!(expr.projection, Projection::All);
        assert_eq!(expr.domain_name, "users");
        assert_eq!(expr.predicate, None);
        assert_eq!(expr.limit, None);
    }

    #[test]
    fn parses_item_name_projection() {
        let expr = SelectExpr::parse("select itemName() from users").unwrap();
        assert_eq!(expr.projection, Projection::ItemNames);

        let projected = expr.project(&item("u1", &[("a", "1")]));
        assert_eq!(projected.name, "u1");
        assert!(projected.attributes.is_empty());
    }

    #[test]
    fn parses_attribute_list_projection() {
        let expr = SelectExpr::parse("select name, email from users").unwrap();
        assert_eq!(
            expr.projection,
            Projection::Attributes(vec!["name".into(), "email".into()])
        );

        let projected = expr.project(&item("u1", &[("name", "ada"), ("age", "36")]));
        assert_eq!(projected.attributes, vec![Attribute::new("name", "ada")]);
    }

    #[test]
    fn where_equality_matches_any_value() {
        let expr = SelectExpr::parse("select * from users where color = 'red'").unwrap();
        assert!(expr.matches(&item("u1", &[("color", "blue"), ("color", "red")])));
        assert!(!expr.matches(&item("u2", &[("color", "blue")])));
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // a = '1' or (b = '2' and c = '3')
        let expr =
            SelectExpr::parse("select * from d where a = '1' or b = '2' and c = '3'").unwrap();
        assert!(expr.matches(&item("i", &[("a", "1")])));
        assert!(expr.matches(&item("i", &[("b", "2"), ("c", "3")])));
        assert!(!expr.matches(&item("i", &[("b", "2")])));
    }

    #[test]
    fn like_wildcards() {
        let ends = SelectExpr::parse("select * from d where host like '%.example.com'").unwrap();
        assert!(ends.matches(&item("i", &[("host", "mail.example.com")])));
        assert!(!ends.matches(&item("i", &[("host", "example.org")])));

        let contains = SelectExpr::parse("select * from d where host like '%mail%'").unwrap();
        assert!(contains.matches(&item("i", &[("host", "a-mail-b")])));

        let starts = SelectExpr::parse("select * from d where host like 'mail%'").unwrap();
        assert!(starts.matches(&item("i", &[("host", "mail.example.com")])));
        assert!(!starts.matches(&item("i", &[("host", "webmail")])));
    }

    #[test]
    fn null_tests() {
        let is_null = SelectExpr::parse("select * from d where email is null").unwrap();
        assert!(is_null.matches(&item("i", &[("name", "ada")])));
        assert!(!is_null.matches(&item("i", &[("email", "a@b.c")])));

        let not_null = SelectExpr::parse("select * from d where email is not null").unwrap();
        assert!(not_null.matches(&item("i", &[("email", "a@b.c")])));
    }

    #[test]
    fn quoted_value_escapes() {
        let expr = SelectExpr::parse("select * from d where note = 'it''s fine'").unwrap();
        assert!(expr.matches(&item("i", &[("note", "it's fine")])));
    }

    #[test]
    fn lexicographic_range_ops() {
        let expr = SelectExpr::parse("select * from d where score >= '50'").unwrap();
        assert!(expr.matches(&item("i", &[("score", "61")])));
        assert!(!expr.matches(&item("i", &[("score", "49")])));
    }

    #[test]
    fn limit_clause() {
        let expr = SelectExpr::parse("select * from d limit 10").unwrap();
        assert_eq!(expr.limit, Some(10));
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        for bad in [
            "",
            "select",
            "select * from",
            "select * frm users",
            "select * from users where",
            "select * from users where a =",
            "select * from users where a = unquoted",
            "select * from users where a like 'x' bogus",
            "select * from users limit ten",
            "select * from users where note = 'unterminated",
        ] {
            assert!(
                matches!(
                    SelectExpr::parse(bad),
                    Err(StoreError::InvalidQueryExpression(_))
                ),
                "accepted: {bad}"
            );
        }
    }
}
