//! Recursive-descent parser for the predicate language
//!
//! Precedence, loosest first: `or`/`|`, `and`/`&`, `not`/`~`, comparison,
//! postfix (subscript, attribute, call).

use super::ast::{Arg, CompareOp, Expr, Literal};
use super::fault::PredicateFault;
use super::lexer::{tokenize, Token, TokenKind};

/// Deepest nesting accepted before the input is rejected
const MAX_DEPTH: usize = 64;

/// Name of the only dataset binding
pub const FRAME_BINDING: &str = "df";

pub fn parse(source: &str) -> Result<Expr, PredicateFault> {
    if source.trim().is_empty() {
        return Err(PredicateFault::syntax("empty expression", 0));
    }
    let tokens = tokenize(source)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.expr()?;
    let trailing = parser.peek();
    if trailing.kind != TokenKind::Eof {
        return Err(PredicateFault::syntax(
            format!("unexpected {} after expression", trailing.kind.describe()),
            trailing.offset,
        ));
    }
    Ok(expr)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> &Token {
        // tokenize always ends with Eof and we never advance past it
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.peek().kind
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, PredicateFault> {
        let token = self.peek().clone();
        if token.kind == kind {
            Ok(self.advance())
        } else {
            Err(PredicateFault::syntax(
                format!("expected {}, found {}", kind.describe(), token.kind.describe()),
                token.offset,
            ))
        }
    }

    fn enter(&mut self) -> Result<(), PredicateFault> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(PredicateFault::syntax(
                "expression nested too deeply",
                self.peek().offset,
            ));
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<Expr, PredicateFault> {
        self.enter()?;
        let result = self.or();
        self.depth -= 1;
        result
    }

    // Chains fold to the left: every extra operand is one more level of
    // nesting in the tree and counts toward MAX_DEPTH.
    fn or(&mut self) -> Result<Expr, PredicateFault> {
        let outer = self.depth;
        let result = self.or_chain();
        self.depth = outer;
        result
    }

    fn or_chain(&mut self) -> Result<Expr, PredicateFault> {
        let mut left = self.and()?;
        while matches!(self.peek_kind(), TokenKind::Pipe | TokenKind::Or) {
            self.advance();
            self.enter()?;
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, PredicateFault> {
        let outer = self.depth;
        let result = self.and_chain();
        self.depth = outer;
        result
    }

    fn and_chain(&mut self) -> Result<Expr, PredicateFault> {
        let mut left = self.not()?;
        while matches!(self.peek_kind(), TokenKind::Amp | TokenKind::And) {
            self.advance();
            self.enter()?;
            let right = self.not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn not(&mut self) -> Result<Expr, PredicateFault> {
        if matches!(self.peek_kind(), TokenKind::Tilde | TokenKind::Not) {
            self.advance();
            self.enter()?;
            let inner = self.not();
            self.depth -= 1;
            return Ok(Expr::Not(Box::new(inner?)));
        }
        self.compare()
    }

    fn compare(&mut self) -> Result<Expr, PredicateFault> {
        let left = self.postfix()?;
        let op = match self.peek_kind() {
            TokenKind::EqEq => CompareOp::Eq,
            TokenKind::NotEq => CompareOp::Ne,
            TokenKind::Lt => CompareOp::Lt,
            TokenKind::Le => CompareOp::Le,
            TokenKind::Gt => CompareOp::Gt,
            TokenKind::Ge => CompareOp::Ge,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.postfix()?;
        Ok(Expr::Compare {
            left: Box::new(left),
            op,
            right: Box::new(right),
        })
    }

    fn postfix(&mut self) -> Result<Expr, PredicateFault> {
        let outer = self.depth;
        let result = self.postfix_chain();
        self.depth = outer;
        result
    }

    fn postfix_chain(&mut self) -> Result<Expr, PredicateFault> {
        let mut expr = self.primary()?;
        loop {
            if matches!(
                self.peek_kind(),
                TokenKind::LBracket | TokenKind::Dot | TokenKind::LParen
            ) {
                self.enter()?;
            }
            match self.peek_kind() {
                TokenKind::LBracket => {
                    self.advance();
                    let index = self.sequence(TokenKind::RBracket)?;
                    let index = match index {
                        Sequence::Single(expr) => expr,
                        Sequence::Many(items) => Expr::List(items),
                    };
                    expr = Expr::Index {
                        target: Box::new(expr),
                        index: Box::new(index),
                    };
                }
                TokenKind::Dot => {
                    self.advance();
                    let token = self.advance();
                    let name = match token.kind {
                        TokenKind::Ident(name) => name,
                        other => {
                            return Err(PredicateFault::syntax(
                                format!("expected attribute name, found {}", other.describe()),
                                token.offset,
                            ));
                        }
                    };
                    expr = Expr::Attribute {
                        target: Box::new(expr),
                        name,
                    };
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.call_args()?;
                    expr = Expr::Call {
                        target: Box::new(expr),
                        args,
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn primary(&mut self) -> Result<Expr, PredicateFault> {
        let token = self.advance();
        match token.kind {
            TokenKind::Ident(name) if name == FRAME_BINDING => Ok(Expr::Frame),
            TokenKind::Ident(name) => Ok(Expr::Name(name)),
            TokenKind::Str(text) => {
                // adjacent literals concatenate
                let mut text = text;
                while let TokenKind::Str(more) = self.peek_kind().clone() {
                    self.advance();
                    text.push_str(&more);
                }
                Ok(Expr::Literal(Literal::Str(text)))
            }
            TokenKind::Number(value) => Ok(Expr::Literal(Literal::Number(value))),
            TokenKind::Minus => {
                let next = self.advance();
                match next.kind {
                    TokenKind::Number(value) => Ok(Expr::Literal(Literal::Number(-value))),
                    other => Err(PredicateFault::syntax(
                        format!("expected number after '-', found {}", other.describe()),
                        next.offset,
                    )),
                }
            }
            TokenKind::True => Ok(Expr::Literal(Literal::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Literal::Bool(false))),
            TokenKind::None => Ok(Expr::Literal(Literal::None)),
            TokenKind::LParen => match self.sequence(TokenKind::RParen)? {
                Sequence::Single(expr) => Ok(expr),
                Sequence::Many(items) => Ok(Expr::List(items)),
            },
            TokenKind::LBracket => match self.sequence(TokenKind::RBracket)? {
                Sequence::Single(expr) => Ok(Expr::List(vec![expr])),
                Sequence::Many(items) => Ok(Expr::List(items)),
            },
            other => Err(PredicateFault::syntax(
                format!("unexpected {}", other.describe()),
                token.offset,
            )),
        }
    }

    /// Comma-separated expressions up to `close`. A trailing comma or an empty
    /// sequence makes it a list even with a single element.
    fn sequence(&mut self, close: TokenKind) -> Result<Sequence, PredicateFault> {
        let mut items = Vec::new();
        let mut trailing_comma = false;
        while self.peek_kind() != &close {
            items.push(self.expr()?);
            trailing_comma = self.eat(&TokenKind::Comma);
            if !trailing_comma {
                break;
            }
        }
        self.expect(close)?;
        if items.len() == 1 && !trailing_comma {
            Ok(Sequence::Single(items.remove(0)))
        } else {
            Ok(Sequence::Many(items))
        }
    }

    fn call_args(&mut self) -> Result<Vec<Arg>, PredicateFault> {
        let mut args = Vec::new();
        while self.peek_kind() != &TokenKind::RParen {
            let keyword = match (self.peek_kind(), self.tokens.get(self.pos + 1).map(|t| &t.kind)) {
                (TokenKind::Ident(name), Some(TokenKind::Assign)) => Some(name.clone()),
                _ => None,
            };
            if keyword.is_some() {
                self.advance();
                self.advance();
            } else if args.iter().any(|arg: &Arg| arg.name.is_some()) {
                return Err(PredicateFault::syntax(
                    "positional argument follows keyword argument",
                    self.peek().offset,
                ));
            }
            let value = self.expr()?;
            args.push(Arg {
                name: keyword,
                value,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }
}

enum Sequence {
    Single(Expr),
    Many(Vec<Expr>),
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
