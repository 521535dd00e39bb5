//! Precedence-climbing (Pratt) parser for the Formula grammar (spec.md §4.1).

use crate::ast::{BinaryOp, Builtin, Formula, UnaryOp};
use crate::errors::ParseError;
use crate::lexer::{Lexer, Token};
use crate::span::Span;

pub struct Parser {
    tokens: Vec<(Token, Span)>,
    pos: usize,
}

/// Parses `src` into a [`Formula`], or a [`ParseError`] naming the offending
/// token and its column (spec.md §4.1).
pub fn parse(src: &str) -> Result<Formula, ParseError> {
    let tokens = Lexer::new(src).tokenize()?;
    let mut parser = Parser { tokens, pos: 0 };
    let formula = parser.parse_expr(0)?;
    parser.expect_eof()?;
    Ok(formula)
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos].0
    }

    fn peek_span(&self) -> Span {
        self.tokens[self.pos].1
    }

    fn advance(&mut self) -> Token {
        let tok = self.tokens[self.pos].0.clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn expect_eof(&self) -> Result<(), ParseError> {
        if matches!(self.peek(), Token::Eof) {
            Ok(())
        } else {
            Err(self.unexpected("end of expression"))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        ParseError {
            span: self.peek_span(),
            message: format!("expected {expected}"),
            found: format!("{:?}", self.peek()),
        }
    }

    fn expect(&mut self, tok: &Token) -> Result<(), ParseError> {
        if self.peek() == tok {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{tok:?}")))
        }
    }

    /// Parses an expression whose leading operator must bind tighter than
    /// `min_precedence`.
    fn parse_expr(&mut self, min_precedence: u8) -> Result<Formula, ParseError> {
        let mut lhs = self.parse_prefix()?;
        loop {
            let Some(op) = binary_op_for(self.peek()) else {
                break;
            };
            let prec = op.precedence();
            if prec < min_precedence {
                break;
            }
            self.advance();
            let next_min = if op.is_left_assoc() { prec + 1 } else { prec };
            let rhs = self.parse_expr(next_min)?;
            lhs = fold_nary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> Result<Formula, ParseError> {
        match self.peek().clone() {
            Token::Minus => {
                self.advance();
                let inner = self.parse_expr(BinaryOp::Mul.precedence() + 1)?;
                Ok(Formula::Unary(UnaryOp::Negate, Box::new(inner)))
            }
            Token::Not => {
                self.advance();
                let inner = self.parse_expr(BinaryOp::And.precedence() + 1)?;
                Ok(Formula::Unary(UnaryOp::Not, Box::new(inner)))
            }
            Token::Real(x) => {
                self.advance();
                Ok(Formula::RealLiteral(x))
            }
            Token::Bool(b) => {
                self.advance();
                Ok(Formula::BoolLiteral(b))
            }
            Token::Ident(name) => {
                self.advance();
                if matches!(self.peek(), Token::LParen) {
                    self.parse_call(name)
                } else {
                    Ok(Formula::Variable(name))
                }
            }
            Token::LParen => {
                self.advance();
                let inner = self.parse_expr(0)?;
                self.expect(&Token::RParen)?;
                Ok(inner)
            }
            _ => Err(self.unexpected("a literal, identifier, '(' or unary operator")),
        }
    }

    fn parse_call(&mut self, name: String) -> Result<Formula, ParseError> {
        self.expect(&Token::LParen)?;
        let mut args = Vec::new();
        if !matches!(self.peek(), Token::RParen) {
            loop {
                args.push(self.parse_expr(0)?);
                if matches!(self.peek(), Token::Comma) {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(&Token::RParen)?;
        if let Some(builtin) = Builtin::from_name(&name) {
            Ok(Formula::Builtin(builtin, args))
        } else {
            Ok(Formula::Call(name, args))
        }
    }
}

fn binary_op_for(tok: &Token) -> Option<BinaryOp> {
    Some(match tok {
        Token::Plus => BinaryOp::Add,
        Token::Minus => BinaryOp::Sub,
        Token::Star => BinaryOp::Mul,
        Token::Slash => BinaryOp::Div,
        Token::Caret => BinaryOp::Pow,
        Token::Eq => BinaryOp::Eq,
        Token::Ne => BinaryOp::Ne,
        Token::Lt => BinaryOp::Lt,
        Token::Le => BinaryOp::Le,
        Token::Gt => BinaryOp::Gt,
        Token::Ge => BinaryOp::Ge,
        Token::AndAnd => BinaryOp::And,
        Token::OrOr => BinaryOp::Or,
        _ => return None,
    })
}

/// Chained `&&`/`||` of the same kind fold into a single [`Formula::Nary`]
/// node rather than a right-leaning stack of [`Formula::Binary`] nodes, so
/// that `a && b && c` serializes and re-parses without accumulating
/// redundant parentheses (the round-trip law in spec.md §8).
fn fold_nary(op: BinaryOp, lhs: Formula, rhs: Formula) -> Formula {
    let nary = match op {
        BinaryOp::And => Some(crate::ast::NaryOp::And),
        BinaryOp::Or => Some(crate::ast::NaryOp::Or),
        _ => None,
    };
    let Some(nary) = nary else {
        return Formula::Binary(op, Box::new(lhs), Box::new(rhs));
    };
    let mut args = match lhs {
        Formula::Nary(k, items) if k == nary => items,
        other => vec![other],
    };
    args.push(rhs);
    Formula::Nary(nary, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::to_infix;

    #[test]
    fn parses_arithmetic_with_precedence() {
        let f = parse("1 + 2 * 3").unwrap();
        assert_eq!(
            f,
            Formula::Binary(
                BinaryOp::Add,
                Box::new(Formula::real(1.0)),
                Box::new(Formula::Binary(
                    BinaryOp::Mul,
                    Box::new(Formula::real(2.0)),
                    Box::new(Formula::real(3.0)),
                )),
            )
        );
    }

    #[test]
    fn parses_pow_right_associative() {
        let f = parse("2 ^ 3 ^ 2").unwrap();
        assert_eq!(to_infix(&f), "2 ^ (3 ^ 2)");
    }

    #[test]
    fn chained_and_folds_into_nary() {
        let f = parse("a && b && c").unwrap();
        assert!(matches!(f, Formula::Nary(crate::ast::NaryOp::And, ref args) if args.len() == 3));
    }

    #[test]
    fn qualified_identifier() {
        let f = parse("cell.voltage").unwrap();
        assert_eq!(f, Formula::var("cell.voltage"));
    }

    #[test]
    fn builtin_call() {
        let f = parse("sqrt(x)").unwrap();
        assert_eq!(f, Formula::Builtin(Builtin::Sqrt, vec![Formula::var("x")]));
    }

    #[test]
    fn user_function_call() {
        let f = parse("clamp(x, 0, 1)").unwrap();
        assert_eq!(
            f,
            Formula::Call(
                "clamp".to_string(),
                vec![Formula::var("x"), Formula::real(0.0), Formula::real(1.0)],
            )
        );
    }

    #[test]
    fn reports_column_on_error() {
        let err = parse("1 + ").unwrap_err();
        assert_eq!(err.span.column, 5);
    }

    #[test]
    fn unbalanced_parens_is_parse_error() {
        assert!(parse("(1 + 2").is_err());
    }
}
