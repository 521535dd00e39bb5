use crate::errors::ParseError;
use crate::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Real(f64),
    Bool(bool),
    /// `[A-Za-z_][A-Za-z0-9_.]*`, dot-qualified to support `instance.field`.
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Not,
    Comma,
    LParen,
    RParen,
    Eof,
}

pub struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    src: &'a str,
    line: u32,
    line_start: usize,
}

impl<'a> Lexer<'a> {
    #[must_use]
    pub fn new(src: &'a str) -> Self {
        Self {
            chars: src.char_indices().peekable(),
            src,
            line: 1,
            line_start: 0,
        }
    }

    fn span_at(&self, byte_offset: usize) -> Span {
        let column = (byte_offset.saturating_sub(self.line_start)) as u32 + 1;
        Span::new(self.line, column)
    }

    fn bump(&mut self) -> Option<(usize, char)> {
        let next = self.chars.next();
        if let Some((offset, ch)) = next {
            if ch == '\n' {
                self.line += 1;
                self.line_start = offset + 1;
            }
        }
        next
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    /// Tokenises the whole input eagerly, used by the Pratt parser below.
    pub fn tokenize(mut self) -> Result<Vec<(Token, Span)>, ParseError> {
        let mut out = Vec::new();
        loop {
            self.skip_whitespace();
            let Some(&(offset, ch)) = self.chars.peek() else {
                out.push((Token::Eof, self.span_at(self.src.len())));
                break;
            };
            let span = self.span_at(offset);
            let tok = if ch.is_ascii_digit() || (ch == '.' && self.starts_number()) {
                self.lex_number(span)?
            } else if ch == '_' || ch.is_alphabetic() {
                self.lex_ident(span)
            } else {
                self.lex_symbol(span)?
            };
            out.push((tok, span));
        }
        Ok(out)
    }

    fn starts_number(&mut self) -> bool {
        let mut ahead = self.chars.clone();
        ahead.next();
        matches!(ahead.peek(), Some((_, c)) if c.is_ascii_digit())
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn lex_number(&mut self, span: Span) -> Result<Token, ParseError> {
        let start = self.chars.peek().map(|(o, _)| *o).unwrap_or(self.src.len());
        let mut end = start;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.bump();
                end += c.len_utf8();
            } else {
                break;
            }
        }
        if self.peek_char() == Some('.') {
            self.bump();
            end += 1;
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    self.bump();
                    end += c.len_utf8();
                } else {
                    break;
                }
            }
        }
        if matches!(self.peek_char(), Some('e') | Some('E')) {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            let exp_ok = matches!(lookahead.peek(), Some((_, c)) if c.is_ascii_digit() || *c == '+' || *c == '-');
            if exp_ok {
                self.bump();
                end += 1;
                if matches!(self.peek_char(), Some('+') | Some('-')) {
                    let (_, c) = self.bump().unwrap();
                    end += c.len_utf8();
                }
                while let Some(c) = self.peek_char() {
                    if c.is_ascii_digit() {
                        self.bump();
                        end += c.len_utf8();
                    } else {
                        break;
                    }
                }
            }
        }
        let text = &self.src[start..end];
        text.parse::<f64>()
            .map(Token::Real)
            .map_err(|_| ParseError {
                span,
                message: "invalid numeric literal".to_string(),
                found: text.to_string(),
            })
    }

    fn lex_ident(&mut self, _span: Span) -> Token {
        let start = self.chars.peek().map(|(o, _)| *o).unwrap_or(self.src.len());
        let mut end = start;
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                self.bump();
                end += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.src[start..end];
        match text {
            "true" => Token::Bool(true),
            "false" => Token::Bool(false),
            _ => Token::Ident(text.to_string()),
        }
    }

    fn lex_symbol(&mut self, span: Span) -> Result<Token, ParseError> {
        let (_, ch) = self.bump().expect("peeked above");
        let tok = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            ',' => Token::Comma,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '=' if self.peek_char() == Some('=') => {
                self.bump();
                Token::Eq
            }
            '!' if self.peek_char() == Some('=') => {
                self.bump();
                Token::Ne
            }
            '!' => Token::Not,
            '<' if self.peek_char() == Some('=') => {
                self.bump();
                Token::Le
            }
            '<' => Token::Lt,
            '>' if self.peek_char() == Some('=') => {
                self.bump();
                Token::Ge
            }
            '>' => Token::Gt,
            '&' if self.peek_char() == Some('&') => {
                self.bump();
                Token::AndAnd
            }
            '|' if self.peek_char() == Some('|') => {
                self.bump();
                Token::OrOr
            }
            other => {
                return Err(ParseError {
                    span,
                    message: "unexpected character".to_string(),
                    found: other.to_string(),
                })
            }
        };
        Ok(tok)
    }
}
