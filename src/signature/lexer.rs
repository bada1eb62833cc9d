//! Token lexer for single-declaration signature strings
//!
//! Keywords are not distinguished at the token level; the parser inspects
//! identifier text. `>>` in nested generics lexes as two `>` tokens since
//! the signature grammar has no shift operator.

use logos::Logos;

use crate::error::{JavadoxError, Result};

/// Signature tokens
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"0[xX][0-9a-fA-F_]+[lL]?")]
    #[regex(r"[0-9][0-9_]*(\.[0-9_]+)?([eE][+-]?[0-9]+)?[fFdDlL]?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    StringLit,

    #[regex(r"'([^'\\]|\\.)'")]
    CharLit,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token(",")]
    Comma,
    #[token("...")]
    Ellipsis,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token(";")]
    Semi,
    #[token("-")]
    Minus,

    /// End of input sentinel, never produced by the lexer itself
    Eof,
}

impl Token {
    /// Short description used in parse error messages
    pub fn describe(self) -> &'static str {
        match self {
            Self::Ident => "identifier",
            Self::Number => "number",
            Self::StringLit => "string literal",
            Self::CharLit => "character literal",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LBrace => "'{'",
            Self::RBrace => "'}'",
            Self::Lt => "'<'",
            Self::Gt => "'>'",
            Self::Comma => "','",
            Self::Ellipsis => "'...'",
            Self::Dot => "'.'",
            Self::Question => "'?'",
            Self::Amp => "'&'",
            Self::At => "'@'",
            Self::Eq => "'='",
            Self::Semi => "';'",
            Self::Minus => "'-'",
            Self::Eof => "end of signature",
        }
    }

    /// Whether this token can stand alone as a displayable literal initializer
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Number | Self::StringLit | Self::CharLit)
    }
}

/// Pre-lexed token stream with one-token text access
pub struct TokenStream<'src> {
    source: &'src str,
    tokens: Vec<(Token, std::ops::Range<usize>)>,
    pos: usize,
}

impl<'src> TokenStream<'src> {
    /// Lex an entire signature up front; fails on any unrecognized character
    pub fn tokenize(source: &'src str) -> Result<Self> {
        let mut tokens = Vec::new();
        for (result, span) in Token::lexer(source).spanned() {
            match result {
                Ok(token) => tokens.push((token, span)),
                Err(()) => {
                    return Err(JavadoxError::SignatureSyntax {
                        message: format!(
                            "unrecognized character {:?} at offset {}",
                            &source[span.start..span.end.min(source.len())],
                            span.start
                        ),
                    })
                }
            }
        }
        Ok(Self {
            source,
            tokens,
            pos: 0,
        })
    }

    /// Current token without consuming it
    pub fn peek(&self) -> Token {
        self.lookahead(0)
    }

    /// Token `n` positions ahead of the current one
    pub fn lookahead(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .map(|(t, _)| *t)
            .unwrap_or(Token::Eof)
    }

    /// Source text of the current token
    pub fn peek_text(&self) -> &'src str {
        match self.tokens.get(self.pos) {
            Some((_, span)) => &self.source[span.clone()],
            None => "",
        }
    }

    /// Source text of the token `n` positions ahead, when one exists
    pub fn text_at(&self, n: usize) -> Option<&'src str> {
        self.tokens
            .get(self.pos + n)
            .map(|(_, span)| &self.source[span.clone()])
    }

    /// Byte offset of the current token, for error messages
    pub fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|(_, span)| span.start)
            .unwrap_or(self.source.len())
    }

    /// Consume and return the current token with its text
    pub fn advance(&mut self) -> (Token, &'src str) {
        match self.tokens.get(self.pos) {
            Some((token, span)) => {
                self.pos += 1;
                (*token, &self.source[span.clone()])
            }
            None => (Token::Eof, ""),
        }
    }

    /// Consume the current token if it matches
    pub fn eat(&mut self, token: Token) -> bool {
        if self.peek() == token {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume a token of the given kind or fail with a description of both sides
    pub fn expect(&mut self, token: Token) -> Result<&'src str> {
        if self.peek() == token {
            let (_, text) = self.advance();
            Ok(text)
        } else {
            Err(self.error_here(&format!(
                "expected {}, found {}",
                token.describe(),
                self.peek().describe()
            )))
        }
    }

    /// Build a syntax error anchored at the current token
    pub fn error_here(&self, message: &str) -> JavadoxError {
        JavadoxError::SignatureSyntax {
            message: format!("{} at offset {}", message, self.offset()),
        }
    }

    /// True when every token has been consumed
    pub fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        let mut ts = TokenStream::tokenize(source).unwrap();
        let mut out = Vec::new();
        while !ts.at_end() {
            out.push(ts.advance().0);
        }
        out
    }

    #[test]
    fn test_basic_method_tokens() {
        assert_eq!(
            kinds("List<String> get(int index)"),
            vec![
                Token::Ident,
                Token::Lt,
                Token::Ident,
                Token::Gt,
                Token::Ident,
                Token::LParen,
                Token::Ident,
                Token::Ident,
                Token::RParen,
            ]
        );
    }

    #[test]
    fn test_double_close_angle_is_two_tokens() {
        assert_eq!(
            kinds("Map<String,List<T>>"),
            vec![
                Token::Ident,
                Token::Lt,
                Token::Ident,
                Token::Comma,
                Token::Ident,
                Token::Lt,
                Token::Ident,
                Token::Gt,
                Token::Gt,
            ]
        );
    }

    #[test]
    fn test_ellipsis_before_dot() {
        assert_eq!(
            kinds("String... args"),
            vec![Token::Ident, Token::Ellipsis, Token::Ident]
        );
        assert_eq!(kinds("a.b"), vec![Token::Ident, Token::Dot, Token::Ident]);
    }

    #[test]
    fn test_literals() {
        assert_eq!(kinds("100"), vec![Token::Number]);
        assert_eq!(kinds("0xFF_FFL"), vec![Token::Number]);
        assert_eq!(kinds("3.14f"), vec![Token::Number]);
        assert_eq!(kinds(r#""hi\"there""#), vec![Token::StringLit]);
        assert_eq!(kinds(r"'\n'"), vec![Token::CharLit]);
    }

    #[test]
    fn test_unrecognized_character() {
        assert!(TokenStream::tokenize("int ~x").is_err());
    }

    #[test]
    fn test_expect_reports_both_tokens() {
        let mut ts = TokenStream::tokenize("foo").unwrap();
        let err = ts.expect(Token::LParen).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'('"), "{msg}");
        assert!(msg.contains("identifier"), "{msg}");
    }
}
