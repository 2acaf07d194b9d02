// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Tokenizer for PHP source code.
//!
//! Produces a flat, lossless token stream: every byte of the input belongs to
//! exactly one token, so the source text between any two tokens can be
//! recovered from their spans. Only the keywords the structural queries need
//! are classified; every other word is an [`TokenKind::Identifier`].
//!
//! # Lexing Rules
//!
//! - Text outside `<?php` / `<?=` / `<?` ... `?>` is [`TokenKind::InlineHtml`]
//! - Keywords are matched case-insensitively, as PHP does
//! - A word directly after `->`, `?->`, `::`, `\`, `function` or `const`, or
//!   directly before `\`, is always a name (`Foo::class`, `App\Interface\Foo`)
//! - Qualified names are split into identifier and `\` tokens
//! - Strings, heredocs and nowdocs are single opaque tokens
//!
//! Unterminated strings, comments and heredocs are errors: the structural view
//! of a file with one of those cannot be trusted.

use thiserror::Error;
use tugsniff_core::types::Span;

// ============================================================================
// Token Types
// ============================================================================

/// Kind of a PHP token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Text outside PHP tags.
    InlineHtml,
    /// `<?php`, `<?=` or `<?`.
    OpenTag,
    /// `?>` (with one trailing newline).
    CloseTag,
    Whitespace,
    /// `// ...`, `# ...` or `/* ... */`.
    Comment,
    /// `/** ... */`.
    DocComment,
    /// `$name`.
    Variable,
    /// Any word that is not one of the keywords below.
    Identifier,
    Number,
    /// Single/double quoted, backtick, heredoc or nowdoc string.
    StringLiteral,

    // Keywords
    Class,
    Interface,
    Trait,
    Extends,
    Implements,
    Function,
    Use,
    Namespace,
    As,
    Const,
    New,

    // Punctuation
    /// `\`
    NsSeparator,
    Colon,
    DoubleColon,
    Semicolon,
    Comma,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    /// `#[`
    AttributeOpen,
    /// `->` or `?->`
    ObjectOperator,
    Question,
    Ampersand,
    /// Any other operator character.
    Operator,
}

impl TokenKind {
    /// Whitespace and comments.
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }

    /// Identifiers and keywords.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Trait
                | TokenKind::Extends
                | TokenKind::Implements
                | TokenKind::Function
                | TokenKind::Use
                | TokenKind::Namespace
                | TokenKind::As
                | TokenKind::Const
                | TokenKind::New
        )
    }

    fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "class" => TokenKind::Class,
            "interface" => TokenKind::Interface,
            "trait" => TokenKind::Trait,
            "extends" => TokenKind::Extends,
            "implements" => TokenKind::Implements,
            "function" => TokenKind::Function,
            "use" => TokenKind::Use,
            "namespace" => TokenKind::Namespace,
            "as" => TokenKind::As,
            "const" => TokenKind::Const,
            "new" => TokenKind::New,
            _ => return None,
        };
        Some(kind)
    }
}

/// A token: its kind and the byte span it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Errors that make a file impossible to tokenize.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenizeError {
    #[error("unterminated {kind} starting at byte {offset}")]
    Unterminated { kind: &'static str, offset: usize },
}

/// Tokenize PHP source into a lossless token stream.
pub fn tokenize(source: &str) -> Result<Vec<Token>, TokenizeError> {
    Lexer::new(source).run()
}

// ============================================================================
// Lexer
// ============================================================================

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_continue(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

/// Find the first PHP open tag, returning `(offset, length)`.
fn find_open_tag(text: &str) -> Option<(usize, usize)> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(rel) = text[from..].find("<?") {
        let at = from + rel;
        let after = &bytes[at + 2..];
        if after.len() >= 3 && after[..3].eq_ignore_ascii_case(b"php") {
            if after.len() == 3 || after[3].is_ascii_whitespace() {
                return Some((at, 5));
            }
            from = at + 2;
            continue;
        }
        if after.first() == Some(&b'=') {
            return Some((at, 3));
        }
        return Some((at, 2));
    }
    None
}

struct Lexer<'s> {
    src: &'s str,
    bytes: &'s [u8],
    pos: usize,
    tokens: Vec<Token>,
}

impl<'s> Lexer<'s> {
    fn new(src: &'s str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut in_php = false;
        while self.pos < self.bytes.len() {
            if in_php {
                in_php = self.php_token()?;
            } else {
                self.inline_html();
                in_php = true;
            }
        }
        Ok(self.tokens)
    }

    fn push(&mut self, kind: TokenKind, start: usize) {
        self.tokens.push(Token {
            kind,
            span: Span::new(start, self.pos),
        });
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.pos < self.bytes.len() && pred(self.bytes[self.pos]) {
            self.pos += 1;
        }
    }

    fn inline_html(&mut self) {
        let start = self.pos;
        match find_open_tag(&self.src[start..]) {
            Some((offset, len)) => {
                if offset > 0 {
                    self.pos = start + offset;
                    self.push(TokenKind::InlineHtml, start);
                }
                let tag_start = self.pos;
                self.pos += len;
                self.push(TokenKind::OpenTag, tag_start);
            }
            None => {
                self.pos = self.bytes.len();
                self.push(TokenKind::InlineHtml, start);
            }
        }
    }

    /// Lex one token in PHP mode. Returns `false` after a close tag.
    fn php_token(&mut self) -> Result<bool, TokenizeError> {
        let start = self.pos;
        let b = self.bytes[start];
        let kind = match b {
            b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c => {
                self.eat_while(|b| b.is_ascii_whitespace() || b == 0x0b);
                TokenKind::Whitespace
            }
            b'?' if self.starts_with("?>") => {
                self.pos += 2;
                if self.starts_with("\r\n") {
                    self.pos += 2;
                } else if self.starts_with("\n") {
                    self.pos += 1;
                }
                self.push(TokenKind::CloseTag, start);
                return Ok(false);
            }
            b'?' if self.starts_with("?->") => {
                self.pos += 3;
                TokenKind::ObjectOperator
            }
            b'?' => {
                self.pos += 1;
                TokenKind::Question
            }
            b'#' if self.starts_with("#[") => {
                self.pos += 2;
                TokenKind::AttributeOpen
            }
            b'#' => {
                self.line_comment();
                TokenKind::Comment
            }
            b'/' if self.starts_with("//") => {
                self.line_comment();
                TokenKind::Comment
            }
            b'/' if self.starts_with("/*") => self.block_comment()?,
            b'\'' | b'"' | b'`' => {
                self.quoted(b)?;
                TokenKind::StringLiteral
            }
            b'<' if self.starts_with("<<<") => {
                if self.heredoc()? {
                    TokenKind::StringLiteral
                } else {
                    self.pos += 3;
                    TokenKind::Operator
                }
            }
            b'$' if self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.eat_while(is_ident_continue);
                TokenKind::Variable
            }
            b'0'..=b'9' => {
                self.number();
                TokenKind::Number
            }
            b'.' if self.peek(1).is_some_and(|b| b.is_ascii_digit()) => {
                self.number();
                TokenKind::Number
            }
            b'\\' => {
                self.pos += 1;
                TokenKind::NsSeparator
            }
            b':' if self.starts_with("::") => {
                self.pos += 2;
                TokenKind::DoubleColon
            }
            b'-' if self.starts_with("->") => {
                self.pos += 2;
                TokenKind::ObjectOperator
            }
            b':' => self.single(TokenKind::Colon),
            b';' => self.single(TokenKind::Semicolon),
            b',' => self.single(TokenKind::Comma),
            b'{' => self.single(TokenKind::OpenBrace),
            b'}' => self.single(TokenKind::CloseBrace),
            b'(' => self.single(TokenKind::OpenParen),
            b')' => self.single(TokenKind::CloseParen),
            b'[' => self.single(TokenKind::OpenBracket),
            b']' => self.single(TokenKind::CloseBracket),
            b'&' => self.single(TokenKind::Ampersand),
            b if is_ident_start(b) => {
                self.eat_while(is_ident_continue);
                self.classify_word(start)
            }
            // bytes >= 0x80 never get here, so one byte is one char
            _ => self.single(TokenKind::Operator),
        };
        self.push(kind, start);
        Ok(true)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn number(&mut self) {
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'.');
    }

    fn classify_word(&self, start: usize) -> TokenKind {
        if self.peek(0) == Some(b'\\') {
            return TokenKind::Identifier;
        }
        let prev = self
            .tokens
            .iter()
            .rev()
            .find(|t| !t.kind.is_trivia())
            .map(|t| t.kind);
        if matches!(
            prev,
            Some(
                TokenKind::ObjectOperator
                    | TokenKind::DoubleColon
                    | TokenKind::NsSeparator
                    | TokenKind::Function
                    | TokenKind::Const
            )
        ) {
            return TokenKind::Identifier;
        }
        TokenKind::keyword(&self.src[start..self.pos]).unwrap_or(TokenKind::Identifier)
    }

    /// Consume a `//` or `#` comment up to (not including) the newline or `?>`.
    fn line_comment(&mut self) {
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'\n' || self.starts_with("?>") {
                break;
            }
            self.pos += 1;
        }
    }

    fn block_comment(&mut self) -> Result<TokenKind, TokenizeError> {
        let start = self.pos;
        let kind = if self.starts_with("/**") && !self.starts_with("/**/") {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        match self.bytes[start + 2..].windows(2).position(|w| w == b"*/") {
            Some(rel) => {
                self.pos = start + 2 + rel + 2;
                Ok(kind)
            }
            None => Err(TokenizeError::Unterminated {
                kind: "comment",
                offset: start,
            }),
        }
    }

    fn quoted(&mut self, quote: u8) -> Result<(), TokenizeError> {
        let start = self.pos;
        self.pos += 1;
        loop {
            match self.bytes.get(self.pos) {
                None => {
                    return Err(TokenizeError::Unterminated {
                        kind: "string",
                        offset: start,
                    })
                }
                Some(b'\\') => self.pos = (self.pos + 2).min(self.bytes.len()),
                Some(&b) if b == quote => {
                    self.pos += 1;
                    return Ok(());
                }
                Some(_) => self.pos += 1,
            }
        }
    }

    /// Consume a heredoc or nowdoc. Returns `false` (consuming nothing) when
    /// `<<<` is not followed by a valid label line.
    fn heredoc(&mut self) -> Result<bool, TokenizeError> {
        let start = self.pos;
        let mut i = start + 3;
        while matches!(self.bytes.get(i), Some(b' ' | b'\t')) {
            i += 1;
        }
        let quote = match self.bytes.get(i) {
            Some(&q @ (b'\'' | b'"')) => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        if !self.bytes.get(i).is_some_and(|&b| is_ident_start(b)) {
            return Ok(false);
        }
        while self.bytes.get(i).is_some_and(|&b| is_ident_continue(b)) {
            i += 1;
        }
        let label = &self.bytes[label_start..i];
        if let Some(q) = quote {
            if self.bytes.get(i) != Some(&q) {
                return Ok(false);
            }
            i += 1;
        }
        if self.bytes[i..].starts_with(b"\r\n") {
            i += 2;
        } else if self.bytes.get(i) == Some(&b'\n') {
            i += 1;
        } else {
            return Ok(false);
        }

        let mut line_start = i;
        while line_start <= self.bytes.len() {
            let mut p = line_start;
            while matches!(self.bytes.get(p), Some(b' ' | b'\t')) {
                p += 1;
            }
            if self.bytes[p..].starts_with(label)
                && !self
                    .bytes
                    .get(p + label.len())
                    .is_some_and(|&b| is_ident_continue(b))
            {
                self.pos = p + label.len();
                return Ok(true);
            }
            match self.bytes[line_start..].iter().position(|&b| b == b'\n') {
                Some(rel) => line_start += rel + 1,
                None => break,
            }
        }
        Err(TokenizeError::Unterminated {
            kind: "heredoc",
            offset: start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn significant(source: &str) -> Vec<(TokenKind, &str)> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .map(|t| (t.kind, &source[t.span.start..t.span.end]))
            .collect()
    }

    #[test]
    fn test_tokens_cover_every_byte() {
        let source = "<html>\n<?php\n/** doc */\nclass A extends B { function f(): ?int { return $x?->y; } }\n?>\ntail";
        let tokens = tokenize(source).unwrap();
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.span.start, pos);
            pos = token.span.end;
        }
        assert_eq!(pos, source.len());
    }

    #[test]
    fn test_class_declaration() {
        let toks = significant("<?php class Child extends Base implements Foo, Bar {}");
        assert_eq!(
            toks,
            vec![
                (TokenKind::OpenTag, "<?php"),
                (TokenKind::Class, "class"),
                (TokenKind::Identifier, "Child"),
                (TokenKind::Extends, "extends"),
                (TokenKind::Identifier, "Base"),
                (TokenKind::Implements, "implements"),
                (TokenKind::Identifier, "Foo"),
                (TokenKind::Comma, ","),
                (TokenKind::Identifier, "Bar"),
                (TokenKind::OpenBrace, "{"),
                (TokenKind::CloseBrace, "}"),
            ]
        );
    }

    #[test]
    fn test_keywords_are_case_insensitive() {
        let toks = significant("<?php ABSTRACT Class Foo EXTENDS Bar {}");
        assert_eq!(toks[2], (TokenKind::Class, "Class"));
        assert_eq!(toks[4], (TokenKind::Extends, "EXTENDS"));
    }

    #[test]
    fn test_keyword_after_double_colon_is_identifier() {
        let toks = significant("<?php $a = Foo::class; $b->function;");
        assert!(toks.contains(&(TokenKind::Identifier, "class")));
        assert!(toks.contains(&(TokenKind::Identifier, "function")));
        assert!(!toks.iter().any(|(k, _)| *k == TokenKind::Class));
    }

    #[test]
    fn test_qualified_name_split() {
        let toks = significant("<?php use \\Vendor\\Interface\\Thing;");
        assert_eq!(
            toks,
            vec![
                (TokenKind::OpenTag, "<?php"),
                (TokenKind::Use, "use"),
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::Identifier, "Vendor"),
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::Identifier, "Interface"),
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::Identifier, "Thing"),
                (TokenKind::Semicolon, ";"),
            ]
        );
    }

    #[test]
    fn test_method_named_like_keyword() {
        let toks = significant("<?php function list(): array {}");
        assert_eq!(toks[2], (TokenKind::Identifier, "list"));
    }

    #[test]
    fn test_colon_and_double_colon() {
        let toks = significant("<?php function f(): static { return self::X; }");
        assert!(toks.contains(&(TokenKind::Colon, ":")));
        assert!(toks.contains(&(TokenKind::DoubleColon, "::")));
    }

    #[test]
    fn test_comments() {
        let tokens = tokenize("<?php // line\n# hash\n/* block */ /** doc */ /**/").unwrap();
        let kinds: Vec<TokenKind> = tokens
            .iter()
            .map(|t| t.kind)
            .filter(|k| *k != TokenKind::Whitespace)
            .collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::OpenTag,
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::Comment,
                TokenKind::DocComment,
                TokenKind::Comment,
            ]
        );
    }

    #[test]
    fn test_attribute_is_not_comment() {
        let toks = significant("<?php #[Route('/x')] function f() {}");
        assert_eq!(toks[1], (TokenKind::AttributeOpen, "#["));
        assert!(toks.contains(&(TokenKind::Function, "function")));
    }

    #[test]
    fn test_strings_are_opaque() {
        let toks = significant(r#"<?php $a = 'class { x'; $b = "it's \"{$c}\" }";"#);
        let strings: Vec<&str> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::StringLiteral)
            .map(|(_, s)| *s)
            .collect();
        assert_eq!(strings, vec!["'class { x'", r#""it's \"{$c}\" }""#]);
        assert!(!toks.iter().any(|(k, _)| *k == TokenKind::OpenBrace));
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        let source = "<?php\n$a = <<<EOT\n  class { }\n  EOT;\n$b = <<<'RAW'\nfunction\nRAW;\n";
        let toks = significant(source);
        let strings: Vec<&str> = toks
            .iter()
            .filter(|(k, _)| *k == TokenKind::StringLiteral)
            .map(|(_, s)| *s)
            .collect();
        assert_eq!(strings.len(), 2);
        assert!(strings[0].starts_with("<<<EOT") && strings[0].ends_with("EOT"));
        assert!(strings[1].starts_with("<<<'RAW'") && strings[1].ends_with("RAW"));
        assert!(!toks.iter().any(|(k, _)| *k == TokenKind::Class));
    }

    #[test]
    fn test_inline_html_and_close_tag() {
        let tokens = tokenize("<p>hi</p><?= $x ?>\n<b>").unwrap();
        assert_eq!(tokens.first().unwrap().kind, TokenKind::InlineHtml);
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::CloseTag));
        assert_eq!(tokens.last().unwrap().kind, TokenKind::InlineHtml);
    }

    #[test]
    fn test_nullsafe_operator() {
        let toks = significant("<?php $a?->b; $c ? 1 : 2;");
        assert!(toks.contains(&(TokenKind::ObjectOperator, "?->")));
        assert!(toks.contains(&(TokenKind::Question, "?")));
        assert!(toks.contains(&(TokenKind::Colon, ":")));
    }

    #[test]
    fn test_unterminated_string_is_error() {
        let err = tokenize("<?php $a = 'oops;").unwrap_err();
        assert_eq!(
            err,
            TokenizeError::Unterminated {
                kind: "string",
                offset: 11
            }
        );
    }

    #[test]
    fn test_unterminated_comment_is_error() {
        let err = tokenize("<?php /* never closed").unwrap_err();
        assert!(matches!(
            err,
            TokenizeError::Unterminated {
                kind: "comment",
                ..
            }
        ));
    }

    #[test]
    fn test_unterminated_heredoc_is_error() {
        let err = tokenize("<?php $a = <<<EOT\nbody\n").unwrap_err();
        assert!(matches!(
            err,
            TokenizeError::Unterminated {
                kind: "heredoc",
                ..
            }
        ));
    }

    #[test]
    fn test_non_ascii_identifier() {
        let toks = significant("<?php class Größe {}");
        assert_eq!(toks[2], (TokenKind::Identifier, "Größe"));
    }

    #[test]
    fn test_multibyte_text_in_comments_and_strings() {
        let source = "<?php\n// café ?>\n<?php # naïve\n/* 日本語 */ $s = 'ü\\é';\n$h = <<<TXT\n  straße\n  TXT;\nclass A {}\n";
        let tokens = tokenize(source).unwrap();
        let mut pos = 0;
        for token in &tokens {
            assert_eq!(token.span.start, pos);
            assert!(source.is_char_boundary(token.span.end));
            pos = token.span.end;
        }
        assert_eq!(pos, source.len());

        let toks = significant(source);
        assert!(toks.contains(&(TokenKind::Comment, "// café ")));
        assert!(toks.contains(&(TokenKind::Comment, "# naïve")));
        assert!(toks.contains(&(TokenKind::Comment, "/* 日本語 */")));
        assert!(toks.contains(&(TokenKind::StringLiteral, "'ü\\é'")));
        assert!(toks.contains(&(TokenKind::Class, "class")));
    }

    #[test]
    fn test_replacement_chars_in_line_comment() {
        let toks = significant("<?php // caf\u{FFFD}\u{FFFD}\nclass A {}");
        assert_eq!(toks[2], (TokenKind::Class, "class"));
    }
}
