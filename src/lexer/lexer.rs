use std::collections::HashMap;
use std::iter::FusedIterator;

use tracing::debug;

use crate::config::{IdentOrdinals, LexOptions};
use crate::error::{try_push, Result};
use crate::lexer::token::{Keyword, Token, TokenKind};
use crate::span::Span;

/// 词法分析入口：把源代码切成一串“实义” Token（不包含末尾的 EOF token）。
///
/// 空输入 / 只有空白和注释的输入得到空列表。
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    tokenize_with(src, LexOptions::default())
}

pub fn tokenize_with(src: &str, options: LexOptions) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    for tok in Tokenizer::with_options(src, options) {
        try_push(&mut tokens, tok, "token list")?;
    }
    debug!(tokens = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// 拉取式（pull-based）词法分析器。
///
/// 调用方反复调用 `next_token()`，直到拿到 `TokenKind::Eof`。
/// 词法分析永远不会报错：
/// - 空白与两种注释直接跳过；
/// - 未闭合的字符串/字符/块注释一直吃到输入末尾；
/// - 不认识的字符静默跳过。
///
/// 标识符编号器是每个实例私有的状态，新源码需要新建一个 Tokenizer。
pub struct Tokenizer<'a> {
    src: &'a str,
    byte_pos: usize,
    line: usize,
    col: usize,
    options: LexOptions,
    next_ident: usize,
    // 只在 FirstAppearance 模式下使用
    ident_ordinals: HashMap<&'a str, usize>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(src: &'a str) -> Self {
        Self::with_options(src, LexOptions::default())
    }

    pub fn with_options(src: &'a str, options: LexOptions) -> Self {
        Self {
            src,
            byte_pos: 0,
            line: 1,
            col: 1,
            options,
            next_ident: 0,
            ident_ordinals: HashMap::new(),
        }
    }

    /// 跳过空白和注释后，是否已经没有输入了。
    pub fn is_eof(&mut self) -> bool {
        self.skip_ws_and_comments();
        self.at_end()
    }

    /// 取下一个 token。输入耗尽后每次都返回 EOF token。
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_ws_and_comments();

            let start = self.mark();
            let ch = match self.peek_char() {
                Some(ch) => ch,
                None => {
                    return Token {
                        kind: TokenKind::Eof,
                        text: String::new(),
                        raw: String::new(),
                        span: Span::point(start.offset, start.line, start.col),
                    }
                }
            };

            let (kind, text) = match ch {
                c if is_ident_start(c) => self.lex_ident_or_keyword(),
                c if c.is_ascii_digit() => {
                    self.lex_number();
                    (TokenKind::Number, "NUM".to_string())
                }
                '"' => {
                    self.lex_quoted('"');
                    (TokenKind::String, "STR".to_string())
                }
                '\'' => {
                    self.lex_quoted('\'');
                    (TokenKind::Char, "CHR".to_string())
                }
                c if is_operator_start(c) => {
                    self.lex_operator(c);
                    (TokenKind::Operator, self.slice_from(start).to_string())
                }
                c if self.is_punct(c) => {
                    self.bump_char();
                    (TokenKind::Punct, c.to_string())
                }
                _ => {
                    // 不认识的字符：跳过，继续找下一个 token
                    self.bump_char();
                    continue;
                }
            };

            return Token {
                kind,
                text,
                raw: self.slice_from(start).to_string(),
                span: Span::new(start.offset, self.byte_pos, start.line, start.col),
            };
        }
    }

    /// 跳过空白与注释（`// ...` 和 `/* ... */`）。
    ///
    /// 未闭合的块注释一直延伸到输入末尾。
    fn skip_ws_and_comments(&mut self) {
        loop {
            match self.peek_char() {
                Some(ch) if ch.is_whitespace() => {
                    self.bump_char();
                }
                Some('/') if self.peek_is("//") => {
                    while let Some(ch) = self.peek_char() {
                        if ch == '\n' {
                            break;
                        }
                        self.bump_char();
                    }
                }
                Some('/') if self.peek_is("/*") => {
                    self.bump_str("/*");
                    while !self.at_end() && !self.peek_is("*/") {
                        self.bump_char();
                    }
                    if self.peek_is("*/") {
                        self.bump_str("*/");
                    }
                }
                _ => break,
            }
        }
    }

    /// 标识符或关键字。关键字保持原拼写，标识符归一化为 `var_N`。
    fn lex_ident_or_keyword(&mut self) -> (TokenKind, String) {
        let src = self.src;
        let start = self.byte_pos;
        while matches!(self.peek_char(), Some(c) if is_ident_continue(c)) {
            self.bump_char();
        }
        let word = &src[start..self.byte_pos];

        if let Some(kw) = Keyword::from_ident(word) {
            return (TokenKind::Keyword(kw), word.to_string());
        }

        let ordinal = match self.options.ident_ordinals {
            IdentOrdinals::PerOccurrence => self.fresh_ordinal(),
            IdentOrdinals::FirstAppearance => match self.ident_ordinals.get(word) {
                Some(&n) => n,
                None => {
                    let n = self.fresh_ordinal();
                    self.ident_ordinals.insert(word, n);
                    n
                }
            },
        };
        (TokenKind::Ident, format!("var_{ordinal}"))
    }

    fn fresh_ordinal(&mut self) -> usize {
        let n = self.next_ident;
        self.next_ident += 1;
        n
    }

    /// 数字：十进制 / 十六进制，可选小数部分、指数部分，以及任意个 `LlUuFf` 后缀。
    fn lex_number(&mut self) {
        if self.peek_is("0x") || self.peek_is("0X") {
            self.bump_str("0x");
            while matches!(self.peek_char(), Some(c) if c.is_ascii_hexdigit()) {
                self.bump_char();
            }
        } else {
            self.bump_digits();
            if self.try_bump('.') {
                self.bump_digits();
            }
            if self.try_bump('e') || self.try_bump('E') {
                let _ = self.try_bump('+') || self.try_bump('-');
                self.bump_digits();
            }
        }

        while matches!(self.peek_char(), Some('L' | 'l' | 'U' | 'u' | 'F' | 'f')) {
            self.bump_char();
        }
    }

    fn bump_digits(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_ascii_digit()) {
            self.bump_char();
        }
    }

    /// 引号包围的字符串/字符常量。
    ///
    /// 反斜杠无条件吃掉下一个字符（不解释转义含义）；没有闭合就吃到输入末尾。
    fn lex_quoted(&mut self, quote: char) {
        self.bump_char();
        while let Some(ch) = self.bump_char() {
            if ch == quote {
                break;
            }
            if ch == '\\' {
                self.bump_char();
            }
        }
    }

    /// 运算符：先吃掉首字符，再尝试按双字符表扩展一个字符。
    fn lex_operator(&mut self, first: char) {
        self.bump_char();
        if let Some(second) = self.peek_char() {
            if is_two_char_operator(first, second) {
                self.bump_char();
            }
        }
    }

    fn is_punct(&self, ch: char) -> bool {
        matches!(ch, '(' | ')' | '{' | '}' | '[' | ']' | ';' | ',' | '.')
            || (self.options.colon_punctuation && matches!(ch, ':' | '?'))
    }

    fn at_end(&self) -> bool {
        self.byte_pos >= self.src.len()
    }

    fn peek_char(&self) -> Option<char> {
        self.src[self.byte_pos..].chars().next()
    }

    /// 消费一个字符，同步更新 byte offset 与 line/col。
    fn bump_char(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.byte_pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(ch)
    }

    fn try_bump(&mut self, expected: char) -> bool {
        match self.peek_char() {
            Some(ch) if ch == expected => {
                self.bump_char();
                true
            }
            _ => false,
        }
    }

    fn peek_is(&self, s: &str) -> bool {
        self.src[self.byte_pos..].starts_with(s)
    }

    /// 消费一个 ASCII 短串（`/*`、`*/`、`0x`）。
    fn bump_str(&mut self, s: &str) {
        for _ in 0..s.len() {
            self.bump_char();
        }
    }

    fn slice_from(&self, start: Mark) -> &'a str {
        let src = self.src;
        &src[start.offset..self.byte_pos]
    }

    fn mark(&self) -> Mark {
        Mark {
            offset: self.byte_pos,
            line: self.line,
            col: self.col,
        }
    }
}

/// 迭代器形式：只产出实义 token，遇到 EOF 即结束。
impl Iterator for Tokenizer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let tok = self.next_token();
        (!tok.is_eof()).then_some(tok)
    }
}

impl FusedIterator for Tokenizer<'_> {}

#[derive(Clone, Copy)]
struct Mark {
    offset: usize,
    line: usize,
    col: usize,
}

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphabetic()
}

fn is_ident_continue(ch: char) -> bool {
    is_ident_start(ch) || ch.is_ascii_digit()
}

fn is_operator_start(ch: char) -> bool {
    matches!(
        ch,
        '+' | '-' | '*' | '/' | '%' | '=' | '!' | '<' | '>' | '&' | '|' | '^' | '~'
    )
}

/// 双字符运算符表：`== != <= >= && || ++ -- += -= *= /= %= << >> ->`
fn is_two_char_operator(first: char, second: char) -> bool {
    matches!(
        (first, second),
        ('=', '=')
            | ('!', '=')
            | ('<', '=')
            | ('>', '=')
            | ('&', '&')
            | ('|', '|')
            | ('+', '+')
            | ('-', '-')
            | ('+', '=')
            | ('-', '=')
            | ('*', '=')
            | ('/', '=')
            | ('%', '=')
            | ('<', '<')
            | ('>', '>')
            | ('-', '>')
    )
}
