use tracing::{debug, trace};

use crate::ast::{Node, NodeKind};
use crate::error::Result;
use crate::lexer::token::{Keyword, Token, TokenKind};

/// 解析器入口：把 Token 列表解析成以 `Program` 为根的结构树。
///
/// `tokens` 末尾带不带 EOF token 都可以。
/// 语法上的任何怪异输入都不会导致失败：要么被收进 Stmt/Expr 叶子，要么被跳过一个 token。
/// 只有在扩容子节点列表失败时才返回错误。
pub fn parse(tokens: &[Token]) -> Result<Node> {
    let root = Parser::new(tokens).parse_program()?;
    debug!(nodes = root.node_count(), "parsed structural tree");
    Ok(root)
}

/// token -> 叶子标签。
///
/// 关键字用 `Keyword::label`（`IF`、`RETURN`……，类型关键字为 `KW`），
/// 标识符用归一化后的 `var_N`，常量统一成 `NUM`/`STR`/`CHR`，运算符和标点保持原样。
pub fn leaf_label(tok: &Token) -> &str {
    match tok.kind {
        TokenKind::Keyword(kw) => kw.label(),
        TokenKind::Ident => &tok.text,
        TokenKind::Number => "NUM",
        TokenKind::String => "STR",
        TokenKind::Char => "CHR",
        TokenKind::Operator | TokenKind::Punct => &tok.text,
        TokenKind::Eof => "TOK",
    }
}

/// 语句嵌套的最大深度。超过之后不再递归，剩下的 token 平铺进一个 Stmt。
pub const MAX_DEPTH: usize = 256;

fn leaf(tok: &Token) -> Node {
    Node::leaf(leaf_label(tok))
}

/// 启发式递归下降解析器。
///
/// - `i` 是当前光标；`peek()` 只看不动，`bump()` 吃掉一个 token。
/// - EOF token 与“越界”一视同仁：`peek()` 都返回 `None`。
/// - `depth` 是当前语句嵌套层数，到 `MAX_DEPTH` 为止。
struct Parser<'a> {
    tokens: &'a [Token],
    i: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            i: 0,
            depth: 0,
        }
    }

    /// Program = { Function | Stmt }
    ///
    /// 每一轮先判断“像不像函数定义”，否则按普通语句解析。
    /// 一轮下来如果一个 token 都没吃掉，就丢弃结果并跳过一个 token，保证一定能走完。
    fn parse_program(&mut self) -> Result<Node> {
        let mut root = Node::new(NodeKind::Program);
        while !self.is_eof() {
            let start = self.i;
            let node = if self.looks_like_function() {
                Some(self.parse_function()?)
            } else {
                self.parse_statement()?
            };
            self.keep_or_skip(&mut root, node, start)?;
        }
        Ok(root)
    }

    /// 有进展就挂到 parent 下，没进展就跳过当前 token。
    fn keep_or_skip(&mut self, parent: &mut Node, node: Option<Node>, start: usize) -> Result<()> {
        match node {
            Some(node) if self.i > start => parent.push(node),
            _ => {
                if let Some(tok) = self.bump() {
                    trace!(line = tok.line(), col = tok.column(), raw = %tok.raw, "skipped token");
                }
                Ok(())
            }
        }
    }

    /// “像函数定义”的判定：向前扫描并记录括号深度。
    ///
    /// - 第一对完整的顶层 `( ... )` 之后紧跟 `{`：是函数；
    /// - 在此之前遇到顶层 `;`、`{` 或 `}`：不是（声明/语句/块）；
    /// - 在此之前遇到只能开启语句的关键字（`return`、`break`、`else`……）：不是；
    /// - 其它情况都不是。
    fn looks_like_function(&self) -> bool {
        let mut rest = self.tokens[self.i..].iter().take_while(|t| !t.is_eof());
        let mut depth = 0usize;
        while let Some(tok) = rest.next() {
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        return rest.next().is_some_and(|t| t.is_punct('{'));
                    }
                }
            } else if depth == 0
                && (tok.is_punct(';')
                    || tok.is_punct('{')
                    || tok.is_punct('}')
                    || tok.keyword().is_some_and(is_statement_only))
            {
                return false;
            }
        }
        false
    }

    /// 函数定义：`{` 之前的所有 token 平铺进 `FUNC_HEADER`，后面的块作为函数体。
    fn parse_function(&mut self) -> Result<Node> {
        let mut func = Node::new(NodeKind::Function);

        let mut header = Node::labeled(NodeKind::Stmt, "FUNC_HEADER");
        while let Some(tok) = self.peek() {
            if tok.is_punct('{') {
                break;
            }
            self.bump();
            header.push(leaf(tok))?;
        }
        func.push(header)?;

        if let Some(body) = self.parse_block()? {
            func.push(body)?;
        }
        Ok(func)
    }

    /// 解析一条语句。到达 EOF 时返回 `None`。
    ///
    /// 嵌套超过 `MAX_DEPTH` 时改用 `parse_flat`，树的深度因此有上限。
    fn parse_statement(&mut self) -> Result<Option<Node>> {
        if self.depth >= MAX_DEPTH {
            return self.parse_flat();
        }
        self.depth += 1;
        let node = self.parse_nested_statement();
        self.depth -= 1;
        node
    }

    fn parse_nested_statement(&mut self) -> Result<Option<Node>> {
        let Some(tok) = self.peek() else {
            return Ok(None);
        };
        if tok.is_punct('{') {
            return self.parse_block();
        }

        let node = match tok.keyword() {
            Some(Keyword::If) => self.parse_if()?,
            Some(Keyword::For) => self.parse_head_and_body(NodeKind::For)?,
            Some(Keyword::While) => self.parse_head_and_body(NodeKind::While)?,
            Some(Keyword::Switch) => self.parse_head_and_body(NodeKind::Switch)?,
            Some(Keyword::Do) => self.parse_do_while()?,
            Some(Keyword::Case) => self.parse_case()?,
            Some(Keyword::Default) => self.parse_default()?,
            Some(Keyword::Return) => self.parse_return()?,
            Some(Keyword::Break) => self.parse_jump(NodeKind::Break),
            Some(Keyword::Continue) => self.parse_jump(NodeKind::Continue),
            _ => self.parse_until_semicolon(NodeKind::Stmt)?,
        };
        Ok(Some(node))
    }

    /// 代码块：`{ stmt* }`。当前不是 `{` 时返回 `None`。
    ///
    /// 缺少 `}` 时一直读到 EOF。
    fn parse_block(&mut self) -> Result<Option<Node>> {
        if !self.at_punct('{') {
            return Ok(None);
        }
        self.bump();

        let mut block = Node::new(NodeKind::Block);
        self.parse_statements_until(&mut block, |t| t.is_punct('}'))?;
        if self.at_punct('}') {
            self.bump();
        }
        Ok(Some(block))
    }

    /// 反复解析语句挂到 `parent` 下，直到 `stop` 命中或 EOF（不消费停止 token）。
    fn parse_statements_until(&mut self, parent: &mut Node, stop: fn(&Token) -> bool) -> Result<()> {
        while let Some(tok) = self.peek() {
            if stop(tok) {
                break;
            }
            let start = self.i;
            let node = self.parse_statement()?;
            self.keep_or_skip(parent, node, start)?;
        }
        Ok(())
    }

    /// `if (cond) stmt [else stmt]`
    ///
    /// else 分支包在一个标记为 `ELSE` 的 Block 里。
    fn parse_if(&mut self) -> Result<Node> {
        self.bump(); // 'if'
        let mut node = Node::new(NodeKind::If);

        if let Some(cond) = self.parse_paren_expr()? {
            node.push(cond)?;
        }
        if let Some(then_branch) = self.parse_statement()? {
            node.push(then_branch)?;
        }

        if self.at_keyword(Keyword::Else) {
            self.bump();
            let mut else_branch = Node::labeled(NodeKind::Block, "ELSE");
            if let Some(st) = self.parse_statement()? {
                else_branch.push(st)?;
            }
            node.push(else_branch)?;
        }
        Ok(node)
    }

    /// for / while / switch：关键字 + 括号表达式 + 一条语句。
    fn parse_head_and_body(&mut self, kind: NodeKind) -> Result<Node> {
        self.bump();
        let mut node = Node::new(kind);

        if let Some(head) = self.parse_paren_expr()? {
            node.push(head)?;
        }
        if let Some(body) = self.parse_statement()? {
            node.push(body)?;
        }
        Ok(node)
    }

    /// `do stmt while (cond) ;`，结尾的 `;` 可选。
    fn parse_do_while(&mut self) -> Result<Node> {
        self.bump(); // 'do'
        let mut node = Node::new(NodeKind::DoWhile);

        if let Some(body) = self.parse_statement()? {
            node.push(body)?;
        }
        if self.at_keyword(Keyword::While) {
            self.bump();
            if let Some(cond) = self.parse_paren_expr()? {
                node.push(cond)?;
            }
            if self.at_punct(';') {
                self.bump();
            }
        }
        Ok(node)
    }

    /// `case expr : stmt*`
    ///
    /// 表达式收集到 `:` 为止（遇到 `{`/`}` 提前停），
    /// 语句收集到下一个 `case`/`default`/`}` 为止，放进 `CASE BODY` 块。
    fn parse_case(&mut self) -> Result<Node> {
        self.bump(); // 'case'
        let mut node = Node::new(NodeKind::Case);

        let mut expr = Node::new(NodeKind::Expr);
        while let Some(tok) = self.peek() {
            if tok.is_punct(':') || tok.is_punct('{') || tok.is_punct('}') {
                break;
            }
            self.bump();
            expr.push(leaf(tok))?;
        }
        if self.at_punct(':') {
            self.bump();
        }
        node.push(expr)?;

        node.push(self.parse_case_body("CASE BODY")?)?;
        Ok(node)
    }

    /// `default : stmt*`，与 case 相同但没有表达式。
    fn parse_default(&mut self) -> Result<Node> {
        self.bump(); // 'default'
        let mut node = Node::new(NodeKind::Default);
        if self.at_punct(':') {
            self.bump();
        }
        node.push(self.parse_case_body("DEFAULT BODY")?)?;
        Ok(node)
    }

    fn parse_case_body(&mut self, label: &str) -> Result<Node> {
        let mut body = Node::labeled(NodeKind::Block, label);
        self.parse_statements_until(&mut body, |t| {
            t.is_keyword(Keyword::Case) || t.is_keyword(Keyword::Default) || t.is_punct('}')
        })?;
        Ok(body)
    }

    /// `return expr? ;`
    fn parse_return(&mut self) -> Result<Node> {
        self.bump(); // 'return'
        let mut node = Node::new(NodeKind::Return);
        node.push(self.parse_until_semicolon(NodeKind::Expr)?)?;
        Ok(node)
    }

    /// break / continue，结尾的 `;` 可选。
    fn parse_jump(&mut self, kind: NodeKind) -> Node {
        self.bump();
        if self.at_punct(';') {
            self.bump();
        }
        Node::new(kind)
    }

    /// 括号表达式：吃掉 `(`，把里面的 token 逐个作为叶子收集，
    /// 直到与之匹配的最外层 `)`（消费但不输出）。当前不是 `(` 时返回 `None`。
    fn parse_paren_expr(&mut self) -> Result<Option<Node>> {
        if !self.at_punct('(') {
            return Ok(None);
        }
        self.bump();

        let mut expr = Node::new(NodeKind::Expr);
        let mut depth = 1usize;
        while let Some(tok) = self.bump() {
            if tok.is_punct('(') {
                depth += 1;
            } else if tok.is_punct(')') {
                depth -= 1;
                if depth == 0 {
                    break;
                }
            }
            expr.push(leaf(tok))?;
        }
        Ok(Some(expr))
    }

    /// 嵌套过深时的退路：不识别任何结构，所有 token 平铺成叶子，
    /// 直到括号平衡处的 `;`（消费，不输出）或多出来的 `}`（不消费，留给外层块）。
    fn parse_flat(&mut self) -> Result<Option<Node>> {
        if self.is_eof() {
            return Ok(None);
        }
        trace!(depth = self.depth, pos = self.i, "nesting limit reached");

        let mut node = Node::new(NodeKind::Stmt);
        let mut nesting = 0usize;
        while let Some(tok) = self.peek() {
            if tok.is_punct('(') || tok.is_punct('[') || tok.is_punct('{') {
                nesting += 1;
            } else if tok.is_punct(')') || tok.is_punct(']') || tok.is_punct('}') {
                if nesting > 0 {
                    nesting -= 1;
                } else if tok.is_punct('}') {
                    break;
                }
            } else if nesting == 0 && tok.is_punct(';') {
                self.bump();
                break;
            }
            self.bump();
            node.push(leaf(tok))?;
        }
        Ok(Some(node))
    }

    /// 收集 token 直到顶层 `;`（消费它，但不输出）。
    ///
    /// `()` 与 `[]` 内部的 `;`、`{`、`}` 不算顶层；
    /// 顶层遇到 `{`/`}` 时提前停下且不消费，交给调用方当作块边界处理。
    fn parse_until_semicolon(&mut self, kind: NodeKind) -> Result<Node> {
        let mut node = Node::new(kind);
        let mut paren = 0usize;
        let mut bracket = 0usize;

        while let Some(tok) = self.peek() {
            if tok.is_punct('(') {
                paren += 1;
            } else if tok.is_punct(')') {
                paren = paren.saturating_sub(1);
            } else if tok.is_punct('[') {
                bracket += 1;
            } else if tok.is_punct(']') {
                bracket = bracket.saturating_sub(1);
            }

            if paren == 0 && bracket == 0 {
                if tok.is_punct(';') {
                    self.bump();
                    break;
                }
                if tok.is_punct('{') || tok.is_punct('}') {
                    break;
                }
            }

            self.bump();
            node.push(leaf(tok))?;
        }
        Ok(node)
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.i).filter(|t| !t.is_eof())
    }

    /// 吃掉一个 token。EOF 不会被吃掉。
    fn bump(&mut self) -> Option<&'a Token> {
        let tok = self.peek()?;
        self.i += 1;
        Some(tok)
    }

    fn is_eof(&self) -> bool {
        self.peek().is_none()
    }

    fn at_punct(&self, p: char) -> bool {
        self.peek().is_some_and(|t| t.is_punct(p))
    }

    fn at_keyword(&self, kw: Keyword) -> bool {
        self.peek().is_some_and(|t| t.is_keyword(kw))
    }
}

/// 只能出现在语句开头、不会出现在函数头参数表之前的关键字。
fn is_statement_only(kw: Keyword) -> bool {
    matches!(
        kw,
        Keyword::Return
            | Keyword::Break
            | Keyword::Continue
            | Keyword::Case
            | Keyword::Default
            | Keyword::Do
            | Keyword::Else
    )
}
