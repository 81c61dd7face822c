//! 为“相似度检测”设计的简化语法树。
//!
//! 它不是完整的 C 语法树：只表达函数、块和控制结构，其余内容都以
//! `Token` 叶子的形式原样保留（标签已经归一化过）。

use std::fmt;

use crate::error::{try_push, Result};

/// 节点种类。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Function,
    Block,
    If,
    For,
    While,
    DoWhile,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    /// 普通语句（以及函数头）
    Stmt,
    /// 括号表达式、case 表达式、return 表达式
    Expr,
    /// 叶子：保存一个 token 的标签
    Token,
}

impl NodeKind {
    /// 序列化标记里使用的名字，例如 `<DO_WHILE>`。
    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Program => "PROGRAM",
            NodeKind::Function => "FUNCTION",
            NodeKind::Block => "BLOCK",
            NodeKind::If => "IF",
            NodeKind::For => "FOR",
            NodeKind::While => "WHILE",
            NodeKind::DoWhile => "DO_WHILE",
            NodeKind::Switch => "SWITCH",
            NodeKind::Case => "CASE",
            NodeKind::Default => "DEFAULT",
            NodeKind::Return => "RETURN",
            NodeKind::Break => "BREAK",
            NodeKind::Continue => "CONTINUE",
            NodeKind::Stmt => "STMT",
            NodeKind::Expr => "EXPR",
            NodeKind::Token => "TOKEN",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// 树节点。每个节点独占自己的子节点，drop 根节点即释放整棵树。
///
/// `label` 只在两种情况下有值：
/// - `Token` 叶子：token 的归一化标签（只有它会进入序列化结果）；
/// - 少数合成节点的调试标记：`FUNC_HEADER`、`ELSE`、`CASE BODY`、`DEFAULT BODY`。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub label: Option<String>,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            label: None,
            children: Vec::new(),
        }
    }

    pub fn labeled(kind: NodeKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: Some(label.into()),
            children: Vec::new(),
        }
    }

    pub fn leaf(label: impl Into<String>) -> Self {
        Self::labeled(NodeKind::Token, label)
    }

    /// 追加子节点；扩容失败时返回 `Error::Alloc`。
    pub fn push(&mut self, child: Node) -> Result<()> {
        try_push(&mut self.children, child, "child list")
    }

    pub fn is_leaf(&self) -> bool {
        self.kind == NodeKind::Token
    }

    /// 整棵子树的节点数（含自身）。
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// 所有 Token 叶子的标签（前序顺序）。
    pub fn leaf_labels(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaf_labels(&mut out);
        out
    }

    fn collect_leaf_labels<'a>(&'a self, out: &mut Vec<&'a str>) {
        if self.is_leaf() {
            if let Some(label) = self.label.as_deref() {
                out.push(label);
            }
        }
        for child in &self.children {
            child.collect_leaf_labels(out);
        }
    }

    /// 调试输出（前序遍历，每层缩进两个空格）。
    ///
    /// ```text
    /// PROGRAM
    ///   STMT
    ///     TOKEN: KW
    ///     TOKEN: var_0
    /// ```
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, indent: usize) {
        for _ in 0..indent {
            out.push_str("  ");
        }
        out.push_str(self.kind.name());
        if self.is_leaf() {
            if let Some(label) = &self.label {
                out.push_str(": ");
                out.push_str(label);
            }
        }
        out.push('\n');
        for child in &self.children {
            child.dump_into(out, indent + 1);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut stmt = Node::new(NodeKind::Stmt);
        stmt.push(Node::leaf("KW")).unwrap();
        stmt.push(Node::leaf("var_0")).unwrap();
        let mut root = Node::new(NodeKind::Program);
        root.push(stmt).unwrap();
        root
    }

    #[test]
    fn dump_indents_and_shows_leaf_labels() {
        assert_eq!(
            sample().dump(),
            "PROGRAM\n  STMT\n    TOKEN: KW\n    TOKEN: var_0\n"
        );
    }

    #[test]
    fn dump_hides_synthetic_labels() {
        let node = Node::labeled(NodeKind::Block, "ELSE");
        assert_eq!(node.dump(), "BLOCK\n");
    }

    #[test]
    fn counts_and_leaf_labels() {
        let root = sample();
        assert_eq!(root.node_count(), 4);
        assert_eq!(root.leaf_labels(), vec!["KW", "var_0"]);
    }
}
