use crate::span::Span;

/// 一个 Token = 词法分析后的最小单元，已经做过“归一化”。
///
/// 例子：`int a=1;`
/// 会被切成：Keyword(Int) "int", Ident "var_0", Operator "=", Number "NUM", Punct ";"
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// 参与比较的拼写：标识符 -> `var_N`，数字 -> `NUM`，字符串 -> `STR`，字符 -> `CHR`，
    /// 关键字/运算符/标点保持原样。
    pub text: String,
    /// 原始拼写，仅用于诊断。
    pub raw: String,
    pub span: Span,
}

impl Token {
    pub fn keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    pub fn is_keyword(&self, kw: Keyword) -> bool {
        self.kind == TokenKind::Keyword(kw)
    }

    /// 是否是某个标点（`(`、`;`、`{` ...）。
    pub fn is_punct(&self, p: char) -> bool {
        self.kind == TokenKind::Punct && self.text.len() == 1 && self.text.starts_with(p)
    }

    pub fn line(&self) -> usize {
        self.span.line
    }

    pub fn column(&self) -> usize {
        self.span.col
    }
}

/// Token 的种类。
///
/// 关键字的具体种类放在 `Keyword(..)` 里，其它种类没有附加信息。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// 输入结束
    Eof,
    Ident,
    Keyword(Keyword),
    Number,
    String,
    Char,
    Operator,
    Punct,
}

/// 固定关键字表。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    If,
    Else,
    For,
    While,
    Do,
    Switch,
    Case,
    Default,
    Return,
    Break,
    Continue,
    Int,
    Char,
    Float,
    Double,
    Void,
    Struct,
    Typedef,
}

impl Keyword {
    pub const ALL: [Keyword; 18] = [
        Keyword::If,
        Keyword::Else,
        Keyword::For,
        Keyword::While,
        Keyword::Do,
        Keyword::Switch,
        Keyword::Case,
        Keyword::Default,
        Keyword::Return,
        Keyword::Break,
        Keyword::Continue,
        Keyword::Int,
        Keyword::Char,
        Keyword::Float,
        Keyword::Double,
        Keyword::Void,
        Keyword::Struct,
        Keyword::Typedef,
    ];

    /// 拼写 -> 关键字。编译期常量表，不存在运行期可变状态。
    pub fn from_ident(s: &str) -> Option<Keyword> {
        let kw = match s {
            "if" => Keyword::If,
            "else" => Keyword::Else,
            "for" => Keyword::For,
            "while" => Keyword::While,
            "do" => Keyword::Do,
            "switch" => Keyword::Switch,
            "case" => Keyword::Case,
            "default" => Keyword::Default,
            "return" => Keyword::Return,
            "break" => Keyword::Break,
            "continue" => Keyword::Continue,
            "int" => Keyword::Int,
            "char" => Keyword::Char,
            "float" => Keyword::Float,
            "double" => Keyword::Double,
            "void" => Keyword::Void,
            "struct" => Keyword::Struct,
            "typedef" => Keyword::Typedef,
            _ => return None,
        };
        Some(kw)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Else => "else",
            Keyword::For => "for",
            Keyword::While => "while",
            Keyword::Do => "do",
            Keyword::Switch => "switch",
            Keyword::Case => "case",
            Keyword::Default => "default",
            Keyword::Return => "return",
            Keyword::Break => "break",
            Keyword::Continue => "continue",
            Keyword::Int => "int",
            Keyword::Char => "char",
            Keyword::Float => "float",
            Keyword::Double => "double",
            Keyword::Void => "void",
            Keyword::Struct => "struct",
            Keyword::Typedef => "typedef",
        }
    }

    /// 叶子节点上使用的标签。
    ///
    /// 控制流关键字用大写名字；类型/声明关键字统一成 `KW`，
    /// 所以 `int` 改成 `long`/`float` 之类的改写不会影响结构指纹。
    pub fn label(self) -> &'static str {
        match self {
            Keyword::If => "IF",
            Keyword::Else => "ELSE",
            Keyword::For => "FOR",
            Keyword::While => "WHILE",
            Keyword::Do => "DO",
            Keyword::Switch => "SWITCH",
            Keyword::Case => "CASE",
            Keyword::Default => "DEFAULT",
            Keyword::Return => "RETURN",
            Keyword::Break => "BREAK",
            Keyword::Continue => "CONTINUE",
            _ => "KW",
        }
    }
}
