pub mod ast;
pub mod config;
pub mod distance;
pub mod error;
pub mod lexer;
pub mod linearize;
pub mod parser;
pub mod report;
pub mod span;

use std::fs;
use std::path::Path;

use tracing::debug;

// 对外公开的核心类型/函数（给 CLI、测试以及其它 Rust 项目使用）。
pub use ast::{Node, NodeKind};
pub use config::{Config, IdentOrdinals, LexOptions, Thresholds};
pub use distance::{compare, edit_distance, similarity, similarity_from_distance};
pub use error::{Error, Result};
pub use lexer::{tokenize, tokenize_with, Keyword, Token, TokenKind, Tokenizer};
pub use linearize::linearize;
pub use parser::parse;
pub use report::{Comparison, Verdict};
pub use span::Span;

/// 读取源码文件。
///
/// 按字节读入后做有损 UTF-8 解码：非法字节变成 U+FFFD，词法分析时当作未知字符跳过。
pub fn read_source(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 源码 -> Token -> 结构树，一步到位（默认词法选项）。
pub fn parse_source(src: &str) -> Result<Node> {
    parse(&tokenize(src)?)
}

/// 计算一份源码的结构指纹：tokenize -> parse -> linearize。
///
/// 中间的 token 列表与结构树在函数返回前就被释放，只保留扁平序列。
pub fn fingerprint(src: &str, options: LexOptions) -> Result<Vec<String>> {
    let tokens = tokenize_with(src, options)?;
    let tree = parse(&tokens)?;
    drop(tokens);
    linearize(&tree)
}

/// 比较两份源码的结构相似度。
pub fn compare_sources(a: &str, b: &str, config: &Config) -> Result<Comparison> {
    let seq_a = fingerprint(a, config.lex)?;
    let seq_b = fingerprint(b, config.lex)?;
    let result = compare(&seq_a, &seq_b);
    debug!(similarity = result.similarity, "compared sources");
    Ok(result)
}
