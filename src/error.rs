use std::collections::TryReserveError;
use std::path::PathBuf;

use thiserror::Error;

/// 相似度检测的统一错误类型。
///
/// 设计要点：
/// - 核心流水线只会因为“内存不足”失败；畸形源码永远不是错误，只会退化成近似结构。
/// - `Io` / `Config` 只出现在外层（读文件、读配置）。
/// - `code()`：机器可读的错误码，便于测试断言。
#[derive(Debug, Error)]
pub enum Error {
    /// 扩容 token 列表 / 子节点列表 / 扁平序列时 `try_reserve` 失败。
    #[error("allocation failed while growing {what}")]
    Alloc {
        what: &'static str,
        #[source]
        source: TryReserveError,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Config(String),
}

impl Error {
    /// 短错误码（例如 `AllocFailed`）。
    pub fn code(&self) -> &'static str {
        match self {
            Error::Alloc { .. } => "AllocFailed",
            Error::Io { .. } => "Io",
            Error::Config(_) => "InvalidConfig",
        }
    }

    /// CLI 的进程退出码。1 留给“没有可比较的内容”。
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Io { .. } | Error::Config(_) => 2,
            Error::Alloc { .. } => 3,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// 带容量检查的 push：先 `try_reserve`，失败时返回 `Error::Alloc` 而不是直接 abort。
///
/// token 列表、AST 子节点、扁平序列三处的增长都走这里。
pub(crate) fn try_push<T>(vec: &mut Vec<T>, item: T, what: &'static str) -> Result<()> {
    vec.try_reserve(1)
        .map_err(|source| Error::Alloc { what, source })?;
    vec.push(item);
    Ok(())
}
