/// 一个 token 在源码中的位置。
///
/// - `start/end`：byte offset（按 UTF-8 字节计数），`end` 为开区间。
/// - `line/col`：token 起点的行列号（从 1 开始），只用于诊断，不参与比较。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub col: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            col: 1,
        }
    }
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, col: usize) -> Self {
        Self {
            start,
            end,
            line,
            col,
        }
    }

    /// 长度为 0 的位置（用于 EOF token）。
    pub fn point(offset: usize, line: usize, col: usize) -> Self {
        Self::new(offset, offset, line, col)
    }
}
