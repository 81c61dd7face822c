//! 序列编辑距离（Levenshtein）与相似度。
//!
//! 这里的“字符”是扁平序列里的一个字符串元素（例如 `<IF>`、`var_0`、`NUM`），
//! 两个元素相等当且仅当字符串相等。

use std::mem;

use tracing::debug;

use crate::report::Comparison;

/// 两条序列的 Levenshtein 距离。
///
/// 经典 DP：
/// ```text
/// d[i][j] = min(d[i-1][j] + 1, d[i][j-1] + 1, d[i-1][j-1] + cost(a[i], b[j]))
/// ```
/// 只保留两行，行宽取较短序列的长度 + 1：时间 O(n·m)，空间 O(min(n, m))。
pub fn edit_distance<S: AsRef<str>>(a: &[S], b: &[S]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return long.len();
    }

    let mut prev: Vec<usize> = (0..=short.len()).collect();
    let mut cur = vec![0usize; short.len() + 1];

    for (i, x) in long.iter().enumerate() {
        cur[0] = i + 1;
        for (j, y) in short.iter().enumerate() {
            let cost = usize::from(x.as_ref() != y.as_ref());
            let del = prev[j + 1] + 1;
            let ins = cur[j] + 1;
            let sub = prev[j] + cost;
            cur[j + 1] = del.min(ins).min(sub);
        }
        mem::swap(&mut prev, &mut cur);
    }

    prev[short.len()]
}

/// 由编辑距离换算相似度：`1 - dist / max(len_a, len_b)`，结果截断到 [0, 1]。
///
/// 两条序列都为空时定义为 1.0。
pub fn similarity_from_distance(distance: usize, len_a: usize, len_b: usize) -> f64 {
    let max_len = len_a.max(len_b);
    if max_len == 0 {
        return 1.0;
    }
    (1.0 - distance as f64 / max_len as f64).clamp(0.0, 1.0)
}

pub fn similarity<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    similarity_from_distance(edit_distance(a, b), a.len(), b.len())
}

/// 比较两条扁平序列，得到距离、两边长度与相似度。
pub fn compare<S: AsRef<str>>(a: &[S], b: &[S]) -> Comparison {
    let distance = edit_distance(a, b);
    let similarity = similarity_from_distance(distance, a.len(), b.len());
    debug!(len_a = a.len(), len_b = b.len(), distance, similarity, "compared sequences");
    Comparison {
        distance,
        len_a: a.len(),
        len_b: b.len(),
        similarity,
    }
}
