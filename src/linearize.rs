use tracing::debug;

use crate::ast::{Node, NodeKind};
use crate::error::{try_push, Result};

/// 序列化入口：把结构树按前序遍历展开成字符串序列。
///
/// 每个节点输出：
/// ```text
/// <KIND> [label] children... </KIND>
/// ```
/// 其中 `label` 只对带非空标签的 `Token` 叶子输出。
/// 开/闭标记保留了完整的树形（深度与兄弟顺序都能从序列里还原），
/// 比较器因此只需要处理扁平序列。
pub fn linearize(root: &Node) -> Result<Vec<String>> {
    let mut out = Vec::new();
    emit_node(root, &mut out)?;
    debug!(len = out.len(), "linearized tree");
    Ok(out)
}

fn emit_node(node: &Node, out: &mut Vec<String>) -> Result<()> {
    try_push(out, open_marker(node.kind), "flat sequence")?;

    if node.kind == NodeKind::Token {
        if let Some(label) = node.label.as_deref().filter(|l| !l.is_empty()) {
            try_push(out, label.to_string(), "flat sequence")?;
        }
    }

    for child in &node.children {
        emit_node(child, out)?;
    }

    try_push(out, close_marker(node.kind), "flat sequence")
}

pub fn open_marker(kind: NodeKind) -> String {
    format!("<{}>", kind.name())
}

pub fn close_marker(kind: NodeKind) -> String {
    format!("</{}>", kind.name())
}
