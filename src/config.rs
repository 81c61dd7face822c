//! 配置：词法选项 + 相似度判定阈值。
//!
//! 配置文件是 JSON，所有字段都有默认值，只写需要改的部分即可：
//!
//! ```json
//! { "lex": { "ident_ordinals": "first_appearance" }, "thresholds": { "high": 0.95 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub lex: LexOptions,
    pub thresholds: Thresholds,
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: Config = serde_json::from_str(s).map_err(|e| Error::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()
    }
}

/// 标识符编号方式。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentOrdinals {
    /// 每出现一次标识符就分配下一个编号：`x = x + 1` -> `var_0 = var_1 + NUM`。
    #[default]
    PerOccurrence,
    /// 同一个拼写共用一个编号，按首次出现顺序分配：`x = x + 1` -> `var_0 = var_0 + NUM`。
    FirstAppearance,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LexOptions {
    pub ident_ordinals: IdentOrdinals,
    /// 额外把 `:` 和 `?` 当作标点输出。
    ///
    /// 默认的标点表里没有 `:`，它会被当作未知字符跳过，`case` 标签因此一直收集到下一个 `{`/`}`。
    pub colon_punctuation: bool,
}

/// 相似度分档阈值（展示策略，不属于核心算法）。
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Thresholds {
    pub high: f64,
    pub moderate: f64,
    pub slight: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            high: 0.9,
            moderate: 0.6,
            slight: 0.3,
        }
    }
}

impl Thresholds {
    /// 阈值必须在 [0,1] 内并且 high >= moderate >= slight。
    pub fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("high", self.high),
            ("moderate", self.moderate),
            ("slight", self.slight),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::config(format!(
                    "threshold `{name}` must be within [0, 1], got {v}"
                )));
            }
        }
        if self.high < self.moderate || self.moderate < self.slight {
            return Err(Error::config(
                "thresholds must satisfy high >= moderate >= slight",
            ));
        }
        Ok(())
    }
}
