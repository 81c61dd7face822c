use std::fmt;

use serde::Serialize;

use crate::config::Thresholds;

/// 一次比较的结果。
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Comparison {
    pub distance: usize,
    pub len_a: usize,
    pub len_b: usize,
    /// [0, 1]
    pub similarity: f64,
}

impl Comparison {
    pub fn verdict(&self, thresholds: &Thresholds) -> Verdict {
        Verdict::from_similarity(self.similarity, thresholds)
    }

    pub fn percent(&self) -> f64 {
        self.similarity * 100.0
    }
}

/// 相似度分档（展示策略）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    HighlySimilar,
    ModeratelySimilar,
    SlightlySimilar,
    Dissimilar,
}

impl Verdict {
    pub fn from_similarity(similarity: f64, t: &Thresholds) -> Self {
        if similarity >= t.high {
            Verdict::HighlySimilar
        } else if similarity >= t.moderate {
            Verdict::ModeratelySimilar
        } else if similarity >= t.slight {
            Verdict::SlightlySimilar
        } else {
            Verdict::Dissimilar
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Verdict::HighlySimilar => "highly similar, possible plagiarism",
            Verdict::ModeratelySimilar => "moderately similar, needs manual review",
            Verdict::SlightlySimilar => "slightly similar, some shared structure",
            Verdict::Dissimilar => "dissimilar",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// CLI `--json` 输出的结构。
#[derive(Clone, Debug, Serialize)]
pub struct Report<'a> {
    pub file_a: &'a str,
    pub file_b: &'a str,
    #[serde(flatten)]
    pub comparison: Comparison,
    pub verdict: Verdict,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_bands_with_default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(Verdict::from_similarity(1.0, &t), Verdict::HighlySimilar);
        assert_eq!(Verdict::from_similarity(0.9, &t), Verdict::HighlySimilar);
        assert_eq!(Verdict::from_similarity(0.75, &t), Verdict::ModeratelySimilar);
        assert_eq!(Verdict::from_similarity(0.3, &t), Verdict::SlightlySimilar);
        assert_eq!(Verdict::from_similarity(0.29, &t), Verdict::Dissimilar);
    }

    #[test]
    fn report_serializes_flat() {
        let report = Report {
            file_a: "a.c",
            file_b: "b.c",
            comparison: Comparison {
                distance: 2,
                len_a: 10,
                len_b: 8,
                similarity: 0.8,
            },
            verdict: Verdict::ModeratelySimilar,
        };
        let v = serde_json::to_value(&report).unwrap();
        assert_eq!(v["distance"], 2);
        assert_eq!(v["verdict"], "moderately_similar");
        assert_eq!(v["file_a"], "a.c");
    }
}
