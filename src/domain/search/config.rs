// 探索設定

use serde::{Deserialize, Serialize};

use crate::constants::{DIRS_4, DIRS_8};
use crate::error::SolveError;

/// 重視する消去方向
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

/// 探索の優先度
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// スコア最大（コンボ優先）
    #[default]
    MaxClusters,
    /// 目標達成後は手数最小
    MinSteps,
}

/// ソルバ設定（キャッシュキーにも使う）
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// ビーム幅
    pub beam_width: usize,
    /// 最大手数
    pub max_steps: u32,
    /// 展開ノード上限
    pub max_nodes: u64,
    /// 1手あたりの減点
    pub step_penalty: f64,
    /// ポテンシャルの重み
    pub potential_weight: f64,
    /// 消去数の重み
    pub cleared_weight: f64,
    /// コンボ優先時のノード上限の下限係数（手数 × 幅 × 係数）
    pub node_floor_factor: u64,
    /// 目標コンボ数
    pub target: u32,
    pub axis: Axis,
    pub priority: Priority,
    /// 落ちコンを数える
    pub chain: bool,
    /// 斜め移動を許可
    pub diagonal: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            beam_width: 200,
            max_steps: 50,
            max_nodes: 120_000,
            step_penalty: 250.0,
            potential_weight: 800.0,
            cleared_weight: 1000.0,
            node_floor_factor: 20,
            target: 1,
            axis: Axis::Horizontal,
            priority: Priority::MaxClusters,
            chain: false,
            diagonal: true,
        }
    }
}

impl SolverConfig {
    pub fn with_target(mut self, target: u32) -> Self {
        self.target = target;
        self
    }

    pub fn with_axis(mut self, axis: Axis) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_chain(mut self, chain: bool) -> Self {
        self.chain = chain;
        self
    }

    pub fn with_diagonal(mut self, diagonal: bool) -> Self {
        self.diagonal = diagonal;
        self
    }

    pub fn with_beam_width(mut self, beam_width: usize) -> Self {
        self.beam_width = beam_width;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: u64) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// 設定の検証
    pub fn validate(&self) -> Result<(), SolveError> {
        if self.beam_width == 0 {
            return Err(SolveError::InvalidConfig("ビーム幅は1以上である必要があります".into()));
        }
        if self.max_steps == 0 {
            return Err(SolveError::InvalidConfig("最大手数は1以上である必要があります".into()));
        }
        if self.max_nodes == 0 {
            return Err(SolveError::InvalidConfig("ノード上限は1以上である必要があります".into()));
        }
        if self.target == 0 {
            return Err(SolveError::InvalidConfig("目標コンボ数は1以上である必要があります".into()));
        }
        for (name, w) in [
            ("step_penalty", self.step_penalty),
            ("potential_weight", self.potential_weight),
            ("cleared_weight", self.cleared_weight),
        ] {
            if !w.is_finite() || w < 0.0 {
                return Err(SolveError::InvalidConfig(format!("{} が不正: {}", name, w)));
            }
        }
        Ok(())
    }

    /// 実効ノード上限
    pub fn effective_max_nodes(&self) -> u64 {
        match self.priority {
            Priority::MaxClusters => self.max_nodes.max(
                (self.max_steps as u64)
                    .saturating_mul(self.beam_width as u64)
                    .saturating_mul(self.node_floor_factor),
            ),
            Priority::MinSteps => self.max_nodes,
        }
    }

    /// 有効な移動方向
    pub fn directions(&self) -> &'static [(i8, i8)] {
        if self.diagonal {
            &DIRS_8
        } else {
            &DIRS_4
        }
    }

    /// キャッシュキー用の直列化
    pub fn serialize_key(&self) -> String {
        // 全フィールドが数値/列挙なので失敗しない
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SolverConfig::default().validate().is_ok());
    }

    #[test]
    fn rejects_zero_beam_width() {
        let config = SolverConfig::default().with_beam_width(0);
        assert!(matches!(config.validate(), Err(SolveError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_zero_target() {
        assert!(SolverConfig::default().with_target(0).validate().is_err());
    }

    #[test]
    fn rejects_negative_weight() {
        let config = SolverConfig {
            potential_weight: -1.0,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());

        let config = SolverConfig {
            step_penalty: f64::NAN,
            ..SolverConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn node_floor_applies_only_to_max_clusters() {
        let config = SolverConfig::default();
        // 50 × 200 × 20 = 200000 > 120000
        assert_eq!(config.effective_max_nodes(), 200_000);

        let config = config.with_priority(Priority::MinSteps);
        assert_eq!(config.effective_max_nodes(), 120_000);
    }

    #[test]
    fn directions_follow_diagonal_toggle() {
        assert_eq!(SolverConfig::default().directions().len(), 8);
        assert_eq!(SolverConfig::default().with_diagonal(false).directions().len(), 4);
    }

    #[test]
    fn serialize_key_distinguishes_configs() {
        let a = SolverConfig::default();
        let b = SolverConfig::default().with_axis(Axis::Vertical);
        assert_ne!(a.serialize_key(), b.serialize_key());
        assert_eq!(a.serialize_key(), SolverConfig::default().serialize_key());
    }

    #[test]
    fn json_roundtrip_with_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"target":3,"priority":"min_steps"}"#).unwrap();
        assert_eq!(config.target, 3);
        assert_eq!(config.priority, Priority::MinSteps);
        assert_eq!(config.beam_width, 200);
    }
}
