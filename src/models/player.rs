// ============================================================================
// HexRail - 玩家数据模型
// ============================================================================
//
// 文件: src/models/player.rs
// 职责: 玩家信息、信用点账户与构建器定义
// 边界:
//   - ✅ 玩家标识、名称、颜色、AI 类型
//   - ✅ 信用点增减
//   - ✅ 玩家构建器
//   - ❌ 不应包含回合流程逻辑
//   - ❌ 不应包含铁轨归属查询（由网格负责）
//
// ============================================================================

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 玩家 ID（即玩家序号，从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 可用的 AI 控制器类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiKind {
    /// 随机建造、总是确认的基础 AI
    Basic,
}

impl AiKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiKind::Basic => "basic",
        }
    }

    /// 从字符串解析 AI 类型
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "basic" | "ai" => Ok(AiKind::Basic),
            _ => Err(format!("unsupported ai controller: {}, available: basic", s)),
        }
    }

    /// 所有可用的 AI 类型
    pub fn all() -> &'static [AiKind] {
        &[AiKind::Basic]
    }
}

impl fmt::Display for AiKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 游戏中的玩家
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    /// `#rrggbb` 格式的颜色
    color: String,
    ai: Option<AiKind>,
    credits: u32,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn is_ai(&self) -> bool {
        self.ai.is_some()
    }

    pub fn ai(&self) -> Option<AiKind> {
        self.ai
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    /// 增加信用点
    pub fn add_credits(&mut self, amount: u32) {
        self.credits += amount;
    }

    /// 尝试扣除信用点，余额不足时不做任何修改并返回 `false`
    pub fn remove_credits(&mut self, amount: u32) -> bool {
        match self.credits.checked_sub(amount) {
            Some(remaining) => {
                self.credits = remaining;
                true
            }
            None => false,
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {} {} ({})", self.id.0, self.name, self.color)
    }
}

/// 玩家构建器
#[derive(Debug, Clone)]
pub struct PlayerBuilder {
    id: u8,
    color: Option<String>,
    name: Option<String>,
    ai: Option<AiKind>,
}

impl PlayerBuilder {
    pub fn new(id: u8) -> Self {
        Self {
            id,
            color: None,
            name: None,
            ai: None,
        }
    }

    pub fn id(mut self, id: u8) -> Self {
        self.id = id;
        self
    }

    /// 设置颜色，空字符串视为未设置
    pub fn color(mut self, color: Option<String>) -> Self {
        self.color = color.filter(|c| !c.trim().is_empty());
        self
    }

    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.trim().is_empty());
        self
    }

    pub fn ai(mut self, ai: Option<AiKind>) -> Self {
        self.ai = ai;
        self
    }

    pub fn is_ai(&self) -> bool {
        self.ai.is_some()
    }

    /// 名称，未设置时为 `Player{id}`
    pub fn name_or_default(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Player{}", self.id))
    }

    /// 构建玩家，未设置颜色时随机生成
    pub fn build<R: Rng + ?Sized>(self, starting_credits: u32, rng: &mut R) -> Player {
        let name = self.name_or_default();
        let color = self.color.unwrap_or_else(|| {
            format!(
                "#{:02x}{:02x}{:02x}",
                rng.gen::<u8>(),
                rng.gen::<u8>(),
                rng.gen::<u8>()
            )
        });
        Player {
            id: PlayerId(self.id),
            name,
            color,
            ai: self.ai,
            credits: starting_credits,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn builder_defaults() {
        let mut rng = StdRng::seed_from_u64(1);
        let player = PlayerBuilder::new(3).build(20, &mut rng);
        assert_eq!(player.id(), PlayerId(3));
        assert_eq!(player.name(), "Player3");
        assert_eq!(player.credits(), 20);
        assert!(player.color().starts_with('#'));
        assert_eq!(player.color().len(), 7);
        assert!(!player.is_ai());
    }

    #[test]
    fn remove_credits_fails_without_side_effect() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut player = PlayerBuilder::new(1)
            .name(Some("Ada".into()))
            .ai(Some(AiKind::Basic))
            .build(5, &mut rng);
        assert!(!player.remove_credits(6));
        assert_eq!(player.credits(), 5);
        assert!(player.remove_credits(5));
        assert_eq!(player.credits(), 0);
        player.add_credits(7);
        assert_eq!(player.credits(), 7);
        assert!(player.is_ai());
    }

    #[test]
    fn ai_kind_parsing() {
        assert_eq!(AiKind::from_str("Basic"), Ok(AiKind::Basic));
        assert!(AiKind::from_str("deep-blue").is_err());
    }
}
