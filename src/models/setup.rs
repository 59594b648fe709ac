// ============================================================================
// HexRail - 游戏准备数据模型
// ============================================================================
//
// 文件: src/models/setup.rs
// 职责: 开局前的玩家列表与地图选择
// 边界:
//   - ✅ 玩家名称、AI 类型、颜色的增删改查
//   - ✅ 地图选择
//   - ✅ 从准备数据构建玩家
//   - ❌ 不应包含游戏流程逻辑
//
// ============================================================================

use rand::Rng;

use crate::models::player::{AiKind, Player, PlayerBuilder};

/// 开局准备数据
///
/// 三个列表按玩家序号对齐；颜色列表允许比名称列表更长或更短。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameSetup {
    player_names: Vec<String>,
    ai_controllers: Vec<Option<AiKind>>,
    player_colors: Vec<String>,
    map_selection: String,
}

impl GameSetup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新已存在的玩家，序号越界时追加到末尾
    pub fn add_or_update_player(
        &mut self,
        name: impl Into<String>,
        ai: Option<AiKind>,
        index: usize,
        color: impl Into<String>,
    ) {
        let name = name.into();
        let color = color.into();
        if index < self.player_names.len() {
            self.player_names[index] = name;
            self.ai_controllers[index] = ai;
            if index < self.player_colors.len() {
                self.player_colors[index] = color;
            } else {
                self.set_player_color(index, color);
            }
        } else {
            self.player_names.push(name);
            self.ai_controllers.push(ai);
            self.player_colors.push(color);
        }
    }

    pub fn remove_player(&mut self, index: usize) {
        if index < self.player_names.len() {
            self.player_names.remove(index);
            self.ai_controllers.remove(index);
            if index < self.player_colors.len() {
                self.player_colors.remove(index);
            }
        }
    }

    /// 替换玩家名称列表，AI 与颜色列表按需补齐
    pub fn set_player_names(&mut self, names: Vec<String>) {
        while self.ai_controllers.len() < names.len() {
            self.ai_controllers.push(None);
        }
        while self.player_colors.len() < names.len() {
            self.player_colors.push(String::new());
        }
        self.player_names = names;
    }

    pub fn player_names(&self) -> &[String] {
        &self.player_names
    }

    pub fn set_player_as_ai(&mut self, index: usize, ai: Option<AiKind>) {
        if let Some(slot) = self.ai_controllers.get_mut(index) {
            *slot = ai;
        }
    }

    pub fn player_ai(&self, index: usize) -> Option<AiKind> {
        self.ai_controllers.get(index).copied().flatten()
    }

    pub fn is_player_ai(&self, index: usize) -> bool {
        self.player_ai(index).is_some()
    }

    /// 设置颜色，序号越界时用空颜色补齐
    pub fn set_player_color(&mut self, index: usize, color: impl Into<String>) {
        let color = color.into();
        if index < self.player_colors.len() {
            self.player_colors[index] = color;
        } else {
            while self.player_colors.len() < index {
                self.player_colors.push(String::new());
            }
            self.player_colors.push(color);
        }
    }

    /// 颜色，序号越界时为空字符串
    pub fn player_color(&self, index: usize) -> &str {
        self.player_colors
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_map_selection(&mut self, map: impl Into<String>) {
        self.map_selection = map.into();
    }

    pub fn map_selection(&self) -> &str {
        &self.map_selection
    }

    pub fn player_count(&self) -> usize {
        self.player_names.len()
    }

    /// 按准备数据创建玩家（序号从 1 开始）
    pub fn build_players<R: Rng + ?Sized>(&self, starting_credits: u32, rng: &mut R) -> Vec<Player> {
        self.player_names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                PlayerBuilder::new((index + 1) as u8)
                    .name(Some(name.clone()))
                    .color(Some(self.player_color(index).to_string()))
                    .ai(self.player_ai(index))
                    .build(starting_credits, rng)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn add_update_and_remove() {
        let mut setup = GameSetup::new();
        setup.add_or_update_player("Ada", None, 0, "#ff0000");
        setup.add_or_update_player("Bob", Some(AiKind::Basic), 7, "");
        assert_eq!(setup.player_names(), ["Ada", "Bob"]);
        assert!(setup.is_player_ai(1));

        setup.add_or_update_player("Eve", None, 1, "#00ff00");
        assert_eq!(setup.player_names(), ["Ada", "Eve"]);
        assert!(!setup.is_player_ai(1));
        assert_eq!(setup.player_color(1), "#00ff00");

        setup.remove_player(0);
        assert_eq!(setup.player_names(), ["Eve"]);
        assert_eq!(setup.player_color(0), "#00ff00");
        setup.remove_player(5);
        assert_eq!(setup.player_count(), 1);
    }

    #[test]
    fn set_names_pads_ai_and_colors() {
        let mut setup = GameSetup::new();
        setup.set_player_names(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(setup.player_ai(2), None);
        assert_eq!(setup.player_color(2), "");
        setup.set_player_as_ai(2, Some(AiKind::Basic));
        assert!(setup.is_player_ai(2));
        // 越界时忽略
        setup.set_player_as_ai(9, Some(AiKind::Basic));
        assert!(!setup.is_player_ai(9));
    }

    #[test]
    fn color_padding_beyond_end() {
        let mut setup = GameSetup::new();
        setup.set_player_color(2, "#123456");
        assert_eq!(setup.player_color(0), "");
        assert_eq!(setup.player_color(2), "#123456");
        assert_eq!(setup.player_color(3), "");
    }

    #[test]
    fn build_players_uses_one_based_ids() {
        let mut setup = GameSetup::new();
        setup.add_or_update_player("Ada", None, 0, "#ff0000");
        setup.add_or_update_player("Bot", Some(AiKind::Basic), 1, "");
        setup.set_map_selection("random");
        let mut rng = StdRng::seed_from_u64(3);
        let players = setup.build_players(20, &mut rng);
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id().0, 1);
        assert_eq!(players[0].color(), "#ff0000");
        assert_eq!(players[1].id().0, 2);
        assert!(players[1].is_ai());
        assert_eq!(players[1].credits(), 20);
        assert_eq!(setup.map_selection(), "random");
    }
}
