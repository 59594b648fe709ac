// ============================================================================
// HexRail - 棋盘元素数据模型
// ============================================================================
//
// 文件: src/models/board.rs
// 职责: 地块、城市与边（铁轨位置）的数据结构定义
// 边界:
//   - ✅ 地块类型与地块定义
//   - ✅ 城市定义
//   - ✅ 边的标准化键与铁轨所有者
//   - ❌ 不应包含费用计算（由网格负责）
//   - ❌ 不应包含地图生成逻辑
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::player::PlayerId;
use crate::models::position::TilePosition;
use crate::utils::constants::map_chars;

/// 地块类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    /// 平原
    Plain,
    /// 山地
    Mountain,
}

impl TileType {
    /// 地图渲染用的单字符符号
    pub fn symbol(&self) -> char {
        match self {
            TileType::Plain => map_chars::PLAIN,
            TileType::Mountain => map_chars::MOUNTAIN,
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileType::Plain => write!(f, "plain"),
            TileType::Mountain => write!(f, "mountain"),
        }
    }
}

/// 网格中的一个地块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub position: TilePosition,
    pub tile_type: TileType,
}

impl Tile {
    pub fn new(position: TilePosition, tile_type: TileType) -> Self {
        Self { position, tile_type }
    }
}

/// 城市
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub position: TilePosition,
    pub name: String,
    pub is_starting_city: bool,
}

impl City {
    pub fn new(position: TilePosition, name: impl Into<String>, is_starting_city: bool) -> Self {
        Self {
            position,
            name: name.into(),
            is_starting_city,
        }
    }
}

/// 两个相邻地块之间的边的键
///
/// 无序位置对，内部保证 `a < b`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    a: TilePosition,
    b: TilePosition,
}

impl EdgeKey {
    /// 创建标准化的边键
    pub fn new(p0: TilePosition, p1: TilePosition) -> Self {
        if p0 <= p1 {
            Self { a: p0, b: p1 }
        } else {
            Self { a: p1, b: p0 }
        }
    }

    /// 第一个端点（较小者）
    pub fn position1(&self) -> TilePosition {
        self.a
    }

    /// 第二个端点（较大者）
    pub fn position2(&self) -> TilePosition {
        self.b
    }

    /// 两个端点
    pub fn adjacent_positions(&self) -> [TilePosition; 2] {
        [self.a, self.b]
    }

    /// 是否以该位置为端点
    pub fn touches(&self, position: TilePosition) -> bool {
        self.a == position || self.b == position
    }

    /// 给定一个端点，返回另一个端点
    pub fn other_end(&self, position: TilePosition) -> Option<TilePosition> {
        if position == self.a {
            Some(self.b)
        } else if position == self.b {
            Some(self.a)
        } else {
            None
        }
    }

    /// 两条边是否相连（不同且恰好共享一个端点）
    pub fn connects_to(&self, other: &EdgeKey) -> bool {
        self != other
            && (other.touches(self.a) || other.touches(self.b))
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.a, self.b)
    }
}

/// 边及其上的铁轨
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub key: EdgeKey,
    /// 铁轨所有者（按建造顺序）
    pub rail_owners: Vec<PlayerId>,
}

impl Edge {
    pub fn new(key: EdgeKey) -> Self {
        Self {
            key,
            rail_owners: Vec::new(),
        }
    }

    /// 是否已有任何玩家建造铁轨
    pub fn has_rail(&self) -> bool {
        !self.rail_owners.is_empty()
    }

    /// 指定玩家是否在此建造了铁轨
    pub fn is_owned_by(&self, player: PlayerId) -> bool {
        self.rail_owners.contains(&player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_key_is_unordered() {
        let p0 = TilePosition::new(0, 0);
        let p1 = TilePosition::new(1, 0);
        assert_eq!(EdgeKey::new(p0, p1), EdgeKey::new(p1, p0));
        assert_eq!(EdgeKey::new(p1, p0).position1(), p0);
    }

    #[test]
    fn connects_to_requires_shared_end() {
        let origin = TilePosition::ORIGIN;
        let east = EdgeKey::new(origin, TilePosition::new(1, 0));
        let north_east = EdgeKey::new(origin, TilePosition::new(1, -1));
        let far = EdgeKey::new(TilePosition::new(3, 0), TilePosition::new(4, 0));

        assert!(east.connects_to(&north_east));
        assert!(!east.connects_to(&east));
        assert!(!east.connects_to(&far));
    }

    #[test]
    fn other_end_of_edge() {
        let key = EdgeKey::new(TilePosition::new(0, 0), TilePosition::new(0, 1));
        assert_eq!(key.other_end(TilePosition::new(0, 1)), Some(TilePosition::new(0, 0)));
        assert_eq!(key.other_end(TilePosition::new(5, 5)), None);
    }
}
