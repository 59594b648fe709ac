// ============================================================================
// HexRail - 坐标数据模型
// ============================================================================
//
// 文件: src/models/position.rs
// 职责: 六边形网格的轴向坐标及方向定义
// 边界:
//   - ✅ 轴向坐标 (q, r) 与派生坐标 s
//   - ✅ 六个边方向及其相对偏移
//   - ✅ 环形/螺旋遍历工具
//   - ✅ 坐标格式化输出
//   - ❌ 不应包含地块类型或城市信息
//   - ❌ 不应包含网格存储逻辑
//
// ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 轴向坐标系中的网格位置
///
/// 排序规则: 先按 q，再按 r
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TilePosition {
    pub q: i32,
    pub r: i32,
}

impl TilePosition {
    /// 创建新的坐标
    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// 原点
    pub const ORIGIN: TilePosition = TilePosition::new(0, 0);

    /// 计算 s 坐标
    pub fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// 按比例放大坐标
    pub fn scale(self, scale: i32) -> Self {
        Self::new(self.q * scale, self.r * scale)
    }

    /// 坐标相加
    pub fn add(self, other: TilePosition) -> Self {
        Self::new(self.q + other.q, self.r + other.r)
    }

    /// 坐标相减
    pub fn subtract(self, other: TilePosition) -> Self {
        Self::new(self.q - other.q, self.r - other.r)
    }

    /// 指定方向上的相邻坐标
    pub fn neighbour(self, direction: EdgeDirection) -> Self {
        self.add(direction.offset())
    }

    /// 所有六个相邻坐标（按方向顺序）
    pub fn neighbours(self) -> [TilePosition; 6] {
        EdgeDirection::ALL.map(|direction| self.neighbour(direction))
    }

    /// 两个坐标之间的六边形距离
    pub fn distance(self, other: TilePosition) -> i32 {
        let delta = self.subtract(other);
        (delta.q.abs() + delta.r.abs() + delta.s().abs()) / 2
    }

    /// 遍历以 center 为中心、半径为 radius 的环
    ///
    /// 回调返回 `true` 时提前结束，此时函数也返回 `true`。
    /// 回调参数: 当前坐标, (半径, 边索引, 边上的序号)
    pub fn for_each_ring<F>(center: TilePosition, radius: i32, mut function: F) -> bool
    where
        F: FnMut(TilePosition, RingStep) -> bool,
    {
        if radius == 0 {
            return function(center, RingStep { radius, side: 0, tile: 0 });
        }

        let mut current = center.add(EdgeDirection::ALL[4].offset().scale(radius));
        for (side, direction) in EdgeDirection::ALL.iter().enumerate() {
            for tile in 0..radius {
                if function(current, RingStep { radius, side, tile }) {
                    return true;
                }
                current = current.neighbour(*direction);
            }
        }
        false
    }

    /// 螺旋遍历半径 0..radius 内的所有环（不含 radius）
    pub fn for_each_spiral<F>(center: TilePosition, radius: i32, mut function: F)
    where
        F: FnMut(TilePosition, RingStep) -> bool,
    {
        for ring in 0..radius {
            if Self::for_each_ring(center, ring, &mut function) {
                return;
            }
        }
    }
}

impl fmt::Display for TilePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:+}, {:+}, {:+})", self.q, self.r, self.s())
    }
}

/// 环遍历过程中的位置信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingStep {
    pub radius: i32,
    pub side: usize,
    pub tile: i32,
}

/// 六边形的六个边方向（逆时针顺序，顺序不可更改）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl EdgeDirection {
    /// 全部方向
    pub const ALL: [EdgeDirection; 6] = [
        EdgeDirection::East,
        EdgeDirection::NorthEast,
        EdgeDirection::NorthWest,
        EdgeDirection::West,
        EdgeDirection::SouthWest,
        EdgeDirection::SouthEast,
    ];

    /// 该方向的相对偏移（q, r, s 均在 [-1, 1] 内）
    pub const fn offset(self) -> TilePosition {
        match self {
            EdgeDirection::East => TilePosition::new(1, 0),
            EdgeDirection::NorthEast => TilePosition::new(1, -1),
            EdgeDirection::NorthWest => TilePosition::new(0, -1),
            EdgeDirection::West => TilePosition::new(-1, 0),
            EdgeDirection::SouthWest => TilePosition::new(-1, 1),
            EdgeDirection::SouthEast => TilePosition::new(0, 1),
        }
    }

    /// 根据相对偏移查找方向
    pub fn from_relative_position(position: TilePosition) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|direction| direction.offset() == position)
    }

    /// 相反方向
    pub fn opposite(self) -> Self {
        let index = Self::ALL.iter().position(|d| *d == self).unwrap_or(0);
        Self::ALL[(index + 3) % 6]
    }
}
