// ============================================================================
// HexRail - 六边形网格
// ============================================================================
//
// 文件: src/core/grid.rs
// 职责: 地块、边、城市的存储与查询，铁轨归属与费用计算，路径搜索
// 边界:
//   - ✅ 地块/边/城市查询
//   - ✅ 铁轨放置规则
//   - ✅ 建造、平行、驾驶、租用费用
//   - ✅ 基于 petgraph 的最短路径
//   - ❌ 不应包含随机地图生成（由 mapgen 负责）
//   - ❌ 不应包含回合流程逻辑
//
// 费用规则:
// 1. 建造费用由两端地块类型集合决定
// 2. 平行费用付给同一条边或同一地块上其他铁轨的所有者
// 3. 驾驶费用由（出发, 到达）地块类型决定
// 4. 租用他人铁轨时向每个所有者支付 1
//
// ============================================================================

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::error::{GameError, GameResult};
use crate::models::board::{City, Edge, EdgeKey, Tile, TileType};
use crate::models::config::Rules;
use crate::models::player::PlayerId;
use crate::models::position::{EdgeDirection, TilePosition};

/// 游戏地图
#[derive(Debug, Clone)]
pub struct HexGrid {
    tiles: BTreeMap<TilePosition, Tile>,
    edges: BTreeMap<EdgeKey, Edge>,
    cities: BTreeMap<TilePosition, City>,
    rules: Rules,
}

/// 可序列化的地图快照
#[derive(Debug, Clone, Serialize)]
pub struct GridSnapshot {
    pub tiles: Vec<Tile>,
    pub cities: Vec<City>,
    pub rails: Vec<Edge>,
}

impl HexGrid {
    /// 由地块与城市创建网格，每对相邻地块之间生成一条边
    pub fn new(
        tiles: impl IntoIterator<Item = Tile>,
        cities: impl IntoIterator<Item = City>,
        rules: Rules,
    ) -> Self {
        let tiles: BTreeMap<_, _> = tiles.into_iter().map(|t| (t.position, t)).collect();
        let cities = cities.into_iter().map(|c| (c.position, c)).collect();

        let mut edges = BTreeMap::new();
        for position in tiles.keys() {
            for neighbour in position.neighbours() {
                if tiles.contains_key(&neighbour) {
                    let key = EdgeKey::new(*position, neighbour);
                    edges.entry(key).or_insert_with(|| Edge::new(key));
                }
            }
        }

        Self {
            tiles,
            edges,
            cities,
            rules,
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn tiles(&self) -> &BTreeMap<TilePosition, Tile> {
        &self.tiles
    }

    pub fn edges(&self) -> &BTreeMap<EdgeKey, Edge> {
        &self.edges
    }

    pub fn cities(&self) -> &BTreeMap<TilePosition, City> {
        &self.cities
    }

    pub fn tile_at(&self, position: TilePosition) -> Option<&Tile> {
        self.tiles.get(&position)
    }

    pub fn city_at(&self, position: TilePosition) -> Option<&City> {
        self.cities.get(&position)
    }

    pub fn edge(&self, p0: TilePosition, p1: TilePosition) -> Option<&Edge> {
        self.edges.get(&EdgeKey::new(p0, p1))
    }

    pub fn edge_by_key(&self, key: &EdgeKey) -> Option<&Edge> {
        self.edges.get(key)
    }

    fn require_edge(&self, key: &EdgeKey) -> GameResult<&Edge> {
        self.edges
            .get(key)
            .ok_or(GameError::UnknownEdge(key.position1(), key.position2()))
    }

    fn require_tile(&self, position: TilePosition) -> GameResult<&Tile> {
        self.tiles
            .get(&position)
            .ok_or(GameError::UnknownPosition(position))
    }

    // ------------------------------------------------------------------------
    // 邻接查询
    // ------------------------------------------------------------------------

    pub fn neighbour(&self, position: TilePosition, direction: EdgeDirection) -> Option<&Tile> {
        self.tiles.get(&position.neighbour(direction))
    }

    /// 存在的相邻地块
    pub fn neighbours(&self, position: TilePosition) -> Vec<&Tile> {
        position
            .neighbours()
            .iter()
            .filter_map(|p| self.tiles.get(p))
            .collect()
    }

    pub fn edge_in_direction(&self, position: TilePosition, direction: EdgeDirection) -> Option<&Edge> {
        self.edge(position, position.neighbour(direction))
    }

    /// 以该地块为端点的所有边
    pub fn tile_edges(&self, position: TilePosition) -> Vec<&Edge> {
        EdgeDirection::ALL
            .iter()
            .filter_map(|direction| self.edge_in_direction(position, *direction))
            .collect()
    }

    /// 相邻地块少于六个即为海岸
    pub fn is_at_coast(&self, position: TilePosition) -> bool {
        self.neighbours(position).len() < 6
    }

    /// 通过给定边集可到达的相邻位置
    pub fn connected_neighbours(
        &self,
        position: TilePosition,
        edges: &BTreeSet<EdgeKey>,
    ) -> Vec<TilePosition> {
        self.tile_edges(position)
            .into_iter()
            .filter(|edge| edges.contains(&edge.key))
            .filter_map(|edge| edge.key.other_end(position))
            .collect()
    }

    /// 与给定边相连的所有边
    pub fn connected_edges(&self, key: &EdgeKey) -> Vec<EdgeKey> {
        let mut result: BTreeSet<EdgeKey> = BTreeSet::new();
        for position in key.adjacent_positions() {
            for edge in self.tile_edges(position) {
                if edge.key.connects_to(key) {
                    result.insert(edge.key);
                }
            }
        }
        result.into_iter().collect()
    }

    /// 与给定边相连、且属于该玩家的铁轨
    pub fn connected_rails(&self, key: &EdgeKey, player: PlayerId) -> Vec<EdgeKey> {
        self.connected_edges(key)
            .into_iter()
            .filter(|k| self.edges.get(k).is_some_and(|e| e.is_owned_by(player)))
            .collect()
    }

    // ------------------------------------------------------------------------
    // 铁轨
    // ------------------------------------------------------------------------

    /// 玩家拥有的所有铁轨
    pub fn rails(&self, player: PlayerId) -> BTreeSet<EdgeKey> {
        self.edges
            .values()
            .filter(|edge| edge.is_owned_by(player))
            .map(|edge| edge.key)
            .collect()
    }

    /// 地块上属于该玩家的铁轨
    pub fn tile_rails(&self, position: TilePosition, player: PlayerId) -> Vec<EdgeKey> {
        self.tile_edges(position)
            .into_iter()
            .filter(|edge| edge.is_owned_by(player))
            .map(|edge| edge.key)
            .collect()
    }

    fn has_any_rail(&self, player: PlayerId) -> bool {
        self.edges.values().any(|edge| edge.is_owned_by(player))
    }

    /// 玩家是否可以在该边上放置铁轨（不考虑费用）
    pub fn can_place_rail(&self, key: &EdgeKey, player: PlayerId) -> bool {
        let Some(edge) = self.edges.get(key) else {
            return false;
        };
        if edge.is_owned_by(player) {
            return false;
        }
        if self.has_any_rail(player) {
            !self.connected_rails(key, player).is_empty()
        } else {
            key.adjacent_positions()
                .iter()
                .any(|p| self.city_at(*p).is_some_and(|city| city.is_starting_city))
        }
    }

    /// 添加铁轨，违反放置规则时返回 `false`
    pub fn add_rail(&mut self, key: &EdgeKey, player: PlayerId) -> bool {
        if !self.can_place_rail(key, player) {
            return false;
        }
        match self.edges.get_mut(key) {
            Some(edge) => {
                edge.rail_owners.push(player);
                true
            }
            None => false,
        }
    }

    pub fn remove_rail(&mut self, key: &EdgeKey, player: PlayerId) -> bool {
        match self.edges.get_mut(key) {
            Some(edge) => {
                let before = edge.rail_owners.len();
                edge.rail_owners.retain(|owner| *owner != player);
                edge.rail_owners.len() != before
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------------
    // 城市
    // ------------------------------------------------------------------------

    /// 城市所在地块是否有任何铁轨
    pub fn is_city_connected(&self, position: TilePosition) -> bool {
        self.tile_edges(position).iter().any(|edge| edge.has_rail())
    }

    pub fn connected_cities(&self) -> Vec<&City> {
        self.cities
            .values()
            .filter(|city| self.is_city_connected(city.position))
            .collect()
    }

    pub fn unconnected_cities(&self) -> Vec<&City> {
        self.cities
            .values()
            .filter(|city| !self.is_city_connected(city.position))
            .collect()
    }

    pub fn starting_cities(&self) -> Vec<&City> {
        self.cities
            .values()
            .filter(|city| city.is_starting_city)
            .collect()
    }

    // ------------------------------------------------------------------------
    // 费用
    // ------------------------------------------------------------------------

    pub fn base_building_cost(&self, key: &EdgeKey) -> GameResult<u32> {
        let edge = self.require_edge(key)?;
        let mut types = BTreeSet::new();
        for position in edge.key.adjacent_positions() {
            types.insert(self.require_tile(position)?.tile_type);
        }
        Ok(self.rules.building_cost_for(&types))
    }

    /// 在该边建造时需要付给其他玩家的费用
    pub fn parallel_cost_per_player(
        &self,
        key: &EdgeKey,
        player: PlayerId,
    ) -> BTreeMap<PlayerId, u32> {
        let mut result = BTreeMap::new();
        let Some(edge) = self.edges.get(key) else {
            return result;
        };
        let costs = &self.rules.parallel_cost;

        let owned_solely = edge.rail_owners.len() == 1 && edge.is_owned_by(player);
        if edge.has_rail() && !owned_solely {
            let at_city = key.adjacent_positions().iter().any(|p| self.cities.contains_key(p));
            let amount = if at_city {
                costs.same_edge_at_city
            } else {
                costs.same_edge
            };
            for owner in &edge.rail_owners {
                result.insert(*owner, amount);
            }
        }

        for position in key.adjacent_positions() {
            if self.cities.contains_key(&position) {
                continue;
            }
            let owners: BTreeSet<PlayerId> = self
                .tile_edges(position)
                .into_iter()
                .filter(|other| other.key != *key)
                .flat_map(|other| other.rail_owners.iter().copied())
                .collect();
            if owners.contains(&player) {
                continue;
            }
            for owner in owners {
                let entry = result.entry(owner).or_insert(0);
                *entry = (*entry).max(costs.shared_tile);
            }
        }

        result
    }

    pub fn total_parallel_cost(&self, key: &EdgeKey, player: PlayerId) -> u32 {
        self.parallel_cost_per_player(key, player).values().sum()
    }

    pub fn total_building_cost(&self, key: &EdgeKey, player: PlayerId) -> GameResult<u32> {
        Ok(self.base_building_cost(key)? + self.total_parallel_cost(key, player))
    }

    /// 从 `from` 出发经过该边的驾驶费用
    pub fn driving_cost(&self, key: &EdgeKey, from: TilePosition) -> GameResult<u32> {
        let to = key.other_end(from).ok_or_else(|| {
            GameError::illegal(format!("{} is not an end of edge {}", from, key))
        })?;
        self.driving_cost_between(from, to)
    }

    pub fn driving_cost_between(&self, from: TilePosition, to: TilePosition) -> GameResult<u32> {
        let from_type: TileType = self.require_tile(from)?.tile_type;
        let to_type: TileType = self.require_tile(to)?.tile_type;
        Ok(self.rules.driving_cost_for(from_type, to_type))
    }

    /// 租用该边需要付给所有者的费用，自己拥有时为空
    pub fn renting_cost(&self, key: &EdgeKey, player: PlayerId) -> BTreeMap<PlayerId, u32> {
        match self.edges.get(key) {
            Some(edge) if !edge.is_owned_by(player) => {
                edge.rail_owners.iter().map(|owner| (*owner, 1)).collect()
            }
            _ => BTreeMap::new(),
        }
    }

    // ------------------------------------------------------------------------
    // 路径
    // ------------------------------------------------------------------------

    /// 在可用边中寻找从 start 到 target 的最低费用路径
    ///
    /// 无法到达或起终点相同时返回空路径。
    pub fn find_path<F>(
        &self,
        start: TilePosition,
        target: TilePosition,
        available_edges: &BTreeSet<EdgeKey>,
        edge_cost: F,
    ) -> Vec<EdgeKey>
    where
        F: Fn(TilePosition, TilePosition) -> u32,
    {
        if start == target {
            return Vec::new();
        }

        let mut graph: DiGraph<TilePosition, u32> = DiGraph::new();
        let mut indices: BTreeMap<TilePosition, NodeIndex> = BTreeMap::new();
        let mut node = |graph: &mut DiGraph<TilePosition, u32>, position: TilePosition| {
            *indices
                .entry(position)
                .or_insert_with(|| graph.add_node(position))
        };

        let start_index = node(&mut graph, start);
        for key in available_edges.iter().filter(|k| self.edges.contains_key(k)) {
            let a = node(&mut graph, key.position1());
            let b = node(&mut graph, key.position2());
            graph.add_edge(a, b, edge_cost(key.position1(), key.position2()));
            graph.add_edge(b, a, edge_cost(key.position2(), key.position1()));
        }
        let Some(target_index) = indices.get(&target).copied() else {
            return Vec::new();
        };

        match astar(
            &graph,
            start_index,
            |n| n == target_index,
            |e| *e.weight(),
            |_| 0,
        ) {
            Some((_, nodes)) => nodes
                .windows(2)
                .map(|pair| EdgeKey::new(graph[pair[0]], graph[pair[1]]))
                .collect(),
            None => Vec::new(),
        }
    }

    /// 导出快照（只包含有铁轨的边）
    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            tiles: self.tiles.values().cloned().collect(),
            cities: self.cities.values().cloned().collect(),
            rails: self.edges.values().filter(|e| e.has_rail()).cloned().collect(),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const P1: PlayerId = PlayerId(1);
    pub(crate) const P2: PlayerId = PlayerId(2);

    /// 半径 3 的平原六边形，(2,0) 为山地；
    /// 起始城市在 (-2,0)，普通城市在 (2,-2)、(0,2)
    pub(crate) fn small_grid() -> HexGrid {
        let mut tiles = Vec::new();
        TilePosition::for_each_spiral(TilePosition::ORIGIN, 4, |position, _| {
            let tile_type = if position == TilePosition::new(2, 0) {
                TileType::Mountain
            } else {
                TileType::Plain
            };
            tiles.push(Tile::new(position, tile_type));
            false
        });
        let cities = vec![
            City::new(TilePosition::new(-2, 0), "Altstadt", true),
            City::new(TilePosition::new(2, -2), "Bergheim", false),
            City::new(TilePosition::new(0, 2), "Seedorf", false),
        ];
        HexGrid::new(tiles, cities, Rules::default())
    }

    pub(crate) fn key(a: (i32, i32), b: (i32, i32)) -> EdgeKey {
        EdgeKey::new(TilePosition::new(a.0, a.1), TilePosition::new(b.0, b.1))
    }

    #[test]
    fn edges_connect_every_adjacent_pair() {
        let grid = small_grid();
        assert_eq!(grid.tiles().len(), 37);
        // 内部 19 个地块各 6 条边，外环按实际邻居计，总数 = (sum of degrees) / 2
        let degree_sum: usize = grid
            .tiles()
            .keys()
            .map(|p| grid.neighbours(*p).len())
            .sum();
        assert_eq!(grid.edges().len(), degree_sum / 2);
        assert!(grid.edge(TilePosition::ORIGIN, TilePosition::new(1, 0)).is_some());
        assert!(grid.edge(TilePosition::ORIGIN, TilePosition::new(2, 0)).is_none());
    }

    #[test]
    fn coast_detection() {
        let grid = small_grid();
        assert!(!grid.is_at_coast(TilePosition::ORIGIN));
        assert!(grid.is_at_coast(TilePosition::new(3, 0)));
    }

    #[test]
    fn first_rail_must_touch_starting_city() {
        let mut grid = small_grid();
        assert!(!grid.add_rail(&key((0, 0), (1, 0)), P1));
        assert!(grid.add_rail(&key((-2, 0), (-1, 0)), P1));
        // 已拥有则失败
        assert!(!grid.add_rail(&key((-2, 0), (-1, 0)), P1));
        // 之后必须与自己的铁轨相连
        assert!(!grid.add_rail(&key((1, 0), (2, 0)), P1));
        assert!(grid.add_rail(&key((-1, 0), (0, 0)), P1));
        assert_eq!(grid.rails(P1).len(), 2);
        assert_eq!(grid.tile_rails(TilePosition::new(-1, 0), P1).len(), 2);
    }

    #[test]
    fn connected_and_unconnected_cities() {
        let mut grid = small_grid();
        assert_eq!(grid.connected_cities().len(), 0);
        assert_eq!(grid.unconnected_cities().len(), 3);
        assert_eq!(grid.starting_cities().len(), 1);
        grid.add_rail(&key((-2, 0), (-1, 0)), P1);
        assert_eq!(grid.connected_cities().len(), 1);
        assert_eq!(grid.unconnected_cities().len(), 2);
        assert!(grid.remove_rail(&key((-2, 0), (-1, 0)), P1));
        assert!(!grid.remove_rail(&key((-2, 0), (-1, 0)), P1));
        assert_eq!(grid.connected_cities().len(), 0);
    }

    #[test]
    fn building_cost_by_tile_types() {
        let grid = small_grid();
        assert_eq!(grid.base_building_cost(&key((0, 0), (1, 0))).unwrap(), 1);
        assert_eq!(grid.base_building_cost(&key((1, 0), (2, 0))).unwrap(), 3);
        assert!(grid.base_building_cost(&key((0, 0), (2, 0))).is_err());
    }

    #[test]
    fn parallel_cost_on_same_edge() {
        let mut grid = small_grid();
        let first = key((-2, 0), (-1, 0));
        grid.add_rail(&first, P1);
        // 一端为城市: 3
        let costs = grid.parallel_cost_per_player(&first, P2);
        assert_eq!(costs.get(&P1), Some(&3));
        // 仅自己拥有时没有同边费用
        assert!(grid.parallel_cost_per_player(&first, P1).is_empty());

        let middle = key((-1, 0), (0, 0));
        grid.add_rail(&middle, P1);
        // 无城市的同边: 5（共享地块的 1 被取最大值覆盖）
        assert_eq!(grid.parallel_cost_per_player(&middle, P2).get(&P1), Some(&5));
        assert_eq!(grid.total_building_cost(&middle, P2).unwrap(), 6);
    }

    #[test]
    fn parallel_cost_on_shared_tile() {
        let mut grid = small_grid();
        grid.add_rail(&key((-2, 0), (-1, 0)), P1);
        // (-1,0) 上有 P1 的铁轨，P2 在该地块旁建造需付 1
        let next = key((-1, 0), (-1, 1));
        assert_eq!(grid.parallel_cost_per_player(&next, P2).get(&P1), Some(&1));
        // P1 自己在该地块上有铁轨时不付费
        assert!(grid.parallel_cost_per_player(&next, P1).is_empty());
    }

    #[test]
    fn driving_cost_is_directional() {
        let grid = small_grid();
        let uphill = key((1, 0), (2, 0));
        assert_eq!(grid.driving_cost(&uphill, TilePosition::new(1, 0)).unwrap(), 2);
        assert_eq!(grid.driving_cost(&uphill, TilePosition::new(2, 0)).unwrap(), 1);
        assert!(grid.driving_cost(&uphill, TilePosition::ORIGIN).is_err());
    }

    #[test]
    fn renting_cost_per_owner() {
        let mut grid = small_grid();
        let edge = key((-2, 0), (-1, 0));
        grid.add_rail(&edge, P1);
        grid.add_rail(&edge, P2);
        assert!(grid.renting_cost(&edge, P1).is_empty());
        let cost = grid.renting_cost(&edge, PlayerId(3));
        assert_eq!(cost.len(), 2);
        assert!(cost.values().all(|c| *c == 1));
    }

    #[test]
    fn find_path_prefers_cheaper_route() {
        let grid = small_grid();
        let all: BTreeSet<EdgeKey> = grid.edges().keys().copied().collect();
        let start = TilePosition::new(1, 0);
        let target = TilePosition::new(3, -1);
        let path = grid.find_path(start, target, &all, |from, to| {
            grid.driving_cost_between(from, to).unwrap_or(u32::MAX / 4)
        });
        // 经 (2,-1) 费用为 2，经山地 (2,0) 为 3
        assert_eq!(path, vec![key((1, 0), (2, -1)), key((2, -1), (3, -1))]);

        assert!(grid.find_path(start, start, &all, |_, _| 1).is_empty());
        assert!(grid.find_path(start, target, &BTreeSet::new(), |_, _| 1).is_empty());
    }

    #[test]
    fn find_path_restricted_to_available_edges() {
        let grid = small_grid();
        let line: BTreeSet<EdgeKey> = [key((-2, 0), (-1, 0)), key((-1, 0), (0, 0))]
            .into_iter()
            .collect();
        let path = grid.find_path(TilePosition::new(-2, 0), TilePosition::ORIGIN, &line, |_, _| 1);
        assert_eq!(path, vec![key((-2, 0), (-1, 0)), key((-1, 0), (0, 0))]);
    }
}
