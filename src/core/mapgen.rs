// ============================================================================
// HexRail - 地图生成器
// ============================================================================
//
// 文件: src/core/mapgen.rs
// 职责: 随机生成地块与城市
// 边界:
//   - ✅ 随机游走生成平原与山地
//   - ✅ 按概率放置城市与起始城市
//   - ✅ 城市命名
//   - ❌ 不应包含费用或铁轨逻辑
//
// 算法设计:
// 1. 中心为平原，从随机已有地块出发进行 10*scale 次长度 3*scale 的平原游走
// 2. 再进行 4*scale 次长度 scale/2 的山地游走（覆盖已有地块）
// 3. 随机选取平原地块，按海岸/山地/城市邻近规则决定放置概率
//
// ============================================================================

use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::core::grid::HexGrid;
use crate::core::names::NameGenerator;
use crate::error::{GameError, GameResult};
use crate::models::board::{City, Tile, TileType};
use crate::models::config::{MapSettings, Rules};
use crate::models::position::{EdgeDirection, TilePosition};

/// 放置城市的最大尝试次数
const MAX_CITY_ATTEMPTS: usize = 1_000_000;
/// 重名时重新生成名称的次数
const NAME_RETRIES: usize = 20;

/// 随机地图生成器
pub struct MapGenerator<'a> {
    settings: &'a MapSettings,
    rules: &'a Rules,
}

impl<'a> MapGenerator<'a> {
    pub fn new(settings: &'a MapSettings, rules: &'a Rules) -> Self {
        Self { settings, rules }
    }

    /// 生成完整地图
    pub fn generate<R: Rng + ?Sized>(
        &self,
        names: &NameGenerator,
        rng: &mut R,
    ) -> GameResult<HexGrid> {
        let tiles = self.generate_tiles(rng);
        let cities = self.place_cities(&tiles, names, rng)?;
        debug!(
            tiles = tiles.len(),
            cities = cities.len(),
            "map generated"
        );

        Ok(HexGrid::new(
            tiles.into_iter().map(|(position, tile_type)| Tile::new(position, tile_type)),
            cities,
            self.rules.clone(),
        ))
    }

    fn generate_tiles<R: Rng + ?Sized>(&self, rng: &mut R) -> BTreeMap<TilePosition, TileType> {
        let scale = self.settings.scale.max(1) as usize;
        let mut tiles = BTreeMap::new();
        tiles.insert(TilePosition::ORIGIN, TileType::Plain);

        for _ in 0..10 * scale {
            let start = Self::random_position(&tiles, rng);
            Self::random_walk(&mut tiles, start, TileType::Plain, 3 * scale, rng);
        }
        for _ in 0..4 * scale {
            let start = Self::random_position(&tiles, rng);
            Self::random_walk(&mut tiles, start, TileType::Mountain, scale / 2, rng);
        }
        tiles
    }

    fn random_position<R: Rng + ?Sized>(
        tiles: &BTreeMap<TilePosition, TileType>,
        rng: &mut R,
    ) -> TilePosition {
        tiles
            .keys()
            .nth(rng.gen_range(0..tiles.len()))
            .copied()
            .unwrap_or(TilePosition::ORIGIN)
    }

    fn random_walk<R: Rng + ?Sized>(
        tiles: &mut BTreeMap<TilePosition, TileType>,
        start: TilePosition,
        tile_type: TileType,
        length: usize,
        rng: &mut R,
    ) {
        let mut current = start;
        for _ in 0..length {
            let direction = EdgeDirection::ALL[rng.gen_range(0..EdgeDirection::ALL.len())];
            current = current.neighbour(direction);
            tiles.insert(current, tile_type);
        }
    }

    fn is_near<F>(center: TilePosition, radius: i32, mut predicate: F) -> bool
    where
        F: FnMut(TilePosition) -> bool,
    {
        let mut found = false;
        TilePosition::for_each_spiral(center, radius, |position, _| {
            found = predicate(position);
            found
        });
        found
    }

    fn place_cities<R: Rng + ?Sized>(
        &self,
        tiles: &BTreeMap<TilePosition, TileType>,
        names: &NameGenerator,
        rng: &mut R,
    ) -> GameResult<Vec<City>> {
        let amount = self.rules.number_of_cities;
        let starting_amount = self.rules.number_of_starting_cities;
        let plain_count = tiles.values().filter(|t| **t == TileType::Plain).count();
        if plain_count < amount {
            return Err(GameError::MapGeneration(format!(
                "only {} plain tiles for {} cities",
                plain_count, amount
            )));
        }

        let settings = self.settings;
        let mut cities: BTreeMap<TilePosition, City> = BTreeMap::new();
        let mut used_names: BTreeSet<String> = BTreeSet::new();
        let mut starting_added = 0;
        let mut attempts = 0;

        while cities.len() < amount {
            attempts += 1;
            if attempts > MAX_CITY_ATTEMPTS {
                return Err(GameError::MapGeneration(format!(
                    "placed {} of {} cities",
                    cities.len(),
                    amount
                )));
            }

            let position = Self::random_position(tiles, rng);
            if tiles.get(&position) != Some(&TileType::Plain) || cities.contains_key(&position) {
                continue;
            }

            let mut probability = settings.city_base_probability;
            let at_coast = position
                .neighbours()
                .iter()
                .filter(|p| tiles.contains_key(p))
                .count()
                < 6;
            if at_coast {
                probability = settings.city_at_coast_probability;
            }
            if Self::is_near(position, settings.city_near_mountain_radius, |p| {
                tiles.get(&p) == Some(&TileType::Mountain)
            }) {
                probability = settings.city_near_mountain_probability;
            }
            if Self::is_near(position, settings.city_near_city_radius, |p| {
                cities.contains_key(&p)
            }) {
                probability = settings.city_near_city_probability;
            }

            if rng.gen::<f64>() >= probability {
                continue;
            }

            let mut is_starting_city = false;
            if starting_added < starting_amount
                && (amount - cities.len() <= starting_amount - starting_added || rng.gen_bool(0.5))
            {
                is_starting_city = true;
                starting_added += 1;
            }

            let name = Self::unique_name(names, settings.city_name_length, &used_names, rng);
            used_names.insert(name.clone());
            debug!(%position, %name, is_starting_city, "city placed");
            cities.insert(position, City::new(position, name, is_starting_city));
        }

        Ok(cities.into_values().collect())
    }

    fn unique_name<R: Rng + ?Sized>(
        names: &NameGenerator,
        max_len: usize,
        used: &BTreeSet<String>,
        rng: &mut R,
    ) -> String {
        for _ in 0..NAME_RETRIES {
            if let Some(name) = names.generate(max_len, rng) {
                if !used.contains(&name) {
                    return name;
                }
            }
        }
        format!("Station {}", used.len() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generate(seed: u64) -> HexGrid {
        let settings = MapSettings::default();
        let rules = Rules::default();
        let names = NameGenerator::with_default_names(3);
        let mut rng = StdRng::seed_from_u64(seed);
        MapGenerator::new(&settings, &rules)
            .generate(&names, &mut rng)
            .unwrap()
    }

    #[test]
    fn generates_requested_cities() {
        let grid = generate(7);
        let rules = Rules::default();
        assert_eq!(grid.cities().len(), rules.number_of_cities);
        assert_eq!(grid.starting_cities().len(), rules.number_of_starting_cities);
        for city in grid.cities().values() {
            assert_eq!(
                grid.tile_at(city.position).map(|t| t.tile_type),
                Some(TileType::Plain)
            );
        }
        let names: BTreeSet<_> = grid.cities().values().map(|c| c.name.clone()).collect();
        assert_eq!(names.len(), rules.number_of_cities);
    }

    #[test]
    fn same_seed_same_map() {
        let a = generate(99);
        let b = generate(99);
        assert_eq!(a.tiles(), b.tiles());
        assert_eq!(a.cities(), b.cities());
    }

    #[test]
    fn center_is_always_present() {
        let grid = generate(3);
        assert!(grid.tile_at(TilePosition::ORIGIN).is_some());
    }

    #[test]
    fn too_few_plain_tiles_is_an_error() {
        let settings = MapSettings {
            scale: 1,
            ..MapSettings::default()
        };
        let rules = Rules {
            number_of_cities: 1000,
            ..Rules::default()
        };
        let names = NameGenerator::with_default_names(3);
        let mut rng = StdRng::seed_from_u64(1);
        let result = MapGenerator::new(&settings, &rules).generate(&names, &mut rng);
        assert!(matches!(result, Err(GameError::MapGeneration(_))));
    }
}
