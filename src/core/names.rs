// ============================================================================
// HexRail - 城市名称生成器
// ============================================================================
//
// 文件: src/core/names.rs
// 职责: 基于 n-gram 马尔可夫链的城市名称生成
// 边界:
//   - ✅ 训练 n-gram 统计
//   - ✅ 按权重随机生成名称
//   - ✅ 内置与文件加载的训练数据
//   - ❌ 不应包含城市放置逻辑
//
// ============================================================================

use anyhow::{Context, Result};
use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;

use crate::models::config::MapSettings;

/// 名称开始标记
const START: char = '^';
/// 名称结束标记
const END: char = '$';

/// 默认训练数据
pub const TOWN_NAMES: &[&str] = &[
    "Aachen", "Augsburg", "Bamberg", "Bayreuth", "Bielefeld", "Bochum", "Bonn",
    "Braunschweig", "Bremen", "Chemnitz", "Cottbus", "Darmstadt", "Dessau",
    "Dortmund", "Dresden", "Duisburg", "Erfurt", "Erlangen", "Essen", "Flensburg",
    "Frankfurt", "Freiburg", "Fulda", "Gelsenkirchen", "Gera", "Giessen", "Goslar",
    "Greifswald", "Hagen", "Halle", "Hamburg", "Hameln", "Hannover", "Heidelberg",
    "Heilbronn", "Hildesheim", "Ingolstadt", "Jena", "Kaiserslautern", "Karlsruhe",
    "Kassel", "Kempten", "Kiel", "Koblenz", "Konstanz", "Krefeld", "Landshut",
    "Leipzig", "Leverkusen", "Lindau", "Lübeck", "Ludwigsburg", "Lüneburg",
    "Magdeburg", "Mainz", "Mannheim", "Marburg", "Meissen", "Minden", "Mönchengladbach",
    "Münster", "Naumburg", "Neubrandenburg", "Neuss", "Nürnberg", "Oberhausen",
    "Offenbach", "Oldenburg", "Osnabrück", "Paderborn", "Passau", "Pforzheim",
    "Potsdam", "Regensburg", "Reutlingen", "Rosenheim", "Rostock", "Saarbrücken",
    "Salzgitter", "Schwerin", "Siegen", "Solingen", "Stralsund", "Stuttgart",
    "Trier", "Tübingen", "Ulm", "Weimar", "Wetzlar", "Wiesbaden", "Wismar",
    "Wolfsburg", "Worms", "Wuppertal", "Würzburg", "Zwickau",
];

/// 城市名称使用的 n-gram 阶数
pub const DEFAULT_ORDER: usize = 3;

/// 马尔可夫链名称生成器
#[derive(Debug, Clone)]
pub struct NameGenerator {
    /// n-gram -> (下一个字符 -> 出现次数)
    ngrams: BTreeMap<String, BTreeMap<char, u32>>,
    order: usize,
}

impl NameGenerator {
    /// 使用给定名称训练
    pub fn new<S: AsRef<str>>(names: &[S], order: usize) -> Self {
        let order = order.max(1);
        let mut ngrams: BTreeMap<String, BTreeMap<char, u32>> = BTreeMap::new();

        for name in names {
            let chars: Vec<char> = std::iter::once(START)
                .chain(name.as_ref().trim().to_lowercase().chars())
                .chain(std::iter::once(END))
                .collect();
            for i in order..chars.len() {
                let ngram: String = chars[i - order..i].iter().collect();
                *ngrams.entry(ngram).or_default().entry(chars[i]).or_insert(0) += 1;
            }
        }

        Self { ngrams, order }
    }

    /// 使用内置的德国城镇名称训练
    pub fn with_default_names(order: usize) -> Self {
        Self::new(TOWN_NAMES, order)
    }

    /// 从文件加载名称（每行一个，忽略空行）
    pub fn from_file(path: &Path, order: usize) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read town names from {}", path.display()))?;
        let names: Vec<&str> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        if names.is_empty() {
            anyhow::bail!("no town names in {}", path.display());
        }
        Ok(Self::new(names.as_slice(), order))
    }

    /// 按地图配置选择训练数据：配置了名称文件时使用文件，否则使用内置名称
    pub fn from_settings(settings: &MapSettings) -> Result<Self> {
        match &settings.town_names_file {
            Some(path) => Self::from_file(path, DEFAULT_ORDER),
            None => Ok(Self::with_default_names(DEFAULT_ORDER)),
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// 生成最多 `max_len` 个追加字符的名称
    ///
    /// 训练数据中没有可用的开头时返回 `None`。
    pub fn generate<R: Rng + ?Sized>(&self, max_len: usize, rng: &mut R) -> Option<String> {
        let seeds: Vec<&String> = self
            .ngrams
            .keys()
            .filter(|ngram| ngram.starts_with(START))
            .collect();
        if seeds.is_empty() {
            return None;
        }
        let mut result: Vec<char> = seeds[rng.gen_range(0..seeds.len())].chars().collect();

        for _ in 0..max_len {
            let ngram: String = result[result.len() - self.order..].iter().collect();
            let Some(choices) = self.ngrams.get(&ngram) else {
                break;
            };
            let next = Self::weighted_choice(choices, rng);
            if next == END {
                break;
            }
            result.push(next);
        }

        let mut letters = result.into_iter().filter(|c| *c != START && *c != END);
        let first = letters.next()?;
        Some(first.to_uppercase().chain(letters).collect())
    }

    fn weighted_choice<R: Rng + ?Sized>(choices: &BTreeMap<char, u32>, rng: &mut R) -> char {
        let total: u32 = choices.values().sum();
        let mut pick = rng.gen_range(0..total.max(1));
        for (character, weight) in choices {
            if pick < *weight {
                return *character;
            }
            pick -= weight;
        }
        choices.keys().next_back().copied().unwrap_or(END)
    }
}
