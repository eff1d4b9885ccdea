use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::{Catalog, Category, GameDescriptor, GameId};
use crate::error::ArcadeError;
use crate::manager::{GameManager, OpenOutcome};
use crate::scores::ScoreTable;

pub const NO_MATCHES_TEXT: &str = "No games found. Try a different search or filter.";

/// Category selector value: `all` or one exact category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, category: Category) -> bool {
        match self {
            Self::All => true,
            Self::Only(c) => c == category,
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = ArcadeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse::<Category>()
            .map(Self::Only)
            .map_err(|_| ArcadeError::UnknownCategory(s.to_string()))
    }
}

/// One rendered dashboard tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    pub id: GameId,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub icon: String,
    pub locked: bool,
    /// Best score, only when above zero.
    pub high_score: Option<u32>,
    pub clickable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub search: String,
    pub category: String,
    pub tiles: Vec<Tile>,
    pub empty_message: Option<&'static str>,
}

/// Searchable, filterable grid over the catalog.
#[derive(Debug, Clone)]
pub struct Dashboard {
    catalog: Arc<Catalog>,
    search: String,
    category: CategoryFilter,
}

impl Dashboard {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            search: String::new(),
            category: CategoryFilter::All,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn set_category(&mut self, filter: CategoryFilter) {
        self.category = filter;
    }

    /// Case-insensitive substring match on name or description, combined with
    /// the category filter.
    pub fn matches(&self, game: &GameDescriptor) -> bool {
        if !self.category.matches(game.category) {
            return false;
        }
        let needle = self.search.to_lowercase();
        needle.is_empty()
            || game.name.to_lowercase().contains(&needle)
            || game.description.to_lowercase().contains(&needle)
    }

    /// Matching entries in catalog order.
    pub fn visible(&self) -> impl Iterator<Item = &GameDescriptor> + '_ {
        self.catalog.entries().iter().filter(|g| self.matches(g))
    }

    pub fn render(&self, scores: &ScoreTable) -> DashboardView {
        let tiles: Vec<Tile> = self
            .visible()
            .map(|game| {
                let best = scores.get(game.id);
                Tile {
                    id: game.id,
                    name: game.name.clone(),
                    description: game.description.clone(),
                    category: game.category,
                    icon: game.icon.clone(),
                    locked: !game.implemented,
                    high_score: (best > 0).then_some(best),
                    clickable: game.implemented,
                }
            })
            .collect();
        DashboardView {
            search: self.search.clone(),
            category: match self.category {
                CategoryFilter::All => "all".to_string(),
                CategoryFilter::Only(c) => c.to_string(),
            },
            empty_message: tiles.is_empty().then_some(NO_MATCHES_TEXT),
            tiles,
        }
    }

    /// Open the tile `id` in `manager`. Locked and hidden tiles are inert.
    pub fn activate(&self, id: GameId, manager: &mut GameManager) -> Option<OpenOutcome> {
        let game = self.visible().find(|g| g.id == id)?;
        if !game.implemented {
            tracing::debug!(game = %id, "Ignoring click on locked tile");
            return None;
        }
        Some(manager.open_game(id))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::test_helpers::test_manager;

    fn dashboard() -> Dashboard {
        Dashboard::new(Arc::new(Catalog::builtin()))
    }

    fn visible_ids(dashboard: &Dashboard) -> Vec<u32> {
        dashboard.visible().map(|g| g.id.0).collect()
    }

    #[test]
    fn initial_render_shows_everything() {
        let d = dashboard();
        let view = d.render(&ScoreTable::new());
        assert_eq!(view.tiles.len(), Catalog::builtin().len());
        assert_eq!(view.empty_message, None);
        assert_eq!(view.category, "all");
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let mut d = dashboard();
        d.set_search("SNAKE");
        assert_eq!(visible_ids(&d), vec![1]);

        d.set_search("secret number");
        assert_eq!(visible_ids(&d), vec![94]);
    }

    #[test]
    fn category_and_search_combine() {
        let mut d = dashboard();
        d.set_category("luck".parse().unwrap());
        assert_eq!(visible_ids(&d), vec![92, 93, 95]);
        d.set_search("coin");
        assert_eq!(visible_ids(&d), vec![92]);
    }

    #[test]
    fn no_matches_shows_message() {
        let mut d = dashboard();
        d.set_search("zzzz");
        let view = d.render(&ScoreTable::new());
        assert!(view.tiles.is_empty());
        assert_eq!(view.empty_message, Some(NO_MATCHES_TEXT));
    }

    #[test]
    fn tiles_show_positive_high_scores_and_locks() {
        let mut scores = ScoreTable::new();
        scores.record(GameId(94), 850);
        let view = dashboard().render(&scores);

        let guess = view.tiles.iter().find(|t| t.id == GameId(94)).unwrap();
        assert_eq!(guess.high_score, Some(850));
        assert!(guess.clickable && !guess.locked);

        let snake = view.tiles.iter().find(|t| t.id == GameId(1)).unwrap();
        assert_eq!(snake.high_score, None);

        let tetris = view.tiles.iter().find(|t| t.id == GameId(2)).unwrap();
        assert!(tetris.locked && !tetris.clickable);
    }

    #[test]
    fn unknown_category_is_rejected() {
        assert_eq!(
            "racing".parse::<CategoryFilter>(),
            Err(ArcadeError::UnknownCategory("racing".to_string()))
        );
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
    }

    #[test]
    fn activate_opens_only_visible_implemented_tiles() {
        let mut manager = test_manager(&[1, 21]);
        let mut d = dashboard();

        assert_eq!(d.activate(GameId(2), &mut manager), None);
        assert!(manager.take_notices().is_empty());

        d.set_search("tic");
        assert_eq!(d.activate(GameId(1), &mut manager), None);
        assert!(!manager.is_open());

        assert_eq!(d.activate(GameId(21), &mut manager), Some(OpenOutcome::Started));
        assert_eq!(manager.current_game().map(|g| g.id), Some(GameId(21)));
    }

    proptest! {
        #[test]
        fn visible_is_exactly_the_matching_entries(
            search in "[a-zA-Z ]{0,4}",
            category in prop::option::of(0usize..6),
        ) {
            let mut d = dashboard();
            d.set_search(search.clone());
            let filter = category.map_or(CategoryFilter::All, |i| CategoryFilter::Only(Category::ALL[i]));
            d.set_category(filter);

            let needle = search.to_lowercase();
            let expected: Vec<u32> = Catalog::builtin()
                .entries()
                .iter()
                .filter(|g| filter.matches(g.category))
                .filter(|g| {
                    g.name.to_lowercase().contains(&needle)
                        || g.description.to_lowercase().contains(&needle)
                })
                .map(|g| g.id.0)
                .collect();
            prop_assert_eq!(visible_ids(&d), expected);
        }
    }
}
