use crate::config::BingoConfig;

/// Which cells are marked. The free cell is always selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionGrid {
    size: usize,
    free: usize,
    cells: Vec<bool>,
}

impl SelectionGrid {
    pub fn new(size: usize) -> Self {
        let count = size * size;
        let free = count / 2;
        let mut cells = vec![false; count];
        if let Some(cell) = cells.get_mut(free) {
            *cell = true;
        }
        Self { size, free, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn free_index(&self) -> usize {
        self.free
    }

    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.cells.get(index).copied().unwrap_or(false)
    }

    /// Flip a cell. Returns the new state, or `None` for the free cell and
    /// out-of-range indices, which cannot be toggled.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if index == self.free {
            return None;
        }
        let cell = self.cells.get_mut(index)?;
        *cell = !*cell;
        Some(*cell)
    }

    pub fn clear(&mut self) {
        for (idx, cell) in self.cells.iter_mut().enumerate() {
            *cell = idx == self.free;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

#[derive(Debug, Clone)]
pub struct Board {
    labels: Vec<String>,
    selection: SelectionGrid,
}

impl Board {
    /// Lay out a freshly shuffled card. The config must already be
    /// validated so there are enough terms for every non-free cell.
    pub fn shuffled(config: &BingoConfig, rng: &mut fastrand::Rng) -> Self {
        let selection = SelectionGrid::new(config.grid_size);
        let labels = Self::layout(config, selection.free_index(), rng);
        tracing::info!(grid_size = config.grid_size, "new card dealt");
        Self { labels, selection }
    }

    pub fn reshuffle(&mut self, config: &BingoConfig, rng: &mut fastrand::Rng) {
        *self = Self::shuffled(config, rng);
    }

    fn layout(config: &BingoConfig, free: usize, rng: &mut fastrand::Rng) -> Vec<String> {
        let mut terms = config.terms.clone();
        rng.shuffle(&mut terms);
        let mut terms = terms.into_iter();

        (0..config.cell_count())
            .map(|idx| {
                if idx == free {
                    config.free_space_text.clone()
                } else {
                    terms.next().unwrap_or_default()
                }
            })
            .collect()
    }

    pub fn size(&self) -> usize {
        self.selection.size()
    }

    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map_or("", String::as_str)
    }

    pub fn is_free(&self, index: usize) -> bool {
        index == self.selection.free_index()
    }

    pub fn selection(&self) -> &SelectionGrid {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut SelectionGrid {
        &mut self.selection
    }

    /// B I N G O over a five-wide card, column numbers otherwise.
    pub fn column_headers(&self) -> Vec<String> {
        if self.size() == 5 {
            "BINGO".chars().map(String::from).collect()
        } else {
            (1..=self.size()).map(|c| c.to_string()).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_free_cell_is_centre_and_fixed() {
        let mut grid = SelectionGrid::new(5);
        assert_eq!(grid.free_index(), 12);
        assert!(grid.is_selected(12));
        assert_eq!(grid.toggle(12), None);
        assert!(grid.is_selected(12));
        assert_eq!(grid.selected_count(), 1);
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut grid = SelectionGrid::new(5);
        assert_eq!(grid.toggle(0), Some(true));
        assert_eq!(grid.toggle(3), Some(true));
        assert_eq!(grid.toggle(0), Some(false));
        assert_eq!(grid.toggle(99), None);
        assert_eq!(grid.selected_count(), 2);

        grid.clear();
        assert_eq!(grid.selected_count(), 1);
        assert!(grid.is_selected(12));
    }

    #[test]
    fn test_board_uses_distinct_terms() {
        let config = BingoConfig::default();
        let mut rng = fastrand::Rng::with_seed(9);
        let board = Board::shuffled(&config, &mut rng);

        assert_eq!(board.label(12), config.free_space_text);
        assert!(board.is_free(12));

        let labels: HashSet<&str> = (0..25).filter(|&i| i != 12).map(|i| board.label(i)).collect();
        assert_eq!(labels.len(), 24);
        assert!(labels.iter().all(|l| config.terms.iter().any(|t| t == l)));
    }

    #[test]
    fn test_reshuffle_resets_selection() {
        let config = BingoConfig::default();
        let mut rng = fastrand::Rng::with_seed(10);
        let mut board = Board::shuffled(&config, &mut rng);
        board.selection_mut().toggle(0);
        board.reshuffle(&config, &mut rng);
        assert_eq!(board.selection().selected_count(), 1);
    }

    #[test]
    fn test_column_headers() {
        let config = BingoConfig::default();
        let mut rng = fastrand::Rng::with_seed(11);
        let board = Board::shuffled(&config, &mut rng);
        assert_eq!(board.column_headers(), vec!["B", "I", "N", "G", "O"]);

        let small = BingoConfig {
            grid_size: 3,
            ..BingoConfig::default()
        };
        let board = Board::shuffled(&small, &mut rng);
        assert_eq!(board.column_headers(), vec!["1", "2", "3"]);
        assert_eq!(board.label(4), small.free_space_text);
    }
}
