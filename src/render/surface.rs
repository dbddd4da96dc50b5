use std::collections::BTreeMap;

/// Visual marker a cell can carry. A cell shows at most one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    Snake,
    Fruit,
}

/// Addressable grid of cells, keyed by `row * grid_size + col`
pub trait Surface {
    fn add_marker(&mut self, cell_id: usize, marker: Marker);
    fn remove_marker(&mut self, cell_id: usize, marker: Marker);
    /// Page-level "game over" indicator
    fn set_game_over(&mut self, over: bool);
    /// Drop every marker and the game-over indicator
    fn clear(&mut self);
}

/// In-memory surface, drawn by the terminal front end. Only marked cells
/// are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSurface {
    size: usize,
    cells: BTreeMap<usize, Marker>,
    game_over: bool,
}

impl GridSurface {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            cells: BTreeMap::new(),
            game_over: false,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    fn contains_id(&self, cell_id: usize) -> bool {
        // A cell count past usize::MAX cannot be exceeded by any id
        self.size
            .checked_mul(self.size)
            .map_or(true, |count| cell_id < count)
    }

    pub fn marker_at(&self, cell_id: usize) -> Option<Marker> {
        self.cells.get(&cell_id).copied()
    }

    /// Ids of every cell carrying `marker`, ascending
    pub fn cells_with(&self, marker: Marker) -> Vec<usize> {
        self.cells
            .iter()
            .filter(|(_, m)| **m == marker)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
}

impl Surface for GridSurface {
    fn add_marker(&mut self, cell_id: usize, marker: Marker) {
        if self.contains_id(cell_id) {
            self.cells.insert(cell_id, marker);
        }
    }

    fn remove_marker(&mut self, cell_id: usize, marker: Marker) {
        if self.cells.get(&cell_id) == Some(&marker) {
            self.cells.remove(&cell_id);
        }
    }

    fn set_game_over(&mut self, over: bool) {
        self.game_over = over;
    }

    fn clear(&mut self) {
        self.cells.clear();
        self.game_over = false;
    }
}
