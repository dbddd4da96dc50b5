use std::collections::HashSet;

use super::surface::{Marker, Surface};
use crate::game::Cell;

/// Applies the difference between two snake positions to a [`Surface`]
///
/// Remembers only where it last drew the fruit, so it can move the marker.
pub struct Renderer {
    grid_size: usize,
    drawn_fruit: Option<Cell>,
}

impl Renderer {
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            drawn_fruit: None,
        }
    }

    pub fn render<U: Surface + ?Sized>(
        &mut self,
        surface: &mut U,
        previous: &HashSet<Cell>,
        current: &HashSet<Cell>,
        fruit: Cell,
    ) {
        for cell in previous.difference(current) {
            if let Some(id) = cell.id(self.grid_size) {
                surface.remove_marker(id, Marker::Snake);
            }
        }

        if let Some(id) = self.drawn_fruit.and_then(|f| f.id(self.grid_size)) {
            surface.remove_marker(id, Marker::Fruit);
        }
        if let Some(id) = fruit.id(self.grid_size) {
            surface.add_marker(id, Marker::Fruit);
        }
        self.drawn_fruit = Some(fruit);

        for cell in current {
            if let Some(id) = cell.id(self.grid_size) {
                surface.add_marker(id, Marker::Snake);
            }
        }
    }
}
