use duskfall_system_raycasting::ColumnHit;

use crate::SpriteDraw;

/// Single entry of the painter-ordered draw list.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawItem {
    /// Textured wall slice for one screen column.
    Wall(ColumnHit),
    /// Projected sprite.
    Sprite(SpriteDraw),
}

impl DrawItem {
    /// Distance along the view axis used for ordering.
    #[must_use]
    pub fn depth(&self) -> f32 {
        match self {
            Self::Wall(hit) => hit.distance,
            Self::Sprite(draw) => draw.depth,
        }
    }
}

/// Merges wall columns and sprites into one back-to-front draw list.
///
/// Columns whose ray struck nothing are skipped. The sort is stable and
/// walls are inserted before sprites, so at equal depth walls are drawn
/// first and sprites keep their incoming order.
#[must_use]
pub fn compose(walls: &[ColumnHit], sprites: &[SpriteDraw]) -> Vec<DrawItem> {
    let mut items: Vec<DrawItem> = walls
        .iter()
        .filter(|hit| hit.is_hit())
        .copied()
        .map(DrawItem::Wall)
        .chain(sprites.iter().copied().map(DrawItem::Sprite))
        .collect();
    items.sort_by(|a, b| b.depth().total_cmp(&a.depth()));
    items
}
