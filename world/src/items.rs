//! Collectible and hazard slots tracked by the world.

use snake_arcade_core::{CellCoord, ItemKind};

/// Slot for an item that exists at most once on the playfield.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Item {
    kind: ItemKind,
    cell: Option<CellCoord>,
}

impl Item {
    pub(crate) const fn new(kind: ItemKind) -> Self {
        Self { kind, cell: None }
    }

    pub(crate) const fn kind(&self) -> ItemKind {
        self.kind
    }

    pub(crate) const fn cell(&self) -> Option<CellCoord> {
        self.cell
    }

    pub(crate) const fn is_active(&self) -> bool {
        self.cell.is_some()
    }

    pub(crate) fn is_at(&self, cell: CellCoord) -> bool {
        self.cell == Some(cell)
    }

    /// Moves the item to `cell`, activating it if needed.
    pub(crate) fn activate(&mut self, cell: CellCoord) {
        self.cell = Some(cell);
    }

    /// Removes the item from the playfield, returning where it was.
    pub(crate) fn deactivate(&mut self) -> Option<CellCoord> {
        self.cell.take()
    }
}

/// Singleton item slots in collision resolution order.
#[derive(Clone, Debug)]
pub(crate) struct ItemSlots {
    apple: Item,
    cookie: Item,
    banana: Item,
    star: Item,
}

impl ItemSlots {
    pub(crate) const fn new() -> Self {
        Self {
            apple: Item::new(ItemKind::Apple),
            cookie: Item::new(ItemKind::Cookie),
            banana: Item::new(ItemKind::Banana),
            star: Item::new(ItemKind::Star),
        }
    }

    pub(crate) fn get(&self, kind: ItemKind) -> Option<&Item> {
        match kind {
            ItemKind::Apple => Some(&self.apple),
            ItemKind::Cookie => Some(&self.cookie),
            ItemKind::Banana => Some(&self.banana),
            ItemKind::Star => Some(&self.star),
            ItemKind::Bomb => None,
        }
    }

    pub(crate) fn get_mut(&mut self, kind: ItemKind) -> Option<&mut Item> {
        match kind {
            ItemKind::Apple => Some(&mut self.apple),
            ItemKind::Cookie => Some(&mut self.cookie),
            ItemKind::Banana => Some(&mut self.banana),
            ItemKind::Star => Some(&mut self.star),
            ItemKind::Bomb => None,
        }
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Item> {
        [&self.apple, &self.cookie, &self.banana, &self.star].into_iter()
    }

    pub(crate) fn clear(&mut self) {
        for item in [
            &mut self.apple,
            &mut self.cookie,
            &mut self.banana,
            &mut self.star,
        ] {
            let _ = item.deactivate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_toggles_between_active_and_inactive() {
        let mut item = Item::new(ItemKind::Cookie);
        assert!(!item.is_active());

        item.activate(CellCoord::new(2, 3));
        assert!(item.is_at(CellCoord::new(2, 3)));
        assert_eq!(item.deactivate(), Some(CellCoord::new(2, 3)));
        assert_eq!(item.cell(), None);
    }

    #[test]
    fn slots_hold_singletons_only() {
        let mut slots = ItemSlots::new();
        assert!(slots.get(ItemKind::Bomb).is_none());
        assert!(slots.get_mut(ItemKind::Bomb).is_none());

        if let Some(star) = slots.get_mut(ItemKind::Star) {
            star.activate(CellCoord::new(0, 0));
        }
        let active: Vec<_> = slots
            .iter()
            .filter(|item| item.is_active())
            .map(Item::kind)
            .collect();
        assert_eq!(active, vec![ItemKind::Star]);

        slots.clear();
        assert!(slots.iter().all(|item| !item.is_active()));
    }
}
