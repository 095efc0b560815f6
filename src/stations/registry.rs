use std::collections::HashMap;

use crate::error::{InteractionError, InteractionResult};
use crate::scene::ObjectId;

use super::flat_book::FlatStackedBook;
use super::shelved_book::BookState;
use super::traits::{Category, Interactable};
use super::Station;

/// Every activated station, kept in registration order.
///
/// Registration order is what the global stack reflow scans, so it must stay
/// stable across removals.
#[derive(Debug, Default)]
pub struct StationRegistry {
    order: Vec<ObjectId>,
    stations: HashMap<ObjectId, Station>,
}

impl StationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, station: Station) -> InteractionResult {
        let id = station.id();
        if self.stations.contains_key(&id) {
            return Err(InteractionError::AlreadyRegistered(id));
        }
        log::debug!("registered {} {id}", station.category().name());
        self.order.push(id);
        self.stations.insert(id, station);
        Ok(())
    }

    pub fn deregister(&mut self, id: ObjectId) -> Option<Station> {
        let station = self.stations.remove(&id)?;
        self.order.retain(|other| *other != id);
        log::debug!("deregistered {} {id}", station.category().name());
        Some(station)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Station> {
        self.stations.get(&id)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Station> {
        self.stations.get_mut(&id)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.stations.contains_key(&id)
    }

    pub fn category_of(&self, id: ObjectId) -> Option<Category> {
        self.get(id).map(Station::category)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Stations in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Station> {
        self.order.iter().filter_map(|id| self.stations.get(id))
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.order
    }

    /// Flat books in registration order
    pub fn flat_books(&self) -> impl Iterator<Item = &FlatStackedBook> {
        self.iter().filter_map(Station::as_flat_book)
    }

    /// The shelved book currently being read, if any
    pub fn reading_book(&self) -> Option<ObjectId> {
        self.iter()
            .filter_map(Station::as_shelved_book)
            .find(|book| book.is_reading())
            .map(|book| book.id())
    }

    /// The shelved book off the shelf and headed for or held at the reading
    /// anchor, if any
    pub fn book_in_hand(&self) -> Option<ObjectId> {
        self.iter()
            .filter_map(Station::as_shelved_book)
            .find(|book| matches!(book.state(), BookState::PullingOut | BookState::Reading { .. }))
            .map(|book| book.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::EffectCategory;
    use crate::stacking::StackSide;
    use crate::stations::ScentDispenser;

    fn flat(id: u64) -> Station {
        Station::FlatBook(FlatStackedBook::new(ObjectId(id), StackSide::Shelf))
    }

    #[test]
    fn keeps_registration_order_across_removal() {
        let mut registry = StationRegistry::new();
        for id in [5, 2, 9, 1] {
            registry.register(flat(id)).unwrap();
        }
        registry
            .register(Station::Dispenser(ScentDispenser::new(
                ObjectId(3),
                EffectCategory::new("pine"),
            )))
            .unwrap();
        registry.deregister(ObjectId(9));

        let order: Vec<u64> = registry.flat_books().map(|b| b.id().0).collect();
        assert_eq!(order, vec![5, 2, 1]);
        assert_eq!(registry.len(), 4);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = StationRegistry::new();
        registry.register(flat(1)).unwrap();
        assert_eq!(
            registry.register(flat(1)),
            Err(InteractionError::AlreadyRegistered(ObjectId(1)))
        );
        assert_eq!(registry.len(), 1);
    }
}
