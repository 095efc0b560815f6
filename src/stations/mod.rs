//! # Stations
//!
//! One state machine per category of interactive object:
//!
//! - [`ShelvedBook`]: pull out to the reading anchor, page through, put back
//! - [`Drawer`]: slide open along its outward axis, reveal contents, close
//! - [`ScentDispenser`]: fire a burst and claim its ambient effect
//! - [`FlatStackedBook`]: switch between the shelf and display piles
//!
//! Each implements [`Interactable`], the small capability interface the
//! dispatcher talks to. The registry stores them as a [`Station`] and
//! dispatches by tag.

pub mod drawer;
pub mod flat_book;
pub mod registry;
pub mod scent_dispenser;
pub mod shelved_book;
pub mod traits;

pub use drawer::{Drawer, DrawerState};
pub use flat_book::{FlatBookState, FlatStackedBook};
pub use registry::StationRegistry;
pub use scent_dispenser::ScentDispenser;
pub use shelved_book::{BookState, ShelvedBook};
pub use traits::{brighten, clear_hover_cue, lift, nudge_toward_viewer, Category, Interactable};

use crate::scene::ObjectId;

/// A registered station, tagged by category
#[derive(Debug, Clone)]
pub enum Station {
    ShelvedBook(ShelvedBook),
    Drawer(Drawer),
    Dispenser(ScentDispenser),
    FlatBook(FlatStackedBook),
}

impl Station {
    pub fn interactable(&self) -> &dyn Interactable {
        match self {
            Station::ShelvedBook(book) => book,
            Station::Drawer(drawer) => drawer,
            Station::Dispenser(dispenser) => dispenser,
            Station::FlatBook(book) => book,
        }
    }

    pub fn interactable_mut(&mut self) -> &mut dyn Interactable {
        match self {
            Station::ShelvedBook(book) => book,
            Station::Drawer(drawer) => drawer,
            Station::Dispenser(dispenser) => dispenser,
            Station::FlatBook(book) => book,
        }
    }

    pub fn id(&self) -> ObjectId {
        self.interactable().id()
    }

    pub fn category(&self) -> Category {
        self.interactable().category()
    }

    pub fn state_name(&self) -> &'static str {
        self.interactable().state_name()
    }

    pub fn as_shelved_book(&self) -> Option<&ShelvedBook> {
        match self {
            Station::ShelvedBook(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_shelved_book_mut(&mut self) -> Option<&mut ShelvedBook> {
        match self {
            Station::ShelvedBook(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_drawer(&self) -> Option<&Drawer> {
        match self {
            Station::Drawer(drawer) => Some(drawer),
            _ => None,
        }
    }

    pub fn as_drawer_mut(&mut self) -> Option<&mut Drawer> {
        match self {
            Station::Drawer(drawer) => Some(drawer),
            _ => None,
        }
    }

    pub fn as_dispenser(&self) -> Option<&ScentDispenser> {
        match self {
            Station::Dispenser(dispenser) => Some(dispenser),
            _ => None,
        }
    }

    pub fn as_dispenser_mut(&mut self) -> Option<&mut ScentDispenser> {
        match self {
            Station::Dispenser(dispenser) => Some(dispenser),
            _ => None,
        }
    }

    pub fn as_flat_book(&self) -> Option<&FlatStackedBook> {
        match self {
            Station::FlatBook(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_flat_book_mut(&mut self) -> Option<&mut FlatStackedBook> {
        match self {
            Station::FlatBook(book) => Some(book),
            _ => None,
        }
    }
}
