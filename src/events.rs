//! Outbound notifications.
//!
//! The engine never calls into audio, lighting, UI or narrative systems
//! directly. It records what happened as [`EngineEvent`]s; the host drains the
//! queue once per tick and forwards each event to whoever cares.

use crate::definitions::EffectCategory;
use crate::interaction::ClickKind;
use crate::scene::ObjectId;
use crate::stacking::StackSide;

/// One-shot sounds requested by the state machines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioCue {
    BookPullOut,
    BookPutBack,
    PageTurn,
    DrawerOpen,
    DrawerClose,
    Spray,
    StackShuffle,
    FocusLift,
    FocusSettle,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    HoverEntered(ObjectId),
    HoverExited(ObjectId),
    Clicked {
        object: ObjectId,
        kind: ClickKind,
    },
    PlayClip {
        cue: AudioCue,
        source: ObjectId,
    },
    /// The reading surface replaced the book's solid model
    ReadingOpened {
        book: ObjectId,
        spread: usize,
    },
    SpreadChanged {
        book: ObjectId,
        spread: usize,
    },
    ReadingClosed {
        book: ObjectId,
    },
    /// A spread flagged as hiding an item was entered
    PageViewed {
        book: ObjectId,
        spread: usize,
    },
    DrawerContentsShown {
        drawer: ObjectId,
        visible: bool,
    },
    ParticleBurst {
        source: ObjectId,
        effect: EffectCategory,
    },
    /// Influence weight for an ambient source (0 = off, 1 = full)
    InfluenceChanged {
        source: ObjectId,
        effect: EffectCategory,
        value: f32,
    },
    StackSideChanged {
        object: ObjectId,
        side: StackSide,
    },
    FocusStarted {
        object: ObjectId,
    },
    FocusPanelShown {
        object: ObjectId,
        title: String,
        description: String,
    },
    FocusPanelHidden {
        object: ObjectId,
    },
    FocusEnded {
        object: ObjectId,
    },
}

/// FIFO of engine events awaiting the host
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<EngineEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: EngineEvent) {
        log::trace!("event: {event:?}");
        self.events.push(event);
    }

    pub fn play(&mut self, cue: AudioCue, source: ObjectId) {
        self.push(EngineEvent::PlayClip { cue, source });
    }

    /// Takes everything queued so far
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EngineEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
