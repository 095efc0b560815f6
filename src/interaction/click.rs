use crate::scene::ObjectId;

/// How a primary click was classified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickKind {
    Single,
    Double,
}

/// Double-click disambiguation.
///
/// A click counts as double when it lands on the same object as the previous
/// click within the window. Classifying a double forgets the remembered click,
/// so a third rapid click starts over as a single.
#[derive(Debug, Clone)]
pub struct ClickClassifier {
    window: f64,
    last: Option<(ObjectId, f64)>,
}

impl ClickClassifier {
    pub fn new(window: f64) -> Self {
        Self { window, last: None }
    }

    /// Classifies a click on `object` at `now` (seconds)
    pub fn classify(&mut self, object: ObjectId, now: f64) -> ClickKind {
        match self.last {
            Some((previous, at)) if previous == object && now - at < self.window => {
                self.last = None;
                ClickKind::Double
            }
            _ => {
                self.last = Some((object, now));
                ClickKind::Single
            }
        }
    }

    pub fn window(&self) -> f64 {
        self.window
    }

    /// The remembered `(object, timestamp)` pair, if any
    pub fn last_click(&self) -> Option<(ObjectId, f64)> {
        self.last
    }

    pub fn forget(&mut self) {
        self.last = None;
    }
}
