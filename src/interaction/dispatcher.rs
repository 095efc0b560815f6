// src/interaction/dispatcher.rs
use crate::camera::Viewpoint;
use crate::events::EngineEvent;
use crate::picking::ObjectPicker;
use crate::scene::ObjectId;
use crate::stations::{clear_hover_cue, Category, StationRegistry};

use super::click::{ClickClassifier, ClickKind};
use super::context::InteractionContext;

/// The one hovered object, if any, with its category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverSession {
    current: Option<(ObjectId, Category)>,
}

impl HoverSession {
    pub fn current(&self) -> Option<ObjectId> {
        self.current.map(|(id, _)| id)
    }

    pub fn category(&self) -> Option<Category> {
        self.current.map(|(_, category)| category)
    }

    pub fn is_hovering(&self, id: ObjectId) -> bool {
        self.current() == Some(id)
    }
}

/// A flat-book single click waiting to see whether a second click follows
#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingClick {
    object: ObjectId,
    at: f64,
}

/// Per-tick pointer resolution: hover exclusivity, click classification and
/// routing to the owning station.
///
/// The dispatcher owns the hover/click session outright. Stations only see
/// the [`Interactable`](crate::stations::Interactable) hooks.
#[derive(Debug)]
pub struct InteractionDispatcher {
    hover: HoverSession,
    clicks: ClickClassifier,
    picker: ObjectPicker,
    pending: Option<PendingClick>,
}

impl InteractionDispatcher {
    pub fn new(double_click_window: f64) -> Self {
        Self {
            hover: HoverSession::default(),
            clicks: ClickClassifier::new(double_click_window),
            picker: ObjectPicker::new(),
            pending: None,
        }
    }

    pub fn hover(&self) -> &HoverSession {
        &self.hover
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.hover.current()
    }

    pub fn clicks(&self) -> &ClickClassifier {
        &self.clicks
    }

    pub fn has_pending_click(&self) -> bool {
        self.pending.is_some()
    }

    /// Casts the pointer ray and moves hover to whatever it lands on.
    ///
    /// Without a viewpoint the tick is skipped and hover is left alone. The
    /// object under `blocked` (the focused object) is never hovered.
    pub fn update_hover(
        &mut self,
        pointer: Option<(f32, f32)>,
        viewpoint: Option<&Viewpoint>,
        blocked: Option<ObjectId>,
        stations: &mut StationRegistry,
        ctx: &mut InteractionContext<'_>,
    ) {
        let Some(viewpoint) = viewpoint else {
            return;
        };
        let hit = pointer.and_then(|pos| {
            let ray = self.picker.screen_to_ray(pos, viewpoint);
            self.picker.pick(
                &ray,
                ctx.config.picking.max_distance,
                Category::interactable_layers(),
                ctx.scene,
            )
        });

        let target = hit.and_then(|hit| {
            let station = stations.get(hit.object)?;
            let hoverable = station.interactable().is_hoverable() && blocked != Some(hit.object);
            hoverable.then(|| (hit.object, station.category()))
        });
        self.set_hover(target, stations, ctx);
    }

    /// Exits the previous hover before entering the new one. Hovering the
    /// same object again is a no-op.
    pub fn set_hover(
        &mut self,
        target: Option<(ObjectId, Category)>,
        stations: &mut StationRegistry,
        ctx: &mut InteractionContext<'_>,
    ) {
        if self.hover.current == target {
            return;
        }
        if let Some((previous, _)) = self.hover.current.take() {
            match stations.get_mut(previous) {
                Some(station) => station.interactable_mut().on_hover_exit(ctx),
                None => clear_hover_cue(previous, ctx),
            }
            ctx.events.push(EngineEvent::HoverExited(previous));
        }
        if let Some((next, category)) = target {
            if let Some(station) = stations.get_mut(next) {
                station.interactable_mut().on_hover_enter(ctx);
                self.hover.current = Some((next, category));
                ctx.events.push(EngineEvent::HoverEntered(next));
            }
        }
    }

    pub fn clear_hover(&mut self, stations: &mut StationRegistry, ctx: &mut InteractionContext<'_>) {
        self.set_hover(None, stations, ctx);
    }

    /// Handles a primary-click edge at time `now`.
    ///
    /// Returns the classified click, or `None` when nothing was hovered.
    /// Hover is exclusive, so the hovered object is the only one that can
    /// receive the click.
    pub fn handle_click(
        &mut self,
        now: f64,
        stations: &mut StationRegistry,
        ctx: &mut InteractionContext<'_>,
    ) -> Option<ClickKind> {
        let (object, category) = self.hover.current?;

        // a click anywhere else settles a waiting toggle right away
        if let Some(pending) = self.pending {
            if pending.object != object {
                self.pending = None;
                Self::route(pending.object, ClickKind::Single, stations, ctx);
            }
        }

        let kind = self.clicks.classify(object, now);
        ctx.events.push(EngineEvent::Clicked { object, kind });

        match (category, kind) {
            (Category::FlatStackedBook, ClickKind::Single) => {
                self.pending = Some(PendingClick { object, at: now });
            }
            (Category::FlatStackedBook, ClickKind::Double) => {
                self.pending = None;
                Self::route(object, kind, stations, ctx);
            }
            _ => Self::route(object, kind, stations, ctx),
        }
        Some(kind)
    }

    /// Delivers a deferred single click once the double-click window has
    /// passed without a second click
    pub fn flush_pending(
        &mut self,
        now: f64,
        stations: &mut StationRegistry,
        ctx: &mut InteractionContext<'_>,
    ) {
        let Some(pending) = self.pending else {
            return;
        };
        if now - pending.at >= self.clicks.window() {
            self.pending = None;
            Self::route(pending.object, ClickKind::Single, stations, ctx);
        }
    }

    /// Drops everything the session remembers about `id`
    pub fn release(&mut self, id: ObjectId, stations: &mut StationRegistry, ctx: &mut InteractionContext<'_>) {
        if self.hover.is_hovering(id) {
            self.clear_hover(stations, ctx);
        }
        if self.pending.is_some_and(|p| p.object == id) {
            self.pending = None;
        }
        if self.clicks.last_click().is_some_and(|(last, _)| last == id) {
            self.clicks.forget();
        }
    }

    fn route(
        object: ObjectId,
        kind: ClickKind,
        stations: &mut StationRegistry,
        ctx: &mut InteractionContext<'_>,
    ) {
        let Some(station) = stations.get_mut(object) else {
            log::debug!("click on {object} dropped: no longer registered");
            return;
        };
        if let Err(err) = station.interactable_mut().on_primary_click(kind, ctx) {
            log::debug!("{kind:?} click ignored: {err}");
        }
    }
}
