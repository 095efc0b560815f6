//! # Station Engine
//!
//! Owns every subsystem and runs them in a fixed order once per tick:
//!
//! 1. advance transitions and hand completions back to their owners
//! 2. update idle sway (after transitions, so it can see who owns a pose)
//! 3. resolve input: focus exit, reading navigation, hover, clicks
//! 4. service the follow-up requests the state machines raised
//!
//! Everything is single threaded. Hosts call [`StationEngine::tick`] from
//! their frame loop and drain [`EngineEvent`]s afterwards.

use std::collections::HashMap;

use cgmath::Vector3;
use winit::event::DeviceEvent;

use crate::animation::{PoseTarget, TransitionScheduler, TransitionTag};
use crate::camera::{LookController, Viewpoint};
use crate::config::EngineConfig;
use crate::definitions::{DefinitionRegistry, EffectCategory};
use crate::error::{ConfigError, InteractionError, InteractionResult};
use crate::events::{EngineEvent, EventQueue};
use crate::focus::FocusFlow;
use crate::idle::{IdleMotion, IdleSway};
use crate::input::InputFrame;
use crate::interaction::{InteractionContext, InteractionDispatcher, Request};
use crate::math::Pose;
use crate::persistence::PlacementSnapshot;
use crate::scene::{AnchorId, ObjectId, Scene, SceneObject};
use crate::stacking::{Placement, StackEntry, StackManager, StackSide};
use crate::stations::{
    BookState, Category, Drawer, DrawerState, FlatStackedBook, Interactable, ScentDispenser,
    ShelvedBook, Station, StationRegistry,
};

/// Request chains deeper than this are cut off (a drawer closing another
/// drawer is the longest legitimate chain)
const MAX_REQUEST_ROUNDS: usize = 8;

/// What to build when an object is activated
#[derive(Debug, Clone, PartialEq)]
pub enum StationSpec {
    ShelvedBook,
    Drawer { contents: Vec<ObjectId> },
    ScentDispenser { effect: EffectCategory },
    FlatBook { side: StackSide },
}

impl StationSpec {
    pub fn category(&self) -> Category {
        match self {
            StationSpec::ShelvedBook => Category::ShelvedBook,
            StationSpec::Drawer { .. } => Category::Drawer,
            StationSpec::ScentDispenser { .. } => Category::ScentDispenser,
            StationSpec::FlatBook { .. } => Category::FlatStackedBook,
        }
    }
}

/// The state every station callback may touch
#[derive(Debug)]
pub struct World {
    pub scene: Scene,
    pub transitions: TransitionScheduler,
    pub events: EventQueue,
    pub definitions: DefinitionRegistry,
    pub config: EngineConfig,
}

impl World {
    pub fn new(config: EngineConfig, definitions: DefinitionRegistry) -> Self {
        Self {
            scene: Scene::new(),
            transitions: TransitionScheduler::new(),
            events: EventQueue::new(),
            definitions,
            config,
        }
    }

    pub fn context<'a>(
        &'a mut self,
        viewer: Option<Vector3<f32>>,
        requests: &'a mut Vec<Request>,
    ) -> InteractionContext<'a> {
        InteractionContext {
            scene: &mut self.scene,
            transitions: &mut self.transitions,
            events: &mut self.events,
            definitions: &self.definitions,
            config: &self.config,
            viewer,
            requests,
        }
    }
}

pub struct StationEngine {
    world: World,
    stations: StationRegistry,
    stacks: StackManager,
    focus: FocusFlow,
    dispatcher: InteractionDispatcher,
    idle: IdleMotion,
    look: LookController,
    viewpoint: Option<Viewpoint>,
    influences: HashMap<EffectCategory, ObjectId>,
    active_drawer: Option<ObjectId>,
    requests: Vec<Request>,
    clock: f64,
}

impl StationEngine {
    /// Builds an engine with the two pile bases. Refuses an invalid config.
    pub fn new(
        config: EngineConfig,
        definitions: DefinitionRegistry,
        shelf_base: Pose,
        display_base: Pose,
    ) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            log::warn!("rejecting engine config: {err}");
            return Err(err);
        }
        log::debug!("station engine up with {} definitions", definitions.len());
        Ok(Self {
            stacks: StackManager::new(shelf_base, display_base, config.stack),
            dispatcher: InteractionDispatcher::new(config.timing.double_click_window),
            world: World::new(config, definitions),
            stations: StationRegistry::new(),
            focus: FocusFlow::new(),
            idle: IdleMotion::new(),
            look: LookController::default(),
            viewpoint: None,
            influences: HashMap::new(),
            active_drawer: None,
            requests: Vec::new(),
            clock: 0.0,
        })
    }

    // ---- scene assembly ----

    pub fn insert_object(&mut self, id: ObjectId, object: SceneObject) {
        if self.world.scene.insert(id, object).is_some() {
            log::debug!("{id} replaced an existing scene object");
        }
    }

    pub fn set_anchor(&mut self, anchor: AnchorId, pose: Pose) {
        self.world.scene.set_anchor(anchor, pose);
    }

    pub fn set_viewpoint(&mut self, viewpoint: Option<Viewpoint>) {
        self.viewpoint = viewpoint;
    }

    pub fn viewpoint(&self) -> Option<&Viewpoint> {
        self.viewpoint.as_ref()
    }

    pub fn viewpoint_mut(&mut self) -> Option<&mut Viewpoint> {
        self.viewpoint.as_mut()
    }

    pub fn look_controller_mut(&mut self) -> &mut LookController {
        &mut self.look
    }

    /// Free look from raw device motion; ignored while focus is active
    pub fn process_device_event(&mut self, event: &DeviceEvent) {
        if let Some(viewpoint) = self.viewpoint.as_mut() {
            self.look
                .process_device_event(event, viewpoint, self.focus.is_active());
        }
    }

    pub fn add_idle_sway(&mut self, id: ObjectId, sway: IdleSway) {
        self.idle.add(id, sway);
    }

    /// Turns a scene object into an interactive station and registers it
    pub fn activate(&mut self, id: ObjectId, spec: StationSpec) -> InteractionResult {
        if self.stations.contains(id) {
            return Err(InteractionError::AlreadyRegistered(id));
        }
        let category = spec.category();
        let (local, parent) = {
            let object = self
                .world
                .scene
                .get_mut(id)
                .ok_or(InteractionError::UnknownObject(id))?;
            object.layers = object.layers | category.layer();
            (object.local_pose(), object.parent())
        };
        let world_pose = self.world.scene.world_pose(id).unwrap_or(local);

        let viewer = self.viewer();
        let station = match spec {
            StationSpec::ShelvedBook => Station::ShelvedBook(ShelvedBook::new(id, world_pose)),
            StationSpec::Drawer { contents } => {
                let drawer = Drawer::new(id, local, parent, contents);
                drawer.sync_contents(&mut self.world.context(viewer, &mut self.requests));
                Station::Drawer(drawer)
            }
            StationSpec::ScentDispenser { effect } => {
                Station::Dispenser(ScentDispenser::new(id, effect))
            }
            StationSpec::FlatBook { side } => {
                let thickness = self.world.definitions.thickness(id);
                let placement = self.stacks.insert(side, StackEntry::new(id, thickness))?;
                self.stations
                    .register(Station::FlatBook(FlatStackedBook::new(id, side)))?;
                self.settle_into_slots(vec![placement]);
                return Ok(());
            }
        };
        self.stations.register(station)
    }

    /// Removes a station from play.
    ///
    /// In-flight transitions are abandoned, hover and focus are released, a
    /// flat book leaves its pile (the rest of the pile reflows) and any
    /// effect it drove is switched off.
    pub fn deactivate(&mut self, id: ObjectId) -> Option<Station> {
        if !self.stations.contains(id) {
            return None;
        }
        self.world.transitions.abandon(id);
        let viewer = self.viewer();
        let mut station = {
            let mut ctx = self.world.context(viewer, &mut self.requests);
            self.dispatcher.release(id, &mut self.stations, &mut ctx);
            self.focus.abandon(id, &mut ctx);
            let mut station = self.stations.deregister(id)?;
            station.interactable_mut().on_deactivate(&mut ctx);
            station
        };
        self.idle.remove(id, &mut self.world.scene);

        if let Some((_, placements)) = self.stacks.remove(id) {
            self.settle_into_slots(placements);
        }
        if let Some(dispenser) = station.as_dispenser_mut() {
            let effect = dispenser.effect().clone();
            if self.influences.get(&effect) == Some(&id) {
                self.influences.remove(&effect);
                dispenser.set_active(false);
                self.world.events.push(EngineEvent::InfluenceChanged {
                    source: id,
                    effect,
                    value: 0.0,
                });
            }
        }
        if self.active_drawer == Some(id) {
            self.active_drawer = None;
        }
        self.process_requests();
        Some(station)
    }

    // ---- per-tick loop ----

    pub fn tick(&mut self, dt: f32, input: &InputFrame) {
        let dt = dt.max(0.0);
        self.clock += f64::from(dt);
        if let (Some((width, height)), Some(viewpoint)) = (input.resized, self.viewpoint.as_mut()) {
            viewpoint.resize(width, height);
        }

        self.advance_transitions(dt);
        self.idle
            .update(dt, &mut self.world.scene, &self.world.transitions);
        self.handle_input(input);
        self.process_requests();
    }

    fn advance_transitions(&mut self, dt: f32) {
        let finished = self.world.transitions.advance(dt, &mut self.world.scene);
        let viewer = self.viewer();
        let mut returned = Vec::new();
        {
            let mut ctx = self.world.context(viewer, &mut self.requests);
            for done in finished {
                if self.focus.on_transition_finished(done.object, done.tag, &mut ctx) {
                    if done.tag == TransitionTag::FocusReturned {
                        returned.push(done.object);
                    }
                    continue;
                }
                match self.stations.get_mut(done.object) {
                    Some(station) => station
                        .interactable_mut()
                        .on_transition_finished(done.tag, &mut ctx),
                    None => log::trace!("{:?} finished for unregistered {}", done.tag, done.object),
                }
            }
        }
        // a pile may have shifted while its book was away
        for id in returned {
            if let Some(placement) = self.stacks.placement_of(id) {
                self.settle_into_slots(vec![placement]);
            }
        }
    }

    fn handle_input(&mut self, input: &InputFrame) {
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);

        if self.focus.is_active() {
            self.dispatcher.clear_hover(&mut self.stations, &mut ctx);
            if input.primary_pressed || input.cancel_pressed {
                if let Err(err) = self.focus.end(&mut ctx) {
                    log::debug!("focus exit ignored: {err}");
                }
            }
            return;
        }

        // one book in hand at a time: nothing else is hoverable until it is back
        if let Some(book) = self.stations.book_in_hand() {
            self.dispatcher.clear_hover(&mut self.stations, &mut ctx);
            if let Some(reader) = self
                .stations
                .get_mut(book)
                .and_then(Station::as_shelved_book_mut)
                .filter(|reader| reader.is_reading())
            {
                let outcome = if input.cancel_pressed {
                    reader.put_back(&mut ctx)
                } else if input.page_forward {
                    reader.next_spread(&mut ctx).map(|_| ())
                } else if input.page_back {
                    reader.previous_spread(&mut ctx).map(|_| ())
                } else {
                    Ok(())
                };
                if let Err(err) = outcome {
                    log::debug!("reading input ignored: {err}");
                }
            }
            return;
        }

        self.dispatcher.update_hover(
            input.pointer,
            self.viewpoint.as_ref(),
            None,
            &mut self.stations,
            &mut ctx,
        );
        self.dispatcher
            .flush_pending(self.clock, &mut self.stations, &mut ctx);
        if input.primary_pressed {
            self.dispatcher
                .handle_click(self.clock, &mut self.stations, &mut ctx);
        }
    }

    fn process_requests(&mut self) {
        for _ in 0..MAX_REQUEST_ROUNDS {
            let batch = std::mem::take(&mut self.requests);
            if batch.is_empty() {
                return;
            }
            for request in batch {
                self.service(request);
            }
        }
        if !self.requests.is_empty() {
            log::warn!(
                "dropping {} follow-up requests after {MAX_REQUEST_ROUNDS} rounds",
                self.requests.len()
            );
            self.requests.clear();
        }
    }

    fn service(&mut self, request: Request) {
        match request {
            Request::Reflow => self.reflow(),
            Request::Focus(id) => {
                if let Err(err) = self.begin_focus(id) {
                    log::debug!("focus on {id} refused: {err}");
                }
            }
            Request::ActivateInfluence { source, effect } => self.activate_influence(source, effect),
            Request::DrawerOpened(id) => {
                let previous = self.active_drawer.replace(id);
                if let Some(previous) = previous.filter(|p| *p != id) {
                    self.close_drawer(previous);
                }
            }
            Request::DrawerClosed(id) => {
                if self.active_drawer == Some(id) {
                    self.active_drawer = None;
                }
            }
        }
    }

    fn close_drawer(&mut self, id: ObjectId) {
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);
        if let Some(drawer) = self.stations.get_mut(id).and_then(Station::as_drawer_mut) {
            if matches!(drawer.state(), DrawerState::Open | DrawerState::Opening) {
                if let Err(err) = drawer.close(&mut ctx) {
                    log::debug!("could not close {id}: {err}");
                }
            }
        }
    }

    /// Rebuilds both piles from the flat books' side flags, in registration order
    fn reflow(&mut self) {
        let members: Vec<(ObjectId, StackSide, f32)> = self
            .stations
            .flat_books()
            .map(|book| (book.id(), book.side(), self.world.definitions.thickness(book.id())))
            .collect();
        let placements = self.stacks.reflow_all(members);
        self.settle_into_slots(placements);
    }

    fn settle_into_slots(&mut self, placements: Vec<Placement>) {
        let viewer = self.viewer();
        let focused = self.focus.focused();
        let duration = self.world.config.timing.stack_reflow;
        let mut ctx = self.world.context(viewer, &mut self.requests);
        for placement in placements {
            if focused == Some(placement.handle) {
                continue;
            }
            let started = ctx.animate(
                placement.handle,
                PoseTarget::Fixed(placement.pose),
                duration,
                TransitionTag::StackSettled,
            );
            match started {
                Ok(()) => {
                    if let Some(book) = self
                        .stations
                        .get_mut(placement.handle)
                        .and_then(Station::as_flat_book_mut)
                    {
                        book.mark_moving();
                    }
                }
                Err(err) => log::debug!(
                    "slot {} on {:?} not animated: {err}",
                    placement.index,
                    placement.side
                ),
            }
        }
    }

    fn activate_influence(&mut self, source: ObjectId, effect: EffectCategory) {
        if let Some(previous) = self.influences.insert(effect.clone(), source) {
            if previous != source {
                if let Some(dispenser) = self
                    .stations
                    .get_mut(previous)
                    .and_then(Station::as_dispenser_mut)
                {
                    dispenser.set_active(false);
                }
                self.world.events.push(EngineEvent::InfluenceChanged {
                    source: previous,
                    effect: effect.clone(),
                    value: 0.0,
                });
            }
        }
        if let Some(dispenser) = self
            .stations
            .get_mut(source)
            .and_then(Station::as_dispenser_mut)
        {
            dispenser.set_active(true);
        }
        self.world.events.push(EngineEvent::InfluenceChanged {
            source,
            effect,
            value: 1.0,
        });
    }

    fn viewer(&self) -> Option<Vector3<f32>> {
        self.viewpoint.map(|vp| vp.eye)
    }

    // ---- direct commands ----

    /// Lifts `id` into the inspect flow using its definition's text
    pub fn begin_focus(&mut self, id: ObjectId) -> InteractionResult {
        let (title, description) = match self.world.definitions.get(id) {
            Some(definition) => (definition.title.clone(), definition.description.clone()),
            None => (
                self.world
                    .scene
                    .get(id)
                    .map(|o| o.name.clone())
                    .unwrap_or_default(),
                String::new(),
            ),
        };
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);
        self.dispatcher.clear_hover(&mut self.stations, &mut ctx);
        self.focus.begin(id, title, description, &mut ctx)
    }

    pub fn end_focus(&mut self) -> InteractionResult {
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);
        self.focus.end(&mut ctx)
    }

    /// Sends a primary click straight to a station, bypassing picking and
    /// double-click classification
    pub fn click(&mut self, id: ObjectId) -> InteractionResult {
        let viewer = self.viewer();
        let result = {
            let mut ctx = self.world.context(viewer, &mut self.requests);
            let other_in_hand = self.stations.book_in_hand().is_some_and(|book| book != id);
            if other_in_hand && self.stations.category_of(id) == Some(Category::ShelvedBook) {
                return Err(InteractionError::InvalidState {
                    object: id,
                    action: "pull out",
                    state: "waiting for another book",
                });
            }
            let station = self
                .stations
                .get_mut(id)
                .ok_or(InteractionError::UnknownObject(id))?;
            station
                .interactable_mut()
                .on_primary_click(crate::interaction::ClickKind::Single, &mut ctx)
        };
        self.process_requests();
        result
    }

    /// Turns the page of the book being read; `forward` picks the direction
    pub fn turn_page(&mut self, forward: bool) -> InteractionResult<usize> {
        let book = self
            .stations
            .reading_book()
            .ok_or(InteractionError::NothingToRead)?;
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);
        let reader = self
            .stations
            .get_mut(book)
            .and_then(Station::as_shelved_book_mut)
            .ok_or(InteractionError::UnknownObject(book))?;
        if forward {
            reader.next_spread(&mut ctx)
        } else {
            reader.previous_spread(&mut ctx)
        }
    }

    pub fn put_back(&mut self, id: ObjectId) -> InteractionResult {
        let viewer = self.viewer();
        let mut ctx = self.world.context(viewer, &mut self.requests);
        self.stations
            .get_mut(id)
            .and_then(Station::as_shelved_book_mut)
            .ok_or(InteractionError::UnknownObject(id))?
            .put_back(&mut ctx)
    }

    // ---- queries ----

    pub fn scene(&self) -> &Scene {
        &self.world.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.world.scene
    }

    pub fn config(&self) -> &EngineConfig {
        &self.world.config
    }

    pub fn definitions(&self) -> &DefinitionRegistry {
        &self.world.definitions
    }

    pub fn stations(&self) -> &StationRegistry {
        &self.stations
    }

    pub fn station(&self, id: ObjectId) -> Option<&Station> {
        self.stations.get(id)
    }

    pub fn stacks(&self) -> &StackManager {
        &self.stacks
    }

    pub fn hovered(&self) -> Option<ObjectId> {
        self.dispatcher.hovered()
    }

    pub fn is_focus_active(&self) -> bool {
        self.focus.is_active()
    }

    /// The focused object while focus is active
    pub fn focused(&self) -> Option<ObjectId> {
        self.focus.focused()
    }

    pub fn focus(&self) -> &FocusFlow {
        &self.focus
    }

    /// Which pile a flat book is flagged for
    pub fn stack_side(&self, id: ObjectId) -> Option<StackSide> {
        self.stations
            .get(id)
            .and_then(Station::as_flat_book)
            .map(FlatStackedBook::side)
    }

    pub fn is_on_display(&self, id: ObjectId) -> bool {
        self.stack_side(id).is_some_and(StackSide::is_on_display)
    }

    pub fn book_state(&self, id: ObjectId) -> Option<BookState> {
        self.stations
            .get(id)
            .and_then(Station::as_shelved_book)
            .map(ShelvedBook::state)
    }

    pub fn drawer_state(&self, id: ObjectId) -> Option<DrawerState> {
        self.stations.get(id).and_then(Station::as_drawer).map(Drawer::state)
    }

    pub fn active_drawer(&self) -> Option<ObjectId> {
        self.active_drawer
    }

    /// Source currently driving `effect`
    pub fn active_influence(&self, effect: &EffectCategory) -> Option<ObjectId> {
        self.influences.get(effect).copied()
    }

    pub fn reading_book(&self) -> Option<ObjectId> {
        self.stations.reading_book()
    }

    /// Seconds of simulated time since the engine started
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn is_settled(&self) -> bool {
        self.world.transitions.is_idle()
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        self.world.events.drain()
    }

    pub fn pending_events(&self) -> impl Iterator<Item = &EngineEvent> {
        self.world.events.iter()
    }

    // ---- save/restore boundary ----

    pub fn snapshot(&self) -> PlacementSnapshot {
        PlacementSnapshot {
            stack_sides: self
                .stations
                .flat_books()
                .map(|book| (book.id(), book.side()))
                .collect(),
            open_drawers: self
                .stations
                .iter()
                .filter_map(Station::as_drawer)
                .filter(|drawer| drawer.is_open())
                .map(|drawer| drawer.id())
                .collect(),
            influences: self.influences.clone(),
        }
    }

    /// Applies saved flags. Flat books snap straight into their slots and
    /// drawers straight to open or closed; nothing animates.
    pub fn restore(&mut self, snapshot: &PlacementSnapshot) {
        let viewer = self.viewer();
        for id in self.stations.ids().to_vec() {
            let Some(station) = self.stations.get_mut(id) else {
                continue;
            };
            match station {
                Station::FlatBook(book) => {
                    if let Some(side) = snapshot.side_of(id) {
                        book.set_side(side);
                    }
                }
                Station::Drawer(drawer) => {
                    let open = snapshot.open_drawers.contains(&id);
                    drawer.snap(open, &mut self.world.context(viewer, &mut self.requests));
                    if open && self.active_drawer.is_none() {
                        self.active_drawer = Some(id);
                    } else if !open && self.active_drawer == Some(id) {
                        self.active_drawer = None;
                    }
                }
                _ => {}
            }
        }

        let members: Vec<(ObjectId, StackSide, f32)> = self
            .stations
            .flat_books()
            .map(|book| (book.id(), book.side(), self.world.definitions.thickness(book.id())))
            .collect();
        for placement in self.stacks.reflow_all(members) {
            self.world.transitions.abandon(placement.handle);
            self.world.scene.attach(placement.handle, None, placement.pose);
            if let Some(book) = self
                .stations
                .get_mut(placement.handle)
                .and_then(Station::as_flat_book_mut)
            {
                book.mark_at_rest();
            }
        }

        let stale: Vec<(EffectCategory, ObjectId)> = self
            .influences
            .iter()
            .filter(|(effect, source)| snapshot.influences.get(*effect) != Some(*source))
            .map(|(effect, source)| (effect.clone(), *source))
            .collect();
        for (effect, source) in stale {
            self.influences.remove(&effect);
            if let Some(dispenser) = self.stations.get_mut(source).and_then(Station::as_dispenser_mut) {
                dispenser.set_active(false);
            }
            self.world.events.push(EngineEvent::InfluenceChanged {
                source,
                effect,
                value: 0.0,
            });
        }
        for (effect, source) in &snapshot.influences {
            let registered = self
                .stations
                .get(*source)
                .and_then(Station::as_dispenser)
                .is_some();
            if registered && self.influences.get(effect) != Some(source) {
                self.activate_influence(*source, effect.clone());
            }
        }
        self.requests.clear();
        log::debug!("restored placement snapshot");
    }
}
