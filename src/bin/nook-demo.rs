//! # Nook Demo
//!
//! A headless walk through one reading nook: a shelf of loose books, a
//! bookcase volume, two drawers and a pair of scent dispensers sharing one
//! ambient effect.
//!
//! ## What this example shows:
//! - How to build a `StationEngine` from definitions and pile bases
//! - How to register scene objects as stations
//! - How to script pointer input through a `PointerTracker`
//! - How to drain engine events the way an audio/UI layer would
//!
//! ## Usage:
//! ```bash
//! RUST_LOG=info cargo run --bin nook-demo
//! ```
//!
//! ## What you'll see:
//! - Five flat books settling onto the shelf pile
//! - One of them moved to the display pile, and the shelf closing the gap
//! - A book pulled out, read and put back
//! - Drawers and dispensers handing over to each other

use anyhow::{anyhow, Result};
use nook::prelude::*;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

const TICK: f32 = 1.0 / 60.0;
const SCREEN: (f32, f32) = (1280.0, 720.0);
const CENTRE: (f32, f32) = (SCREEN.0 / 2.0, SCREEN.1 / 2.0);

const LOOSE_BOOKS: [(u64, &str, f32); 5] = [
    (100, "Almanac of Small Weather", 0.05),
    (101, "The Tea Merchant's Ledger", 0.07),
    (102, "Moss and Lichen", 0.045),
    (103, "Night Ferries", 0.06),
    (104, "A Pocket Herbal", 0.03),
];
const TIDE_TABLES: ObjectId = ObjectId(1);
const LEFT_DRAWER: ObjectId = ObjectId(20);
const RIGHT_DRAWER: ObjectId = ObjectId(21);
const THIMBLE: ObjectId = ObjectId(22);
const BURNER: ObjectId = ObjectId(30);
const ATOMISER: ObjectId = ObjectId(31);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = build_room()?;
    let mut pointer = PointerTracker::new();

    run_until_settled(&mut engine, &mut pointer);
    log_pile(&engine, StackSide::Shelf);

    // Move the middle book out on display
    let middle = ObjectId(LOOSE_BOOKS[2].0);
    engine
        .click(middle)
        .map_err(|e| anyhow!("toggle failed: {e}"))?;
    run_until_settled(&mut engine, &mut pointer);
    log_pile(&engine, StackSide::Shelf);
    log_pile(&engine, StackSide::Display);

    // Pull the bookcase volume out with the mouse, leaf through it, put it back
    pointer.on_cursor_moved(Some(CENTRE));
    step(&mut engine, &mut pointer);
    log::info!("hovering {:?}", engine.hovered());
    press(&mut pointer, MouseButton::Left);
    run_until_settled(&mut engine, &mut pointer);
    log::info!("tide tables: {:?}", engine.book_state(TIDE_TABLES));
    for _ in 0..2 {
        key(&mut pointer, KeyCode::ArrowRight);
        step(&mut engine, &mut pointer);
    }
    log::info!("tide tables: {:?}", engine.book_state(TIDE_TABLES));
    key(&mut pointer, KeyCode::Escape);
    run_until_settled(&mut engine, &mut pointer);
    log::info!("tide tables: {:?}", engine.book_state(TIDE_TABLES));
    pointer.on_cursor_moved(None);

    // Drawers are mutually exclusive
    for drawer in [LEFT_DRAWER, RIGHT_DRAWER] {
        engine
            .click(drawer)
            .map_err(|e| anyhow!("drawer {drawer} refused: {e}"))?;
        run_until_settled(&mut engine, &mut pointer);
        log::info!(
            "left {:?}, right {:?}, thimble visible: {}",
            engine.drawer_state(LEFT_DRAWER),
            engine.drawer_state(RIGHT_DRAWER),
            engine.scene().get(THIMBLE).is_some_and(|o| o.visible)
        );
    }

    // So are the two sources of one scent
    let lavender = EffectCategory::new("lavender");
    for dispenser in [BURNER, ATOMISER] {
        engine
            .click(dispenser)
            .map_err(|e| anyhow!("dispenser {dispenser} refused: {e}"))?;
        step(&mut engine, &mut pointer);
        log::info!("lavender source: {:?}", engine.active_influence(&lavender));
    }

    let snapshot = engine.snapshot();
    log::info!(
        "on display: {:?}",
        snapshot.on_display().collect::<Vec<_>>()
    );
    Ok(())
}

fn build_room() -> Result<StationEngine> {
    let mut definitions: DefinitionRegistry = LOOSE_BOOKS
        .iter()
        .map(|(id, title, thickness)| {
            (
                ObjectId(*id),
                Definition::new(*title, "A well-thumbed copy").with_thickness(*thickness),
            )
        })
        .collect();
    definitions.insert(
        TIDE_TABLES,
        Definition::new("Tide Tables", "Pressed flowers between the pages")
            .with_spreads(4)
            .with_hidden_item_on(2),
    );

    let mut engine = StationEngine::new(
        EngineConfig::default(),
        definitions,
        Pose::from_position(Vector3::new(-2.0, 1.0, -3.0)),
        Pose::from_position(Vector3::new(0.6, 0.75, -1.2)),
    )?;

    let viewpoint = Viewpoint::new(Vector3::new(0.0, 1.6, 0.0), 0.0, 0.0, SCREEN);
    engine.set_anchor(AnchorId::Reading, viewpoint.anchor_pose(0.45, Vector3::new(0.0, -0.15, 0.0)));
    engine.set_anchor(AnchorId::Focus, viewpoint.anchor_pose(0.6, Vector3::new(0.0, -0.05, 0.0)));
    engine.set_viewpoint(Some(viewpoint));

    let book_bounds = Aabb::from_size(Vector3::new(0.22, 0.05, 0.3));
    for (id, title, _) in LOOSE_BOOKS {
        engine.insert_object(ObjectId(id), SceneObject::new(title, Pose::identity(), book_bounds));
        engine
            .activate(ObjectId(id), StationSpec::FlatBook { side: StackSide::Shelf })
            .map_err(|e| anyhow!("{title}: {e}"))?;
    }

    engine.insert_object(
        TIDE_TABLES,
        SceneObject::new(
            "tide tables",
            Pose::from_position(Vector3::new(0.0, 1.6, -1.5)),
            Aabb::from_size(Vector3::new(0.04, 0.28, 0.2)),
        ),
    );
    engine
        .activate(TIDE_TABLES, StationSpec::ShelvedBook)
        .map_err(|e| anyhow!("tide tables: {e}"))?;

    let drawer_bounds = Aabb::from_size(Vector3::new(0.4, 0.15, 0.35));
    engine.insert_object(
        LEFT_DRAWER,
        SceneObject::new("left drawer", Pose::from_position(Vector3::new(-0.5, 0.5, -1.8)), drawer_bounds),
    );
    engine.insert_object(
        RIGHT_DRAWER,
        SceneObject::new("right drawer", Pose::from_position(Vector3::new(0.5, 0.5, -1.8)), drawer_bounds),
    );
    engine.insert_object(
        THIMBLE,
        SceneObject::new("thimble", Pose::identity(), Aabb::from_size(Vector3::new(0.02, 0.02, 0.02)))
            .with_parent(Parent::Object(LEFT_DRAWER), Pose::from_position(Vector3::new(0.0, 0.03, 0.0))),
    );
    engine
        .activate(LEFT_DRAWER, StationSpec::Drawer { contents: vec![THIMBLE] })
        .map_err(|e| anyhow!("left drawer: {e}"))?;
    engine
        .activate(RIGHT_DRAWER, StationSpec::Drawer { contents: vec![] })
        .map_err(|e| anyhow!("right drawer: {e}"))?;

    let lavender = EffectCategory::new("lavender");
    for (id, name, x) in [(BURNER, "oil burner", -0.8), (ATOMISER, "atomiser", 0.8)] {
        engine.insert_object(
            id,
            SceneObject::new(name, Pose::from_position(Vector3::new(x, 0.9, -1.6)), Aabb::from_size(Vector3::new(0.1, 0.15, 0.1))),
        );
        engine
            .activate(id, StationSpec::ScentDispenser { effect: lavender.clone() })
            .map_err(|e| anyhow!("{name}: {e}"))?;
    }
    engine.add_idle_sway(BURNER, nook::idle::IdleSway::gentle(BURNER));

    Ok(engine)
}

fn press(pointer: &mut PointerTracker, button: MouseButton) {
    pointer.on_mouse_button(button, ElementState::Pressed);
    pointer.on_mouse_button(button, ElementState::Released);
}

fn key(pointer: &mut PointerTracker, code: KeyCode) {
    pointer.on_key(code, ElementState::Pressed, false);
    pointer.on_key(code, ElementState::Released, false);
}

fn step(engine: &mut StationEngine, pointer: &mut PointerTracker) {
    engine.tick(TICK, &pointer.take_frame());
    for event in engine.drain_events() {
        log::debug!("{event:?}");
    }
}

fn run_until_settled(engine: &mut StationEngine, pointer: &mut PointerTracker) {
    step(engine, pointer);
    let mut ticks = 1;
    while !engine.is_settled() && ticks < 600 {
        step(engine, pointer);
        ticks += 1;
    }
    log::info!("settled after {ticks} ticks ({:.2}s on the clock)", engine.clock());
}

fn log_pile(engine: &StationEngine, side: StackSide) {
    let stack = engine.stacks().stack(side);
    log::info!("{side:?} pile, {} books", stack.len());
    for placement in stack.placements() {
        let title = engine
            .definitions()
            .get(placement.handle)
            .map_or("?", |d| d.title.as_str());
        log::info!(
            "  [{}] {:<28} offset {:.4}  at {:?}",
            placement.index,
            title,
            placement.base_offset,
            placement.pose.position
        );
    }
}
