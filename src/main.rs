//! Brick Volley headless driver
//!
//! Runs the engine at a fixed frame rate with an auto-aiming player and logs
//! progress. Usage: `brick-volley [settings.json] [levels]`

use brick_volley::consts::SIM_DT;
use brick_volley::sim::{Bounds, GameEvent, GamePhase};
use brick_volley::{Engine, Settings};
use glam::DVec2;

const VIEWPORT: (f64, f64) = (300.0, 600.0);
const DEFAULT_LEVELS: u32 = 10;
/// Ten simulated minutes
const MAX_FRAMES: u64 = 120 * 60 * 10;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Settings::default()
            }
        },
        None => Settings::default(),
    };
    let levels = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LEVELS);

    log::info!("Brick Volley (headless) starting, {} levels", levels);

    let mut engine = Engine::new(settings);
    engine.set_viewport_size(VIEWPORT.0, VIEWPORT.1);

    let mut frames = 0u64;
    while engine.level() <= levels && frames < MAX_FRAMES {
        if engine.phase() == GamePhase::PlacingTarget {
            let aim = pick_target(&engine);
            if !engine.fire(aim) {
                // Degenerate aim, go straight up instead
                engine.fire(engine.shooting_point() - DVec2::Y);
            }
        }
        engine.tick(SIM_DT);
        for event in engine.drain_events() {
            report(&event);
        }
        frames += 1;
    }

    println!(
        "Reached level {} after {:.1}s simulated, {} bricks on the field",
        engine.level(),
        frames as f64 * SIM_DT,
        engine.bricks().len()
    );
    match engine.snapshot_json() {
        Ok(json) => log::debug!("Final state:\n{}", json),
        Err(e) => log::error!("Could not serialize final state: {}", e),
    }
}

fn report(event: &GameEvent) {
    match event {
        GameEvent::BrickDestroyed { brick_id, .. } => log::debug!("Brick {} destroyed", brick_id),
        GameEvent::LevelStarted { level, new_bricks } => {
            log::info!("Level {} started with {} new bricks", level, new_bricks)
        }
        _ => {}
    }
}

/// Aim at the lowest brick, or straight up when the field is empty
fn pick_target(engine: &Engine) -> DVec2 {
    engine
        .bricks()
        .iter()
        .max_by(|a, b| a.bottom().total_cmp(&b.bottom()))
        .map(|brick| brick.pos())
        .unwrap_or_else(|| DVec2::new(engine.shooting_point().x, 0.0))
}
