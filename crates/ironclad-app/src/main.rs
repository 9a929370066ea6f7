//! Headless demo driver.
//!
//! Loads a JSON scenario (or a built-in default), runs a scripted
//! engagement, logs every collision event, and writes the final frame
//! to `frame.png`.
//!
//! Usage: `ironclad [scenario.json]`

use std::path::Path;
use std::process::ExitCode;

use log::{error, info};
use serde::Deserialize;

use ironclad_core::config::{ArenaConfig, ObstacleConfig, TankConfig};
use ironclad_render::{draw_frame, Canvas};
use ironclad_sim::Engine;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct Scenario {
    arena: ArenaConfig,
    tanks: Vec<TankConfig>,
    obstacles: Vec<ObstacleConfig>,
    /// Steps to simulate.
    steps: u32,
    /// Fire every tank's gun at these step numbers.
    fire_at: Vec<u32>,
}

fn default_scenario() -> Scenario {
    Scenario {
        arena: ArenaConfig::default(),
        tanks: vec![
            TankConfig {
                position_x: 25.0,
                position_y: 37.5,
                ..Default::default()
            },
            TankConfig {
                position_x: 75.0,
                position_y: 37.5,
                angle: std::f32::consts::PI,
                ..Default::default()
            },
        ],
        obstacles: vec![ObstacleConfig {
            position_x: 50.0,
            position_y: 55.0,
            radius: 6.0,
            ..Default::default()
        }],
        steps: 600,
        fire_at: vec![60, 240, 420],
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let scenario = match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)?;
            serde_json::from_str(&text)?
        }
        None => default_scenario(),
    };

    let mut engine = Engine::new(scenario.arena.clone());
    let tanks: Vec<_> = scenario
        .tanks
        .into_iter()
        .map(|config| engine.add_tank(config))
        .collect();
    for config in scenario.obstacles {
        engine.add_obstacle(config);
    }
    info!("{} tanks deployed", tanks.len());

    for step in 0..scenario.steps {
        if scenario.fire_at.contains(&step) {
            for &id in &tanks {
                engine.fire_gun(id)?;
            }
        }
        for &id in &tanks {
            engine.move_left_tread(id, 2.0)?;
            engine.move_right_tread(id, 1.5)?;
        }
        for event in engine.step() {
            info!(
                "step {step}: tank {} hit {:?} {}",
                event.shooter, event.kind, event.target
            );
        }
    }

    for &id in &tanks {
        let points = engine.scan_lidar(id)?.to_vec();
        let center = engine.tank_position(id)?;
        let nearest = points
            .iter()
            .map(|p| (*p - center).length())
            .fold(f32::INFINITY, f32::min);
        info!("tank {id}: nearest lidar return {nearest:.1} m");
    }

    let mut canvas = Canvas::new(
        scenario.arena.image_width(),
        scenario.arena.image_height(),
    );
    draw_frame(&engine, &mut canvas)?;
    canvas.write_png(Path::new("frame.png"))?;
    info!("wrote frame.png");
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
