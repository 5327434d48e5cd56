// demos/frame_loop.rs
//
// Runs a small simulation on the CPU: build the tree every frame, hand it to the reference
// force pass, integrate, repeat. Run with RUST_LOG=debug to see the per-phase timings.

use linear_quadtree::force::{ForceEvaluator, ForcePass};
use linear_quadtree::frame::{FrameBuilder, LogTimer};
use linear_quadtree::geometry::Vec2;
use linear_quadtree::scenario::{generate_bodies, points_of, Layout, ScenarioConfig};
use linear_quadtree::utils::SimulationConfig;
use linear_quadtree::QuadtreeError;

const WIDTH: f32 = 1280.0;
const HEIGHT: f32 = 1280.0;
const BODY_COUNT: usize = 20_000;
const FRAMES: usize = 60;
const DT: f32 = 0.01;

fn main() -> Result<(), QuadtreeError> {
    env_logger::init();

    let config = SimulationConfig::new(Some(10), Some(0.5), Some(1.0), Some(2.0));
    let scenario = ScenarioConfig {
        count: BODY_COUNT,
        seed: 42,
        min_mass: 10.0,
        max_mass: 100.0,
        low: Vec2::new(0.0, 0.0),
        high: Vec2::new(WIDTH, HEIGHT),
        layout: Layout::Spiral { angular_velocity: 0.05 },
    };
    let mut bodies = generate_bodies(&scenario)?;

    let mut builder = FrameBuilder::with_timer(&config, LogTimer::new())?;
    let evaluator = ForceEvaluator::new(&config);

    println!("Bodies: {}, tree depth: {}, nodes: {}", BODY_COUNT, config.max_depth, builder.tree().capacity());

    for frame in 0..FRAMES {
        let points = points_of(&bodies);
        let built = builder.build(&points).map(|_| ());
        match built {
            Ok(()) => {
                let mut pass = ForcePass::new(evaluator, &points);
                if let Some(accelerations) = builder.hand_off(&mut pass) {
                    for (body, acc) in bodies.iter_mut().zip(accelerations) {
                        body.vx += acc.x * DT;
                        body.vy += acc.y * DT;
                    }
                }
            }
            // skip the force pass, keep integrating with the previous velocities
            Err(e) => eprintln!("Frame {} skipped: {}", frame, e),
        }
        for body in bodies.iter_mut() {
            body.x += body.vx * DT;
            body.y += body.vy * DT;
        }

        if frame % 10 == 0 {
            let stats = builder.tree().stats();
            let root = builder.tree().root();
            let centroid = root.centroid().unwrap_or_default();
            println!(
                "frame {:>3}: centroid ({:.2}, {:.2}), mass {:.1}, {} leaves, {} saturated, depth {:?}",
                frame, centroid.x, centroid.y, centroid.mass, stats.leaves, stats.saturated, stats.deepest_level
            );
        }
    }

    println!("Built {} frames, rejected {}", builder.frames_built(), builder.frames_rejected());
    builder.destroy();
    Ok(())
}
