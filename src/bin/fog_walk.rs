//! Headless fog-of-war driver
//!
//! Generates a mission map, walks an observer around it at random and prints
//! the resulting fog overlay together with the exploration stats.

use gridfog::{Config, FogSession, FogStats};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use std::env;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const MOVES: [(i32, i32); 4] = [(0, -1), (0, 1), (-1, 0), (1, 0)];

#[derive(Debug, Serialize)]
struct WalkReport {
    steps: u32,
    resets: u32,
    observer: (i32, i32),
    stats: FogStats,
    contacts: Vec<(i32, i32)>,
    visible_contacts: Vec<(i32, i32)>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let json = args.iter().any(|arg| arg == "--json");

    let config = match args.iter().find(|arg| !arg.starts_with("--")) {
        Some(path) => match Config::from_path(path) {
            Ok(config) => config,
            Err(e) => {
                error!("{}", e);
                process::exit(1);
            }
        },
        None => Config::load(),
    };

    let mut session = match FogSession::from_config(&config) {
        Ok(session) => session,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let mut rng = ChaCha8Rng::seed_from_u64(config.walk.seed);
    let contacts = place_contacts(&session, config.walk.contacts, &mut rng);

    let (mut x, mut y) = session.start_position();
    session.observe(x, y);

    let mut resets = 0;
    for step in 1..=config.walk.steps {
        if config.walk.reset_every > 0 && step % config.walk.reset_every == 0 {
            session.restart_mission();
            resets += 1;
        }

        // The walker validates its own moves; the fog engine never does
        let candidates: Vec<(i32, i32)> = MOVES
            .iter()
            .map(|&(dx, dy)| (x + dx, y + dy))
            .filter(|&(nx, ny)| !session.is_obstacle(nx, ny))
            .collect();
        if let Some(&(nx, ny)) = candidates.choose(&mut rng) {
            x = nx;
            y = ny;
        }
        session.observe(x, y);
    }

    let report = WalkReport {
        steps: config.walk.steps,
        resets,
        observer: (x, y),
        stats: session.stats(),
        visible_contacts: session.visible_contacts(&contacts),
        contacts,
    };

    if json {
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("failed to serialize walk report: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    print!("{}", session.overlay_ascii());
    println!();
    println!("{}", report.stats);
    println!("Observer: ({}, {}) after {} steps, {} resets", x, y, report.steps, report.resets);
    println!(
        "Contacts in sight: {}/{} {:?}",
        report.visible_contacts.len(),
        report.contacts.len(),
        report.visible_contacts
    );
    info!(explored = report.stats.explored, "walk finished");
}

/// Scatter contacts on walkable cells away from the start position
fn place_contacts(session: &FogSession, count: usize, rng: &mut ChaCha8Rng) -> Vec<(i32, i32)> {
    let map = session.map();
    let (start_x, start_y) = session.start_position();

    let walkable: Vec<(i32, i32)> = (0..map.height())
        .flat_map(|y| (0..map.width()).map(move |x| (x, y)))
        .filter(|&(x, y)| !map.is_obstacle(x, y))
        .filter(|&(x, y)| (x - start_x).abs() > 2 || (y - start_y).abs() > 2)
        .collect();

    if walkable.is_empty() {
        return Vec::new();
    }

    (0..count)
        .map(|_| walkable[rng.gen_range(0..walkable.len())])
        .collect()
}
