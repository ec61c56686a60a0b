//! Undercroft - Entry Point
//!
//! Generates a dungeon from command-line parameters and prints it as
//! ASCII. With `--fov-radius` the dump is restricted to what a torch
//! bearer standing in the start room can see.

use clap::Parser;

use undercroft::core::GenParams;
use undercroft::dungeon::generate;
use undercroft::visibility::{illuminate, Falloff, LightSource};

/// Generate a dungeon and print it as ASCII
#[derive(Parser, Debug)]
#[command(name = "undercroft")]
#[command(about = "Procedural tile dungeon generator")]
struct Args {
    /// Grid width in tiles
    #[arg(long, default_value_t = 60)]
    width: i32,

    /// Grid height in tiles
    #[arg(long, default_value_t = 36)]
    height: i32,

    /// Number of main rooms to attempt
    #[arg(long, default_value_t = 12)]
    rooms: u32,

    /// Smallest room side length
    #[arg(long, default_value_t = 4)]
    room_min: i32,

    /// Largest room side length
    #[arg(long, default_value_t = 9)]
    room_max: i32,

    /// 0 = scattered rooms, 1 = one straight progression
    #[arg(long, default_value_t = 0.5)]
    linearity: f32,

    /// 0 = no side rooms, 1 = heavy branching
    #[arg(long, default_value_t = 0.5)]
    entropy: f32,

    /// Extra corridor links between nearby rooms
    #[arg(long, default_value_t = 0.5)]
    complexity: f32,

    /// Seed for deterministic generation
    #[arg(long)]
    seed: Option<u64>,

    /// Show only tiles lit from the start room at this radius
    #[arg(long)]
    fov_radius: Option<i32>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("undercroft=info")
        .init();

    let args = Args::parse();
    let params = GenParams {
        width: args.width,
        height: args.height,
        room_count: args.rooms,
        room_min: args.room_min,
        room_max: args.room_max,
        linearity: args.linearity,
        entropy: args.entropy,
        complexity: args.complexity,
        seed: args.seed.unwrap_or(12345),
        ..GenParams::default()
    };
    let dungeon = generate(&params);

    match args.fov_radius {
        Some(radius) => {
            let origin = dungeon
                .start_room
                .map(|i| dungeon.rooms[i].center())
                .unwrap_or((dungeon.width / 2, dungeon.height / 2));
            let torch = LightSource {
                x: origin.0,
                y: origin.1,
                radius,
                intensity: 1.0,
                falloff: Falloff::Quadratic,
            };
            let field = illuminate(&dungeon, &[torch]);
            let mut out = String::new();
            for y in 0..dungeon.height {
                for x in 0..dungeon.width {
                    if (x, y) == origin {
                        out.push('@');
                    } else if field.is_visible(x, y) {
                        out.push(dungeon.glyph_at(x, y));
                    } else {
                        out.push(' ');
                    }
                }
                out.push('\n');
            }
            print!("{out}");
        }
        None => print!("{}", dungeon.render_ascii()),
    }
}
