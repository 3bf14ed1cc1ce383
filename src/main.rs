use clap::Parser;
use log::*;
use std::path::PathBuf;
use trackvis::config::Design;
use trackvis::fleet::{Fleet, Telemetry};
use trackvis::geom::Orientation;
use trackvis::model::PieceType;
use trackvis::scene;
use trackvis::track;
use trackvis::trackmap::{Flip, TrackMap};

#[derive(Parser)]
#[command(name = "trackvis", version, about = "Lay out a slot-car track and place vehicles on it")]
struct Cli {
    /// Track file (.ron or .json). The built-in figure eight if left out.
    track :Option<PathBuf>,
    #[arg(long)]
    flip_h :bool,
    #[arg(long)]
    flip_v :bool,
    /// Initial travel direction, e.g. 1,0 for east.
    #[arg(long, value_parser = parse_orientation)]
    orientation :Option<Orientation>,
    /// Place a vehicle at POSITION:OFFSET (repeatable).
    #[arg(long = "vehicle", value_parser = parse_vehicle)]
    vehicles :Vec<(usize, f32)>,
    /// Print the laid out map as JSON instead of text.
    #[arg(long)]
    json :bool,
}

fn parse_orientation(s :&str) -> Result<Orientation, String> {
    let mut it = s.split(',').map(|v| v.trim().parse::<i32>());
    match (it.next(), it.next(), it.next()) {
        (Some(Ok(x)), Some(Ok(y)), None) => Orientation::new(x, y)
            .ok_or_else(|| format!("({},{}) is not a cardinal direction", x, y)),
        _ => Err(format!("expected X,Y, got {:?}", s)),
    }
}

fn parse_vehicle(s :&str) -> Result<(usize, f32), String> {
    let mut it = s.splitn(2, ':');
    let position = it.next().and_then(|p| p.parse().ok());
    let offset = it.next().and_then(|o| o.parse().ok());
    match (position, offset) {
        (Some(p), Some(o)) => Ok((p, o)),
        _ => Err(format!("expected POSITION:OFFSET, got {:?}", s)),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Starting {} v{}.", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let design = Design::load();

    let (file_orientation, pieces) = match &cli.track {
        Some(path) => {
            let t = track::load(path)?;
            (t.orientation, t.pieces)
        },
        None => (Orientation::EAST, track::demo()),
    };
    let orientation = cli.orientation.unwrap_or(file_orientation);
    let flip = Flip { horizontal: cli.flip_h, vertical: cli.flip_v };
    let map = TrackMap::new(pieces, orientation, flip)?;
    info!("Laid out {} pieces on a {}x{} grid", map.pieces().len(), map.width(), map.height());

    let fleet = Fleet::new(design.vehicle_colors.clone());
    for (i, (position, offset)) in cli.vehicles.iter().enumerate() {
        // The piece a vehicle reports is whatever the map holds there.
        let piece = map.element(*position).map(|(_, e)| e.piece.kind()).unwrap_or(PieceType::Straight);
        fleet.add(Telemetry {
            id: format!("vehicle-{}", i),
            map_position: Some(*position),
            road_offset: Some(*offset),
            current_piece: Some(piece),
            speed: None,
        }, None);
    }
    let vehicles = fleet.snapshot();
    let frame = scene::Scene::build(&map, &vehicles, &design);

    if cli.json {
        let placements = frame.markers.iter()
            .filter_map(|m| m.placement.as_ref().ok().map(|p| (m.index, *p)))
            .collect::<Vec<_>>();
        let out = serde_json::json!({ "map": map, "placements": placements });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    print!("{}", scene::render_text(&map));
    println!();
    for (position, r) in map.lookup().iter() {
        println!("{:>3} -> ({}, {}) layer {}", position, r.x, r.y, r.layer);
    }
    println!();
    for t in frame.tiles.iter() {
        println!("{:?} at ({}, {}) rotated {} alpha {}", t.sprite, t.x, t.y, t.rotation, t.alpha);
    }
    for m in frame.markers.iter() {
        match &m.placement {
            Ok(p) => println!("{} at ({:.1}, {:.1}) rotated {:.1} ({:?})",
                              vehicles[m.index].telemetry, p.position.x, p.position.y, p.rotation, p.anchor),
            Err(e) => println!("{}: {}", vehicles[m.index].telemetry.id, e),
        }
    }
    for l in frame.car_numbers.iter() {
        println!("vehicles {} in the cell ending at ({}, {})", l.text, l.bottom_right.x, l.bottom_right.y);
    }
    Ok(())
}
