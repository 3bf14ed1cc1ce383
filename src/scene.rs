//! Render-neutral description of one frame: which tile goes where, the
//! grid lines, the vehicle markers and the per-cell vehicle numbers.
//! Positions are scene pixels, rotations counter-clockwise degrees.

use log::*;
use nalgebra_glm as glm;
use serde::Serialize;
use std::collections::BTreeMap;
use crate::config::{Color, ColorName, Design};
use crate::error::PlacementError;
use crate::fleet::VehicleEntry;
use crate::geom::*;
use crate::model::*;
use crate::placement::Placement;
use crate::trackmap::TrackMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[derive(Serialize)]
pub enum Sprite { Straight, Curve, Intersection, Start }

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Tile {
    pub sprite :Sprite,
    pub x :usize,
    pub y :usize,
    pub top_left :PtC,
    pub rotation :f32,
    pub alpha :u8,
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Line {
    pub from :PtC,
    pub to :PtC,
    pub color :Color,
    pub width :f32,
}

#[derive(Clone, Debug)]
pub struct Marker {
    pub index :usize,
    pub color :Color,
    pub placement :Result<Placement, PlacementError>,
}

/// Lower layers are drawn fainter: 255 * 1.5^-layer.
pub fn layer_alpha(layer :usize) -> u8 {
    (1.5f32.powi(-(layer as i32)) * 255.0) as u8
}

/// One tile per drawable element, bottom layer first.
pub fn tiles(map :&TrackMap, design :&Design) -> Vec<Tile> {
    let cell = design.lanes.cell_size;
    map.iter().filter_map(|(r, e)| {
        let (sprite, rotation) = match e.piece.piece {
            Piece::Straight => (Sprite::Straight, e.orientation.angle_degrees() + 90.0),
            Piece::Start => (Sprite::Start, e.orientation.angle_degrees() + 90.0),
            Piece::Curve { .. } => (Sprite::Curve, e.rotation.degrees() as f32),
            // The crossing tile is symmetric, draw it for one of the passes only.
            Piece::Intersection if e.orientation.is_horizontal() => (Sprite::Intersection, 0.0),
            Piece::Intersection | Piece::Finish => return None,
        };
        Some(Tile {
            sprite,
            x: r.x,
            y: r.y,
            top_left: glm::vec2(r.x as f32 * cell, r.y as f32 * cell),
            rotation: normalize_degrees(rotation),
            alpha: layer_alpha(r.layer),
        })
    }).collect()
}

pub fn grid_lines(map :&TrackMap, design :&Design) -> Vec<Line> {
    let cell = design.lanes.cell_size;
    let (w, h) = (map.width() as f32 * cell, map.height() as f32 * cell);
    let line = |from :PtC, to :PtC| Line { from, to, color: design.color(ColorName::Line), width: design.line_width };
    let mut lines = Vec::new();
    if design.show_grid {
        for x in 1..map.width() {
            let x = x as f32 * cell;
            lines.push(line(glm::vec2(x, 0.0), glm::vec2(x, h)));
        }
        for y in 1..map.height() {
            let y = y as f32 * cell;
            lines.push(line(glm::vec2(0.0, y), glm::vec2(w, y)));
        }
    }
    if design.show_outlines {
        let corners = [glm::vec2(0.0, 0.0), glm::vec2(w, 0.0), glm::vec2(w, h), glm::vec2(0.0, h)];
        for i in 0..4 {
            lines.push(line(corners[i], corners[(i + 1) % 4]));
        }
    }
    lines
}

/// Place every vehicle of a frame snapshot. Vehicles that are not aligned
/// are left out; a vehicle that does not fit the map gets its error and
/// does not keep the others from being placed. Nothing is placed while
/// vehicles on the street are switched off.
pub fn place_all(map :&TrackMap, vehicles :&[VehicleEntry], design :&Design) -> Vec<Marker> {
    if !design.show_car_on_street { return Vec::new(); }
    vehicles.iter().enumerate().filter_map(|(index, v)| {
        let placement = match map.place(&v.telemetry, &design.lanes) {
            Ok(Some(p)) => Ok(p),
            Ok(None) => return None,
            Err(e) => {
                error!("Vehicle {} ({}): {}", index, v.telemetry.id, e);
                Err(e)
            },
        };
        Some(Marker { index, color: v.color, placement })
    }).collect()
}

/// Indices of the vehicles in each cell, in roster order. Vehicles without
/// a track position are left out. Empty while car numbers on the map are
/// switched off.
pub fn vehicles_by_cell(map :&TrackMap, vehicles :&[VehicleEntry], design :&Design) -> BTreeMap<(usize,usize), Vec<usize>> {
    let mut cells :BTreeMap<(usize,usize), Vec<usize>> = BTreeMap::new();
    if !design.show_car_num_on_map { return cells; }
    for (i, v) in vehicles.iter().enumerate() {
        let position = match v.telemetry.map_position {
            Some(p) => p,
            None => continue,
        };
        match map.lookup().get(position) {
            Some(r) => cells.entry((r.x, r.y)).or_insert_with(Vec::new).push(i),
            None => warn!("Vehicle {} reports track position {} which is not on the map", i, position),
        }
    }
    cells
}

/// Vehicle numbers of a cell, right-aligned on its bottom-right corner.
#[derive(Clone, Debug, PartialEq)]
pub struct Label {
    pub bottom_right :PtC,
    pub text :String,
    pub color :Color,
}

pub fn car_numbers(map :&TrackMap, vehicles :&[VehicleEntry], design :&Design) -> Vec<Label> {
    let cell = design.lanes.cell_size;
    vehicles_by_cell(map, vehicles, design).into_iter().map(|((x, y), indices)| {
        let text = indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(" ");
        Label {
            bottom_right: glm::vec2((x + 1) as f32 * cell, (y + 1) as f32 * cell),
            text,
            color: design.color(ColorName::CarPosText),
        }
    }).collect()
}

/// Text of a vehicle's info panel.
pub fn info_lines(number :usize, v :&VehicleEntry) -> Vec<String> {
    let t = &v.telemetry;
    match t.alignment() {
        Some((position, offset, piece)) => vec![
            format!("Vehicle ID: {}", t.id),
            format!("Number: {}", number),
            format!("Position: {}", position),
            format!("Offset: {:.2}", offset),
            format!("Speed: {}", t.speed.map(|s| format!("{:.2}", s)).unwrap_or_else(|| "-".to_string())),
            format!("Trackpiece: {:?}", piece),
        ],
        None => vec![
            "Invalid information:".to_string(),
            format!("Vehicle {} ({}) is not aligned to the track", number, t.id),
        ],
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct InfoPanel {
    pub index :usize,
    pub lines :Vec<String>,
    pub fill :Color,
    pub text :Color,
    /// Vehicle colour, shown as a dot in the panel corner.
    pub swatch :Color,
    pub outline :Option<Color>,
}

pub fn info_panels(vehicles :&[VehicleEntry], design :&Design) -> Vec<InfoPanel> {
    vehicles.iter().enumerate().map(|(index, v)| InfoPanel {
        index,
        lines: info_lines(index, v),
        fill: design.color(ColorName::CarInfoFill),
        text: design.color(ColorName::Text),
        swatch: v.color,
        outline: if design.show_outlines { Some(design.color(ColorName::Line)) } else { None },
    }).collect()
}

/// Everything drawn in one frame, back to front.
#[derive(Clone, Debug)]
pub struct Scene {
    pub background :Color,
    pub tiles :Vec<Tile>,
    pub lines :Vec<Line>,
    pub markers :Vec<Marker>,
    pub car_numbers :Vec<Label>,
    pub info :Vec<InfoPanel>,
}

impl Scene {
    pub fn build(map :&TrackMap, vehicles :&[VehicleEntry], design :&Design) -> Scene {
        Scene {
            background: design.color(ColorName::Background),
            tiles: tiles(map, design),
            lines: grid_lines(map, design),
            markers: place_all(map, vehicles, design),
            car_numbers: car_numbers(map, vehicles, design),
            info: info_panels(vehicles, design),
        }
    }
}

/// Box-drawing glyph for an element, looking at how it connects.
pub fn glyph(e :&Element) -> char {
    match e.piece.piece {
        Piece::Straight if e.orientation.is_horizontal() => '─',
        Piece::Straight => '│',
        Piece::Intersection => '┼',
        Piece::Start => 'S',
        Piece::Finish => 'F',
        Piece::Curve { .. } => match e.rotation {
            Rotation::R0 => '└',
            Rotation::R90 => '┘',
            Rotation::R180 => '┐',
            Rotation::R270 => '┌',
        },
    }
}

/// The map as text, one glyph per cell: crossings win, otherwise the
/// bottom layer shows.
pub fn render_text(map :&TrackMap) -> String {
    let mut out = String::new();
    for y in 0..map.height() {
        for x in 0..map.width() {
            let cell = map.cell(x, y);
            let c = if cell.iter().any(|e| e.piece.kind() == PieceType::Intersection) {
                '┼'
            } else {
                cell.first().map(glyph).unwrap_or(' ')
            };
            out.push(c);
        }
        out.push('\n');
    }
    out
}
