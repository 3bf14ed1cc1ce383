use lazy_static::*;
use log::*;
use enum_map::{enum_map, Enum, EnumMap};
use serde::{Serialize, Deserialize};
use crate::placement::LaneGeometry;

pub type Color = palette::rgb::Rgba;

lazy_static! {
    pub static ref COLORNAMES :EnumMap<ColorName, &'static str> = {
        enum_map! {
            ColorName::Background => "Background",
            ColorName::Line => "Line",
            ColorName::Text => "Text",
            ColorName::CarInfoFill => "Car info fill",
            ColorName::CarPosText => "Car number on map",
        }
    };
}

#[derive(Enum, Debug, PartialEq, Eq, Copy, Clone)]
#[derive(Serialize, Deserialize)]
pub enum ColorName {
    Background,
    Line,
    Text,
    CarInfoFill,
    CarPosText,
}

/// Presentation settings of the track panel.
#[derive(Debug, Clone)]
pub struct Design {
    pub lanes :LaneGeometry,
    pub colors :EnumMap<ColorName, Color>,
    /// Marker colours handed to vehicles in the order they are added.
    pub vehicle_colors :Vec<Color>,
    pub line_width :f32,
    pub show_grid :bool,
    pub show_outlines :bool,
    pub show_car_num_on_map :bool,
    pub show_car_on_street :bool,
}

/// serde-friendly representation of the design struct
#[derive(Serialize, Deserialize)]
#[derive(Debug)]
pub struct DesignString {
    pub lanes :LaneGeometry,
    pub colors :Vec<(String,String)>, // name -> hex color
    pub vehicle_colors :Vec<String>,
    pub line_width :f32,
    pub show_grid :bool,
    pub show_outlines :bool,
    pub show_car_num_on_map :bool,
    pub show_car_on_street :bool,
}

pub fn white() -> Color { Color::new(1.0, 1.0, 1.0, 1.0) }

pub fn to_hex(c :Color) -> String {
    let b = |v :f32| (v.max(0.0).min(1.0) * 255.0).round() as u8;
    format!("#{:02x}{:02x}{:02x}{:02x}", b(c.red), b(c.green), b(c.blue), b(c.alpha))
}

pub fn from_hex(s :&str) -> Option<Color> {
    let s = s.trim_start_matches('#');
    if !(s.len() == 6 || s.len() == 8) || !s.is_ascii() { return None; }
    let byte = |i :usize| u8::from_str_radix(&s[i..i+2], 16).ok();
    let r = byte(0)?;
    let g = byte(2)?;
    let b = byte(4)?;
    let a = if s.len() == 8 { byte(6)? } else { 255u8 };

    Some(Color::new(r as f32 / 255.0,
                    g as f32 / 255.0,
                    b as f32 / 255.0,
                    a as f32 / 255.0))
}

impl Default for DesignString {
    fn default() -> Self {
        let d :Design = Default::default();
        d.to_design_string()
    }
}

impl Design {
    pub fn load() -> Self {
        let s :DesignString = confy::load(env!("CARGO_PKG_NAME"))
            .unwrap_or_else(|e| {
                error!("Could not load config file: {}", e);
                Default::default()
            });
        Design::from_design_string(&s)
    }

    pub fn save(&self) {
        if let Err(e) = confy::store(env!("CARGO_PKG_NAME"), self.to_design_string()) {
            error!("Could not save config file: {}", e);
        }
    }

    pub fn to_design_string(&self) -> DesignString {
        DesignString {
            lanes: self.lanes,
            colors: self.colors.iter()
                .map(|(c,val)| (COLORNAMES[c].to_string(), to_hex(*val)))
                .collect(),
            vehicle_colors: self.vehicle_colors.iter().map(|c| to_hex(*c)).collect(),
            line_width: self.line_width,
            show_grid: self.show_grid,
            show_outlines: self.show_outlines,
            show_car_num_on_map: self.show_car_num_on_map,
            show_car_on_street: self.show_car_on_street,
        }
    }

    /// Unknown names and unparseable colours keep their defaults.
    pub fn from_design_string(ds :&DesignString) -> Self {
        let mut colors = default_colors();
        for (name, col_hex) in ds.colors.iter() {
            match COLORNAMES.iter().find(|(_,n)| **n == name.as_str()) {
                Some((choice,_)) => match from_hex(col_hex) {
                    Some(c) => colors[choice] = c,
                    None => warn!("Ignoring colour {:?} for {:?}", col_hex, name),
                },
                None => warn!("Unknown colour name {:?} in config", name),
            }
        }

        let vehicle_colors = ds.vehicle_colors.iter().filter_map(|h| {
            let c = from_hex(h);
            if c.is_none() { warn!("Ignoring vehicle colour {:?}", h); }
            c
        }).collect();

        Design {
            lanes: ds.lanes,
            colors,
            vehicle_colors,
            line_width: ds.line_width,
            show_grid: ds.show_grid,
            show_outlines: ds.show_outlines,
            show_car_num_on_map: ds.show_car_num_on_map,
            show_car_on_street: ds.show_car_on_street,
        }
    }

    pub fn color(&self, name :ColorName) -> Color { self.colors[name] }
}

impl Default for Design {
    fn default() -> Design {
        Design {
            lanes: LaneGeometry::default(),
            colors: default_colors(),
            vehicle_colors: default_vehicle_colors(),
            line_width: 1.0,
            show_grid: false,
            show_outlines: false,
            show_car_num_on_map: true,
            show_car_on_street: true,
        }
    }
}

fn named(nm :palette::Srgb<u8>) -> Color {
    let f :palette::Srgb<f32> = palette::Srgb::from_format(nm);
    f.into()
}

pub fn default_colors() -> EnumMap<ColorName, Color> {
    use palette::named;
    enum_map! {
        ColorName::Background => named(named::DARKSEAGREEN),
        ColorName::Line => named(named::BLACK),
        ColorName::Text => named(named::BLACK),
        ColorName::CarInfoFill => named(named::PLUM),
        ColorName::CarPosText => named(named::DARKSLATEBLUE),
    }
}

pub fn default_vehicle_colors() -> Vec<Color> {
    use palette::named;
    vec![named(named::TOMATO), named(named::ROYALBLUE), named(named::GOLD), named(named::LIMEGREEN)]
}
