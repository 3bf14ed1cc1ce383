//! Vehicle roster shared between the telemetry side and the frame loop.
//!
//! Writers update records under the write lock; a frame takes one
//! `snapshot` and places every vehicle from it, so position, offset and
//! piece of a vehicle always come from the same update.

use log::*;
use serde::{Serialize, Deserialize};
use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use crate::config::{Color, white};
use crate::model::PieceType;

#[derive(Clone, Debug, Default, PartialEq)]
#[derive(Serialize, Deserialize)]
pub struct Telemetry {
    pub id :String,
    /// Index of the current piece in the track sequence.
    pub map_position :Option<usize>,
    pub road_offset :Option<f32>,
    pub current_piece :Option<PieceType>,
    pub speed :Option<f32>,
}

impl Telemetry {
    pub fn new(id :impl Into<String>) -> Telemetry {
        Telemetry { id: id.into(), ..Telemetry::default() }
    }

    /// Position, road offset and piece, once all three have been reported.
    pub fn alignment(&self) -> Option<(usize, f32, PieceType)> {
        match (self.map_position, self.road_offset, self.current_piece) {
            (Some(p), Some(o), Some(t)) => Some((p, o, t)),
            _ => None,
        }
    }
}

impl fmt::Display for Telemetry {
    fn fmt(&self, f :&mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)?;
        match self.alignment() {
            Some((p, o, t)) => write!(f, " on {:?} #{} offset {:.2}", t, p, o),
            None => write!(f, " (not aligned)"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct VehicleEntry {
    pub telemetry :Telemetry,
    pub color :Color,
}

#[derive(Debug)]
struct Roster {
    entries :Vec<VehicleEntry>,
    colors :Vec<Color>,
    assigned :usize,
}

impl Roster {
    // Configured colours in order, then white for everyone after.
    fn next_color(&mut self) -> Color {
        let c = self.colors.get(self.assigned).cloned().unwrap_or_else(white);
        self.assigned += 1;
        c
    }
}

#[derive(Clone, Debug)]
pub struct Fleet {
    roster :Arc<RwLock<Roster>>,
}

impl Fleet {
    pub fn new(colors :Vec<Color>) -> Fleet {
        Fleet { roster: Arc::new(RwLock::new(Roster { entries: Vec::new(), colors, assigned: 0 })) }
    }

    fn read(&self) -> RwLockReadGuard<Roster> {
        self.roster.read().unwrap_or_else(|e| {
            error!("Vehicle roster lock was poisoned, continuing with last written state");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<Roster> {
        self.roster.write().unwrap_or_else(|e| {
            error!("Vehicle roster lock was poisoned, continuing with last written state");
            e.into_inner()
        })
    }

    /// Add a vehicle, returning its index.
    pub fn add(&self, telemetry :Telemetry, color :Option<Color>) -> usize {
        let mut roster = self.write();
        let color = match color {
            Some(c) => c,
            None => roster.next_color(),
        };
        info!("Added vehicle {}", telemetry.id);
        roster.entries.push(VehicleEntry { telemetry, color });
        roster.entries.len() - 1
    }

    pub fn remove(&self, index :usize) -> Option<VehicleEntry> {
        let mut roster = self.write();
        if index >= roster.entries.len() {
            warn!("No vehicle {} to remove", index);
            return None;
        }
        let entry = roster.entries.remove(index);
        info!("Removed vehicle {}", entry.telemetry.id);
        Some(entry)
    }

    /// Apply a telemetry update to one vehicle; false if there is no such vehicle.
    pub fn update(&self, index :usize, f :impl FnOnce(&mut Telemetry)) -> bool {
        let mut roster = self.write();
        match roster.entries.get_mut(index) {
            Some(entry) => { f(&mut entry.telemetry); true },
            None => false,
        }
    }

    pub fn snapshot(&self) -> Vec<VehicleEntry> {
        self.read().entries.clone()
    }

    pub fn len(&self) -> usize { self.read().entries.len() }
    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn red() -> Color { Color::new(1.0, 0.0, 0.0, 1.0) }

    #[test]
    fn colors_run_out_into_white() {
        let fleet = Fleet::new(vec![red()]);
        fleet.add(Telemetry::new("a"), None);
        fleet.add(Telemetry::new("b"), None);
        fleet.add(Telemetry::new("c"), Some(red()));
        let s = fleet.snapshot();
        assert_eq!(s[0].color, red());
        assert_eq!(s[1].color, white());
        assert_eq!(s[2].color, red());
    }

    #[test]
    fn snapshot_is_detached() {
        let fleet = Fleet::new(Vec::new());
        let i = fleet.add(Telemetry::new("a"), None);
        let before = fleet.snapshot();
        assert!(fleet.update(i, |t| { t.map_position = Some(3); }));
        assert_eq!(before[0].telemetry.map_position, None);
        assert_eq!(fleet.snapshot()[0].telemetry.map_position, Some(3));
        assert!(!fleet.update(7, |_| {}));
    }

    #[test]
    fn remove_shifts_indices() {
        let fleet = Fleet::new(Vec::new());
        fleet.add(Telemetry::new("a"), None);
        fleet.add(Telemetry::new("b"), None);
        assert_eq!(fleet.remove(0).map(|e| e.telemetry.id), Some("a".to_string()));
        assert!(fleet.remove(5).is_none());
        assert_eq!(fleet.len(), 1);
        assert_eq!(fleet.snapshot()[0].telemetry.id, "b");
    }

    #[test]
    fn updates_are_never_torn() {
        let fleet = Fleet::new(Vec::new());
        fleet.add(Telemetry::new("a"), None);
        let writer = {
            let fleet = fleet.clone();
            thread::spawn(move || {
                for i in 0..1000usize {
                    fleet.update(0, |t| {
                        t.map_position = Some(i);
                        t.road_offset = Some(i as f32);
                        t.current_piece = Some(PieceType::Straight);
                    });
                }
            })
        };
        for _ in 0..1000 {
            let t = &fleet.snapshot()[0].telemetry;
            if let (Some(p), Some(o)) = (t.map_position, t.road_offset) {
                assert_eq!(p as f32, o);
            }
        }
        writer.join().unwrap();
    }

    #[test]
    fn aligned_once_all_three_fields_arrive() {
        let mut t = Telemetry::new("car");
        t.map_position = Some(4);
        t.current_piece = Some(PieceType::Straight);
        assert_eq!(t.alignment(), None);
        t.road_offset = Some(-12.5);
        assert_eq!(t.alignment(), Some((4, -12.5, PieceType::Straight)));
        t.map_position = None;
        assert_eq!(t.alignment(), None);
    }

    #[test]
    fn display_marks_unaligned() {
        let mut t = Telemetry::new("car");
        assert_eq!(t.to_string(), "car (not aligned)");
        t.map_position = Some(2);
        t.road_offset = Some(1.234);
        t.current_piece = Some(PieceType::Curve);
        assert_eq!(t.to_string(), "car on Curve #2 offset 1.23");
    }
}
