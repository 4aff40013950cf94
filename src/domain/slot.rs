use chrono::{NaiveDate, NaiveTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

pub const FLOORS: [&str; 4] = ["Ground Floor", "First Floor", "Second Floor", "Third Floor"];
pub const SECTIONS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];
pub const SLOTS_PER_SECTION: u32 = 12;

/// Fraction of slots reported available in a booking window.
const AVAILABILITY_RATE: f64 = 0.7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Regular,
    Premium,
    Disabled,
}

impl SlotKind {
    /// Slots 1-8 in a section are regular, 9-10 premium, 11-12 disabled.
    fn for_position(position: u32) -> Self {
        match position {
            1..=8 => SlotKind::Regular,
            9 | 10 => SlotKind::Premium,
            _ => SlotKind::Disabled,
        }
    }

    fn price(self, base_rate: i64) -> i64 {
        match self {
            SlotKind::Regular => base_rate,
            SlotKind::Premium => base_rate + 30,
            SlotKind::Disabled => base_rate - 10,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexKind {
    ShoppingMall,
    OfficeComplex,
    TransportHub,
    MixedUse,
}

impl ComplexKind {
    pub fn base_rate(self) -> i64 {
        match self {
            ComplexKind::ShoppingMall => 60,
            ComplexKind::OfficeComplex => 40,
            ComplexKind::TransportHub | ComplexKind::MixedUse => 50,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComplexKind::ShoppingMall => "Shopping Mall",
            ComplexKind::OfficeComplex => "Office Complex",
            ComplexKind::TransportHub => "Transport Hub",
            ComplexKind::MixedUse => "Mixed Use",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Complex {
    pub id: &'static str,
    pub name: &'static str,
    pub kind: ComplexKind,
}

pub const COMPLEXES: [Complex; 6] = [
    Complex {
        id: "phoenix",
        name: "Phoenix MarketCity Mall",
        kind: ComplexKind::ShoppingMall,
    },
    Complex {
        id: "forum",
        name: "Forum Value Mall",
        kind: ComplexKind::ShoppingMall,
    },
    Complex {
        id: "tech-park",
        name: "Cyber Towers Tech Park",
        kind: ComplexKind::OfficeComplex,
    },
    Complex {
        id: "metro-station",
        name: "Hitech City Metro Station",
        kind: ComplexKind::TransportHub,
    },
    Complex {
        id: "central",
        name: "Central Square Complex",
        kind: ComplexKind::MixedUse,
    },
    Complex {
        id: "brigade",
        name: "Brigade Gateway",
        kind: ComplexKind::OfficeComplex,
    },
];

impl Complex {
    pub fn find(id: &str) -> Option<&'static Complex> {
        COMPLEXES.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParkingSlot {
    pub id: String,
    pub number: String,
    pub kind: SlotKind,
    pub price: i64,
    pub available: bool,
    pub location: String,
    pub complex: String,
}

/// Generates the slot catalog for one complex and booking window. Availability
/// is drawn from a generator seeded by (complex, date, time), so the same
/// window always reports the same slots as free.
pub fn generate_slots(complex: &Complex, date: NaiveDate, time: NaiveTime) -> Vec<ParkingSlot> {
    let mut rng = StdRng::seed_from_u64(window_seed(complex.id, date, time));
    let mut slots =
        Vec::with_capacity(FLOORS.len() * SECTIONS.len() * SLOTS_PER_SECTION as usize);

    for floor in FLOORS {
        for section in SECTIONS {
            for position in 1..=SLOTS_PER_SECTION {
                let number = format!("{section}{position:02}");
                let kind = SlotKind::for_position(position);
                slots.push(ParkingSlot {
                    id: format!(
                        "{}-{}-{}",
                        complex.id,
                        floor.replace(' ', "").to_lowercase(),
                        number
                    ),
                    number,
                    kind,
                    price: kind.price(complex.kind.base_rate()),
                    available: rng.gen_bool(AVAILABILITY_RATE),
                    location: floor.to_string(),
                    complex: complex.name.to_string(),
                });
            }
        }
    }

    slots
}

fn window_seed(complex_id: &str, date: NaiveDate, time: NaiveTime) -> u64 {
    let mut hasher = DefaultHasher::new();
    complex_id.hash(&mut hasher);
    date.hash(&mut hasher);
    time.hash(&mut hasher);
    hasher.finish()
}
