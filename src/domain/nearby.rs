#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AvailabilityBand {
    High,
    Medium,
    Low,
}

/// A parking facility near the user. Static demo data; a real deployment
/// would query a live availability feed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbyLocation {
    pub id: u32,
    pub name: &'static str,
    pub distance_km: f64,
    pub available_slots: u32,
    pub walk_minutes: u32,
    pub price: i64,
    pub rating: f64,
}

pub const NEARBY_LOCATIONS: [NearbyLocation; 4] = [
    NearbyLocation {
        id: 1,
        name: "Phoenix MarketCity Mall",
        distance_km: 0.8,
        available_slots: 45,
        walk_minutes: 10,
        price: 60,
        rating: 4.5,
    },
    NearbyLocation {
        id: 2,
        name: "Cyber Towers Tech Park",
        distance_km: 1.2,
        available_slots: 23,
        walk_minutes: 15,
        price: 40,
        rating: 4.2,
    },
    NearbyLocation {
        id: 3,
        name: "Forum Value Mall",
        distance_km: 2.1,
        available_slots: 67,
        walk_minutes: 25,
        price: 55,
        rating: 4.7,
    },
    NearbyLocation {
        id: 4,
        name: "Hitech City Metro Station",
        distance_km: 1.5,
        available_slots: 12,
        walk_minutes: 18,
        price: 45,
        rating: 4.0,
    },
];

impl NearbyLocation {
    pub fn availability_band(&self) -> AvailabilityBand {
        if self.available_slots > 30 {
            AvailabilityBand::High
        } else if self.available_slots > 10 {
            AvailabilityBand::Medium
        } else {
            AvailabilityBand::Low
        }
    }

    /// Maps search link a navigation surface can open directly.
    pub fn maps_search_url(&self) -> String {
        format!(
            "https://www.google.com/maps/search/{}",
            encode_component(&format!("{} parking", self.name))
        )
    }

    /// Directions link from a known position.
    pub fn maps_directions_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "https://www.google.com/maps/dir/{latitude},{longitude}/{}",
            encode_component(&format!("{} parking", self.name))
        )
    }
}

fn encode_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
