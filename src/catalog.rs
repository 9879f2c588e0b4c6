//! The service directory.
//!
//! Categories feed the picker; venues feed the nearby screen. Venue data is
//! a built-in sample set until a real directory service exists.

use std::cmp::Ordering;

use crate::location::LocationFix;

/// A queue-able service category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceCategory {
    pub id: &'static str,
    pub name: &'static str,
}

/// A place offering one of the service categories.
#[derive(Debug, Clone)]
pub struct Venue {
    pub name: &'static str,
    pub address: &'static str,
    category: &'static str,
    pub lat: f64,
    pub lng: f64,
    /// Minutes a visitor typically waits before being served.
    pub typical_wait_min: u32,
    /// People currently in line.
    pub queue_len: u32,
}

/// A venue plus its distance from the visitor, when a fix is known.
#[derive(Debug, Clone)]
pub struct NearbyVenue {
    pub venue: Venue,
    pub distance_km: Option<f64>,
}

pub const CATEGORIES: &[ServiceCategory] = &[
    ServiceCategory { id: "hospital", name: "Hospitals" },
    ServiceCategory { id: "clinic", name: "Walk-in Clinics" },
    ServiceCategory { id: "pharmacy", name: "Pharmacies" },
    ServiceCategory { id: "bank", name: "Banks" },
    ServiceCategory { id: "salon", name: "Salons & Barbers" },
    ServiceCategory { id: "restaurant", name: "Restaurants" },
];

pub fn category_by_id(id: &str) -> Option<ServiceCategory> {
    CATEGORIES.iter().find(|category| category.id == id).copied()
}

/// Venues in `category`, closest first when a fix is available. Without a
/// fix the directory order stands and distances stay unknown.
pub fn nearby(category: ServiceCategory, fix: Option<LocationFix>) -> Vec<NearbyVenue> {
    let mut venues: Vec<NearbyVenue> = VENUES
        .iter()
        .filter(|venue| venue.category == category.id)
        .map(|venue| NearbyVenue {
            distance_km: fix.map(|fix| distance_km(fix, venue)),
            venue: venue.clone(),
        })
        .collect();

    if fix.is_some() {
        venues.sort_by(|a, b| {
            a.distance_km
                .partial_cmp(&b.distance_km)
                .unwrap_or(Ordering::Equal)
        });
    }

    venues
}

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance between the fix and a venue, in kilometers.
fn distance_km(fix: LocationFix, venue: &Venue) -> f64 {
    let lat1 = fix.lat.to_radians();
    let lat2 = venue.lat.to_radians();
    let delta_lat = (venue.lat - fix.lat).to_radians();
    let delta_lng = (venue.lng - fix.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

impl Venue {
    const fn new(
        name: &'static str,
        address: &'static str,
        category: &'static str,
        lat: f64,
        lng: f64,
        typical_wait_min: u32,
        queue_len: u32,
    ) -> Self {
        Self {
            name,
            address,
            category,
            lat,
            lng,
            typical_wait_min,
            queue_len,
        }
    }
}

#[rustfmt::skip]
const VENUES: &[Venue] = &[
    Venue::new("St. Julian's General Hospital", "Av. Marginal 112", "hospital", 38.6790, -9.3226, 45, 12),
    Venue::new("Riverside University Hospital", "Rua do Arsenal 23", "hospital", 38.7071, -9.1399, 60, 18),
    Venue::new("Northgate Medical Center", "Av. da República 88", "hospital", 38.7436, -9.1460, 35, 9),
    Venue::new("Baixa Walk-in Clinic", "Rua Augusta 140", "clinic", 38.7103, -9.1387, 20, 6),
    Venue::new("Parkside Family Clinic", "Rua Castilho 39", "clinic", 38.7218, -9.1543, 25, 4),
    Venue::new("Eastside Urgent Care", "Av. Dom João II 45", "clinic", 38.7681, -9.0970, 30, 11),
    Venue::new("Central Pharmacy", "Praça dos Restauradores 12", "pharmacy", 38.7155, -9.1417, 10, 3),
    Venue::new("Hilltop Pharmacy", "Calçada da Estrela 71", "pharmacy", 38.7137, -9.1604, 5, 1),
    Venue::new("Harbor Pharmacy", "Rua da Alfândega 10", "pharmacy", 38.7086, -9.1336, 15, 5),
    Venue::new("First Atlantic Bank", "Av. da Liberdade 190", "bank", 38.7204, -9.1446, 25, 8),
    Venue::new("Mercantile Credit Union", "Rua do Ouro 49", "bank", 38.7107, -9.1378, 40, 14),
    Venue::new("Westline Savings", "Av. 24 de Julho 102", "bank", 38.7047, -9.1556, 15, 4),
    Venue::new("Goldline Barbershop", "Rua da Misericórdia 14", "salon", 38.7109, -9.1432, 30, 5),
    Venue::new("Atelier Norte", "Av. de Roma 27", "salon", 38.7492, -9.1368, 50, 7),
    Venue::new("Quick Cuts Alvalade", "Av. da Igreja 12", "salon", 38.7530, -9.1440, 20, 3),
    Venue::new("Tasca do Cais", "Cais do Sodré 5", "restaurant", 38.7059, -9.1442, 35, 10),
    Venue::new("Brasa & Lume", "Rua dos Bacalhoeiros 30", "restaurant", 38.7086, -9.1312, 55, 16),
    Venue::new("Jardim Verde", "Príncipe Real 44", "restaurant", 38.7166, -9.1482, 25, 6),
];
