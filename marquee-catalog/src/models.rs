use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of sellable inventory a package represents.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageKind {
    /// One exclusive table per booking.
    Vip,
    /// A variable count of individual seats per booking.
    Rider,
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Vip => "VIP",
            PackageKind::Rider => "RIDER",
        }
    }
}

impl std::str::FromStr for PackageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIP" => Ok(PackageKind::Vip),
            "RIDER" => Ok(PackageKind::Rider),
            other => Err(format!("unknown package kind: {other}")),
        }
    }
}

/// Sellable package. Immutable reference data as far as the engine is
/// concerned; prices are integral minor units in the configured currency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub id: Uuid,
    pub event_id: Option<Uuid>,
    pub name: String,
    pub kind: PackageKind,
    pub price: i32,
    pub description: Option<String>,
    pub max_capacity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Package {
    /// Quoted total for a booking of `seats` seats. VIP packages sell the
    /// whole table at unit price regardless of the seat count.
    pub fn quote(&self, seats: i32) -> i32 {
        match self.kind {
            PackageKind::Vip => self.price,
            PackageKind::Rider => self.price * seats,
        }
    }
}

/// Physical VIP table. Owned exclusively by at most one non-cancelled booking
/// at a time; `is_available == false` iff such a booking exists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VenueTable {
    pub id: Uuid,
    pub table_number: i32,
    pub capacity: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn package(kind: PackageKind, price: i32) -> Package {
        Package {
            id: Uuid::new_v4(),
            event_id: None,
            name: "pkg".into(),
            kind,
            price,
            description: None,
            max_capacity: 6,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn vip_quote_ignores_seat_count() {
        let vip = package(PackageKind::Vip, 500);
        assert_eq!(vip.quote(1), 500);
        assert_eq!(vip.quote(6), 500);
    }

    #[test]
    fn rider_quote_scales_with_seats() {
        let rider = package(PackageKind::Rider, 100);
        assert_eq!(rider.quote(3), 300);
        assert_eq!(rider.quote(1), 100);
    }
}
