//! Hotel and cab bookings
//!
//! Bookings live in flat ordered collections owned by the tourist store,
//! keyed by generated id. Status moves one way: the only transition is into
//! `Cancelled`, and nothing leaves it.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Booking lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Create from string representation
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "confirmed" => Some(Self::Confirmed),
            "pending" => Some(Self::Pending),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Convert to string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Pending => "pending",
            Self::Cancelled => "cancelled",
        }
    }

    /// Check if the booking has been cancelled
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A hotel stay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelBooking {
    pub id: Uuid,
    pub hotel_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub status: BookingStatus,
}

/// Fields the caller supplies when booking a hotel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelBookingDraft {
    pub hotel_name: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

impl HotelBooking {
    /// Create a confirmed booking with a fresh identifier
    pub fn new(draft: HotelBookingDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            hotel_name: draft.hotel_name,
            check_in: draft.check_in,
            check_out: draft.check_out,
            guests: draft.guests,
            status: BookingStatus::Confirmed,
        }
    }

    /// Move the booking into `Cancelled`. Idempotent.
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }
}

/// A cab ride
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabBooking {
    pub id: Uuid,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub passengers: u32,
    pub status: BookingStatus,
}

/// Fields the caller supplies when booking a cab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CabBookingDraft {
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub passengers: u32,
}

impl CabBooking {
    /// Create a confirmed booking with a fresh identifier
    pub fn new(draft: CabBookingDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            from: draft.from,
            to: draft.to,
            date: draft.date,
            time: draft.time,
            passengers: draft.passengers,
            status: BookingStatus::Confirmed,
        }
    }

    /// Move the booking into `Cancelled`. Idempotent.
    pub fn cancel(&mut self) {
        self.status = BookingStatus::Cancelled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_from_str() {
        assert_eq!(BookingStatus::from_str("confirmed"), Some(BookingStatus::Confirmed));
        assert_eq!(BookingStatus::from_str("CANCELLED"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::from_str("held"), None);
    }

    #[test]
    fn test_new_hotel_booking_is_confirmed() {
        let booking = HotelBooking::new(HotelBookingDraft {
            hotel_name: "Lakeview".into(),
            check_in: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2025, 1, 4).unwrap(),
            guests: 2,
        });
        assert_eq!(booking.status, BookingStatus::Confirmed);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut booking = CabBooking::new(CabBookingDraft {
            from: "A".into(),
            to: "B".into(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            passengers: 2,
        });

        booking.cancel();
        assert!(booking.status.is_cancelled());

        booking.cancel();
        assert!(booking.status.is_cancelled());
    }
}
