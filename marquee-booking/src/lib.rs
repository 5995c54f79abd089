pub mod allocator;
pub mod models;
pub mod otp;
pub mod repository;

pub use allocator::{BookingConfirmation, CreateBooking, ReservationAllocator, RiderEntry, VipDetails};
pub use models::{Booking, Rider};
pub use otp::{OtpChallenge, OtpVerification};
pub use repository::BookingStore;
