use crate::models::{Booking, Rider};
use crate::repository::BookingStore;
use marquee_catalog::{CatalogStore, PackageKind};
use marquee_core::{CoreError, CoreResult};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// VIP leg of a booking request. Every field is required; the document is a
/// storage path token from a prior upload.
#[derive(Debug, Clone, Deserialize)]
pub struct VipDetails {
    pub full_name: String,
    pub contact_number: String,
    pub email: String,
    pub identity_id: String,
    pub identity_document: String,
    pub table_id: Uuid,
}

/// One manifest entry of a rider booking. The identity document for entry i
/// is `rider_documents[i]` on the enclosing request.
#[derive(Debug, Clone, Deserialize)]
pub struct RiderEntry {
    pub full_name: String,
    pub identity_id: String,
    pub email: String,
    pub contact_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBooking {
    pub event_id: Uuid,
    pub package_id: Uuid,
    #[serde(default)]
    pub vip: Option<VipDetails>,
    #[serde(default)]
    pub riders: Vec<RiderEntry>,
    #[serde(default)]
    pub rider_documents: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct BookingConfirmation {
    pub booking: Booking,
    pub riders: Vec<Rider>,
    /// Quoted total: unit price for VIP, unit price × rider count otherwise.
    /// Advisory for the client; the payment session re-derives it.
    pub amount: i32,
}

/// Allocates inventory when a booking is created: claims one exclusive table
/// for VIP packages, records a rider manifest for rider packages.
pub struct ReservationAllocator {
    catalog: Arc<dyn CatalogStore>,
    bookings: Arc<dyn BookingStore>,
}

impl ReservationAllocator {
    pub fn new(catalog: Arc<dyn CatalogStore>, bookings: Arc<dyn BookingStore>) -> Self {
        Self { catalog, bookings }
    }

    pub async fn create_booking(&self, req: CreateBooking) -> CoreResult<BookingConfirmation> {
        let package = self
            .catalog
            .get_package(req.package_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("package {}", req.package_id)))?;

        match package.kind {
            PackageKind::Vip => {
                let vip = req
                    .vip
                    .ok_or_else(|| CoreError::Validation("all VIP details are required".into()))?;
                for (field, value) in [
                    ("full_name", &vip.full_name),
                    ("contact_number", &vip.contact_number),
                    ("email", &vip.email),
                    ("identity_id", &vip.identity_id),
                    ("identity_document", &vip.identity_document),
                ] {
                    if value.trim().is_empty() {
                        return Err(CoreError::Validation(format!("{field} is required")));
                    }
                }

                let booking = Booking::new_vip(
                    req.event_id,
                    req.package_id,
                    vip.table_id,
                    vip.full_name,
                    vip.contact_number,
                    vip.email,
                    vip.identity_id,
                    vip.identity_document,
                );
                // Table claim and booking insert are one unit of work in the
                // store; a lost race surfaces here as Conflict.
                self.bookings.create_vip_booking(&booking).await?;

                info!(booking_id = %booking.id, table_id = %vip.table_id, "VIP booking created");
                Ok(BookingConfirmation {
                    amount: package.quote(1),
                    booking,
                    riders: Vec::new(),
                })
            }
            PackageKind::Rider => {
                if req.riders.is_empty() {
                    return Err(CoreError::Validation("at least one rider required".into()));
                }
                if req.rider_documents.len() != req.riders.len() {
                    return Err(CoreError::Validation(
                        "one identity document per rider required".into(),
                    ));
                }

                let seats = req.riders.len() as i32;
                let booking = Booking::new_rider(req.event_id, req.package_id, seats);
                let riders: Vec<Rider> = req
                    .riders
                    .into_iter()
                    .zip(req.rider_documents)
                    .map(|(entry, document)| {
                        Rider::new(
                            booking.id,
                            req.package_id,
                            entry.full_name,
                            entry.identity_id,
                            entry.email,
                            entry.contact_number,
                            document,
                        )
                    })
                    .collect();

                self.bookings.create_rider_booking(&booking, &riders).await?;

                info!(booking_id = %booking.id, seats, "rider booking created");
                Ok(BookingConfirmation {
                    amount: package.quote(seats),
                    booking,
                    riders,
                })
            }
        }
    }
}
