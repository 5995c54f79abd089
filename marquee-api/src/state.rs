use marquee_booking::{BookingStore, OtpChallenge, ReservationAllocator};
use marquee_catalog::CatalogStore;
use marquee_core::documents::DocumentStore;
use marquee_payment::{PaymentSessionManager, WebhookReconciler};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub allocator: Arc<ReservationAllocator>,
    pub sessions: Arc<PaymentSessionManager>,
    pub reconciler: Arc<WebhookReconciler>,
    pub otp: Arc<OtpChallenge>,
    pub catalog: Arc<dyn CatalogStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub documents: Arc<dyn DocumentStore>,
}
