pub mod handlers;
pub mod models;
pub mod ranking;
pub mod router;
pub mod services;

pub use models::*;
pub use router::booking_routes;
pub use services::BookingService;
