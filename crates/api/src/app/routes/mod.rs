use axum::{Router, routing::get};

use adminhub_tourism::{Guide, Hotel, TourPackage, Tourist};

pub mod admin;
pub mod bookings;
pub mod common;
pub mod customers;
pub mod destinations;
pub mod records;
pub mod system;
pub mod zones;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/customers", customers::router())
        .nest("/guides", records::router::<Guide>())
        .nest("/packages", records::router::<TourPackage>())
        .nest("/tourists", records::router::<Tourist>())
        .nest("/hotels", records::router::<Hotel>())
        .nest("/zones", zones::router())
        .nest("/destinations", destinations::router())
        .nest("/bookings", bookings::router())
        .nest("/admin", admin::router())
}
