pub mod handlers;
pub mod types;

use actix_web::{web, Scope};

pub fn scope() -> Scope {
    web::scope("/api")
        .configure(handlers::frame::configure)
        .configure(handlers::attendance::configure)
}
