use actix_web::{web, HttpResponse, Result};
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use crate::{
    db,
    models::{Modality, NewBooking},
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub barber_id: Option<String>,
    pub modality: Modality,
    pub date: String,
    pub time: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/barbershops").route(web::get().to(list_barbershops)))
        .service(web::resource("/api/barbers").route(web::get().to(list_barbers)))
        .service(web::resource("/api/services").route(web::get().to(list_services)))
        .service(web::resource("/api/bookings").route(web::post().to(create_booking)))
        .service(web::resource("/health").route(web::get().to(health)));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().body("ok")
}

async fn list_barbershops(state: web::Data<AppState>) -> Result<HttpResponse> {
    let shops = db::list_barbershops(&state.db)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(shops))
}

async fn list_barbers(state: web::Data<AppState>) -> Result<HttpResponse> {
    let barbers = db::list_barbers(&state.db)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(barbers))
}

async fn list_services(state: web::Data<AppState>) -> Result<HttpResponse> {
    let services = db::list_services(&state.db)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(services))
}

/// Persists one booking per call. Failures come back as a generic 500 with no
/// detail beyond the log line; there is no retry and no idempotency key, so a
/// duplicate submit creates a duplicate row.
async fn create_booking(
    state: web::Data<AppState>,
    body: web::Json<CreateBookingRequest>,
) -> HttpResponse {
    let form = body.into_inner();

    let Some(date) = parse_calendar_date(&form.date) else {
        log::error!("Booking rejected, unparseable date: {:?}", form.date);
        return booking_error();
    };

    let new = NewBooking {
        service_id: form.service_id.filter(|id| !id.is_empty()),
        barber_id: form.barber_id.filter(|id| !id.is_empty()),
        modality: form.modality,
        date,
        time: form.time,
        name: form.name,
        phone: form.phone,
        address: form.address.unwrap_or_default(),
    };

    match db::insert_booking(&state.db, new).await {
        Ok(booking) => HttpResponse::Created().json(booking),
        Err(err) => {
            log::error!("Booking insert failed: {err}");
            booking_error()
        }
    }
}

fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw).ok().map(|stamp| stamp.date_naive())
}

fn booking_error() -> HttpResponse {
    HttpResponse::InternalServerError().json(json!({ "error": "Error creating booking" }))
}
