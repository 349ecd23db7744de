use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fulfillment mode of a booking. Home visits carry a fixed surcharge on top
/// of the service price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Modality {
    Barbershop,
    Home,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Barbershop => "barbershop",
            Modality::Home => "home",
        }
    }

    /// Spanish label used in the share message.
    pub fn label(&self) -> &'static str {
        match self {
            Modality::Barbershop => "En la Barbería 💈",
            Modality::Home => "A Domicilio 🏠",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Barbershop {
    pub id: String,
    pub name: String,
    pub address: String,
    pub rating: f64,
    pub image: String,
    pub phone: String,
    pub description: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BarberRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub specialty: String,
    pub rating: f64,
    pub experience: String,
    pub barbershop_id: String,
    pub available_slots: String,
    pub clients: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Barber {
    pub id: String,
    pub username: String,
    pub name: String,
    pub specialty: String,
    pub rating: f64,
    pub experience: String,
    pub barbershop_id: String,
    /// Bookable start times, fixed at seeding. Slots are never consumed by
    /// bookings; confirmation stays informal.
    pub available_slots: Vec<String>,
    pub clients: i64,
}

impl From<BarberRow> for Barber {
    fn from(row: BarberRow) -> Self {
        let available_slots = serde_json::from_str(&row.available_slots).unwrap_or_default();
        Barber {
            id: row.id,
            username: row.username,
            name: row.name,
            specialty: row.specialty,
            rating: row.rating,
            experience: row.experience,
            barbershop_id: row.barbershop_id,
            available_slots,
            clients: row.clients,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub duration: i64,
    pub description: String,
    pub is_vip: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub service_id: Option<String>,
    pub barber_id: Option<String>,
    pub modality: Modality,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub created_at: String,
}

/// Input shape of a create-booking call, as assembled by the wizard on its
/// terminal step or received on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBooking {
    pub service_id: Option<String>,
    pub barber_id: Option<String>,
    pub modality: Modality,
    pub date: NaiveDate,
    pub time: String,
    pub name: String,
    pub phone: String,
    pub address: String,
}
