use std::{fs, path::Path};

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::catalog::Catalog;
use crate::models::{Barber, BarberRow, Barbershop, Booking, NewBooking, Service};

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn ensure_sqlite_dir(db_url: &str) -> std::io::Result<()> {
    let path = if let Some(path) = db_url.strip_prefix("sqlite://") {
        Some(path)
    } else if let Some(path) = db_url.strip_prefix("sqlite:") {
        Some(path)
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(());
    };

    let path = path.split('?').next().unwrap_or(path);
    if path == ":memory:" || path.is_empty() {
        return Ok(());
    }

    let path = path.strip_prefix("file:").unwrap_or(path);
    let db_path = Path::new(path);
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub async fn list_barbershops(pool: &SqlitePool) -> Result<Vec<Barbershop>, sqlx::Error> {
    sqlx::query_as::<_, Barbershop>(
        "SELECT id, name, address, rating, image, phone, description FROM barbershops",
    )
    .fetch_all(pool)
    .await
}

pub async fn list_barbers(pool: &SqlitePool) -> Result<Vec<Barber>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BarberRow>(
        r#"SELECT id, username, name, specialty, rating, experience, barbershop_id,
                  available_slots, clients
           FROM barbers"#,
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(Barber::from).collect())
}

pub async fn list_services(pool: &SqlitePool) -> Result<Vec<Service>, sqlx::Error> {
    sqlx::query_as::<_, Service>(
        "SELECT id, name, price, duration, description, is_vip FROM services",
    )
    .fetch_all(pool)
    .await
}

/// Snapshot of the three catalog collections, for handing to the wizard.
pub async fn load_catalog(pool: &SqlitePool) -> Result<Catalog, sqlx::Error> {
    Ok(Catalog {
        barbershops: list_barbershops(pool).await?,
        barbers: list_barbers(pool).await?,
        services: list_services(pool).await?,
    })
}

pub async fn insert_booking(pool: &SqlitePool, new: NewBooking) -> Result<Booking, sqlx::Error> {
    let id = new_id();
    let created_at = Utc::now().to_rfc3339();

    sqlx::query(
        r#"INSERT INTO bookings
           (id, service_id, barber_id, modality, date, time, name, phone, address, created_at)
           VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
    )
    .bind(&id)
    .bind(&new.service_id)
    .bind(&new.barber_id)
    .bind(new.modality)
    .bind(new.date)
    .bind(&new.time)
    .bind(&new.name)
    .bind(&new.phone)
    .bind(&new.address)
    .bind(&created_at)
    .execute(pool)
    .await?;

    Ok(Booking {
        id,
        service_id: new.service_id,
        barber_id: new.barber_id,
        modality: new.modality,
        date: new.date,
        time: new.time,
        name: new.name,
        phone: new.phone,
        address: new.address,
        created_at,
    })
}

pub async fn seed_defaults(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    seed_barbershops(pool).await?;
    seed_services(pool).await?;
    seed_barbers(pool).await?;
    Ok(())
}

async fn seed_barbershops(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let shops = [
        (
            "barber-central",
            "Master Barber Central",
            "Av. Principal 123, Centro",
            4.9,
            "🏢",
            "+1 234 567 8901",
            "Nuestra sucursal insignia en el corazón de la ciudad",
        ),
        (
            "barber-norte",
            "Master Barber Norte",
            "Blvd. Norte 456, Zona Norte",
            4.8,
            "🏬",
            "+1 234 567 8902",
            "Experiencia premium en la zona norte",
        ),
        (
            "barber-sur",
            "Master Barber Sur",
            "Calle Sur 789, Plaza Sur",
            4.7,
            "🏛️",
            "+1 234 567 8903",
            "Tu barbería de confianza en el sur",
        ),
    ];

    for (id, name, address, rating, image, phone, description) in shops {
        let exists = sqlx::query_as::<_, (String,)>("SELECT id FROM barbershops WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"INSERT INTO barbershops (id, name, address, rating, image, phone, description)
               VALUES (?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(name)
        .bind(address)
        .bind(rating)
        .bind(image)
        .bind(phone)
        .bind(description)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_services(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let services = [
        (
            "corte-caballero",
            "Corte Caballero",
            25.0,
            30,
            "Corte clásico o moderno con acabado profesional",
            false,
        ),
        (
            "barba-toalla",
            "Barba & Toalla Caliente",
            20.0,
            25,
            "Afeitado tradicional con toalla caliente",
            false,
        ),
        ("combo-full", "Combo Full", 40.0, 50, "Corte + Barba completo", false),
        ("corte-nino", "Corte Niño", 18.0, 25, "Corte para los más pequeños", false),
        (
            "paquete-vip",
            "Paquete VIP",
            75.0,
            90,
            "Corte + Barba + Tratamiento Facial + Masaje",
            true,
        ),
    ];

    for (id, name, price, duration, description, is_vip) in services {
        let exists = sqlx::query_as::<_, (String,)>("SELECT id FROM services WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        sqlx::query(
            r#"INSERT INTO services (id, name, price, duration, description, is_vip)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(name)
        .bind(price)
        .bind(duration)
        .bind(description)
        .bind(is_vip)
        .execute(pool)
        .await?;
    }

    Ok(())
}

async fn seed_barbers(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let barbers: [(&str, &str, &str, &str, f64, &str, &str, &[&str], i64); 6] = [
        (
            "b1",
            "carlos",
            "Carlos Mendoza",
            "Cortes Clásicos & Fade",
            4.9,
            "8 años",
            "barber-central",
            &["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"],
            1250,
        ),
        (
            "b2",
            "miguel",
            "Miguel Ángel",
            "Diseños & Barba",
            4.8,
            "5 años",
            "barber-central",
            &["09:30", "10:30", "11:30", "14:30", "15:30", "17:00"],
            890,
        ),
        (
            "b3",
            "roberto",
            "Roberto Silva",
            "Corte Moderno & Color",
            4.9,
            "10 años",
            "barber-norte",
            &["09:00", "10:00", "12:00", "15:00", "16:00", "18:00"],
            2100,
        ),
        (
            "b4",
            "alejandro",
            "Alejandro Cruz",
            "Especialista VIP",
            5.0,
            "12 años",
            "barber-norte",
            &["10:00", "11:00", "14:00", "16:00", "17:00"],
            3200,
        ),
        (
            "b5",
            "david",
            "David Ramírez",
            "Cortes Infantiles",
            4.7,
            "4 años",
            "barber-sur",
            &["09:00", "10:30", "12:00", "14:00", "15:30", "17:00"],
            650,
        ),
        (
            "b6",
            "fernando",
            "Fernando López",
            "Afeitado Clásico",
            4.8,
            "7 años",
            "barber-sur",
            &["09:30", "11:00", "13:00", "15:00", "16:30", "18:30"],
            1100,
        ),
    ];

    for (id, username, name, specialty, rating, experience, shop_id, slots, clients) in barbers {
        let exists = sqlx::query_as::<_, (String,)>("SELECT id FROM barbers WHERE id = ? LIMIT 1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }
        let available_slots =
            serde_json::to_string(slots).unwrap_or_else(|_| "[]".to_string());
        sqlx::query(
            r#"INSERT INTO barbers
               (id, username, name, specialty, rating, experience, barbershop_id, available_slots, clients)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id)
        .bind(username)
        .bind(name)
        .bind(specialty)
        .bind(rating)
        .bind(experience)
        .bind(shop_id)
        .bind(available_slots)
        .bind(clients)
        .execute(pool)
        .await?;
    }

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("in-memory options")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");
    run_migrations(&pool).await.expect("migrations");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Modality;
    use crate::wizard::BookingWizard;
    use chrono::NaiveDate;

    async fn counts(pool: &SqlitePool) -> (i64, i64, i64) {
        let shops = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM barbershops")
            .fetch_one(pool)
            .await
            .unwrap();
        let barbers = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM barbers")
            .fetch_one(pool)
            .await
            .unwrap();
        let services = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM services")
            .fetch_one(pool)
            .await
            .unwrap();
        (shops, barbers, services)
    }

    #[actix_web::test]
    async fn seeding_is_idempotent() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();
        assert_eq!(counts(&pool).await, (3, 6, 5));
        seed_defaults(&pool).await.unwrap();
        assert_eq!(counts(&pool).await, (3, 6, 5));
    }

    #[actix_web::test]
    async fn barber_slots_round_trip_through_json_text() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        let barbers = list_barbers(&pool).await.unwrap();
        let carlos = barbers.iter().find(|b| b.username == "carlos").unwrap();
        assert_eq!(
            carlos.available_slots,
            ["09:00", "10:00", "11:00", "14:00", "15:00", "16:00"]
        );
        assert_eq!(carlos.barbershop_id, "barber-central");
    }

    #[actix_web::test]
    async fn barber_usernames_are_unique() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        let duplicate = sqlx::query(
            r#"INSERT INTO barbers
               (id, username, name, specialty, rating, experience, barbershop_id, available_slots, clients)
               VALUES ('b7', 'carlos', 'Otro Carlos', 'Fade', 4.5, '2 años', 'barber-sur', '[]', 0)"#,
        )
        .execute(&pool)
        .await;
        assert!(duplicate.is_err());
    }

    #[actix_web::test]
    async fn barber_requires_existing_barbershop() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        let orphan = sqlx::query(
            r#"INSERT INTO barbers
               (id, username, name, specialty, rating, experience, barbershop_id, available_slots, clients)
               VALUES ('b7', 'nuevo', 'Nuevo', 'Fade', 4.5, '2 años', 'no-such-shop', '[]', 0)"#,
        )
        .execute(&pool)
        .await;
        assert!(orphan.is_err());
    }

    #[actix_web::test]
    async fn booking_references_are_checked_at_the_storage_boundary() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        let new = NewBooking {
            service_id: Some("no-such-service".to_string()),
            barber_id: None,
            modality: Modality::Barbershop,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time: "09:00".to_string(),
            name: "Ana".to_string(),
            phone: "+1 555".to_string(),
            address: String::new(),
        };
        assert!(insert_booking(&pool, new).await.is_err());
    }

    #[actix_web::test]
    async fn booking_round_trips() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();

        let new = NewBooking {
            service_id: Some("paquete-vip".to_string()),
            barber_id: Some("b4".to_string()),
            modality: Modality::Home,
            date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            time: "16:00".to_string(),
            name: "Cliente VIP".to_string(),
            phone: "+1 444 555 6666".to_string(),
            address: "Calle Falsa 123, Piso 2".to_string(),
        };
        let created = insert_booking(&pool, new).await.unwrap();

        let stored = sqlx::query_as::<_, Booking>(
            r#"SELECT id, service_id, barber_id, modality, date, time, name, phone, address, created_at
               FROM bookings WHERE id = ?"#,
        )
        .bind(&created.id)
        .fetch_one(&pool)
        .await
        .unwrap();

        assert_eq!(stored.service_id.as_deref(), Some("paquete-vip"));
        assert_eq!(stored.modality, Modality::Home);
        assert_eq!(stored.date, NaiveDate::from_ymd_opt(2026, 9, 1).unwrap());
        assert_eq!(stored.address, "Calle Falsa 123, Piso 2");
    }

    #[actix_web::test]
    async fn wizard_runs_against_the_seeded_catalog() {
        let pool = test_pool().await;
        seed_defaults(&pool).await.unwrap();
        let catalog = load_catalog(&pool).await.unwrap();

        let mut wizard = BookingWizard::from_route(&catalog, Some("barber-central"), Some("carlos"));
        assert_eq!(wizard.total_steps(), 5);
        assert!(wizard.advance());
        assert!(wizard.select_service("corte-caballero"));
        assert!(wizard.advance());
        wizard.select_modality(Modality::Barbershop);
        assert!(wizard.advance());
        wizard.select_date("2026-09-01");
        assert!(wizard.select_time("09:00"));
        assert!(wizard.advance());
        wizard.set_name("Ana");
        wizard.set_phone("+1 555 000 1111");
        assert!(wizard.advance());

        let request = wizard.booking_request().unwrap();
        let created = insert_booking(&pool, request).await.unwrap();
        assert_eq!(created.barber_id.as_deref(), Some("b1"));
        assert_eq!(created.address, "");
    }
}
