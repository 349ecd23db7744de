use crate::models::{Barber, Barbershop, Service};

/// Read-only snapshot of the three catalog collections. The wizard receives
/// one of these as explicit input instead of reaching for shared state, so
/// the booking core stays pure and testable without a database.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub barbershops: Vec<Barbershop>,
    pub barbers: Vec<Barber>,
    pub services: Vec<Service>,
}

impl Catalog {
    pub fn barbershop(&self, id: &str) -> Option<&Barbershop> {
        self.barbershops.iter().find(|shop| shop.id == id)
    }

    /// Barbers working at the given shop, in catalog order.
    pub fn barbers_for_shop<'a>(&'a self, shop_id: &str) -> Vec<&'a Barber> {
        self.barbers
            .iter()
            .filter(|barber| barber.barbershop_id == shop_id)
            .collect()
    }

    /// Resolves the `?barber=<username>` route parameter within a shop.
    pub fn barber_by_username(&self, shop_id: &str, username: &str) -> Option<&Barber> {
        self.barbers
            .iter()
            .find(|barber| barber.barbershop_id == shop_id && barber.username == username)
    }

    pub fn service(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|service| service.id == id)
    }
}
