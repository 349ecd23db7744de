use chrono::{Datelike, Days, Local, NaiveDate};

use crate::catalog::Catalog;
use crate::models::{Barber, Barbershop, Modality, NewBooking, Service};

/// Fixed surcharge applied to home visits.
pub const HOME_SURCHARGE: f64 = 10.0;

const WEEKDAYS: [&str; 7] = ["Dom", "Lun", "Mar", "Mié", "Jue", "Vie", "Sáb"];
const MONTHS: [&str; 12] = [
    "ene", "feb", "mar", "abr", "may", "jun", "jul", "ago", "sep", "oct", "nov", "dic",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Landing,
    Shop,
    Barber,
    Service,
    Modality,
    Schedule,
    Contact,
    Confirm,
}

// The three flows share one transition shape; route context decides which
// selection steps remain. With both a shop and a barber resolved from the
// route, the wizard is the five-step service-only variant.
const FULL_FLOW: &[Step] = &[
    Step::Landing,
    Step::Shop,
    Step::Barber,
    Step::Service,
    Step::Modality,
    Step::Schedule,
    Step::Contact,
    Step::Confirm,
];
const SHOP_FLOW: &[Step] = &[
    Step::Landing,
    Step::Barber,
    Step::Service,
    Step::Modality,
    Step::Schedule,
    Step::Contact,
    Step::Confirm,
];
const BARBER_FLOW: &[Step] = &[
    Step::Landing,
    Step::Service,
    Step::Modality,
    Step::Schedule,
    Step::Contact,
    Step::Confirm,
];

#[derive(Debug, Clone, Default)]
pub struct Selections {
    pub barbershop: Option<Barbershop>,
    pub barber: Option<Barber>,
    pub service: Option<Service>,
    pub modality: Option<Modality>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// One entry of the five-day booking window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateOption {
    pub day: &'static str,
    pub number: u32,
    pub full: String,
    pub month: &'static str,
}

/// Linear booking flow: selection state, step position and the derived views
/// the presentation layer renders from. Catalog access goes through the
/// injected snapshot only.
pub struct BookingWizard<'a> {
    catalog: &'a Catalog,
    flow: &'static [Step],
    step: usize,
    selections: Selections,
}

impl<'a> BookingWizard<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        BookingWizard {
            catalog,
            flow: FULL_FLOW,
            step: 0,
            selections: Selections::default(),
        }
    }

    /// Resolves `?barbershop=<id>` and `&barber=<username>` route context
    /// before step 0. Unknown identifiers degrade to the shallower flow.
    pub fn from_route(
        catalog: &'a Catalog,
        shop_id: Option<&str>,
        barber_username: Option<&str>,
    ) -> Self {
        let mut wizard = BookingWizard::new(catalog);

        let Some(shop) = shop_id.and_then(|id| catalog.barbershop(id)) else {
            return wizard;
        };
        wizard.selections.barbershop = Some(shop.clone());
        wizard.flow = SHOP_FLOW;

        if let Some(barber) =
            barber_username.and_then(|username| catalog.barber_by_username(&shop.id, username))
        {
            wizard.selections.barber = Some(barber.clone());
            wizard.flow = BARBER_FLOW;
        }

        wizard
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn step_index(&self) -> usize {
        self.step
    }

    pub fn current_step(&self) -> Step {
        self.flow[self.step]
    }

    /// Index of the terminal (confirmation) step.
    pub fn total_steps(&self) -> usize {
        self.flow.len() - 1
    }

    /// Moves forward one step, clamped at the terminal index. Progress past an
    /// incomplete step is refused rather than left to the caller.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() || self.step >= self.total_steps() {
            return false;
        }
        self.step += 1;
        true
    }

    /// Moves back one step. At step 0 with barber route context, retreating
    /// pops the barber (and its slot) and re-opens barber selection for the
    /// shop; otherwise step 0 is a no-op.
    pub fn retreat(&mut self) {
        if self.step > 0 {
            self.step -= 1;
            return;
        }
        if self.flow == BARBER_FLOW {
            self.selections.barber = None;
            self.selections.time = None;
            self.flow = SHOP_FLOW;
        }
    }

    /// Completeness of the step about to be left.
    pub fn can_advance(&self) -> bool {
        match self.current_step() {
            Step::Landing | Step::Confirm => true,
            Step::Shop => self.selections.barbershop.is_some(),
            Step::Barber => self.selections.barber.is_some(),
            Step::Service => self.selections.service.is_some(),
            Step::Modality => self.selections.modality.is_some(),
            Step::Schedule => self.selections.date.is_some() && self.selections.time.is_some(),
            Step::Contact => {
                let has_basic_info = !self.selections.name.trim().is_empty()
                    && !self.selections.phone.trim().is_empty();
                if self.selections.modality == Some(Modality::Home) {
                    has_basic_info && !self.selections.address.trim().is_empty()
                } else {
                    has_basic_info
                }
            }
        }
    }

    /// Selecting a shop invalidates any previously chosen barber and slot.
    pub fn select_barbershop(&mut self, id: &str) -> bool {
        let Some(shop) = self.catalog.barbershop(id) else {
            return false;
        };
        self.selections.barbershop = Some(shop.clone());
        self.selections.barber = None;
        self.selections.time = None;
        true
    }

    /// Selecting a barber invalidates any previously chosen slot. The barber
    /// must work at the selected shop.
    pub fn select_barber(&mut self, id: &str) -> bool {
        let Some(shop) = self.selections.barbershop.as_ref() else {
            return false;
        };
        let barber = self
            .catalog
            .barbers
            .iter()
            .find(|barber| barber.id == id && barber.barbershop_id == shop.id);
        let Some(barber) = barber else {
            return false;
        };
        self.selections.barber = Some(barber.clone());
        self.selections.time = None;
        true
    }

    pub fn select_service(&mut self, id: &str) -> bool {
        let Some(service) = self.catalog.service(id) else {
            return false;
        };
        self.selections.service = Some(service.clone());
        true
    }

    /// An on-premises booking has no delivery address.
    pub fn select_modality(&mut self, modality: Modality) {
        if modality == Modality::Barbershop {
            self.selections.address.clear();
        }
        self.selections.modality = Some(modality);
    }

    pub fn select_date(&mut self, date: &str) {
        self.selections.date = Some(date.to_string());
    }

    /// The slot must come from the selected barber's schedule.
    pub fn select_time(&mut self, time: &str) -> bool {
        if !self.available_time_slots().iter().any(|slot| slot == time) {
            return false;
        }
        self.selections.time = Some(time.to_string());
        true
    }

    pub fn set_name(&mut self, name: &str) {
        self.selections.name = name.to_string();
    }

    pub fn set_phone(&mut self, phone: &str) {
        self.selections.phone = phone.to_string();
    }

    pub fn set_address(&mut self, address: &str) {
        self.selections.address = address.to_string();
    }

    /// Barbers of the selected shop, in catalog order. Empty without a shop.
    pub fn available_barbers(&self) -> Vec<&Barber> {
        match &self.selections.barbershop {
            Some(shop) => self.catalog.barbers_for_shop(&shop.id),
            None => Vec::new(),
        }
    }

    /// The selected barber's slots verbatim. Empty without a barber.
    pub fn available_time_slots(&self) -> &[String] {
        self.selections
            .barber
            .as_ref()
            .map(|barber| barber.available_slots.as_slice())
            .unwrap_or(&[])
    }

    pub fn total_price(&self) -> f64 {
        match &self.selections.service {
            Some(service) => {
                let surcharge = if self.selections.modality == Some(Modality::Home) {
                    HOME_SURCHARGE
                } else {
                    0.0
                };
                service.price + surcharge
            }
            None => 0.0,
        }
    }

    /// Human-readable reservation summary, formatted for the messaging deep
    /// link. The address line appears only for home visits.
    pub fn share_message(&self) -> String {
        let s = &self.selections;
        let shop = s.barbershop.as_ref().map(|shop| shop.name.as_str()).unwrap_or("");
        let barber = s.barber.as_ref().map(|barber| barber.name.as_str()).unwrap_or("");
        let service = s.service.as_ref().map(|service| service.name.as_str()).unwrap_or("");
        let price = s.service.as_ref().map(|service| format_price(service.price)).unwrap_or_default();
        let duration = s.service.as_ref().map(|service| service.duration).unwrap_or(0);
        let modality = s.modality.map(|modality| modality.label()).unwrap_or("");
        let address_line = if s.modality == Some(Modality::Home) {
            format!("🏠 *Dirección:* {}", s.address)
        } else {
            String::new()
        };
        let date = s.date.as_deref().unwrap_or("");
        let time = s.time.as_deref().unwrap_or("");

        format!(
            "🪒 *RESERVA MASTER BARBER*\n\n\
             🏢 *Sucursal:* {shop}\n\
             ✂️ *Barbero:* {barber}\n\n\
             📋 *Servicio:* {service}\n\
             💰 *Precio:* ${price}\n\
             ⏱️ *Duración:* {duration} min\n\n\
             📍 *Modalidad:* {modality}\n\
             {address_line}\n\n\
             📅 *Fecha:* {date}\n\
             🕐 *Hora:* {time}\n\n\
             👤 *Cliente:* {name}\n\
             📞 *Teléfono:* {phone}\n\n\
             _Confirmación pendiente_",
            name = s.name,
            phone = s.phone,
        )
    }

    /// Messaging deep link carrying the percent-encoded share message. The
    /// destination number is deployment configuration.
    pub fn share_link(&self, phone_number: &str) -> String {
        format!(
            "https://wa.me/{}?text={}",
            phone_number,
            urlencoding::encode(&self.share_message())
        )
    }

    /// Maps the current selections onto the create-booking shape. `None`
    /// until modality, date and time are all chosen.
    pub fn booking_request(&self) -> Option<NewBooking> {
        let s = &self.selections;
        let date = NaiveDate::parse_from_str(s.date.as_deref()?, "%Y-%m-%d").ok()?;
        Some(NewBooking {
            service_id: s.service.as_ref().map(|service| service.id.clone()),
            barber_id: s.barber.as_ref().map(|barber| barber.id.clone()),
            modality: s.modality?,
            date,
            time: s.time.clone()?,
            name: s.name.clone(),
            phone: s.phone.clone(),
            address: s.address.clone(),
        })
    }
}

/// The next five calendar days starting today. A snapshot of the current
/// date, not a rolling window.
pub fn upcoming_dates() -> Vec<DateOption> {
    upcoming_dates_from(Local::now().date_naive())
}

pub fn upcoming_dates_from(start: NaiveDate) -> Vec<DateOption> {
    (0u64..5)
        .filter_map(|offset| start.checked_add_days(Days::new(offset)))
        .map(|date| DateOption {
            day: WEEKDAYS[date.weekday().num_days_from_sunday() as usize],
            number: date.day(),
            full: date.format("%Y-%m-%d").to_string(),
            month: MONTHS[date.month0() as usize],
        })
        .collect()
}

fn format_price(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{}", price as i64)
    } else {
        format!("{price}")
    }
}
