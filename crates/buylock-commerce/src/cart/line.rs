//! Cart line types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::ids::{LineItemId, ProductId, ServiceId, VendorId};

/// One entry in the guest cart.
///
/// Serialized in camelCase so the persisted collection matches what the web
/// storefront writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// Line identifier, assigned when the line was created.
    pub id: LineItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    pub quantity: u32,
    /// Booking details for service lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appointment: Option<Appointment>,
    /// Product record as it was when the line was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<CatalogSnapshot>,
    /// Service record as it was when the line was added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<CatalogSnapshot>,
}

impl CartLine {
    /// Whether `item` refers to the same product or service as this line.
    pub fn refers_to_same(&self, item: &NewCartLine) -> bool {
        let same_product = self.product_id.is_some() && self.product_id == item.product_id;
        let same_service = self.service_id.is_some() && self.service_id == item.service_id;
        same_product || same_service
    }

    /// Snapshot the price is read from: the product, else the service.
    pub fn snapshot(&self) -> Option<&CatalogSnapshot> {
        self.product.as_ref().or(self.service.as_ref())
    }

    /// Unit price in the base currency, if the snapshot carries a usable one.
    pub fn unit_price(&self) -> Option<f64> {
        self.snapshot()?.price.as_ref()?.value().ok()
    }

    /// Quantity times unit price, with a missing price counting as zero.
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price().unwrap_or(0.0)
    }

    /// Display name from the snapshot.
    pub fn name(&self) -> Option<&str> {
        self.snapshot().map(|s| s.name.as_str()).filter(|n| !n.is_empty())
    }
}

/// An item on its way into the cart; the cart assigns the line id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCartLine {
    pub product_id: Option<ProductId>,
    pub service_id: Option<ServiceId>,
    pub quantity: u32,
    pub appointment: Option<Appointment>,
    pub product: Option<CatalogSnapshot>,
    pub service: Option<CatalogSnapshot>,
}

impl NewCartLine {
    /// A product line.
    pub fn product(product_id: impl Into<ProductId>, quantity: u32) -> Self {
        Self {
            product_id: Some(product_id.into()),
            quantity,
            ..Self::default()
        }
    }

    /// A service booking line.
    pub fn service(service_id: impl Into<ServiceId>, quantity: u32) -> Self {
        Self {
            service_id: Some(service_id.into()),
            quantity,
            ..Self::default()
        }
    }

    /// Attach the catalog record; stored as the product or service snapshot
    /// depending on which reference is set.
    pub fn with_snapshot(mut self, snapshot: CatalogSnapshot) -> Self {
        if self.product_id.is_some() {
            self.product = Some(snapshot);
        } else {
            self.service = Some(snapshot);
        }
        self
    }

    /// Attach booking details.
    pub fn with_appointment(mut self, appointment: Appointment) -> Self {
        self.appointment = Some(appointment);
        self
    }

    pub(crate) fn into_line(self, id: LineItemId) -> CartLine {
        CartLine {
            id,
            product_id: self.product_id,
            service_id: self.service_id,
            quantity: self.quantity,
            appointment: self.appointment,
            product: self.product,
            service: self.service,
        }
    }
}

/// Booking details for a service line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub date: NaiveDate,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Denormalized catalog record captured when the line was added.
///
/// Only the fields the cart reads are typed; everything else the catalog
/// sent is kept in `extra` and written back unchanged. The typed fields are
/// read leniently so one oddly shaped record cannot make the stored cart
/// unreadable: numeric ids become strings, `null` counts as absent, and a
/// price that is neither a number nor a string is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(
        default,
        deserialize_with = "lenient::price",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Amount>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_id: Option<VendorId>,
    #[serde(
        default,
        deserialize_with = "lenient::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl CatalogSnapshot {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: impl Into<Amount>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price: Some(price.into()),
            ..Self::default()
        }
    }
}

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::amount::Amount;

    fn text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(text(Value::deserialize(d)?).unwrap_or_default())
    }

    pub fn optional<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: From<String>,
    {
        Ok(text(Value::deserialize(d)?).map(T::from))
    }

    pub fn price<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Amount>, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Number(n) => n.as_f64().map(Amount::Number),
            Value::String(s) => Some(Amount::Text(s)),
            _ => None,
        })
    }
}

/// `HH:MM` times, the format booking forms submit.
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| {
            NaiveTime::parse_from_str(&s, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
                .map_err(serde::de::Error::custom)
        })
        .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_same_reference_matching() {
        let line = NewCartLine::product("p1", 1).into_line(LineItemId::new("l1"));

        assert!(line.refers_to_same(&NewCartLine::product("p1", 3)));
        assert!(!line.refers_to_same(&NewCartLine::product("p2", 3)));
        assert!(!line.refers_to_same(&NewCartLine::service("p1", 1)));
    }

    #[test]
    fn test_unit_price_from_string_snapshot() {
        let line = NewCartLine::product("p1", 2)
            .with_snapshot(CatalogSnapshot::new("p1", "Kikoy", "1250.50"))
            .into_line(LineItemId::new("l1"));

        assert_eq!(line.unit_price(), Some(1250.5));
        assert_eq!(line.subtotal(), 2501.0);
        assert_eq!(line.name(), Some("Kikoy"));
    }

    #[test]
    fn test_missing_price_is_zero() {
        let mut snapshot = CatalogSnapshot::new("p1", "Basket", 0.0);
        snapshot.price = None;
        let priced_none = NewCartLine::product("p1", 4)
            .with_snapshot(snapshot)
            .into_line(LineItemId::new("l1"));
        let no_snapshot = NewCartLine::product("p2", 4).into_line(LineItemId::new("l2"));

        assert_eq!(priced_none.subtotal(), 0.0);
        assert_eq!(no_snapshot.subtotal(), 0.0);
    }

    #[test]
    fn test_service_line_wire_format() {
        let line: CartLine = serde_json::from_value(json!({
            "id": "l9",
            "serviceId": "s1",
            "quantity": 1,
            "appointment": {
                "date": "2026-11-02",
                "time": "14:30",
                "durationMinutes": 60,
                "notes": "Gate B"
            },
            "service": {
                "id": "s1",
                "name": "Home cleaning",
                "price": 3500,
                "vendorId": "v7",
                "category": "cleaning"
            }
        }))
        .unwrap();

        let appointment = line.appointment.clone().unwrap();
        assert_eq!(appointment.time, NaiveTime::from_hms_opt(14, 30, 0));
        assert_eq!(line.unit_price(), Some(3500.0));

        let service = line.service.clone().unwrap();
        assert_eq!(service.extra.get("category"), Some(&json!("cleaning")));

        let written = serde_json::to_value(&line).unwrap();
        assert_eq!(written["appointment"]["time"], json!("14:30"));
        assert_eq!(written["service"]["category"], json!("cleaning"));
        assert!(written.get("productId").is_none());
    }

    #[test]
    fn test_loosely_typed_snapshot_fields() {
        let snapshot: CatalogSnapshot = serde_json::from_value(json!({
            "id": 42,
            "name": null,
            "price": {"amount": 100},
            "vendorId": 7,
            "imageUrl": null
        }))
        .unwrap();

        assert_eq!(snapshot.id, "42");
        assert_eq!(snapshot.name, "");
        assert_eq!(snapshot.price, None);
        assert_eq!(snapshot.vendor_id, Some(VendorId::new("7")));
        assert_eq!(snapshot.image_url, None);

        let missing: CatalogSnapshot = serde_json::from_value(json!({})).unwrap();
        assert_eq!(missing, CatalogSnapshot::default());
    }
}
