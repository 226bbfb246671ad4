use serde::{Deserialize, Serialize};

use crate::pending_salons::PendingSalonModel;

/// The listing draft as submitted by the frontend.
///
/// This is the shape carried in the checkout session's `form_data` metadata
/// entry (camelCase JSON) and, equivalently, reconstructed from a
/// `pending_salons` row on the fallback path. Every field is optional: a
/// degraded resolution produces `SalonPayload::default()` and the required
/// fields are checked later, in one place, by the resolver's validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SalonPayload {
    pub salon_name: Option<String>,
    pub description_en: Option<String>,
    pub description_vi: Option<String>,
    pub reason_for_selling: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub asking_price: Option<String>,
    pub monthly_rent: Option<String>,
    pub monthly_revenue: Option<String>,
    pub square_footage: Option<String>,
    pub station_count: Option<String>,
    pub has_parking: Option<bool>,
    pub has_laundry: Option<bool>,
    pub has_wax_room: Option<bool>,
    pub photos: Vec<String>,
}

impl From<PendingSalonModel> for SalonPayload {
    fn from(row: PendingSalonModel) -> Self {
        Self {
            salon_name: row.salon_name,
            description_en: row.description_en,
            description_vi: row.description_vi,
            reason_for_selling: row.reason_for_selling,
            address: row.address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            phone: row.phone,
            email: row.email,
            asking_price: row.asking_price,
            monthly_rent: row.monthly_rent,
            monthly_revenue: row.monthly_revenue,
            square_footage: row.square_footage,
            station_count: row.station_count,
            has_parking: row.has_parking,
            has_laundry: row.has_laundry,
            has_wax_room: row.has_wax_room,
            photos: row.photos,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn pending_row() -> PendingSalonModel {
        PendingSalonModel {
            id: Uuid::new_v4(),
            user_id: Some("user-1".into()),
            salon_name: Some("Lotus Nails".into()),
            description_en: None,
            description_vi: None,
            reason_for_selling: None,
            address: None,
            city: Some("Austin".into()),
            state: Some("TX".into()),
            zip_code: None,
            phone: None,
            email: None,
            asking_price: Some("150000".into()),
            monthly_rent: None,
            monthly_revenue: None,
            square_footage: None,
            station_count: None,
            has_parking: None,
            has_laundry: None,
            has_wax_room: None,
            photos: vec!["a.jpg".into(), "b.jpg".into()],
            created_at: Utc::now(),
        }
    }

    /// A pending row and a form_data blob with the same values must resolve
    /// to the same payload.
    #[test]
    fn pending_row_maps_like_form_data() {
        let from_row = SalonPayload::from(pending_row());

        let from_json: SalonPayload = serde_json::from_str(
            r#"{
                "salonName": "Lotus Nails",
                "city": "Austin",
                "state": "TX",
                "askingPrice": "150000",
                "photos": ["a.jpg", "b.jpg"]
            }"#,
        )
        .unwrap();

        assert_eq!(from_row, from_json);
    }

    #[test]
    fn unknown_and_missing_fields_are_tolerated() {
        let payload: SalonPayload =
            serde_json::from_str(r#"{"salonName": "Orchid Spa", "somethingNew": 7}"#).unwrap();
        assert_eq!(payload.salon_name.as_deref(), Some("Orchid Spa"));
        assert!(payload.photos.is_empty());
    }
}
