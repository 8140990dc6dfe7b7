use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Aircraft {
    #[default]
    #[serde(rename = "ATR")]
    Atr,
    #[serde(rename = "Airbus 320")]
    Airbus320,
    #[serde(rename = "Boeing 737 Max")]
    Boeing737Max,
}

impl Aircraft {
    pub const ALL: [Aircraft; 3] = [Aircraft::Atr, Aircraft::Airbus320, Aircraft::Boeing737Max];

    pub fn label(&self) -> &'static str {
        match self {
            Aircraft::Atr => "ATR",
            Aircraft::Airbus320 => "Airbus 320",
            Aircraft::Boeing737Max => "Boeing 737 Max",
        }
    }

    pub fn next(&self) -> Aircraft {
        match self {
            Aircraft::Atr => Aircraft::Airbus320,
            Aircraft::Airbus320 => Aircraft::Boeing737Max,
            Aircraft::Boeing737Max => Aircraft::Atr,
        }
    }

    pub fn prev(&self) -> Aircraft {
        match self {
            Aircraft::Atr => Aircraft::Boeing737Max,
            Aircraft::Airbus320 => Aircraft::Atr,
            Aircraft::Boeing737Max => Aircraft::Airbus320,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoucherRequest {
    pub name: String,
    pub id: String,
    #[serde(rename = "flightNumber")]
    pub flight_number: String,
    pub date: String,
    pub aircraft: Aircraft,
}

// The backend multiplexes regeneration over the generate endpoint.
#[derive(Debug, Serialize)]
pub struct RegenerateRequest {
    #[serde(flatten)]
    pub voucher: VoucherRequest,
    pub is_regenerate: bool,
    #[serde(rename = "updated_seat")]
    pub updated_seats: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckRequest {
    #[serde(rename = "flightNumber")]
    pub flight_number: String,
    pub date: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    pub exists: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    pub seats: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Form,
    Loading,
    Results,
    SelectingSeats,
    Regenerating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    CrewName,
    CrewId,
    FlightNumber,
    Date,
    Aircraft,
}

impl FormField {
    pub const ORDER: [FormField; 5] = [
        FormField::CrewName,
        FormField::CrewId,
        FormField::FlightNumber,
        FormField::Date,
        FormField::Aircraft,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::CrewName => "Crew Name",
            FormField::CrewId => "Crew ID",
            FormField::FlightNumber => "Flight Number",
            FormField::Date => "Flight Date",
            FormField::Aircraft => "Aircraft Type",
        }
    }

    pub fn next(&self) -> FormField {
        match self {
            FormField::CrewName => FormField::CrewId,
            FormField::CrewId => FormField::FlightNumber,
            FormField::FlightNumber => FormField::Date,
            FormField::Date => FormField::Aircraft,
            FormField::Aircraft => FormField::CrewName,
        }
    }

    pub fn prev(&self) -> FormField {
        match self {
            FormField::CrewName => FormField::Aircraft,
            FormField::CrewId => FormField::CrewName,
            FormField::FlightNumber => FormField::CrewId,
            FormField::Date => FormField::FlightNumber,
            FormField::Aircraft => FormField::Date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aircraft_serializes_with_wire_labels() {
        assert_eq!(
            serde_json::to_string(&Aircraft::Atr).unwrap(),
            "\"ATR\""
        );
        assert_eq!(
            serde_json::to_string(&Aircraft::Airbus320).unwrap(),
            "\"Airbus 320\""
        );
        assert_eq!(
            serde_json::to_string(&Aircraft::Boeing737Max).unwrap(),
            "\"Boeing 737 Max\""
        );
    }

    #[test]
    fn aircraft_cycle_wraps_both_ways() {
        assert_eq!(Aircraft::Atr.next(), Aircraft::Airbus320);
        assert_eq!(Aircraft::Boeing737Max.next(), Aircraft::Atr);
        assert_eq!(Aircraft::Atr.prev(), Aircraft::Boeing737Max);
    }

    #[test]
    fn voucher_request_uses_backend_field_names() {
        let request = VoucherRequest {
            name: "Jane Doe".to_string(),
            id: "C123".to_string(),
            flight_number: "FL100".to_string(),
            date: "2024-05-01".to_string(),
            aircraft: Aircraft::Atr,
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["flightNumber"], "FL100");
        assert_eq!(json["name"], "Jane Doe");
        assert_eq!(json["id"], "C123");
        assert_eq!(json["date"], "2024-05-01");
        assert_eq!(json["aircraft"], "ATR");
    }

    #[test]
    fn regenerate_request_flattens_voucher_fields() {
        let request = RegenerateRequest {
            voucher: VoucherRequest {
                name: "Jane Doe".to_string(),
                id: "C123".to_string(),
                flight_number: "FL100".to_string(),
                date: "2024-05-01".to_string(),
                aircraft: Aircraft::Airbus320,
            },
            is_regenerate: true,
            updated_seats: vec!["1B".to_string()],
        };

        let json: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(json["flightNumber"], "FL100");
        assert_eq!(json["is_regenerate"], true);
        assert_eq!(json["updated_seat"][0], "1B");
    }
}
