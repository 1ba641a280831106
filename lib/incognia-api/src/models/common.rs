use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form properties attached to a request, sent only when not empty.
pub type CustomProperties = Map<String, Value>;

pub(crate) fn non_empty(properties: &CustomProperties) -> Option<&CustomProperties> {
    (!properties.is_empty()).then_some(properties)
}

pub(crate) fn non_empty_slice<T>(items: &[T]) -> Option<&[T]> {
    (!items.is_empty()).then_some(items)
}

/// A postal address, given as a single line, structured, geocoded, or any combination.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    /// The full address on a single line.
    pub address_line: Option<String>,
    /// The address split into its components.
    pub structured_address: Option<StructuredAddress>,
    /// The geographic position of the address.
    pub coordinates: Option<Coordinates>,
}

impl Address {
    /// Creates an address from a single line.
    pub fn from_line(address_line: impl Into<String>) -> Self {
        Self {
            address_line: Some(address_line.into()),
            ..Self::default()
        }
    }
}

/// The components of a postal address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuredAddress {
    /// The locale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// The country name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    /// ISO 3166-1 alpha-2 code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    /// The state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// The city.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// The borough.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borough: Option<String>,
    /// The neighborhood.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neighborhood: Option<String>,
    /// The street.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street: Option<String>,
    /// The street number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Apartment, floor, building, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complements: Option<String>,
    /// The postal code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

/// A geographic position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude, in degrees.
    pub lat: f64,
    /// Longitude, in degrees.
    pub lng: f64,
}

impl Coordinates {
    /// Creates coordinates.
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A location of the user collected outside of the Incognia SDK.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalLocation {
    /// Latitude, in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    /// Longitude, in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    /// When the location was collected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<Timestamp>,
}

/// The device location at the time of a transaction, as reported by the caller.
///
/// Values are sent as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The latitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
    /// The longitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    /// When the location was collected, as an RFC 3339 string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collected_at: Option<String>,
}

/// A personal identifier, like a national tax id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonId {
    /// The kind of identifier, `cpf` for instance.
    #[serde(rename = "type")]
    pub id_type: String,
    /// The identifier value.
    pub value: String,
}

impl PersonId {
    /// Creates an identifier of the given kind.
    pub fn new(id_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id_type: id_type.into(),
            value: value.into(),
        }
    }

    /// Creates a Brazilian CPF identifier.
    pub fn cpf(value: impl Into<String>) -> Self {
        Self::new("cpf", value)
    }
}
