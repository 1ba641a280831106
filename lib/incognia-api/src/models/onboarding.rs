use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::common::{non_empty, non_empty_slice};
use super::{
    AdditionalLocation, Address, Assessment, Coordinates, CustomProperties, PersonId, Reason,
    StructuredAddress,
};

/// A signup made from a mobile application running the Incognia SDK.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterSignupRequest {
    /// The installation id reported by the SDK.
    pub installation_id: Option<String>,
    /// The request token generated by the SDK.
    pub request_token: Option<String>,
    /// The version of the calling application.
    pub app_version: Option<String>,
    /// The device operating system, sent lower-cased.
    pub device_os: Option<String>,
    /// The address declared by the user.
    pub address: Option<Address>,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// The assessment policy to apply.
    pub policy_id: Option<String>,
    /// The account created by the signup.
    pub account_id: Option<String>,
    /// Locations collected outside of the SDK.
    pub additional_locations: Vec<AdditionalLocation>,
    /// Free-form properties of the signup.
    pub custom_properties: CustomProperties,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
}

/// A signup made from a web page running the Incognia web SDK.
///
/// A request token or a session token is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterWebSignupRequest {
    /// The session token, for older web SDK versions.
    pub session_token: Option<String>,
    /// The request token generated by the web SDK.
    pub request_token: Option<String>,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// The assessment policy to apply.
    pub policy_id: Option<String>,
    /// The account created by the signup.
    pub account_id: Option<String>,
    /// Free-form properties of the signup.
    pub custom_properties: CustomProperties,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
}

/// The body of `POST onboarding/signups`.
#[derive(Debug, Default, Serialize)]
pub(crate) struct SignupBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    installation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_line: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_os: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    structured_address: Option<&'a StructuredAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    address_coordinates: Option<&'a Coordinates>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    additional_locations: Option<&'a [AdditionalLocation]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_id: Option<&'a PersonId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_properties: Option<&'a CustomProperties>,
}

impl<'a> From<&'a RegisterSignupRequest> for SignupBody<'a> {
    fn from(request: &'a RegisterSignupRequest) -> Self {
        let address = request.address.as_ref();
        Self {
            installation_id: request.installation_id.as_deref(),
            request_token: request.request_token.as_deref(),
            app_version: request.app_version.as_deref(),
            device_os: request.device_os.as_deref().map(str::to_lowercase),
            address_line: address.and_then(|it| it.address_line.as_deref()),
            structured_address: address.and_then(|it| it.structured_address.as_ref()),
            address_coordinates: address.and_then(|it| it.coordinates.as_ref()),
            external_id: request.external_id.as_deref(),
            policy_id: request.policy_id.as_deref(),
            account_id: request.account_id.as_deref(),
            additional_locations: non_empty_slice(&request.additional_locations),
            person_id: request.person_id.as_ref(),
            custom_properties: non_empty(&request.custom_properties),
            ..Self::default()
        }
    }
}

impl<'a> From<&'a RegisterWebSignupRequest> for SignupBody<'a> {
    fn from(request: &'a RegisterWebSignupRequest) -> Self {
        Self {
            session_token: request.session_token.as_deref(),
            request_token: request.request_token.as_deref(),
            external_id: request.external_id.as_deref(),
            policy_id: request.policy_id.as_deref(),
            account_id: request.account_id.as_deref(),
            person_id: request.person_id.as_ref(),
            custom_properties: non_empty(&request.custom_properties),
            ..Self::default()
        }
    }
}

/// The assessment of a signup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupAssessment {
    /// The id of the signup, used to send feedback.
    pub id: Uuid,
    /// The id of the assessment request.
    #[serde(default)]
    pub request_id: Option<Uuid>,
    /// The risk of the signup.
    pub risk_assessment: Assessment,
    /// The reasons behind the assessment.
    #[serde(default)]
    pub reasons: Vec<Reason>,
    /// The raw evidence the assessment is based on.
    #[serde(default)]
    pub evidence: Map<String, Value>,
    /// The id of the device, when known.
    #[serde(default)]
    pub device_id: Option<String>,
}
