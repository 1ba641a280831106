use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::common::{non_empty, non_empty_slice};
use super::{
    Address, Assessment, Coordinates, CustomProperties, Location, PersonId, Reason,
    StructuredAddress,
};

/// A login made from a mobile application running the Incognia SDK.
///
/// The account id is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterLoginRequest {
    /// The installation id reported by the SDK.
    pub installation_id: Option<String>,
    /// The request token generated by the SDK.
    pub request_token: Option<String>,
    /// The account logging in.
    pub account_id: String,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// The assessment policy to apply.
    pub policy_id: Option<String>,
    /// The version of the calling application.
    pub app_version: Option<String>,
    /// The device operating system, sent lower-cased.
    pub device_os: Option<String>,
    /// Another account involved in the login.
    pub related_account_id: Option<String>,
    /// Free-form properties of the login.
    pub custom_properties: CustomProperties,
    /// The device location, when collected by the caller.
    pub location: Option<Location>,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
    /// Sent as the `eval` query parameter: `false` registers the login without assessing it.
    pub evaluate_transaction: Option<bool>,
}

/// A login made from a web page running the Incognia web SDK.
///
/// The account id, and a request token or a session token, are required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterWebLoginRequest {
    /// The account logging in.
    pub account_id: String,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// The session token, for older web SDK versions.
    pub session_token: Option<String>,
    /// The request token generated by the web SDK.
    pub request_token: Option<String>,
    /// The assessment policy to apply.
    pub policy_id: Option<String>,
    /// Free-form properties of the login.
    pub custom_properties: CustomProperties,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
    /// Sent as the `eval` query parameter.
    pub evaluate_transaction: Option<bool>,
}

/// A payment made from a mobile application running the Incognia SDK.
///
/// The account id is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterPaymentRequest {
    /// The installation id reported by the SDK.
    pub installation_id: Option<String>,
    /// The request token generated by the SDK.
    pub request_token: Option<String>,
    /// The version of the calling application.
    pub app_version: Option<String>,
    /// The device operating system, sent lower-cased.
    pub device_os: Option<String>,
    /// The paying account.
    pub account_id: String,
    /// An id of the user in the calling system.
    pub external_id: Option<String>,
    /// The assessment policy to apply.
    pub policy_id: Option<String>,
    /// The store receiving the payment.
    pub store_id: Option<String>,
    /// The addresses of the payment, sent in insertion order.
    pub addresses: IndexMap<AddressType, Address>,
    /// How the payment is made.
    pub payment_methods: Vec<PaymentMethod>,
    /// Free-form properties of the payment.
    pub custom_properties: CustomProperties,
    /// The amount paid.
    pub payment_value: Option<PaymentValue>,
    /// The device location, when collected by the caller.
    pub location: Option<Location>,
    /// A coupon applied to the payment.
    pub coupon: Option<Coupon>,
    /// A personal identifier of the user.
    pub person_id: Option<PersonId>,
    /// Sent as the `eval` query parameter: `false` registers the payment without assessing it.
    pub evaluate_transaction: Option<bool>,
}

/// The role of an address in a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressType {
    /// Where the order is delivered.
    Shipping,
    /// The address of the payment method owner.
    Billing,
    /// The address of the user.
    Home,
}

/// An address of a payment, as sent on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAddress {
    /// The role of the address.
    #[serde(rename = "type")]
    pub address_type: AddressType,
    /// The full address on a single line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line: Option<String>,
    /// The address split into its components.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_address: Option<StructuredAddress>,
    /// The geographic position of the address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_coordinates: Option<Coordinates>,
}

impl TransactionAddress {
    /// Creates a transaction address from an address and its role.
    pub fn new(address_type: AddressType, address: &Address) -> Self {
        Self {
            address_type,
            address_line: address.address_line.clone(),
            structured_address: address.structured_address.clone(),
            address_coordinates: address.coordinates,
        }
    }
}

/// The amount of a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentValue {
    /// The amount, in `currency` units.
    pub amount: f64,
    /// ISO 4217 code, like `BRL`.
    pub currency: String,
}

/// The kind of a payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum PaymentType {
    AccountBalance,
    ApplePay,
    Bancolombia,
    BoletoBancario,
    Cash,
    CreditCard,
    DebitCard,
    GooglePay,
    MealVoucher,
    NuPay,
    Paypal,
    Pix,
}

/// Non-sensitive data of a payment card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardInfo {
    /// The first digits of the card number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bin: Option<String>,
    /// The last four digits of the card number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_four_digits: Option<String>,
    /// The expiry year, like `2027`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_year: Option<String>,
    /// The expiry month, like `03`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_month: Option<String>,
}

/// A payment method used in a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethod {
    /// The kind of payment method.
    #[serde(rename = "type")]
    pub payment_type: PaymentType,
    /// Set for [`PaymentType::CreditCard`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credit_card_info: Option<CardInfo>,
    /// Set for [`PaymentType::DebitCard`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debit_card_info: Option<CardInfo>,
}

impl PaymentMethod {
    /// Creates a payment method without card data.
    pub fn new(payment_type: PaymentType) -> Self {
        Self {
            payment_type,
            credit_card_info: None,
            debit_card_info: None,
        }
    }
}

/// A discount coupon applied to a payment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    /// The kind of discount, like `percent_off` or `fixed_value`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub coupon_type: Option<String>,
    /// The discount, as a percentage or a value depending on the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// The upper bound of the discount value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_discount: Option<f64>,
    /// The coupon id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The coupon name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum TransactionType {
    #[default]
    Login,
    Payment,
}

/// The body of `POST authentication/transactions`.
#[derive(Debug, Default, Serialize)]
pub(crate) struct TransactionBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    installation_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_version: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_os: Option<String>,
    account_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    session_token: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    policy_id: Option<&'a str>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    store_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    external_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    related_account_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    location: Option<&'a Location>,
    #[serde(skip_serializing_if = "Option::is_none")]
    coupon: Option<&'a Coupon>,
    #[serde(skip_serializing_if = "Option::is_none")]
    person_id: Option<&'a PersonId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    addresses: Vec<TransactionAddress>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_value: Option<&'a PaymentValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payment_methods: Option<&'a [PaymentMethod]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    custom_properties: Option<&'a CustomProperties>,
}

impl<'a> From<&'a RegisterLoginRequest> for TransactionBody<'a> {
    fn from(request: &'a RegisterLoginRequest) -> Self {
        Self {
            installation_id: request.installation_id.as_deref(),
            request_token: request.request_token.as_deref(),
            app_version: request.app_version.as_deref(),
            location: request.location.as_ref(),
            device_os: request.device_os.as_deref().map(str::to_lowercase),
            account_id: &request.account_id,
            external_id: request.external_id.as_deref(),
            policy_id: request.policy_id.as_deref(),
            related_account_id: request.related_account_id.as_deref(),
            custom_properties: non_empty(&request.custom_properties),
            person_id: request.person_id.as_ref(),
            transaction_type: TransactionType::Login,
            ..Self::default()
        }
    }
}

impl<'a> From<&'a RegisterWebLoginRequest> for TransactionBody<'a> {
    fn from(request: &'a RegisterWebLoginRequest) -> Self {
        Self {
            account_id: &request.account_id,
            external_id: request.external_id.as_deref(),
            session_token: request.session_token.as_deref(),
            request_token: request.request_token.as_deref(),
            policy_id: request.policy_id.as_deref(),
            custom_properties: non_empty(&request.custom_properties),
            person_id: request.person_id.as_ref(),
            transaction_type: TransactionType::Login,
            ..Self::default()
        }
    }
}

impl<'a> From<&'a RegisterPaymentRequest> for TransactionBody<'a> {
    fn from(request: &'a RegisterPaymentRequest) -> Self {
        let addresses = request
            .addresses
            .iter()
            .map(|(address_type, address)| TransactionAddress::new(*address_type, address))
            .collect();

        Self {
            installation_id: request.installation_id.as_deref(),
            request_token: request.request_token.as_deref(),
            app_version: request.app_version.as_deref(),
            device_os: request.device_os.as_deref().map(str::to_lowercase),
            account_id: &request.account_id,
            external_id: request.external_id.as_deref(),
            policy_id: request.policy_id.as_deref(),
            transaction_type: TransactionType::Payment,
            addresses,
            payment_value: request.payment_value.as_ref(),
            payment_methods: non_empty_slice(&request.payment_methods),
            location: request.location.as_ref(),
            store_id: request.store_id.as_deref(),
            custom_properties: non_empty(&request.custom_properties),
            coupon: request.coupon.as_ref(),
            person_id: request.person_id.as_ref(),
            ..Self::default()
        }
    }
}

/// The assessment of a login or a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionAssessment {
    /// The id of the transaction, used to send feedback.
    pub id: Uuid,
    /// The risk of the transaction.
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
    /// The installation id, when known.
    #[serde(default)]
    pub installation_id: Option<String>,
}
