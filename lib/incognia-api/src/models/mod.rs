//! Request and response types of the Incognia API.
//!
//! Request types are plain structs with public fields, built with struct update
//! syntax over [`Default`]. Absent values and empty collections are never sent.
//! Response types ignore fields they do not know.

mod assessment;
mod common;
mod feedback;
mod onboarding;
mod transaction;

pub use self::assessment::{Assessment, Reason, ReasonSource};
pub use self::common::{
    AdditionalLocation, Address, Coordinates, CustomProperties, Location, PersonId,
    StructuredAddress,
};
pub use self::feedback::{FeedbackEvent, FeedbackIdentifiers};
pub use self::onboarding::{RegisterSignupRequest, RegisterWebSignupRequest, SignupAssessment};
pub use self::transaction::{
    AddressType, CardInfo, Coupon, PaymentMethod, PaymentType, PaymentValue,
    RegisterLoginRequest, RegisterPaymentRequest, RegisterWebLoginRequest, TransactionAddress,
    TransactionAssessment,
};

pub(crate) use self::feedback::FeedbackBody;
pub(crate) use self::onboarding::SignupBody;
pub(crate) use self::transaction::TransactionBody;
