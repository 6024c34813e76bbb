//! Canonical pipeline domain types.
//!
//! These replace the dynamically-typed dictionaries the original
//! implementation passed between stages (`Dict[str, Any]`) with fixed-schema
//! structs; enum fields reject unknown values at the deserialization
//! boundary (`RiskExtraction` in [`crate::risk_extraction`]) rather than
//! letting an unrecognised string silently propagate.

mod alert;
mod article;
mod company;
mod risk_event;
mod supplier;

pub use alert::{Alert, AlternateRec};
pub use article::Article;
pub use company::CompanyProfile;
pub use risk_event::{
    Confirmation, RiskEvent, RiskType, ScoreComponents, Severity, SeverityBand, TimeHorizon,
};
pub use supplier::{Supplier, SupplierStatus, UpstreamSupplier};
