//! Request/response surface for external drivers

pub mod request;

pub use request::{ErrorDetail, FilterSpec, Request, ResponseData, ResultEnvelope};
