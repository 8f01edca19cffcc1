//! HTTP inbound adapter: transfer schemas and OpenAPI surface.

pub mod dtos;
pub mod schemas;

pub use dtos::{
    BookingResponse, CreateMessageRequest, CreateReviewRequest, DisputeOutcome,
    FieldValidationError, ResolveDisputeRequest, SuspendUserRequest,
};
