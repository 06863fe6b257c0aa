//! Hosted-backend binding: the same conceptual contract as the local
//! store (doctors / appointments / specialties), spoken to a hosted
//! relational API with PostgREST-style row filters. Parallel to the local
//! flow, not wired into it. Deployments that sync against a hosted backend
//! swap this client in behind the same operations.

pub mod client;

pub use client::{
    NewRemoteAppointment, RemoteAppointment, RemoteClient, RemoteDoctor, RemoteSpecialty,
    StatusFilter,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Cannot reach backend at {0}")]
    Connection(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Response parsing failed: {0}")]
    ResponseParsing(String),

    #[error("HTTP client error: {0}")]
    HttpClient(String),
}
