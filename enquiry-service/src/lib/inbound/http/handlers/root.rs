use std::collections::BTreeMap;

use axum::http::StatusCode;
use serde::Serialize;

use super::ApiSuccess;

const SERVICE_NAME: &str = "Enquiry Service";
const SERVICE_DESCRIPTION: &str = "Contact enquiries and administrator account management";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub service: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub status: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

pub async fn root() -> ApiSuccess<ServiceDescriptor> {
    let endpoints = BTreeMap::from([
        ("health", "GET /health"),
        ("submit_enquiry", "POST /enquiry"),
        ("list_enquiries", "GET /enquiries"),
        ("get_enquiry", "GET /enquiries/:id"),
        ("create_user", "POST /create-user"),
        ("sign_in", "POST /auth/signin"),
        ("login", "POST /auth/login"),
        ("refresh_token", "POST /auth/refresh"),
        ("list_users", "GET /users"),
    ]);

    ApiSuccess::new(
        StatusCode::OK,
        format!("Welcome to {}", SERVICE_NAME),
        ServiceDescriptor {
            service: SERVICE_NAME,
            version: env!("CARGO_PKG_VERSION"),
            description: SERVICE_DESCRIPTION,
            status: "running",
            endpoints,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthData {
    pub status: &'static str,
}

pub async fn health() -> ApiSuccess<HealthData> {
    ApiSuccess::new(
        StatusCode::OK,
        "Service is running",
        HealthData { status: "healthy" },
    )
}
