use crate::auth::types::{Credential, Role};
use crate::common::errors::ApiError;
use crate::models::{
    Appointment, AppointmentPatch, AppointmentStatus, BookingIntent, Service, TimeSlot,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::sync::RwLock;
use std::time::Duration;

/// Logical API endpoint a request targets.
///
/// Failures carry their endpoint to the session guard, which matches it
/// against the configured allow-list of user-action endpoints when
/// deciding whether a rejection may invalidate the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Auth,
    Services,
    Availability,
    Appointments,
}

impl Endpoint {
    pub fn path(&self) -> &'static str {
        match self {
            Endpoint::Auth => "/auth",
            Endpoint::Services => "/services",
            Endpoint::Availability => "/availability",
            Endpoint::Appointments => "/appointments",
        }
    }
}

/// Abstract contract over the booking service.
///
/// The application core talks to the remote collaborator exclusively
/// through this trait so workflows can be exercised against a test double.
/// An empty slot list from `get_availability` is a valid result meaning
/// "no openings", not an error.
#[async_trait]
pub trait BookingApi: Send + Sync {
    /// Installs the default credential attached to subsequent requests.
    fn set_bearer(&self, token: &str);

    /// Removes the default credential. Called from the session teardown
    /// path and from explicit logout only.
    fn clear_bearer(&self);

    async fn list_services(&self) -> Result<Vec<Service>, ApiError>;

    async fn get_availability(
        &self,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, ApiError>;

    async fn create_appointment(&self, intent: &BookingIntent) -> Result<Appointment, ApiError>;

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ApiError>;

    async fn update_appointment(
        &self,
        id: i64,
        patch: &AppointmentPatch,
    ) -> Result<Appointment, ApiError>;

    async fn cancel_appointment(&self, id: i64) -> Result<Appointment, ApiError> {
        self.update_appointment(id, &AppointmentPatch::status(AppointmentStatus::Cancelled))
            .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError>;

    async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Credential, ApiError>;
}

// Response envelopes as the booking server shapes them.

#[derive(Debug, Deserialize)]
struct ServicesResponse {
    services: Vec<Service>,
}

#[derive(Debug, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    available_slots: Vec<TimeSlot>,
}

#[derive(Debug, Deserialize)]
struct AppointmentsResponse {
    appointments: Vec<Appointment>,
}

#[derive(Debug, Deserialize)]
struct AppointmentEnvelope {
    appointment: Appointment,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    access_token: String,
    user: crate::auth::types::UserProfile,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP client for the booking API.
///
/// Wraps every request with the configured base path, JSON headers and the
/// current default credential. Attaching the credential is the only thing
/// this client adds on the way out; failure classification happens above
/// it in the session guard.
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
    bearer: RwLock<Option<String>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to build HTTP client: {e}")))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            base_url,
            http,
            bearer: RwLock::new(None),
        })
    }

    pub fn has_bearer(&self) -> bool {
        self.bearer.read().map(|b| b.is_some()).unwrap_or(false)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decorates an outgoing request with the current credential, if one
    /// is installed. Pure apart from the returned builder.
    fn with_bearer(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.bearer.read() {
            Ok(bearer) => match bearer.as_deref() {
                Some(token) => builder.bearer_auth(token),
                None => builder,
            },
            Err(_) => builder,
        }
    }

    async fn send<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = self
            .with_bearer(builder)
            .send()
            .await
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))?;

        if !status.is_success() {
            let rejection = rejected_from_body(status.as_u16(), &body);
            log::warn!("{} request rejected: {rejection}", endpoint.path());
            return Err(rejection);
        }

        serde_json::from_str(&body).map_err(|e| {
            ApiError::InvalidResponse(format!("{} response undecodable: {e}", endpoint.path()))
        })
    }
}

/// Builds a [`ApiError::Rejected`] from a failure status and raw body,
/// preferring the server's `error`/`message` text and keeping its machine
/// code when present.
fn rejected_from_body(status: u16, body: &str) -> ApiError {
    let parsed = serde_json::from_str::<ErrorBody>(body).unwrap_or_default();
    let message = parsed
        .error
        .or(parsed.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("Request failed with status {status}"));
    ApiError::Rejected {
        status,
        code: parsed.code,
        message,
    }
}

#[async_trait]
impl BookingApi for ApiClient {
    fn set_bearer(&self, token: &str) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = Some(token.to_string());
        }
    }

    fn clear_bearer(&self) {
        if let Ok(mut bearer) = self.bearer.write() {
            *bearer = None;
        }
    }

    async fn list_services(&self) -> Result<Vec<Service>, ApiError> {
        let builder = self.http.get(self.url("/services"));
        let response: ServicesResponse = self.send(Endpoint::Services, builder).await?;
        Ok(response.services)
    }

    async fn get_availability(
        &self,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<TimeSlot>, ApiError> {
        let builder = self.http.get(self.url("/availability")).query(&[
            ("service_id", service_id.to_string()),
            ("date", date.format("%Y-%m-%d").to_string()),
        ]);
        let response: AvailabilityResponse = self.send(Endpoint::Availability, builder).await?;
        Ok(response.available_slots)
    }

    async fn create_appointment(&self, intent: &BookingIntent) -> Result<Appointment, ApiError> {
        let builder = self.http.post(self.url("/appointments")).json(intent);
        let response: AppointmentEnvelope = self.send(Endpoint::Appointments, builder).await?;
        Ok(response.appointment)
    }

    async fn list_appointments(
        &self,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>, ApiError> {
        let mut builder = self.http.get(self.url("/appointments"));
        if let Some(status) = status {
            builder = builder.query(&[("status", status.as_str())]);
        }
        let response: AppointmentsResponse = self.send(Endpoint::Appointments, builder).await?;
        Ok(response.appointments)
    }

    async fn update_appointment(
        &self,
        id: i64,
        patch: &AppointmentPatch,
    ) -> Result<Appointment, ApiError> {
        let builder = self
            .http
            .put(self.url(&format!("/appointments/{id}")))
            .json(patch);
        let response: AppointmentEnvelope = self.send(Endpoint::Appointments, builder).await?;
        Ok(response.appointment)
    }

    async fn login(&self, email: &str, password: &str) -> Result<Credential, ApiError> {
        let builder = self
            .http
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }));
        let response: AuthResponse = self.send(Endpoint::Auth, builder).await?;
        Ok(Credential::new(response.access_token, response.user))
    }

    async fn register(
        &self,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Credential, ApiError> {
        let builder = self.http.post(self.url("/auth/register")).json(
            &serde_json::json!({ "email": email, "password": password, "role": role.as_str() }),
        );
        let response: AuthResponse = self.send(Endpoint::Auth, builder).await?;
        Ok(Credential::new(response.access_token, response.user))
    }
}
