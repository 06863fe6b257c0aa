use serde::{Deserialize, Serialize};

use super::RemoteError;
use crate::models::AppointmentStatus;

/// Doctor row as the hosted backend stores it (flat name + specialty text).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteDoctor {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub image: Option<String>,
    pub rating: f64,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteSpecialty {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteAppointment {
    pub id: String,
    pub user_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub location: Option<String>,
    pub status: AppointmentStatus,
    pub created_at: String,
}

/// Insert payload; the backend assigns id and created_at.
#[derive(Debug, Clone, Serialize)]
pub struct NewRemoteAppointment {
    pub user_id: String,
    pub doctor_id: String,
    pub date: String,
    pub time: String,
    pub location: Option<String>,
    pub status: AppointmentStatus,
}

/// Row-level status filter rendered as a PostgREST query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Still-open bookings: pending or confirmed.
    Upcoming,
    /// Settled bookings: completed or cancelled.
    Past,
    Exact(AppointmentStatus),
}

impl StatusFilter {
    pub(crate) fn to_query(self) -> (String, String) {
        let value = match self {
            Self::Upcoming => "in.(pending,confirmed)".to_string(),
            Self::Past => "in.(completed,cancelled)".to_string(),
            Self::Exact(status) => format!("eq.{}", status.as_str()),
        };
        ("status".to_string(), value)
    }
}

/// Blocking HTTP client for the hosted relational backend.
pub struct RemoteClient {
    base_url: String,
    api_key: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl RemoteClient {
    pub fn new(base_url: &str, api_key: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
            timeout_secs,
        }
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn map_send_error(&self, e: reqwest::Error) -> RemoteError {
        if e.is_connect() {
            RemoteError::Connection(self.base_url.clone())
        } else if e.is_timeout() {
            RemoteError::Timeout(self.timeout_secs)
        } else {
            RemoteError::HttpClient(e.to_string())
        }
    }

    fn check_status(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(RemoteError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    fn get_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<T>, RemoteError> {
        let response = self
            .client
            .get(self.endpoint(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response)?
            .json()
            .map_err(|e| RemoteError::ResponseParsing(e.to_string()))
    }

    /// All doctors, name-ordered.
    pub fn list_doctors(&self) -> Result<Vec<RemoteDoctor>, RemoteError> {
        self.get_rows(
            "doctors",
            &[("order".to_string(), "name.asc".to_string())],
        )
    }

    pub fn list_doctors_by_specialty(
        &self,
        specialty: &str,
    ) -> Result<Vec<RemoteDoctor>, RemoteError> {
        self.get_rows(
            "doctors",
            &[
                ("specialty".to_string(), format!("eq.{specialty}")),
                ("order".to_string(), "name.asc".to_string()),
            ],
        )
    }

    pub fn list_specialties(&self) -> Result<Vec<RemoteSpecialty>, RemoteError> {
        self.get_rows(
            "specialties",
            &[("order".to_string(), "name.asc".to_string())],
        )
    }

    /// A user's appointments, optionally narrowed by a status filter,
    /// date-ascending.
    pub fn list_appointments(
        &self,
        user_id: &str,
        filter: Option<StatusFilter>,
    ) -> Result<Vec<RemoteAppointment>, RemoteError> {
        let mut query = vec![
            ("user_id".to_string(), format!("eq.{user_id}")),
            ("order".to_string(), "date.asc".to_string()),
        ];
        if let Some(filter) = filter {
            query.push(filter.to_query());
        }
        self.get_rows("appointments", &query)
    }

    /// Insert a booking and return the stored row.
    pub fn create_appointment(
        &self,
        new: &NewRemoteAppointment,
    ) -> Result<RemoteAppointment, RemoteError> {
        let response = self
            .client
            .post(self.endpoint("appointments"))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Prefer", "return=representation")
            .json(&[new])
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let mut rows: Vec<RemoteAppointment> = Self::check_status(response)?
            .json()
            .map_err(|e| RemoteError::ResponseParsing(e.to_string()))?;

        rows.pop()
            .ok_or_else(|| RemoteError::ResponseParsing("empty insert response".to_string()))
    }

    pub fn update_appointment_status(
        &self,
        id: &str,
        status: AppointmentStatus,
    ) -> Result<(), RemoteError> {
        let response = self
            .client
            .patch(self.endpoint("appointments"))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&[("id", format!("eq.{id}"))])
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .map_err(|e| self.map_send_error(e))?;

        Self::check_status(response)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = RemoteClient::new("https://api.example.com/", "key", 30);
        assert_eq!(
            client.endpoint("appointments"),
            "https://api.example.com/rest/v1/appointments"
        );
    }

    #[test]
    fn status_filters_render_postgrest_syntax() {
        assert_eq!(
            StatusFilter::Upcoming.to_query(),
            ("status".to_string(), "in.(pending,confirmed)".to_string())
        );
        assert_eq!(
            StatusFilter::Past.to_query(),
            ("status".to_string(), "in.(completed,cancelled)".to_string())
        );
        assert_eq!(
            StatusFilter::Exact(AppointmentStatus::Confirmed).to_query(),
            ("status".to_string(), "eq.confirmed".to_string())
        );
    }

    #[test]
    fn remote_appointment_decodes_backend_row() {
        let raw = r#"{
            "id": "a1",
            "user_id": "u1",
            "doctor_id": "d1",
            "date": "2030-01-15",
            "time": "09:00",
            "location": "Main clinic",
            "status": "confirmed",
            "created_at": "2029-12-01T10:00:00Z"
        }"#;
        let appt: RemoteAppointment = serde_json::from_str(raw).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Confirmed);
        assert_eq!(appt.location.as_deref(), Some("Main clinic"));
    }

    #[test]
    fn remote_doctor_decodes_with_missing_optionals() {
        let raw = r#"{
            "id": "d1",
            "name": "Dr. Grace Hopper",
            "specialty": "Cardiology",
            "image": null,
            "rating": 4.8,
            "location": null
        }"#;
        let doctor: RemoteDoctor = serde_json::from_str(raw).unwrap();
        assert_eq!(doctor.name, "Dr. Grace Hopper");
        assert!(doctor.image.is_none());
    }

    #[test]
    fn new_appointment_serializes_status_lowercase() {
        let new = NewRemoteAppointment {
            user_id: "u1".to_string(),
            doctor_id: "d1".to_string(),
            date: "2030-01-15".to_string(),
            time: "09:00".to_string(),
            location: None,
            status: AppointmentStatus::Pending,
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn connection_error_maps_to_connection_variant() {
        // Nothing listens on this port; connect must fail fast
        let client = RemoteClient::new("http://127.0.0.1:1", "key", 2);
        let err = client.list_doctors().unwrap_err();
        assert!(
            matches!(err, RemoteError::Connection(_) | RemoteError::HttpClient(_)),
            "got {err:?}"
        );
    }
}
