//! Request construction and response interpretation for the fleet API.
//!
//! # Design
//! `FleetClient` holds the resolved API root URL and the injected
//! [`RequestSender`]; it carries no mutable state between calls, so a
//! single client can serve concurrent callers. Each operation builds a
//! request under the `fleet/v1` prefix, delegates the round-trip to the
//! sender, checks the status against the operation's accepted set, and
//! decodes the body when one is expected. Destroy-style operations never
//! touch the body.

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestSender};
use crate::types::{
    Machine, MachinesPage, Unit, UnitOption, UnitState, UnitStateFilter, UnitStatesPage, UnitsPage,
};

const API_PREFIX: &str = "fleet/v1/";
const UNITS_PATH: &str = "units";
const STATES_PATH: &str = "state";
const MACHINES_PATH: &str = "machines";

/// Body of a unit create/update request.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitPayload<'a> {
    desired_state: &'a str,
    options: &'a [UnitOption],
}

/// Body of a target-state change, desired state only.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TargetStatePayload<'a> {
    desired_state: &'a str,
}

/// Synchronous, stateless client for the fleet HTTP API.
///
/// Builds requests and interprets responses; the network round-trip itself
/// is performed by the injected sender. Every error is a per-call value —
/// nothing is retried or swallowed internally.
#[derive(Debug, Clone)]
pub struct FleetClient<S> {
    api_root: Url,
    sender: S,
}

impl<S: RequestSender> FleetClient<S> {
    /// Create a client for the API rooted at `base_url`, e.g.
    /// `http://fleet.example.com:4001/`. Fails with `InvalidUrl` before
    /// any network activity if the base does not parse.
    pub fn new(base_url: &str, sender: S) -> Result<Self, ApiError> {
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let api_root = Url::parse(&base)?.join(API_PREFIX)?;
        Ok(Self { api_root, sender })
    }

    /// List all units known to the cluster.
    pub fn units(&self) -> Result<Vec<Unit>, ApiError> {
        let request = self.request(HttpMethod::Get, UNITS_PATH, None)?;
        let response = self.send(&request)?;
        check_status(&response, &[200])?;
        let page: UnitsPage = decode_json(&response)?;
        Ok(page.units)
    }

    /// Fetch a single unit by name.
    pub fn unit(&self, name: &str) -> Result<Unit, ApiError> {
        let request = assemble(HttpMethod::Get, self.unit_url(name)?, None);
        let response = self.send(&request)?;
        check_resource_status(&response, &[200])?;
        decode_json(&response)
    }

    /// Create `unit` on the cluster, or update the desired state of an
    /// existing unit with the same name. The server answers 201 for a new
    /// unit and 204 for an update; neither carries a body we consume.
    pub fn create_unit(&self, unit: &Unit) -> Result<(), ApiError> {
        let body = encode_json(&UnitPayload {
            desired_state: &unit.desired_state,
            options: &unit.options,
        })?;
        let request = assemble(HttpMethod::Put, self.unit_url(&unit.name)?, Some(body));
        let response = self.send(&request)?;
        check_resource_status(&response, &[201, 204])
    }

    /// Change the desired state of an existing unit.
    pub fn set_target_state(&self, name: &str, desired_state: &str) -> Result<(), ApiError> {
        let body = encode_json(&TargetStatePayload { desired_state })?;
        let request = assemble(HttpMethod::Put, self.unit_url(name)?, Some(body));
        let response = self.send(&request)?;
        check_resource_status(&response, &[204])
    }

    /// Destroy the named unit. The response body is ignored regardless of
    /// content.
    pub fn destroy(&self, name: &str) -> Result<(), ApiError> {
        let request = assemble(HttpMethod::Delete, self.unit_url(name)?, None);
        let response = self.send(&request)?;
        check_resource_status(&response, &[204])
    }

    /// Return the run-time states of all units.
    pub fn unit_states(&self) -> Result<Vec<UnitState>, ApiError> {
        let url = self.api_root.join(STATES_PATH)?;
        self.unit_state_query(url)
    }

    /// Return unit states matching `filter`. Only non-empty filter fields
    /// become query parameters.
    pub fn unit_states_filtered(&self, filter: &UnitStateFilter) -> Result<Vec<UnitState>, ApiError> {
        let mut url = self.api_root.join(STATES_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            if !filter.unit_name.is_empty() {
                query.append_pair("unitName", &filter.unit_name);
            }
            if !filter.machine_id.is_empty() {
                query.append_pair("machineID", &filter.machine_id);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        self.unit_state_query(url)
    }

    /// List the cluster's member machines.
    pub fn machines(&self) -> Result<Vec<Machine>, ApiError> {
        let request = self.request(HttpMethod::Get, MACHINES_PATH, None)?;
        let response = self.send(&request)?;
        check_status(&response, &[200])?;
        let page: MachinesPage = decode_json(&response)?;
        Ok(page.machines)
    }

    fn unit_state_query(&self, url: Url) -> Result<Vec<UnitState>, ApiError> {
        let request = assemble(HttpMethod::Get, url, None);
        let response = self.send(&request)?;
        check_status(&response, &[200])?;
        let page: UnitStatesPage = decode_json(&response)?;
        Ok(page.states)
    }

    fn request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.api_root.join(path)?;
        Ok(assemble(method, url, body))
    }

    /// URL for the named unit, with the name percent-encoded as a single
    /// path segment so `/`, `?` or `#` in a name cannot rewrite the
    /// request target.
    fn unit_url(&self, name: &str) -> Result<Url, ApiError> {
        let mut url = self.api_root.join(UNITS_PATH)?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl("base URL cannot have segments".to_string()))?
            .push(name);
        Ok(url)
    }

    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!("{} {}", request.method.as_str(), request.url);
        Ok(self.sender.send(request)?)
    }
}

fn assemble(method: HttpMethod, url: Url, body: Option<String>) -> HttpRequest {
    HttpRequest {
        method,
        url,
        headers: vec![("Content-Type".to_string(), "application/json".to_string())],
        body,
    }
}

/// Map a response outside `accepted` to `UnexpectedStatus`. The body is
/// never read here.
fn check_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    if accepted.contains(&response.status) {
        return Ok(());
    }
    debug!("unexpected status {} {}", response.status, response.status_text);
    Err(ApiError::UnexpectedStatus {
        status: response.status,
        status_text: response.status_text.clone(),
    })
}

/// Status check for single-resource operations, where 404 means the named
/// unit does not exist. List operations keep the generic mapping.
fn check_resource_status(response: &HttpResponse, accepted: &[u16]) -> Result<(), ApiError> {
    match check_status(response, accepted) {
        Err(ApiError::UnexpectedStatus { status: 404, .. }) => Err(ApiError::NotFound),
        other => other,
    }
}

fn decode_json<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn encode_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}
