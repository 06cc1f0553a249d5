//! Domain DTOs for the fleet API.
//!
//! # Design
//! These types mirror the fleet HTTP API's wire shapes but are defined
//! independently from the mock-server crate; integration tests catch schema
//! drift. Field names are camelCase on the wire and empty optional fields
//! are omitted by the server, so every string field decodes leniently to
//! `""` when absent.
//!
//! List endpoints wrap their payload in an envelope object with a single
//! named array. The page records below model that envelope so it never
//! leaks into the public types; `FleetClient` returns the inner `Vec`
//! directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A unit definition as known to the cluster, an immutable snapshot per
/// request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub current_state: String,
    #[serde(default)]
    pub desired_state: String,
    /// Empty until the scheduler has placed the unit on a machine.
    #[serde(default, rename = "machineID")]
    pub machine_id: String,
    /// Ordered as in the unit file; order is preserved through decode.
    #[serde(default)]
    pub options: Vec<UnitOption>,
}

/// One configuration directive within a unit's definition, analogous to a
/// line in a systemd unit file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOption {
    pub name: String,
    pub section: String,
    pub value: String,
}

/// A machine's observed run-time status report for a unit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitState {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub hash: String,
    #[serde(default, rename = "machineID", skip_serializing_if = "String::is_empty")]
    pub machine_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub systemd_active_state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub systemd_load_state: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub systemd_sub_state: String,
}

/// Filter for the unit-state query. An empty field means "no filter on
/// that dimension" and produces no query parameter at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitStateFilter {
    pub unit_name: String,
    pub machine_id: String,
}

/// A member machine of the cluster.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    #[serde(default)]
    pub id: String,
    #[serde(default, rename = "primaryIP")]
    pub primary_ip: String,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitsPage {
    #[serde(default)]
    pub units: Vec<Unit>,
    /// Accepted so a token-bearing response still decodes; pagination is
    /// never followed.
    #[serde(default)]
    #[allow(dead_code)]
    pub next_page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UnitStatesPage {
    #[serde(default)]
    pub states: Vec<UnitState>,
    #[serde(default)]
    #[allow(dead_code)]
    pub next_page_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MachinesPage {
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    #[allow(dead_code)]
    pub next_page_token: String,
}
