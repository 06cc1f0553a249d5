//! In-memory stand-in for the fleet HTTP API, used by integration tests
//! and runnable standalone. Serves `/fleet/v1/units`, `/fleet/v1/state`
//! and `/fleet/v1/machines` with the same envelope-wrapped list responses
//! as the real registry. Units converge instantly: a scheduled unit's
//! current state mirrors its desired state.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

const MACHINE_ID: &str = "9f08c99f7d9a304499004fd01891b396";
const MACHINE_IP: &str = "192.0.2.13";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub name: String,
    pub current_state: String,
    pub desired_state: String,
    #[serde(rename = "machineID")]
    pub machine_id: String,
    pub options: Vec<UnitOption>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitOption {
    pub name: String,
    pub section: String,
    pub value: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitState {
    pub hash: String,
    #[serde(rename = "machineID")]
    pub machine_id: String,
    pub name: String,
    pub systemd_active_state: String,
    pub systemd_load_state: String,
    pub systemd_sub_state: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Machine {
    pub id: String,
    #[serde(rename = "primaryIP")]
    pub primary_ip: String,
    pub metadata: BTreeMap<String, String>,
}

/// Body of `PUT /fleet/v1/units/{name}`: desired state plus the unit file
/// options, absent on a bare target-state change.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutUnit {
    pub desired_state: String,
    #[serde(default)]
    pub options: Vec<UnitOption>,
}

#[derive(Deserialize)]
pub struct StateQuery {
    #[serde(rename = "unitName")]
    pub unit_name: Option<String>,
    #[serde(rename = "machineID")]
    pub machine_id: Option<String>,
}

#[derive(Serialize)]
struct UnitsPage {
    units: Vec<Unit>,
}

#[derive(Serialize)]
struct StatesPage {
    states: Vec<UnitState>,
}

#[derive(Serialize)]
struct MachinesPage {
    machines: Vec<Machine>,
}

pub type Db = Arc<RwLock<BTreeMap<String, Unit>>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(BTreeMap::new()));
    Router::new()
        .route("/fleet/v1/units", get(list_units))
        .route(
            "/fleet/v1/units/{name}",
            get(get_unit).put(put_unit).delete(delete_unit),
        )
        .route("/fleet/v1/state", get(list_states))
        .route("/fleet/v1/machines", get(list_machines))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_units(State(db): State<Db>) -> Json<UnitsPage> {
    let units = db.read().await;
    Json(UnitsPage {
        units: units.values().cloned().collect(),
    })
}

async fn get_unit(
    State(db): State<Db>,
    Path(name): Path<String>,
) -> Result<Json<Unit>, StatusCode> {
    let units = db.read().await;
    units.get(&name).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn put_unit(
    State(db): State<Db>,
    Path(name): Path<String>,
    Json(input): Json<PutUnit>,
) -> StatusCode {
    let mut units = db.write().await;
    match units.get_mut(&name) {
        Some(unit) => {
            unit.current_state = input.desired_state.clone();
            unit.desired_state = input.desired_state;
            if !input.options.is_empty() {
                unit.options = input.options;
            }
            StatusCode::NO_CONTENT
        }
        None => {
            let unit = Unit {
                name: name.clone(),
                current_state: input.desired_state.clone(),
                desired_state: input.desired_state,
                machine_id: MACHINE_ID.to_string(),
                options: input.options,
            };
            units.insert(name, unit);
            StatusCode::CREATED
        }
    }
}

async fn delete_unit(State(db): State<Db>, Path(name): Path<String>) -> StatusCode {
    let mut units = db.write().await;
    match units.remove(&name) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn list_states(
    State(db): State<Db>,
    Query(query): Query<StateQuery>,
) -> Json<StatesPage> {
    let units = db.read().await;
    let states = units
        .values()
        .filter(|unit| match &query.unit_name {
            Some(name) => &unit.name == name,
            None => true,
        })
        .filter(|unit| match &query.machine_id {
            Some(id) => &unit.machine_id == id,
            None => true,
        })
        .map(state_of)
        .collect();
    Json(StatesPage { states })
}

async fn list_machines() -> Json<MachinesPage> {
    let mut metadata = BTreeMap::new();
    metadata.insert("region".to_string(), "local".to_string());
    Json(MachinesPage {
        machines: vec![Machine {
            id: MACHINE_ID.to_string(),
            primary_ip: MACHINE_IP.to_string(),
            metadata,
        }],
    })
}

fn state_of(unit: &Unit) -> UnitState {
    let (active, sub) = if unit.desired_state == "launched" {
        ("active", "running")
    } else {
        ("inactive", "dead")
    };
    UnitState {
        hash: format!("{:040x}", unit.name.bytes().map(u64::from).sum::<u64>()),
        machine_id: unit.machine_id.clone(),
        name: unit.name.clone(),
        systemd_active_state: active.to_string(),
        systemd_load_state: "loaded".to_string(),
        systemd_sub_state: sub.to_string(),
    }
}
