//! Full unit lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP with a ureq-backed `RequestSender`. Validates
//! that request building, envelope unwrapping and status interpretation
//! work end-to-end with an actual server.

use std::net::SocketAddr;

use fleet_core::{
    ApiError, FleetClient, HttpMethod, HttpRequest, HttpResponse, RequestSender, TransportError,
    Unit, UnitOption, UnitStateFilter,
};

/// `RequestSender` backed by ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// handle status interpretation. The body is read to completion before
/// returning, releasing the connection on every path.
struct UreqSender {
    agent: ureq::Agent,
}

impl UreqSender {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl RequestSender for UreqSender {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url.as_str();
        let result = match (&request.method, &request.body) {
            (HttpMethod::Get, _) => self.agent.get(url).call(),
            (HttpMethod::Delete, _) => self.agent.delete(url).call(),
            (HttpMethod::Put, Some(body)) => self
                .agent
                .put(url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Put, None) => self.agent.put(url).send_empty(),
            (HttpMethod::Post, Some(body)) => self
                .agent
                .post(url)
                .content_type("application/json")
                .send(body.as_bytes()),
            (HttpMethod::Post, None) => self.agent.post(url).send_empty(),
        };

        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;
        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            headers: Vec::new(),
            body,
        })
    }
}

/// Boot the mock server on a random port on a background thread and return
/// its address.
fn start_mock_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn unit_lifecycle() {
    let addr = start_mock_server();
    let client = FleetClient::new(&format!("http://{addr}/"), UreqSender::new()).unwrap();

    // Step 1: list — no units scheduled yet.
    let units = client.units().unwrap();
    assert!(units.is_empty(), "expected empty unit list");

    // Step 2: create a unit with ordered options.
    let unit = Unit {
        name: "foo.service".to_string(),
        desired_state: "launched".to_string(),
        options: vec![
            UnitOption {
                name: "Description".to_string(),
                section: "Unit".to_string(),
                value: "integration fixture".to_string(),
            },
            UnitOption {
                name: "ExecStart".to_string(),
                section: "Service".to_string(),
                value: "/usr/bin/sleep infinity".to_string(),
            },
        ],
        ..Unit::default()
    };
    client.create_unit(&unit).unwrap();

    // Step 3: list — one unit, options in original order.
    let units = client.units().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].name, "foo.service");
    assert_eq!(units[0].options.len(), 2);
    assert_eq!(units[0].options[0].name, "Description");
    assert_eq!(units[0].options[1].name, "ExecStart");

    // Step 4: fetch the unit directly.
    let fetched = client.unit("foo.service").unwrap();
    assert_eq!(fetched.desired_state, "launched");
    assert!(!fetched.machine_id.is_empty(), "expected a scheduled unit");

    // Step 5: all unit states report the unit running.
    let states = client.unit_states().unwrap();
    assert_eq!(states.len(), 1);
    assert_eq!(states[0].name, "foo.service");
    assert_eq!(states[0].systemd_active_state, "active");
    assert_eq!(states[0].systemd_sub_state, "running");

    // Step 6: filtering by name matches, filtering by a foreign machine
    // does not.
    let filter = UnitStateFilter {
        unit_name: "foo.service".to_string(),
        ..UnitStateFilter::default()
    };
    let states = client.unit_states_filtered(&filter).unwrap();
    assert_eq!(states.len(), 1);

    let filter = UnitStateFilter {
        machine_id: "0000000000000000000000000000dead".to_string(),
        ..UnitStateFilter::default()
    };
    let states = client.unit_states_filtered(&filter).unwrap();
    assert!(states.is_empty());

    // Step 7: the cluster reports its machines.
    let machines = client.machines().unwrap();
    assert_eq!(machines.len(), 1);
    assert_eq!(machines[0].id, fetched.machine_id);
    assert!(!machines[0].primary_ip.is_empty());

    // Step 8: wind the unit down and observe the state change.
    client.set_target_state("foo.service", "inactive").unwrap();
    let states = client.unit_states().unwrap();
    assert_eq!(states[0].systemd_active_state, "inactive");
    assert_eq!(states[0].systemd_sub_state, "dead");

    // Step 9: destroy.
    client.destroy("foo.service").unwrap();

    // Step 10: fetch after destroy — NotFound.
    let err = client.unit("foo.service").unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 11: destroy again — NotFound.
    let err = client.destroy("foo.service").unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 12: list — empty again.
    let units = client.units().unwrap();
    assert!(units.is_empty(), "expected empty list after destroy");
}

#[test]
fn unreachable_server_is_a_transport_error() {
    // Bind and immediately drop a listener so the port is closed.
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };

    let client = FleetClient::new(&format!("http://{addr}/"), UreqSender::new()).unwrap();
    let err = client.units().unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
