//! End-to-end delivery over real loopback sockets

use std::sync::Arc;
use std::time::{Duration, Instant};

use serial_test::serial;

use worldsync_client::WorldStateClient;
use worldsync_core::{Message, SyncError, DEFAULT_PORT};
use worldsync_server::{DispatchGate, WorldStateServer};

const DELIVERY_DEADLINE: Duration = Duration::from_secs(2);

/// Poll the gate until one snapshot arrives or the deadline passes
fn wait_for_message(gate: &DispatchGate) -> Message {
    let deadline = Instant::now() + DELIVERY_DEADLINE;

    loop {
        if let Some(message) = gate.poll() {
            return message;
        }
        assert!(Instant::now() < deadline, "no snapshot within deadline");
        std::thread::sleep(Duration::from_millis(10));
    }
}

fn start_server() -> (Arc<DispatchGate>, WorldStateServer) {
    let gate = Arc::new(DispatchGate::new());
    let server = WorldStateServer::with_port(0, Arc::clone(&gate));
    server.start().unwrap();
    (gate, server)
}

#[test]
fn test_end_to_end_delivery() {
    let (gate, server) = start_server();

    let client = WorldStateClient::with_target(server.local_addr().unwrap());
    client.connect().unwrap();
    client
        .update()
        .set_time(6000)
        .set_paused(false)
        .set_raining(true)
        .push()
        .unwrap();

    let message = wait_for_message(&gate);
    assert_eq!(message, Message::new(6000, false, true));
    assert!(!message.paused);

    // exactly once
    std::thread::sleep(Duration::from_millis(100));
    assert!(gate.poll().is_none());

    client.disconnect();
    server.stop();
}

#[test]
fn test_paused_survives_the_wire() {
    let (gate, server) = start_server();

    let client = WorldStateClient::with_target(server.local_addr().unwrap());
    client.connect().unwrap();
    client.update().set_time(12000).set_paused(true).push().unwrap();

    let message = wait_for_message(&gate);
    assert_eq!(message.time, 12000);
    assert!(message.paused);

    client.disconnect();
    server.stop();
}

#[test]
fn test_malformed_datagram_does_not_kill_listener() {
    let (gate, server) = start_server();
    let addr = server.local_addr().unwrap();

    // undersized payloads must be swallowed by the pipeline
    let raw = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    raw.send_to(&[], addr).unwrap();
    raw.send_to(&[0x01], addr).unwrap();
    raw.send_to(&[0x01, 0x02, 0x03], addr).unwrap();

    let client = WorldStateClient::with_target(addr);
    client.connect().unwrap();
    client.update().set_time(42).push().unwrap();

    let message = wait_for_message(&gate);
    assert_eq!(message.time, 42);

    client.disconnect();
    server.stop();
}

#[test]
fn test_in_arrival_order_dispatch() {
    let (gate, server) = start_server();

    let client = WorldStateClient::with_target(server.local_addr().unwrap());
    client.connect().unwrap();

    for tick in [100u16, 200, 300] {
        client.update().set_time(tick).push().unwrap();
    }

    // loopback UDP from a single socket arrives in order in practice
    let mut seen = Vec::new();
    let deadline = Instant::now() + DELIVERY_DEADLINE;
    while seen.len() < 3 && Instant::now() < deadline {
        gate.drain(|message| seen.push(message.time));
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(seen, vec![100, 200, 300]);

    client.disconnect();
    server.stop();
}

#[test]
fn test_reconnect_cycle_delivers_again() {
    let (gate, server) = start_server();
    let addr = server.local_addr().unwrap();

    let client = WorldStateClient::with_target(addr);
    client.connect().unwrap();
    client.update().set_time(1).push().unwrap();
    assert_eq!(wait_for_message(&gate).time, 1);

    client.disconnect();
    let result = client.update().set_time(2).push();
    assert!(matches!(result, Err(SyncError::NotConnected)));

    client.connect().unwrap();
    client.update().set_time(3).push().unwrap();
    assert_eq!(wait_for_message(&gate).time, 3);

    client.disconnect();
    server.stop();
}

#[test]
fn test_stop_releases_port_for_rebind() {
    let (_gate, server) = start_server();
    let port = server.local_addr().unwrap().port();
    server.stop();

    // the freed port must be immediately bindable again
    let gate = Arc::new(DispatchGate::new());
    let second = WorldStateServer::with_port(port, gate);
    second.start().unwrap();
    second.stop();
}

#[test]
#[serial]
fn test_well_known_port_end_to_end() {
    let gate = Arc::new(DispatchGate::new());
    let server = WorldStateServer::new(Arc::clone(&gate));
    server.start().unwrap();
    assert_eq!(server.local_addr().unwrap().port(), DEFAULT_PORT);

    // default client target matches the default server binding
    let client = WorldStateClient::new();
    client.connect().unwrap();
    client.update().set_time(23999).set_raining(true).push().unwrap();

    let message = wait_for_message(&gate);
    assert_eq!(message, Message::new(23999, false, true));

    client.disconnect();
    server.stop();
}
