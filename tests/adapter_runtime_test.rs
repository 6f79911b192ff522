use std::time::{Duration, Instant};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use fusegrid::adapter::protocol::{create_ack, create_hello, PROTOCOL_VERSION};
use fusegrid::adapter::{Adapter, InboundPayload, OutboundMessage, ServerConfig};

fn local_config(port: u16) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..ServerConfig::default()
    }
}

#[test]
fn adapter_start_bridges_sync_loop() {
    let mut adapter = Adapter::start(local_config(0)).expect("adapter should start");
    let addr = adapter.local_addr();
    assert_ne!(addr.port(), 0);

    tokio_test::block_on(async {
        let stream = TcpStream::connect(addr).await.unwrap();
        let (read_half, mut write_half) = stream.into_split();
        let mut lines = BufReader::new(read_half).lines();

        let mut hello = create_hello(1, "runtime-test", PROTOCOL_VERSION);
        hello.requested.stream_observations = false;
        let hello = serde_json::to_string(&hello).unwrap();
        write_half.write_all(hello.as_bytes()).await.unwrap();
        write_half
            .write_all(b"\n{\"type\":\"command\",\"seq\":2,\"ts\":1,\"mode\":\"click\",\"id\":\"3\"}\n")
            .await
            .unwrap();
        write_half.flush().await.unwrap();

        let welcome = lines.next_line().await.unwrap().unwrap();
        assert!(welcome.contains("\"welcome\""));

        // The game loop side polls without blocking.
        let deadline = Instant::now() + Duration::from_secs(2);
        let inbound = loop {
            if let Some(inbound) = adapter.try_recv() {
                break inbound;
            }
            assert!(Instant::now() < deadline, "command never reached the game loop");
            tokio::time::sleep(Duration::from_millis(5)).await;
        };
        assert_eq!(inbound.seq, 2);
        assert!(matches!(inbound.payload, InboundPayload::Command(_)));

        adapter.send(OutboundMessage::ToClientAck {
            client_id: inbound.client_id,
            ack: create_ack(2),
        });
        let ack: serde_json::Value =
            serde_json::from_str(&lines.next_line().await.unwrap().unwrap()).unwrap();
        assert_eq!(ack["type"], "ack");
        assert_eq!(ack["seq"], 2);
    });
}

#[test]
fn adapter_start_reports_bind_failure() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();
    assert!(Adapter::start(local_config(port)).is_err());
}

#[test]
fn adapter_disabled_via_env() {
    std::env::set_var("FUSEGRID_DISABLED", "true");
    let adapter = Adapter::start_from_env();
    std::env::remove_var("FUSEGRID_DISABLED");
    assert!(matches!(adapter, Ok(None)));
}
