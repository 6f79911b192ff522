//! TCP server for the adapter
//!
//! Handles incoming connections and manages client lifecycle.
//! Uses tokio for async networking.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot, RwLock};

use crate::core::SessionSnapshot;
use crate::engine::Command;
use crate::protocol::*;
use crate::runtime::{ClientCommand, InboundCommand, InboundPayload, OutboundMessage};
use crate::types::{CellId, Direction, Move, TickEvent};

/// Stable 64-bit FNV-1a hasher for deterministic `state_hash`.
///
/// `DefaultHasher` output is not guaranteed stable across Rust versions.
#[derive(Debug, Clone)]
struct Fnv1aHasher {
    state: u64,
}

impl Fnv1aHasher {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    fn new() -> Self {
        Self {
            state: Self::OFFSET_BASIS,
        }
    }
}

impl std::hash::Hasher for Fnv1aHasher {
    fn finish(&self) -> u64 {
        self.state
    }

    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.state ^= b as u64;
            self.state = self.state.wrapping_mul(Self::PRIME);
        }
    }
}

fn extract_seq_best_effort(s: &str) -> Option<u64> {
    let start = s.find("\"seq\"")?;
    let after_key = &s[start + 5..];
    let colon = after_key.find(':')?;
    let rest = after_key[colon + 1..].trim_start();
    let end = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if end == 0 {
        return None;
    }
    rest[..end].parse::<u64>().ok()
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub protocol_version: String,
    pub max_pending_commands: usize,
    /// Append every line sent or received to this file
    pub log_path: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 7777,
            protocol_version: PROTOCOL_VERSION.to_string(),
            max_pending_commands: 10,
            log_path: None,
        }
    }
}

impl ServerConfig {
    /// Create from `FUSEGRID_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ServerConfig::from_env`], reading values through `lookup`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let host = lookup("FUSEGRID_HOST")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.host);
        let port = lookup("FUSEGRID_PORT")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.port);
        let max_pending_commands = lookup("FUSEGRID_MAX_PENDING")
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.max_pending_commands);
        let log_path = lookup("FUSEGRID_LOG_PATH")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            host,
            port,
            protocol_version: defaults.protocol_version,
            max_pending_commands,
            log_path,
        }
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid adapter address {}:{}", self.host, self.port))
    }
}

/// Shared server state
pub struct ServerState {
    config: ServerConfig,
    clients: Arc<RwLock<Vec<ClientHandle>>>,
    controller: Arc<RwLock<Option<usize>>>,
}

impl ServerState {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            clients: Arc::new(RwLock::new(Vec::new())),
            controller: Arc::new(RwLock::new(None)),
        }
    }

    /// Check if the adapter is disabled via environment
    pub fn is_disabled() -> bool {
        std::env::var("FUSEGRID_DISABLED")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }
}

async fn is_handshaken(state: &Arc<ServerState>, client_id: usize) -> bool {
    let clients = state.clients.read().await;
    clients
        .iter()
        .find(|c| c.id == client_id)
        .map(|c| c.handshaken)
        .unwrap_or(false)
}

async fn is_controller(state: &Arc<ServerState>, client_id: usize) -> bool {
    *state.controller.read().await == Some(client_id)
}

async fn check_and_update_seq(state: &Arc<ServerState>, client_id: usize, seq: u64) -> bool {
    let mut clients = state.clients.write().await;
    let Some(client) = clients.iter_mut().find(|c| c.id == client_id) else {
        return true;
    };

    match client.last_seq {
        Some(prev) if seq <= prev => false,
        _ => {
            client.last_seq = Some(seq);
            true
        }
    }
}

/// Handle to a connected client
pub struct ClientHandle {
    pub id: usize,
    pub addr: SocketAddr,
    pub is_controller: bool,
    pub stream_observations: bool,
    pub handshaken: bool,
    pub last_seq: Option<u64>,
    pub tx: mpsc::UnboundedSender<ClientOutbound>,
}

#[derive(Debug, Clone)]
pub enum ClientOutbound {
    Ack(AckMessage),
    Error(ErrorMessage),
    Welcome(WelcomeMessage),
    Observation(Box<ObservationMessage>),
}

impl ClientOutbound {
    fn encode_into(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        buf.clear();
        match self {
            ClientOutbound::Ack(m) => write_json(buf, m),
            ClientOutbound::Error(m) => write_json(buf, m),
            ClientOutbound::Welcome(m) => write_json(buf, m),
            ClientOutbound::Observation(m) => write_json(buf, m.as_ref()),
        }
    }
}

fn write_json<T: Serialize>(buf: &mut Vec<u8>, value: &T) -> serde_json::Result<()> {
    serde_json::to_writer(&mut *buf, value)?;
    buf.push(b'\n');
    Ok(())
}

/// Start the TCP server
///
/// `ready_tx` receives the bound address once the listener is up (useful with
/// port 0).
pub async fn run_server(
    config: ServerConfig,
    command_tx: mpsc::Sender<InboundCommand>,
    mut out_rx: mpsc::UnboundedReceiver<OutboundMessage>,
    ready_tx: Option<oneshot::Sender<SocketAddr>>,
) -> anyhow::Result<()> {
    let wire_log_tx = config.log_path.clone().map(spawn_wire_log);

    let addr = config.socket_addr()?;
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind adapter on {}", addr))?;
    let bound = listener.local_addr()?;
    log::info!("[Adapter] TCP server listening on {}", bound);
    if let Some(tx) = ready_tx {
        let _ = tx.send(bound);
    }

    let state = Arc::new(ServerState::new(config));
    let mut client_id_counter = 0usize;

    // Outbound dispatcher.
    {
        let state = Arc::clone(&state);
        tokio::spawn(async move {
            while let Some(msg) = out_rx.recv().await {
                dispatch_outbound(&state, msg).await;
            }
        });
    }

    loop {
        let (socket, addr) = listener.accept().await?;
        client_id_counter += 1;
        let client_id = client_id_counter;

        log::info!("[Adapter] Client {} connected from {}", client_id, addr);

        let state = Arc::clone(&state);
        let command_tx = command_tx.clone();
        let wire_log_tx = wire_log_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = handle_client(socket, addr, client_id, state, command_tx, wire_log_tx).await {
                log::warn!("[Adapter] Client {} error: {}", client_id, e);
            }
            log::info!("[Adapter] Client {} disconnected", client_id);
        });
    }
}

/// Append-only log of the wire traffic; one JSON document per line
fn spawn_wire_log(path: String) -> mpsc::UnboundedSender<Vec<u8>> {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                log::warn!("[Adapter] cannot open wire log {}: {}", path, e);
                return;
            }
        };

        while let Some(mut line) = rx.recv().await {
            if line.last() != Some(&b'\n') {
                line.push(b'\n');
            }
            if file.write_all(&line).await.is_err() {
                break;
            }
        }

        let _ = file.flush().await;
    });
    tx
}

async fn dispatch_outbound(state: &Arc<ServerState>, msg: OutboundMessage) {
    let clients = state.clients.read().await;
    match msg {
        OutboundMessage::ToClientObservation { client_id, obs } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Observation(obs));
            }
        }
        OutboundMessage::BroadcastObservation { obs } => {
            for c in clients.iter().filter(|c| c.handshaken && c.stream_observations) {
                let _ = c.tx.send(ClientOutbound::Observation(obs.clone()));
            }
        }
        OutboundMessage::ToClientAck { client_id, ack } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Ack(ack));
            }
        }
        OutboundMessage::ToClientError { client_id, err } => {
            if let Some(c) = clients.iter().find(|c| c.id == client_id) {
                let _ = c.tx.send(ClientOutbound::Error(err));
            }
        }
    }
}

fn reject(tx: &mpsc::UnboundedSender<ClientOutbound>, seq: u64, code: ErrorCode, message: &str) {
    let _ = tx.send(ClientOutbound::Error(create_error(seq, code, message)));
}

/// Handle a single client connection
async fn handle_client(
    socket: TcpStream,
    addr: SocketAddr,
    client_id: usize,
    state: Arc<ServerState>,
    command_tx: mpsc::Sender<InboundCommand>,
    wire_log_tx: Option<mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()> {
    let (reader, mut writer) = tokio::io::split(socket);
    let mut reader = BufReader::new(reader);

    let (tx, mut rx) = mpsc::unbounded_channel::<ClientOutbound>();

    {
        let mut clients = state.clients.write().await;
        clients.push(ClientHandle {
            id: client_id,
            addr,
            is_controller: false,
            stream_observations: false,
            handshaken: false,
            last_seq: None,
            tx: tx.clone(),
        });
    }

    let wire_log_tx_out = wire_log_tx.clone();

    let write_task = tokio::spawn(async move {
        let mut buf: Vec<u8> = Vec::with_capacity(4096);
        while let Some(msg) = rx.recv().await {
            if msg.encode_into(&mut buf).is_err() {
                continue;
            }
            if writer.write_all(&buf).await.is_err() {
                break;
            }
            if writer.flush().await.is_err() {
                break;
            }
            if let Some(log_tx) = wire_log_tx_out.as_ref() {
                let _ = log_tx.send(buf.clone());
            }
        }
    });

    let mut line = String::new();

    loop {
        line.clear();
        let bytes_read = reader.read_line(&mut line).await?;
        if bytes_read == 0 {
            break;
        }

        let raw_line = line.trim_end_matches(['\n', '\r']);
        let trimmed = raw_line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(log_tx) = wire_log_tx.as_ref() {
            let _ = log_tx.send(raw_line.as_bytes().to_vec());
        }

        match parse_message(trimmed) {
            Ok(ParsedMessage::Hello(hello)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, hello.seq).await
                {
                    reject(&tx, hello.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                if !hello.protocol_version.starts_with(PROTOCOL_MAJOR) {
                    reject(
                        &tx,
                        hello.seq,
                        ErrorCode::ProtocolMismatch,
                        &format!("Protocol version {} not supported", hello.protocol_version),
                    );
                    break;
                }

                // First client to hello becomes controller.
                let role = {
                    let mut controller = state.controller.write().await;
                    let mut clients = state.clients.write().await;
                    let role = if controller.is_none() {
                        *controller = Some(client_id);
                        log::info!("[Adapter] Client {} is now controller", client_id);
                        AssignedRole::Controller
                    } else {
                        AssignedRole::Observer
                    };
                    if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                        client.handshaken = true;
                        client.last_seq = Some(hello.seq);
                        client.is_controller = role == AssignedRole::Controller;
                        client.stream_observations = hello.requested.stream_observations;
                    }
                    role
                };

                let controller_id = state.controller.read().await.map(|id| id as u64);
                let welcome = create_welcome(
                    hello.seq,
                    &state.config.protocol_version,
                    client_id as u64,
                    role,
                    controller_id,
                );
                let _ = tx.send(ClientOutbound::Welcome(welcome));

                if hello.requested.stream_observations
                    && command_tx
                        .try_send(InboundCommand {
                            client_id,
                            seq: hello.seq,
                            payload: InboundPayload::SnapshotRequest,
                        })
                        .is_err()
                {
                    log::warn!("[Adapter] Client {} initial snapshot dropped: queue full", client_id);
                    reject(
                        &tx,
                        hello.seq,
                        ErrorCode::Backpressure,
                        "Command queue is full; initial observation skipped",
                    );
                }
            }

            Ok(ParsedMessage::Command(cmd)) => {
                if !is_handshaken(&state, client_id).await {
                    reject(&tx, cmd.seq, ErrorCode::HandshakeRequired, "Send hello before command");
                    continue;
                }
                if !check_and_update_seq(&state, client_id, cmd.seq).await {
                    reject(&tx, cmd.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                if !is_controller(&state, client_id).await {
                    reject(&tx, cmd.seq, ErrorCode::NotController, "Only controller may send commands");
                    continue;
                }

                let mapped = match map_command(&cmd) {
                    Ok(c) => c,
                    Err((code, message)) => {
                        reject(&tx, cmd.seq, code, &message);
                        continue;
                    }
                };

                // Bounded queue; the game loop acks once the command is applied.
                if command_tx
                    .try_send(InboundCommand {
                        client_id,
                        seq: cmd.seq,
                        payload: InboundPayload::Command(mapped),
                    })
                    .is_err()
                {
                    reject(&tx, cmd.seq, ErrorCode::Backpressure, "Command queue is full");
                }
            }

            Ok(ParsedMessage::Control(ctrl)) => {
                if !is_handshaken(&state, client_id).await {
                    reject(&tx, ctrl.seq, ErrorCode::HandshakeRequired, "Send hello before control");
                    continue;
                }
                if !check_and_update_seq(&state, client_id, ctrl.seq).await {
                    reject(&tx, ctrl.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }

                let mut controller = state.controller.write().await;
                let mut clients = state.clients.write().await;
                match ctrl.action {
                    ControlAction::Claim => {
                        if controller.is_none() || *controller == Some(client_id) {
                            *controller = Some(client_id);
                            if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                                client.is_controller = true;
                            }
                            log::info!("[Adapter] Client {} claimed control", client_id);
                            let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq)));
                        } else {
                            reject(&tx, ctrl.seq, ErrorCode::ControllerActive, "Controller already assigned");
                        }
                    }
                    ControlAction::Release => {
                        if *controller == Some(client_id) {
                            *controller = None;
                            if let Some(client) = clients.iter_mut().find(|c| c.id == client_id) {
                                client.is_controller = false;
                            }
                            log::info!("[Adapter] Client {} released control", client_id);
                            let _ = tx.send(ClientOutbound::Ack(create_ack(ctrl.seq)));
                        } else {
                            reject(&tx, ctrl.seq, ErrorCode::NotController, "Only controller may release");
                        }
                    }
                }
            }

            Ok(ParsedMessage::Unknown(unknown)) => {
                if is_handshaken(&state, client_id).await
                    && !check_and_update_seq(&state, client_id, unknown.seq).await
                {
                    reject(&tx, unknown.seq, ErrorCode::InvalidCommand, "seq must be strictly increasing");
                    continue;
                }
                reject(&tx, unknown.seq, ErrorCode::InvalidCommand, "Unknown message type");
            }

            Err(e) => {
                let seq = extract_seq_best_effort(trimmed).unwrap_or(0);
                reject(&tx, seq, ErrorCode::InvalidCommand, &format!("JSON parse error: {}", e));
            }
        }
    }

    // Remove the client and promote the next one if it held control.
    {
        let mut controller = state.controller.write().await;
        let mut clients = state.clients.write().await;

        let was_controller = *controller == Some(client_id);
        clients.retain(|c| c.id != client_id);

        if was_controller {
            let next_id = clients.iter().filter(|c| c.handshaken).map(|c| c.id).min();
            *controller = next_id;
            match next_id {
                Some(new_id) => {
                    if let Some(c) = clients.iter_mut().find(|c| c.id == new_id) {
                        c.is_controller = true;
                    }
                    log::info!("[Adapter] Controller {} promoted", new_id);
                }
                None => log::info!("[Adapter] Controller {} released", client_id),
            }
        }
    }

    drop(tx);
    let _ = write_task.await;

    Ok(())
}

fn parse_cell_id(cmd: &CommandMessage) -> Result<CellId, (ErrorCode, String)> {
    let Some(raw) = cmd.id.as_deref() else {
        return Err((ErrorCode::InvalidCommand, "Missing id".to_string()));
    };
    raw.trim()
        .parse::<CellId>()
        .map_err(|_| (ErrorCode::InvalidCommand, format!("Invalid cell id: {}", raw)))
}

fn parse_direction(raw: &str) -> Result<Direction, (ErrorCode, String)> {
    raw.parse::<Direction>()
        .map_err(|_| (ErrorCode::InvalidCommand, format!("Invalid direction: {}", raw)))
}

/// Map a protocol command into a game-loop command.
fn map_command(cmd: &CommandMessage) -> Result<ClientCommand, (ErrorCode, String)> {
    match cmd.mode {
        CommandMode::Click => Ok(ClientCommand::Command(Command::Click(parse_cell_id(cmd)?))),
        CommandMode::Swipe => {
            let id = parse_cell_id(cmd)?;
            let Some(raw) = cmd.direction.as_deref() else {
                return Err((ErrorCode::InvalidCommand, "Missing direction".to_string()));
            };
            Ok(ClientCommand::Command(Command::Swipe(id, parse_direction(raw)?)))
        }
        CommandMode::Move => {
            let (Some(x), Some(y)) = (cmd.x, cmd.y) else {
                return Err((ErrorCode::InvalidCommand, "Missing x/y".to_string()));
            };
            let m = match cmd.direction.as_deref() {
                None => Move::tap(x, y),
                Some(raw) => Move::swipe(x, y, parse_direction(raw)?),
            };
            Ok(ClientCommand::Command(Command::Move(m)))
        }
        CommandMode::Restart => Ok(ClientCommand::Restart),
    }
}

/// Digest of everything an observation reports except `seq`/`ts`
pub fn state_hash(snapshot: &SessionSnapshot, last_event: Option<&TickEvent>) -> StateHash {
    use std::hash::{Hash, Hasher};

    let mut hasher = Fnv1aHasher::new();
    snapshot.seed.hash(&mut hasher);
    snapshot.episode_id.hash(&mut hasher);
    snapshot.cols.hash(&mut hasher);
    snapshot.rows.hash(&mut hasher);
    snapshot.score.hash(&mut hasher);
    snapshot.moves_left.hash(&mut hasher);
    snapshot.settled.hash(&mut hasher);
    snapshot.finished.hash(&mut hasher);
    snapshot.moves.hash(&mut hasher);
    for cell in &snapshot.cells {
        cell.id.get().hash(&mut hasher);
        cell.x.hash(&mut hasher);
        cell.y.hash(&mut hasher);
        cell.kind.as_str().hash(&mut hasher);
        cell.color.index().hash(&mut hasher);
        cell.score.hash(&mut hasher);
        cell.axis.map(|a| a.as_str()).hash(&mut hasher);
    }
    last_event.is_some().hash(&mut hasher);
    if let Some(ev) = last_event {
        ev.fused.hash(&mut hasher);
        ev.bombs_formed.hash(&mut hasher);
        ev.bombs_ignited.hash(&mut hasher);
        ev.detonation.hash(&mut hasher);
        ev.score_gained.hash(&mut hasher);
        ev.spawned.hash(&mut hasher);
    }
    StateHash(hasher.finish())
}

/// Build observation message from a session snapshot
pub fn build_observation(
    seq: u64,
    snapshot: &SessionSnapshot,
    last_event: Option<TickEvent>,
) -> ObservationMessage {
    let hash = state_hash(snapshot, last_event.as_ref());
    create_observation(seq, snapshot, last_event, hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameSession;

    fn command(json: &str) -> CommandMessage {
        match parse_message(json).unwrap() {
            ParsedMessage::Command(c) => c,
            other => panic!("expected command, got {:?}", other),
        }
    }

    #[test]
    fn test_map_click_and_swipe() {
        let cmd = command(r#"{"type":"command","seq":1,"mode":"click","id":"12"}"#);
        assert!(matches!(
            map_command(&cmd),
            Ok(ClientCommand::Command(Command::Click(id))) if id == CellId::new(12)
        ));

        let cmd = command(r#"{"type":"command","seq":2,"mode":"swipe","id":"3","direction":"Right"}"#);
        assert!(matches!(
            map_command(&cmd),
            Ok(ClientCommand::Command(Command::Swipe(_, Direction::Right)))
        ));
    }

    #[test]
    fn test_map_move_and_restart() {
        let cmd = command(r#"{"type":"command","seq":1,"mode":"move","x":1,"y":4}"#);
        assert!(matches!(
            map_command(&cmd),
            Ok(ClientCommand::Command(Command::Move(m))) if m == Move::tap(1, 4)
        ));

        let cmd = command(r#"{"type":"command","seq":1,"mode":"move","x":1,"y":4,"direction":"up"}"#);
        assert!(matches!(
            map_command(&cmd),
            Ok(ClientCommand::Command(Command::Move(m))) if m == Move::swipe(1, 4, Direction::Up)
        ));

        let cmd = command(r#"{"type":"command","seq":1,"mode":"restart"}"#);
        assert!(matches!(map_command(&cmd), Ok(ClientCommand::Restart)));
    }

    #[test]
    fn test_map_rejects_missing_fields() {
        for json in [
            r#"{"type":"command","seq":1,"mode":"click"}"#,
            r#"{"type":"command","seq":1,"mode":"click","id":"abc"}"#,
            r#"{"type":"command","seq":1,"mode":"swipe","id":"3"}"#,
            r#"{"type":"command","seq":1,"mode":"swipe","id":"3","direction":"north"}"#,
            r#"{"type":"command","seq":1,"mode":"move","x":1}"#,
        ] {
            let err = map_command(&command(json)).unwrap_err();
            assert_eq!(err.0, ErrorCode::InvalidCommand, "{}", json);
        }
    }

    #[test]
    fn test_extract_seq_best_effort() {
        assert_eq!(extract_seq_best_effort(r#"{"seq": 42, "type":"#), Some(42));
        assert_eq!(extract_seq_best_effort(r#"{"type":"x"}"#), None);
        assert_eq!(extract_seq_best_effort(r#"{"seq":"a"}"#), None);
    }

    #[test]
    fn test_server_config_from_lookup() {
        let config = ServerConfig::from_lookup(|key| match key {
            "FUSEGRID_HOST" => Some("0.0.0.0".to_string()),
            "FUSEGRID_PORT" => Some("9000".to_string()),
            "FUSEGRID_MAX_PENDING" => Some("not a number".to_string()),
            "FUSEGRID_LOG_PATH" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.max_pending_commands, 10);
        assert_eq!(config.log_path, None);
        assert_eq!(config.socket_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_socket_addr_invalid_host() {
        let config = ServerConfig {
            host: "not a host".to_string(),
            ..ServerConfig::default()
        };
        assert!(config.socket_addr().is_err());
    }

    #[test]
    fn test_state_hash_changes_with_session() {
        let mut session = GameSession::new("hash", 30);
        let before = build_observation(1, &session.snapshot(), None);
        let again = build_observation(2, &session.snapshot(), None);
        assert_eq!(before.state_hash, again.state_hash);

        session.tick();
        let event = session.take_last_event();
        let after = build_observation(3, &session.snapshot(), event);
        assert_ne!(before.state_hash, after.state_hash);
    }

    #[test]
    fn test_state_hash_covers_episode() {
        let mut session = GameSession::new("hash", 30);
        let first = state_hash(&session.snapshot(), None);
        session.restart();
        assert_ne!(first, state_hash(&session.snapshot(), None));
    }

    #[test]
    fn test_observation_lists_cells_by_id() {
        let session = GameSession::new("obs", 30);
        let obs = build_observation(1, &session.snapshot(), None);
        assert_eq!(obs.cells.len(), 40);
        assert_eq!(obs.cells[0].id, "1");
        assert!(!obs.playable);
        assert_eq!(obs.moves_left, 30);
    }
}
