//! serial-dh-chat demo
//!
//! Two-terminal encrypted chat over UDP. Start one process as the responder
//! and one as the initiator; whatever is typed on one side appears on the
//! other once the key exchange completes.
//!
//! Environment variables:
//! - CHAT_ROLE: "responder"/"server" (default) or "initiator"/"client"
//! - CHAT_BIND_ADDR: Local address (default 127.0.0.1:19999 responder, :19998 initiator)
//! - CHAT_PEER_ADDR: Partner address (default mirrors CHAT_BIND_ADDR)
//! - CHAT_TIMEOUT_MS: Handshake timeout (default 1000)
//! - CHAT_MAX_RESTARTS: Give up after this many handshake restarts (default never)
//! - CHAT_LOG_LEVEL: tracing filter, e.g. debug|info|warn|error (default info)

mod config;

use serial_dh_chat::crypto::OsEntropy;
use serial_dh_chat::transport::UdpLink;
use serial_dh_chat::{ChatError, Peer};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::DemoConfig;

const INPUT_QUEUE: usize = 1024;

#[tokio::main]
async fn main() {
    let config = match DemoConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("dh-chat: {}", ChatError::from(e));
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_level))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: DemoConfig) -> Result<(), ChatError> {
    let link = UdpLink::bind(config.bind_addr, config.peer_addr).await?;
    info!(local = %config.bind_addr, peer = %config.peer_addr, "link ready");

    let peer = Peer::new(config.session, OsEntropy);
    eprintln!("Your public key is: {}", peer.public_key());

    let mut session = peer.establish(link).await?;
    eprintln!("Partner's public key is: {}", session.partner_key());
    eprintln!("Type to chat; Ctrl-D to quit.");

    let (input_tx, input_rx) = mpsc::channel(INPUT_QUEUE);
    let (output_tx, mut output_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let mut stdin = tokio::io::stdin();
        let mut buf = [0u8; 256];
        loop {
            let n = match stdin.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            for &byte in &buf[..n] {
                if input_tx.send(byte).await.is_err() {
                    return;
                }
            }
        }
    });

    let printer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(byte) = output_rx.recv().await {
            if stdout.write_all(&[byte]).await.is_err() {
                break;
            }
            if byte == b'\n' && stdout.flush().await.is_err() {
                break;
            }
        }
        let _ = stdout.flush().await;
    });

    let stats = session.run(input_rx, output_tx).await?;
    // The sender went away with `run`; wait for the tail of the output.
    let _ = printer.await;

    info!(sent = stats.bytes_sent, received = stats.bytes_received, "bye");
    Ok(())
}
