//! UDP datagram link.
//!
//! Treats a connected UDP socket as an unreliable byte pipe: each
//! `write_bytes` call becomes one datagram, and received datagrams are
//! flattened into a byte buffer. Loss, reordering and duplication are left to
//! the network, which makes this a faithful stand-in for a noisy serial line.
//!
//! Sends go through a non-blocking `std` clone of the socket so that every
//! write reaches the kernel. Tokio's `try_send` consults its cached write
//! readiness first and reports `WouldBlock` until the reactor has seen the
//! socket, which would silently drop the first datagrams after a connect.

use std::collections::VecDeque;
use std::io;
use std::net::{self, SocketAddr};

use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::core::{SerialLink, TransportError};

/// Default receive buffer size.
pub const DEFAULT_RECV_BUFFER_SIZE: usize = 65535;

/// A [`SerialLink`] over a connected UDP socket.
#[derive(Debug)]
pub struct UdpLink {
    /// The underlying UDP socket, connected to the partner.
    socket: UdpSocket,
    /// Non-blocking handle on the same socket, used for sends.
    sender: net::UdpSocket,
    /// Bytes received but not yet read.
    pending: VecDeque<u8>,
    /// Datagram receive buffer.
    recv_buffer: Vec<u8>,
}

impl UdpLink {
    /// Bind to `local` and connect to `peer`.
    pub async fn bind(local: SocketAddr, peer: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(local).await?;
        socket.connect(peer).await?;
        Self::from_socket(socket)
    }

    /// Wrap a socket that is already connected to the partner.
    pub fn from_socket(socket: UdpSocket) -> io::Result<Self> {
        let socket = socket.into_std()?;
        let sender = socket.try_clone()?;
        sender.set_nonblocking(true)?;
        Ok(Self {
            socket: UdpSocket::from_std(socket)?,
            sender,
            pending: VecDeque::new(),
            recv_buffer: vec![0u8; DEFAULT_RECV_BUFFER_SIZE],
        })
    }

    /// Get the local address.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Get the partner's address.
    pub fn peer_addr(&self) -> io::Result<SocketAddr> {
        self.socket.peer_addr()
    }

    /// Move every datagram waiting in the socket into the byte buffer.
    fn pull(&mut self) -> Result<(), TransportError> {
        loop {
            match self.socket.try_recv(&mut self.recv_buffer) {
                Ok(len) => self.pending.extend(&self.recv_buffer[..len]),
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => return Ok(()),
                // ICMP port unreachable: the partner is not up yet.
                Err(ref e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                    debug!("partner unreachable");
                    return Ok(());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

impl SerialLink for UdpLink {
    fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        match self.sender.send(bytes) {
            Ok(_) => Ok(()),
            // ICMP from an earlier datagram; the partner may come up later.
            Err(ref e) if e.kind() == io::ErrorKind::ConnectionRefused => {
                debug!(len = bytes.len(), "partner unreachable, datagram dropped");
                Ok(())
            }
            // Kernel send buffer full. The line is lossy anyway.
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                warn!(len = bytes.len(), "send buffer full, datagram dropped");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn bytes_available(&mut self) -> Result<usize, TransportError> {
        self.pull()?;
        Ok(self.pending.len())
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.pending.is_empty() {
            // Errors surface again on the next `bytes_available`.
            if let Err(e) = self.pull() {
                debug!(error = %e, "receive failed");
            }
        }
        self.pending.pop_front()
    }
}
