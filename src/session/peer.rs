//! One side of a chat: key generation, handshake, and hand-off to the
//! exchange loop.

use tracing::{debug, info};

use super::chat::ChatSession;
use super::config::SessionConfig;
use crate::core::{ChatError, EntropySource, SerialLink};
use crate::crypto::{CipherState, KeyPair, PublicKey};
use crate::handshake::{self, HandshakeOutcome, Role};

/// A peer that has its key pair but has not yet met its partner.
#[derive(Debug)]
pub struct Peer {
    config: SessionConfig,
    keypair: KeyPair,
}

impl Peer {
    /// Generate a fresh key pair from `entropy`.
    pub fn new<E: EntropySource>(config: SessionConfig, entropy: E) -> Self {
        Self::with_keypair(config, KeyPair::generate(entropy))
    }

    /// Use an existing key pair.
    pub fn with_keypair(config: SessionConfig, keypair: KeyPair) -> Self {
        Self { config, keypair }
    }

    /// This peer's role.
    pub fn role(&self) -> Role {
        self.config.role
    }

    /// This peer's public key.
    pub fn public_key(&self) -> PublicKey {
        self.keypair.public_key()
    }

    /// The session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Run the handshake over `link` and derive the session cipher.
    ///
    /// Consumes the peer: the private key is dropped (and zeroized) once the
    /// shared secret is known.
    pub async fn establish<L: SerialLink>(self, mut link: L) -> Result<ChatSession<L>, ChatError> {
        let public = self.public_key();
        info!(role = %self.config.role, public_key = %public, "starting key exchange");

        let HandshakeOutcome {
            partner_key,
            restarts,
        } = handshake::run(
            self.config.role,
            &mut link,
            public,
            &self.config.handshake_options(),
        )
        .await?;

        let secret = self.keypair.shared_secret(partner_key);
        let cipher = CipherState::from_secret(&secret);
        debug!(restarts, "shared secret derived");

        // ACKACK is the initiator's last handshake byte, so anything queued
        // behind it on the responder side is already ciphertext.
        if self.config.drain_on_establish && self.config.role == Role::Initiator {
            let drained = link.discard_pending()?;
            if drained > 0 {
                debug!(drained, "drained leftover handshake bytes");
            }
        }

        Ok(ChatSession::new(link, cipher, partner_key).with_poll_interval(self.config.poll_interval))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::KEYED_MESSAGE_SIZE;
    use crate::crypto::PrivateKey;
    use crate::handshake::Message;
    use crate::session::SessionConfigBuilder;
    use crate::transport::{memory_pair, MemoryLink};

    fn peer(role: Role, private: u32) -> Peer {
        let config = SessionConfigBuilder::new().role(role).build();
        Peer::with_keypair(config, KeyPair::from_private(PrivateKey::from_u32(private)))
    }

    #[tokio::test(start_paused = true)]
    async fn test_peers_agree_on_cipher() {
        let (a, b) = memory_pair();
        let alice = peer(Role::Initiator, 2);
        let bob = peer(Role::Responder, 4);
        let (alice_pub, bob_pub) = (alice.public_key(), bob.public_key());

        let (a, b) = tokio::join!(alice.establish(a), bob.establish(b));
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(a.partner_key(), bob_pub);
        assert_eq!(b.partner_key(), alice_pub);
        assert_eq!(a.cipher(), b.cipher());
    }

    /// Play a responder that answers the first request with two ACKs, as it
    /// does after seeing a retransmitted request.
    async fn establish_against_double_ack(config: SessionConfig) -> ChatSession<MemoryLink> {
        let (a, mut b) = memory_pair();
        let alice = Peer::with_keypair(config, KeyPair::from_private(PrivateKey::from_u32(3)));
        let ack = Message::Ack(PublicKey::from_u32(282475249)).encode();

        let partner = async {
            assert!(b.wait_for_bytes(KEYED_MESSAGE_SIZE, None).await.unwrap());
            b.write_bytes(&ack).unwrap();
            b.write_bytes(&ack).unwrap();
        };
        let (session, ()) = tokio::join!(alice.establish(a), partner);
        session.unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_initiator_drains_duplicate_ack() {
        let config = SessionConfigBuilder::new().role(Role::Initiator).build();
        let session = establish_against_double_ack(config).await;
        assert_eq!(session.partner_key().as_u32(), 282475249);
        assert_eq!(session.into_link().bytes_available().unwrap(), 0);

        let config = SessionConfigBuilder::new()
            .role(Role::Initiator)
            .drain_on_establish(false)
            .build();
        let session = establish_against_double_ack(config).await;
        assert_eq!(session.into_link().bytes_available().unwrap(), KEYED_MESSAGE_SIZE);
    }

    #[tokio::test(start_paused = true)]
    async fn test_responder_keeps_ciphertext_sent_right_after_ackack() {
        let (a, b) = memory_pair();
        let alice = peer(Role::Initiator, 2);
        let bob = peer(Role::Responder, 4);

        // Alice starts typing the moment her side of the handshake is done,
        // before Bob has even read the ACKACK.
        let alice_side = async {
            let mut session = alice.establish(a).await.unwrap();
            session.send_byte(b'h').unwrap();
            session.send_byte(b'i').unwrap();
            session
        };
        let (_alice, bob) = tokio::join!(alice_side, bob.establish(b));
        let mut bob = bob.unwrap();

        let received: Vec<u8> = std::iter::from_fn(|| bob.poll_byte().unwrap()).collect();
        assert_eq!(received, b"hi");
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_partner_gives_up() {
        let (a, _b) = memory_pair();
        let config = SessionConfigBuilder::new()
            .role(Role::Initiator)
            .max_restarts(2)
            .build();
        let alice = Peer::with_keypair(config, KeyPair::from_private(PrivateKey::from_u32(5)));

        let err = alice.establish(a).await.unwrap_err();
        assert!(matches!(
            err,
            ChatError::Handshake(crate::core::HandshakeError::RetriesExhausted { restarts: 3 })
        ));
    }
}
