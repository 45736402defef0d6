//! Message protocols carried in IEX-TP segments and the [`ProtocolRegistry`] that
//! maps a segment's message protocol ID to the function that decodes its messages.
pub mod deep;
pub mod tops;

use std::collections::HashMap;

use crate::{Message, UnsupportedMsg, WireMessage};

/// Decodes a single message body, starting with its message type byte, for one
/// protocol.
///
/// Message types the protocol doesn't know decode as [`Message::Unsupported`];
/// only structural problems are errors.
pub type DecodeFn = fn(&[u8]) -> crate::Result<Message>;

/// An immutable table from message protocol ID to [`DecodeFn`].
///
/// Build it once at startup, either with [`ProtocolRegistry::default()`] for the TOPS
/// and DEEP feeds or with [`ProtocolRegistry::builder()`], and share it by reference
/// or [`Arc`](std::sync::Arc) with every decoder. It's never mutated after
/// construction so no locking is needed.
#[derive(Clone, Debug)]
pub struct ProtocolRegistry {
    decoders: HashMap<u16, DecodeFn>,
}

/// A builder for a [`ProtocolRegistry`]. Registering the same protocol ID twice is an
/// error rather than an override.
#[derive(Clone, Debug, Default)]
pub struct ProtocolRegistryBuilder {
    decoders: HashMap<u16, DecodeFn>,
}

impl ProtocolRegistry {
    /// Creates a new [`ProtocolRegistryBuilder`] with no registered protocols.
    pub fn builder() -> ProtocolRegistryBuilder {
        ProtocolRegistryBuilder::default()
    }

    /// Returns the decoder for `protocol_id`, if one is registered.
    pub fn resolve(&self, protocol_id: u16) -> Option<DecodeFn> {
        self.decoders.get(&protocol_id).copied()
    }

    /// Returns `true` if a decoder is registered for `protocol_id`.
    pub fn contains(&self, protocol_id: u16) -> bool {
        self.decoders.contains_key(&protocol_id)
    }

    /// Returns the registered protocol IDs in ascending order.
    pub fn protocol_ids(&self) -> Vec<u16> {
        let mut ids: Vec<_> = self.decoders.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ProtocolRegistry {
    /// Returns a registry with both TOPS versions and DEEP.
    fn default() -> Self {
        Self {
            decoders: HashMap::from([
                (tops::V1_5_PROTOCOL_ID, tops::decode as DecodeFn),
                (tops::V1_6_PROTOCOL_ID, tops::decode as DecodeFn),
                (deep::V1_0_PROTOCOL_ID, deep::decode as DecodeFn),
            ]),
        }
    }
}

impl ProtocolRegistryBuilder {
    /// Registers `decoder` for messages in segments with `protocol_id`.
    ///
    /// # Errors
    /// This function returns [`Error::DuplicateProtocol`](crate::Error::DuplicateProtocol)
    /// if a decoder is already registered for `protocol_id`.
    pub fn register(mut self, protocol_id: u16, decoder: DecodeFn) -> crate::Result<Self> {
        if self.decoders.contains_key(&protocol_id) {
            return Err(crate::Error::DuplicateProtocol(protocol_id));
        }
        self.decoders.insert(protocol_id, decoder);
        Ok(self)
    }

    /// Finalizes the registry.
    pub fn build(self) -> ProtocolRegistry {
        ProtocolRegistry {
            decoders: self.decoders,
        }
    }
}

fn message_type(buf: &[u8]) -> crate::Result<u8> {
    buf.first().copied().ok_or(crate::Error::EmptyMessage)
}

fn unsupported(buf: &[u8]) -> crate::Result<Message> {
    Ok(Message::Unsupported(UnsupportedMsg::decode(buf)?))
}
