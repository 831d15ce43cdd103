//! Error types for the Komi graph.

/// Errors that can occur when dereferencing ids in the graph.
#[derive(Debug, thiserror::Error)]
pub enum IrError {
    /// An id that the store never assigned (including the invalid id `0`).
    #[error("unknown id {id} (store holds {len} values)")]
    UnknownId { id: u32, len: usize },

    /// A type id with no value stores behind it.
    #[error("no values interned for type {id}")]
    UnknownType { id: u32 },
}
