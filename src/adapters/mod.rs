//! Infrastructure implementations of the persistence port.
//!
//! Each adapter implements [`AgentRepository`](crate::ports::AgentRepository)
//! for a concrete storage backend: MessagePack files for trained agents on
//! disk, an in-memory map for tests and ephemeral runs. Adapters depend on
//! the port trait, never the other way around.

pub mod in_memory_repository;
pub mod msgpack_repository;

pub use in_memory_repository::InMemoryRepository;
pub use msgpack_repository::MsgPackRepository;
