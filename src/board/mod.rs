/// Slot entity, identity and fill content
pub mod slot;
/// Synchronous board state and its mutations
pub mod state;
/// Serialized async store publishing board snapshots
pub mod store;
