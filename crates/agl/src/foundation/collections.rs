//! Specialized collection types

pub use slotmap::{new_key_type, Key, SlotMap};

new_key_type! {
    /// Generation-checked handle to a node inside a scene arena
    ///
    /// Handles of removed nodes never alias a node created later.
    pub struct NodeId;

    /// Handle to a vertex buffer owned by a render backend
    pub struct BufferId;
}

/// Arena of scene nodes with stable, generation-checked handles
pub type NodeMap<T> = SlotMap<NodeId, T>;

/// Arena of backend buffers
pub type BufferMap<T> = SlotMap<BufferId, T>;
