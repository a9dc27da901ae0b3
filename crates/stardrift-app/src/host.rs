//! Host scheduling primitives.
//!
//! The backdrop never drives itself: it asks its [`Host`] for the next frame
//! callback and for resize notifications, and gives both back on teardown.
//! [`HostRegistry`] is the in-process host used by the window loop and the
//! headless runner.

use std::collections::VecDeque;

/// Handle for one requested frame callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Handle for one registered resize listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerToken(u64);

/// Per-frame scheduling and resize notification, as seen by the effect.
pub trait Host {
    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Drop a scheduled callback. Unknown or already-dispatched tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    fn add_resize_listener(&mut self) -> ListenerToken;

    /// Unknown tokens are ignored.
    fn remove_resize_listener(&mut self, token: ListenerToken);
}

/// Outstanding frame callbacks and resize listeners.
#[derive(Debug, Default)]
pub struct HostRegistry {
    next_id: u64,
    pending_frames: VecDeque<FrameToken>,
    listeners: Vec<ListenerToken>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the oldest pending frame callback, removing it from the registry.
    pub fn dispatch_frame(&mut self) -> Option<FrameToken> {
        self.pending_frames.pop_front()
    }

    pub fn pending_frames(&self) -> usize {
        self.pending_frames.len()
    }

    pub fn has_pending_frame(&self) -> bool {
        !self.pending_frames.is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_listening(&self, token: ListenerToken) -> bool {
        self.listeners.contains(&token)
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Host for HostRegistry {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id());
        self.pending_frames.push_back(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        self.pending_frames.retain(|t| *t != token);
    }

    fn add_resize_listener(&mut self) -> ListenerToken {
        let token = ListenerToken(self.next_id());
        self.listeners.push(token);
        token
    }

    fn remove_resize_listener(&mut self, token: ListenerToken) {
        self.listeners.retain(|t| *t != token);
    }
}
