//! Message log
//!
//! Bounded per-room history replayed to new subscribers. Oldest entries are
//! evicted first once a room reaches capacity.

use chat_core::{ChatMessage, RoomId};
use std::collections::{HashMap, VecDeque};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

#[derive(Debug)]
pub struct MessageLog {
    capacity: usize,
    rooms: HashMap<RoomId, VecDeque<ChatMessage>>,
}

impl MessageLog {
    /// Create a log holding at most `capacity` messages per room
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            rooms: HashMap::new(),
        }
    }

    /// Start an empty log for a newly created room
    pub fn create_room(&mut self, room: &RoomId) {
        self.rooms.entry(room.clone()).or_default();
    }

    pub fn append(&mut self, message: ChatMessage) {
        let log = self.rooms.entry(message.room.clone()).or_default();
        log.push_back(message);
        while log.len() > self.capacity {
            log.pop_front();
        }
    }

    /// Current buffer for `room`, oldest first. Unknown rooms have no history.
    pub fn history(&self, room: &RoomId) -> Vec<ChatMessage> {
        self.rooms
            .get(room)
            .map(|log| log.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, room: &RoomId) -> usize {
        self.rooms.get(room).map_or(0, VecDeque::len)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}
