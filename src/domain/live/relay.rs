use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tokio::sync::broadcast;
use tracing::debug;

use super::event::{LiveEvent, ServerMessage};

/// 직렬화가 끝난 이벤트 프레임 (구독자 수와 무관하게 한 번만 직렬화)
#[derive(Debug, Clone)]
pub struct RelayFrame {
    pub seq: u64,
    pub text: Arc<str>,
}

struct Room {
    sender: broadcast::Sender<RelayFrame>,
    /// 발행 순서와 seq 순서가 어긋나지 않도록 send까지 같은 락 안에서 처리합니다.
    seq: Mutex<u64>,
}

/// 게임별 실시간 중계 허브
///
/// 게임 상태를 보관하지 않으며, 커밋된 변경을 룸 구독자에게 전달만 합니다.
/// 룸은 한 번 만들어지면 프로세스 수명 동안 유지됩니다 (seq 단조 증가 보장).
pub struct GameRelay {
    rooms: DashMap<i64, Arc<Room>>,
    capacity: usize,
}

impl GameRelay {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    fn room(&self, game_id: i64) -> Arc<Room> {
        self.rooms
            .entry(game_id)
            .or_insert_with(|| {
                let (sender, _) = broadcast::channel(self.capacity);
                Arc::new(Room {
                    sender,
                    seq: Mutex::new(0),
                })
            })
            .clone()
    }

    /// 룸을 구독하고 구독 시점의 seq를 함께 반환합니다.
    pub fn subscribe(&self, game_id: i64) -> (broadcast::Receiver<RelayFrame>, u64) {
        let room = self.room(game_id);
        let guard = room.seq.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let receiver = room.sender.subscribe();
        (receiver, *guard)
    }

    /// 이벤트를 발행하고 부여된 seq를 반환합니다. 구독자가 없어도 seq는 증가합니다.
    pub fn publish(&self, game_id: i64, event: LiveEvent) -> u64 {
        let room = self.room(game_id);
        let mut guard = room.seq.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard += 1;
        let seq = *guard;

        let text = ServerMessage::Event {
            game_id,
            seq,
            event: &event,
        }
        .to_json();
        let delivered = room
            .sender
            .send(RelayFrame {
                seq,
                text: text.into(),
            })
            .unwrap_or(0);

        debug!(game_id, seq, event = event.name(), delivered, "live event published");
        seq
    }

    pub fn current_seq(&self, game_id: i64) -> u64 {
        self.rooms
            .get(&game_id)
            .map(|room| *room.seq.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
            .unwrap_or(0)
    }

    pub fn subscriber_count(&self, game_id: i64) -> usize {
        self.rooms
            .get(&game_id)
            .map(|room| room.sender.receiver_count())
            .unwrap_or(0)
    }
}
