use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Mutex,
    },
};

use crate::models::{
    display::DisplayPayload,
    gateway::{Gateway, GatewayError},
};

pub const BOT_ID: u64 = 999;

/// Records every call and answers from canned data.
pub struct FakeGateway {
    pub postable: bool,
    pub color: Option<u32>,
    pub reactors: Mutex<HashMap<u64, Result<Vec<u64>, GatewayError>>>,
    pub edit_errors: Mutex<HashMap<u64, GatewayError>>,
    pub edits: Mutex<Vec<(u64, u64, DisplayPayload)>>,
    pub sent: Mutex<Vec<(u64, DisplayPayload)>>,
    pub reactions: Mutex<Vec<(u64, u64, String)>>,
    pub deleted: Mutex<Vec<(u64, u64)>>,
    pub next_message_id: AtomicU64,
}

impl Default for FakeGateway {
    fn default() -> Self {
        FakeGateway {
            postable: true,
            color: None,
            reactors: Mutex::new(HashMap::new()),
            edit_errors: Mutex::new(HashMap::new()),
            edits: Mutex::new(Vec::new()),
            sent: Mutex::new(Vec::new()),
            reactions: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
            next_message_id: AtomicU64::new(5000),
        }
    }
}

impl FakeGateway {
    pub fn with_postable(mut self, postable: bool) -> Self {
        self.postable = postable;
        self
    }

    pub fn with_color(mut self, color: Option<u32>) -> Self {
        self.color = color;
        self
    }

    pub fn with_reactors(self, message_id: u64, reactors: Result<Vec<u64>, GatewayError>) -> Self {
        self.reactors.lock().unwrap().insert(message_id, reactors);
        self
    }

    pub fn with_edit_error(self, message_id: u64, err: GatewayError) -> Self {
        self.edit_errors.lock().unwrap().insert(message_id, err);
        self
    }

    pub fn edits(&self) -> Vec<(u64, u64, DisplayPayload)> {
        self.edits.lock().unwrap().clone()
    }

    pub fn edited_ids(&self) -> Vec<u64> {
        self.edits().into_iter().map(|(_, id, _)| id).collect()
    }

    pub fn sent(&self) -> Vec<(u64, DisplayPayload)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Gateway for FakeGateway {
    fn self_id(&self) -> u64 {
        BOT_ID
    }

    fn can_post(&self, _guild_id: u64, _channel_id: u64) -> bool {
        self.postable
    }

    fn self_color(&self, _guild_id: u64) -> Option<u32> {
        self.color
    }

    async fn edit_message(
        &self,
        channel_id: u64,
        message_id: u64,
        payload: &DisplayPayload,
    ) -> Result<(), GatewayError> {
        if let Some(err) = self.edit_errors.lock().unwrap().get(&message_id) {
            return Err(err.clone());
        }
        self.edits
            .lock()
            .unwrap()
            .push((channel_id, message_id, payload.clone()));
        Ok(())
    }

    async fn send_message(
        &self,
        channel_id: u64,
        payload: &DisplayPayload,
    ) -> Result<u64, GatewayError> {
        self.sent.lock().unwrap().push((channel_id, payload.clone()));
        Ok(self.next_message_id.fetch_add(1, Ordering::SeqCst))
    }

    async fn add_reaction(
        &self,
        channel_id: u64,
        message_id: u64,
        emoji: &str,
    ) -> Result<(), GatewayError> {
        self.reactions
            .lock()
            .unwrap()
            .push((channel_id, message_id, emoji.to_string()));
        Ok(())
    }

    async fn fetch_reaction_users(
        &self,
        _channel_id: u64,
        message_id: u64,
        _emoji: &str,
        limit: u8,
    ) -> Result<Vec<u64>, GatewayError> {
        match self.reactors.lock().unwrap().get(&message_id) {
            Some(Ok(users)) => Ok(users.iter().copied().take(limit as usize).collect()),
            Some(Err(err)) => Err(err.clone()),
            None => Ok(Vec::new()),
        }
    }

    async fn delete_message(&self, channel_id: u64, message_id: u64) -> Result<(), GatewayError> {
        self.deleted.lock().unwrap().push((channel_id, message_id));
        Ok(())
    }
}
