//! # In-memory idea list
//!
//! A process-local stand-in for the key/value store. Elements are kept as
//! encoded JSON so it fails the same ways the real store does.

use async_trait::async_trait;
use dashmap::DashMap;
use domains::{DomainError, Idea, IdeaRepository, Result};

use crate::codec::{decode_all, encode};

pub struct InMemoryIdeaRepository {
    lists: DashMap<String, Vec<String>>,
    key: String,
}

impl InMemoryIdeaRepository {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            lists: DashMap::new(),
            key: key.into(),
        }
    }

    /// Starts with `ideas` already in the list, in order.
    pub fn with_ideas(key: impl Into<String>, ideas: &[Idea]) -> Result<Self> {
        let repo = Self::new(key);
        let encoded = ideas.iter().map(encode).collect::<Result<Vec<_>>>()?;
        repo.lists.insert(repo.key.clone(), encoded);
        Ok(repo)
    }

    /// Pushes a raw element, bypassing encoding.
    pub fn push_raw(&self, raw: impl Into<String>) {
        self.lists.entry(self.key.clone()).or_default().push(raw.into());
    }

    pub fn len(&self) -> usize {
        self.lists.get(&self.key).map(|list| list.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl IdeaRepository for InMemoryIdeaRepository {
    async fn load_all(&self) -> Result<Vec<Idea>> {
        let raw = self
            .lists
            .get(&self.key)
            .map(|list| list.clone())
            .unwrap_or_default();
        decode_all(&raw)
    }

    async fn replace_at(&self, index: usize, idea: &Idea) -> Result<()> {
        let encoded = encode(idea)?;
        let mut list = self
            .lists
            .get_mut(&self.key)
            .ok_or_else(|| DomainError::Storage(format!("no such key: {}", self.key)))?;
        let slot = list
            .get_mut(index)
            .ok_or_else(|| DomainError::Storage(format!("index {index} out of range")))?;
        *slot = encoded;
        Ok(())
    }

    async fn append(&self, idea: &Idea) -> Result<()> {
        let encoded = encode(idea)?;
        self.lists.entry(self.key.clone()).or_default().push(encoded);
        Ok(())
    }
}
