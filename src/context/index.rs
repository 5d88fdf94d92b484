//! Reference Index
//!
//! O(1) lookup of stored references by id, plus the token index mapping a token to
//! the most recently stored reference carrying it.

use crate::reference::StringRef;
use crate::types::RefId;
use std::collections::HashMap;

/// Index: id -> ref, token -> id
#[derive(Debug, Default)]
pub struct RefIndex {
    refs: HashMap<RefId, StringRef>,
    tokens: HashMap<String, RefId>,
    order: Vec<RefId>,
}

impl RefIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a finalized reference.
    ///
    /// The ref lands in the id map before its token entry is updated, so a token
    /// never points at a missing ref. A repeated token overwrites the previous
    /// entry; the older ref stays reachable by id.
    pub fn insert(&mut self, reference: StringRef) {
        let id = reference.id.clone();
        let token = reference.token.clone();
        if self.refs.insert(id.clone(), reference).is_none() {
            self.order.push(id.clone());
        }
        if let Some(token) = token {
            self.tokens.insert(token, id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&StringRef> {
        self.refs.get(id)
    }

    /// Latest ref stored under `token`.
    pub fn resolve_token(&self, token: &str) -> Option<&StringRef> {
        self.tokens.get(token).and_then(|id| self.refs.get(id))
    }

    /// Resolve by id first, then by token.
    pub fn lookup(&self, id_or_token: &str) -> Option<&StringRef> {
        self.get(id_or_token)
            .or_else(|| self.resolve_token(id_or_token))
    }

    /// All refs in store order.
    pub fn refs(&self) -> Vec<&StringRef> {
        self.order.iter().filter_map(|id| self.refs.get(id)).collect()
    }

    /// Tokens currently indexed, sorted.
    pub fn tokens(&self) -> Vec<&str> {
        let mut tokens: Vec<&str> = self.tokens.keys().map(String::as_str).collect();
        tokens.sort_unstable();
        tokens
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    /// Drop every ref and token entry.
    pub fn clear(&mut self) {
        self.refs.clear();
        self.tokens.clear();
        self.order.clear();
    }
}
