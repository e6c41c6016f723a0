//! In-memory store backing both repositories.
//!
//! Every check-then-write runs under a single write lock, so registration and
//! seeding are atomic exactly like the Postgres backend.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    auth::{repo::UserRepo, repo_types::User},
    faqs::{
        repo::FaqRepo,
        repo_types::{Faq, FaqFields},
    },
};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<Vec<User>>,
    faqs: RwLock<Vec<Faq>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_if_absent(
        &self,
        email: &str,
        password_hash: &str,
    ) -> anyhow::Result<Option<User>> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == email) {
            return Ok(None);
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        users.push(user.clone());
        Ok(Some(user))
    }
}

#[async_trait]
impl FaqRepo for MemoryStore {
    async fn list(&self) -> anyhow::Result<Vec<Faq>> {
        Ok(self.faqs.read().await.clone())
    }

    async fn create(&self, fields: FaqFields) -> anyhow::Result<Faq> {
        let faq = Faq::from_fields(Uuid::new_v4(), fields);
        self.faqs.write().await.push(faq.clone());
        Ok(faq)
    }

    async fn update(&self, id: Uuid, fields: FaqFields) -> anyhow::Result<Option<Faq>> {
        let mut faqs = self.faqs.write().await;
        Ok(faqs.iter_mut().find(|f| f.id == id).map(|faq| {
            faq.apply(fields);
            faq.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let mut faqs = self.faqs.write().await;
        let before = faqs.len();
        faqs.retain(|f| f.id != id);
        Ok((before - faqs.len()) as u64)
    }

    async fn seed_if_absent(&self, fields: FaqFields) -> anyhow::Result<bool> {
        let question = fields.question.clone().flatten();
        let mut faqs = self.faqs.write().await;
        if question.is_some() && faqs.iter().any(|f| f.question == question) {
            return Ok(false);
        }
        faqs.push(Faq::from_fields(Uuid::new_v4(), fields));
        Ok(true)
    }
}
