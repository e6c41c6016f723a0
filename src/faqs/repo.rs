use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::faqs::repo_types::{Faq, FaqFields};

// Serialises concurrent seed calls across all server processes.
const SEED_LOCK_KEY: i64 = 0x5eed_fa9;

#[async_trait]
pub trait FaqRepo: Send + Sync {
    /// Every FAQ in insertion order.
    async fn list(&self) -> anyhow::Result<Vec<Faq>>;

    async fn create(&self, fields: FaqFields) -> anyhow::Result<Faq>;

    /// Overwrite the supplied fields of `id`. `None` when no record matches.
    async fn update(&self, id: Uuid, fields: FaqFields) -> anyhow::Result<Option<Faq>>;

    /// Remove `id` if present and return how many records went away.
    /// Removing a missing id is not an error.
    async fn delete(&self, id: Uuid) -> anyhow::Result<u64>;

    /// Insert `fields` unless a record with the same question exists.
    /// Returns whether a record was inserted.
    async fn seed_if_absent(&self, fields: FaqFields) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgFaqRepo {
    db: PgPool,
}

impl PgFaqRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FaqRepo for PgFaqRepo {
    async fn list(&self) -> anyhow::Result<Vec<Faq>> {
        let rows = sqlx::query_as::<_, Faq>(
            r#"
            SELECT id, image_src, fruit_name, question, answer
            FROM faqs
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list faqs")?;
        Ok(rows)
    }

    async fn create(&self, fields: FaqFields) -> anyhow::Result<Faq> {
        let faq = sqlx::query_as::<_, Faq>(
            r#"
            INSERT INTO faqs (image_src, fruit_name, question, answer)
            VALUES ($1, $2, $3, $4)
            RETURNING id, image_src, fruit_name, question, answer
            "#,
        )
        .bind(fields.image_src.flatten())
        .bind(fields.fruit_name.flatten())
        .bind(fields.question.flatten())
        .bind(fields.answer.flatten())
        .fetch_one(&self.db)
        .await
        .context("insert faq")?;
        Ok(faq)
    }

    async fn update(&self, id: Uuid, fields: FaqFields) -> anyhow::Result<Option<Faq>> {
        let faq = sqlx::query_as::<_, Faq>(
            r#"
            UPDATE faqs
               SET image_src  = CASE WHEN $2 THEN $3 ELSE image_src END,
                   fruit_name = CASE WHEN $4 THEN $5 ELSE fruit_name END,
                   question   = CASE WHEN $6 THEN $7 ELSE question END,
                   answer     = CASE WHEN $8 THEN $9 ELSE answer END
             WHERE id = $1
            RETURNING id, image_src, fruit_name, question, answer
            "#,
        )
        .bind(id)
        .bind(fields.image_src.is_some())
        .bind(fields.image_src.flatten())
        .bind(fields.fruit_name.is_some())
        .bind(fields.fruit_name.flatten())
        .bind(fields.question.is_some())
        .bind(fields.question.flatten())
        .bind(fields.answer.is_some())
        .bind(fields.answer.flatten())
        .fetch_optional(&self.db)
        .await
        .with_context(|| format!("update faq {id}"))?;
        Ok(faq)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<u64> {
        let done = sqlx::query("DELETE FROM faqs WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .with_context(|| format!("delete faq {id}"))?;
        Ok(done.rows_affected())
    }

    async fn seed_if_absent(&self, fields: FaqFields) -> anyhow::Result<bool> {
        let question = fields.question.flatten();
        let mut tx = self.db.begin().await.context("begin seed tx")?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(SEED_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .context("acquire seed lock")?;

        let existing: Option<(Uuid,)> =
            sqlx::query_as("SELECT id FROM faqs WHERE question = $1 LIMIT 1")
                .bind(question.as_deref())
                .fetch_optional(&mut *tx)
                .await
                .context("look up seed faq")?;

        if existing.is_some() {
            tx.commit().await.context("commit seed tx")?;
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO faqs (image_src, fruit_name, question, answer)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(fields.image_src.flatten())
        .bind(fields.fruit_name.flatten())
        .bind(question)
        .bind(fields.answer.flatten())
        .execute(&mut *tx)
        .await
        .context("insert seed faq")?;

        tx.commit().await.context("commit seed tx")?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::pg_pool;

    fn fields(fruit: &str, question: &str, answer: &str) -> FaqFields {
        FaqFields {
            image_src: Some(Some("http://img.local/x.png".into())),
            fruit_name: Some(Some(fruit.into())),
            question: Some(Some(question.into())),
            answer: Some(Some(answer.into())),
        }
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (set DATABASE_URL)"]
    async fn pg_update_replaces_named_fields_and_clears_nulls() {
        let repo = PgFaqRepo::new(pg_pool().await);
        let created = repo.create(fields("Apple", "Q?", "old")).await.unwrap();

        let updated = repo
            .update(
                created.id,
                FaqFields {
                    image_src: Some(None),
                    answer: Some(Some("new".into())),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .expect("record exists");
        assert_eq!(updated.image_src, None);
        assert_eq!(updated.answer.as_deref(), Some("new"));
        assert_eq!(updated.fruit_name.as_deref(), Some("Apple"));
        assert_eq!(updated.question.as_deref(), Some("Q?"));

        assert!(repo.update(Uuid::new_v4(), FaqFields::default()).await.unwrap().is_none());
        assert_eq!(repo.delete(created.id).await.unwrap(), 1);
        assert_eq!(repo.delete(created.id).await.unwrap(), 0);
    }

    #[tokio::test]
    #[ignore = "requires PostgreSQL (set DATABASE_URL)"]
    async fn pg_concurrent_seed_inserts_once() {
        let repo = std::sync::Arc::new(PgFaqRepo::new(pg_pool().await));
        let question = format!("Seed check {}?", Uuid::new_v4());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = repo.clone();
                let seed = fields("Tangerine", &question, "a");
                tokio::spawn(async move { repo.seed_if_absent(seed).await })
            })
            .collect();
        let mut inserted = 0;
        for t in tasks {
            if t.await.unwrap().unwrap() {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);

        let matching = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .filter(|f| f.question.as_deref() == Some(question.as_str()))
            .count();
        assert_eq!(matching, 1);
    }
}
