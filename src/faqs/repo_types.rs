use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// FAQ record as stored and as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fruit_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

/// One writable field: `None` when absent from the body, `Some(None)` when sent as `null`.
pub type Field = Option<Option<String>>;

fn present<'de, D>(de: D) -> Result<Field, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(de).map(Some)
}

/// Writable FAQ fields as named in a request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqFields {
    #[serde(default, deserialize_with = "present")]
    pub image_src: Field,
    #[serde(default, deserialize_with = "present")]
    pub fruit_name: Field,
    #[serde(default, deserialize_with = "present")]
    pub question: Field,
    #[serde(default, deserialize_with = "present")]
    pub answer: Field,
}

impl Faq {
    pub fn from_fields(id: Uuid, fields: FaqFields) -> Self {
        Self {
            id,
            image_src: fields.image_src.flatten(),
            fruit_name: fields.fruit_name.flatten(),
            question: fields.question.flatten(),
            answer: fields.answer.flatten(),
        }
    }

    /// Replace the named fields; a named `null` clears the field.
    pub fn apply(&mut self, fields: FaqFields) {
        if let Some(v) = fields.image_src {
            self.image_src = v;
        }
        if let Some(v) = fields.fruit_name {
            self.fruit_name = v;
        }
        if let Some(v) = fields.question {
            self.question = v;
        }
        if let Some(v) = fields.answer {
            self.answer = v;
        }
    }
}

pub const DEMO_QUESTION: &str = "How is Tangerine healthy?";

/// The record inserted by `GET /initialize`, keyed on its question text.
pub fn demo_faq() -> FaqFields {
    FaqFields {
        image_src: Some(Some(
            "https://cdn.builder.io/api/v1/image/assets/TEMP/6afb3f25e325c3d90657fc0cef2d667d89f634f3c1969b4bea46655370c95e0f".into(),
        )),
        fruit_name: Some(Some("Tangerine".into())),
        question: Some(Some(DEMO_QUESTION.into())),
        answer: Some(Some(
            "Tangerines are a great health booster due to their high vitamin C content, which supports the immune system and skin health.".into(),
        )),
    }
}
