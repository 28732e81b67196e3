use crate::{Error, PayloadFields, error::Result};
use futures::TryStreamExt as _;
use garde::Validate;
use serde::{Deserialize, Serialize};
use sqlx::Pool;
use tracing::debug;

const ENTITY: &str = "Language";

/// Payload for a new language.
///
/// All three fields are required and text fields must be non-empty. Falsy
/// values of any JSON type decode to `None` and so count as missing.
#[derive(Debug, Serialize, Deserialize, Clone, Default, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct CreateLanguage {
    #[serde(default, deserialize_with = "crate::loose::text")]
    #[garde(required, length(min = 1))]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::loose::year")]
    #[garde(required)]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "crate::loose::text")]
    #[garde(required, length(min = 1))]
    pub last_version: Option<String>,
}

impl PayloadFields for CreateLanguage {
    const FIELDS: &'static [&'static str] = &["name", "year", "last_version"];
}

/// Payload for replacing a stored language.
///
/// Not validated: every field is written as given (`0` and `false` are
/// stored as text), a missing or `null` one is stored as `NULL`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct UpdateLanguage {
    #[serde(default, deserialize_with = "crate::loose::text_as_given")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::loose::year_as_given")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "crate::loose::text_as_given")]
    pub last_version: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, sqlx::FromRow)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct Language {
    pub id: i64,
    pub name: Option<String>,
    pub year: Option<i64>,
    pub last_version: Option<String>,
}

pub type LanguageRepository = LanguageRepositoryImpl<Pool<crate::ChosenDB>>;

pub struct LanguageRepositoryImpl<E> {
    executor: E,
}

impl<'c, E> LanguageRepositoryImpl<E>
where
    for<'a> &'a E: sqlx::Executor<'c, Database = crate::ChosenDB>,
{
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    pub async fn create(&self, payload: CreateLanguage) -> Result<Language> {
        let record = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name, year, last_version) VALUES (?, ?, ?) \
             RETURNING id, name, year, last_version",
        )
        .bind(&payload.name)
        .bind(payload.year)
        .bind(&payload.last_version)
        .fetch_one(&self.executor)
        .await?;

        debug!("Created language {}", record.id);
        Ok(record)
    }

    pub async fn update(&self, id: i64, payload: UpdateLanguage) -> Result<Language> {
        let record = sqlx::query_as::<_, Language>(
            "UPDATE languages SET name = ?, year = ?, last_version = ? WHERE id = ? \
             RETURNING id, name, year, last_version",
        )
        .bind(&payload.name)
        .bind(payload.year)
        .bind(&payload.last_version)
        .bind(id)
        .fetch_optional(&self.executor)
        .await?;

        record.ok_or_else(|| {
            debug!("No language {id} to update");
            Error::RecordNotFound(ENTITY.to_string())
        })
    }

    pub async fn list(&self) -> Result<Vec<Language>> {
        let records = sqlx::query_as::<_, Language>(
            "SELECT id, name, year, last_version FROM languages",
        )
        .fetch(&self.executor)
        .try_collect::<Vec<_>>()
        .await?;
        Ok(records)
    }

    pub async fn delete(&self, id: i64) -> Result<Language> {
        let record = sqlx::query_as::<_, Language>(
            "DELETE FROM languages WHERE id = ? RETURNING id, name, year, last_version",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?;

        record.ok_or_else(|| Error::RecordNotFound(ENTITY.to_string()))
    }

    pub async fn get(&self, id: i64) -> Result<Language> {
        sqlx::query_as::<_, Language>(
            "SELECT id, name, year, last_version FROM languages WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.executor)
        .await?
        .ok_or_else(|| Error::RecordNotFound(ENTITY.to_string()))
    }
}
