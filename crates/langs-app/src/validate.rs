use axum::extract::{FromRequest, Request};
use garde::{Report, Validate};
use langs_dal::PayloadFields;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use crate::error::ApiError;

/// Extractor that validates the inner extractor's value with `garde`.
///
/// Failed rules are reported as [`ApiError::MissingFields`], naming each
/// offending field once, in declaration order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Garde<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: Display> Display for Garde<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> Garde<E> {
    /// Consumes the `Garde` and returns the validated data within.
    pub fn into_inner(self) -> E {
        self.0
    }
}

/// Names of the fields failing validation, following `declared` order.
///
/// `garde` reports paths sorted by name, so the order is taken from the
/// payload declaration instead. Unknown paths go last.
pub fn missing_fields(report: &Report, declared: &[&str]) -> Vec<String> {
    let failed: Vec<String> = report.iter().map(|(path, _)| path.to_string()).collect();
    let mut fields: Vec<String> = declared
        .iter()
        .filter(|field| failed.iter().any(|f| f == *field))
        .map(|field| field.to_string())
        .collect();
    for field in failed {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

impl<S, Extractor, T> FromRequest<S> for Garde<Extractor>
where
    S: Send + Sync,
    T: Validate<Context = ()> + PayloadFields,
    Extractor: Deref<Target = T> + FromRequest<S>,
    <Extractor as FromRequest<S>>::Rejection: Into<ApiError>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(Into::<ApiError>::into)?;

        inner
            .deref()
            .validate()
            .map_err(|report| ApiError::MissingFields(missing_fields(&report, T::FIELDS)))?;
        Ok(Garde(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use langs_dal::language::CreateLanguage;

    fn payload(name: &str, year: i64, last_version: &str) -> CreateLanguage {
        CreateLanguage {
            name: Some(name.to_string()),
            year: Some(year),
            last_version: Some(last_version.to_string()),
        }
    }

    fn missing(payload: &CreateLanguage) -> Vec<String> {
        let report = payload.validate().unwrap_err();
        missing_fields(&report, CreateLanguage::FIELDS)
    }

    #[test]
    fn test_missing_fields_in_order() {
        assert_eq!(
            missing(&CreateLanguage::default()),
            ["name", "year", "last_version"]
        );

        let no_year = CreateLanguage {
            year: None,
            ..payload("Zig", 2016, "")
        };
        assert_eq!(missing(&no_year), ["year", "last_version"]);

        let err = ApiError::MissingFields(missing(&payload("", 1958, "")));
        assert_eq!(err.to_string(), "Faltan datos necesarios: name, last_version");
    }

    #[test]
    fn test_undeclared_fields_last() {
        let report = CreateLanguage::default().validate().unwrap_err();
        assert_eq!(
            missing_fields(&report, &["year"]),
            ["year", "last_version", "name"]
        );
    }

    #[test]
    fn test_garde_deref_into_inner() {
        let mut v = Garde(String::from("garde"));
        assert_eq!(v.deref().as_str(), "garde");
        v.deref_mut().push('!');
        assert_eq!(v.to_string(), "garde!");
        assert_eq!(v.into_inner(), "garde!");
    }
}
