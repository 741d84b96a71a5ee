//! Cinematerial API response types.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Poster lookup result.
///
/// Either every field is populated (the title was found) or every field
/// is `None` (the service has nothing for the title).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CinematerialResult {
    /// IMDb id in numeric form (e.g. `"1375666"`).
    #[serde(rename = "imdb", default, deserialize_with = "string_or_number")]
    pub imdb_movie_id: Option<String>,
    /// Movie title.
    #[serde(default)]
    pub title: Option<String>,
    /// Release year.
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    /// Result page on the Cinematerial website.
    #[serde(default)]
    pub page: Option<String>,
    /// Posters, in service order.
    #[serde(default)]
    pub posters: Option<Vec<CinematerialPoster>>,
}

/// A single poster image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::module_name_repetitions)]
pub struct CinematerialPoster {
    /// Image URL.
    #[serde(rename = "image_location")]
    pub url: String,
}

impl CinematerialResult {
    /// Returns `true` if the service returned a title.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        self.imdb_movie_id.is_some()
    }

    /// Returns the posters, or an empty slice when there are none.
    #[must_use]
    pub fn posters(&self) -> &[CinematerialPoster] {
        self.posters.as_deref().unwrap_or_default()
    }

    /// Maps a 2xx response body onto a result.
    ///
    /// An empty body, `null`, `[]`, or an object whose `imdb` field is
    /// absent, `null` or blank (such as `{}` or `{"error": "..."}`) means the
    /// title is unknown and yields [`CinematerialResult::default`].
    ///
    /// A found result always carries a title, year and page; a missing
    /// poster list becomes an empty one.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not JSON, is a JSON value other than
    /// an object, has fields of the wrong type, or names a title without
    /// its title, year or page.
    pub fn from_payload(body: &str) -> Result<Self, serde_json::Error> {
        if body.trim().is_empty() {
            return Ok(Self::default());
        }

        let value: Value = serde_json::from_str(body)?;
        let not_found = match &value {
            Value::Null => true,
            Value::Array(items) => items.is_empty(),
            Value::Object(map) => match map.get("imdb") {
                None | Some(Value::Null) => true,
                Some(Value::String(id)) => id.trim().is_empty(),
                Some(_) => false,
            },
            _ => false,
        };
        if not_found {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(serde_json::Error::custom(
                "expected a JSON object for the lookup result",
            ));
        }

        let mut result: Self = serde_json::from_value(value)?;
        for (field, present) in [
            ("title", result.title.is_some()),
            ("year", result.year.is_some()),
            ("page", result.page.is_some()),
        ] {
            if !present {
                return Err(serde_json::Error::custom(format!(
                    "lookup result is missing `{field}`"
                )));
            }
        }
        result.posters.get_or_insert_with(Vec::new);
        Ok(result)
    }
}

/// Accepts `"2010"`, `2010` or `null`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or a number, got {other}"
        ))),
    }
}
