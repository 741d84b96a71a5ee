//! IMDb title identifiers and title page address resolution.

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::error::{CinematerialError, Result};

/// Host serving IMDb title pages.
const IMDB_HOST: &str = "www.imdb.com";

/// Title page path: `/title/tt<7 digits>`, then an optional single segment
/// (e.g. `/reference`) and an optional trailing slash.
#[allow(clippy::expect_used)]
static TITLE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/title/tt(\d{7})(?:/[^/]+)?/?$").expect("failed to compile title path regex")
});

/// IMDb catalog identifier in its canonical numeric form.
///
/// Displays as the address form used in title pages and API requests:
/// `tt` followed by at least 7 zero-padded digits.
///
/// ```
/// use cinematerial_api::ImdbId;
///
/// let id: ImdbId = "tt0196508".parse().unwrap();
/// assert_eq!(id.get(), 196_508);
/// assert_eq!(id.to_string(), "tt0196508");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImdbId(NonZeroU32);

impl ImdbId {
    /// Validates a raw numeric identifier.
    ///
    /// # Errors
    ///
    /// Returns [`CinematerialError::ImdbIdOutOfRange`] when `id` is not
    /// a positive integer that fits in `u32`.
    pub fn new(id: i64) -> Result<Self> {
        u32::try_from(id)
            .ok()
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or(CinematerialError::ImdbIdOutOfRange(id))
    }

    /// Returns the numeric identifier.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }
}

impl fmt::Display for ImdbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tt{:07}", self.0.get())
    }
}

impl FromStr for ImdbId {
    type Err = CinematerialError;

    /// Parses `tt1375666` or `1375666`.
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(CinematerialError::EmptyArgument("IMDb movie id"));
        }
        let digits = trimmed.strip_prefix("tt").unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CinematerialError::InvalidImdbId(String::from(trimmed)));
        }
        // All digits: the only parse failure left is overflow.
        let id: i64 = digits.parse().unwrap_or(i64::MAX);
        Self::new(id)
    }
}

/// Extracts the catalog identifier from an IMDb title page address.
///
/// Accepts `http(s)://www.imdb.com/title/tt<7 digits>` with an optional
/// trailing segment such as `/reference` and an optional trailing slash.
/// Query strings and fragments are ignored; user info and explicit ports
/// are not.
///
/// # Errors
///
/// - [`CinematerialError::MissingArgument`] if `address` is blank.
/// - [`CinematerialError::InvalidTitleUrl`] if it is not a title page address.
/// - [`CinematerialError::ImdbIdOutOfRange`] for `tt0000000`.
pub fn resolve_imdb_url(address: &str) -> Result<ImdbId> {
    let address = address.trim();
    if address.is_empty() {
        return Err(CinematerialError::MissingArgument("IMDb movie URL"));
    }

    let invalid = || CinematerialError::InvalidTitleUrl {
        url: String::from(address),
    };

    let url = Url::parse(address).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https")
        || url.host_str() != Some(IMDB_HOST)
        || url.port().is_some()
        || !url.username().is_empty()
        || url.password().is_some()
    {
        return Err(invalid());
    }

    let digits = TITLE_PATH_RE
        .captures(url.path())
        .and_then(|caps| caps.get(1))
        .ok_or_else(invalid)?
        .as_str();

    let id: i64 = digits.parse().map_err(|_| invalid())?;
    ImdbId::new(id)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_imdb_id_rejects_non_positive() {
        // Arrange & Act & Assert
        for raw in [0, -1, -300] {
            let err = ImdbId::new(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange, "id {raw}");
        }
    }

    #[test]
    fn test_imdb_id_rejects_overflow() {
        // Arrange & Act
        let err = ImdbId::new(i64::from(u32::MAX) + 1).unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
    }

    #[test]
    fn test_imdb_id_display_is_zero_padded() {
        // Arrange & Act & Assert
        assert_eq!(ImdbId::new(1_375_666).unwrap().to_string(), "tt1375666");
        assert_eq!(ImdbId::new(196_508).unwrap().to_string(), "tt0196508");
        assert_eq!(ImdbId::new(12_345_678).unwrap().to_string(), "tt12345678");
    }

    #[test]
    fn test_imdb_id_from_str() {
        // Arrange & Act & Assert
        assert_eq!("tt1375666".parse::<ImdbId>().unwrap().get(), 1_375_666);
        assert_eq!("tt0196508".parse::<ImdbId>().unwrap().get(), 196_508);
        assert_eq!(" 1375666 ".parse::<ImdbId>().unwrap().get(), 1_375_666);
    }

    #[test]
    fn test_imdb_id_from_str_errors() {
        // Arrange & Act & Assert
        assert_eq!(
            "".parse::<ImdbId>().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            "tt".parse::<ImdbId>().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            "nm0634240".parse::<ImdbId>().unwrap_err().kind(),
            ErrorKind::InvalidArgument
        );
        assert_eq!(
            "tt0000000".parse::<ImdbId>().unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
        assert_eq!(
            "99999999999999999999999".parse::<ImdbId>().unwrap_err().kind(),
            ErrorKind::OutOfRange
        );
    }

    #[test]
    fn test_resolve_title_urls() {
        // Arrange
        let cases = [
            ("http://www.imdb.com/title/tt1375666", 1_375_666),
            ("http://www.imdb.com/title/tt1375666/", 1_375_666),
            ("http://www.imdb.com/title/tt1375666/reference", 1_375_666),
            ("http://www.imdb.com/title/tt1375666/reference/", 1_375_666),
            ("http://www.imdb.com/title/tt0196508", 196_508),
            ("http://www.imdb.com/title/tt0196508/reference/", 196_508),
            ("https://www.imdb.com/title/tt1375666/?ref_=nv_sr_1", 1_375_666),
        ];

        for (url, expected) in cases {
            // Act
            let id = resolve_imdb_url(url).unwrap();

            // Assert
            assert_eq!(id.get(), expected, "url {url}");
        }
    }

    #[test]
    fn test_resolve_round_trips_through_display() {
        // Arrange
        let id = resolve_imdb_url("http://www.imdb.com/title/tt0196508").unwrap();

        // Act
        let again = resolve_imdb_url(&format!("http://www.imdb.com/title/{id}/")).unwrap();

        // Assert
        assert_eq!(again, id);
    }

    #[test]
    fn test_resolve_rejects_non_title_urls() {
        // Arrange
        let cases = [
            "http://www.imdb.com/",
            "http://www.imdb.com",
            "http://www.imdb.com/list/PQDCzc8WwVQ/",
            "http://www.imdb.com/search/title?genres=drama&title_type=feature&num_votes=5000,&sort=user_rating,desc",
            "http://www.imdb.com/chart/top/",
            "http://www.imdb.com/boxoffice/alltimegross?region=world-wide",
            "http://www.imdb.com/user/ur3342822/ratings",
            "http://www.google.com",
            "http://www.google.nl/title/tt1375666/",
            "ftp://www.imdb.com/title/tt1375666/",
            "http://evil:pw@www.imdb.com:8443/title/tt1375666/",
            "http://evil@www.imdb.com/title/tt1375666/",
            "http://:pw@www.imdb.com/title/tt1375666/",
            "http://www.imdb.com:8443/title/tt1375666/",
            "https://www.imdb.com:8080/title/tt1375666/",
            "not a url",
        ];

        for url in cases {
            // Act
            let err = resolve_imdb_url(url).unwrap_err();

            // Assert
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "url {url}");
        }
    }

    #[test]
    fn test_resolve_rejects_incomplete_title_urls() {
        // Arrange
        let cases = [
            "http://www.imdb.com/title/tt123456/",
            "http://www.imdb.com/title/tt12345678/",
            "http://www.imdb.com/title/tt1/",
            "http://www.imdb.com/title/tt/",
            "http://www.imdb.com/title/1375666/",
            "http://www.imdb.com/title/",
            "http://www.imdb.com/title",
            "http://www.imdb.com/title/tt1375666/reference/extra/",
        ];

        for url in cases {
            // Act
            let err = resolve_imdb_url(url).unwrap_err();

            // Assert
            assert_eq!(err.kind(), ErrorKind::InvalidArgument, "url {url}");
        }
    }

    #[test]
    fn test_resolve_blank_is_missing() {
        // Arrange & Act
        let err = resolve_imdb_url("  ").unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::MissingArgument);
    }
}
