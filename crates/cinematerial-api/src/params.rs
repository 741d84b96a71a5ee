//! Poster lookup request parameters.

use std::fmt;

use crate::error::{CinematerialError, Result};
use crate::imdb::{ImdbId, resolve_imdb_url};

/// Smallest poster width the service renders.
pub const MIN_IMAGE_WIDTH: u32 = 30;

/// Largest poster width the service renders.
pub const MAX_IMAGE_WIDTH: u32 = 300;

/// Width used when a search does not specify one.
pub const DEFAULT_IMAGE_WIDTH: u32 = 300;

/// Validated poster width in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageWidth(u32);

impl ImageWidth {
    /// Returns the width in pixels.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ImageWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inclusive bounds for requested poster widths, plus the default width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidthBounds {
    min: u32,
    max: u32,
    default: u32,
}

impl WidthBounds {
    /// Creates bounds `min..=max` with the given default width.
    ///
    /// # Errors
    ///
    /// Returns [`CinematerialError::WidthOutOfRange`] if `min` is zero or
    /// `default` does not lie within `min..=max`.
    pub fn new(min: u32, max: u32, default: u32) -> Result<Self> {
        if min == 0 || !(min..=max).contains(&default) {
            return Err(CinematerialError::WidthOutOfRange {
                width: i32::try_from(default).unwrap_or(i32::MAX),
                min,
                max,
            });
        }
        Ok(Self { min, max, default })
    }

    /// Inclusive lower bound.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Inclusive upper bound.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Width used when none is requested.
    #[must_use]
    pub const fn default_width(&self) -> ImageWidth {
        ImageWidth(self.default)
    }

    /// Validates an explicitly requested width.
    ///
    /// # Errors
    ///
    /// Returns [`CinematerialError::WidthOutOfRange`] if `width` lies
    /// outside the bounds.
    pub fn validate(&self, width: i32) -> Result<ImageWidth> {
        u32::try_from(width)
            .ok()
            .filter(|w| (self.min..=self.max).contains(w))
            .map(ImageWidth)
            .ok_or(CinematerialError::WidthOutOfRange {
                width,
                min: self.min,
                max: self.max,
            })
    }

    /// Applies the default when `width` is `None`, validates it otherwise.
    ///
    /// # Errors
    ///
    /// See [`WidthBounds::validate`].
    pub fn resolve(&self, width: Option<i32>) -> Result<ImageWidth> {
        width.map_or_else(|| Ok(self.default_width()), |w| self.validate(w))
    }
}

impl Default for WidthBounds {
    fn default() -> Self {
        Self {
            min: MIN_IMAGE_WIDTH,
            max: MAX_IMAGE_WIDTH,
            default: DEFAULT_IMAGE_WIDTH,
        }
    }
}

/// The title a lookup refers to, as the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleRef {
    /// Raw numeric IMDb id (e.g. `1375666`).
    Id(i64),
    /// IMDb title page address (e.g. `http://www.imdb.com/title/tt1375666/`).
    Url(String),
}

/// Parameters for a poster lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PosterQuery {
    /// Title to look up.
    pub title: TitleRef,
    /// Requested width (`None` = bounds default).
    pub width: Option<i32>,
}

impl PosterQuery {
    /// Looks up a title by its numeric IMDb id.
    #[must_use]
    pub const fn by_id(imdb_id: i64) -> Self {
        Self {
            title: TitleRef::Id(imdb_id),
            width: None,
        }
    }

    /// Looks up a title by its IMDb page address.
    pub fn by_url(url: impl Into<String>) -> Self {
        Self {
            title: TitleRef::Url(url.into()),
            width: None,
        }
    }

    /// Sets the poster width.
    #[must_use]
    pub const fn width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Normalizes the query into a validated id and width.
    ///
    /// The address is resolved first, then the id and the width are checked.
    ///
    /// # Errors
    ///
    /// Returns the validation error of the first invalid input.
    pub fn resolve(&self, bounds: &WidthBounds) -> Result<ResolvedQuery> {
        let imdb_id = match &self.title {
            TitleRef::Id(id) => ImdbId::new(*id)?,
            TitleRef::Url(url) => resolve_imdb_url(url)?,
        };
        let width = bounds.resolve(self.width)?;
        Ok(ResolvedQuery { imdb_id, width })
    }
}

/// A validated lookup, ready to be turned into a request URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedQuery {
    /// Title id.
    pub imdb_id: ImdbId,
    /// Poster width.
    pub width: ImageWidth,
}
