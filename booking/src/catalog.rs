//! Static reference data (movies, theaters, dates) and the shows built from it.

use crate::config::Config;
use crate::inventory::InventoryError;
use crate::show::{Show, ShowSchedule};
use crate::types::{Capacity, ShowId, ShowTier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

/// Languages every stock movie is offered in
const STANDARD_LANGUAGES: [&str; 6] = ["Tamil", "English", "Kannada", "Hindi", "Malayalam", "Telugu"];

/// Stock movies with their ratings
const STANDARD_MOVIES: [(&str, f32); 5] = [
    ("Bagheera", 4.6),
    ("Amaran", 4.8),
    ("Singham Again", 3.7),
    ("Bhool Bhulaiyaa 3", 3.0),
    ("Venom: The Last Dance", 4.0),
];

/// Stock theaters; the ones from [`PREMIUM_THEATERS_FROM`] on run premium screens
const STANDARD_THEATERS: [&str; 10] = [
    "Navrang",
    "Limeright Private Theatre",
    "Anjana",
    "Veeresh",
    "Gopalan",
    "PVR Premium",
    "Urvashi",
    "PVR MSR",
    "Victoria",
    "PVR - Nexus Mall",
];

/// Index of the first premium theater in [`STANDARD_THEATERS`]
const PREMIUM_THEATERS_FROM: usize = 5;

/// Start times per stock movie, same order as [`STANDARD_MOVIES`]
const STANDARD_SHOW_TIMES: [[&str; 3]; 5] = [
    ["10:00 AM", "01:00 PM", "04:00 PM"],
    ["11:00 AM", "02:00 PM", "05:00 PM"],
    ["12:00 PM", "03:00 PM", "06:00 PM"],
    ["01:00 PM", "04:00 PM", "07:00 PM"],
    ["10:30 PM", "06:15 PM", "08:45 PM"],
];

/// Errors looking up or building catalog entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Movie position outside the catalog
    #[error("No movie at position {0}")]
    MovieOutOfRange(usize),

    /// Theater position outside the catalog
    #[error("No theater at position {0}")]
    TheaterOutOfRange(usize),

    /// No show was scheduled for this combination
    #[error("{movie} is not showing at {theater} on {date}")]
    NoShowing {
        /// Movie title
        movie: String,
        /// Theater name
        theater: String,
        /// Requested date
        date: NaiveDate,
    },

    /// The same movie, theater and date was scheduled twice
    #[error("{movie} is already scheduled at {theater} on {date}")]
    DuplicateShowing {
        /// Movie title
        movie: String,
        /// Theater name
        theater: String,
        /// Scheduled date
        date: NaiveDate,
    },

    /// Identifier does not belong to this catalog
    #[error("Unknown show {0}")]
    UnknownShow(ShowId),

    /// Show could not be built
    #[error(transparent)]
    Inventory(#[from] InventoryError),
}

/// Movie descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Title
    pub title: String,
    /// Audience rating out of 5
    pub rating: f32,
    /// Languages the movie is offered in, in display order
    pub languages: Vec<String>,
}

impl Movie {
    /// Creates a new `Movie`
    #[must_use]
    pub fn new<I, S>(title: impl Into<String>, rating: f32, languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            rating,
            languages: languages.into_iter().map(Into::into).collect(),
        }
    }
}

/// Theater descriptor
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theater {
    /// Display name
    pub name: String,
}

impl Theater {
    /// Creates a new `Theater`
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Movies, theaters and every scheduled show
#[derive(Clone, Debug)]
pub struct Catalog {
    movies: Vec<Arc<Movie>>,
    theaters: Vec<Arc<Theater>>,
    shows: Vec<Show>,
    listings: HashMap<(usize, usize, NaiveDate), ShowId>,
}

impl Catalog {
    /// Creates a catalog with no shows scheduled yet
    #[must_use]
    pub fn new(movies: Vec<Movie>, theaters: Vec<Theater>) -> Self {
        Self {
            movies: movies.into_iter().map(Arc::new).collect(),
            theaters: theaters.into_iter().map(Arc::new).collect(),
            shows: Vec::new(),
            listings: HashMap::new(),
        }
    }

    /// The stock line-up: every movie in every theater on every configured date
    ///
    /// The first five theaters run regular screens, the rest premium.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Inventory`] if the configured seat count is zero.
    pub fn standard(config: &Config) -> Result<Self, CatalogError> {
        let movies = STANDARD_MOVIES
            .iter()
            .map(|&(title, rating)| Movie::new(title, rating, STANDARD_LANGUAGES))
            .collect();
        let theaters = STANDARD_THEATERS.iter().copied().map(Theater::new).collect();
        let mut catalog = Self::new(movies, theaters);

        let capacity = Capacity::new(config.seats_per_show);
        for &date in &config.show_dates {
            for (movie, times) in STANDARD_SHOW_TIMES.iter().enumerate() {
                for theater in 0..STANDARD_THEATERS.len() {
                    let tier = if theater < PREMIUM_THEATERS_FROM {
                        ShowTier::Regular
                    } else {
                        ShowTier::Premium
                    };
                    catalog.schedule(
                        movie,
                        theater,
                        ShowSchedule::new(times.iter().copied(), date),
                        tier,
                        capacity,
                    )?;
                }
            }
        }

        tracing::debug!(
            movies = catalog.movies.len(),
            theaters = catalog.theaters.len(),
            shows = catalog.shows.len(),
            "Standard catalog built"
        );
        Ok(catalog)
    }

    /// Schedules a new show and returns its identifier
    ///
    /// # Errors
    ///
    /// - [`CatalogError::MovieOutOfRange`] / [`CatalogError::TheaterOutOfRange`] for bad positions
    /// - [`CatalogError::DuplicateShowing`] if the slot is taken
    /// - [`CatalogError::Inventory`] for a zero capacity
    pub fn schedule(
        &mut self,
        movie: usize,
        theater: usize,
        schedule: ShowSchedule,
        tier: ShowTier,
        capacity: Capacity,
    ) -> Result<ShowId, CatalogError> {
        let movie_ref = self.movie(movie)?;
        let theater_ref = self.theater(theater)?;
        let key = (movie, theater, schedule.date);

        if self.listings.contains_key(&key) {
            return Err(CatalogError::DuplicateShowing {
                movie: movie_ref.title.clone(),
                theater: theater_ref.name.clone(),
                date: schedule.date,
            });
        }

        let id = ShowId::new(self.shows.len());
        let show = Show::new(
            id,
            Arc::clone(movie_ref),
            Arc::clone(theater_ref),
            schedule,
            tier,
            capacity,
        )?;
        self.shows.push(show);
        self.listings.insert(key, id);
        Ok(id)
    }

    /// Movies in display order
    #[must_use]
    pub fn movies(&self) -> &[Arc<Movie>] {
        &self.movies
    }

    /// Theaters in display order
    #[must_use]
    pub fn theaters(&self) -> &[Arc<Theater>] {
        &self.theaters
    }

    /// Every scheduled show
    #[must_use]
    pub fn shows(&self) -> &[Show] {
        &self.shows
    }

    /// Distinct screening dates, ascending
    #[must_use]
    pub fn show_dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self.shows.iter().map(Show::date).collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }

    /// Movie at a 0-based position
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MovieOutOfRange`] for an unknown position.
    pub fn movie(&self, index: usize) -> Result<&Arc<Movie>, CatalogError> {
        self.movies
            .get(index)
            .ok_or(CatalogError::MovieOutOfRange(index))
    }

    /// Theater at a 0-based position
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::TheaterOutOfRange`] for an unknown position.
    pub fn theater(&self, index: usize) -> Result<&Arc<Theater>, CatalogError> {
        self.theaters
            .get(index)
            .ok_or(CatalogError::TheaterOutOfRange(index))
    }

    /// Finds the show for a movie, theater and date
    ///
    /// # Errors
    ///
    /// Returns a range error for bad positions, or [`CatalogError::NoShowing`].
    pub fn show_for(&self, movie: usize, theater: usize, date: NaiveDate) -> Result<ShowId, CatalogError> {
        let movie_ref = self.movie(movie)?;
        let theater_ref = self.theater(theater)?;

        self.listings
            .get(&(movie, theater, date))
            .copied()
            .ok_or_else(|| CatalogError::NoShowing {
                movie: movie_ref.title.clone(),
                theater: theater_ref.name.clone(),
                date,
            })
    }

    /// Show by identifier
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownShow`] if `id` is not from this catalog.
    pub fn show(&self, id: ShowId) -> Result<&Show, CatalogError> {
        self.shows.get(id.index()).ok_or(CatalogError::UnknownShow(id))
    }

    pub(crate) fn show_mut(&mut self, id: ShowId) -> Result<&mut Show, CatalogError> {
        self.shows
            .get_mut(id.index())
            .ok_or(CatalogError::UnknownShow(id))
    }
}
