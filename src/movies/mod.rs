//! The movie query service: parameter normalization, filter construction, dispatch to the
//! store and result shaping.

mod criteria;
mod params;
mod records;
mod service;

pub use criteria::{
    FIELD_CAST, FIELD_GENRES, FIELD_PLOT, FIELD_RATING, FIELD_TITLE, FIELD_YEAR, SearchCriteria,
    has_rating, title_equals,
};
pub use params::{
    CountMoviesParams, DEFAULT_FIND_LIMIT, DEFAULT_TOP_LIMIT, FindMoviesParams, MovieDetailsParams,
    TopMoviesParams,
};
pub use records::{MovieRecord, TopMovie};
pub use service::MovieService;
