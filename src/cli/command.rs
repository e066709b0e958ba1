use crate::movies::{CountMoviesParams, FindMoviesParams, MovieDetailsParams, TopMoviesParams};

/// One-shot queries, the command-line counterparts of the four tools.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Find(FindMoviesParams),
    Count(CountMoviesParams),
    Top(TopMoviesParams),
    Details(MovieDetailsParams),
}
