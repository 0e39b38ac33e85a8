use thiserror::Error;

use crate::model::{GoalsError, ReviewError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Goals(#[from] GoalsError),
}
