use thiserror::Error;

use crate::model::SharedPayloadError;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    SharedPayload(#[from] SharedPayloadError),
}
