mod museum;
mod painting;
mod score;
mod shared_result;

pub use museum::{Museum, UnknownMuseum};
pub use painting::{
    ARTIST_KEYS, IMAGE_KEYS, MUSEUM_KEYS, PaintingRecord, TITLE_KEYS, YEAR_KEYS,
};
pub use score::accuracy_percent;
pub use shared_result::{
    SHARE_QUERY_KEYS, SharedPayloadError, SharedResult, encode_payload, start_param_from_url,
};
