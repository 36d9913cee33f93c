use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("message score {0} is outside [0, 1]")]
    InvalidScore(f64),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid message json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("unable to write preview image: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid color: {0}")]
    Color(#[from] csscolorparser::ParseColorError),
}

pub type Result<T> = std::result::Result<T, Error>;
