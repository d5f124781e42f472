use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiftError {
    #[error("invalid image: (width,height) = ({width},{height})")]
    InvalidImage { width: usize, height: usize },
    #[error("invalid runtime parameter: {0}")]
    InvalidParameter(String),
    #[error("malformed key file at token {token}: {message}")]
    KeyFileFormat { token: usize, message: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    ImageDecode(#[from] ::image::ImageError),
    #[error(transparent)]
    Config(#[from] serde_yaml::Error),
}
