use std::fs;
use std::path::{Path,PathBuf};

use crate::{Float, SiftError};
use crate::matching::sift_descriptor::{DESCRIPTOR_LENGTH, feature_vector::{FeatureVector, DescriptorData}};

/// Serializes features in the `.key` text format.
///
/// The first line holds the feature count and the descriptor length. Every feature follows as a line
/// `x y scale orientation` and a line with the descriptor values.
pub fn to_key_string(feature_vectors: &Vec<FeatureVector>) -> String {
    let mut out = format!("{} {}\n", feature_vectors.len(), DESCRIPTOR_LENGTH);
    for feature in feature_vectors {
        out.push_str(&format!("{} {} {} {}\n", feature.x, feature.y, feature.scale, feature.orientation));
        let values = feature.data.iter().map(|v| v.to_string()).collect::<Vec<String>>();
        out.push_str(&values.join(" "));
        out.push('\n');
    }
    out
}

pub fn write_key_file(path: &Path, feature_vectors: &Vec<FeatureVector>) -> Result<(), SiftError> {
    fs::write(path, to_key_string(feature_vectors))?;
    Ok(())
}

struct TokenReader<'a> {
    tokens: std::str::SplitWhitespace<'a>,
    position: usize
}

impl<'a> TokenReader<'a> {
    fn new(content: &'a str) -> TokenReader<'a> {
        TokenReader { tokens: content.split_whitespace(), position: 0 }
    }

    fn error(&self, message: String) -> SiftError {
        SiftError::KeyFileFormat { token: self.position, message }
    }

    fn next_token(&mut self, expected: &str) -> Result<&'a str, SiftError> {
        match self.tokens.next() {
            Some(token) => {
                self.position += 1;
                Ok(token)
            },
            None => Err(self.error(format!("unexpected end of input, expected {}", expected)))
        }
    }

    fn next_usize(&mut self, expected: &str) -> Result<usize, SiftError> {
        let token = self.next_token(expected)?;
        token.parse::<usize>().map_err(|_| self.error(format!("expected {}, found '{}'", expected, token)))
    }

    fn next_float(&mut self, expected: &str) -> Result<Float, SiftError> {
        let token = self.next_token(expected)?;
        token.parse::<Float>().map_err(|_| self.error(format!("expected {}, found '{}'", expected, token)))
    }
}

pub fn parse_key_str(content: &str) -> Result<Vec<FeatureVector>, SiftError> {
    let mut reader = TokenReader::new(content);
    let count = reader.next_usize("feature count")?;
    let length = reader.next_usize("descriptor length")?;
    if length != DESCRIPTOR_LENGTH {
        return Err(reader.error(format!("descriptor length {} is not supported, expected {}", length, DESCRIPTOR_LENGTH)));
    }

    // count is untrusted, the vector grows with the features actually read
    let mut feature_vectors = Vec::new();
    for _ in 0..count {
        let x = reader.next_float("x")?;
        let y = reader.next_float("y")?;
        let scale = reader.next_float("scale")?;
        let orientation = reader.next_float("orientation")?;
        let mut data = DescriptorData::zeros();
        for i in 0..DESCRIPTOR_LENGTH {
            data[i] = reader.next_float("descriptor value")?;
        }
        feature_vectors.push(FeatureVector::from_parts(x, y, scale, orientation, data));
    }

    match reader.tokens.next() {
        None => Ok(feature_vectors),
        Some(token) => {
            reader.position += 1;
            Err(reader.error(format!("trailing data '{}' after {} features", token, count)))
        }
    }
}

pub fn read_key_file(path: &Path) -> Result<Vec<FeatureVector>, SiftError> {
    let content = fs::read_to_string(path)?;
    parse_key_str(&content)
}

/// `<dir>/<stem>.key` for an input image `<dir>/<stem>.<ext>`
pub fn key_file_path(image_path: &Path) -> PathBuf {
    image_path.with_extension("key")
}
