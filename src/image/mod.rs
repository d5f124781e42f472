extern crate image as image_rs;
extern crate nalgebra as na;

use image_rs::{GrayImage, DynamicImage, Pixel, Luma};
use image_rs::flat::NormalForm;
use na::DMatrix;

use crate::{Float, SiftError};
use self::image_encoding::ImageEncoding;

pub mod image_encoding;

/// Scalar image. The buffer is indexed (row,column) i.e. (y,x).
#[derive(Debug,Clone)]
pub struct Image {
    pub buffer: DMatrix<Float>,
    pub original_encoding: ImageEncoding
}

impl Image {

    pub fn width(&self) -> usize {
        self.buffer.ncols()
    }

    pub fn height(&self) -> usize {
        self.buffer.nrows()
    }

    pub fn empty(width: usize, height: usize, image_encoding: ImageEncoding) -> Image {
        let buffer =  DMatrix::<Float>::zeros(height,width);
        Image{ buffer, original_encoding: image_encoding}
    }

    pub fn from_matrix(matrix: &DMatrix<Float>, original_encoding: ImageEncoding, normalize: bool) -> Image {
        let mut buffer = matrix.clone();

        if normalize {
            let max = buffer.amax();
            if max > 0.0 {
                buffer /= max;
            }
        }

        Image{ buffer, original_encoding}
    }

    /// Converts an 8bit image. With `normalize` samples are mapped to [0,1].
    pub fn from_gray_image(image: &GrayImage, normalize: bool) -> Image {
        debug_assert!(image.sample_layout().is_normal(NormalForm::RowMajorPacked));

        let (width, height) = image.dimensions();
        let scale = match normalize {
            true => ImageEncoding::U8.max_value(),
            false => 1.0
        };
        let buffer = DMatrix::<Float>::from_fn(height as usize, width as usize, |r,c| {
            let pixel = image.get_pixel(c as u32, r as u32);
            pixel.channels()[0] as Float / scale
        });

        Image{ buffer, original_encoding: ImageEncoding::U8}
    }

    pub fn validate(&self) -> Result<(), SiftError> {
        match (self.width(), self.height()) {
            (width, height) if width == 0 || height == 0 => Err(SiftError::InvalidImage{width, height}),
            _ => Ok(())
        }
    }

    /// Sample access where out of range coordinates wrap around the image borders.
    pub fn get_wrapped(&self, x: isize, y: isize) -> Float {
        let width = self.width() as isize;
        let height = self.height() as isize;
        self.buffer[(y.rem_euclid(height) as usize, x.rem_euclid(width) as usize)]
    }

    pub fn to_image(&self) -> GrayImage {
        let (rows, cols) = self.buffer.shape();

        let mut gray_image = DynamicImage::new_luma8(cols as u32, rows as u32).to_luma8();
        let max = self.buffer.max();
        let min = self.buffer.min();
        for c in 0..cols {
            for r in 0..rows {
                let val = self.buffer[(r, c)];
                let pixel_value = self.original_encoding.normalize_to_gray(max,min,val);
                gray_image.put_pixel(c as u32, r as u32, Luma([pixel_value]));
            }
        }
        gray_image
    }

    pub fn upsample_double(image: &Image) -> Image {
        Image::bilinear_resample(image, 2.0)
    }

    pub fn downsample_half(image: &Image) -> Image {
        Image::bilinear_resample(image, 0.5)
    }

    /// Destination pixel (x,y) samples the source at (x/factor,y/factor).
    /// Coordinates past the last row/column are clamped.
    pub fn bilinear_resample(image: &Image, factor: Float) -> Image {
        assert!(factor > 0.0);

        let width = image.width();
        let height = image.height();

        let new_width = std::cmp::max(((width as Float)*factor).trunc() as usize, 1);
        let new_height = std::cmp::max(((height as Float)*factor).trunc() as usize, 1);

        let max_x = (width - 1) as Float;
        let max_y = (height - 1) as Float;
        let old_buffer = &image.buffer;

        let new_buffer = DMatrix::<Float>::from_fn(new_height, new_width, |r,c| {
            let x_prime = (c as Float / factor).min(max_x);
            let y_prime = (r as Float / factor).min(max_y);
            let left = x_prime.floor() as usize;
            let up = y_prime.floor() as usize;
            let right = std::cmp::min(left + 1, width - 1);
            let down = std::cmp::min(up + 1, height - 1);
            let right_ratio = x_prime - left as Float;
            let down_ratio = y_prime - up as Float;

            (1.0 - right_ratio)*(1.0 - down_ratio)*old_buffer[(up,left)] +
            right_ratio*(1.0 - down_ratio)*old_buffer[(up,right)] +
            (1.0 - right_ratio)*down_ratio*old_buffer[(down,left)] +
            right_ratio*down_ratio*old_buffer[(down,right)]
        });

        Image{
            buffer: new_buffer,
            original_encoding: image.original_encoding
        }
    }

    /// Pointwise a - b
    pub fn difference(a: &Image, b: &Image) -> Image {
        assert_eq!(a.buffer.shape(), b.buffer.shape());
        Image {
            buffer: &a.buffer - &b.buffer,
            original_encoding: ImageEncoding::F64
        }
    }

}
