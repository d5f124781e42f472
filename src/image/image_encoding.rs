use crate::Float;

#[repr(u8)]
#[derive(Debug,Copy,Clone,PartialEq)]
pub enum ImageEncoding {
    U8,
    U16,
    F64
}

impl ImageEncoding {

    pub fn max_value(&self) -> Float {
        match self {
            ImageEncoding::U8 => u8::MAX as Float,
            ImageEncoding::U16 => u16::MAX as Float,
            ImageEncoding::F64 => 1.0
        }
    }

    // https://en.wikipedia.org/wiki/Normalization_(image_processing)
    pub fn normalize_to_gray(&self, max: Float, min : Float, value: Float) -> u8 {
        let range = 255 as Float; // 255 - 0
        if max <= min {
            return 0;
        }
        ((value - min) * (range / (max - min))).round().clamp(0.0, range) as u8
    }
}
