use crate::Float;

pub trait Kernel: Sync {
    // Filter taps, centered on the middle element
    fn kernel(&self) -> &Vec<Float>;
    // Size at which the filter is traversed
    fn step(&self) -> usize;
    // Half of the width of the kernel save the center element
    fn half_width(&self) -> usize {
        (self.kernel().len()-1)/2
    }

    fn normalizing_constant(&self) -> Float;
}
