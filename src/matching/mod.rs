pub mod sift_descriptor;
