pub mod similarity;

pub use similarity::euclidean_distance;
