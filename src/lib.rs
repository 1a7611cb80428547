//! Uniform random points on the surface of, and inside, a sphere.

pub mod math;
pub mod common;
pub mod math_random;
pub mod spherical;
pub mod stats;
pub mod config;
pub mod progress;

pub use math::{Real,Real3};
pub use math_random::Random;
pub use spherical::{
    Direction,Mode,Sphere,
    point_on_sphere,point_inside_sphere,
    random_point_on_sphere,random_point_inside_sphere
};
