mod plane;
mod ray;

pub use plane::Plane;
pub use ray::Ray;
