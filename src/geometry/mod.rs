pub mod hit_testing;
pub mod shapes;

pub use hit_testing::{element_at, handle_at, handle_rects, hit_test, Hit};
pub use shapes::{outline, regular_polygon, Outline};
