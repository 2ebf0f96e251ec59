//! Geometry

// Define macros for property based testing.
#[cfg(test)]
#[macro_export]
macro_rules! prop_range {
    ($name: ident, $t: ty, $r: expr) => {
        prop_compose! {
            fn $name()(f in $r) -> $t {
                f
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_vector3 {
    ($name: ident, $t: ty, $xr: expr, $yr: expr, $zr: expr) => {
        prop_compose! {
            fn $name()(x in $xr, y in $yr, z in $zr) -> Vector3<$t> {
                Vector3 { x, y, z }
            }
        }
    };
}

#[cfg(test)]
#[macro_export]
macro_rules! prop_unit_vector3 {
    ($name: ident) => {
        prop_compose! {
            fn $name()(
                x in -1.0..1.0f32,
                y in -1.0..1.0f32,
                z in -1.0..1.0f32
            ) -> Vector3f {
                let v = Vector3f::new(x, y, z);
                if v.length_squared() < 1e-4 {
                    Vector3f::new(0.0, 0.0, 1.0)
                } else {
                    v.normalize()
                }
            }
        }
    };
}

mod frame;
mod point2;
mod point3;
mod ray;
mod vector3;

// Re-export.
pub use frame::*;
pub use point2::*;
pub use point3::*;
pub use ray::*;
pub use vector3::*;
