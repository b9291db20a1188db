//! Core types and traits for the sampler terminal dashboard.
//!
//! This crate provides the backend-independent contracts:
//! - Geometric primitives: [`Point`], [`Size`], [`Rect`]
//! - Color representation: [`Color`]
//! - Layout constraints: [`Constraints`]
//! - Rendering: the [`Canvas`] and [`Widget`] traits, verified through [`Brick`]
//! - Ingestion: [`Sample`] and the [`Consumer`] sink

mod brick_types;
mod color;
mod constraints;
mod geometry;
mod sample;
pub mod widget;

pub use brick_types::{Brick, BrickAssertion, BrickBudget, BrickVerification};
pub use color::{Color, ColorParseError};
pub use constraints::Constraints;
pub use geometry::{Point, Rect, Size};
pub use sample::{Consumer, Sample, SampleError};
pub use widget::{Canvas, FontWeight, LayoutResult, TextStyle, Widget};

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_color_new_always_in_range(r in -2.0f32..2.0, g in -2.0f32..2.0, b in -2.0f32..2.0, a in -2.0f32..2.0) {
            let c = Color::new(r, g, b, a);
            prop_assert!((0.0..=1.0).contains(&c.r));
            prop_assert!((0.0..=1.0).contains(&c.g));
            prop_assert!((0.0..=1.0).contains(&c.b));
            prop_assert!((0.0..=1.0).contains(&c.a));
        }

        #[test]
        fn prop_hex_roundtrip(r in 0u8..=255, g in 0u8..=255, b in 0u8..=255) {
            let c = Color::from_rgb8(r, g, b);
            let parsed = Color::from_hex(&c.to_hex()).unwrap();
            prop_assert_eq!(parsed.to_hex(), c.to_hex());
        }

        #[test]
        fn prop_finite_numbers_parse(v in -1.0e12f64..1.0e12) {
            let sample = Sample::new("p", v.to_string(), Color::WHITE);
            prop_assert_eq!(sample.parse_value(), Ok(v));
        }

        #[test]
        fn prop_inset_rect_stays_inside(x in 0.0f32..100.0, y in 0.0f32..100.0, w in 0.0f32..100.0, h in 0.0f32..100.0, d in 0.0f32..10.0) {
            let outer = Rect::new(x, y, w, h);
            let inner = outer.inset(d);
            prop_assert!(inner.width >= 0.0 && inner.height >= 0.0);
            prop_assert!(inner.width <= outer.width && inner.height <= outer.height);
        }
    }
}
