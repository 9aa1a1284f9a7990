//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and the complex plane, expressed as a zoom factor (pixels per unit)
//! and the complex point that sits at the center of the image.
use num::Complex;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the x, y of a pixel in a region.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Maps pixels on an integral cartesian plane to points on the
/// complex cartesian plane.  The center of the image lands on
/// `offset`, and one unit of the complex plane spans `zoom` pixels.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The right-lower hand corner of the integral cartesian plane.
    pub integral_plane: IntegralPlane,
    /// Pixels per unit of the complex plane.
    pub zoom: f64,
    /// The complex point at the center of the image.
    pub offset: Complex<f64>,
}

impl PlaneMapper {
    /// Constructor.  No checks are made on `zoom`; a zoom of zero maps
    /// every pixel to an infinite or NaN point, which the escape-time
    /// functions classify as escaped.
    pub fn new(width: usize, height: usize, zoom: f64, offset: Complex<f64>) -> PlaneMapper {
        PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            zoom,
            offset,
        }
    }

    /// The total number of points in the integral grid.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane has no area.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Given a pixel on the integral cartesian plane, map it to a point
    /// on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        let half_width = self.integral_plane.0 as f64 / 2.0;
        let half_height = self.integral_plane.1 as f64 / 2.0;
        Complex::new(
            (pixel.0 as f64 - half_width) / self.zoom + self.offset.re,
            (pixel.1 as f64 - half_height) / self.zoom + self.offset.im,
        )
    }
}
