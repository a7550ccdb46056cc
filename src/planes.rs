//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0 in
//! the top left, and a rectangle on the complex plane with an
//! arbitrary pair of corners defining its lefttop and rightbottom.
use num::Complex;

use crate::error::RenderError;

/// The largest width or height, in pixels, we agree to render.
pub const MAX_DIMENSION: usize = 16384;

/// Describes the width and height of an integral plane that is assumed to start at
/// 0,0 and all values are assumed to be non-negative integers.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntegralPlane(pub usize, pub usize);

/// Describes the left-top corner and right-bottom corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

/// Describes the x, y of a pixel in the integral plane.  Row 0 is the
/// top of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// Contains the definitions of two planes: an integral cartesian plane,
/// and a complex cartesian plane.  Maps pixels of the one to points of
/// the other.  The y axis of the integral plane points down, so
/// walking down the rows walks down the imaginary axis.
#[derive(Debug, Clone)]
pub struct PlaneMapper {
    /// The extent of the integral plane.
    pub integral_plane: IntegralPlane,
    /// The two coordinates defining the complex plane, left-top and
    /// right-bottom.
    pub complex_plane: ComplexPlane,
    // Width and height of a single pixel on the complex plane.
    deltas: (f64, f64),
}

impl PlaneMapper {
    /// Constructor.  Takes the size of the integral plane and the two
    /// corners of the complex plane, and rejects any combination that
    /// does not describe a rectangle with area.
    pub fn new(
        width: usize,
        height: usize,
        lefttop: Complex<f64>,
        rightbottom: Complex<f64>,
    ) -> Result<PlaneMapper, RenderError> {
        check_dimension("width", width)?;
        check_dimension("height", height)?;

        let corners = [lefttop.re, lefttop.im, rightbottom.re, rightbottom.im];
        if corners.iter().any(|v| !v.is_finite()) {
            return Err(RenderError::Viewport(
                "corner coordinates must be finite".to_string(),
            ));
        }

        if lefttop.im < rightbottom.im {
            return Err(RenderError::Viewport(
                "The left top corner is not above the right bottom corner".to_string(),
            ));
        }

        // A mirrored real axis still maps cleanly; a flat one does not.
        if lefttop.re == rightbottom.re || lefttop.im == rightbottom.im {
            return Err(RenderError::Viewport(
                "The viewport has zero area".to_string(),
            ));
        }

        let deltas = (
            (rightbottom.re - lefttop.re) / (width as f64),
            (lefttop.im - rightbottom.im) / (height as f64),
        );

        Ok(PlaneMapper {
            integral_plane: IntegralPlane(width, height),
            complex_plane: ComplexPlane(lefttop, rightbottom),
            deltas,
        })
    }

    /// Width of the integral plane, in pixels.
    pub fn width(&self) -> usize {
        self.integral_plane.0
    }

    /// Height of the integral plane, in pixels.
    pub fn height(&self) -> usize {
        self.integral_plane.1
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.integral_plane.0 * self.integral_plane.1
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.integral_plane.0 == 0 || self.integral_plane.1 == 0
    }

    /// Distance along the real axis between two neighbouring columns.
    pub fn delta_real(&self) -> f64 {
        self.deltas.0
    }

    /// Distance along the imaginary axis between two neighbouring rows.
    pub fn delta_imag(&self) -> f64 {
        self.deltas.1
    }

    /// Given a pixel on the integral cartesian plane, map it to a point
    /// on the complex cartesian plane.  Pixels outside the integral
    /// plane are the caller's problem; they map to points outside the
    /// viewport.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex<f64> {
        self.coordinate_at(pixel.0 as f64, pixel.1 as f64)
    }

    /// Like `pixel_to_point`, but for fractional pixel coordinates.
    /// This is what the coordinate query mode asks for.
    #[inline]
    pub fn coordinate_at(&self, x: f64, y: f64) -> Complex<f64> {
        let origin = self.complex_plane.0;
        Complex::new(origin.re + x * self.deltas.0, origin.im - y * self.deltas.1)
    }
}

fn check_dimension(parameter: &'static str, value: usize) -> Result<(), RenderError> {
    if value == 0 {
        return Err(RenderError::parameter(parameter, "must be at least 1 pixel"));
    }
    if value > MAX_DIMENSION {
        return Err(RenderError::parameter(
            parameter,
            format!("{} exceeds the limit of {} pixels", value, MAX_DIMENSION),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planemapper_fails_on_upside_down_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, -1.0), Complex::new(1.0, 1.0));
        match pm {
            Err(RenderError::Viewport(_)) => {}
            other => panic!("expected a viewport error, got {:?}", other),
        }
    }

    #[test]
    fn planemapper_fails_on_flat_shape() {
        assert!(PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(-1.0, -1.0)).is_err());
        assert!(PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, 1.0)).is_err());
    }

    #[test]
    fn planemapper_fails_on_non_finite_corner() {
        let pm = PlaneMapper::new(4, 4, Complex::new(std::f64::NAN, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_err());
    }

    #[test]
    fn planemapper_names_bad_dimension() {
        let pm = PlaneMapper::new(0, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        match pm {
            Err(RenderError::Parameter { parameter, .. }) => assert_eq!(parameter, "width"),
            other => panic!("expected a parameter error, got {:?}", other),
        }
        let pm = PlaneMapper::new(4, MAX_DIMENSION + 1, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        match pm {
            Err(RenderError::Parameter { parameter, .. }) => assert_eq!(parameter, "height"),
            other => panic!("expected a parameter error, got {:?}", other),
        }
    }

    #[test]
    fn planemapper_passes_on_good_shape() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-1.0, 1.0), Complex::new(1.0, -1.0));
        assert!(pm.is_ok());
    }

    #[test]
    fn planemapper_computes_deltas() {
        let pm = PlaneMapper::new(100, 50, Complex::new(-2.0, 1.0), Complex::new(2.0, -1.0)).unwrap();
        assert_eq!(pm.delta_real(), 0.04);
        assert_eq!(pm.delta_imag(), 0.04);
        assert_eq!(pm.len(), 5000);
        assert!(!pm.is_empty());
    }

    #[test]
    fn pixel_to_point_origin_is_lefttop() {
        let lefttop = Complex::new(-2.0, 1.2377929688);
        let pm = PlaneMapper::new(640, 480, lefttop, Complex::new(0.4755859375, -1.2377929688))
            .unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), lefttop);
    }

    #[test]
    fn pixel_to_point_last_pixel_is_one_step_from_rightbottom() {
        let rightbottom = Complex::new(1.0, -1.5);
        let pm = PlaneMapper::new(100, 100, Complex::new(-2.0, 1.5), rightbottom).unwrap();
        let last = pm.pixel_to_point(&Pixel(99, 99));
        assert!((rightbottom.re - last.re - pm.delta_real()).abs() < 1e-12);
        assert!((last.im - rightbottom.im - pm.delta_imag()).abs() < 1e-12);
    }

    #[test]
    fn pixel_to_points_on_mixed_planes() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0)).unwrap();
        assert_eq!(pm.pixel_to_point(&Pixel(2, 2)), Complex::new(0.0, 0.0));
        assert_eq!(pm.pixel_to_point(&Pixel(0, 0)), Complex::new(-2.0, 2.0));
        assert_eq!(pm.pixel_to_point(&Pixel(1, 3)), Complex::new(-1.0, -1.0));
        assert_eq!(pm.pixel_to_point(&Pixel(4, 4)), Complex::new(2.0, -2.0));
    }

    #[test]
    fn coordinate_at_accepts_fractional_pixels() {
        let pm = PlaneMapper::new(4, 4, Complex::new(-2.0, 2.0), Complex::new(2.0, -2.0)).unwrap();
        assert_eq!(pm.coordinate_at(0.5, 1.5), Complex::new(-1.5, 0.5));
    }
}
