use ndarray::ArrayView2;

pub(crate) struct Interpolator;

impl Interpolator {
    pub(crate) fn get_isotropic_dimensions(
        spacing: (f32, f32, f32),
        original_dim: (usize, usize, usize),
    ) -> (u32, u32, u32) {
        let (x_spacing, y_spacing, z_spacing) = spacing;
        let min_spacing = x_spacing.min(y_spacing).min(z_spacing);
        let inv_min_spacing = 1.0 / min_spacing; // Multiply instead of divide

        // original_dim is (depth, height, width) corresponding to (z, y, x)
        let new_x = (original_dim.2 as f32 * x_spacing * inv_min_spacing) as u32;
        let new_y = (original_dim.1 as f32 * y_spacing * inv_min_spacing) as u32;
        let new_z = (original_dim.0 as f32 * z_spacing * inv_min_spacing) as u32;

        (new_z.max(1), new_y.max(1), new_x.max(1))
    }

    /// `y`/`x` must lie inside the plane.
    #[inline]
    pub(crate) fn bilinear_interpolate<T: Copy + Into<f32>>(
        plane: &ArrayView2<'_, T>,
        y: f32,
        x: f32,
    ) -> f32 {
        let (height, width) = plane.dim();

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dy = y - y0 as f32;
        let dx = x - x0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;

        let v00: f32 = plane[[y0, x0]].into();
        let v01: f32 = plane[[y0, x1]].into();
        let v10: f32 = plane[[y1, x0]].into();
        let v11: f32 = plane[[y1, x1]].into();

        let v0 = v00.mul_add(one_minus_dx, v01 * dx);
        let v1 = v10.mul_add(one_minus_dx, v11 * dx);

        v0.mul_add(one_minus_dy, v1 * dy)
    }

    #[inline]
    pub(crate) fn nearest<T: Copy + Into<f32>>(plane: &ArrayView2<'_, T>, y: f32, x: f32) -> f32 {
        let (height, width) = plane.dim();
        let row = (y.round() as usize).min(height - 1);
        let column = (x.round() as usize).min(width - 1);
        plane[[row, column]].into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn isotropic_dimensions_stretch_coarse_axes() {
        // 2 mm slices over 0.5 mm pixels
        let dim = Interpolator::get_isotropic_dimensions((0.5, 0.5, 2.0), (10, 64, 64));
        assert_eq!(dim, (40, 64, 64));
    }

    #[test]
    fn bilinear_blends_neighbours() {
        let plane = array![[0i16, 100], [200, 300]];
        let view = plane.view();
        assert_abs_diff_eq!(Interpolator::bilinear_interpolate(&view, 0.0, 0.0), 0.0);
        assert_abs_diff_eq!(Interpolator::bilinear_interpolate(&view, 0.5, 0.5), 150.0);
        assert_abs_diff_eq!(Interpolator::bilinear_interpolate(&view, 1.0, 1.0), 300.0);
        assert_abs_diff_eq!(Interpolator::nearest(&view, 0.6, 0.4), 200.0);
    }
}
