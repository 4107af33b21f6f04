/// ROI rectangle within a frame, used to pass region coordinates without many arguments.
#[derive(Clone, Copy, Debug)]
pub struct RoiRect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

/// Precompute a normalized 1D Gaussian kernel.
///
/// `kernel_size` must be odd and >= 1; `sigma` must be positive.
pub fn gaussian_kernel_1d(kernel_size: usize, sigma: f64) -> Vec<f32> {
    debug_assert!(kernel_size >= 1 && kernel_size % 2 == 1);
    debug_assert!(sigma > 0.0);
    let half = (kernel_size / 2) as f64;
    let mut kernel_f64: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let x = i as f64 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = kernel_f64.iter().sum();
    for v in &mut kernel_f64 {
        *v /= sum;
    }
    kernel_f64.iter().map(|&v| v as f32).collect()
}

/// Mirror an out-of-range index back into `0..len` without repeating the edge
/// sample (`dcb|abcd|cba`).
fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

/// Convenience wrapper that allocates its own temp buffer.
#[cfg(test)]
pub fn separable_gaussian_blur(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel_size: usize,
    sigma: f64,
) {
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let kernel = gaussian_kernel_1d(kernel_size, sigma);
    let mut temp = Vec::new();
    separable_gaussian_blur_with_kernel(data, width, height, channels, &kernel, &mut temp);
}

/// Apply a separable Gaussian blur using a pre-computed kernel, reusing `temp`.
///
/// The buffer is treated as an isolated image: samples past its edges are
/// reflected from inside it.
pub fn separable_gaussian_blur_with_kernel(
    data: &mut [u8],
    width: usize,
    height: usize,
    channels: usize,
    kernel: &[f32],
    temp: &mut Vec<f32>,
) {
    let kernel_size = kernel.len();
    if kernel_size <= 1 || width == 0 || height == 0 {
        return;
    }
    let half = (kernel_size / 2) as isize;

    let needed = width * height * channels;
    temp.resize(needed, 0.0);

    let x_taps: Vec<Vec<usize>> = (0..width)
        .map(|x| {
            (0..kernel_size as isize)
                .map(|k| reflect_101(x as isize + k - half, width))
                .collect()
        })
        .collect();
    let y_taps: Vec<Vec<usize>> = (0..height)
        .map(|y| {
            (0..kernel_size as isize)
                .map(|k| reflect_101(y as isize + k - half, height))
                .collect()
        })
        .collect();

    // Horizontal pass: data → temp
    for y in 0..height {
        let row = y * width;
        for (x, taps) in x_taps.iter().enumerate() {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (&sx, &w) in taps.iter().zip(kernel) {
                    sum += data[(row + sx) * channels + c] as f32 * w;
                }
                temp[(row + x) * channels + c] = sum;
            }
        }
    }

    // Vertical pass: temp → data
    for (y, taps) in y_taps.iter().enumerate() {
        for x in 0..width {
            for c in 0..channels {
                let mut sum = 0.0f32;
                for (&sy, &w) in taps.iter().zip(kernel) {
                    sum += temp[(sy * width + x) * channels + c] * w;
                }
                data[(y * width + x) * channels + c] = sum.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Extract a rectangular ROI from frame data into a reusable buffer.
pub fn extract_roi(
    data: &[u8],
    frame_width: usize,
    channels: usize,
    rect: RoiRect,
    roi: &mut Vec<u8>,
) {
    roi.resize(rect.w * rect.h * channels, 0);
    for row in 0..rect.h {
        let src_offset = ((rect.y + row) * frame_width + rect.x) * channels;
        let dst_offset = row * rect.w * channels;
        roi[dst_offset..dst_offset + rect.w * channels]
            .copy_from_slice(&data[src_offset..src_offset + rect.w * channels]);
    }
}

/// Write a blurred ROI buffer back into frame data.
pub fn write_roi_back(
    data: &mut [u8],
    roi: &[u8],
    frame_width: usize,
    channels: usize,
    rect: RoiRect,
) {
    for row in 0..rect.h {
        let dst_offset = ((rect.y + row) * frame_width + rect.x) * channels;
        let src_offset = row * rect.w * channels;
        data[dst_offset..dst_offset + rect.w * channels]
            .copy_from_slice(&roi[src_offset..src_offset + rect.w * channels]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_sums_to_one() {
        let k = gaussian_kernel_1d(7, 1.5);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_kernel_is_symmetric() {
        let k = gaussian_kernel_1d(23, 30.0);
        for i in 0..k.len() / 2 {
            assert!((k[i] - k[k.len() - 1 - i]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_kernel_center_is_largest() {
        let k = gaussian_kernel_1d(7, 1.5);
        let center = k[3];
        for (i, &v) in k.iter().enumerate() {
            if i != 3 {
                assert!(center >= v);
            }
        }
    }

    #[test]
    fn test_wide_sigma_flattens_kernel() {
        // sigma far larger than the kernel: weights approach a box filter
        let k = gaussian_kernel_1d(23, 30.0);
        let (min, max) = k
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        assert!(max / min < 1.2);
    }

    #[test]
    fn test_reflect_101() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(-2, 5), 2);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(6, 5), 2);
        assert_eq!(reflect_101(3, 5), 3);
    }

    #[test]
    fn test_reflect_101_kernel_wider_than_image() {
        for i in -60..60 {
            assert!(reflect_101(i, 3) < 3);
        }
        assert_eq!(reflect_101(-7, 1), 0);
    }

    #[test]
    fn test_blur_uniform_image_unchanged() {
        let mut data = vec![128u8; 10 * 10 * 3];
        separable_gaussian_blur(&mut data, 10, 10, 3, 5, 1.1);
        assert!(data.iter().all(|&v| v == 128));
    }

    #[test]
    fn test_blur_uniform_with_oversized_kernel_unchanged() {
        let mut data = vec![77u8; 4 * 3 * 3];
        separable_gaussian_blur(&mut data, 4, 3, 3, 99, 30.0);
        assert!(data.iter().all(|&v| v == 77));
    }

    #[test]
    fn test_blur_modifies_high_contrast() {
        // A single bright pixel in a dark image should be spread out
        let mut data = vec![0u8; 10 * 10 * 3];
        let cx = 5 * 10 + 5;
        data[cx * 3] = 255;
        data[cx * 3 + 1] = 255;
        data[cx * 3 + 2] = 255;

        let original = data.clone();
        separable_gaussian_blur(&mut data, 10, 10, 3, 5, 1.1);

        assert!(data[cx * 3] < 255);
        let neighbor = (5 * 10 + 6) * 3;
        assert!(data[neighbor] > 0);
        assert_ne!(data, original);
    }

    #[test]
    fn test_kernel_size_1_is_identity() {
        let mut data: Vec<u8> = (0..75).map(|v| v as u8).collect();
        let original = data.clone();
        separable_gaussian_blur(&mut data, 5, 5, 3, 1, 1.0);
        assert_eq!(data, original);
    }

    #[test]
    fn test_extract_and_write_back_roundtrip() {
        let data: Vec<u8> = (0..4 * 4 * 3).map(|v| v as u8).collect();
        let rect = RoiRect { x: 1, y: 1, w: 2, h: 2 };
        let mut roi = Vec::new();
        extract_roi(&data, 4, 3, rect, &mut roi);
        assert_eq!(roi.len(), 12);
        assert_eq!(&roi[..3], &data[15..18]); // pixel (1,1)

        let mut target = vec![0u8; data.len()];
        write_roi_back(&mut target, &roi, 4, 3, rect);
        assert_eq!(&target[15..18], &data[15..18]);
        assert_eq!(&target[..3], &[0, 0, 0]);
    }
}
