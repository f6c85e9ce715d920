// THEORY:
// Raw distance maps carry single-pixel speckle from sensor noise, and a
// statistical test over an unsmoothed map would fire on it. This module
// damps that noise with a fixed 9x9 Gaussian blur before the statistics
// are taken. The blur is separable (one horizontal pass into a float
// buffer, one vertical pass back to bytes) with the sigma derived from
// the kernel size the same way OpenCV derives it when none is given, and
// reflect-101 indexing at the borders.

use crate::core_modules::distance_map::DistanceMap;

/// Side length of the fixed blur kernel.
pub const KERNEL_SIZE: usize = 9;

/// 1-D Gaussian weights for `size` taps, normalized to sum to one.
/// Sigma follows `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
fn gaussian_kernel(size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let center = (size as f32 - 1.0) / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;
    let mut weights: Vec<f32> = (0..size)
        .map(|i| {
            let d = i as f32 - center;
            (-d * d / two_sigma_sq).exp()
        })
        .collect();
    let sum: f32 = weights.iter().sum();
    for w in &mut weights {
        *w /= sum;
    }
    weights
}

/// Reflect-101 border indexing: -1 maps to 1, `len` maps to `len - 2`.
fn reflect(index: isize, len: isize) -> usize {
    if len == 1 {
        return 0;
    }
    let mut i = index;
    while i < 0 || i >= len {
        i = if i < 0 { -i } else { 2 * (len - 1) - i };
    }
    i as usize
}

/// Applies the fixed Gaussian blur to a distance map.
pub fn smooth(map: &DistanceMap) -> DistanceMap {
    let width = map.width() as usize;
    let height = map.height() as usize;
    if width == 0 || height == 0 {
        return map.clone();
    }

    let kernel = gaussian_kernel(KERNEL_SIZE);
    let radius = (KERNEL_SIZE / 2) as isize;
    let src = map.values();

    let mut horizontal = vec![0.0f32; width * height];
    for y in 0..height {
        let row = &src[y * width..(y + 1) * width];
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sx = reflect(x as isize + k as isize - radius, width as isize);
                acc += row[sx] as f32 * w;
            }
            horizontal[y * width + x] = acc;
        }
    }

    let mut values = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            let mut acc = 0.0f32;
            for (k, w) in kernel.iter().enumerate() {
                let sy = reflect(y as isize + k as isize - radius, height as isize);
                acc += horizontal[sy * width + x] * w;
            }
            values[y * width + x] = acc.round().min(255.0) as u8;
        }
    }

    DistanceMap::new(map.width(), map.height(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(KERNEL_SIZE);
        assert_eq!(kernel.len(), KERNEL_SIZE);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5, "kernel sum was {sum}");
        for i in 0..KERNEL_SIZE / 2 {
            assert!((kernel[i] - kernel[KERNEL_SIZE - 1 - i]).abs() < 1e-6);
        }
        // The center tap dominates.
        assert!(kernel[KERNEL_SIZE / 2] > kernel[0]);
    }

    #[test]
    fn reflect_101_indexing() {
        assert_eq!(reflect(-1, 10), 1);
        assert_eq!(reflect(-2, 10), 2);
        assert_eq!(reflect(10, 10), 8);
        assert_eq!(reflect(11, 10), 7);
        assert_eq!(reflect(5, 10), 5);
        assert_eq!(reflect(-3, 1), 0);
    }

    #[test]
    fn constant_map_is_unchanged() {
        let map = DistanceMap::new(20, 15, vec![90u8; 300]);
        let smoothed = smooth(&map);
        assert_eq!(smoothed, map);
    }

    #[test]
    fn spike_is_attenuated_and_spread() {
        let width = 21usize;
        let height = 21usize;
        let mut values = vec![0u8; width * height];
        values[10 * width + 10] = 255;
        let map = DistanceMap::new(width as u32, height as u32, values);

        let smoothed = smooth(&map);
        let center = smoothed.values()[10 * width + 10];
        let neighbor = smoothed.values()[10 * width + 11];
        assert!(center < 255, "spike should lose energy, kept {center}");
        assert!(neighbor > 0, "energy should spread to neighbors");
        assert!(center >= neighbor, "center stays the brightest");
    }

    #[test]
    fn shape_is_preserved() {
        let map = DistanceMap::new(7, 3, vec![0u8; 21]);
        let smoothed = smooth(&map);
        assert_eq!(smoothed.width(), 7);
        assert_eq!(smoothed.height(), 3);
        assert_eq!(smoothed.values().len(), 21);
    }
}
