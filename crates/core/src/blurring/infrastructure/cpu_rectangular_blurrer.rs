use std::cell::RefCell;

use crate::blurring::domain::blur_settings::BlurSettings;
use crate::blurring::domain::frame_blurrer::FrameBlurrer;
use crate::shared::frame::Frame;
use crate::shared::region::Region;

use super::gaussian::{self, RoiRect};

/// CPU rectangular blurrer using separable Gaussian blur.
///
/// Each region is clamped to the frame, cut out, blurred as an isolated
/// image and pasted back, so pixels outside the regions are never read or
/// written.
pub struct CpuRectangularBlurrer {
    settings: BlurSettings,
    kernel: Vec<f32>,
    roi_buf: RefCell<Vec<u8>>,
    blur_temp: RefCell<Vec<f32>>,
}

impl CpuRectangularBlurrer {
    pub fn new(settings: BlurSettings) -> Self {
        Self {
            kernel: gaussian::gaussian_kernel_1d(settings.kernel_size, settings.effective_sigma()),
            settings,
            roi_buf: RefCell::new(Vec::new()),
            blur_temp: RefCell::new(Vec::new()),
        }
    }

    pub fn settings(&self) -> BlurSettings {
        self.settings
    }
}

impl Default for CpuRectangularBlurrer {
    fn default() -> Self {
        Self::new(BlurSettings::default())
    }
}

impl FrameBlurrer for CpuRectangularBlurrer {
    fn blur(
        &self,
        frame: &mut Frame,
        regions: &[Region],
    ) -> Result<(), Box<dyn std::error::Error>> {
        let fw = frame.width() as usize;
        let (frame_w, frame_h) = (frame.width(), frame.height());
        let channels = frame.channels() as usize;
        let data = frame.data_mut();

        let mut roi = self.roi_buf.borrow_mut();
        let mut temp = self.blur_temp.borrow_mut();

        for r in regions {
            let clamped = r.clamp_to(frame_w, frame_h);
            if clamped.is_empty() {
                continue;
            }
            if clamped != *r {
                log::warn!("Region {r} exceeds {frame_w}x{frame_h} frame, clamped to {clamped}");
            }

            let rect = RoiRect {
                x: clamped.x1() as usize,
                y: clamped.y1() as usize,
                w: clamped.width() as usize,
                h: clamped.height() as usize,
            };

            gaussian::extract_roi(data, fw, channels, rect, &mut roi);
            gaussian::separable_gaussian_blur_with_kernel(
                &mut roi,
                rect.w,
                rect.h,
                channels,
                &self.kernel,
                &mut temp,
            );
            gaussian::write_roi_back(data, &roi, fw, channels, rect);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_frame(width: u32, height: u32, value: u8) -> Frame {
        let data = vec![value; (width * height * 3) as usize];
        Frame::new(data, width, height, 3)
    }

    fn gradient_frame(width: u32, height: u32) -> Frame {
        let mut data = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 7 % 256) as u8, (y * 5 % 256) as u8, ((x + y) % 256) as u8]);
            }
        }
        Frame::new(data, width, height, 3)
    }

    fn small_blurrer() -> CpuRectangularBlurrer {
        CpuRectangularBlurrer::new(BlurSettings::new(5, 1.1).unwrap())
    }

    fn assert_outside_unchanged(before: &Frame, after: &Frame, region: &Region) {
        let channels = before.channels() as usize;
        for y in 0..before.height() as i32 {
            for x in 0..before.width() as i32 {
                if region.contains(x, y) {
                    continue;
                }
                let idx = (y as usize * before.width() as usize + x as usize) * channels;
                assert_eq!(
                    &before.data()[idx..idx + channels],
                    &after.data()[idx..idx + channels],
                    "pixel ({x},{y}) outside {region} changed"
                );
            }
        }
    }

    #[test]
    fn test_no_regions_frame_unchanged() {
        let mut frame = gradient_frame(40, 30);
        let original = frame.clone();
        small_blurrer().blur(&mut frame, &[]).unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_blur_modifies_region_pixels() {
        let mut frame = make_frame(100, 100, 0);
        let data = frame.data_mut();
        for y in 10..15 {
            for x in 10..15 {
                let idx = (y * 100 + x) * 3;
                data[idx] = 255;
                data[idx + 1] = 255;
                data[idx + 2] = 255;
            }
        }

        small_blurrer()
            .blur(&mut frame, &[Region::from_xywh(5, 5, 30, 30)])
            .unwrap();

        // one row above the bright patch, still inside the region
        let neighbor = (9 * 100 + 12) * 3;
        assert!(
            frame.data()[neighbor] > 0,
            "blur should spread to adjacent pixels"
        );
    }

    #[test]
    fn test_pixels_outside_region_byte_identical() {
        let mut frame = gradient_frame(64, 48);
        let original = frame.clone();
        let region = Region::new(10, 12, 33, 29);
        CpuRectangularBlurrer::default()
            .blur(&mut frame, &[region])
            .unwrap();
        assert_outside_unchanged(&original, &frame, &region);
        assert_ne!(frame, original);
    }

    #[test]
    fn test_multiple_regions() {
        let mut frame = make_frame(100, 100, 0);
        let data = frame.data_mut();
        let idx1 = (15 * 100 + 15) * 3;
        data[idx1] = 255;
        let idx2 = (75 * 100 + 75) * 3;
        data[idx2] = 255;

        small_blurrer()
            .blur(
                &mut frame,
                &[Region::from_xywh(10, 10, 20, 20), Region::from_xywh(70, 70, 20, 20)],
            )
            .unwrap();

        assert!(frame.data()[idx1] < 255);
        assert!(frame.data()[idx2] < 255);
    }

    #[test]
    fn test_zero_size_region_is_noop() {
        let mut frame = gradient_frame(50, 50);
        let original = frame.clone();
        small_blurrer()
            .blur(&mut frame, &[Region::new(10, 10, 10, 30), Region::new(5, 5, 5, 5)])
            .unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_out_of_bounds_region_is_clamped() {
        let mut frame = gradient_frame(40, 40);
        let original = frame.clone();
        let region = Region::new(30, 30, 80, 80);
        small_blurrer().blur(&mut frame, &[region]).unwrap();
        assert_outside_unchanged(&original, &frame, &Region::new(30, 30, 40, 40));
    }

    #[test]
    fn test_region_fully_outside_is_noop() {
        let mut frame = gradient_frame(40, 40);
        let original = frame.clone();
        small_blurrer()
            .blur(&mut frame, &[Region::new(-50, -50, -10, -10)])
            .unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_uniform_region_unchanged_with_soft_preset() {
        let mut frame = Frame::solid(100, 100, [200, 40, 90]);
        let original = frame.clone();
        let blurrer = CpuRectangularBlurrer::new(BlurSettings::new(23, 30.0).unwrap());
        blurrer.blur(&mut frame, &[Region::new(10, 10, 30, 30)]).unwrap();
        assert_eq!(frame, original);
    }

    #[test]
    fn test_overlapping_regions_blur_twice() {
        let mut once = gradient_frame(40, 40);
        let mut twice = once.clone();
        let region = Region::new(5, 5, 25, 25);
        let blurrer = small_blurrer();
        blurrer.blur(&mut once, &[region]).unwrap();
        blurrer.blur(&mut twice, &[region, region]).unwrap();

        let mut expected = once.clone();
        blurrer.blur(&mut expected, &[region]).unwrap();
        assert_eq!(twice, expected);
    }

    #[test]
    fn test_four_channel_frames() {
        let mut frame = Frame::new(vec![0u8; 20 * 20 * 4], 20, 20, 4);
        frame.data_mut()[(10 * 20 + 10) * 4 + 3] = 255;
        small_blurrer()
            .blur(&mut frame, &[Region::new(5, 5, 15, 15)])
            .unwrap();
        assert!(frame.data()[(10 * 20 + 11) * 4 + 3] > 0);
    }

    #[test]
    fn test_default_settings_are_strong_profile() {
        let blurrer = CpuRectangularBlurrer::default();
        assert_eq!(blurrer.kernel.len(), 99);
        assert_eq!(blurrer.settings(), BlurSettings::default());
    }
}
