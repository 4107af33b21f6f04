use std::borrow::Cow;

use ndarray::{ArrayView3, ArrayViewMut3};

/// Order of the colour channels within each pixel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    Bgr,
}

/// A single image: contiguous interleaved bytes in row-major order.
///
/// The channel order is carried explicitly so conversion happens at the
/// I/O boundary only; the blur treats pixel data as opaque.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    order: ChannelOrder,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Self {
        Self::with_order(data, width, height, channels, ChannelOrder::Rgb)
    }

    pub fn with_order(
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        order: ChannelOrder,
    ) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            order,
        }
    }

    /// A frame filled with one colour, given in RGB.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take((width as usize) * (height as usize) * 3)
            .collect();
        Self::new(data, width, height, 3)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn channel_order(&self) -> ChannelOrder {
        self.order
    }

    /// Pixel bytes in RGB order, swapping only when the frame is BGR.
    pub fn rgb_data(&self) -> Cow<'_, [u8]> {
        match self.order {
            ChannelOrder::Rgb => Cow::Borrowed(&self.data),
            ChannelOrder::Bgr => {
                let mut swapped = self.data.clone();
                for px in swapped.chunks_exact_mut(self.channels as usize) {
                    if px.len() >= 3 {
                        px.swap(0, 2);
                    }
                }
                Cow::Owned(swapped)
            }
        }
    }

    /// Pixel bytes expanded to RGBA for display surfaces.
    pub fn to_rgba(&self) -> Vec<u8> {
        let rgb = self.rgb_data();
        let channels = self.channels as usize;
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 4);
        for px in rgb.chunks_exact(channels) {
            match channels {
                1 | 2 => out.extend_from_slice(&[px[0], px[0], px[0], 255]),
                3 => out.extend_from_slice(&[px[0], px[1], px[2], 255]),
                _ => out.extend_from_slice(&px[..4]),
            }
        }
        out
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
