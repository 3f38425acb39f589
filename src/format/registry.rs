//! Format to calculator registry.
//!
//! Every [`ImageFormat`] maps to exactly one calculator. Sub-types share
//! their family's calculator.

use super::{
    bmp::BmpCalculator, dds::DdsCalculator, gif::GifCalculator, heif::HeifCalculator,
    icns::IcnsCalculator, ico::CurCalculator, ico::IcoCalculator, j2c::J2cCalculator,
    jp2::Jp2Calculator, jpeg::JpegCalculator, jxl::JxlCalculator, jxl::JxlStreamCalculator,
    ktx::KtxCalculator, png::PngCalculator, pnm::PnmCalculator, psd::PsdCalculator,
    svg::SvgCalculator, tga::TgaCalculator, tiff::TiffCalculator, webp::WebpCalculator,
    Calculator, ImageFormat,
};

/// The calculator registered for `format`.
///
/// The table is total today; `None` is reserved for formats that are
/// recognised but have no calculator.
pub fn calculator_for(format: ImageFormat) -> Option<&'static dyn Calculator> {
    let calculator: &'static dyn Calculator = match format {
        ImageFormat::Png => &PngCalculator,
        ImageFormat::Jpeg => &JpegCalculator,
        ImageFormat::Gif => &GifCalculator,
        ImageFormat::Webp => &WebpCalculator,
        ImageFormat::Jxl => &JxlCalculator,
        ImageFormat::JxlStream => &JxlStreamCalculator,
        ImageFormat::Jp2 => &Jp2Calculator,
        ImageFormat::J2c => &J2cCalculator,
        ImageFormat::Heif | ImageFormat::Avif | ImageFormat::Heic => &HeifCalculator,
        ImageFormat::Tiff => &TiffCalculator,
        ImageFormat::Psd => &PsdCalculator,
        ImageFormat::Bmp => &BmpCalculator,
        ImageFormat::Dds => &DdsCalculator,
        ImageFormat::Icns => &IcnsCalculator,
        ImageFormat::Ktx | ImageFormat::Ktx2 => &KtxCalculator,
        ImageFormat::Pnm => &PnmCalculator,
        ImageFormat::Ico => &IcoCalculator,
        ImageFormat::Cur => &CurCalculator,
        ImageFormat::Tga => &TgaCalculator,
        ImageFormat::Svg => &SvgCalculator,
    };
    Some(calculator)
}

/// All formats with a registered calculator.
///
/// This is static: disabling a format does not remove it from the list.
pub fn registered_formats() -> Vec<ImageFormat> {
    ImageFormat::ALL
        .into_iter()
        .filter(|format| calculator_for(*format).is_some())
        .collect()
}
