//! Image Exporter Module
//! Encodes a rendered chart as PNG and wraps it in a data-URI download link.
//!
//! Only PNG is produced. Nothing is written to disk.

use crate::charts::RenderedPlot;
use crate::error::Result;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use serde::Serialize;
use std::io::Cursor;

const FILE_FORMAT: &str = "png";

/// An embeddable download link for one exported chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    /// `data:file/png;base64,...`
    pub href: String,
    /// `<plot_name>.png`
    pub filename: String,
}

impl DownloadLink {
    /// Anchor tag ready to embed in a page.
    pub fn html(&self) -> String {
        format!(
            r#"<a href="{}" download="{}">Download {}</a>"#,
            self.href,
            self.filename,
            FILE_FORMAT.to_uppercase()
        )
    }
}

pub struct ImageExporter;

impl ImageExporter {
    /// Encode an image as PNG bytes.
    pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        image.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
        Ok(bytes)
    }

    /// Wrap already-encoded bytes in a download link named after `plot_name`.
    pub fn download_link(file_bytes: &[u8], plot_name: &str) -> DownloadLink {
        DownloadLink {
            href: format!("data:file/{};base64,{}", FILE_FORMAT, STANDARD.encode(file_bytes)),
            filename: format!("{}.{}", plot_name, FILE_FORMAT),
        }
    }

    /// Consume a rendered plot and produce its download link.
    pub fn export(plot: RenderedPlot) -> Result<DownloadLink> {
        let bytes = Self::encode_png(&plot.image)?;
        Ok(Self::download_link(&bytes, plot.plot_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn checker() -> RgbImage {
        RgbImage::from_fn(8, 8, |x, y| {
            if (x + y) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }

    #[test]
    fn link_embeds_base64_bytes() {
        let link = ImageExporter::download_link(b"hello", "scatter_plot");
        assert_eq!(link.href, "data:file/png;base64,aGVsbG8=");
        assert_eq!(link.filename, "scatter_plot.png");
        assert_eq!(
            link.html(),
            r#"<a href="data:file/png;base64,aGVsbG8=" download="scatter_plot.png">Download PNG</a>"#
        );
    }

    #[test]
    fn png_bytes_carry_signature() {
        let bytes = ImageExporter::encode_png(&checker()).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn export_is_deterministic() {
        let a = ImageExporter::encode_png(&checker()).unwrap();
        let b = ImageExporter::encode_png(&checker()).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            ImageExporter::download_link(&a, "heatmap"),
            ImageExporter::download_link(&b, "heatmap")
        );
    }

    #[test]
    fn export_decodes_back_to_same_pixels() {
        let bytes = ImageExporter::encode_png(&checker()).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded, checker());
    }
}
