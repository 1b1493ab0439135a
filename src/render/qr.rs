//! QR codes for recording links, embedded as data URIs.

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

use crate::constants::render::QR_DIMENSION;

/// SVG QR code for `link` as a `data:` URI, or `None` for an empty link.
///
/// Encoding failures (e.g. an absurdly long link) are logged and yield `None`
/// so the page still renders.
pub fn qr_data_uri(link: &str) -> Option<String> {
    let link = link.trim();
    if link.is_empty() {
        return None;
    }

    let code = match QrCode::with_error_correction_level(link.as_bytes(), EcLevel::M) {
        Ok(code) => code,
        Err(e) => {
            tracing::warn!("Cannot encode QR code for {link}: {e}");
            return None;
        }
    };
    let image = code
        .render::<svg::Color<'_>>()
        .min_dimensions(QR_DIMENSION, QR_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();
    Some(format!("data:image/svg+xml;base64,{}", base64::encode(image)))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn link_becomes_svg_data_uri() {
        let uri = qr_data_uri("https://www.youtube.com/watch?v=abc").unwrap();
        assert!(uri.starts_with("data:image/svg+xml;base64,"));
        let svg = base64::decode(uri.trim_start_matches("data:image/svg+xml;base64,")).unwrap();
        assert!(String::from_utf8(svg).unwrap().contains("<svg"));
    }

    #[test]
    fn blank_link_has_no_code() {
        assert!(qr_data_uri("").is_none());
        assert!(qr_data_uri("   ").is_none());
    }
}
