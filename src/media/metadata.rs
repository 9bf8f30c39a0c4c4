use crate::store::MediaMetadata;

/// File size plus pixel dimensions for PNG, GIF and JPEG payloads.
#[must_use]
pub fn derive_metadata(data: &[u8], mime_type: &str) -> MediaMetadata {
    let dimensions = match mime_type {
        "image/png" => png_dimensions(data),
        "image/gif" => gif_dimensions(data),
        "image/jpeg" => jpeg_dimensions(data),
        _ => None,
    };
    MediaMetadata {
        file_size: data.len() as u64,
        width: dimensions.map(|(w, _)| w),
        height: dimensions.map(|(_, h)| h),
    }
}

fn be_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_be_bytes([bytes[0], bytes[1]]))
}

fn be_u32(data: &[u8], at: usize) -> Option<u32> {
    let bytes = data.get(at..at + 4)?;
    Some(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn le_u16(data: &[u8], at: usize) -> Option<u16> {
    let bytes = data.get(at..at + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

// IHDR is always the first chunk: width and height follow the chunk header.
fn png_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !data.starts_with(b"\x89PNG\r\n\x1a\n") || data.get(12..16)? != b"IHDR" {
        return None;
    }
    Some((be_u32(data, 16)?, be_u32(data, 20)?))
}

fn gif_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !(data.starts_with(b"GIF87a") || data.starts_with(b"GIF89a")) {
        return None;
    }
    Some((u32::from(le_u16(data, 6)?), u32::from(le_u16(data, 8)?)))
}

// Walk marker segments until a start-of-frame.
fn jpeg_dimensions(data: &[u8]) -> Option<(u32, u32)> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;
    loop {
        while *data.get(pos)? != 0xFF {
            pos += 1;
        }
        while *data.get(pos)? == 0xFF {
            pos += 1;
        }
        let marker = *data.get(pos)?;
        pos += 1;

        match marker {
            0xD8 | 0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => return None,
            _ => {}
        }

        let length = usize::from(be_u16(data, pos)?);
        let is_frame = matches!(marker, 0xC0..=0xCF) && !matches!(marker, 0xC4 | 0xC8 | 0xCC);
        if is_frame {
            let height = be_u16(data, pos + 3)?;
            let width = be_u16(data, pos + 5)?;
            return Some((u32::from(width), u32::from(height)));
        }
        pos += length;
    }
}
