/// The 32-color r/Place 2022 palette, in canvas order.
pub const PALETTE: [[u8; 3]; 32] = [
    [0x6D, 0x00, 0x1A],
    [0xBE, 0x00, 0x39],
    [0xFF, 0x45, 0x00],
    [0xFF, 0xA8, 0x00],
    [0xFF, 0xD6, 0x35],
    [0xFF, 0xF8, 0xB8],
    [0x00, 0xA3, 0x68],
    [0x00, 0xCC, 0x78],
    [0x7E, 0xED, 0x56],
    [0x00, 0x75, 0x6F],
    [0x00, 0x9E, 0xAA],
    [0x00, 0xCC, 0xC0],
    [0x24, 0x50, 0xA4],
    [0x36, 0x90, 0xEA],
    [0x51, 0xE9, 0xF4],
    [0x49, 0x3A, 0xC1],
    [0x6A, 0x5C, 0xFF],
    [0x94, 0xB3, 0xFF],
    [0x81, 0x1E, 0x9F],
    [0xB4, 0x4A, 0xC0],
    [0xE4, 0xAB, 0xFF],
    [0xDE, 0x10, 0x7F],
    [0xFF, 0x38, 0x81],
    [0xFF, 0x99, 0xAA],
    [0x6D, 0x48, 0x2F],
    [0x9C, 0x69, 0x26],
    [0xFF, 0xB4, 0x70],
    [0x00, 0x00, 0x00],
    [0x51, 0x52, 0x52],
    [0x89, 0x8D, 0x90],
    [0xD4, 0xD7, 0xD9],
    [0xFF, 0xFF, 0xFF],
];

/// Palette index of untouched pixels (white).
pub const BACKGROUND_COLOR: u8 = 31;

/// Look up the palette index of a `#RRGGBB` hex color (case-insensitive).
pub fn palette_index_of_hex(hex: &str) -> Option<u8> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 || !digits.is_ascii() {
        return None;
    }
    let mut rgb = [0u8; 3];
    for (i, slot) in rgb.iter_mut().enumerate() {
        *slot = u8::from_str_radix(&digits[i * 2..i * 2 + 2], 16).ok()?;
    }
    PALETTE
        .iter()
        .position(|c| *c == rgb)
        .map(|idx| idx as u8)
}
