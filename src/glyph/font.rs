// font.rs - Baked 5x7 bitmap font
//
// Each glyph is 7 rows; the low 5 bits of a row are its pixels, bit 4 is the
// leftmost column. Lowercase folds to uppercase, anything unknown renders as '?'.

pub const GLYPH_COLS: usize = 5;
pub const GLYPH_ROWS: usize = 7;

/// Horizontal advance in cells (glyph + one blank column)
pub const ADVANCE: usize = GLYPH_COLS + 1;

pub type Glyph = [u8; GLYPH_ROWS];

const LETTERS: [Glyph; 26] = [
    [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // A
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110], // B
    [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110], // C
    [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100], // D
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111], // E
    [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000], // F
    [0b01110, 0b10001, 0b10000, 0b10111, 0b10001, 0b10001, 0b01111], // G
    [0b10001, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001], // H
    [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // I
    [0b00111, 0b00010, 0b00010, 0b00010, 0b00010, 0b10010, 0b01100], // J
    [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001], // K
    [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111], // L
    [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001], // M
    [0b10001, 0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001], // N
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // O
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10000, 0b10000, 0b10000], // P
    [0b01110, 0b10001, 0b10001, 0b10001, 0b10101, 0b10010, 0b01101], // Q
    [0b11110, 0b10001, 0b10001, 0b11110, 0b10100, 0b10010, 0b10001], // R
    [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110], // S
    [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100], // T
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110], // U
    [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01010, 0b00100], // V
    [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010], // W
    [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001], // X
    [0b10001, 0b10001, 0b10001, 0b01010, 0b00100, 0b00100, 0b00100], // Y
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b11111], // Z
];

const DIGITS: [Glyph; 10] = [
    [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110], // 0
    [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110], // 1
    [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111], // 2
    [0b11111, 0b00010, 0b00100, 0b00010, 0b00001, 0b10001, 0b01110], // 3
    [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010], // 4
    [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110], // 5
    [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110], // 6
    [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000], // 7
    [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110], // 8
    [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100], // 9
];

const SPACE: Glyph = [0; GLYPH_ROWS];
const DASH: Glyph = [0, 0, 0, 0b11111, 0, 0, 0];
const DOT: Glyph = [0, 0, 0, 0, 0, 0b01100, 0b01100];
const PLUS: Glyph = [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0];
const HASH: Glyph = [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010];
const SLASH: Glyph = [0b00001, 0b00001, 0b00010, 0b00100, 0b01000, 0b10000, 0b10000];
const AMP: Glyph = [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101];
const BANG: Glyph = [0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0, 0b00100];
const QUESTION: Glyph = [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0, 0b00100];

/// Bitmap for a character
pub fn glyph(c: char) -> Glyph {
    match c.to_ascii_uppercase() {
        c @ 'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
        c @ '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        ' ' => SPACE,
        '-' => DASH,
        '.' => DOT,
        '+' => PLUS,
        '#' => HASH,
        '/' => SLASH,
        '&' => AMP,
        '!' => BANG,
        _ => QUESTION,
    }
}

/// Whether the cell at (col, row) is lit
#[inline]
pub fn lit(g: &Glyph, col: usize, row: usize) -> bool {
    col < GLYPH_COLS && row < GLYPH_ROWS && (g[row] >> (GLYPH_COLS - 1 - col)) & 1 == 1
}
