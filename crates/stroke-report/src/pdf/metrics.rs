//! Helvetica advance widths (1/1000 em) for WinAnsi-encoded bytes.

pub fn helvetica_width(byte: u8) -> u16 {
    match byte {
        b' ' | b'!' | b',' | b'.' | b'/' | b':' | b';' | b'[' | b'\\' | b']' | b'f' | b't' => 278,
        b'"' => 355,
        b'#' | b'$' | b'0'..=b'9' | b'?' | b'_' => 556,
        b'%' => 889,
        b'&' => 667,
        b'\'' => 191,
        b'(' | b')' | b'-' | b'`' | b'r' => 333,
        b'*' => 389,
        b'+' | b'<' | b'=' | b'>' | b'~' => 584,
        b'@' => 1015,
        b'A' | b'B' | b'E' | b'K' | b'P' | b'S' | b'V' | b'X' | b'Y' => 667,
        b'C' | b'D' | b'H' | b'N' | b'R' | b'U' => 722,
        b'F' | b'T' | b'Z' => 611,
        b'G' | b'O' | b'Q' => 778,
        b'I' => 278,
        b'J' => 500,
        b'L' => 556,
        b'M' => 833,
        b'W' => 944,
        b'^' => 469,
        b'a' | b'b' | b'd' | b'e' | b'g' | b'h' | b'n' | b'o' | b'p' | b'q' | b'u' => 556,
        b'c' | b'k' | b's' | b'v' | b'x' | b'y' | b'z' => 500,
        b'i' | b'j' | b'l' => 222,
        b'm' => 833,
        b'w' => 722,
        b'{' | b'}' => 334,
        b'|' => 260,
        // WinAnsi 0x80-0x9F
        0x80 | 0x83 | 0x86 | 0x87 | 0x96 => 556,
        0x82 | 0x91 | 0x92 => 222,
        0x84 | 0x88 | 0x8B | 0x93 | 0x94 | 0x98 | 0x9B => 333,
        0x85 | 0x89 | 0x8C | 0x97 | 0x99 => 1000,
        0x8A | 0x9F => 667,
        0x8E => 611,
        0x95 => 350,
        0x9A | 0x9E => 500,
        0x9C => 944,
        // Latin-1 supplement
        0xA0 | 0xB7 => 278,
        0xA1 | 0xA8 | 0xAD | 0xAF | 0xB2 | 0xB3 | 0xB4 | 0xB8 | 0xB9 => 333,
        0xA2..=0xA5 | 0xA7 | 0xAB | 0xB5 | 0xBB => 556,
        0xA6 => 260,
        0xA9 | 0xAE => 737,
        0xAA => 370,
        0xAC | 0xB1 | 0xD7 | 0xF7 => 584,
        0xB0 => 400,
        0xB6 => 537,
        0xBA => 365,
        0xBC..=0xBE => 834,
        0xBF | 0xDF => 611,
        0xC0..=0xC5 | 0xC8..=0xCB | 0xDD | 0xDE => 667,
        0xC6 => 1000,
        0xC7 | 0xD0 | 0xD1 | 0xD9..=0xDC => 722,
        0xCC..=0xCF | 0xEC..=0xEF => 278,
        0xD2..=0xD6 | 0xD8 => 778,
        0xE0..=0xE5 | 0xE8..=0xEB | 0xF0..=0xF6 | 0xF9..=0xFC | 0xFE => 556,
        0xE6 => 889,
        0xE7 | 0xFD | 0xFF => 500,
        0xF8 => 611,
        // Control characters and unassigned WinAnsi slots
        _ => 278,
    }
}

/// Width of `text` in 1/1000 em units.
pub fn string_width(text: &[u8]) -> u32 { text.iter().map(|b| u32::from(helvetica_width(*b))).sum() }
