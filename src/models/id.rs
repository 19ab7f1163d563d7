// src/models/id.rs

use uuid::Uuid;

/// Длина идентификатора записи (base32 от 128 бит)
pub const ID_LENGTH: usize = 26;

const ENCODING: &[u8; 32] = b"ybndrfg8ejkmcpqxot1uwisza345h769";

/// Новый идентификатор: случайный UUID v4 в base32 без паддинга
pub fn new_id() -> String {
    encode(Uuid::new_v4().as_bytes())
}

/// Проверка формата: ровно 26 символов, только латиница и цифры
pub fn is_valid_id(value: &str) -> bool {
    value.len() == ID_LENGTH && value.chars().all(|c| c.is_ascii_alphanumeric())
}

fn encode(bytes: &[u8; 16]) -> String {
    let mut out = String::with_capacity(ID_LENGTH);
    let mut buffer: u32 = 0;
    let mut bits = 0u32;

    for &byte in bytes {
        buffer = (buffer << 8) | u32::from(byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(ENCODING[((buffer >> bits) & 0x1f) as usize] as char);
        }
        buffer &= (1 << bits) - 1;
    }

    if bits > 0 {
        out.push(ENCODING[((buffer << (5 - bits)) & 0x1f) as usize] as char);
    }

    out
}
