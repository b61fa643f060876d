//! Reversible round codes for replaying a ladder.
//! Code format: `LD-<WORD><NN>`, e.g. `LD-RUNG42`, `LD-MAPLE07`.
//!
//! A code names a seed; the same code, roster size and layout config always
//! produce the same rung set.

const PREFIX: &str = "LD";

fn fnv1a64(bytes: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0100_0000_01b3;
    bytes.iter().fold(FNV_OFFSET, |hash, b| {
        (hash ^ u64::from(*b)).wrapping_mul(FNV_PRIME)
    })
}

fn sanitize_word(word: &str) -> String {
    word.chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub const WORD_LIST: [&str; 64] = [
    "RUNG", "RAIL", "STEP", "CLIMB", "ROPE", "MAPLE", "CEDAR", "BIRCH", "ACORN", "PEBBLE",
    "BUNNY", "KITTY", "PUPPY", "HAMSTER", "FOX", "BEAR", "PANDA", "KOALA", "LION", "TIGER",
    "CANDY", "COOKIE", "WAFFLE", "MUFFIN", "PUDDING", "JELLY", "TOFFEE", "SPRINKL", "COCOA",
    "MANGO", "PEACH", "LEMON", "CHERRY", "MELON", "GRAPE", "KIWI", "CLOUD", "RAINBOW", "STAR",
    "COMET", "MOON", "SUNNY", "BREEZE", "PUDDLE", "MEADOW", "RIVER", "HARBOR", "ISLAND",
    "BALLOON", "KITE", "CONFETI", "PARADE", "BANNER", "TROPHY", "RIBBON", "MEDAL", "WHISTLE",
    "GIGGLE", "HOPSCOT", "MARBLE", "PUZZLE", "DOMINO", "LUCKY", "ZIGZAG",
];

const NUMBERS_PER_WORD: u16 = 100;

/// Number of distinct round codes.
pub const CODE_COUNT: usize = WORD_LIST.len() * NUMBERS_PER_WORD as usize;

#[inline]
fn pack(word_index: u16, nn: u8) -> u16 {
    word_index * NUMBERS_PER_WORD + u16::from(nn)
}

#[inline]
fn unpack(packed: u16) -> Option<(u16, u8)> {
    let word_index = packed / NUMBERS_PER_WORD;
    if usize::from(word_index) >= WORD_LIST.len() {
        return None;
    }
    let nn = u8::try_from(packed % NUMBERS_PER_WORD).ok()?;
    Some((word_index, nn))
}

fn compose_seed(word_index: u16, nn: u8) -> u64 {
    let packed = pack(word_index, nn);
    let [lo, hi] = packed.to_le_bytes();
    // Domain-separated FNV input
    let buf = [b'L', b'A', b'D', b'D', b'E', b'R', b'-', lo, hi, 0x5A];
    let h = fnv1a64(&buf);
    (h & 0xFFFF_FFFF_FFFF_0000) | u64::from(packed)
}

fn format_code(word: &str, nn: u8) -> String {
    format!("{PREFIX}-{word}{nn:02}")
}

/// Render the code naming `seed`.
///
/// Only seeds that came out of [`decode_code`] or [`code_from_entropy`] have a
/// code; any other seed returns `None` rather than a code for some other
/// ladder.
#[must_use]
pub fn encode_code(seed: u64) -> Option<String> {
    let packed = u16::try_from(seed & 0xFFFF).ok()?;
    let (wi, nn) = unpack(packed)?;
    if compose_seed(wi, nn) != seed {
        return None;
    }
    let word = WORD_LIST.get(usize::from(wi))?;
    Some(format_code(word, nn))
}

/// Parse a code back into its seed. Case and stray punctuation in the word
/// are ignored.
#[must_use]
pub fn decode_code(code: &str) -> Option<u64> {
    let (prefix, rest) = code.trim().split_once('-')?;
    if !prefix.eq_ignore_ascii_case(PREFIX) || rest.len() < 3 || !rest.is_char_boundary(rest.len() - 2) {
        return None;
    }
    let (word_part, nn_part) = rest.split_at(rest.len() - 2);
    let nn: u8 = nn_part.parse().ok()?;
    let word = sanitize_word(word_part);
    let idx = WORD_LIST.iter().position(|w| sanitize_word(w) == word)?;
    let wi = u16::try_from(idx).ok()?;
    Some(compose_seed(wi, nn))
}

/// Pick a fresh code from ambient entropy.
#[must_use]
pub fn code_from_entropy(entropy: u64) -> String {
    let words = WORD_LIST.len() as u64;
    let wi = usize::try_from(entropy % words).unwrap_or(0);
    let nn = u8::try_from((entropy >> 17) % u64::from(NUMBERS_PER_WORD)).unwrap_or(0);
    format_code(WORD_LIST[wi], nn)
}

/// Accept either a round code or a plain decimal seed.
#[must_use]
pub fn parse_seed(input: &str) -> Option<u64> {
    let trimmed = input.trim();
    trimmed.parse::<u64>().ok().or_else(|| decode_code(trimmed))
}
