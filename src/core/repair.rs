//! Text repair: undo double-encoded UTF-8 (mojibake)
//!
//! Exports often store UTF-8 bytes that were decoded as Latin-1 somewhere
//! upstream, e.g. `’` arrives as `â\u{80}\u{99}`. The targeted loop undoes
//! that with a Latin-1 round-trip; the general pass then handles sequences
//! Latin-1 cannot re-encode (Windows-1252 punctuation, garbled emoji like
//! `ðŸ˜‚`) and strips stray control characters.
//!
//! Both round trips work run by run and only decode byte sequences that are
//! valid UTF-8, so correctly encoded text mixed into a message is left as is.

use crate::{CORRUPTION_MARKERS, MAX_REPAIR_PASSES, MOJIBAKE_MARKERS};

/// Extra marker for the general pass: `Â` prefixes re-encoded U+0080..U+00BF
const GENERAL_MARKERS: &[char] = &['â', 'Ã', 'ð', 'Â'];

/// Code points Windows-1252 assigns to bytes 0x80..=0x9F.
/// `None` slots are undefined in 1252 and pass through as the raw byte.
const CP1252_HIGH: [Option<char>; 32] = [
    Some('€'), None, Some('‚'), Some('ƒ'), Some('„'), Some('…'), Some('†'), Some('‡'),
    Some('ˆ'), Some('‰'), Some('Š'), Some('‹'), Some('Œ'), None, Some('Ž'), None,
    None, Some('‘'), Some('’'), Some('“'), Some('”'), Some('•'), Some('–'), Some('—'),
    Some('˜'), Some('™'), Some('š'), Some('›'), Some('œ'), None, Some('ž'), Some('Ÿ'),
];

/// Mojibake repairer
#[derive(Debug, Default, Clone, Copy)]
pub struct TextRepairer;

impl TextRepairer {
    /// Create new repairer
    pub fn new() -> Self {
        Self
    }

    /// Repair `raw`. Never fails: any round-trip that cannot complete keeps
    /// the last good value.
    pub fn repair(&self, raw: &str) -> String {
        let mut current = raw.to_string();

        for _ in 0..MAX_REPAIR_PASSES {
            if !current.contains(MOJIBAKE_MARKERS) {
                break;
            }
            match latin1_round_trip(&current) {
                Some(candidate) => current = candidate,
                None => break,
            }
        }

        general_repair(current)
    }

    /// Does `text` still carry corruption markers or raw C1 bytes?
    pub fn looks_corrupt(&self, text: &str) -> bool {
        CORRUPTION_MARKERS.iter().any(|m| text.contains(m)) || text.chars().any(is_c1_control)
    }
}

/// Best-effort pass for what the strict loop leaves behind
fn general_repair(mut text: String) -> String {
    for _ in 0..MAX_REPAIR_PASSES {
        if !text.contains(GENERAL_MARKERS) {
            break;
        }
        match cp1252_round_trip(&text) {
            Some(candidate) => text = candidate,
            None => break,
        }
    }

    if text.contains('\r') {
        text = text.replace("\r\n", "\n").replace('\r', "\n");
    }
    if text.chars().any(is_stray_control) {
        text.retain(|c| !is_stray_control(c));
    }
    text
}

/// C0 controls and DEL, minus newline and tab. C1 controls are kept:
/// they are leftovers of a failed round trip and must stay visible.
fn is_stray_control(c: char) -> bool {
    c.is_control() && c != '\n' && c != '\t' && !is_c1_control(c)
}

fn is_c1_control(c: char) -> bool {
    ('\u{80}'..='\u{9F}').contains(&c)
}

/// Encode as Latin-1, decode as UTF-8
fn latin1_round_trip(text: &str) -> Option<String> {
    round_trip_runs(text, |c| u8::try_from(u32::from(c)).ok())
}

/// Encode as (sloppy) Windows-1252, decode as UTF-8
fn cp1252_round_trip(text: &str) -> Option<String> {
    round_trip_runs(text, cp1252_byte)
}

/// Round-trip every maximal run of single-byte-encodable characters on its
/// own. Within a run, only byte sequences that form valid UTF-8 are decoded;
/// anything else keeps its original characters. `None` when nothing changed.
fn round_trip_runs(text: &str, encode: impl Fn(char) -> Option<u8>) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut run: Vec<(char, u8)> = Vec::new();

    for c in text.chars() {
        match encode(c) {
            Some(byte) => run.push((c, byte)),
            None => {
                decode_run(&run, &mut out);
                run.clear();
                out.push(c);
            }
        }
    }
    decode_run(&run, &mut out);

    (out != text).then_some(out)
}

fn decode_run(run: &[(char, u8)], out: &mut String) {
    let bytes: Vec<u8> = run.iter().map(|(_, b)| *b).collect();
    let mut pos = 0;

    while pos < bytes.len() {
        match std::str::from_utf8(&bytes[pos..]) {
            Ok(valid) => {
                out.push_str(valid);
                return;
            }
            Err(e) => {
                let good = e.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&bytes[pos..pos + good]));
                let bad = e.error_len().unwrap_or(bytes.len() - pos - good);
                out.extend(run[pos + good..pos + good + bad].iter().map(|(c, _)| *c));
                pos += good + bad;
            }
        }
    }
}

fn cp1252_byte(c: char) -> Option<u8> {
    let cp = u32::from(c);
    if cp <= 0xFF {
        return Some(cp as u8);
    }
    CP1252_HIGH
        .iter()
        .position(|slot| *slot == Some(c))
        .map(|i| 0x80 + i as u8)
}

// =============================================================================
// TESTS
// =============================================================================
