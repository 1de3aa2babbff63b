//! One-shot terminal palette detection.
//!
//! Queries the hosting terminal for its 16-slot ANSI palette (OSC 4) and
//! default foreground/background (OSC 10 / OSC 11), with a hard timeout.
//! On success the process-wide palette is replaced atomically; on failure or
//! timeout the built-in fallback is retained silently — detection never
//! raises and never blocks theme accessors.
//!
//! I/O goes straight to `/dev/tty` so it cannot interfere with whatever
//! event reader the hosting UI runs on stdin. The blocking read happens on a
//! helper thread bounded by `mpsc::recv_timeout`; a result that arrives
//! after the timeout is discarded by the palette cell's first-commit guard.
//!
//! Query:    OSC 4 ; i ; ? ST  (per slot), OSC 10 ; ? ST, OSC 11 ; ? ST
//! Response: OSC 4 ; i ; rgb:RRRR/GGGG/BBBB ST  (and likewise for 10/11)

use std::sync::Once;
use std::time::Duration;

use thiserror::Error;

use crate::color::Rgb;
use crate::palette::{self, Palette};

#[derive(Debug, Error)]
pub(crate) enum DetectError {
    #[error("terminal did not respond within {0:?}")]
    Timeout(Duration),
    #[error("tty unavailable: {0}")]
    Tty(#[from] std::io::Error),
    #[error("no parseable color responses")]
    Malformed,
    #[error("palette queries unsupported on this platform")]
    Unsupported,
}

static DETECT_ONCE: Once = Once::new();

/// Runs palette detection exactly once, bounded by `timeout`.
///
/// Call at process startup. Subsequent calls are no-ops; there are no
/// retries. Whatever completes first — a successful round-trip or the
/// timeout — settles the process-wide palette for good.
pub fn detect_palette(timeout: Duration) {
    DETECT_ONCE.call_once(|| {
        let settled = match probe_terminal(timeout) {
            Ok(p) => p,
            Err(_) => Palette::fallback_for(palette::detect_color_mode()),
        };
        palette::commit(settled);
    });
}

/// Number of OSC queries issued: 16 palette slots + default fg + default bg.
const SLOT_COUNT: usize = 16;

#[cfg(unix)]
fn probe_terminal(timeout: Duration) -> Result<Palette, DetectError> {
    let mut query = Vec::with_capacity(SLOT_COUNT * 12 + 16);
    for i in 0..SLOT_COUNT {
        query.extend_from_slice(format!("\x1b]4;{};?\x1b\\", i).as_bytes());
    }
    query.extend_from_slice(b"\x1b]10;?\x1b\\");
    query.extend_from_slice(b"\x1b]11;?\x1b\\");

    let response = send_probe(&query, timeout)?;
    parse_palette_responses(&response)
}

#[cfg(not(unix))]
fn probe_terminal(_timeout: Duration) -> Result<Palette, DetectError> {
    Err(DetectError::Unsupported)
}

#[cfg(unix)]
fn send_probe(query: &[u8], timeout: Duration) -> Result<Vec<u8>, DetectError> {
    use std::io::Write;

    let mut tty_write = std::fs::OpenOptions::new().write(true).open("/dev/tty")?;
    tty_write.write_all(query)?;
    tty_write.flush()?;
    drop(tty_write);

    read_tty_responses(timeout)
}

/// Reads OSC responses from `/dev/tty` with a hard timeout.
///
/// A helper thread performs the blocking byte-by-byte read; the caller waits
/// at most `timeout` on the channel. The thread stops once the final query's
/// answer (OSC 11) is complete, so well-behaved terminals return early.
#[cfg(unix)]
fn read_tty_responses(timeout: Duration) -> Result<Vec<u8>, DetectError> {
    use std::io::Read;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Instant;

    const MAX_RESPONSE_LEN: usize = 4096;

    let tty = std::fs::File::open("/dev/tty")?;
    let (tx, rx) = mpsc::sync_channel::<Vec<u8>>(1);

    // The thread gets slightly longer than the caller so the channel, not
    // the internal guard, decides the common case.
    let thread_timeout = timeout + Duration::from_millis(200);

    thread::Builder::new()
        .name("cardtext-palette-probe".into())
        .spawn(move || {
            let mut reader = std::io::BufReader::new(tty);
            let mut response = Vec::with_capacity(512);
            let mut buf = [0u8; 1];
            let start = Instant::now();

            while response.len() < MAX_RESPONSE_LEN {
                match reader.read(&mut buf) {
                    Ok(1) => {
                        response.push(buf[0]);
                        if has_final_response(&response) {
                            break;
                        }
                    }
                    _ => break,
                }
                if start.elapsed() > thread_timeout {
                    break;
                }
            }

            let _ = tx.send(response);
        })?;

    match rx.recv_timeout(timeout) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        Ok(_) => Err(DetectError::Malformed),
        Err(_) => Err(DetectError::Timeout(timeout)),
    }
}

/// Whether the buffer contains a complete OSC 11 response (the last query).
fn has_final_response(buf: &[u8]) -> bool {
    split_osc_blocks(buf)
        .iter()
        .any(|block| block.starts_with(b"11;"))
}

/// Splits a raw byte stream into OSC payloads (the bytes between `ESC ]`
/// and the `BEL` / `ESC \` terminator). Incomplete trailing data is ignored.
fn split_osc_blocks(buf: &[u8]) -> Vec<&[u8]> {
    let mut blocks = Vec::new();
    let mut i = 0;
    while i + 1 < buf.len() {
        if buf[i] == 0x1b && buf[i + 1] == b']' {
            let payload_start = i + 2;
            let mut j = payload_start;
            let mut end = None;
            while j < buf.len() {
                if buf[j] == 0x07 {
                    end = Some((j, j + 1));
                    break;
                }
                if buf[j] == 0x1b && j + 1 < buf.len() && buf[j + 1] == b'\\' {
                    end = Some((j, j + 2));
                    break;
                }
                j += 1;
            }
            match end {
                Some((payload_end, next)) => {
                    blocks.push(&buf[payload_start..payload_end]);
                    i = next;
                }
                None => break,
            }
        } else {
            i += 1;
        }
    }
    blocks
}

/// Builds a palette from raw OSC response bytes.
///
/// Slots the terminal did not answer for keep their built-in fallback value.
/// At least one parseable response is required; otherwise the round-trip is
/// treated as a failure.
fn parse_palette_responses(bytes: &[u8]) -> Result<Palette, DetectError> {
    let mut result = Palette::fallback_for(palette::detect_color_mode());
    let mut parsed_any = false;

    for block in split_osc_blocks(bytes) {
        let Ok(s) = std::str::from_utf8(block) else {
            continue;
        };
        let mut parts = s.splitn(2, ';');
        let (Some(code), Some(rest)) = (parts.next(), parts.next()) else {
            continue;
        };
        match code {
            "4" => {
                let mut slot_parts = rest.splitn(2, ';');
                let (Some(idx), Some(spec)) = (slot_parts.next(), slot_parts.next()) else {
                    continue;
                };
                let Ok(idx) = idx.parse::<usize>() else {
                    continue;
                };
                if idx < SLOT_COUNT {
                    if let Some(rgb) = parse_color_spec(spec) {
                        result.colors[idx] = rgb;
                        parsed_any = true;
                    }
                }
            }
            "10" => {
                if let Some(rgb) = parse_color_spec(rest) {
                    result.foreground = rgb;
                    parsed_any = true;
                }
            }
            "11" => {
                if let Some(rgb) = parse_color_spec(rest) {
                    result.background = rgb;
                    parsed_any = true;
                }
            }
            _ => {}
        }
    }

    if parsed_any {
        Ok(result)
    } else {
        Err(DetectError::Malformed)
    }
}

/// Parses an X11 `rgb:RRRR/GGGG/BBBB` color spec (2- or 4-digit components).
fn parse_color_spec(spec: &str) -> Option<Rgb> {
    let rgb_start = spec.find("rgb:")?;
    let data = &spec[rgb_start + 4..];

    let parts: Vec<&str> = data
        .split('/')
        .map(|p| {
            let end = p.find(|c: char| !c.is_ascii_hexdigit()).unwrap_or(p.len());
            &p[..end]
        })
        .collect();
    if parts.len() < 3 {
        return None;
    }

    let channel = |s: &str| -> Option<u8> {
        if s.is_empty() {
            return None;
        }
        let v = u16::from_str_radix(s, 16).ok()?;
        let max: f64 = if s.len() > 2 { 65535.0 } else { 255.0 };
        Some((f64::from(v) / max * 255.0).round() as u8)
    };

    Some(Rgb::new(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn parse_color_spec_four_digit() {
        assert_eq!(
            parse_color_spec("rgb:ffff/0000/8080"),
            Some(Rgb::new(255, 0, 128))
        );
    }

    #[test]
    fn parse_color_spec_two_digit() {
        assert_eq!(parse_color_spec("rgb:1e/1e/2e"), Some(Rgb::new(30, 30, 46)));
    }

    #[test]
    fn parse_color_spec_rejects_garbage() {
        assert_eq!(parse_color_spec("rgb:zz/00/00"), None);
        assert_eq!(parse_color_spec("rgbish"), None);
        assert_eq!(parse_color_spec(""), None);
    }

    #[test]
    fn parse_color_spec_trims_terminator_tail() {
        // A BEL that survived into the payload must not break parsing.
        assert_eq!(
            parse_color_spec("rgb:ffff/ffff/ffff\u{7}"),
            Some(Rgb::new(255, 255, 255))
        );
    }

    #[test]
    fn split_blocks_both_terminators() {
        let buf = b"\x1b]4;0;rgb:00/00/00\x07\x1b]11;rgb:ff/ff/ff\x1b\\";
        let blocks = split_osc_blocks(buf);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0], b"4;0;rgb:00/00/00");
        assert_eq!(blocks[1], b"11;rgb:ff/ff/ff");
    }

    #[test]
    fn split_blocks_ignores_incomplete_tail() {
        let buf = b"\x1b]11;rgb:00/00/00\x07\x1b]4;1;rgb:aa";
        assert_eq!(split_osc_blocks(buf).len(), 1);
    }

    #[test]
    fn final_response_is_osc_11() {
        assert!(!has_final_response(b"\x1b]4;0;rgb:00/00/00\x07"));
        assert!(has_final_response(
            b"\x1b]4;0;rgb:00/00/00\x07\x1b]11;rgb:1e/1e/2e\x07"
        ));
    }

    #[test]
    #[serial]
    fn parse_responses_fills_slots_and_defaults() {
        let buf = b"\x1b]4;1;rgb:cc/24/1d\x07\x1b]10;rgb:cd/d6/f4\x07\x1b]11;rgb:1e/1e/2e\x07";
        let p = parse_palette_responses(buf).unwrap();
        assert_eq!(p.colors[1], Rgb::new(204, 36, 29));
        assert_eq!(p.foreground, Rgb::new(205, 214, 244));
        assert_eq!(p.background, Rgb::new(30, 30, 46));
        // Unanswered slot keeps its fallback value.
        assert_eq!(p.colors[2], Palette::fallback_for(palette::detect_color_mode()).colors[2]);
    }

    #[test]
    #[serial]
    fn parse_responses_rejects_empty() {
        assert!(parse_palette_responses(b"").is_err());
        assert!(parse_palette_responses(b"\x1b]99;nonsense\x07").is_err());
    }

    #[test]
    #[serial]
    fn parse_responses_ignores_out_of_range_slot() {
        let buf = b"\x1b]4;99;rgb:cc/24/1d\x07\x1b]11;rgb:1e/1e/2e\x07";
        let p = parse_palette_responses(buf).unwrap();
        assert_eq!(p.background, Rgb::new(30, 30, 46));
    }
}
