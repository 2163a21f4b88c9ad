//! Byte-level line terminator conversion and the binary heuristic.
//!
//! Conversion is defined in two logical steps:
//! - Canonicalize: every `CR LF` becomes `LF`, then every remaining lone
//!   `CR` becomes `LF`.
//! - Expand: for `Crlf`, every `LF` becomes `CR LF`.
//!
//! Both steps are fused into one pass over the input. A terminator is only
//! ever emitted where the input already had one, so nothing is appended at
//! end of buffer.

use crate::models::TargetMode;

const CR: u8 = b'\r';
const LF: u8 = b'\n';

/// True when the buffer contains a NUL byte.
///
/// Non-ASCII text without NUL bytes is still treated as text.
pub fn is_binary(bytes: &[u8]) -> bool {
    bytes.contains(&0)
}

/// Rewrite every line terminator in `bytes` to `mode`.
pub fn convert(bytes: &[u8], mode: TargetMode) -> Vec<u8> {
    let eol: &[u8] = match mode {
        TargetMode::Lf => b"\n",
        TargetMode::Crlf => b"\r\n",
    };
    // Headroom for CRLF expansion; Vec grows if a file is terminator-heavy
    let mut out = Vec::with_capacity(match mode {
        TargetMode::Lf => bytes.len(),
        TargetMode::Crlf => bytes.len() + bytes.len() / 8,
    });
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            CR => {
                out.extend_from_slice(eol);
                if bytes.get(i + 1) == Some(&LF) {
                    i += 1;
                }
            }
            LF => out.extend_from_slice(eol),
            b => out.push(b),
        }
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [TargetMode; 2] = [TargetMode::Lf, TargetMode::Crlf];

    fn samples() -> Vec<&'static [u8]> {
        vec![
            &b""[..],
            &b"\r"[..],
            &b"\n"[..],
            &b"\r\n"[..],
            &b"\n\r"[..],
            &b"\r\r\n\n"[..],
            &b"a\r\nb\nc\r"[..],
            &b"plain text without terminator"[..],
            &b"mixed\r\n\r\rline\n\r\nend"[..],
            &b"\r\n\r\n\r\n"[..],
            "caf\u{e9}\r\n\u{2603}\r".as_bytes(),
        ]
    }

    fn has_lone_cr(b: &[u8]) -> bool {
        b.iter()
            .enumerate()
            .any(|(i, &c)| c == CR && b.get(i + 1) != Some(&LF))
    }

    #[test]
    fn test_is_binary_detects_nul_anywhere() {
        assert!(is_binary(b"\0"));
        assert!(is_binary(b"x\x00y\r\n"));
        assert!(is_binary(b"trailing\0"));
        assert!(!is_binary(b""));
        assert!(!is_binary("non-ascii \u{e9}\u{ff}".as_bytes()));
        assert!(!is_binary(&[0xff, 0xfe, 0x41]));
    }

    #[test]
    fn test_convert_mixed_to_lf() {
        assert_eq!(convert(b"a\r\nb\nc\r", TargetMode::Lf), b"a\nb\nc\n");
    }

    #[test]
    fn test_convert_does_not_fabricate_trailing_terminator() {
        assert_eq!(convert(b"a\nb", TargetMode::Crlf), b"a\r\nb");
        assert_eq!(convert(b"a\r\nb", TargetMode::Lf), b"a\nb");
        assert_eq!(convert(b"", TargetMode::Crlf), b"");
    }

    #[test]
    fn test_convert_lone_cr_and_lf_cr_sequences() {
        // LF followed by CR is two terminators, not one
        assert_eq!(convert(b"a\n\rb", TargetMode::Lf), b"a\n\nb");
        assert_eq!(convert(b"a\r\rb", TargetMode::Crlf), b"a\r\n\r\nb");
        assert_eq!(convert(b"\r\r\n\n", TargetMode::Lf), b"\n\n\n");
    }

    #[test]
    fn test_convert_output_has_no_stray_cr() {
        for b in samples() {
            let lf = convert(b, TargetMode::Lf);
            assert!(!lf.contains(&CR), "lf output kept a CR for {:?}", b);
            let crlf = convert(b, TargetMode::Crlf);
            assert!(!has_lone_cr(&crlf), "lone CR in crlf output for {:?}", b);
        }
    }

    #[test]
    fn test_convert_is_idempotent() {
        for b in samples() {
            for m in MODES {
                let once = convert(b, m);
                assert_eq!(convert(&once, m), once, "mode {} input {:?}", m, b);
            }
        }
    }

    #[test]
    fn test_convert_cross_mode_consistency() {
        for b in samples() {
            assert_eq!(
                convert(&convert(b, TargetMode::Crlf), TargetMode::Lf),
                convert(b, TargetMode::Lf)
            );
        }
    }

    #[test]
    fn test_convert_matches_two_step_definition() {
        fn reference(b: &[u8], mode: TargetMode) -> Vec<u8> {
            let s: Vec<u8> = b.to_vec();
            let mut canon = Vec::new();
            let mut i = 0;
            while i < s.len() {
                if s[i] == CR && s.get(i + 1) == Some(&LF) {
                    canon.push(LF);
                    i += 2;
                    continue;
                }
                canon.push(if s[i] == CR { LF } else { s[i] });
                i += 1;
            }
            match mode {
                TargetMode::Lf => canon,
                TargetMode::Crlf => canon
                    .into_iter()
                    .flat_map(|c| if c == LF { vec![CR, LF] } else { vec![c] })
                    .collect(),
            }
        }
        for b in samples() {
            for m in MODES {
                assert_eq!(convert(b, m), reference(b, m));
            }
        }
    }
}
