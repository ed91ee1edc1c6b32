//! Error-free positional string formatting
//!
//! Renders `{index[,align][:format]}` placeholders against a slice of
//! pre-rendered arguments. A bad format string must never take down the
//! application, so every malformed input degrades to literal text:
//!
//! - `{{` and `}}` are literal braces
//! - placeholders whose index is out of range are removed
//! - non-numeric `{...}` runs and stray braces are kept as-is
//! - the same index may be used any number of times, in any order

use regex::Regex;
use std::sync::OnceLock;

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\{(?P<index>\d+) *(?:, *(?P<align>-?\d+) *)?(?::(?P<format>[^{}]+))?\}")
            .expect("placeholder regex is valid")
    })
}

/// Substitute positional placeholders in `format` with `args`.
pub fn safe_format(format: &str, args: &[String]) -> String {
    let re = placeholder_regex();
    let mut out = String::with_capacity(format.len());
    let bytes = format.as_bytes();
    let mut i = 0;

    while i < format.len() {
        match bytes[i] {
            b'{' => {
                if bytes.get(i + 1) == Some(&b'{') {
                    out.push('{');
                    i += 2;
                    continue;
                }
                if let Some(caps) = re.captures(&format[i..]) {
                    let whole = caps.get(0).expect("regex matched");
                    let index: usize = caps["index"].parse().unwrap_or(usize::MAX);
                    if let Some(arg) = args.get(index) {
                        let align: i64 = caps
                            .name("align")
                            .and_then(|m| m.as_str().parse().ok())
                            .unwrap_or(0);
                        push_aligned(&mut out, arg, align);
                    }
                    // Out-of-range placeholders are dropped entirely.
                    i += whole.len();
                    continue;
                }
                // Not a placeholder: keep the brace literally.
                out.push('{');
                i += 1;
            }
            b'}' => {
                if bytes.get(i + 1) == Some(&b'}') {
                    out.push('}');
                    i += 2;
                } else {
                    out.push('}');
                    i += 1;
                }
            }
            _ => {
                let ch = format[i..].chars().next().expect("in-bounds char");
                out.push(ch);
                i += ch.len_utf8();
            }
        }
    }

    out
}

/// Pad `arg` to `align` columns; positive = right-align, negative = left.
fn push_aligned(out: &mut String, arg: &str, align: i64) {
    let width = align.unsigned_abs() as usize;
    let len = arg.chars().count();
    if width <= len {
        out.push_str(arg);
        return;
    }
    let pad = width - len;
    if align > 0 {
        out.extend(std::iter::repeat(' ').take(pad));
        out.push_str(arg);
    } else {
        out.push_str(arg);
        out.extend(std::iter::repeat(' ').take(pad));
    }
}
