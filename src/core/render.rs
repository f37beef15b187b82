/// Marker substituted for a raw carriage return
pub const CR_MARKER: &str = "[0x0D]";

/// Marker substituted for a raw line feed
pub const LF_MARKER: &str = "[0x0A]";

/// Rewrite control characters so a log line stays single-line
///
/// Every `\r` becomes `[0x0D]` and every `\n` becomes `[0x0A]`; all other
/// input passes through unchanged. Pure and total; idempotent on text that
/// already contains no raw `\r`/`\n`.
pub fn render_visible(text: &str) -> String {
    text.replace('\r', CR_MARKER).replace('\n', LF_MARKER)
}

/// Render a raw byte payload for display
///
/// Non-UTF-8 bytes are replaced lossily before control characters are
/// rewritten; byte counts are always taken from the raw payload, never
/// from this rendering.
pub fn render_bytes(raw: &[u8]) -> String {
    render_visible(&String::from_utf8_lossy(raw))
}
