// ============================================================
// Layer 4 — Text Preprocessor
// ============================================================
// Cleans one raw corpus line before word segmentation.
//
// News text scraped into the corpus often contains:
//   - Ideographic spaces (U+3000) from full-width layouts
//   - Non-breaking spaces (U+00A0)
//   - Zero-width spaces (U+200B) and byte order marks (U+FEFF)
//   - Stray tabs, carriage returns and other control characters
//   - Runs of spaces used for indentation
//
// Left alone, the segmenter turns each of these into its own
// "word", which then maps to [UNK] and wastes sequence length.
//
// Cleaning steps:
//   1. Map whitespace variants and control characters to ' '
//   2. Collapse runs of spaces into one
//   3. Trim both ends
//
// Reference: Rust Book §8 (Strings in Rust)

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean a raw text string for downstream segmentation.
    pub fn clean(&self, text: &str) -> String {
        let mut out        = String::with_capacity(text.len());
        let mut last_space = true;

        for c in text.chars() {
            let c = match c {
                '\t' | '\r' | '\n' => ' ',
                '\u{00A0}' | '\u{3000}' | '\u{200B}' | '\u{FEFF}' => ' ',
                c if c.is_control() => ' ',
                c => c,
            };

            if c == ' ' {
                // Leading spaces are dropped because last_space starts true
                if !last_space {
                    out.push(' ');
                }
                last_space = true;
            } else {
                out.push(c);
                last_space = false;
            }
        }

        // At most one trailing space can remain
        if out.ends_with(' ') {
            out.pop();
        }
        out
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapses_multiple_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("国足   备战\t\t世预赛"), "国足 备战 世预赛");
    }

    #[test]
    fn test_maps_full_width_and_invisible_spaces() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("\u{3000}\u{3000}新华社\u{00A0}北京\u{200B}电"), "新华社 北京 电");
    }

    #[test]
    fn test_removes_control_chars() {
        let p = Preprocessor::new();
        assert_eq!(p.clean("股市\x01上涨\r\n"), "股市 上涨");
    }

    #[test]
    fn test_empty_and_blank() {
        let p = Preprocessor::new();
        assert_eq!(p.clean(""), "");
        assert_eq!(p.clean(" \u{3000} "), "");
    }
}
