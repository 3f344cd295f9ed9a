//! Markdown output for the terminal.
//!
//! Rich mode styles markdown with termimad; plain mode (`--no-color`) prints
//! the markdown unchanged so it stays greppable in scripts and tests.

use std::io::{self, Write};

use anyhow::Result;
use termimad::{crossterm::style::Color, MadSkin};

/// Renders markdown either styled or as plain text.
pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::Cyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.code_block.set_bg(Color::AnsiValue(236));
        skin.inline_code.set_bg(Color::AnsiValue(236));

        Self { rich_enabled, skin }
    }

    /// Writes markdown to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if !self.rich_enabled {
            write!(stdout, "{markdown}")?;
            return Ok(());
        }

        // Fenced code is printed verbatim; generated specs read better
        // without inline styling applied to their punctuation.
        let mut in_fence = false;
        for line in markdown.lines() {
            if line.starts_with("```") {
                in_fence = !in_fence;
                writeln!(stdout, "\x1b[2m{line}\x1b[0m")?;
            } else if in_fence {
                writeln!(stdout, "{line}")?;
            } else if line.starts_with('#') {
                writeln!(stdout, "\x1b[36m{line}\x1b[0m")?;
            } else {
                writeln!(stdout, "{}", self.skin.inline(line))?;
            }
        }
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_renderer() {
        let renderer = TerminalRenderer::new(false);
        assert!(!renderer.rich_enabled);
        assert!(renderer.render("# Title\n").is_ok());
    }

    #[test]
    fn test_default_is_rich() {
        assert!(TerminalRenderer::default().rich_enabled);
    }
}
