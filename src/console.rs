//! Styled output and token-based input over any reader/writer pair.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::ansi::{self, Color, Style};

/// Display switches shared by every component that draws to the terminal.
#[derive(Clone, Copy, Debug)]
pub struct ConsoleOptions {
    pub color: bool,
    pub clear_screen: bool,
}

impl Default for ConsoleOptions {
    fn default() -> Self {
        Self {
            color: true,
            clear_screen: true,
        }
    }
}

/// Terminal front end: writes styled text and reads whitespace-delimited tokens.
pub struct Console<R, W> {
    input: R,
    output: W,
    pending: VecDeque<String>,
    options: ConsoleOptions,
}

impl Console<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio(options: ConsoleOptions) -> Self {
        Console::new(io::stdin().lock(), io::stdout(), options)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, options: ConsoleOptions) -> Self {
        Self {
            input,
            output,
            pending: VecDeque::new(),
            options,
        }
    }

    /// Write `text` followed by `sep`, wrapped in `style` and a reset.
    /// Plain text is written bare.
    pub fn print_text(&mut self, text: &str, style: Style, sep: &str) -> Result<()> {
        let written = if self.options.color && style != Style::PLAIN {
            write!(self.output, "{}{}{}{}", style.prefix(), text, sep, ansi::RESET)
        } else {
            write!(self.output, "{}{}", text, sep)
        };
        written.context("writing to terminal")
    }

    pub fn println(&mut self, text: &str, style: Style) -> Result<()> {
        self.print_text(text, style, "\n")
    }

    /// Print a label that expects input on the same line and flush it.
    pub fn prompt(&mut self, label: &str, style: Style) -> Result<()> {
        self.print_text(label, style, " ")?;
        self.flush()
    }

    pub fn clear(&mut self) -> Result<()> {
        if self.options.clear_screen {
            self.output
                .write_all(ansi::CLEAR_SCREEN.as_bytes())
                .context("clearing terminal")?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush().context("flushing terminal")
    }

    /// Next whitespace-delimited token, or `None` once input is exhausted.
    pub fn read_token(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Ok(Some(token));
            }

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("reading from terminal")?;
            if read == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
    }

    /// Drop whatever is left of the current input line.
    pub fn discard_line(&mut self) {
        self.pending.clear();
    }

    /// Keep reading until a token parses as an `i32`.
    pub fn read_int(&mut self) -> Result<i32> {
        loop {
            let Some(token) = self.read_token()? else {
                bail!("input ended before an integer was entered");
            };

            match token.parse::<i32>() {
                Ok(value) => return Ok(value),
                Err(err) => {
                    tracing::debug!(%token, %err, "rejected integer input");
                    self.println("\nERROR: Invalid input!\n", Style::bold(Color::Red))?;
                    self.prompt("Try again:", Style::color(Color::Green))?;
                    self.discard_line();
                }
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;

    pub(crate) fn scripted(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
        Console::new(
            Cursor::new(input.as_bytes().to_vec()),
            Vec::new(),
            ConsoleOptions {
                color: false,
                clear_screen: false,
            },
        )
    }

    fn output_of(console: Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(console.into_output()).unwrap()
    }

    #[test]
    fn tokens_span_lines_and_whitespace() {
        let mut console = scripted("  a b\n\n c\t d \n");
        let mut tokens = Vec::new();
        while let Some(token) = console.read_token().unwrap() {
            tokens.push(token);
        }
        assert_eq!(tokens, ["a", "b", "c", "d"]);
    }

    #[test]
    fn read_token_reports_end_of_input() {
        let mut console = scripted("");
        assert!(console.read_token().unwrap().is_none());
    }

    #[test]
    fn read_int_retries_and_discards_rest_of_line() {
        let mut console = scripted("abc 99\n12x\n-42\n");
        assert_eq!(console.read_int().unwrap(), -42);
        let out = output_of(console);
        assert_eq!(out.matches("ERROR: Invalid input!").count(), 2);
        assert_eq!(out.matches("Try again:").count(), 2);
    }

    #[test]
    fn read_int_fails_when_input_runs_out() {
        let mut console = scripted("nope\n");
        let err = console.read_int().unwrap_err();
        assert!(err.to_string().contains("input ended"));
    }

    #[test]
    fn styled_output_wraps_text_in_codes() {
        let mut console = Console::new(
            Cursor::new(Vec::new()),
            Vec::new(),
            ConsoleOptions::default(),
        );
        console
            .print_text("hi", Style::bold(Color::Blue), "\t")
            .unwrap();
        console.clear().unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "\x1b[1m\x1b[34mhi\t\x1b[0m\x1b[2J\x1b[H");
    }

    #[test]
    fn plain_style_writes_no_codes_even_with_color_on() {
        let mut console = Console::new(
            Cursor::new(Vec::new()),
            Vec::new(),
            ConsoleOptions::default(),
        );
        console.println("/tmp/x", Style::PLAIN).unwrap();
        let out = String::from_utf8(console.into_output()).unwrap();
        assert_eq!(out, "/tmp/x\n");
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut console = scripted("");
        console.println("hello", Style::bold(Color::Red)).unwrap();
        console.clear().unwrap();
        assert_eq!(output_of(console), "hello\n");
    }
}
