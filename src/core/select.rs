//! Select module - Numbered menus read from standard input
//!
//! Input is a single line of whitespace-separated 1-based indices. Tokens
//! that are not numbers or fall outside the menu are ignored, so an empty
//! or entirely invalid line selects nothing.

use colored::*;
use std::fmt::Display;
use std::io::{self, BufRead, Stdout, StdinLock, Write};

/// 0-based indices chosen by `input`, ascending and without repeats
pub fn parse_indices(input: &str, len: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = input
        .split_whitespace()
        .filter_map(|token| to_index(token, len))
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

/// First valid index of `input`, in the order typed
pub fn parse_first(input: &str, len: usize) -> Option<usize> {
    input
        .split_whitespace()
        .find_map(|token| to_index(token, len))
}

fn to_index(token: &str, len: usize) -> Option<usize> {
    match token.parse::<usize>() {
        Ok(number) if (1..=len).contains(&number) => Some(number - 1),
        _ => None,
    }
}

/// Menu prompts over any line reader and writer
pub struct Prompt<R, W> {
    reader: R,
    writer: W,
}

impl Prompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Show `prompt` and read one trimmed line; end of input reads as empty
    pub fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.writer, "{prompt}")?;
        self.writer.flush()?;
        let mut line = String::new();
        self.reader.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Let the user pick any number of `items`; returned in menu order
    pub fn select_many<'a, T: Display>(&mut self, title: &str, items: &'a [T]) -> io::Result<Vec<&'a T>> {
        let line = self.menu(title, items, "Enter the numbers separated by spaces (e.g. 1 3): ")?;
        Ok(parse_indices(&line, items.len())
            .into_iter()
            .map(|index| &items[index])
            .collect())
    }

    /// Let the user pick one of `items`; the first valid number wins
    pub fn select_one<'a, T: Display>(&mut self, title: &str, items: &'a [T]) -> io::Result<Option<&'a T>> {
        let line = self.menu(title, items, "Enter a number: ")?;
        Ok(parse_first(&line, items.len()).map(|index| &items[index]))
    }

    fn menu<T: Display>(&mut self, title: &str, items: &[T], hint: &str) -> io::Result<String> {
        writeln!(self.writer, "{}", format!("📋 {title}").bright_cyan())?;
        for (i, item) in items.iter().enumerate() {
            writeln!(self.writer, "{}. {item}", i + 1)?;
        }
        writeln!(self.writer)?;
        self.read_line(&format!("   {} {hint}", "ℹ".bright_cyan()))
    }

    #[cfg(test)]
    fn into_writer(self) -> W {
        self.writer
    }
}
