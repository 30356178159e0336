// © 2021, ETH Zurich
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use fir::SortDecl;
use std::io::{self, Write};

/// The prover-facing output capability. Callers must respect the
/// dependency order: sorts before symbols before axioms, because symbol
/// signatures reference sorts and axioms reference symbols.
pub trait PreambleSink {
    fn comment(&mut self, text: &str);
    fn declare(&mut self, decl: &SortDecl);
    fn emit(&mut self, lines: &[String]);
}

/// A sink that renders the preamble as text. Write failures are sticky:
/// the first one is kept and returned by [`TextSink::finish`].
pub struct TextSink<W: Write> {
    out: W,
    error: Option<io::Error>,
}

impl<W: Write> TextSink<W> {
    pub fn new(out: W) -> Self {
        TextSink { out, error: None }
    }

    pub fn finish(self) -> io::Result<W> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.out),
        }
    }

    fn write_line(&mut self, line: &str) {
        if self.error.is_some() {
            return;
        }
        if let Err(error) = writeln!(self.out, "{line}") {
            self.error = Some(error);
        }
    }
}

impl<W: Write> PreambleSink for TextSink<W> {
    fn comment(&mut self, text: &str) {
        self.write_line(&format!("// {text}"));
    }

    fn declare(&mut self, decl: &SortDecl) {
        self.write_line(&decl.to_string());
    }

    fn emit(&mut self, lines: &[String]) {
        for line in lines {
            self.write_line(line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fir::Sort;

    #[test]
    fn text_sink_writes_in_call_order() {
        let mut sink = TextSink::new(Vec::new());
        sink.comment("sequence theory");
        sink.declare(&SortDecl::new(Sort::seq(Sort::Int)));
        sink.emit(&["function Seq_length(s: Seq[Int]): Int".to_string()]);
        let out = String::from_utf8(sink.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "// sequence theory\nsort Seq[Int]\nfunction Seq_length(s: Seq[Int]): Int\n"
        );
    }
}
