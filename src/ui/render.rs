use crossterm::cursor::MoveUp;
use crossterm::style::Stylize;
use crossterm::terminal::{Clear, ClearType};
use crossterm::QueueableCommand;
use std::io::{self, Write};

use crate::watch::state::{MarketRecord, PriceState};

const NAME_WIDTH: usize = 10;

/// Formats a snapshot as one colorized line per market: bold name, price
/// colored by state (`NA` until the first tick), dim threshold in parens.
pub fn render(snapshot: &[(String, MarketRecord)]) -> String {
    let mut output = String::new();

    for (name, record) in snapshot {
        let name = format!("{:<width$}", name, width = NAME_WIDTH).bold().white();

        let price = match record.price {
            Some(price) => price.to_string(),
            None => "NA".to_string(),
        };
        let price = match record.state {
            PriceState::Unknown => price.dim(),
            PriceState::AboveThreshold => price.green(),
            PriceState::BelowThreshold => price.red(),
            PriceState::AtThreshold => price.white(),
        };

        let threshold = format!("({})", record.threshold).dim();

        output.push_str(&format!("{} {} {}\n", name, price, threshold));
    }

    output
}

/// Writes frames to the terminal in place: every paint after the first moves
/// the cursor back over the previous block and clears it first.
pub struct Painter<W: Write> {
    out: W,
    lines: u16,
}

impl<W: Write> Painter<W> {
    pub fn new(out: W) -> Self {
        Self { out, lines: 0 }
    }

    pub fn paint(&mut self, frame: &str) -> io::Result<()> {
        if self.lines > 0 {
            self.out.queue(MoveUp(self.lines))?;
            self.out.queue(Clear(ClearType::FromCursorDown))?;
        }
        self.out.write_all(frame.as_bytes())?;
        self.out.flush()?;
        self.lines = frame.lines().count() as u16;
        Ok(())
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
