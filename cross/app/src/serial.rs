use core::fmt::{self, Write};

use defmt::{info, warn};
use embassy_stm32::mode::Blocking;
use embassy_stm32::usart::UartTx;
use heapless::String;

pub const LINE_CAPACITY: usize = 64;

/// Buffers one report line and sends it on the UART when the newline comes.
pub struct LineWriter<'d> {
    tx: UartTx<'d, Blocking>,
    line: String<LINE_CAPACITY>,
}

impl<'d> LineWriter<'d> {
    pub fn new(tx: UartTx<'d, Blocking>) -> Self {
        Self {
            tx,
            line: String::new(),
        }
    }

    fn flush_line(&mut self) -> fmt::Result {
        info!("ADC value and temperature: {}", self.line.as_str());
        let sent = self
            .tx
            .blocking_write(self.line.as_bytes())
            .and_then(|_| self.tx.blocking_write(b"\n"));
        self.line.clear();
        sent.map_err(|e| {
            warn!("UART write failed: {}", e);
            fmt::Error
        })
    }
}

impl<'d> Write for LineWriter<'d> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            if c == '\n' {
                self.flush_line()?;
            } else if self.line.push(c).is_err() {
                self.line.clear();
                return Err(fmt::Error);
            }
        }
        Ok(())
    }
}
