use crate::domain::account::Account;
use std::io::Write;

/// Writes the final account state to any `Write` sink.
///
/// Two renderings: a one-line-per-account text form for terminals, and
/// pretty JSON for consumption by other tools.
pub struct ReportWriter<W: Write> {
    writer: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Renders one `account <id>: <balance> <currency>` line per account.
    pub fn write_text(&mut self, accounts: &[Account]) -> std::io::Result<()> {
        for account in accounts {
            writeln!(
                self.writer,
                "account {}: {} {}",
                account.id, account.balance, account.currency
            )?;
        }
        Ok(())
    }

    /// Renders the accounts as a pretty-printed JSON array.
    pub fn write_json(&mut self, accounts: &[Account]) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(&mut self.writer, accounts)?;
        writeln!(self.writer).map_err(serde_json::Error::io)?;
        Ok(())
    }
}
