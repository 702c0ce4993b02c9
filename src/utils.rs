use std::io::{Stdout, Write};

use crossterm::{cursor, QueueableCommand};

/// Overwrites the current terminal line with `msg`.
pub fn rewrite_message(stdout: &mut Stdout, msg: &str) -> crossterm::Result<()> {
    stdout.queue(cursor::SavePosition)?;
    stdout.write_all(msg.as_bytes())?;
    stdout.queue(cursor::RestorePosition)?;
    stdout.flush()?;
    Ok(())
}
