//! Report emitter

use crate::error::Result;
use crate::types::User;
use std::io::Write;

/// Record counts of a finished report, used for logging
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportSummary {
    /// Number of users
    pub users: usize,
    /// Number of posts across all users
    pub posts: usize,
    /// Number of comments across all posts
    pub comments: usize,
}

impl ReportSummary {
    /// Count the records in `users`
    pub fn of(users: &[User]) -> Self {
        users.iter().fold(Self::default(), |mut acc, user| {
            acc.users += 1;
            acc.posts += user.posts.len();
            acc.comments += user
                .posts
                .iter()
                .filter_map(|p| p.comments.as_ref())
                .map(Vec::len)
                .sum::<usize>();
            acc
        })
    }
}

/// Write `users` as indented JSON followed by a newline.
pub fn write_report<W: Write>(users: &[User], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, users).map_err(std::io::Error::from)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the report to standard output
pub fn emit(users: &[User]) -> Result<()> {
    let stdout = std::io::stdout();
    write_report(users, stdout.lock())
}
